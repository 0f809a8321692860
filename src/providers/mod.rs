/*!
 * Provider implementations for the external translation capability.
 *
 * This module contains the provider abstraction and its implementations:
 * - Google: the Google Translate web endpoint
 * - Mock: a deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface that all provider implementations must
/// follow, allowing them to be used interchangeably in the translation
/// service — and substituted with a deterministic test double.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate a piece of text between two languages
    ///
    /// # Arguments
    /// * `text` - The text to translate; may contain inline HTML markup
    /// * `source_language` - ISO 639-1 code of the source language
    /// * `target_language` - ISO 639-1 code of the target language
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the provider is reachable
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short provider name for logging
    fn name(&self) -> &'static str;
}

pub mod google;
pub mod mock;

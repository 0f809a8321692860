/*!
 * Translation services for the localization pipeline.
 *
 * The module is organized as:
 * - `translation::core`: the translation service wrapping a provider with
 *   caching and bounded retry
 * - `translation::batch`: marker-based batching of document text segments
 * - `translation::cache`: the per-run translation cache
 */

pub mod batch;
pub mod cache;
pub mod core;

pub use batch::BatchTranslator;
pub use cache::TranslationCache;
pub use core::TranslationService;

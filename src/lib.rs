/*!
 * # weblingo - HTML corpus localization pipeline
 *
 * A Rust library for localizing an English HTML content corpus into
 * several target languages.
 *
 * ## Features
 *
 * - Persistent slug registry mapping every article to its per-language
 *   URL slug, with uniqueness enforcement
 * - Owned HTML document model with lossless parse/serialize round trips
 * - Batched translation of document text through an external translation
 *   capability, with per-run caching and bounded retry
 * - Link, navigation and metadata rewriting that keeps the cross-language
 *   link graph consistent
 * - Sitemap synchronization from the slug registry
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `slug_registry`: Persistent article-to-slug mapping
 * - `document`: Owned HTML tree with query/mutation primitives
 * - `translation`: Translation services:
 *   - `translation::core`: Core translation service
 *   - `translation::batch`: Marker-based batch processing
 *   - `translation::cache`: Per-run translation cache
 * - `rewriter`: Link and metadata rewriting
 * - `sitemap`: Shared sitemap synchronization
 * - `site_data`: Read-only symbol and UI-string tables
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `providers`: Client implementations for translation providers:
 *   - `providers::google`: Google Translate web endpoint client
 *   - `providers::mock`: Deterministic test double
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod rewriter;
pub mod site_data;
pub mod sitemap;
pub mod slug_registry;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{Config, LanguageProfile};
pub use app_controller::Controller;
pub use document::Document;
pub use errors::{AppError, PipelineError, ProviderError};
pub use slug_registry::SlugRegistry;
pub use translation::{BatchTranslator, TranslationCache, TranslationService};

/*!
 * Batch translation of document text.
 *
 * Text segments from a document region are wrapped in inert, indexed
 * markers and concatenated into bounded-size requests, so many independent
 * strings share one round trip to the translation capability while staying
 * unambiguously separable afterwards.
 */

use log::{debug, warn};

use crate::document::{unescape, Document, NodeData, NodeId};
use crate::errors::PipelineError;

use super::core::TranslationService;

/// Attributes whose values carry visible text
pub const TRANSLATED_ATTRIBUTES: &[&str] = &["alt", "aria-label", "title"];

/// Elements whose text content must never be translated
const EXCLUDED_PARENTS: &[&str] = &["script", "style", "code", "pre", "noscript"];

/// A text segment waiting for the next batched request
struct PendingSegment {
    /// Marker index within the current batch
    index: usize,
    /// The text node the translation goes back into
    node: NodeId,
    /// Leading whitespace of the original leaf
    prefix: String,
    /// The translatable core
    core: String,
    /// Trailing whitespace of the original leaf
    suffix: String,
}

/// Batch translator for the text segments of one document region
pub struct BatchTranslator<'a> {
    /// The translation service to use
    service: &'a TranslationService,

    /// Character budget for one combined request
    max_batch_chars: usize,
}

impl<'a> BatchTranslator<'a> {
    /// Create a new batch translator
    pub fn new(service: &'a TranslationService, max_batch_chars: usize) -> Self {
        Self {
            service,
            max_batch_chars,
        }
    }

    /// Translate the visible text leaves under a document region.
    ///
    /// Leaves are visited in document order; leaves inside excluded
    /// elements and whitespace-only leaves are skipped. Cache hits are
    /// substituted immediately, misses are batched behind markers.
    pub async fn translate_region(
        &self,
        doc: &mut Document,
        scope: NodeId,
        source_language: &str,
        target_language: &str,
    ) -> Result<(), PipelineError> {
        let mut pending: Vec<PendingSegment> = Vec::new();
        let mut batch_len = 0usize;

        for node in doc.text_nodes(scope) {
            let excluded = doc
                .parent(node)
                .and_then(|p| doc.tag_name(p))
                .map(|tag| EXCLUDED_PARENTS.contains(&tag))
                .unwrap_or(false);
            if excluded {
                continue;
            }

            let raw = match doc.data(node) {
                NodeData::Text(text) => text.clone(),
                _ => continue,
            };
            let (prefix, core, suffix) = split_whitespace_frame(&raw);
            if core.is_empty() {
                continue;
            }

            if let Some(cached) = self.service.cache.get(core, source_language, target_language) {
                doc.set_text(node, &format!("{}{}{}", prefix, cached, suffix));
                continue;
            }

            let marker_len = wrap_marker(pending.len(), core).len();
            if !pending.is_empty() && batch_len + marker_len > self.max_batch_chars {
                self.flush(doc, &mut pending, source_language, target_language)
                    .await?;
                batch_len = 0;
            }

            pending.push(PendingSegment {
                index: pending.len(),
                node,
                prefix: prefix.to_string(),
                core: core.to_string(),
                suffix: suffix.to_string(),
            });
            batch_len += marker_len;
        }

        self.flush(doc, &mut pending, source_language, target_language)
            .await
    }

    /// Translate the text-bearing attributes of the elements under a region.
    ///
    /// Attribute values are translated individually through the same cache,
    /// since their volume is low.
    pub async fn translate_attributes(
        &self,
        doc: &mut Document,
        scope: NodeId,
        source_language: &str,
        target_language: &str,
    ) -> Result<(), PipelineError> {
        for node in doc.descendants(scope) {
            if doc.tag_name(node).is_none() {
                continue;
            }
            for attr in TRANSLATED_ATTRIBUTES {
                let raw = match doc.attr(node, attr) {
                    Some(value) => value.to_string(),
                    None => continue,
                };
                let value = unescape(&raw);
                if value.trim().is_empty() {
                    continue;
                }
                let translated = self
                    .service
                    .translate_text(&value, source_language, target_language)
                    .await?;
                doc.set_attr(node, attr, &translated);
            }
        }
        Ok(())
    }

    /// Send the pending markers as one request and substitute the results
    async fn flush(
        &self,
        doc: &mut Document,
        pending: &mut Vec<PendingSegment>,
        source_language: &str,
        target_language: &str,
    ) -> Result<(), PipelineError> {
        if pending.is_empty() {
            return Ok(());
        }

        let combined: String = pending
            .iter()
            .map(|segment| wrap_marker(segment.index, &segment.core))
            .collect();
        debug!(
            "Flushing batch of {} segments ({} chars)",
            pending.len(),
            combined.len()
        );

        let translated = self
            .service
            .translate_text(&combined, source_language, target_language)
            .await?;
        let response = Document::parse(&translated);

        for segment in pending.drain(..) {
            let translated_core = match find_marker(&response, segment.index) {
                Some(text) => text,
                None => {
                    warn!(
                        "Marker {} missing from translation response, keeping source text",
                        segment.index
                    );
                    segment.core.clone()
                }
            };
            self.service.cache.store(
                &segment.core,
                source_language,
                target_language,
                &translated_core,
            );
            doc.set_text(
                segment.node,
                &format!("{}{}{}", segment.prefix, translated_core, segment.suffix),
            );
        }
        Ok(())
    }
}

/// Wrap a translatable core in its inert, indexed marker
fn wrap_marker(index: usize, core: &str) -> String {
    format!("<span data-i=\"{}\">{}</span>", index, core)
}

/// Find a marker's translated content by index in a parsed response
fn find_marker(response: &Document, index: usize) -> Option<String> {
    let needle = index.to_string();
    response
        .find_by_attr(response.root(), "span", "data-i", &needle)
        .map(|node| response.text_content(node))
}

/// Split a raw leaf into (leading whitespace, core, trailing whitespace)
fn split_whitespace_frame(raw: &str) -> (&str, &str, &str) {
    if raw.trim().is_empty() {
        return (raw, "", "");
    }
    let core_start = raw.len() - raw.trim_start().len();
    let core_end = raw.trim_end().len();
    (&raw[..core_start], &raw[core_start..core_end], &raw[core_end..])
}

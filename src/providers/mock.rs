/*!
 * Mock provider implementations for testing.
 *
 * This module provides a deterministic mock provider that simulates
 * different behaviors:
 * - `MockProvider::working()` - Always succeeds with a marked translation
 * - `MockProvider::fail_first(n)` - Fails the first n requests, then works
 * - `MockProvider::failing()` - Always fails with a transient error
 * - `MockProvider::unsupported_pair()` - Always fails permanently
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a deterministic pseudo-translation
    Working,
    /// Fails the first n requests with a transient connection error
    FailFirst {
        /// Number of leading requests that fail
        failures: usize,
    },
    /// Fails the first n requests with a rate-limit error
    RateLimited {
        /// Number of leading requests that fail
        failures: usize,
    },
    /// Always fails with a transient connection error
    Failing,
    /// Always fails with a permanent unsupported-pair error
    UnsupportedPair,
    /// Always returns an empty response
    Empty,
}

/// Deterministic mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, also drives the leading-failure behaviors
    request_count: Arc<AtomicUsize>,
    /// Every text this provider was asked to translate, in call order
    requests: Arc<Mutex<Vec<String>>>,
}

/// Mock provider constructors - most are exercised by the test suite only
#[allow(dead_code)]
impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that fails the first n requests, then succeeds
    pub fn fail_first(failures: usize) -> Self {
        Self::new(MockBehavior::FailFirst { failures })
    }

    /// Create a mock that rate-limits the first n requests, then succeeds
    pub fn rate_limited(failures: usize) -> Self {
        Self::new(MockBehavior::RateLimited { failures })
    }

    /// Create a failing mock provider that always errors transiently
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that always reports an unsupported language pair
    pub fn unsupported_pair() -> Self {
        Self::new(MockBehavior::UnsupportedPair)
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Number of translate calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }

    /// Deterministic pseudo-translation: every text run outside markup is
    /// prefixed with the target language tag, markup is left intact.
    pub fn pseudo_translate(text: &str, target_language: &str) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        let mut chunk = String::new();
        let mut in_tag = false;
        for ch in text.chars() {
            match ch {
                '<' if !in_tag => {
                    flush_chunk(&mut out, &mut chunk, target_language);
                    in_tag = true;
                    out.push(ch);
                }
                '>' if in_tag => {
                    in_tag = false;
                    out.push(ch);
                }
                _ if in_tag => out.push(ch),
                _ => chunk.push(ch),
            }
        }
        flush_chunk(&mut out, &mut chunk, target_language);
        out
    }
}

fn flush_chunk(out: &mut String, chunk: &mut String, target_language: &str) {
    if chunk.is_empty() {
        return;
    }
    if chunk.trim().is_empty() {
        out.push_str(chunk);
    } else {
        let core_start = chunk.len() - chunk.trim_start().len();
        let core_end = chunk.trim_end().len();
        out.push_str(&chunk[..core_start]);
        out.push('[');
        out.push_str(target_language);
        out.push_str("] ");
        out.push_str(&chunk[core_start..core_end]);
        out.push_str(&chunk[core_end..]);
    }
    chunk.clear();
}

#[async_trait]
impl TranslationProvider for MockProvider {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<String, ProviderError> {
        let call = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(text.to_string());

        match self.behavior {
            MockBehavior::Working => Ok(Self::pseudo_translate(text, target_language)),
            MockBehavior::FailFirst { failures } => {
                if call < failures {
                    Err(ProviderError::ConnectionError(format!(
                        "simulated connection failure {}",
                        call + 1
                    )))
                } else {
                    Ok(Self::pseudo_translate(text, target_language))
                }
            }
            MockBehavior::RateLimited { failures } => {
                if call < failures {
                    Err(ProviderError::RateLimitExceeded(format!(
                        "simulated rate limit {}",
                        call + 1
                    )))
                } else {
                    Ok(Self::pseudo_translate(text, target_language))
                }
            }
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "simulated permanent outage".to_string(),
            )),
            MockBehavior::UnsupportedPair => Err(ProviderError::UnsupportedLanguagePair {
                source_lang: source_language.to_string(),
                target: target_language.to_string(),
            }),
            MockBehavior::Empty => Ok(String::new()),
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match self.behavior {
            MockBehavior::Failing => Err(ProviderError::ConnectionError(
                "simulated permanent outage".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

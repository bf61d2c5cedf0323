//! Address Extractor
//!
//! Asks the completion service for the street addresses in a piece of text
//! and parses the JSON array out of whatever the model wrapped it in. Every
//! failure degrades to "no addresses found" so the router can fall back.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use sales_assistant_core::notice::{Notice, NoticeSink};

use crate::normalizer::{normalize, parse_event_envelope};
use crate::provider::CompletionProvider;
use crate::types::CompletionRequest;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)```(?:json)?").unwrap());
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*\]").unwrap());
static BETWEEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)between\s+(.*?)\s+and\s+(.*)").unwrap());

/// Build the constrained extraction prompt for `text`.
pub fn build_extraction_prompt(text: &str) -> String {
    format!(
        "Extract every full street address from the text below. Respond with \
         only a JSON array of strings, without markdown. Example:\n\
         [\"123 Main St City, ST 12345\", \"456 Rue Example Montréal QC H2X 1Y4\"]\n\n\
         Text:\n```{}```",
        text
    )
}

/// Pull a JSON array of strings out of a model answer.
///
/// Code fences are removed first, then the widest `[...]` span is parsed.
/// Returns an empty list when nothing parses.
pub fn parse_address_array(raw: &str) -> Vec<String> {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let Some(span) = BRACKETED.find(cleaned) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(span.as_str()) {
        Ok(addresses) => addresses,
        Err(e) => {
            tracing::debug!("address array did not parse: {}", e);
            Vec::new()
        }
    }
}

/// Fallback for the "between X and Y" phrasing.
///
/// Returns both captured addresses with surrounding whitespace and
/// punctuation removed, or an empty list when the pattern does not match.
pub fn between_fallback(query: &str) -> Vec<String> {
    let Some(caps) = BETWEEN.captures(query) else {
        return Vec::new();
    };
    let clean = |s: &str| {
        s.trim_matches(|c: char| c.is_whitespace() || ",.;:!?".contains(c))
            .to_string()
    };
    let first = clean(&caps[1]);
    let second = clean(&caps[2]);
    if first.is_empty() || second.is_empty() {
        return Vec::new();
    }
    vec![first, second]
}

/// Extracts address strings from free text via the completion service.
pub struct AddressExtractor {
    provider: Arc<dyn CompletionProvider>,
    notices: Arc<dyn NoticeSink>,
}

impl AddressExtractor {
    pub fn new(provider: Arc<dyn CompletionProvider>, notices: Arc<dyn NoticeSink>) -> Self {
        Self { provider, notices }
    }

    /// Extract the addresses mentioned in `text`. Never fails.
    pub async fn extract(&self, text: &str) -> Vec<String> {
        let request =
            CompletionRequest::prompt(self.provider.model(), build_extraction_prompt(text));

        let response = match self.provider.complete(request).await {
            Ok(r) => r,
            Err(e) => {
                self.notices
                    .notify(Notice::transport(self.provider.name(), e.to_string()));
                return Vec::new();
            }
        };

        if !response.is_success() {
            self.notices.notify(Notice::CompletionStatus {
                status: response.status,
            });
            return Vec::new();
        }

        let events = match parse_event_envelope(&response.content) {
            Ok(events) => events,
            Err(e) => {
                tracing::debug!("extraction response unusable: {}", e);
                return Vec::new();
            }
        };

        let addresses = parse_address_array(&normalize(&events).text);
        tracing::debug!(count = addresses.len(), "extracted addresses");
        addresses
    }

    /// Extract, then apply the "between X and Y" fallback when nothing was found.
    pub async fn extract_with_fallback(&self, text: &str) -> Vec<String> {
        let addresses = self.extract(text).await;
        if !addresses.is_empty() {
            return addresses;
        }
        let fallback = between_fallback(text);
        if !fallback.is_empty() {
            tracing::debug!("using 'between' fallback for address extraction");
        }
        fallback
    }
}

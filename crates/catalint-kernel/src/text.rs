//! Natural-language signals in catalog copy.
//!
//! Free text is never authoritative: the classifier only produces WARN-level
//! contradictions and a conservative derivation fallback (a text that matches
//! both vocabularies derives nothing). The classifier sits behind a trait so
//! the keyword sets can be swapped per locale without touching the rules.

use regex::Regex;
use serde_json::Value;

/// Which vocabularies a piece of copy matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextSignals {
    pub replacement: bool,
    pub assist: bool,
}

pub trait KeywordClassifier {
    fn signals(&self, text: &str) -> TextSignals;
}

/// Regex keyword classifier over the catalog's locale (Dutch copy with
/// occasional English).
#[derive(Debug)]
pub struct RegexKeywordClassifier {
    replacement: Regex,
    assist: Regex,
}

impl RegexKeywordClassifier {
    pub fn new(replacement: &str, assist: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            replacement: Regex::new(replacement)?,
            assist: Regex::new(assist)?,
        })
    }
}

impl Default for RegexKeywordClassifier {
    fn default() -> Self {
        Self::new(
            r"(?i)(vervang|replace|vervangen)",
            r"(?i)(hulpveer|assist|ondersteun|bijplaats)",
        )
        .expect("default keyword patterns are valid")
    }
}

impl KeywordClassifier for RegexKeywordClassifier {
    fn signals(&self, text: &str) -> TextSignals {
        TextSignals {
            replacement: self.replacement.is_match(text),
            assist: self.assist.is_match(text),
        }
    }
}

/// Concatenated, lowercased copy for a record: the SEO fields plus the main
/// description. The logic rules also read `seo.body`; the derivation
/// fallback does not.
pub fn copy_text(record: &Value, include_seo_body: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    let seo_keys: &[&str] = if include_seo_body {
        &["title", "description", "summary", "body"]
    } else {
        &["title", "description", "summary"]
    };
    if let Some(seo) = record.get("seo") {
        for key in seo_keys {
            if let Some(text) = seo.get(*key).and_then(Value::as_str)
                && !text.is_empty()
            {
                parts.push(text.to_lowercase());
            }
        }
    }
    if let Some(description) = record.get("description").and_then(Value::as_str)
        && !description.is_empty()
    {
        parts.push(description.to_lowercase());
    }
    parts.join(" ")
}

/// Spring application implied by copy alone, or `None` when the text is
/// silent or ambiguous (matches both vocabularies).
pub fn spring_from_text(classifier: &dyn KeywordClassifier, record: &Value) -> Option<&'static str> {
    let text = copy_text(record, false);
    if text.is_empty() {
        return None;
    }
    let signals = classifier.signals(&text);
    match (signals.replacement, signals.assist) {
        (true, false) => Some("replacement"),
        (false, true) => Some("assist"),
        _ => None,
    }
}

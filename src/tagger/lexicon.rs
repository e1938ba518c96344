//! Deterministic offline tagger backed by a gazetteer and numeric patterns.
//!
//! This tagger exists so the pipeline can run without a model service and so
//! tests can pin tagger behavior exactly: pretrained models change their span
//! boundaries and labels between versions, which makes byte-exact assertions
//! against them brittle. The lexicon tagger's output depends only on its
//! phrase table and patterns.
//!
//! # Recognition
//!
//! Two candidate sources feed a single left-to-right sweep:
//!
//! 1. **Gazetteer phrases**: exact, case-sensitive substring matches on word
//!    boundaries, each mapped to a category.
//! 2. **Patterns**: regexes for DATE, TIME, PERCENT, MONEY, ORDINAL, and
//!    CARDINAL surface forms.
//!
//! Overlapping candidates are resolved earliest-start-first, longest-first,
//! with gazetteer phrases winning exact ties. The surviving spans come out in
//! document order, which is the ordering contract every tagger here honors.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::models::TaggedSpan;
use crate::tagger::{EntityTagger, TagError};

static PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(
                r"\b(?:January|February|March|April|May|June|July|August|September|October|November|December)(?: \d{1,2}(?:, \d{4})?)?\b|\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday)\b|\b(?:19|20)\d{2}\b",
            )
            .unwrap(),
            "DATE",
        ),
        (
            Regex::new(r"\b\d{1,2}:\d{2}(?: ?(?:a\.m\.|p\.m\.|AM|PM|am|pm))?").unwrap(),
            "TIME",
        ),
        (
            Regex::new(r"\b\d+(?:\.\d+)?\s?(?:%|percent)").unwrap(),
            "PERCENT",
        ),
        (
            Regex::new(r"\$\d[\d,]*(?:\.\d+)?(?: ?(?:million|billion|trillion))?").unwrap(),
            "MONEY",
        ),
        (
            Regex::new(
                r"\b\d+(?:st|nd|rd|th)\b|\b(?:first|second|third|fourth|fifth|sixth|seventh|eighth|ninth|tenth)\b",
            )
            .unwrap(),
            "ORDINAL",
        ),
        (
            Regex::new(r"\b\d+(?:,\d{3})*(?:\.\d+)?\b").unwrap(),
            "CARDINAL",
        ),
    ]
});

/// Gazetteer shipped with the default tagger. Small on purpose; callers with
/// real coverage needs should point at a model service instead.
const DEFAULT_PHRASES: &[(&str, &str)] = &[
    ("United Nations", "ORG"),
    ("European Union", "ORG"),
    ("NATO", "ORG"),
    ("BBC", "ORG"),
    ("Reuters", "ORG"),
    ("Associated Press", "ORG"),
    ("Apple", "ORG"),
    ("Google", "ORG"),
    ("Microsoft", "ORG"),
    ("White House", "FAC"),
    ("Pentagon", "FAC"),
    ("United States", "GPE"),
    ("United Kingdom", "GPE"),
    ("New York", "GPE"),
    ("Washington", "GPE"),
    ("London", "GPE"),
    ("Paris", "GPE"),
    ("Beijing", "GPE"),
    ("Moscow", "GPE"),
    ("Kyiv", "GPE"),
    ("Europe", "LOC"),
    ("Middle East", "LOC"),
    ("Pacific Ocean", "LOC"),
    ("American", "NORP"),
    ("Russian", "NORP"),
    ("Chinese", "NORP"),
    ("European", "NORP"),
    ("English", "LANGUAGE"),
    ("French", "LANGUAGE"),
    ("Spanish", "LANGUAGE"),
    ("iPhone", "PRODUCT"),
    ("Olympics", "EVENT"),
    ("World Cup", "EVENT"),
];

/// A deterministic tagger driven by a phrase table plus numeric patterns.
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    // Insertion order matters: earlier entries win exact ties.
    phrases: Vec<(String, String)>,
}

impl LexiconTagger {
    /// An empty tagger; only the numeric/date patterns fire until phrases
    /// are [`insert`](Self::insert)ed.
    pub fn new() -> Self {
        Self {
            phrases: Vec::new(),
        }
    }

    /// A tagger preloaded with the builtin gazetteer.
    pub fn with_defaults() -> Self {
        let mut tagger = Self::new();
        for (phrase, category) in DEFAULT_PHRASES {
            tagger.insert(*phrase, *category);
        }
        tagger
    }

    /// Add a phrase-to-category mapping.
    pub fn insert(&mut self, phrase: impl Into<String>, category: impl Into<String>) {
        self.phrases.push((phrase.into(), category.into()));
    }

    fn recognize(&self, text: &str) -> Vec<TaggedSpan> {
        // (start, end, category); generation order breaks exact ties.
        let mut candidates: Vec<(usize, usize, &str)> = Vec::new();

        for (phrase, category) in &self.phrases {
            if phrase.is_empty() {
                continue;
            }
            for (start, matched) in text.match_indices(phrase.as_str()) {
                let end = start + matched.len();
                if on_word_boundary(text, start, end) {
                    candidates.push((start, end, category.as_str()));
                }
            }
        }

        for (pattern, category) in PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                candidates.push((m.start(), m.end(), *category));
            }
        }

        // Earliest start first; at equal starts the longest candidate wins.
        // Sort is stable, so generation order settles exact ties.
        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)));

        let mut spans = Vec::new();
        let mut cursor = 0;
        for (start, end, category) in candidates {
            if start >= cursor {
                spans.push(TaggedSpan::new(&text[start..end], category));
                cursor = end;
            }
        }
        debug!(spans = spans.len(), "Lexicon tagger recognized spans");
        spans
    }
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl EntityTagger for LexiconTagger {
    async fn tag(&self, text: &str) -> Result<Vec<TaggedSpan>, TagError> {
        Ok(self.recognize(text))
    }
}

/// Whether `text[start..end]` sits on word boundaries: the adjacent
/// characters (if any) are not alphanumeric.
fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before_ok = text[..start]
        .chars()
        .next_back()
        .map(|c| !c.is_alphanumeric())
        .unwrap_or(true);
    let after_ok = text[end..]
        .chars()
        .next()
        .map(|c| !c.is_alphanumeric())
        .unwrap_or(true);
    before_ok && after_ok
}

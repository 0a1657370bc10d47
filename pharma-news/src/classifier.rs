//! Keyword matching for therapy areas.
//!
//! Keywords and text are compared after normalization. A keyword made of
//! several words is a phrase and must appear contiguously in the text. A
//! single-word keyword must equal a whole word of the text, so `"ms"` does
//! not match inside `"cramps"`.

use crate::types::TherapyArea;
use crate::utils::text::normalize;
use std::collections::HashSet;

/// Returns true when any keyword matches `text`.
pub fn matches<S: AsRef<str>>(text: &str, keywords: &[S]) -> bool {
    let text = NormalizedText::new(text);
    keywords
        .iter()
        .any(|keyword| Keyword::compile(keyword.as_ref()).matches(&text))
}

/// Text normalized once so it can be tested against many keyword sets.
#[derive(Debug, Clone)]
pub struct NormalizedText {
    clean: String,
}

impl NormalizedText {
    pub fn new(text: &str) -> Self {
        Self {
            clean: normalize(text),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.clean
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyword {
    Word(String),
    Phrase(String),
}

impl Keyword {
    pub fn compile(keyword: &str) -> Self {
        let clean = normalize(keyword);
        if clean.split_whitespace().count() > 1 {
            Keyword::Phrase(clean)
        } else {
            Keyword::Word(clean.trim().to_string())
        }
    }

    pub fn matches(&self, text: &NormalizedText) -> bool {
        match self {
            Keyword::Phrase(phrase) => text.as_str().contains(phrase.as_str()),
            Keyword::Word(word) => text.as_str().split_whitespace().any(|w| w == word),
        }
    }
}

/// Precompiled keyword set of one therapy area.
#[derive(Debug, Clone)]
pub struct Classifier {
    area: String,
    words: HashSet<String>,
    phrases: Vec<String>,
}

impl Classifier {
    pub fn new(area: &TherapyArea) -> Self {
        let mut words = HashSet::new();
        let mut phrases = Vec::new();

        for keyword in &area.keywords {
            match Keyword::compile(keyword) {
                Keyword::Word(word) if !word.is_empty() => {
                    words.insert(word);
                }
                Keyword::Word(_) => {}
                Keyword::Phrase(phrase) => phrases.push(phrase),
            }
        }

        Self {
            area: area.name.clone(),
            words,
            phrases,
        }
    }

    pub fn area(&self) -> &str {
        &self.area
    }

    pub fn matches(&self, text: &NormalizedText) -> bool {
        if self.phrases.iter().any(|phrase| text.as_str().contains(phrase.as_str())) {
            return true;
        }
        text.as_str()
            .split_whitespace()
            .any(|word| self.words.contains(word))
    }
}

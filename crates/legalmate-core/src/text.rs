//! Text normalisation and sentence segmentation.
//!
//! Every analysis stage reads [`NormalizedText`], never raw extracted text.
//! The only way to obtain one is [`normalize`], so a stage can rely on the
//! character set without re-checking it.
//!
//! # Canonical form
//!
//! - Only alphanumerics, `.` and `,` survive inside words
//! - Words are separated by exactly one space
//! - No leading or trailing whitespace

use std::fmt;

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Text in canonical form: alphanumerics, periods, commas and single spaces.
///
/// Deserialising re-normalises the input, so a value read back from storage
/// upholds the same invariant as one produced by [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for NormalizedText {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for NormalizedText {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl From<String> for NormalizedText {
    fn from(s: String) -> Self {
        normalize(&s)
    }
}

impl From<NormalizedText> for String {
    fn from(t: NormalizedText) -> Self {
        t.0
    }
}

fn is_allowed(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | ',')
}

/// Normalise extracted text into canonical form.
///
/// Splits on whitespace runs, strips disallowed characters from each word,
/// drops words left empty, and rejoins with single spaces. Never fails;
/// empty input gives empty output.
pub fn normalize(text: &str) -> NormalizedText {
    let mut out = String::with_capacity(text.len());
    for word in text.split_whitespace() {
        let start = out.len();
        if start > 0 {
            out.push(' ');
        }
        let before = out.len();
        out.extend(word.chars().filter(|&c| is_allowed(c)));
        if out.len() == before {
            // Word was all punctuation: undo the separator.
            out.truncate(start);
        }
    }
    NormalizedText(out)
}

/// Split text into sentences on Unicode (UAX #29) sentence boundaries.
pub fn sentences(text: &str) -> impl Iterator<Item = &str> {
    text.unicode_sentences()
}

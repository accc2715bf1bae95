//! Local risk scanning over normalised contract text.
//!
//! Three passes, always in this order:
//!
//! 1. Governing law: flagged when no sentence mentions "governing law".
//! 2. Ambiguous terms: verbatim, case-sensitive matches against the text.
//! 3. Risk categories: case-insensitive keyword matches per category.
//!
//! Ambiguous terms match case-sensitively while category keywords do not.
//! Keyword lists are compared against normalised text, so punctuation inside
//! a keyword (e.g. "non-disclosure") only matches if it survives
//! normalisation.

use crate::analysis::RiskList;
use crate::text::{NormalizedText, sentences};

const GOVERNING_LAW: &str = "governing law";

/// Terms whose meaning is left open to interpretation.
pub const AMBIGUOUS_TERMS: &[&str] = &["reasonable", "material adverse effect", "sole discretion"];

/// Risk category → trigger keywords (lower-case).
pub const RISK_KEYWORDS: &[(&str, &[&str])] = &[
    ("indemnification", &["indemnify", "hold harmless"]),
    ("termination", &["terminate", "expiry"]),
    ("liability", &["liability", "damages"]),
    ("confidentiality", &["confidential", "non-disclosure"]),
];

/// Scan normalised text for risk indicators.
///
/// Deterministic: the same text always yields the same list in the same
/// order. Repeated triggers are not merged.
pub fn scan(text: &NormalizedText) -> RiskList {
    let original = text.as_str();
    let lowered = original.to_lowercase();
    let mut risks = Vec::new();

    if !sentences(&lowered).any(|s| s.contains(GOVERNING_LAW)) {
        risks.push("Missing Governing Law clause".to_string());
    }

    risks.extend(
        AMBIGUOUS_TERMS
            .iter()
            .filter(|term| original.contains(*term))
            .map(|term| format!("Ambiguous term: {term}")),
    );

    risks.extend(
        RISK_KEYWORDS
            .iter()
            .filter(|(_, keywords)| keywords.iter().any(|kw| lowered.contains(kw)))
            .map(|(category, _)| format!("Potential risk in {category} clause")),
    );

    tracing::trace!(count = risks.len(), "risk scan complete");
    risks
}

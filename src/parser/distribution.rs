//! Distribution Scanner
//!
//! Finds `Bernoulli(...)` declarations anywhere in a document. The scan does
//! not understand the surrounding C-ADL or YAML structure: it only reacts to
//! the literal `Bernoulli(` followed by everything up to the next `)`.

use std::sync::LazyLock;

use regex::Regex;

use super::number::parse_probability;

static BERNOULLI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bernoulli\(([^)]+)\)").expect("Bernoulli pattern is valid"));

/// A single `Bernoulli(...)` occurrence
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionMatch {
    /// Byte offset of the `B` in `Bernoulli`
    pub start: usize,
    /// Byte offset just past the closing parenthesis
    pub end: usize,
    /// Argument text exactly as written between the parentheses
    pub raw: String,
    /// Permissively parsed argument, `None` when it is not a number
    pub value: Option<f64>,
}

impl DistributionMatch {
    /// Whether the parsed value is a usable probability
    pub fn is_valid(&self) -> bool {
        matches!(self.value, Some(p) if (0.0..=1.0).contains(&p))
    }

    /// Whether `offset` falls inside the matched text (end inclusive, so a
    /// cursor right after the closing parenthesis still counts)
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }
}

/// Scan `text` left to right for non-overlapping `Bernoulli(...)` matches
pub fn scan_distributions(text: &str) -> Vec<DistributionMatch> {
    BERNOULLI
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            let raw = captures.get(1)?.as_str();
            Some(DistributionMatch {
                start: whole.start(),
                end: whole.end(),
                raw: raw.to_string(),
                value: parse_probability(raw),
            })
        })
        .collect()
}

/// Find the distribution under a byte offset, if any
pub fn distribution_at(text: &str, offset: usize) -> Option<DistributionMatch> {
    scan_distributions(text)
        .into_iter()
        .find(|m| m.contains(offset))
}

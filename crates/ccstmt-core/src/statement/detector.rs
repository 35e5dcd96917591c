//! Keyword-scored bank detection.

use serde::Serialize;
use tracing::debug;

use super::normalizer::normalize_for_matching;
use super::profiles::{profiles, BankProfile};
use crate::models::Bank;

/// Outcome of scoring a text against every profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BankDetection {
    /// Winning bank, or [`Bank::Unknown`] when nothing scored.
    pub bank: Bank,
    /// Number of the winner's keywords found in the text.
    pub score: usize,
    /// Score relative to the largest keyword set, capped at 1.0.
    pub confidence: f32,
    /// Every profile's score in configuration order.
    pub scores: Vec<(Bank, usize)>,
}

impl BankDetection {
    pub fn is_detected(&self) -> bool {
        self.bank.is_known()
    }
}

/// Scores text against a profile table.
pub struct BankDetector<'a> {
    profiles: &'a [BankProfile],
}

impl BankDetector<'static> {
    /// Detector over the built-in profile table.
    pub fn new() -> Self {
        Self { profiles: profiles() }
    }
}

impl Default for BankDetector<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> BankDetector<'a> {
    pub fn with_profiles(profiles: &'a [BankProfile]) -> Self {
        Self { profiles }
    }

    /// Normalize raw text, then score it.
    pub fn detect(&self, text: &str) -> BankDetection {
        self.detect_normalized(&normalize_for_matching(text))
    }

    /// Score text that is already lowercase with collapsed whitespace.
    ///
    /// A profile scores one point per distinct keyword present. The highest
    /// nonzero score wins; on a tie the earlier profile keeps the lead.
    pub fn detect_normalized(&self, normalized: &str) -> BankDetection {
        let scores: Vec<(Bank, usize)> = self
            .profiles
            .iter()
            .map(|p| {
                let score = p.keywords.iter().filter(|kw| normalized.contains(**kw)).count();
                (p.bank, score)
            })
            .collect();

        let mut best = (Bank::Unknown, 0);
        for &(bank, score) in &scores {
            if score > best.1 {
                best = (bank, score);
            }
        }

        let max_keywords = self
            .profiles
            .iter()
            .map(|p| p.keywords.len())
            .max()
            .unwrap_or(0);
        let confidence = if max_keywords == 0 {
            0.0
        } else {
            (best.1 as f32 / max_keywords as f32).min(1.0)
        };

        debug!("bank detection scores: {:?} -> {}", scores, best.0);

        BankDetection {
            bank: best.0,
            score: best.1,
            confidence,
            scores,
        }
    }
}

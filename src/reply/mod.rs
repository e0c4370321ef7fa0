//! Bot reply providers
//!
//! The conversation only sees the [`ReplySource`] trait. [`CannedReplies`] is
//! the stand-in used without a backend: a uniform pick from a fixed catalog.

use crate::error::{ChatError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Placeholder responses used when no catalog is configured
pub const DEFAULT_CATALOG: &[&str] = &[
    "That's a great question!",
    "Let me think about that...",
    "Here's a simple explanation:",
    "Interesting! Here's what I know:",
    "Sure! Let me help you with that.",
];

/// Appended to every canned reply
pub const DEFAULT_SUFFIX: &str = "\n\n(This is a terminal chat demo)";

/// Something that answers a user message
pub trait ReplySource {
    fn reply(&mut self, user_text: &str) -> String;
}

/// Uniform random pick from a fixed, non-empty catalog
#[derive(Debug, Clone)]
pub struct CannedReplies {
    catalog: Vec<String>,
    suffix: String,
    rng: StdRng,
}

impl CannedReplies {
    /// Build a catalog source; `seed` makes the sequence of picks reproducible
    pub fn new(
        catalog: Vec<String>,
        suffix: impl Into<String>,
        seed: Option<u64>,
    ) -> Result<Self> {
        if catalog.is_empty() {
            return Err(ChatError::Config("reply catalog is empty".to_string()));
        }
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(CannedReplies {
            catalog,
            suffix: suffix.into(),
            rng,
        })
    }

    pub fn catalog(&self) -> &[String] {
        &self.catalog
    }

    /// Index into the catalog, uniformly distributed
    pub fn pick(&mut self) -> usize {
        self.rng.gen_range(0..self.catalog.len())
    }
}

impl Default for CannedReplies {
    fn default() -> Self {
        CannedReplies {
            catalog: DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect(),
            suffix: DEFAULT_SUFFIX.to_string(),
            rng: StdRng::from_entropy(),
        }
    }
}

impl ReplySource for CannedReplies {
    fn reply(&mut self, user_text: &str) -> String {
        let index = self.pick();
        debug!(index, user_chars = user_text.chars().count(), "canned reply chosen");
        format!("{}{}", self.catalog[index], self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<String> {
        DEFAULT_CATALOG.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reply_is_catalog_entry_plus_suffix() {
        let mut replies = CannedReplies::new(catalog(), " [demo]", Some(7)).unwrap();
        let reply = replies.reply("Hello");
        let body = reply.strip_suffix(" [demo]").expect("suffix missing");
        assert!(DEFAULT_CATALOG.contains(&body), "unexpected reply {reply:?}");
    }

    #[test]
    fn picks_are_roughly_uniform() {
        let mut replies = CannedReplies::new(catalog(), "", Some(1234)).unwrap();
        let trials = 10_000;
        let mut counts = vec![0usize; DEFAULT_CATALOG.len()];
        for _ in 0..trials {
            counts[replies.pick()] += 1;
        }
        let expected = trials / DEFAULT_CATALOG.len();
        for (i, count) in counts.iter().enumerate() {
            let deviation = (*count as f64 - expected as f64).abs() / expected as f64;
            assert!(deviation < 0.1, "entry {i} drawn {count} times, expected ~{expected}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = CannedReplies::new(catalog(), "", Some(99)).unwrap();
        let mut b = CannedReplies::new(catalog(), "", Some(99)).unwrap();
        let left: Vec<usize> = (0..20).map(|_| a.pick()).collect();
        let right: Vec<usize> = (0..20).map(|_| b.pick()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn empty_catalog_is_rejected() {
        assert!(matches!(
            CannedReplies::new(Vec::new(), "", None),
            Err(ChatError::Config(_))
        ));
    }
}

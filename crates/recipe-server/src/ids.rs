//! Recipe ID generation
//!
//! IDs are `recipe-{unix millis}-{seq}`. The per-process sequence keeps two
//! creates in the same millisecond apart; a clash with another process still
//! surfaces as `AlreadyExists` from the store.

use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct IdGenerator {
    seq: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            seq: AtomicU64::new(0),
        }
    }

    pub fn next_id(&self) -> String {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        format!("recipe-{}-{}", Utc::now().timestamp_millis(), seq)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_format() {
        let id = IdGenerator::new().next_id();
        assert!(id.starts_with("recipe-"));
        assert!(id.ends_with("-0"));
    }

    #[test]
    fn test_unique_across_threads() {
        let ids = Arc::new(IdGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = ids.clone();
                std::thread::spawn(move || (0..500).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id generated");
            }
        }
        assert_eq!(seen.len(), 4000);
    }
}

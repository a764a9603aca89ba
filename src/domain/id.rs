//! Task identifiers
//!
//! Tasks are keyed by random 128-bit UUIDs. The canonical string form is the
//! 36-character lowercase hyphenated rendering, and that is the only form
//! accepted as a document key.

use std::cell::Cell;

use thiserror::Error;
use uuid::{Builder, Uuid};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    #[error("Invalid task ID: expected a UUID like '123e4567-e89b-42d3-a456-426614174000', got '{0}'")]
    Malformed(String),

    #[error("Task ID '{0}' is not in canonical lowercase hyphenated form")]
    NotCanonical(String),
}

/// Renders an id in canonical form
pub fn canonical(id: &Uuid) -> String {
    id.hyphenated().to_string()
}

/// Parses an id, requiring the canonical form
pub fn parse_canonical(s: &str) -> Result<Uuid, IdError> {
    let id = Uuid::try_parse(s).map_err(|_| IdError::Malformed(s.to_string()))?;
    if canonical(&id) != s {
        return Err(IdError::NotCanonical(s.to_string()));
    }
    Ok(id)
}

/// Source of fresh task identifiers
pub trait IdSource {
    fn next_id(&self) -> Uuid;
}

/// Random v4 UUIDs from the OS generator
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIds;

impl IdSource for RandomIds {
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Deterministic v4-shaped UUIDs from a 64-bit seed
///
/// Uses splitmix64 to fill the random bytes, so two sources built from the
/// same seed hand out the same sequence.
#[derive(Debug)]
pub struct SeededIds {
    state: Cell<u64>,
}

impl SeededIds {
    pub fn new(seed: u64) -> Self {
        Self {
            state: Cell::new(seed),
        }
    }

    fn next_u64(&self) -> u64 {
        let next = self.state.get().wrapping_add(0x9E37_79B9_7F4A_7C15);
        self.state.set(next);

        let mut z = next;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

impl IdSource for SeededIds {
    fn next_id(&self) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64().to_be_bytes());
        bytes[8..].copy_from_slice(&self.next_u64().to_be_bytes());
        Builder::from_random_bytes(bytes).into_uuid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_is_lowercase_hyphenated() {
        let id = Uuid::parse_str("A1A2A3A4-B1B2-4C1C-8D1D-E1E2E3E4E5E6").unwrap();
        let s = canonical(&id);
        assert_eq!(s, "a1a2a3a4-b1b2-4c1c-8d1d-e1e2e3e4e5e6");
        assert_eq!(s.len(), 36);
    }

    #[test]
    fn parse_canonical_accepts_canonical() {
        let id = RandomIds.next_id();
        assert_eq!(parse_canonical(&canonical(&id)).unwrap(), id);
    }

    #[test]
    fn parse_canonical_rejects_other_spellings() {
        let id = RandomIds.next_id();
        let upper = canonical(&id).to_uppercase();
        let simple = id.simple().to_string();

        assert!(matches!(parse_canonical(&upper), Err(IdError::NotCanonical(_))));
        assert!(matches!(parse_canonical(&simple), Err(IdError::NotCanonical(_))));
        assert!(matches!(parse_canonical("1"), Err(IdError::Malformed(_))));
    }

    #[test]
    fn seeded_ids_are_reproducible() {
        let a = SeededIds::new(42);
        let b = SeededIds::new(42);

        let first: Vec<_> = (0..5).map(|_| a.next_id()).collect();
        let second: Vec<_> = (0..5).map(|_| b.next_id()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn seeded_ids_are_distinct_v4() {
        let ids = SeededIds::new(7);
        let mut seen = std::collections::HashSet::new();

        for _ in 0..100 {
            let id = ids.next_id();
            assert_eq!(id.get_version_num(), 4);
            assert!(seen.insert(id));
        }
    }
}

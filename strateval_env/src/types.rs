//! Common types for the StratEval environment abstraction.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of one orchestrated run.
///
/// Every message a unit sends carries the id of the run that spawned it, so
/// messages from a superseded run can be recognised and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Creates a new random RunId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a deterministic RunId from a seed and run sequence number.
    pub fn from_seed(seed: u64, sequence: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&seed.to_le_bytes());
        bytes[8..16].copy_from_slice(&sequence.wrapping_mul(0x517cc1b727220a95).to_le_bytes());
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Show first 8 chars for readability
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_ids_differ() {
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_seeded_ids_are_stable() {
        assert_eq!(RunId::from_seed(42, 1), RunId::from_seed(42, 1));
        assert_ne!(RunId::from_seed(42, 1), RunId::from_seed(42, 2));
    }

    #[test]
    fn test_display_is_short() {
        assert_eq!(RunId::new().to_string().len(), 8);
    }
}

//! ID generation utilities.

use uuid::Uuid;

/// Generates a new UUID v7 as a string.
///
/// This is the standard ID format for tabs and requests.
#[must_use]
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// Source of identifiers for tabs and requests.
///
/// Injected wherever new entities are created so that tests can supply
/// deterministic ids.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier.
    fn next_id(&self) -> String;
}

/// Production generator backed by time-ordered UUID v7.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> String {
        generate_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id_format() {
        let id = generate_id();
        // 8-4-4-4-12 = 36 chars
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn test_generator_uniqueness() {
        let ids = UuidV7Generator;
        assert_ne!(ids.next_id(), ids.next_id());
    }
}

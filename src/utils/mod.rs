//! # Utilities Module
//!
//! Small helpers shared across the crate.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Creates the deterministic rng stream for a given seed.
///
/// All generation and scheduling randomness flows through one of these, so
/// a fixed seed reproduces a run exactly.
pub fn create_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Uppercases the first character of a name for message formatting.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_rng_is_deterministic() {
        let mut a = create_rng(42);
        let mut b = create_rng(42);
        let left: Vec<u32> = (0..16).map(|_| a.gen()).collect();
        let right: Vec<u32> = (0..16).map(|_| b.gen()).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("goblin"), "Goblin");
        assert_eq!(capitalize("ogre king"), "Ogre king");
        assert_eq!(capitalize(""), "");
    }
}

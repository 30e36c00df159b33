//! Blink patterns

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ports::EyeState;

/// Required open (`true`) / closed (`false`) state per eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    left: bool,
    right: bool,
}

impl Pattern {
    /// Each eye is drawn independently and uniformly
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            left: rng.random(),
            right: rng.random(),
        }
    }

    pub fn left(&self) -> bool {
        self.left
    }

    pub fn right(&self) -> bool {
        self.right
    }

    /// Whether the tracked eyes perform this pattern
    pub fn matches(&self, eyes: EyeState) -> bool {
        eyes.left == self.left && eyes.right == self.right
    }

    /// The eye state that performs this pattern
    pub fn as_eyes(&self) -> EyeState {
        EyeState::new(self.left, self.right)
    }
}

/// A fresh sequence of `len` patterns
pub fn generate(rng: &mut impl Rng, len: usize) -> Vec<Pattern> {
    (0..len).map(|_| Pattern::random(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_generate_length() {
        let mut rng = Pcg32::seed_from_u64(11);
        assert_eq!(generate(&mut rng, 0).len(), 0);
        assert_eq!(generate(&mut rng, 3).len(), 3);
    }

    #[test]
    fn test_all_four_patterns_occur() {
        let mut rng = Pcg32::seed_from_u64(11);
        let patterns = generate(&mut rng, 400);
        for left in [false, true] {
            for right in [false, true] {
                assert!(
                    patterns.iter().any(|p| p.left() == left && p.right() == right),
                    "missing pattern ({left}, {right})"
                );
            }
        }
    }

    #[test]
    fn test_matches_requires_both_eyes() {
        let mut rng = Pcg32::seed_from_u64(5);
        let pattern = Pattern::random(&mut rng);
        assert!(pattern.matches(pattern.as_eyes()));
        let wrong = EyeState::new(!pattern.left(), pattern.right());
        assert!(!pattern.matches(wrong));
    }
}

//! Name generation — platform identifiers and passenger names.

use std::collections::HashSet;

use rand::Rng;

/// Largest numeric suffix on a platform id.
pub const MAX_PLATFORM_SUFFIX: u32 = 99;

/// Random suffix attempts before falling back to a sequential scan.
const SUFFIX_ATTEMPTS: u32 = 8;

/// Tracks ids handed out within one level so none repeat.
#[derive(Debug, Default)]
pub struct PlatformIdAllocator {
    used: HashSet<String>,
}

impl PlatformIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate a unique human-readable id like `Vega-07`.
    ///
    /// The name token is derived from the arm/platform slot with a small
    /// random offset; the suffix is random in `1..=MAX_PLATFORM_SUFFIX`.
    /// Collisions are retried, then resolved by scanning suffixes, and as a
    /// last resort by embedding the slot indices.
    pub fn allocate(&mut self, arm_index: usize, platform_index: usize, rng: &mut impl Rng) -> String {
        let token_idx =
            (arm_index * 5 + platform_index * 3 + rng.gen_range(0..3)) % PLATFORM_TOKENS.len();
        let token = PLATFORM_TOKENS[token_idx];

        for _ in 0..SUFFIX_ATTEMPTS {
            let candidate = format!("{}-{:02}", token, rng.gen_range(1..=MAX_PLATFORM_SUFFIX));
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }

        for suffix in 1..=MAX_PLATFORM_SUFFIX {
            let candidate = format!("{}-{:02}", token, suffix);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }

        // Slot-qualified ids never match the two-part shape above.
        let mut extra = 0u32;
        loop {
            let candidate = if extra == 0 {
                format!("{}-{}-{}", token, arm_index, platform_index)
            } else {
                format!("{}-{}-{}-{}", token, arm_index, platform_index, extra)
            };
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            extra += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

/// Generate a random passenger name ("Given Family").
pub fn passenger_name(rng: &mut impl Rng) -> String {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];
    format!("{} {}", given, family)
}

static PLATFORM_TOKENS: &[&str] = &[
    "Alpha", "Bravo", "Cygnus", "Draco", "Echo", "Lyra", "Vega", "Orion", "Nova", "Atlas",
    "Sirius", "Rigel", "Kepler", "Halley", "Juno", "Castor", "Pollux", "Deneb", "Altair", "Mira",
];

static GIVEN_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Linda", "David", "Sarah", "Wei", "Yuki", "Aisha", "Pavel",
    "Ingrid", "Carlos", "Fatima", "Kenji", "Olga", "Raj", "Amara", "Dmitri", "Elena", "Hassan",
    "Priya", "Sven", "Zara", "Orion", "Luna", "Cassius", "Thea", "Felix", "Sage", "River",
];

static FAMILY_NAMES: &[&str] = &[
    "Smith", "Johnson", "Brown", "Miller", "Wilson", "Taylor", "Chen", "Nakamura", "Patel",
    "Ivanov", "Mueller", "Garcia", "Kim", "Okonkwo", "Johansson", "Petrov", "Nguyen", "Santos",
    "Singh", "Tanaka", "Volkov", "Park", "O'Brien", "De Silva", "Al-Rashid", "St. Claire",
];

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ids_unique_under_pressure() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut ids = PlatformIdAllocator::new();
        // Far more ids than one token's suffix space forces every fallback.
        let generated: Vec<String> = (0..400).map(|i| ids.allocate(0, i % 2, &mut rng)).collect();
        let unique: HashSet<_> = generated.iter().collect();
        assert_eq!(unique.len(), generated.len());
        assert_eq!(ids.len(), 400);
    }

    #[test]
    fn test_id_shape() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut ids = PlatformIdAllocator::new();
        let id = ids.allocate(1, 2, &mut rng);
        let (token, suffix) = id.split_once('-').unwrap();
        assert!(PLATFORM_TOKENS.contains(&token));
        let n: u32 = suffix.parse().unwrap();
        assert!((1..=MAX_PLATFORM_SUFFIX).contains(&n));
    }

    #[test]
    fn test_passenger_name_variety() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let names: HashSet<String> = (0..100).map(|_| passenger_name(&mut rng)).collect();
        assert!(names.len() > 30);
        assert!(names.iter().all(|n| n.contains(' ')));
    }
}

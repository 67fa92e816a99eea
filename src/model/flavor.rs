//! Cosmetic text: names, thoughts, and fork inscriptions.
//!
//! Both providers are immutable once built. The name pool is shuffled exactly once at
//! construction and then handed out front to back, so two tables built from the same
//! config never share mutable state.

use crate::config::FlavorConfig;
use rand::seq::SliceRandom;
use rand::Rng;

/// Raised when a table asks for more names than the pool holds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlavorError {
    #[error("need {needed} distinct names but the pool only has {available}")]
    NotEnoughNames { needed: usize, available: usize },
}

/// A pre-shuffled sequence of distinct names.
#[derive(Debug, Clone)]
pub struct NamePool {
    names: Vec<String>,
}

impl NamePool {
    /// Deduplicates `names` (first occurrence wins) and shuffles the result once.
    pub fn shuffled(names: &[String], rng: &mut impl Rng) -> Self {
        let mut distinct: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            if !distinct.contains(name) {
                distinct.push(name.clone());
            }
        }
        distinct.shuffle(rng);
        Self { names: distinct }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The first `count` names of the shuffled sequence.
    ///
    /// # Errors
    ///
    /// [`FlavorError::NotEnoughNames`] if the pool is smaller than `count`.
    pub fn reserve(&self, count: usize) -> Result<Vec<String>, FlavorError> {
        if count > self.names.len() {
            return Err(FlavorError::NotEnoughNames {
                needed: count,
                available: self.names.len(),
            });
        }
        Ok(self.names[..count].to_vec())
    }
}

/// Thoughts and inscriptions, sampled with replacement.
#[derive(Debug, Clone)]
pub struct Flavor {
    thoughts: Vec<String>,
    inscriptions: Vec<String>,
}

impl Flavor {
    pub fn from_config(config: &FlavorConfig) -> Self {
        Self {
            thoughts: config.thoughts.clone(),
            inscriptions: config.inscriptions.clone(),
        }
    }

    pub fn thought(&self, rng: &mut impl Rng) -> &str {
        self.thoughts
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("nothing in particular")
    }

    pub fn inscription(&self, rng: &mut impl Rng) -> &str {
        self.inscriptions
            .choose(rng)
            .map(String::as_str)
            .unwrap_or("")
    }
}

impl Default for Flavor {
    fn default() -> Self {
        Self::from_config(&FlavorConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reserve_hands_out_distinct_names() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = NamePool::shuffled(&names(&["A", "B", "C", "B", "A"]), &mut rng);
        assert_eq!(pool.len(), 3);

        let mut picked = pool.reserve(3).unwrap();
        picked.sort();
        assert_eq!(picked, names(&["A", "B", "C"]));
    }

    #[test]
    fn exhausted_pool_fails_fast() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let pool = NamePool::shuffled(&names(&["A", "B"]), &mut rng);
        assert_eq!(
            pool.reserve(3),
            Err(FlavorError::NotEnoughNames {
                needed: 3,
                available: 2
            })
        );
    }

    #[test]
    fn shuffle_is_seeded() {
        let source = FlavorConfig::default().names;
        let a = NamePool::shuffled(&source, &mut ChaCha8Rng::seed_from_u64(5));
        let b = NamePool::shuffled(&source, &mut ChaCha8Rng::seed_from_u64(5));
        assert_eq!(a.reserve(7).unwrap(), b.reserve(7).unwrap());
    }

    #[test]
    fn samples_come_from_the_pools() {
        let flavor = Flavor::default();
        let config = FlavorConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for _ in 0..20 {
            let thought = flavor.thought(&mut rng);
            assert!(config.thoughts.iter().any(|t| t == thought));
            let inscription = flavor.inscription(&mut rng);
            assert!(config.inscriptions.iter().any(|i| i == inscription));
        }
    }
}

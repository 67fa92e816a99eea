//! # Table Configuration
//!
//! Everything that shapes a dinner but not its rules: how many seats, how long the
//! philosophers dawdle, which names and inscriptions are on offer, and the RNG seed.
//!
//! Configuration is plain data. It is loaded once (from JSON, or built in code),
//! validated, and then handed to [`RoundTable::from_config`](crate::table::RoundTable::from_config).
//! Nothing in here is mutated after the table is set.
//!
//! ```json
//! {
//!   "seats": 5,
//!   "seed": 42,
//!   "pacing": { "min_activity_ms": 500, "max_activity_ms": 1000, "reaction_ms": 200 }
//! }
//! ```
//!
//! Missing fields fall back to [`TableConfig::default`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Smallest table that still forms a cycle.
pub const MIN_SEATS: usize = 2;

/// Errors raised while loading or validating a [`TableConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Number of philosophers (and forks).
    pub seats: usize,

    /// Seed for every random choice. `None` draws one from the OS.
    pub seed: Option<u64>,

    pub pacing: PacingConfig,

    pub flavor: FlavorConfig,

    /// Capacity of the narration channel. Philosophers wait when it is full.
    pub narration_buffer: usize,
}

/// Simulated durations, in milliseconds.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Lower bound of a think / inspect / eat period.
    pub min_activity_ms: u64,

    /// Upper bound (exclusive) of a think / inspect / eat period.
    pub max_activity_ms: u64,

    /// Pause between two acquisition rounds.
    pub reaction_ms: u64,
}

/// Cosmetic text pools. None of it influences the algorithm.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FlavorConfig {
    pub names: Vec<String>,
    pub thoughts: Vec<String>,
    pub inscriptions: Vec<String>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seats: 5,
            seed: None,
            pacing: PacingConfig::default(),
            flavor: FlavorConfig::default(),
            narration_buffer: 64,
        }
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_activity_ms: 500,
            max_activity_ms: 1000,
            // roughly a human visual reaction time
            reaction_ms: 200,
        }
    }
}

impl Default for FlavorConfig {
    fn default() -> Self {
        Self {
            names: to_strings(&[
                "James", "David", "John", "Daniel", "Ronald", "Kevin", "Steven",
            ]),
            thoughts: to_strings(&[
                "Reactive streams",
                "Programming",
                "Why people don't want to learn Haskell",
                "Why the Answer to the Ultimate Question of Life, the Universe, and Everything is 42",
                "Is Linux the best OS for programmers?",
                "Functional vs OOP way",
                "Is Prolog dead?",
                "Wave-particle duality",
            ]),
            inscriptions: to_strings(&[
                "Just a nice fork",
                "Made in China",
                "Use it for eating food only",
                "Alex was here...",
                "Created by Socrates only for other philosophers",
            ]),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl TableConfig {
    /// Default configuration with a different table size.
    pub fn with_seats(seats: usize) -> Self {
        Self {
            seats,
            ..Self::default()
        }
    }

    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Checks the invariants the table relies on.
    ///
    /// The name pool must cover every seat; a short pool is rejected here rather
    /// than handing out duplicate or placeholder names later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seats < MIN_SEATS {
            return Err(ConfigError::Invalid(format!(
                "a table needs at least {MIN_SEATS} seats, got {}",
                self.seats
            )));
        }
        if self.pacing.min_activity_ms > self.pacing.max_activity_ms {
            return Err(ConfigError::Invalid(format!(
                "min_activity_ms ({}) exceeds max_activity_ms ({})",
                self.pacing.min_activity_ms, self.pacing.max_activity_ms
            )));
        }
        if self.narration_buffer == 0 {
            return Err(ConfigError::Invalid(
                "narration_buffer must be positive".into(),
            ));
        }
        if self.flavor.thoughts.is_empty() {
            return Err(ConfigError::Invalid("no thoughts to think about".into()));
        }
        if self.flavor.inscriptions.is_empty() {
            return Err(ConfigError::Invalid("no fork inscriptions".into()));
        }
        let available = distinct_count(&self.flavor.names);
        if available < self.seats {
            return Err(ConfigError::Invalid(format!(
                "{} seats but only {available} distinct names",
                self.seats
            )));
        }
        Ok(())
    }

    /// The table-wide RNG. Seeded when `seed` is set, from OS entropy otherwise.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

fn distinct_count(names: &[String]) -> usize {
    let mut seen: Vec<&String> = names.iter().collect();
    seen.sort();
    seen.dedup();
    seen.len()
}

impl PacingConfig {
    /// Length of one simulated activity (thinking, reading, eating).
    pub fn activity(&self, rng: &mut impl Rng) -> Duration {
        let millis = if self.max_activity_ms > self.min_activity_ms {
            rng.gen_range(self.min_activity_ms..self.max_activity_ms)
        } else {
            self.min_activity_ms
        };
        Duration::from_millis(millis)
    }

    /// Pause before the next acquisition round.
    pub fn reaction(&self) -> Duration {
        Duration::from_millis(self.reaction_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = TableConfig::default();
        assert_eq!(config.seats, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            TableConfig::from_json_str(r#"{ "seats": 3, "pacing": { "reaction_ms": 10 } }"#)
                .unwrap();
        assert_eq!(config.seats, 3);
        assert_eq!(config.pacing.reaction_ms, 10);
        assert_eq!(config.pacing.min_activity_ms, 500);
        assert_eq!(config.flavor.names.len(), 7);
    }

    #[test]
    fn rejects_single_seat() {
        let err = TableConfig::with_seats(1).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_more_seats_than_names() {
        let err = TableConfig::with_seats(8).validate().unwrap_err();
        assert!(err.to_string().contains("7 distinct names"));
    }

    #[test]
    fn duplicate_names_do_not_count_twice() {
        let mut config = TableConfig::with_seats(3);
        config.flavor.names = to_strings(&["Ada", "Ada", "Alan"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_inverted_pacing() {
        let mut config = TableConfig::default();
        config.pacing.min_activity_ms = 10;
        config.pacing.max_activity_ms = 5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = TableConfig::from_json_str("{ seats: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = TableConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn activity_stays_in_bounds() {
        let pacing = PacingConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..100 {
            let d = pacing.activity(&mut rng);
            assert!(d >= Duration::from_millis(500) && d < Duration::from_millis(1000));
        }
    }

    #[test]
    fn degenerate_pacing_is_fixed() {
        let pacing = PacingConfig {
            min_activity_ms: 0,
            max_activity_ms: 0,
            reaction_ms: 0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(pacing.activity(&mut rng), Duration::ZERO);
    }

    #[test]
    fn same_seed_same_rng() {
        let mut config = TableConfig::default();
        config.seed = Some(99);
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}

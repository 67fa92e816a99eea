use super::error::TableError;
use crate::config::{TableConfig, MIN_SEATS};
use crate::fork::Fork;
use crate::model::{Flavor, NamePool};
use crate::philosopher::{Philosopher, Placement, StateCell};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::info;

/// Seat to the left of `seat` on a table of `seats`.
pub fn left_of(seat: usize, seats: usize) -> usize {
    (seat + seats - 1) % seats
}

/// Seat to the right of `seat` on a table of `seats`.
pub fn right_of(seat: usize, seats: usize) -> usize {
    (seat + 1) % seats
}

/// N forks, N philosophers, and the cycle that binds them.
///
/// For seat `i` of `n`:
///
/// | reference | index |
/// |---|---|
/// | left fork | `i` |
/// | right fork | `(i + 1) mod n` |
/// | left neighbour | `(i - 1) mod n` |
/// | right neighbour | `(i + 1) mod n` |
///
/// so every fork is reachable from exactly two adjacent seats.
#[derive(Debug, Default)]
pub struct RoundTable {
    forks: Vec<Arc<Fork>>,
    philosophers: Vec<Philosopher>,
}

impl RoundTable {
    /// A table of `seats` with the default configuration.
    pub fn build(seats: usize) -> Result<Self, TableError> {
        Self::from_config(&TableConfig::with_seats(seats))
    }

    /// Lays the table described by `config`.
    ///
    /// The topology depends on `config.seats` only. The seed decides names,
    /// inscriptions, and each philosopher's private RNG.
    ///
    /// # Errors
    ///
    /// - [`TableError::TooFewSeats`] for fewer than two seats.
    /// - [`TableError::Flavor`] when the name pool cannot cover every seat.
    pub fn from_config(config: &TableConfig) -> Result<Self, TableError> {
        let seats = config.seats;
        if seats < MIN_SEATS {
            return Err(TableError::TooFewSeats(seats));
        }

        let mut rng = config.rng();
        let names = NamePool::shuffled(&config.flavor.names, &mut rng).reserve(seats)?;
        let flavor = Arc::new(Flavor::from_config(&config.flavor));

        let forks: Vec<Arc<Fork>> = (0..seats)
            .map(|index| Arc::new(Fork::new(index, flavor.inscription(&mut rng))))
            .collect();
        let cells: Vec<Arc<StateCell>> = (0..seats)
            .map(|_| Arc::new(StateCell::default()))
            .collect();

        let philosophers = names
            .into_iter()
            .enumerate()
            .map(|(seat, name)| {
                let placement = Placement {
                    seat,
                    name,
                    published: Arc::clone(&cells[seat]),
                    left_fork: Arc::clone(&forks[seat]),
                    right_fork: Arc::clone(&forks[right_of(seat, seats)]),
                    left_neighbor: Arc::clone(&cells[left_of(seat, seats)]),
                    right_neighbor: Arc::clone(&cells[right_of(seat, seats)]),
                };
                let own_rng = ChaCha8Rng::seed_from_u64(rng.gen());
                Philosopher::new(placement, Arc::clone(&flavor), config.pacing, own_rng)
            })
            .collect();

        info!(seats, seed = ?config.seed, "Table laid");
        Ok(Self {
            forks,
            philosophers,
        })
    }

    pub fn len(&self) -> usize {
        self.forks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forks.is_empty()
    }

    pub fn forks(&self) -> &[Arc<Fork>] {
        &self.forks
    }

    /// Philosophers still seated. Empty once [`take_philosophers`](Self::take_philosophers) ran.
    pub fn philosophers(&self) -> &[Philosopher] {
        &self.philosophers
    }

    /// Moves the philosophers out so they can be run; the forks stay with the table.
    pub fn take_philosophers(&mut self) -> Vec<Philosopher> {
        std::mem::take(&mut self.philosophers)
    }

    /// Drops every fork and philosopher reference the table holds.
    ///
    /// Running philosophers keep their own `Arc`s; stopping them is the dinner's job.
    pub fn clear(&mut self) {
        self.philosophers.clear();
        self.forks.clear();
    }
}

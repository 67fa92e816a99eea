//! Philosopher states and the cell they are published through.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

/// One step of the dining cycle.
///
/// The cycle is strict: `Think -> Acquiring -> Inspecting -> Eating -> Releasing -> Think`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum State {
    Think = 0,
    Acquiring = 1,
    Inspecting = 2,
    Eating = 3,
    Releasing = 4,
}

impl State {
    /// The state that follows this one.
    pub fn next(self) -> Self {
        match self {
            State::Think => State::Acquiring,
            State::Acquiring => State::Inspecting,
            State::Inspecting => State::Eating,
            State::Eating => State::Releasing,
            State::Releasing => State::Think,
        }
    }
}

impl TryFrom<u8> for State {
    type Error = u8;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0 => Ok(State::Think),
            1 => Ok(State::Acquiring),
            2 => Ok(State::Inspecting),
            3 => Ok(State::Eating),
            4 => Ok(State::Releasing),
            other => Err(other),
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            State::Think => "THINK",
            State::Acquiring => "ACQUIRING",
            State::Inspecting => "INSPECTING",
            State::Eating => "EATING",
            State::Releasing => "RELEASING",
        };
        f.write_str(label)
    }
}

/// A philosopher's last self-reported state.
///
/// Single writer (the philosopher), many readers (its two neighbours). Reads never
/// block and may be stale; neighbours only use the value as a hint.
#[derive(Debug)]
pub struct StateCell(AtomicU8);

impl StateCell {
    pub fn new(initial: State) -> Self {
        Self(AtomicU8::new(initial as u8))
    }

    pub fn publish(&self, state: State) {
        self.0.store(state as u8, Ordering::Release);
    }

    pub fn load(&self) -> State {
        let raw = self.0.load(Ordering::Acquire);
        // only `publish` writes the cell
        State::try_from(raw).unwrap_or_else(|raw| unreachable!("state cell holds {raw}"))
    }
}

impl Default for StateCell {
    fn default() -> Self {
        Self::new(State::Think)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_returns_to_think() {
        let mut state = State::Think;
        let mut seen = vec![state];
        for _ in 0..5 {
            state = state.next();
            seen.push(state);
        }
        assert_eq!(
            seen,
            vec![
                State::Think,
                State::Acquiring,
                State::Inspecting,
                State::Eating,
                State::Releasing,
                State::Think
            ]
        );
    }

    #[test]
    fn raw_round_trip_and_rejection() {
        for state in [State::Think, State::Eating, State::Releasing] {
            assert_eq!(State::try_from(state as u8), Ok(state));
        }
        assert_eq!(State::try_from(9), Err(9));
    }

    #[test]
    fn cell_shows_latest_publication() {
        let cell = StateCell::default();
        assert_eq!(cell.load(), State::Think);
        cell.publish(State::Eating);
        assert_eq!(cell.load(), State::Eating);
    }
}

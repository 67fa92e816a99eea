//! Narration events and where they go.
//!
//! Philosophers describe what they are doing through a [`NarrationSink`]. The dinner
//! plugs in the sender half of a bounded `mpsc` channel; tests plug in a
//! [`Transcript`].

use crate::fork::Side;
use crate::philosopher::State;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tokio::sync::mpsc;

/// What happened, in machine-readable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    ThinkStarted,
    FirstForkTaken(Side),
    ReachingForOther(Side),
    BothForksTaken,
    SecondForkTaken(Side),
    /// The held fork on this side is about to be put back without eating.
    ForcedRelease(Side),
    InscriptionRead(Side),
    EatingStarted,
    /// Both forks are about to be put back after a meal.
    ForksReturned,
}

/// One line of table talk.
#[derive(Debug, Clone)]
pub struct Narration {
    pub seat: usize,
    pub philosopher: String,
    /// The state-machine state the speaker was in, not its published state.
    pub state: State,
    pub milestone: Milestone,
    pub message: String,
    pub at: SystemTime,
}

/// Destination of narration events.
#[async_trait]
pub trait NarrationSink: Send + Sync {
    /// Delivers one event. Delivery failures (the listener went away) are ignored.
    async fn emit(&self, narration: Narration);
}

#[async_trait]
impl NarrationSink for mpsc::Sender<Narration> {
    async fn emit(&self, narration: Narration) {
        // A closed channel means the dinner is shutting down.
        let _ = self.send(narration).await;
    }
}

/// In-memory sink that keeps every event in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<Narration>>>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    pub fn lines(&self) -> Vec<Narration> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    pub fn milestones(&self) -> Vec<Milestone> {
        self.lines().into_iter().map(|n| n.milestone).collect()
    }
}

#[async_trait]
impl NarrationSink for Transcript {
    async fn emit(&self, narration: Narration) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(narration);
        }
    }
}

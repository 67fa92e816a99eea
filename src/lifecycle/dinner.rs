use super::error::DinnerError;
use crate::model::Narration;
use crate::philosopher::{DinerContext, DinerSummary, PhilosopherError};
use crate::table::RoundTable;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{error, info};

/// What every philosopher reported when the dinner ended.
#[derive(Debug, Clone, Default)]
pub struct DinnerReport {
    pub diners: Vec<DinerSummary>,
}

impl DinnerReport {
    pub fn total_meals(&self) -> u64 {
        self.diners.iter().map(|d| d.meals).sum()
    }
}

struct Diner {
    seat: usize,
    handle: JoinHandle<Result<DinerSummary, PhilosopherError>>,
}

/// The orchestrator of one simulation run.
///
/// `Dinner` is responsible for:
/// - **Launch**: one Tokio task per philosopher, each with an injected [`DinerContext`].
/// - **Narration**: every philosopher writes into one bounded channel; [`Dinner::next`]
///   yields the merged stream. Each philosopher's own events stay in order.
/// - **Shutdown**: cooperative cancellation, then a join that checks no fork was left
///   held.
///
/// A philosopher that fails or panics cancels the whole dinner: a broken fork contract
/// means the table's invariants no longer hold. Dropping the `Dinner` without joining
/// cancels it as well; the philosophers then leave on their own, forks returned.
///
/// # Example
///
/// ```rust
/// use round_table::lifecycle::Dinner;
/// use round_table::table::RoundTable;
///
/// #[tokio::main(flavor = "current_thread", start_paused = true)]
/// async fn main() {
///     let mut dinner = Dinner::run(RoundTable::build(5).unwrap(), 16);
///     let first = dinner.next().await.unwrap();
///     println!("{}: {}", first.philosopher, first.message);
///
///     let report = dinner.shutdown().await.unwrap();
///     assert_eq!(report.diners.len(), 5);
/// }
/// ```
pub struct Dinner {
    table: RoundTable,
    narration: mpsc::Receiver<Narration>,
    cancel: CancellationToken,
    diners: Vec<Diner>,
    _cancel_on_drop: DropGuard,
}

impl Dinner {
    /// Starts every philosopher on `table`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn run(mut table: RoundTable, narration_buffer: usize) -> Self {
        let (mouth, narration) = mpsc::channel(narration_buffer.max(1));
        let cancel = CancellationToken::new();
        let ctx = DinerContext::new(Arc::new(mouth), cancel.clone());

        let diners: Vec<Diner> = table
            .take_philosophers()
            .into_iter()
            .map(|philosopher| {
                let seat = philosopher.seat();
                let ctx = ctx.clone();
                // Fires on error and on panic; disarmed only on a clean exit.
                let abort_dinner = ctx.cancel.clone().drop_guard();
                let handle = tokio::spawn(async move {
                    let outcome = philosopher.dine(ctx).await;
                    match &outcome {
                        Ok(_) => {
                            let _ = abort_dinner.disarm();
                        }
                        Err(e) => error!(seat, error = %e, "Philosopher failed, stopping the dinner"),
                    }
                    outcome
                });
                Diner { seat, handle }
            })
            .collect();

        info!(seats = diners.len(), "Dinner started");
        let _cancel_on_drop = cancel.clone().drop_guard();
        Self {
            table,
            narration,
            cancel,
            diners,
            _cancel_on_drop,
        }
    }

    /// Next narration event from any philosopher.
    ///
    /// Returns `None` once every philosopher has stopped and the backlog is drained.
    pub async fn next(&mut self) -> Option<Narration> {
        self.narration.recv().await
    }

    /// Token shared with every philosopher. Cancelled on shutdown or on a fatal failure.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Asks every philosopher to leave at its next safe point.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn table(&self) -> &RoundTable {
        &self.table
    }

    /// Waits for every philosopher to stop, without asking them to.
    ///
    /// Keep consuming [`next`](Self::next) elsewhere or call [`shutdown`](Self::shutdown)
    /// instead; a full narration channel stalls the philosophers.
    ///
    /// # Errors
    ///
    /// The first failure in seat order, or [`DinnerError::ForkAbandoned`] if a fork is
    /// still held after every task ended.
    pub async fn join(mut self) -> Result<DinnerReport, DinnerError> {
        let mut report = DinnerReport::default();
        let mut failure = None;

        for Diner { seat, handle } in std::mem::take(&mut self.diners) {
            match handle.await {
                Ok(Ok(summary)) => report.diners.push(summary),
                Ok(Err(source)) => {
                    failure.get_or_insert(DinnerError::Philosopher { seat, source });
                }
                Err(e) => {
                    error!(seat, error = %e, "Philosopher task failed");
                    self.cancel.cancel();
                    failure.get_or_insert(DinnerError::TaskFailed {
                        seat,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if let Some(failure) = failure {
            return Err(failure);
        }
        if let Some(fork) = self.table.forks().iter().find(|f| f.is_held()) {
            return Err(DinnerError::ForkAbandoned(fork.index()));
        }

        self.table.clear();
        info!(meals = report.total_meals(), "Dinner over");
        Ok(report)
    }

    /// Cancels the dinner and waits for every philosopher to leave.
    ///
    /// The narration channel is closed first so nobody blocks on a full buffer.
    pub async fn shutdown(mut self) -> Result<DinnerReport, DinnerError> {
        info!("Shutting down dinner...");
        self.cancel();
        self.narration.close();
        self.join().await
    }
}

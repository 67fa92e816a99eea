//! # Round Table CLI
//!
//! Lays a table, lets the philosophers dine, and prints what they say until Ctrl+C
//! (or `--duration`) ends the evening.
//!
//! ```bash
//! RUST_LOG=info cargo run -- --seats 5 --seed 42
//! ```

use clap::Parser;
use round_table::config::TableConfig;
use round_table::lifecycle::{setup_tracing, Dinner};
use round_table::model::Narration;
use round_table::table::RoundTable;
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "round-table")]
#[command(about = "Dining philosophers with non-blocking forks")]
struct Cli {
    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of philosophers (overrides the config file)
    #[arg(long, env = "DINNER_SEATS")]
    seats: Option<usize>,

    /// RNG seed for names, inscriptions, and pacing
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many seconds instead of waiting for Ctrl+C
    #[arg(long)]
    duration: Option<u64>,
}

impl Cli {
    fn table_config(&self) -> Result<TableConfig, String> {
        let mut config = match &self.config {
            Some(path) => TableConfig::from_json_file(path).map_err(|e| e.to_string())?,
            None => TableConfig::default(),
        };
        if let Some(seats) = self.seats {
            config.seats = seats;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }
}

fn print(line: &Narration) {
    info!(philosopher = %line.philosopher, "{}", line.message);
}

/// Why the narration loop stopped.
#[derive(Debug, PartialEq, Eq)]
enum Ending {
    Interrupted,
    TimeUp,
    Aborted,
    Finished,
}

/// Prints narration until `interrupt` resolves, `duration` elapses, or the dinner ends.
///
/// Both stop futures are created once and polled across iterations, so a signal that
/// lands while a line is being printed is still seen.
async fn narrate_until(
    dinner: &mut Dinner,
    interrupt: impl Future<Output = ()>,
    duration: Option<Duration>,
) -> Ending {
    let aborted = dinner.cancellation();
    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending().await,
        }
    };
    tokio::pin!(interrupt);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            line = dinner.next() => match line {
                Some(line) => print(&line),
                None => return Ending::Finished,
            },
            _ = &mut interrupt => return Ending::Interrupted,
            _ = &mut deadline => return Ending::TimeUp,
            _ = aborted.cancelled() => return Ending::Aborted,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();
    let cli = Cli::parse();
    let config = cli.table_config()?;

    let table = RoundTable::from_config(&config).map_err(|e| e.to_string())?;
    let mut dinner = Dinner::run(table, config.narration_buffer);

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Cannot listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    match narrate_until(&mut dinner, ctrl_c, cli.duration.map(Duration::from_secs)).await {
        Ending::Interrupted => info!("Received Ctrl+C"),
        Ending::TimeUp => info!("Time is up"),
        Ending::Aborted | Ending::Finished => {}
    }

    match dinner.shutdown().await {
        Ok(report) => {
            for diner in &report.diners {
                info!(
                    seat = diner.seat,
                    name = %diner.name,
                    meals = diner.meals,
                    retreats = diner.retreats,
                    "Summary"
                );
            }
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Dinner aborted");
            Err(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn interrupt_is_seen_while_narration_keeps_flowing() {
        let mut dinner = Dinner::run(RoundTable::build(3).unwrap(), 4);
        let started = Instant::now();

        // Lines arrive far more often than every two seconds.
        let interrupt = tokio::time::sleep(Duration::from_secs(2));
        let ending = narrate_until(&mut dinner, interrupt, None).await;

        assert_eq!(ending, Ending::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(3));
        dinner.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_ends_the_evening() {
        let mut dinner = Dinner::run(RoundTable::build(3).unwrap(), 4);
        let ending = narrate_until(
            &mut dinner,
            std::future::pending(),
            Some(Duration::from_secs(5)),
        )
        .await;

        assert_eq!(ending, Ending::TimeUp);
        dinner.shutdown().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_dinner_stops_the_loop() {
        let mut dinner = Dinner::run(RoundTable::build(3).unwrap(), 4);
        dinner.cancel();
        let ending = narrate_until(&mut dinner, std::future::pending(), None).await;

        assert!(matches!(ending, Ending::Aborted | Ending::Finished));
        dinner.shutdown().await.unwrap();
    }
}

//! The philosopher's state machine and fork acquisition algorithm.

use super::error::PhilosopherError;
use super::state::{State, StateCell};
use crate::config::PacingConfig;
use crate::fork::{Fork, ForkHandle, Side};
use crate::model::{Flavor, Milestone, Narration, NarrationSink};
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::SystemTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

/// Dependencies injected when the dinner starts rather than when the table is laid.
#[derive(Clone)]
pub struct DinerContext {
    /// Where narration goes.
    pub mouth: Arc<dyn NarrationSink>,
    /// Shared stop signal, checked on entering THINK and before every acquisition round.
    pub cancel: CancellationToken,
}

impl DinerContext {
    pub fn new(mouth: Arc<dyn NarrationSink>, cancel: CancellationToken) -> Self {
        Self { mouth, cancel }
    }
}

/// Where a philosopher sits and what it can reach from there.
#[derive(Debug, Clone)]
pub struct Placement {
    pub seat: usize,
    pub name: String,
    /// The philosopher's own published state.
    pub published: Arc<StateCell>,
    pub left_fork: Arc<Fork>,
    pub right_fork: Arc<Fork>,
    /// Published state of the philosopher on the left.
    pub left_neighbor: Arc<StateCell>,
    /// Published state of the philosopher on the right.
    pub right_neighbor: Arc<StateCell>,
}

/// Both forks, held.
#[derive(Debug)]
pub struct ForkPair {
    left: ForkHandle,
    right: ForkHandle,
}

impl ForkPair {
    fn from_sides(held: Side, first: ForkHandle, second: ForkHandle) -> Self {
        match held {
            Side::Left => Self {
                left: first,
                right: second,
            },
            Side::Right => Self {
                left: second,
                right: first,
            },
        }
    }

    pub fn left(&self) -> &ForkHandle {
        &self.left
    }

    pub fn right(&self) -> &ForkHandle {
        &self.right
    }
}

/// Outcome of one acquisition round.
#[derive(Debug)]
pub enum Round {
    /// Both forks are held; the philosopher may eat.
    Seated(ForkPair),
    /// One fork was picked up and put back again; the value is the side it was on.
    Retreated(Side),
    /// Neither fork was free.
    Empty,
}

/// What a philosopher reports when it leaves the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DinerSummary {
    pub seat: usize,
    pub name: String,
    pub meals: u64,
    pub retreats: u64,
}

/// One diner: a state machine over two shared forks.
///
/// # Acquisition
///
/// Forks are only ever *tried*, never waited for. A round picks up whatever is free:
///
/// - both forks: done;
/// - one fork: think for a moment while holding it, then look at the neighbour on the
///   other side. If that neighbour's published state is THINK, try the second fork
///   once. Otherwise, or if the try fails, put the first fork back;
/// - no fork: nothing to undo.
///
/// Failed rounds are followed by a short reaction pause and another round. Putting the
/// first fork back is what breaks the circular wait. The neighbour's state is only a
/// hint; the fork's own atomic flag is what keeps two philosophers off one fork.
#[derive(Debug)]
pub struct Philosopher {
    seat: usize,
    name: String,
    state: State,
    published: Arc<StateCell>,
    left_fork: Arc<Fork>,
    right_fork: Arc<Fork>,
    left_neighbor: Arc<StateCell>,
    right_neighbor: Arc<StateCell>,
    flavor: Arc<Flavor>,
    pacing: PacingConfig,
    rng: ChaCha8Rng,
    meals: u64,
    retreats: u64,
}

impl Philosopher {
    pub fn new(
        placement: Placement,
        flavor: Arc<Flavor>,
        pacing: PacingConfig,
        rng: ChaCha8Rng,
    ) -> Self {
        placement.published.publish(State::Think);
        Self {
            seat: placement.seat,
            name: placement.name,
            state: State::Think,
            published: placement.published,
            left_fork: placement.left_fork,
            right_fork: placement.right_fork,
            left_neighbor: placement.left_neighbor,
            right_neighbor: placement.right_neighbor,
            flavor,
            pacing,
            rng,
            meals: 0,
            retreats: 0,
        }
    }

    pub fn seat(&self) -> usize {
        self.seat
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state-machine state.
    pub fn state(&self) -> State {
        self.state
    }

    pub fn published(&self) -> &Arc<StateCell> {
        &self.published
    }

    pub fn left_fork(&self) -> &Arc<Fork> {
        &self.left_fork
    }

    pub fn right_fork(&self) -> &Arc<Fork> {
        &self.right_fork
    }

    pub fn left_neighbor(&self) -> &Arc<StateCell> {
        &self.left_neighbor
    }

    pub fn right_neighbor(&self) -> &Arc<StateCell> {
        &self.right_neighbor
    }

    pub fn meals(&self) -> u64 {
        self.meals
    }

    pub fn retreats(&self) -> u64 {
        self.retreats
    }

    pub fn summary(&self) -> DinerSummary {
        DinerSummary {
            seat: self.seat,
            name: self.name.clone(),
            meals: self.meals,
            retreats: self.retreats,
        }
    }

    /// Runs the dining cycle until `ctx.cancel` fires.
    ///
    /// Cancellation is honoured on entering THINK and before each acquisition round,
    /// so a philosopher never leaves with a fork in hand.
    ///
    /// # Errors
    ///
    /// [`PhilosopherError::ForkContract`] if putting a fork back fails.
    pub async fn dine(mut self, ctx: DinerContext) -> Result<DinerSummary, PhilosopherError> {
        info!(seat = self.seat, name = %self.name, "Seated");

        while !ctx.cancel.is_cancelled() {
            self.think(&ctx).await;
            let Some(forks) = self.acquire(&ctx).await? else {
                break;
            };
            self.inspect(&ctx).await;
            self.eat(&ctx).await;
            self.release(&ctx, forks).await?;
        }

        info!(
            seat = self.seat,
            name = %self.name,
            meals = self.meals,
            retreats = self.retreats,
            "Left the table"
        );
        Ok(self.summary())
    }

    /// THINK: publish, muse, dawdle.
    pub async fn think(&mut self, ctx: &DinerContext) {
        self.enter(State::Think);
        self.muse(ctx).await;
    }

    /// ACQUIRING: rounds until both forks are held, or `None` once cancelled.
    async fn acquire(
        &mut self,
        ctx: &DinerContext,
    ) -> Result<Option<ForkPair>, PhilosopherError> {
        loop {
            if ctx.cancel.is_cancelled() {
                debug!(seat = self.seat, name = %self.name, "Cancelled while hungry");
                return Ok(None);
            }
            match self.acquisition_round(ctx).await? {
                Round::Seated(forks) => return Ok(Some(forks)),
                Round::Retreated(_) | Round::Empty => {
                    tokio::time::sleep(self.pacing.reaction()).await;
                }
            }
        }
    }

    /// One round of the acquisition algorithm. Leaves the philosopher in ACQUIRING.
    ///
    /// # Errors
    ///
    /// [`PhilosopherError::ForkContract`] if the retreat's release fails.
    pub async fn acquisition_round(
        &mut self,
        ctx: &DinerContext,
    ) -> Result<Round, PhilosopherError> {
        self.enter(State::Acquiring);

        let left = self.left_fork.take();
        let right = self.right_fork.take();

        match (left, right) {
            (Some(left), Some(right)) => {
                self.say(
                    ctx,
                    Milestone::BothForksTaken,
                    "I took both left and right forks".into(),
                )
                .await;
                Ok(Round::Seated(ForkPair { left, right }))
            }
            (Some(first), None) => self.contend(ctx, Side::Left, first).await,
            (None, Some(first)) => self.contend(ctx, Side::Right, first).await,
            (None, None) => {
                trace!(seat = self.seat, "Both forks busy");
                Ok(Round::Empty)
            }
        }
    }

    /// Holding exactly one fork: decide between the second fork and a retreat.
    async fn contend(
        &mut self,
        ctx: &DinerContext,
        held: Side,
        first: ForkHandle,
    ) -> Result<Round, PhilosopherError> {
        self.say(
            ctx,
            Milestone::FirstForkTaken(held),
            format!("I took the first {held} fork"),
        )
        .await;

        // Publishes THINK while `first` is still held.
        self.muse(ctx).await;

        let other = held.opposite();
        self.say(
            ctx,
            Milestone::ReachingForOther(other),
            "Trying to take the other fork...".into(),
        )
        .await;

        let neighbour = self.neighbor(other).load();
        let second = if neighbour == State::Think {
            self.fork(other).take()
        } else {
            None
        };

        match second {
            Some(second) => {
                self.say(
                    ctx,
                    Milestone::SecondForkTaken(other),
                    format!("I took the second {other} fork"),
                )
                .await;
                Ok(Round::Seated(ForkPair::from_sides(held, first, second)))
            }
            None => {
                let reason = if neighbour == State::Think {
                    "the other fork is in use".to_string()
                } else {
                    format!("my {other} neighbour is {neighbour}")
                };
                debug!(
                    seat = self.seat,
                    name = %self.name,
                    side = %held,
                    %neighbour,
                    "Putting the first fork back"
                );
                self.say(
                    ctx,
                    Milestone::ForcedRelease(held),
                    format!("I'll return the first {held} fork because {reason}"),
                )
                .await;
                self.put_back(held, first)?;
                self.retreats += 1;
                Ok(Round::Retreated(held))
            }
        }
    }

    /// INSPECTING: read both inscriptions.
    async fn inspect(&mut self, ctx: &DinerContext) {
        self.enter(State::Inspecting);
        for side in [Side::Left, Side::Right] {
            let inscription = self.fork(side).inscription().to_string();
            self.say(
                ctx,
                Milestone::InscriptionRead(side),
                format!("I'm reading the inscription on the {side} fork and it says: {inscription}"),
            )
            .await;
            self.pause().await;
        }
    }

    /// EATING.
    async fn eat(&mut self, ctx: &DinerContext) {
        self.enter(State::Eating);
        self.meals += 1;
        self.say(ctx, Milestone::EatingStarted, "eating...".into())
            .await;
        self.pause().await;
    }

    /// RELEASING: both forks go back on the table.
    ///
    /// Both releases are attempted even if the first fails; the first failure is
    /// returned.
    pub async fn release(
        &mut self,
        ctx: &DinerContext,
        forks: ForkPair,
    ) -> Result<(), PhilosopherError> {
        self.enter(State::Releasing);
        self.say(
            ctx,
            Milestone::ForksReturned,
            "returning both left and right forks back...".into(),
        )
        .await;

        let left = self.put_back(Side::Left, forks.left);
        let right = self.put_back(Side::Right, forks.right);
        left.and(right)
    }

    fn enter(&mut self, state: State) {
        if self.state != state {
            debug!(seat = self.seat, name = %self.name, from = %self.state, to = %state, "Transition");
        }
        self.state = state;
        self.published.publish(state);
    }

    /// Publishes THINK and narrates a thought without leaving the current state.
    async fn muse(&mut self, ctx: &DinerContext) {
        self.published.publish(State::Think);
        let thought = self.flavor.thought(&mut self.rng).to_string();
        self.say(
            ctx,
            Milestone::ThinkStarted,
            format!("Thinking about... {thought}"),
        )
        .await;
        self.pause().await;
    }

    async fn pause(&mut self) {
        let activity = self.pacing.activity(&mut self.rng);
        tokio::time::sleep(activity).await;
    }

    async fn say(&self, ctx: &DinerContext, milestone: Milestone, message: String) {
        ctx.mouth
            .emit(Narration {
                seat: self.seat,
                philosopher: self.name.clone(),
                state: self.state,
                milestone,
                message,
                at: SystemTime::now(),
            })
            .await;
    }

    fn put_back(&self, side: Side, handle: ForkHandle) -> Result<(), PhilosopherError> {
        let fork = self.fork(side);
        fork.return_back(handle)
            .map_err(|source| PhilosopherError::ForkContract {
                name: self.name.clone(),
                side,
                fork: fork.index(),
                source,
            })
    }

    fn fork(&self, side: Side) -> &Arc<Fork> {
        match side {
            Side::Left => &self.left_fork,
            Side::Right => &self.right_fork,
        }
    }

    fn neighbor(&self, side: Side) -> &Arc<StateCell> {
        match side {
            Side::Left => &self.left_neighbor,
            Side::Right => &self.right_neighbor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TableConfig;
    use crate::model::Transcript;
    use crate::table::RoundTable;
    use shared_resource::ResourceError;
    use std::time::Duration;

    fn quick_table(seats: usize) -> RoundTable {
        let mut config = TableConfig::with_seats(seats);
        config.seed = Some(11);
        config.pacing = PacingConfig {
            min_activity_ms: 100,
            max_activity_ms: 100,
            reaction_ms: 20,
        };
        RoundTable::from_config(&config).unwrap()
    }

    fn context(transcript: &Transcript) -> DinerContext {
        DinerContext::new(Arc::new(transcript.clone()), CancellationToken::new())
    }

    #[tokio::test(start_paused = true)]
    async fn free_forks_are_both_taken_in_one_round() {
        let mut table = quick_table(5);
        let forks = table.forks().to_vec();
        let mut philosophers = table.take_philosophers();
        let p0 = &mut philosophers[0];
        let transcript = Transcript::new();
        let ctx = context(&transcript);

        let Round::Seated(pair) = p0.acquisition_round(&ctx).await.unwrap() else {
            panic!("both forks were free");
        };
        assert_eq!(pair.left().fork(), 0);
        assert_eq!(pair.right().fork(), 1);
        assert!(forks[0].is_held() && forks[1].is_held());
        assert_eq!(transcript.milestones(), vec![Milestone::BothForksTaken]);

        p0.release(&ctx, pair).await.unwrap();
        assert!(!forks[0].is_held() && !forks[1].is_held());
        assert_eq!(p0.state(), State::Releasing);
    }

    /// Philosopher 2 gets fork 2 only while philosopher 3 announces ACQUIRING.
    #[tokio::test(start_paused = true)]
    async fn hungry_neighbour_forces_the_first_fork_back() {
        let mut table = quick_table(5);
        let forks = table.forks().to_vec();
        let mut philosophers = table.take_philosophers();
        philosophers[3].published().publish(State::Acquiring);
        let blocker = forks[3].take().unwrap();

        let p2 = &mut philosophers[2];
        let transcript = Transcript::new();
        let ctx = context(&transcript);

        let round = p2.acquisition_round(&ctx).await.unwrap();
        assert!(matches!(round, Round::Retreated(Side::Left)));
        assert!(!forks[2].is_held());
        assert_eq!(p2.state(), State::Acquiring);
        assert_eq!(p2.retreats(), 1);
        assert_eq!(
            transcript.milestones(),
            vec![
                Milestone::FirstForkTaken(Side::Left),
                Milestone::ThinkStarted,
                Milestone::ReachingForOther(Side::Right),
                Milestone::ForcedRelease(Side::Left),
            ]
        );
        assert!(transcript
            .lines()
            .iter()
            .all(|line| line.state == State::Acquiring));
        let lines = transcript.lines();
        assert_eq!(
            lines[3].message,
            "I'll return the first left fork because my right neighbour is ACQUIRING"
        );

        forks[3].return_back(blocker).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn hungry_neighbour_is_respected_even_when_the_fork_is_free() {
        let mut table = quick_table(5);
        let forks = table.forks().to_vec();
        let mut philosophers = table.take_philosophers();
        philosophers[3].published().publish(State::Eating);
        let blocker = forks[3].take().unwrap();

        let p2 = &mut philosophers[2];
        let ctx = context(&Transcript::new());

        // Fork 3 comes free during the micro-think, but philosopher 3 is not thinking.
        let release_early = {
            let fork = Arc::clone(&forks[3]);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                fork.return_back(blocker).unwrap();
            })
        };

        let round = p2.acquisition_round(&ctx).await.unwrap();
        release_early.await.unwrap();
        assert!(matches!(round, Round::Retreated(Side::Left)));
        assert!(!forks[2].is_held());
        assert!(!forks[3].is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn thinking_neighbour_lets_the_second_fork_be_tried() {
        let mut table = quick_table(5);
        let forks = table.forks().to_vec();
        let mut philosophers = table.take_philosophers();
        philosophers[1].published().publish(State::Think);
        let blocker = forks[2].take().unwrap();

        let p2 = &mut philosophers[2];
        let transcript = Transcript::new();
        let ctx = context(&transcript);

        let release_early = {
            let fork = Arc::clone(&forks[2]);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                fork.return_back(blocker).unwrap();
            })
        };

        let Round::Seated(pair) = p2.acquisition_round(&ctx).await.unwrap() else {
            panic!("left neighbour was thinking and fork 2 came free");
        };
        release_early.await.unwrap();
        assert_eq!(pair.left().fork(), 2);
        assert_eq!(pair.right().fork(), 3);
        assert!(transcript
            .milestones()
            .contains(&Milestone::SecondForkTaken(Side::Left)));

        p2.release(&ctx, pair).await.unwrap();
        assert!(!forks[2].is_held() && !forks[3].is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn thinking_neighbour_but_busy_fork_still_retreats() {
        let mut table = quick_table(5);
        let forks = table.forks().to_vec();
        let mut philosophers = table.take_philosophers();
        philosophers[3].published().publish(State::Think);
        let blocker = forks[3].take().unwrap();

        let p2 = &mut philosophers[2];
        let transcript = Transcript::new();
        let ctx = context(&transcript);

        let round = p2.acquisition_round(&ctx).await.unwrap();
        assert!(matches!(round, Round::Retreated(Side::Left)));
        assert!(!forks[2].is_held());
        let last = transcript.lines().pop().unwrap();
        assert_eq!(last.milestone, Milestone::ForcedRelease(Side::Left));
        assert!(last.message.ends_with("because the other fork is in use"));
        forks[3].return_back(blocker).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn busy_forks_make_an_empty_round() {
        let mut table = quick_table(3);
        let forks = table.forks().to_vec();
        let mut philosophers = table.take_philosophers();
        let a = forks[0].take().unwrap();
        let b = forks[1].take().unwrap();

        let transcript = Transcript::new();
        let round = philosophers[0]
            .acquisition_round(&context(&transcript))
            .await
            .unwrap();
        assert!(matches!(round, Round::Empty));
        assert!(transcript.lines().is_empty());

        forks[0].return_back(a).unwrap();
        forks[1].return_back(b).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn releasing_forks_held_by_someone_else_is_fatal() {
        let mut ours = quick_table(2);
        let mut theirs = quick_table(2);
        let mut p_ours = ours.take_philosophers().remove(0);
        let mut p_theirs = theirs.take_philosophers().remove(0);
        let ctx = context(&Transcript::new());

        let Round::Seated(foreign) = p_theirs.acquisition_round(&ctx).await.unwrap() else {
            panic!("forks were free");
        };

        let err = p_ours.release(&ctx, foreign).await.unwrap_err();
        let PhilosopherError::ForkContract { side, fork, source, .. } = err;
        assert_eq!(side, Side::Left);
        assert_eq!(fork, 0);
        assert!(matches!(source, ResourceError::ForeignHandle { .. }));
        assert!(theirs.forks()[0].is_held());
    }

    #[tokio::test(start_paused = true)]
    async fn dine_cycles_until_cancelled() {
        let mut table = quick_table(2);
        let forks = table.forks().to_vec();
        let p0 = table.take_philosophers().remove(0);
        let transcript = Transcript::new();
        let ctx = context(&transcript);
        let cancel = ctx.cancel.clone();

        let diner = tokio::spawn(p0.dine(ctx));
        tokio::time::sleep(Duration::from_secs(3)).await;
        cancel.cancel();
        let summary = diner.await.unwrap().unwrap();

        assert!(summary.meals >= 2);
        assert!(forks.iter().all(|f| !f.is_held()));

        let mut states: Vec<State> = transcript.lines().iter().map(|l| l.state).collect();
        states.dedup();
        let mut expected = State::Think;
        for state in states {
            assert_eq!(state, expected);
            expected = state.next();
        }
    }
}

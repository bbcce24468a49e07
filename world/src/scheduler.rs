//! Timed continuations keyed to the world's two clocks.

use std::{cmp::Ordering, cmp::Reverse, collections::BinaryHeap, time::Duration};

use arena_survival_core::EnemyId;

/// Clock a continuation is measured against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Clock {
    /// Advances on every playing tick.
    Real,
    /// Frozen while a time-stop or bomb is active.
    Game,
}

/// Entity that owns a continuation; cancelling an owner drops all of its work.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerOwner {
    /// Intro sequence, wave requests and spawn cadence.
    Round,
    /// Work belonging to a single enemy.
    Enemy(EnemyId),
    /// Global ability durations.
    Ability,
}

/// Work performed when a continuation comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TimerAction {
    /// Advance the intro countdown.
    IntroStep,
    /// Ask for the next wave after the inter-round grace period.
    RequestWave,
    /// Spawn the next pending enemy of the round.
    SpawnNext,
    /// Fire the next shot of an enemy burst.
    EnemyBurstShot(EnemyId),
    /// End the active time-stop.
    TimeStopExpired,
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    fire_at: Duration,
    sequence: u64,
    owner: TimerOwner,
    action: TimerAction,
}

impl PartialEq for Scheduled {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Scheduled {}

impl PartialOrd for Scheduled {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Scheduled {
    fn cmp(&self, other: &Self) -> Ordering {
        self.fire_at
            .cmp(&other.fire_at)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

/// Min-heaps of pending continuations, one per clock.
///
/// Continuations due at the same instant run in scheduling order.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    real: BinaryHeap<Reverse<Scheduled>>,
    game: BinaryHeap<Reverse<Scheduled>>,
    next_sequence: u64,
}

impl Scheduler {
    /// Creates an empty scheduler.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues `action` to run once `clock` reaches `fire_at`.
    pub(crate) fn schedule(
        &mut self,
        clock: Clock,
        fire_at: Duration,
        owner: TimerOwner,
        action: TimerAction,
    ) {
        let entry = Scheduled {
            fire_at,
            sequence: self.next_sequence,
            owner,
            action,
        };
        self.next_sequence = self.next_sequence.wrapping_add(1);
        self.heap_mut(clock).push(Reverse(entry));
    }

    /// Removes and returns the earliest continuation due at `now`.
    pub(crate) fn pop_due(&mut self, clock: Clock, now: Duration) -> Option<TimerAction> {
        let heap = self.heap_mut(clock);
        let due = heap
            .peek()
            .is_some_and(|Reverse(entry)| entry.fire_at <= now);
        if !due {
            return None;
        }
        heap.pop().map(|Reverse(entry)| entry.action)
    }

    /// Drops every continuation registered by `owner` on both clocks.
    pub(crate) fn cancel_owner(&mut self, owner: TimerOwner) {
        self.real.retain(|Reverse(entry)| entry.owner != owner);
        self.game.retain(|Reverse(entry)| entry.owner != owner);
    }

    /// Drops every pending continuation.
    pub(crate) fn clear(&mut self) {
        self.real.clear();
        self.game.clear();
    }

    /// Number of pending continuations across both clocks.
    pub(crate) fn len(&self) -> usize {
        self.real.len() + self.game.len()
    }

    fn heap_mut(&mut self, clock: Clock) -> &mut BinaryHeap<Reverse<Scheduled>> {
        match clock {
            Clock::Real => &mut self.real,
            Clock::Game => &mut self.game,
        }
    }
}

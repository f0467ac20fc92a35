use std::{collections::VecDeque, time::Duration};

use loop_quest_core::{Phase, Rejection, TileId, TurnSnapshot};

/// Roll, selection and playback progress of the current turn.
#[derive(Debug, Default)]
pub(crate) struct TurnState {
    turn: u32,
    last_roll: u32,
    steps_remaining: u32,
    phase: Phase,
    destinations: Vec<TileId>,
    selected: usize,
    goal: Option<TileId>,
    path: VecDeque<TileId>,
    accumulator: Duration,
}

/// Hops consumed by one tick of path playback.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Advance {
    pub(crate) hops: Vec<TileId>,
    pub(crate) finished: bool,
}

impl TurnState {
    pub(crate) const fn phase(&self) -> Phase {
        self.phase
    }

    pub(crate) const fn turn(&self) -> u32 {
        self.turn
    }

    pub(crate) const fn last_roll(&self) -> u32 {
        self.last_roll
    }

    pub(crate) fn destinations(&self) -> &[TileId] {
        &self.destinations
    }

    pub(crate) fn begin_roll(&mut self, roll: u32) {
        self.turn += 1;
        self.last_roll = roll;
        self.steps_remaining = roll;
        self.phase = Phase::TargetSelect;
        self.destinations.clear();
        self.selected = 0;
        self.goal = None;
        self.path.clear();
    }

    /// Accepts destinations computed for the pending roll.
    pub(crate) fn offer(&mut self, roll: u32, destinations: Vec<TileId>) -> bool {
        if self.phase != Phase::TargetSelect || self.goal.is_some() || roll != self.last_roll {
            return false;
        }
        self.destinations = destinations;
        self.selected = 0;
        true
    }

    pub(crate) fn selection(&self) -> Option<(usize, TileId)> {
        self.destinations
            .get(self.selected)
            .map(|tile| (self.selected, *tile))
    }

    pub(crate) fn cycle(&mut self, offset: i32) -> Result<(usize, TileId), Rejection> {
        self.require(Phase::TargetSelect)?;
        let len = self.destinations.len() as i64;
        if len == 0 {
            return Err(Rejection::NoDestinations);
        }
        self.selected = (self.selected as i64 + i64::from(offset)).rem_euclid(len) as usize;
        self.selection().ok_or(Rejection::NoDestinations)
    }

    pub(crate) fn confirm(&mut self) -> Result<TileId, Rejection> {
        self.require(Phase::TargetSelect)?;
        let (_, goal) = self.selection().ok_or(Rejection::NoDestinations)?;
        self.goal = Some(goal);
        Ok(goal)
    }

    pub(crate) fn cancel(&mut self) -> Result<(), Rejection> {
        self.require(Phase::TargetSelect)?;
        self.reset_to_idle();
        Ok(())
    }

    /// Starts playback of `path`, which must end at the confirmed goal.
    pub(crate) fn assign_path(&mut self, path: Vec<TileId>) -> Result<usize, Rejection> {
        self.require(Phase::TargetSelect)?;
        let goal = self.goal.ok_or(Rejection::MismatchedPath)?;
        if path.last() != Some(&goal) {
            return Err(Rejection::MismatchedPath);
        }
        let hops = path.len();
        self.path = path.into();
        self.steps_remaining = hops as u32;
        self.accumulator = Duration::ZERO;
        self.phase = Phase::Animating;
        Ok(hops)
    }

    /// Consumes one hop per `interval` of accumulated time.
    pub(crate) fn advance(&mut self, dt: Duration, interval: Duration) -> Advance {
        let mut progress = Advance::default();
        if self.phase != Phase::Animating {
            return progress;
        }
        self.accumulator = self.accumulator.saturating_add(dt);
        while self.steps_remaining > 0 && self.accumulator >= interval {
            self.accumulator -= interval;
            self.steps_remaining -= 1;
            if let Some(hop) = self.path.pop_front() {
                progress.hops.push(hop);
            }
        }
        if self.steps_remaining == 0 {
            self.reset_to_idle();
            progress.finished = true;
        }
        progress
    }

    /// Returns to idle, dropping destinations and any pending path.
    pub(crate) fn reset_to_idle(&mut self) {
        self.phase = Phase::Idle;
        self.steps_remaining = 0;
        self.destinations.clear();
        self.selected = 0;
        self.goal = None;
        self.path.clear();
        self.accumulator = Duration::ZERO;
    }

    pub(crate) fn snapshot(&self) -> TurnSnapshot {
        TurnSnapshot {
            turn: self.turn,
            last_roll: self.last_roll,
            steps_remaining: self.steps_remaining,
            phase: self.phase,
            destinations: self.destinations.clone(),
            selected: self.selected,
            path: self.path.iter().copied().collect(),
        }
    }

    fn require(&self, phase: Phase) -> Result<(), Rejection> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(Rejection::WrongPhase { phase: self.phase })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(180);

    fn tile(index: usize) -> TileId {
        TileId::new(0, index)
    }

    fn selecting(destinations: Vec<TileId>) -> TurnState {
        let mut turn = TurnState::default();
        turn.begin_roll(3);
        assert!(turn.offer(3, destinations));
        turn
    }

    #[test]
    fn roll_enters_target_select() {
        let mut turn = TurnState::default();
        turn.begin_roll(4);
        assert_eq!(turn.phase(), Phase::TargetSelect);
        assert_eq!(turn.turn(), 1);
        assert_eq!(turn.last_roll(), 4);
        assert!(!turn.offer(5, vec![tile(1)]), "stale roll is ignored");
        assert!(turn.destinations().is_empty());
    }

    #[test]
    fn cycling_wraps_both_ways() {
        let mut turn = selecting(vec![tile(3), tile(5), tile(7)]);
        assert_eq!(turn.cycle(-1), Ok((2, tile(7))));
        assert_eq!(turn.cycle(1), Ok((0, tile(3))));
        assert_eq!(turn.cycle(4), Ok((1, tile(5))));
    }

    #[test]
    fn confirming_without_destinations_is_rejected() {
        let mut turn = selecting(Vec::new());
        assert_eq!(turn.confirm(), Err(Rejection::NoDestinations));
        turn.cancel().expect("cancel from target select");
        assert_eq!(turn.phase(), Phase::Idle);
    }

    #[test]
    fn paths_must_end_at_the_goal() {
        let mut turn = selecting(vec![tile(3)]);
        assert_eq!(
            turn.assign_path(vec![tile(1), tile(2), tile(3)]),
            Err(Rejection::MismatchedPath),
            "no goal confirmed yet"
        );
        assert_eq!(turn.confirm(), Ok(tile(3)));
        assert_eq!(turn.assign_path(Vec::new()), Err(Rejection::MismatchedPath));
        assert_eq!(
            turn.assign_path(vec![tile(1), tile(2)]),
            Err(Rejection::MismatchedPath)
        );
        assert_eq!(turn.assign_path(vec![tile(1), tile(2), tile(3)]), Ok(3));
        assert_eq!(turn.phase(), Phase::Animating);
    }

    #[test]
    fn playback_catches_up_on_slow_frames() {
        let mut turn = selecting(vec![tile(3)]);
        let _ = turn.confirm().expect("goal");
        let _ = turn.assign_path(vec![tile(1), tile(2), tile(3)]).expect("path");

        let first = turn.advance(Duration::from_millis(100), STEP);
        assert!(first.hops.is_empty());
        let second = turn.advance(Duration::from_millis(300), STEP);
        assert_eq!(second.hops, vec![tile(1), tile(2)]);
        assert!(!second.finished);
        assert_eq!(turn.snapshot().path, vec![tile(3)]);

        let last = turn.advance(STEP, STEP);
        assert_eq!(last.hops, vec![tile(3)]);
        assert!(last.finished);
        assert_eq!(turn.phase(), Phase::Idle);
        assert_eq!(turn.snapshot().steps_remaining, 0);
    }
}

//! Pure state machine behind the window controller.
//!
//! [`transition`] performs no I/O. The controller feeds it the outcome of each
//! attempt and acts on the phase it returns.

use crate::window::policy::WindowPolicy;
use model::window::{AttemptOutcome, ExtractionCursor, Window};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// The current window is (re)attempted with budget left.
    Attempting,
    /// The last window succeeded and the cursor moved past it.
    Advancing,
    /// The budget at the previous size ran out and the window got smaller.
    Shrinking,
    /// The budget ran out at the minimum size. Terminal.
    Exhausted,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Attempting => "Attempting",
            Phase::Advancing => "Advancing",
            Phase::Shrinking => "Shrinking",
            Phase::Exhausted => "Exhausted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ControllerState {
    pub phase: Phase,
    pub cursor: ExtractionCursor,
    /// Attempts left at the current start date and window size.
    pub budget: u32,
}

impl ControllerState {
    pub fn initial(policy: &WindowPolicy) -> Self {
        ControllerState {
            phase: Phase::Attempting,
            cursor: policy.initial_cursor(),
            budget: policy.retry_limit(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.phase == Phase::Exhausted
    }
}

/// Computes the state after one attempt at `window`, which must be
/// `state.cursor.window()`.
///
/// `Exhausted` is absorbing: any outcome leaves it unchanged.
pub fn transition(
    policy: &WindowPolicy,
    state: ControllerState,
    window: &Window,
    outcome: AttemptOutcome,
) -> ControllerState {
    if state.is_exhausted() {
        return state;
    }

    match outcome {
        AttemptOutcome::Success => ControllerState {
            phase: Phase::Advancing,
            cursor: ExtractionCursor::new(window.end, state.cursor.window_days),
            budget: policy.retry_limit(),
        },
        AttemptOutcome::Failure => {
            let budget = state.budget.saturating_sub(1);
            if budget > 0 {
                return ControllerState {
                    phase: Phase::Attempting,
                    budget,
                    ..state
                };
            }

            if state.cursor.window_days > policy.min_window_days() {
                ControllerState {
                    phase: Phase::Shrinking,
                    cursor: ExtractionCursor::new(
                        state.cursor.current_start,
                        policy.shrink(state.cursor.window_days),
                    ),
                    budget: policy.retry_limit(),
                }
            } else {
                ControllerState {
                    phase: Phase::Exhausted,
                    budget: 0,
                    ..state
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn policy(initial: u32, min: u32, factor: u32, limit: u32) -> WindowPolicy {
        WindowPolicy::new(date(2020, 1, 1), initial, min, factor, limit).unwrap()
    }

    fn step(policy: &WindowPolicy, state: ControllerState, outcome: AttemptOutcome) -> ControllerState {
        let window = state.cursor.window().unwrap();
        transition(policy, state, &window, outcome)
    }

    #[test]
    fn test_success_advances_and_resets_budget() {
        let policy = policy(10, 1, 2, 3);
        let state = step(&policy, ControllerState::initial(&policy), AttemptOutcome::Failure);
        assert_eq!(state.budget, 2);

        let next = step(&policy, state, AttemptOutcome::Success);
        assert_eq!(next.phase, Phase::Advancing);
        assert_eq!(next.cursor.current_start, date(2020, 1, 11));
        assert_eq!(next.cursor.window_days, 10);
        assert_eq!(next.budget, 3);
    }

    #[test]
    fn test_failure_retries_same_window_until_budget_spent() {
        let policy = policy(10, 1, 2, 3);
        let start = ControllerState::initial(&policy);

        let first = step(&policy, start, AttemptOutcome::Failure);
        assert_eq!(first.phase, Phase::Attempting);
        assert_eq!(first.cursor, start.cursor);
        assert_eq!(first.budget, 2);

        let second = step(&policy, first, AttemptOutcome::Failure);
        assert_eq!(second.phase, Phase::Attempting);
        assert_eq!(second.cursor, start.cursor);
        assert_eq!(second.budget, 1);

        let third = step(&policy, second, AttemptOutcome::Failure);
        assert_eq!(third.phase, Phase::Shrinking);
        assert_eq!(third.cursor.current_start, start.cursor.current_start);
        assert_eq!(third.cursor.window_days, 5);
        assert_eq!(third.budget, 3);
    }

    #[test]
    fn test_exhausts_only_at_minimum_size() {
        let policy = policy(2, 1, 2, 1);
        let shrunk = step(&policy, ControllerState::initial(&policy), AttemptOutcome::Failure);
        assert_eq!(shrunk.phase, Phase::Shrinking);
        assert_eq!(shrunk.cursor.window_days, 1);

        let exhausted = step(&policy, shrunk, AttemptOutcome::Failure);
        assert_eq!(exhausted.phase, Phase::Exhausted);
        assert_eq!(exhausted.cursor, shrunk.cursor);
        assert_eq!(exhausted.budget, 0);
    }

    #[test]
    fn test_exhausted_is_absorbing() {
        let policy = policy(1, 1, 2, 1);
        let exhausted = step(&policy, ControllerState::initial(&policy), AttemptOutcome::Failure);
        assert!(exhausted.is_exhausted());

        let window = exhausted.cursor.window().unwrap();
        for outcome in [AttemptOutcome::Success, AttemptOutcome::Failure] {
            assert_eq!(transition(&policy, exhausted, &window, outcome), exhausted);
        }
    }

    #[test]
    fn test_size_never_grows_after_shrink() {
        let policy = policy(8, 1, 2, 1);
        let shrunk = step(&policy, ControllerState::initial(&policy), AttemptOutcome::Failure);
        assert_eq!(shrunk.cursor.window_days, 4);

        let mut state = shrunk;
        for _ in 0..5 {
            state = step(&policy, state, AttemptOutcome::Success);
            assert_eq!(state.cursor.window_days, 4);
        }
        assert_eq!(state.cursor.current_start, date(2020, 1, 21));
    }
}

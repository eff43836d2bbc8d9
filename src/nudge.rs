use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::NudgeState;

pub const AUTO_BOOKING_THRESHOLD: u32 = 3;

/// A user's answer to the checkup follow-up prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NudgeResponse {
    DidNotAct,
    CompletedCheckup,
    RemindLater,
}

/// Applies one explicit follow-up response. There are no implicit
/// transitions: `count` never decays and only `CompletedCheckup` resets it.
pub fn apply_response(state: &mut NudgeState, response: NudgeResponse, date: NaiveDate) {
    match response {
        NudgeResponse::DidNotAct => {
            state.count += 1;
            state.last_nudge_date = Some(date);
            state.dismissed = false;
        }
        NudgeResponse::CompletedCheckup => {
            state.count = 0;
            state.last_nudge_date = None;
            state.last_checkup_date = Some(date);
            state.dismissed = false;
        }
        NudgeResponse::RemindLater => {
            // Snoozes the surfaced nudge only; the count keeps accruing
            // toward auto-booking.
            state.dismissed = true;
        }
    }
}

pub fn should_auto_book(state: &NudgeState) -> bool {
    state.count >= AUTO_BOOKING_THRESHOLD
}

pub fn should_show_nudge(state: &NudgeState) -> bool {
    state.count > 0 && !state.dismissed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, n).unwrap()
    }

    #[test]
    fn three_declines_trigger_auto_booking() {
        let mut state = NudgeState::default();
        for n in 1..=3 {
            apply_response(&mut state, NudgeResponse::DidNotAct, day(n));
        }
        assert_eq!(state.count, 3);
        assert!(should_auto_book(&state));
        assert_eq!(state.last_nudge_date, Some(day(3)));
    }

    #[test]
    fn reset_clears_count_and_records_checkup_date() {
        let mut state = NudgeState::default();
        apply_response(&mut state, NudgeResponse::DidNotAct, day(1));
        apply_response(&mut state, NudgeResponse::DidNotAct, day(2));
        apply_response(&mut state, NudgeResponse::CompletedCheckup, day(5));
        assert_eq!(state.count, 0);
        assert!(!should_auto_book(&state));
        assert_eq!(state.last_nudge_date, None);
        assert_eq!(state.last_checkup_date, Some(day(5)));
    }

    #[test]
    fn dismiss_hides_the_current_nudge_only() {
        let mut state = NudgeState::default();
        apply_response(&mut state, NudgeResponse::DidNotAct, day(1));
        apply_response(&mut state, NudgeResponse::RemindLater, day(1));
        assert!(!should_show_nudge(&state));
        assert_eq!(state.count, 1);

        apply_response(&mut state, NudgeResponse::DidNotAct, day(2));
        assert!(should_show_nudge(&state));
        assert_eq!(state.count, 2);
    }

    #[test]
    fn dismiss_is_idempotent() {
        let mut state = NudgeState::default();
        apply_response(&mut state, NudgeResponse::DidNotAct, day(1));
        apply_response(&mut state, NudgeResponse::RemindLater, day(1));
        apply_response(&mut state, NudgeResponse::RemindLater, day(2));
        assert_eq!(state.count, 1);
        assert!(state.dismissed);
    }

    #[test]
    fn dismissed_declines_still_count_toward_auto_booking() {
        let mut state = NudgeState::default();
        for n in 1..=3 {
            apply_response(&mut state, NudgeResponse::DidNotAct, day(n));
            apply_response(&mut state, NudgeResponse::RemindLater, day(n));
        }
        assert!(should_auto_book(&state));
    }

    #[test]
    fn fresh_state_shows_no_nudge() {
        let state = NudgeState::default();
        assert!(!should_show_nudge(&state));
        assert!(!should_auto_book(&state));
    }
}

//! SM-2 review scheduling.
//!
//! All functions are pure: the caller passes the prior state and the current
//! time, and gets a new state back. Nothing here touches storage or a clock.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};

use crate::domain::{Quality, ReviewState};

pub const MIN_EASINESS: f64 = 1.3;

/// Flat easiness penalty for a complete miss.
const FAILURE_PENALTY: f64 = 0.2;

/// Lowest numeric quality that counts as a successful recall.
const PASSING_QUALITY: u8 = 3;

/// Local hour reviews are pinned to.
const REVIEW_HOUR: u32 = 3;

/// Apply one graded review to `prev` and return the new state.
///
/// Standard SM-2 ease adjustment: the easiness factor is nudged by how far
/// the grade fell from the maximum, clamped at [`MIN_EASINESS`]; successful
/// repetitions walk the 1-day, 6-day, then interval-times-easiness ladder.
pub fn update(prev: &ReviewState, quality: Quality, now: DateTime<Utc>) -> ReviewState {
  let q = quality.as_u8() as f64;
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let easiness = (prev.easiness + ease_delta).max(MIN_EASINESS);

  let (interval_days, repetitions) = if quality.as_u8() < PASSING_QUALITY {
    // Below-passing grades reset the schedule. The closed quality scale
    // currently bottoms out at Hard (3), so this only fires if the scale is
    // ever widened downward.
    (1, 0)
  } else {
    let repetitions = prev.repetitions + 1;
    let interval_days = match repetitions {
      1 => 1,
      2 => 6,
      _ => ((prev.interval_days as f64) * easiness).round() as i64,
    };
    (interval_days, repetitions)
  };

  ReviewState {
    easiness,
    interval_days,
    repetitions,
    last_reviewed: Some(now),
    next_review: Some(next_review_at(now, interval_days)),
  }
}

/// Apply a complete miss: flat easiness penalty, schedule reset to tomorrow.
///
/// Deliberately harsher and simpler than `update` with a low grade: the
/// penalty is fixed rather than formula-derived, and repetitions always drop
/// to zero.
pub fn fail(prev: &ReviewState, now: DateTime<Utc>) -> ReviewState {
  ReviewState {
    easiness: (prev.easiness - FAILURE_PENALTY).max(MIN_EASINESS),
    interval_days: 1,
    repetitions: 0,
    last_reviewed: Some(now),
    next_review: Some(next_review_at(now, 1)),
  }
}

/// Whether an item should be offered for review.
///
/// An absent record and an unscheduled one (`next_review` None) are both
/// always due. Every consumer must go through this predicate.
pub fn is_due(state: Option<&ReviewState>, now: DateTime<Utc>) -> bool {
  match state.and_then(|s| s.next_review) {
    Some(next) => next <= now,
    None => true,
  }
}

/// The instant `interval_days` days from now, at 03:00 local time.
///
/// Pinning to a fixed low hour keeps DST offset changes from shifting a
/// review across a day boundary. If a DST gap removes 03:00 itself on the
/// target day, the next representable hour is used.
pub fn next_review_at(now: DateTime<Utc>, interval_days: i64) -> DateTime<Utc> {
  let days = interval_days.max(0);
  let target = now.with_timezone(&Local).date_naive() + Duration::days(days);

  for hour in REVIEW_HOUR..=REVIEW_HOUR + 1 {
    if let Some(naive) = target.and_hms_opt(hour, 0, 0) {
      if let Some(local) = Local.from_local_datetime(&naive).earliest() {
        return local.with_timezone(&Utc);
      }
    }
  }

  // Unreachable for real timezones; keeps the function total.
  Utc.from_utc_datetime(&target.and_hms_opt(REVIEW_HOUR, 0, 0).unwrap())
}

#[cfg(test)]
mod tests {
  use chrono::Timelike;

  use super::*;

  fn local_date_of(dt: DateTime<Utc>) -> chrono::NaiveDate {
    dt.with_timezone(&Local).date_naive()
  }

  #[test]
  fn test_first_success_yields_one_day() {
    let state = update(&ReviewState::new(), Quality::Medium, Utc::now());
    assert_eq!(state.repetitions, 1);
    assert_eq!(state.interval_days, 1);
  }

  #[test]
  fn test_first_easy_raises_easiness() {
    let state = update(&ReviewState::new(), Quality::Easy, Utc::now());
    assert_eq!(state.repetitions, 1);
    assert_eq!(state.interval_days, 1);
    assert!((state.easiness - 2.6).abs() < 1e-9);
  }

  #[test]
  fn test_second_success_yields_six_days() {
    let now = Utc::now();
    let first = update(&ReviewState::new(), Quality::Easy, now);
    let second = update(&first, Quality::Easy, now);
    assert_eq!(second.repetitions, 2);
    assert_eq!(second.interval_days, 6);
  }

  #[test]
  fn test_third_success_multiplies_by_easiness() {
    let now = Utc::now();
    let first = update(&ReviewState::new(), Quality::Easy, now);
    let second = update(&first, Quality::Easy, now);
    let third = update(&second, Quality::Medium, now);

    assert_eq!(third.repetitions, 3);
    // Medium sits exactly at the zero point of the ease formula.
    assert!((third.easiness - second.easiness).abs() < 1e-9);
    let expected = (6.0 * third.easiness).round() as i64;
    assert_eq!(third.interval_days, expected);
  }

  #[test]
  fn test_hard_lowers_easiness() {
    let state = update(&ReviewState::new(), Quality::Hard, Utc::now());
    assert!((state.easiness - (2.5 - 0.14)).abs() < 1e-9);
    assert_eq!(state.repetitions, 1);
    assert_eq!(state.interval_days, 1);
  }

  #[test]
  fn test_easiness_never_drops_below_floor() {
    let now = Utc::now();
    let mut state = ReviewState::new();
    for _ in 0..50 {
      state = update(&state, Quality::Hard, now);
      assert!(state.easiness >= MIN_EASINESS);
    }
    assert!((state.easiness - MIN_EASINESS).abs() < 1e-9);
  }

  #[test]
  fn test_floor_holds_across_mixed_sequences() {
    let now = Utc::now();
    let mut state = ReviewState::new();
    for i in 0..100 {
      state = match i % 3 {
        0 => update(&state, Quality::Hard, now),
        1 => fail(&state, now),
        _ => update(&state, Quality::Easy, now),
      };
      assert!(state.easiness >= MIN_EASINESS);
      assert!(state.interval_days >= 0);
      assert!(state.repetitions >= 0);
    }
  }

  #[test]
  fn test_fail_resets_schedule() {
    let now = Utc::now();
    let state = ReviewState {
      easiness: 2.0,
      interval_days: 20,
      repetitions: 5,
      last_reviewed: Some(now),
      next_review: Some(now),
    };
    let failed = fail(&state, now);

    assert_eq!(failed.repetitions, 0);
    assert_eq!(failed.interval_days, 1);
    assert!((failed.easiness - 1.8).abs() < 1e-9);
    // Tomorrow, local time.
    let next = failed.next_review.expect("failure always schedules");
    assert_eq!(local_date_of(next), local_date_of(now) + Duration::days(1));
  }

  #[test]
  fn test_fail_from_default_state() {
    let failed = fail(&ReviewState::new(), Utc::now());
    assert_eq!(failed.repetitions, 0);
    assert_eq!(failed.interval_days, 1);
    assert!((failed.easiness - 2.3).abs() < 1e-9);
  }

  #[test]
  fn test_fail_clamps_easiness() {
    let now = Utc::now();
    let state = ReviewState {
      easiness: 1.35,
      ..ReviewState::new()
    };
    let failed = fail(&state, now);
    assert!((failed.easiness - MIN_EASINESS).abs() < 1e-9);
  }

  #[test]
  fn test_absent_state_is_due() {
    assert!(is_due(None, Utc::now()));
  }

  #[test]
  fn test_unscheduled_state_is_due() {
    let state = ReviewState::new();
    assert!(state.next_review.is_none());
    assert!(is_due(Some(&state), Utc::now()));
  }

  #[test]
  fn test_due_boundary_is_inclusive() {
    let now = Utc::now();
    let state = ReviewState {
      next_review: Some(now),
      ..ReviewState::new()
    };

    assert!(is_due(Some(&state), now));
    assert!(!is_due(Some(&state), now - Duration::milliseconds(1)));
    assert!(is_due(Some(&state), now + Duration::milliseconds(1)));
  }

  #[test]
  fn test_is_due_does_not_mutate() {
    let now = Utc::now();
    let state = ReviewState {
      next_review: Some(now + Duration::days(3)),
      ..ReviewState::new()
    };
    let before = state;
    for _ in 0..10 {
      let _ = is_due(Some(&state), now);
    }
    assert_eq!(state, before);
  }

  #[test]
  fn test_update_does_not_mutate_input() {
    let now = Utc::now();
    let state = ReviewState::new();
    let _ = update(&state, Quality::Easy, now);
    assert_eq!(state, ReviewState::new());
  }

  #[test]
  fn test_update_is_deterministic_for_fixed_now() {
    let now = Utc::now();
    let a = update(&ReviewState::new(), Quality::Easy, now);
    let b = update(&ReviewState::new(), Quality::Easy, now);
    assert_eq!(a, b);
  }

  #[test]
  fn test_next_review_pinned_to_low_hour() {
    let next = next_review_at(Utc::now(), 1);
    let local = next.with_timezone(&Local);
    // 03:00, or 04:00 on a day where a DST gap removed it.
    assert!(local.hour() == REVIEW_HOUR || local.hour() == REVIEW_HOUR + 1);
    assert_eq!(local.minute(), 0);
    assert_eq!(local.second(), 0);
  }

  #[test]
  fn test_next_review_advances_by_interval_days() {
    let now = Utc::now();
    for days in [0, 1, 6, 30, 365] {
      let next = next_review_at(now, days);
      assert_eq!(local_date_of(next), local_date_of(now) + Duration::days(days));
    }
  }

  #[test]
  fn test_next_review_floors_negative_interval() {
    let now = Utc::now();
    assert_eq!(local_date_of(next_review_at(now, -5)), local_date_of(now));
  }

  #[test]
  fn test_update_schedules_next_review() {
    let now = Utc::now();
    let state = update(&ReviewState::new(), Quality::Easy, now);
    assert_eq!(state.last_reviewed, Some(now));
    let next = state.next_review.expect("update always schedules");
    assert_eq!(local_date_of(next), local_date_of(now) + Duration::days(1));
  }

  #[test]
  fn test_interval_grows_over_successful_run() {
    let now = Utc::now();
    let mut state = ReviewState::new();
    for i in 0..5 {
      state = update(&state, Quality::Medium, now);
      match i {
        0 => assert_eq!(state.interval_days, 1),
        1 => assert_eq!(state.interval_days, 6),
        _ => assert!(state.interval_days > 6),
      }
    }
    assert!(state.interval_days > 30);
  }
}

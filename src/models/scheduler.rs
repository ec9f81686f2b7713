//! SM-2 derived review scheduler.
//!
//! Computes the next interval, ease factor and due date of a card from a
//! four-level rating:
//! - Again: interval resets to 0, ease factor drops by 0.2
//! - Hard: small growth (x1.2, or 1 day for unscheduled cards), ease drops by 0.15
//! - Good: interval grows by the ease factor (1 day for unscheduled cards)
//! - Easy: interval grows by ease x 1.3 (4 days for unscheduled cards), ease rises by 0.15
//!
//! The ease factor never falls below 1.3. Intervals are rounded to one decimal
//! place (half away from zero). Due dates are whole days: `now + ceil(max(interval, 1))`.
//! Every function here is pure; the caller supplies `now` and persists the result.

use super::flashcard::{Flashcard, MASTERY_THRESHOLD_DAYS, MIN_EASE_FACTOR};
use super::rating::Rating;
use crate::error::{Result, ReviewError};
use chrono::{DateTime, Duration, Utc};

const AGAIN_EASE_PENALTY: f64 = 0.2;
const HARD_EASE_PENALTY: f64 = 0.15;
const EASY_EASE_BONUS: f64 = 0.15;
const HARD_INTERVAL_FACTOR: f64 = 1.2;
const EASY_INTERVAL_BONUS: f64 = 1.3;
const FIRST_EASY_INTERVAL: f64 = 4.0;
/// Longest interval the scheduler hands out, roughly 2700 years.
const MAX_INTERVAL_DAYS: f64 = 1_000_000.0;

/// Interval and ease factor a rating produces. Shared by the mutating and
/// the preview path so both always agree.
struct Step {
    interval: f64,
    ease_factor: f64,
}

fn next_step(card: &Flashcard, rating: Rating) -> Result<Step> {
    card.validate()?;

    let interval = card.interval;
    let ease = card.ease_factor;
    let unscheduled = interval == 0.0;

    let (raw_interval, ease_factor) = match rating {
        Rating::Again => (0.0, (ease - AGAIN_EASE_PENALTY).max(MIN_EASE_FACTOR)),
        Rating::Hard => {
            let next = if unscheduled { 1.0 } else { interval * HARD_INTERVAL_FACTOR };
            (next, (ease - HARD_EASE_PENALTY).max(MIN_EASE_FACTOR))
        }
        Rating::Good => {
            let next = if unscheduled { 1.0 } else { interval * ease };
            (next, ease)
        }
        Rating::Easy => {
            let next = if unscheduled {
                FIRST_EASY_INTERVAL
            } else {
                interval * ease * EASY_INTERVAL_BONUS
            };
            (next, ease + EASY_EASE_BONUS)
        }
    };

    let interval = round_to_tenth(raw_interval);
    if !interval.is_finite() || interval > MAX_INTERVAL_DAYS {
        return Err(ReviewError::InvalidState(format!(
            "card `{}` rated {rating} would get an interval of {interval} days; \
             the limit is {MAX_INTERVAL_DAYS}",
            card.id
        )));
    }

    Ok(Step {
        interval,
        ease_factor,
    })
}

fn round_to_tenth(days: f64) -> f64 {
    (days * 10.0).round() / 10.0
}

/// Whole days until the card is shown again; never less than one.
fn deferral_days(interval: f64) -> i64 {
    interval.max(1.0).ceil() as i64
}

fn due_date_after(now: DateTime<Utc>, interval: f64) -> Result<DateTime<Utc>> {
    Duration::try_days(deferral_days(interval))
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| {
            ReviewError::InvalidState(format!(
                "interval of {interval} days puts the due date out of range"
            ))
        })
}

/// Applies a rating to a card and returns its updated state.
///
/// The input card is left untouched. `review_count` always grows by exactly one.
pub fn apply_rating(card: &Flashcard, rating: Rating, now: DateTime<Utc>) -> Result<Flashcard> {
    let step = next_step(card, rating)?;
    let due_date = due_date_after(now, step.interval)?;

    log::debug!(
        "rated card {} as {}: interval {} -> {}, ease {:.2} -> {:.2}",
        card.id,
        rating,
        card.interval,
        step.interval,
        card.ease_factor,
        step.ease_factor
    );

    Ok(Flashcard {
        interval: step.interval,
        ease_factor: step.ease_factor,
        review_count: card.review_count.saturating_add(1),
        due_date,
        mastered: step.interval > MASTERY_THRESHOLD_DAYS,
        ..card.clone()
    })
}

/// Interval `apply_rating` would assign, without producing a new card.
pub fn project_rating(card: &Flashcard, rating: Rating) -> Result<f64> {
    next_step(card, rating).map(|step| step.interval)
}

/// Projected intervals for Again, Hard, Good and Easy, in that order.
/// Used to label the rating buttons.
pub fn preview_intervals(card: &Flashcard) -> Result<[f64; 4]> {
    Ok([
        project_rating(card, Rating::Again)?,
        project_rating(card, Rating::Hard)?,
        project_rating(card, Rating::Good)?,
        project_rating(card, Rating::Easy)?,
    ])
}

/// Format an interval in days to a short human-readable label
pub fn format_interval(days: f64) -> String {
    if days <= 0.0 {
        "now".to_string()
    } else if days < 7.0 {
        format!("{}d", trim_tenths(days))
    } else if days < 30.0 {
        format!("{}w", (days / 7.0).floor() as i64)
    } else if days < 365.0 {
        format!("{}mo", (days / 30.0).floor() as i64)
    } else {
        format!("{}y", (days / 365.0).floor() as i64)
    }
}

fn trim_tenths(days: f64) -> String {
    if days.fract() == 0.0 {
        format!("{}", days as i64)
    } else {
        format!("{days:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 30, 0).unwrap()
    }

    fn card(interval: f64, ease_factor: f64) -> Flashcard {
        Flashcard {
            interval,
            ease_factor,
            mastered: interval > MASTERY_THRESHOLD_DAYS,
            ..Flashcard::with_id("c1", "term", "definition", now())
        }
    }

    fn sample_cards() -> Vec<Flashcard> {
        let mut cards = Vec::new();
        for &interval in &[0.0, 0.4, 1.0, 2.5, 6.0, 15.3, 22.0, 180.0] {
            for &ease in &[1.3, 1.35, 1.5, 2.0, 2.5, 3.1] {
                cards.push(card(interval, ease));
            }
        }
        cards
    }

    #[test]
    fn test_first_good_review() {
        let next = apply_rating(&card(0.0, 2.5), Rating::Good, now()).unwrap();

        assert_eq!(next.interval, 1.0);
        assert_eq!(next.ease_factor, 2.5);
        assert_eq!(next.review_count, 1);
        assert_eq!(next.due_date, now() + Duration::days(1));
        assert!(!next.mastered);
    }

    #[test]
    fn test_second_good_review_rounds_due_date_up() {
        let next = apply_rating(&card(1.0, 2.5), Rating::Good, now()).unwrap();

        assert_eq!(next.interval, 2.5);
        assert_eq!(next.due_date, now() + Duration::days(3));
    }

    #[test]
    fn test_again_at_ease_floor() {
        let next = apply_rating(&card(5.0, 1.3), Rating::Again, now()).unwrap();

        assert_eq!(next.interval, 0.0);
        assert_eq!(next.ease_factor, 1.3);
        assert_eq!(next.due_date, now() + Duration::days(1));
    }

    #[test]
    fn test_hard_and_easy_steps() {
        let hard = apply_rating(&card(0.0, 2.5), Rating::Hard, now()).unwrap();
        assert_eq!(hard.interval, 1.0);
        assert!((hard.ease_factor - 2.35).abs() < 1e-9);

        let hard = apply_rating(&card(10.0, 2.5), Rating::Hard, now()).unwrap();
        assert_eq!(hard.interval, 12.0);

        let easy = apply_rating(&card(0.0, 2.5), Rating::Easy, now()).unwrap();
        assert_eq!(easy.interval, 4.0);
        assert!((easy.ease_factor - 2.65).abs() < 1e-9);
        assert_eq!(easy.due_date, now() + Duration::days(4));

        // 4 * 2.5 * 1.3 = 13
        let easy = apply_rating(&card(4.0, 2.5), Rating::Easy, now()).unwrap();
        assert_eq!(easy.interval, 13.0);
    }

    #[test]
    fn test_interval_rounded_to_one_decimal() {
        // 3 * 1.37 = 4.11
        let next = apply_rating(&card(3.0, 1.37), Rating::Good, now()).unwrap();
        assert_eq!(next.interval, 4.1);
        assert_eq!(next.due_date, now() + Duration::days(5));
    }

    #[test]
    fn test_ease_and_interval_bounds_hold_for_all_ratings() {
        for card in sample_cards() {
            for rating in Rating::ALL {
                let next = apply_rating(&card, rating, now()).unwrap();
                assert!(next.ease_factor >= MIN_EASE_FACTOR, "{card:?} {rating}");
                assert!(next.interval >= 0.0, "{card:?} {rating}");
                assert_eq!(next.review_count, card.review_count + 1);
                let expected_due = now() + Duration::days(next.interval.max(1.0).ceil() as i64);
                assert_eq!(next.due_date, expected_due);
                assert_eq!(next.mastered, next.interval > 21.0);
                if rating == Rating::Again {
                    assert_eq!(next.interval, 0.0);
                }
            }
        }
    }

    #[test]
    fn test_projection_matches_application() {
        for card in sample_cards() {
            let preview = preview_intervals(&card).unwrap();
            for (i, rating) in Rating::ALL.into_iter().enumerate() {
                let applied = apply_rating(&card, rating, now()).unwrap();
                assert_eq!(project_rating(&card, rating).unwrap(), applied.interval);
                assert_eq!(preview[i], applied.interval);
            }
        }

        // 1e8 * 2.5 is past the interval limit; both paths must refuse it.
        let huge = card(1e8, 2.5);
        for rating in [Rating::Hard, Rating::Good, Rating::Easy] {
            assert!(matches!(
                project_rating(&huge, rating),
                Err(ReviewError::InvalidState(_))
            ));
            assert!(matches!(
                apply_rating(&huge, rating, now()),
                Err(ReviewError::InvalidState(_))
            ));
        }
        assert!(preview_intervals(&huge).is_err());
        assert_eq!(project_rating(&huge, Rating::Again).unwrap(), 0.0);
        assert_eq!(apply_rating(&huge, Rating::Again, now()).unwrap().interval, 0.0);
    }

    #[test]
    fn test_rounding_ties_go_away_from_zero() {
        assert_eq!(round_to_tenth(0.25), 0.3);
        assert_eq!(round_to_tenth(2.75), 2.8);
        assert_eq!(round_to_tenth(4.04), 4.0);
    }

    #[test]
    fn test_apply_rating_is_pure() {
        let original = card(6.0, 2.2);
        let snapshot = original.clone();

        let first = apply_rating(&original, Rating::Hard, now()).unwrap();
        let second = apply_rating(&original, Rating::Hard, now()).unwrap();

        assert_eq!(first, second);
        assert_eq!(original, snapshot);
        assert_eq!(first.prompt, "term");
        assert_eq!(first.id, "c1");
    }

    #[test]
    fn test_mastery_is_reached_and_revocable() {
        let mut state = card(0.0, 2.5);
        let mut reviews = 0;
        while !state.mastered {
            state = apply_rating(&state, Rating::Easy, now()).unwrap();
            reviews += 1;
            assert!(reviews < 10, "easy ratings should reach mastery quickly");
        }
        assert!(state.interval > 21.0);

        let lapsed = apply_rating(&state, Rating::Again, now()).unwrap();
        assert!(!lapsed.mastered);
        assert_eq!(lapsed.interval, 0.0);
    }

    #[test]
    fn test_invalid_state_is_rejected() {
        let negative = card(-1.0, 2.5);
        assert!(matches!(
            apply_rating(&negative, Rating::Good, now()),
            Err(ReviewError::InvalidState(_))
        ));

        let nan_ease = card(1.0, f64::NAN);
        assert!(project_rating(&nan_ease, Rating::Good).is_err());
        assert!(preview_intervals(&nan_ease).is_err());
    }

    #[test]
    fn test_due_date_overflow_is_invalid_state() {
        let huge = card(1e300, 2.5);
        assert!(matches!(
            apply_rating(&huge, Rating::Good, now()),
            Err(ReviewError::InvalidState(_))
        ));
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(0.0), "now");
        assert_eq!(format_interval(1.0), "1d");
        assert_eq!(format_interval(2.5), "2.5d");
        assert_eq!(format_interval(7.0), "1w");
        assert_eq!(format_interval(14.0), "2w");
        assert_eq!(format_interval(30.0), "1mo");
        assert_eq!(format_interval(90.0), "3mo");
        assert_eq!(format_interval(365.0), "1y");
        assert_eq!(format_interval(730.0), "2y");
    }
}

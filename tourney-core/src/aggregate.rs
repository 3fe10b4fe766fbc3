//! Pure sums and averages over raw entries.
//!
//! Entries that fail to parse contribute zero but still count toward an average's
//! denominator.

use crate::error::{StatField, ValidationError};
use crate::numbers::{round_f64_to_i64, usize_to_f64};
use crate::submission::{EntryValue, Submission};

/// Parse one entry as a finite number.
///
/// Blank text counts as zero, the same as an untouched numeric input.
#[must_use]
pub fn parse_entry(entry: &EntryValue) -> Option<f64> {
    match entry {
        EntryValue::Number(n) => n.is_finite().then_some(*n),
        EntryValue::Text(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
    }
}

/// Sum of all parseable entries.
#[must_use]
pub fn sum(values: &[EntryValue]) -> f64 {
    values.iter().filter_map(parse_entry).sum()
}

/// Arithmetic mean over every entry, 0 for an empty list.
#[must_use]
pub fn average(values: &[EntryValue]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    sum(values) / usize_to_f64(values.len())
}

/// Aggregates of a single submission, before any merge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubmissionTotals {
    pub total_kills: i64,
    pub average_damage: f64,
    pub average_accuracy: f64,
}

impl SubmissionTotals {
    #[must_use]
    pub fn compute(submission: &Submission) -> Self {
        Self {
            total_kills: round_f64_to_i64(sum(&submission.kills)),
            average_damage: average(&submission.damages),
            average_accuracy: average(&submission.accuracies),
        }
    }

    /// Like [`Self::compute`], but refuses lists whose sum overflows `f64`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] naming the first overflowing list.
    pub fn checked(submission: &Submission) -> Result<Self, ValidationError> {
        for (field, list) in [
            (StatField::Kills, &submission.kills),
            (StatField::Damages, &submission.damages),
            (StatField::Accuracies, &submission.accuracies),
        ] {
            if !sum(list).is_finite() {
                return Err(ValidationError::OutOfRange { field });
            }
        }
        Ok(Self::compute(submission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_skips_unparseable_entries() {
        let values = [EntryValue::from(5), EntryValue::from("abc"), EntryValue::from(3)];
        assert!((sum(&values) - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert!((average(&[]) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn average_of_two_values() {
        let values = [EntryValue::from(10), EntryValue::from(20)];
        assert!((average(&values) - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unparseable_entries_still_count_in_the_denominator() {
        let values = [EntryValue::from(10), EntryValue::from("n/a")];
        assert!((average(&values) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parse_entry_handles_text_forms() {
        assert_eq!(parse_entry(&EntryValue::from(" 12.5 ")), Some(12.5));
        assert_eq!(parse_entry(&EntryValue::from("")), Some(0.0));
        assert_eq!(parse_entry(&EntryValue::from("1e2")), Some(100.0));
        assert_eq!(parse_entry(&EntryValue::from("inf")), None);
        assert_eq!(parse_entry(&EntryValue::Number(f64::NAN)), None);
        assert_eq!(parse_entry(&EntryValue::from("12abc")), None);
    }

    #[test]
    fn totals_round_fractional_kills() {
        let submission = Submission::new("A", "B")
            .with_kills([EntryValue::from(1.4), EntryValue::from(1.4)])
            .with_damages([100, 50])
            .with_accuracies([EntryValue::from("40"), EntryValue::from("x")])
            .with_events(2);
        let totals = SubmissionTotals::compute(&submission);
        assert_eq!(totals.total_kills, 3);
        assert!((totals.average_damage - 75.0).abs() < f64::EPSILON);
        assert!((totals.average_accuracy - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn checked_totals_reject_overflowing_sums() {
        let submission = Submission::new("A", "B")
            .with_kills([1, 2])
            .with_damages([1e308, 1e308])
            .with_accuracies([50, 60])
            .with_events(2);
        assert_eq!(
            SubmissionTotals::checked(&submission),
            Err(ValidationError::OutOfRange {
                field: StatField::Damages
            })
        );

        let large = submission.with_damages([1e307, 1e307]);
        let totals = SubmissionTotals::checked(&large).unwrap();
        assert!((totals.average_damage - 1e307).abs() < 1e292);
    }
}

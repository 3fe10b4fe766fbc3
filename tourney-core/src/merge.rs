//! Combining a submission into a player's running totals
use serde::{Deserialize, Serialize};

use crate::aggregate::SubmissionTotals;
use crate::error::{StatField, ValidationError};
use crate::numbers::{i64_to_f64, ratio, round_to_hundredths};
use crate::player::PlayerRecord;
use crate::submission::Submission;

/// Formula used to blend a new batch into an existing record's averages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergePolicy {
    /// Weighted average of averages: each side weighted by its own event count.
    #[default]
    Weighted,
    /// Legacy blend: the new batch's *kill total* is added to the damage sum, and its
    /// averages are added unweighted. Results drift from true averages as batches accumulate.
    Observed,
}

impl PlayerRecord {
    /// Build a fresh record from a submission that matched no existing identity.
    #[must_use]
    pub fn from_submission(submission: &Submission, totals: &SubmissionTotals) -> Self {
        Self {
            player_name: submission.player_name.clone(),
            clan_name: submission.clan_name.clone(),
            total_kills: totals.total_kills,
            events: submission.events,
            kills_per_event: round_to_hundredths(ratio(
                i64_to_f64(totals.total_kills),
                submission.events,
            )),
            average_damage: round_to_hundredths(totals.average_damage),
            average_accuracy: round_to_hundredths(totals.average_accuracy),
        }
    }
}

impl MergePolicy {
    /// Fold `submission` into `existing`, returning the updated record.
    ///
    /// Identity is taken from `existing`; callers match identities before merging.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] when a blended average no longer fits in `f64`.
    pub fn merge(
        self,
        existing: &PlayerRecord,
        submission: &Submission,
        totals: &SubmissionTotals,
    ) -> Result<PlayerRecord, ValidationError> {
        let total_kills = existing.total_kills.saturating_add(totals.total_kills);
        let events = existing.events.saturating_add(submission.events);
        let prior_weight = f64::from(existing.events);
        let batch_weight = f64::from(submission.events);

        let (damage_sum, accuracy_sum) = match self {
            Self::Weighted => (
                existing.average_damage.mul_add(prior_weight, totals.average_damage * batch_weight),
                existing
                    .average_accuracy
                    .mul_add(prior_weight, totals.average_accuracy * batch_weight),
            ),
            Self::Observed => (
                existing
                    .average_damage
                    .mul_add(prior_weight, i64_to_f64(totals.total_kills)),
                existing
                    .average_accuracy
                    .mul_add(prior_weight, totals.average_accuracy),
            ),
        };
        if !damage_sum.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: StatField::Damages,
            });
        }
        if !accuracy_sum.is_finite() {
            return Err(ValidationError::OutOfRange {
                field: StatField::Accuracies,
            });
        }

        Ok(PlayerRecord {
            player_name: existing.player_name.clone(),
            clan_name: existing.clan_name.clone(),
            total_kills,
            events,
            kills_per_event: round_to_hundredths(ratio(i64_to_f64(total_kills), events)),
            average_damage: round_to_hundredths(ratio(damage_sum, events)),
            average_accuracy: round_to_hundredths(ratio(accuracy_sum, events)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_batch() -> Submission {
        Submission::new("Alice", "ClanX")
            .with_kills([3, 2])
            .with_damages([10, 20])
            .with_accuracies([50, 60])
            .with_events(2)
    }

    fn second_batch() -> Submission {
        Submission::new("Alice", "ClanX")
            .with_kills([1])
            .with_damages([30])
            .with_accuracies([70])
            .with_events(1)
    }

    fn seeded() -> PlayerRecord {
        let submission = first_batch();
        PlayerRecord::from_submission(&submission, &SubmissionTotals::compute(&submission))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn new_record_takes_submission_totals() {
        let record = seeded();
        assert_eq!(record.total_kills, 5);
        assert_eq!(record.events, 2);
        assert_close(record.kills_per_event, 2.5);
        assert_close(record.average_damage, 15.0);
        assert_close(record.average_accuracy, 55.0);
    }

    #[test]
    fn zero_event_submission_has_zero_ratios() {
        let submission = Submission::new("Ghost", "None");
        let record =
            PlayerRecord::from_submission(&submission, &SubmissionTotals::compute(&submission));
        assert_eq!(record.events, 0);
        assert_close(record.kills_per_event, 0.0);
        assert_close(record.average_damage, 0.0);
    }

    #[test]
    fn weighted_merge_blends_by_event_count() {
        let batch = second_batch();
        let merged =
            MergePolicy::Weighted.merge(&seeded(), &batch, &SubmissionTotals::compute(&batch))
                .unwrap();
        assert_eq!(merged.total_kills, 6);
        assert_eq!(merged.events, 3);
        assert_close(merged.kills_per_event, 2.0);
        assert_close(merged.average_damage, 20.0);
        assert_close(merged.average_accuracy, 60.0);
    }

    #[test]
    fn observed_merge_reproduces_legacy_formula() {
        let batch = second_batch();
        let merged =
            MergePolicy::Observed.merge(&seeded(), &batch, &SubmissionTotals::compute(&batch))
                .unwrap();
        assert_eq!(merged.total_kills, 6);
        assert_eq!(merged.events, 3);
        assert_close(merged.kills_per_event, 2.0);
        // (15 * 2 + 1 kill) / 3
        assert_close(merged.average_damage, 10.33);
        // (55 * 2 + 70) / 3
        assert_close(merged.average_accuracy, 60.0);
    }

    #[test]
    fn policies_diverge_on_multi_event_batches() {
        let batch = Submission::new("Alice", "ClanX")
            .with_kills([4, 4])
            .with_damages([40, 40])
            .with_accuracies([80, 80])
            .with_events(2);
        let totals = SubmissionTotals::compute(&batch);
        let weighted = MergePolicy::Weighted.merge(&seeded(), &batch, &totals).unwrap();
        let observed = MergePolicy::Observed.merge(&seeded(), &batch, &totals).unwrap();
        // (15 * 2 + 40 * 2) / 4 and (55 * 2 + 80 * 2) / 4
        assert_close(weighted.average_damage, 27.5);
        assert_close(weighted.average_accuracy, 67.5);
        // (15 * 2 + 8) / 4 and (55 * 2 + 80) / 4
        assert_close(observed.average_damage, 9.5);
        assert_close(observed.average_accuracy, 47.5);
        assert_eq!(weighted.total_kills, observed.total_kills);
    }

    #[test]
    fn merge_keeps_existing_identity() {
        let batch = second_batch();
        let merged =
            MergePolicy::Weighted.merge(&seeded(), &batch, &SubmissionTotals::compute(&batch))
                .unwrap();
        assert_eq!(merged.player_name, "Alice");
        assert_eq!(merged.clan_name, "ClanX");
    }

    #[test]
    fn weighted_merge_refuses_overflowing_blend() {
        let huge = Submission::new("Alice", "ClanX")
            .with_kills([1])
            .with_damages([1.7e308])
            .with_accuracies([50])
            .with_events(1);
        let totals = SubmissionTotals::compute(&huge);
        let existing = PlayerRecord::from_submission(&huge, &totals);
        assert_eq!(
            MergePolicy::Weighted.merge(&existing, &huge, &totals),
            Err(ValidationError::OutOfRange {
                field: StatField::Damages
            })
        );
    }
}

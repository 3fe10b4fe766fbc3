//! Seeded random submission sweeps checking roster invariants after every step.

use anyhow::{Context, Result, bail, ensure};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::collections::HashSet;
use tourney_core::numbers::{i64_to_f64, ratio, round_to_hundredths};
use tourney_core::{
    EngineConfig, EntryValue, Identity, MemoryStorage, MergePolicy, ParsePolicy, PlayerRecord,
    SortKey, StatsEngine, Submission, SubmissionTotals, decode_roster,
};

pub const SWEEP_STEPS: usize = 48;

const PLAYERS: [&str; 4] = ["Alice", "Bob", "Chen", "Dara"];
const CLANS: [&str; 2] = ["ClanX", "ClanY"];
const MAX_DAMAGE: f64 = 500.0;
const MAX_ACCURACY: f64 = 100.0;
const TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepSummary {
    pub seed: u64,
    pub steps: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub players: usize,
}

/// A generated submission plus what the engine should do with it.
#[derive(Debug, Clone)]
struct Draw {
    submission: Submission,
    counts_match: bool,
    has_garbage: bool,
}

impl Draw {
    fn should_accept(&self, policy: ParsePolicy) -> bool {
        self.counts_match && !(self.has_garbage && policy == ParsePolicy::Strict)
    }
}

/// Drive an engine through [`SWEEP_STEPS`] random operations seeded by `seed`.
///
/// # Errors
///
/// Returns the first invariant violation, tagged with the step it occurred on.
pub fn run_invariant_sweep(seed: u64, config: &EngineConfig) -> Result<SweepSummary> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let storage = MemoryStorage::new();
    let mut engine = StatsEngine::open(storage.clone(), config.clone());
    let mut summary = SweepSummary {
        seed,
        steps: SWEEP_STEPS,
        ..SweepSummary::default()
    };

    for step in 1..=SWEEP_STEPS {
        let roll = rng.gen_range(0..100);
        if roll < 75 {
            let draw = draw_submission(&mut rng);
            if submit_and_check(&mut engine, &draw)? {
                summary.accepted += 1;
            } else {
                summary.rejected += 1;
            }
        } else if roll < 88 {
            let key = SortKey::ALL[rng.gen_range(0..SortKey::ALL.len())];
            check_sort(&mut engine, key)?;
        } else if roll < 95 {
            check_edit(&mut engine, &mut rng)?;
        } else {
            let reopened = StatsEngine::open(storage.clone(), config.clone());
            ensure!(
                reopened.roster() == engine.roster(),
                "reopened roster differs from the live one"
            );
        }

        check_roster(&engine, config).with_context(|| format!("step {step} (seed {seed})"))?;
    }

    summary.players = engine.roster().len();
    log::debug!("invariant sweep finished: {summary:?}");
    Ok(summary)
}

fn draw_entry(rng: &mut ChaCha20Rng, max: f64, has_garbage: &mut bool) -> EntryValue {
    match rng.gen_range(0..20) {
        0 => {
            *has_garbage = true;
            EntryValue::from("")
        }
        1 => EntryValue::from(format!(" {} ", rng.gen_range(0..=10_u32))),
        2 => {
            *has_garbage = true;
            EntryValue::from("n/a")
        }
        _ => EntryValue::Number(rng.gen_range(0.0..=max)),
    }
}

fn draw_submission(rng: &mut ChaCha20Rng) -> Draw {
    let player = PLAYERS[rng.gen_range(0..PLAYERS.len())];
    let clan = CLANS[rng.gen_range(0..CLANS.len())];
    let events: u32 = rng.gen_range(1..=4);
    let counts_match = rng.gen_bool(0.85);

    let base = usize::try_from(events).unwrap_or(1);
    let mut lengths = [base; 3];
    if !counts_match {
        lengths[rng.gen_range(0..3_usize)] = base + 1;
    }

    let mut has_garbage = false;
    let kills: Vec<EntryValue> = (0..lengths[0])
        .map(|_| match rng.gen_range(0..20) {
            0 => {
                has_garbage = true;
                EntryValue::from("lots")
            }
            _ => EntryValue::from(rng.gen_range(0..=10_i32)),
        })
        .collect();
    let damages: Vec<EntryValue> = (0..lengths[1])
        .map(|_| draw_entry(rng, MAX_DAMAGE, &mut has_garbage))
        .collect();
    let accuracies: Vec<EntryValue> = (0..lengths[2])
        .map(|_| draw_entry(rng, MAX_ACCURACY, &mut has_garbage))
        .collect();

    Draw {
        submission: Submission::new(player, clan)
            .with_kills(kills)
            .with_damages(damages)
            .with_accuracies(accuracies)
            .with_events(events),
        counts_match,
        has_garbage,
    }
}

/// Submit one draw and check the engine's reaction. Returns whether it was accepted.
fn submit_and_check(engine: &mut StatsEngine<MemoryStorage>, draw: &Draw) -> Result<bool> {
    let identity = draw.submission.identity();
    let before = engine.roster().to_vec();
    let prior = before.iter().find(|r| r.matches(&identity)).cloned();
    let expect_accept = draw.should_accept(engine.config().parse_policy);

    match engine.submit(&draw.submission) {
        Ok(_) if !expect_accept => bail!("{identity}: invalid submission was accepted"),
        Err(err) if expect_accept => bail!("{identity}: valid submission rejected: {err}"),
        Err(_) => {
            ensure!(
                engine.roster() == before.as_slice(),
                "{identity}: rejected submission changed the roster"
            );
            return Ok(false);
        }
        Ok(_) => {}
    }

    let batch_kills = SubmissionTotals::compute(&draw.submission).total_kills;
    let record = engine
        .find(&identity)
        .with_context(|| format!("{identity} missing after submit"))?;

    if let Some(prior) = prior {
        ensure!(
            engine.roster().len() == before.len(),
            "{identity}: merge changed the roster length"
        );
        ensure!(
            record.events == prior.events + draw.submission.events,
            "{identity}: events {} after adding {} to {}",
            record.events,
            draw.submission.events,
            prior.events
        );
        ensure!(
            record.total_kills == prior.total_kills + batch_kills,
            "{identity}: kills {} after adding {batch_kills} to {}",
            record.total_kills,
            prior.total_kills
        );
    } else {
        ensure!(
            engine.roster().len() == before.len() + 1,
            "{identity}: new identity was not appended"
        );
        ensure!(
            engine.roster().last() == Some(record),
            "{identity}: new record is not last"
        );
        ensure!(
            record.total_kills == batch_kills,
            "{identity}: first batch kills {}",
            record.total_kills
        );
    }
    ensure!(
        engine.editing().is_none(),
        "{identity}: submit left an edit marker"
    );
    Ok(true)
}

fn check_sort(engine: &mut StatsEngine<MemoryStorage>, key: SortKey) -> Result<()> {
    let mut before: Vec<Identity> = engine.roster().iter().map(PlayerRecord::identity).collect();
    let sorted = engine.sort_by(key);
    for pair in sorted.windows(2) {
        ensure!(
            key.compare(&pair[0], &pair[1]).is_le(),
            "sort by {key} left {} ahead of {}",
            pair[0].identity(),
            pair[1].identity()
        );
    }
    let mut after: Vec<Identity> = sorted.iter().map(PlayerRecord::identity).collect();
    before.sort();
    after.sort();
    ensure!(before == after, "sort by {key} changed the set of players");
    ensure!(engine.sort_key() == key, "sort key not remembered");
    Ok(())
}

fn check_edit(engine: &mut StatsEngine<MemoryStorage>, rng: &mut ChaCha20Rng) -> Result<()> {
    let len = engine.roster().len();
    let index = rng.gen_range(0..=len);
    let expected = engine.roster().get(index).map(PlayerRecord::identity);
    let started = engine.begin_edit_at(index).map(|draft| draft.identity);
    ensure!(
        started == expected,
        "edit at row {index} resolved to {started:?}, expected {expected:?}"
    );
    if rng.gen_bool(0.5) {
        engine.cancel_edit();
        ensure!(engine.editing().is_none(), "cancel left an edit marker");
    }
    ensure!(engine.roster().len() == len, "starting an edit changed the roster");
    Ok(())
}

fn is_hundredths(value: f64) -> bool {
    (round_to_hundredths(value) - value).abs() < TOLERANCE
}

fn check_record(record: &PlayerRecord, policy: MergePolicy) -> Result<()> {
    let identity = record.identity();
    let expected_kpe = round_to_hundredths(ratio(i64_to_f64(record.total_kills), record.events));
    ensure!(
        (record.kills_per_event - expected_kpe).abs() < TOLERANCE,
        "{identity}: kills per event {} but totals give {expected_kpe}",
        record.kills_per_event
    );
    for (label, value) in [
        ("kills per event", record.kills_per_event),
        ("average damage", record.average_damage),
        ("average accuracy", record.average_accuracy),
    ] {
        ensure!(value.is_finite(), "{identity}: {label} is not finite");
        ensure!(is_hundredths(value), "{identity}: {label} {value} not rounded");
        ensure!(value >= 0.0, "{identity}: {label} {value} is negative");
    }
    ensure!(record.total_kills >= 0, "{identity}: negative kills");

    if policy == MergePolicy::Weighted {
        ensure!(
            record.average_damage <= MAX_DAMAGE,
            "{identity}: average damage {} above any entry",
            record.average_damage
        );
        ensure!(
            record.average_accuracy <= MAX_ACCURACY,
            "{identity}: average accuracy {} above any entry",
            record.average_accuracy
        );
    }
    Ok(())
}

fn check_roster(engine: &StatsEngine<MemoryStorage>, config: &EngineConfig) -> Result<()> {
    let roster = engine.roster();
    let mut seen = HashSet::new();
    for record in roster {
        ensure!(
            seen.insert(record.identity()),
            "duplicate identity {}",
            record.identity()
        );
        check_record(record, config.merge_policy)?;
    }

    match engine.store().storage().raw(engine.store().key()) {
        None => ensure!(roster.is_empty(), "records exist but nothing was persisted"),
        Some(raw) => {
            let persisted = decode_roster(&raw).context("persisted roster is unreadable")?;
            ensure!(
                persisted.as_slice() == roster,
                "persisted roster differs from the live one"
            );
        }
    }
    Ok(())
}

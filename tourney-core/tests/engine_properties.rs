use tourney_core::{
    EngineConfig, EntryValue, Identity, MemoryStorage, MergePolicy, ParsePolicy, PlayerRecord,
    RosterStore, SortKey, StatField, StatsEngine, Submission, ValidationError, average,
    sort_roster, sum,
};

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn alice_first() -> Submission {
    Submission::new("Alice", "ClanX")
        .with_kills([3, 2])
        .with_damages([10, 20])
        .with_accuracies([50, 60])
        .with_events(2)
}

fn alice_second() -> Submission {
    Submission::new("Alice", "ClanX")
        .with_kills([1])
        .with_damages([30])
        .with_accuracies([70])
        .with_events(1)
}

fn single(name: &str, clan: &str, kills: i32, damage: i32, accuracy: i32) -> Submission {
    Submission::new(name, clan)
        .with_kills([kills])
        .with_damages([damage])
        .with_accuracies([accuracy])
        .with_events(1)
}

fn open(policy: MergePolicy) -> StatsEngine<MemoryStorage> {
    StatsEngine::open(
        MemoryStorage::new(),
        EngineConfig::default_config().with_merge_policy(policy),
    )
}

#[test]
fn mismatched_event_count_is_a_no_op() {
    let mut engine = open(MergePolicy::Weighted);
    engine.submit(&alice_first()).unwrap();
    let before = engine.roster().to_vec();

    for bad in [
        alice_second().with_events(2),
        alice_second().with_kills(Vec::<i32>::new()),
        alice_second().with_damages([1, 2]),
        alice_second().with_accuracies([1, 2, 3]),
    ] {
        let err = engine.submit(&bad).unwrap_err();
        assert!(matches!(err, ValidationError::EventCountMismatch { .. }));
        assert_eq!(engine.roster(), before.as_slice());
    }
}

#[test]
fn aggregator_examples() {
    let mixed = vec![EntryValue::from(5), EntryValue::from("abc"), EntryValue::from(3)];
    assert_close(sum(&mixed), 8.0);
    assert_close(average(&[]), 0.0);
    assert_close(average(&[EntryValue::from(10), EntryValue::from(20)]), 15.0);
}

#[test]
fn new_identity_creates_record() {
    let mut engine = open(MergePolicy::Weighted);
    let roster = engine.submit(&alice_first()).unwrap();
    assert_eq!(roster.len(), 1);
    let alice = &roster[0];
    assert_eq!(alice.player_name, "Alice");
    assert_eq!(alice.clan_name, "ClanX");
    assert_eq!(alice.total_kills, 5);
    assert_eq!(alice.events, 2);
    assert_close(alice.kills_per_event, 2.5);
    assert_close(alice.average_damage, 15.0);
    assert_close(alice.average_accuracy, 55.0);
}

#[test]
fn repeat_identity_merges_with_weighted_formula() {
    let mut engine = open(MergePolicy::Weighted);
    engine.submit(&alice_first()).unwrap();
    let roster = engine.submit(&alice_second()).unwrap();
    assert_eq!(roster.len(), 1);
    let alice = &roster[0];
    assert_eq!(alice.total_kills, 6);
    assert_eq!(alice.events, 3);
    assert_close(alice.kills_per_event, 2.0);
    assert_close(alice.average_damage, 20.0);
    assert_close(alice.average_accuracy, 60.0);
}

#[test]
fn repeat_identity_merges_with_observed_formula() {
    let mut engine = open(MergePolicy::Observed);
    engine.submit(&alice_first()).unwrap();
    let roster = engine.submit(&alice_second()).unwrap();
    let alice = &roster[0];
    assert_eq!(alice.total_kills, 6);
    assert_eq!(alice.events, 3);
    assert_close(alice.kills_per_event, 2.0);
    assert_close(alice.average_damage, 10.33);
    assert_close(alice.average_accuracy, 60.0);
}

#[test]
fn identity_is_case_sensitive_pair() {
    let mut engine = open(MergePolicy::Weighted);
    engine.submit(&alice_first()).unwrap();
    engine.submit(&single("alice", "ClanX", 1, 1, 1)).unwrap();
    engine.submit(&single("Alice", "ClanY", 1, 1, 1)).unwrap();
    engine.submit(&single("Alice", "ClanX", 1, 1, 1)).unwrap();
    assert_eq!(engine.roster().len(), 3);
    assert_eq!(
        engine
            .find(&Identity::new("Alice", "ClanX"))
            .map(|r| r.events),
        Some(3)
    );
}

#[test]
fn events_never_decrease_across_merges() {
    let mut engine = open(MergePolicy::Observed);
    let mut last = 0;
    for kills in 0..5 {
        engine.submit(&single("Zed", "Z", kills, 100, 50)).unwrap();
        let events = engine.roster()[0].events;
        assert!(events > last);
        last = events;
    }
    let empty = Submission::new("Zed", "Z");
    engine.submit(&empty).unwrap();
    assert_eq!(engine.roster()[0].events, last);
}

#[test]
fn sort_is_stable_descending_and_idempotent() {
    let mut engine = open(MergePolicy::Weighted);
    for (name, kills) in [("a", 2), ("b", 7), ("c", 2), ("d", 7), ("e", 0)] {
        engine.submit(&single(name, "C", kills, 10, 10)).unwrap();
    }
    let sorted: Vec<String> = engine
        .sort_by(SortKey::TotalKills)
        .iter()
        .map(|r| r.player_name.clone())
        .collect();
    assert_eq!(sorted, ["b", "d", "a", "c", "e"]);

    let once = sort_roster(engine.roster(), SortKey::TotalKills);
    let twice = sort_roster(&once, SortKey::TotalKills);
    assert_eq!(once, twice);
    assert_eq!(once.as_slice(), engine.roster());
}

#[test]
fn sorting_is_not_reapplied_on_mutation() {
    let mut engine = open(MergePolicy::Weighted);
    engine.submit(&single("low", "C", 1, 1, 1)).unwrap();
    engine.sort_by(SortKey::TotalKills);
    engine.submit(&single("high", "C", 9, 1, 1)).unwrap();
    assert_eq!(engine.roster()[0].player_name, "low");
    assert_eq!(engine.sort_by(SortKey::TotalKills)[0].player_name, "high");
}

#[test]
fn clear_then_load_is_empty() {
    let storage = MemoryStorage::new();
    let mut engine = StatsEngine::open(storage.clone(), EngineConfig::default_config());
    engine.submit(&alice_first()).unwrap();
    engine.clear();
    assert!(engine.roster().is_empty());
    assert!(RosterStore::new(storage.clone(), "players").load().is_empty());
    let reopened = StatsEngine::open(storage, EngineConfig::default_config());
    assert!(reopened.roster().is_empty());
}

#[test]
fn save_load_round_trip_for_rosters_of_any_size() {
    let store = RosterStore::new(MemoryStorage::new(), "players");
    let mut roster: Vec<PlayerRecord> = Vec::new();
    for n in 0..6_i64 {
        store.save(&roster);
        assert_eq!(store.load(), roster);
        roster.push(PlayerRecord {
            player_name: format!("player-{n}"),
            clan_name: format!("clan-{}", n % 2),
            total_kills: n * 3,
            events: u32::try_from(n).unwrap() + 1,
            kills_per_event: 1.25,
            average_damage: 99.99,
            average_accuracy: 12.5,
        });
    }
}

#[test]
fn corrupt_storage_opens_empty_and_recovers() {
    let storage = MemoryStorage::new();
    storage.insert_raw("players", "[{\"broken\":");
    let mut engine = StatsEngine::open(storage.clone(), EngineConfig::default_config());
    assert!(engine.roster().is_empty());
    engine.submit(&alice_first()).unwrap();
    let reopened = StatsEngine::open(storage, EngineConfig::default_config());
    assert_eq!(reopened.roster().len(), 1);
}

#[test]
fn custom_storage_key_is_used() {
    let storage = MemoryStorage::new();
    let config = EngineConfig::from_json(r#"{"storageKey":"league-2"}"#).unwrap();
    let mut engine = StatsEngine::open(storage.clone(), config);
    engine.submit(&alice_first()).unwrap();
    assert!(storage.raw("league-2").is_some());
    assert!(storage.raw("players").is_none());
}

#[test]
fn strict_parsing_rejects_text_entries() {
    let config = EngineConfig::default_config().with_parse_policy(ParsePolicy::Strict);
    let mut engine = StatsEngine::open(MemoryStorage::new(), config);
    let submission = Submission::new("Alice", "ClanX")
        .with_kills([EntryValue::from("two")])
        .with_damages([1])
        .with_accuracies([1])
        .with_events(1);
    let err = engine.submit(&submission).unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidEntry {
            field: StatField::Kills,
            index: 0,
            ..
        }
    ));
    assert!(engine.roster().is_empty());
}

#[test]
fn lenient_parsing_counts_text_as_zero() {
    let mut engine = open(MergePolicy::Weighted);
    let submission = Submission::new("Alice", "ClanX")
        .with_kills([EntryValue::from(4), EntryValue::from("x")])
        .with_damages([EntryValue::from("100"), EntryValue::from("")])
        .with_accuracies([80, 40])
        .with_events(2);
    let alice = &engine.submit(&submission).unwrap()[0];
    assert_eq!(alice.total_kills, 4);
    assert_close(alice.average_damage, 50.0);
    assert_close(alice.average_accuracy, 60.0);
}

#[test]
fn huge_finite_values_survive_a_reopen() {
    let storage = MemoryStorage::new();
    let mut engine = StatsEngine::open(storage.clone(), EngineConfig::default_config());
    engine.submit(&single("Alice", "ClanX", 1, 10, 50)).unwrap();
    let big = Submission::new("Big", "ClanB")
        .with_kills([1])
        .with_damages([1e307])
        .with_accuracies([50])
        .with_events(1);
    engine.submit(&big).unwrap();
    assert_eq!(engine.roster()[1].average_damage.to_bits(), 1e307_f64.to_bits());

    let reopened = StatsEngine::open(storage, EngineConfig::default_config());
    assert_eq!(reopened.roster().len(), 2);
    assert_eq!(reopened.roster(), engine.roster());
}

#[test]
fn overflowing_submissions_leave_the_roster_alone() {
    let storage = MemoryStorage::new();
    let mut engine = StatsEngine::open(storage.clone(), EngineConfig::default_config());
    let huge = Submission::new("Big", "ClanB")
        .with_kills([1])
        .with_damages([1.7e308])
        .with_accuracies([50])
        .with_events(1);
    engine.submit(&huge).unwrap();
    let before = engine.roster().to_vec();

    let err = engine.submit(&huge).unwrap_err();
    assert_eq!(
        err,
        ValidationError::OutOfRange {
            field: StatField::Damages
        }
    );
    let summed = Submission::new("Sum", "ClanS")
        .with_kills([EntryValue::from(1e308), EntryValue::from(1e308)])
        .with_damages([1, 1])
        .with_accuracies([1, 1])
        .with_events(2);
    assert_eq!(
        engine.submit(&summed).unwrap_err(),
        ValidationError::OutOfRange {
            field: StatField::Kills
        }
    );
    assert_eq!(engine.roster(), before.as_slice());

    let reopened = StatsEngine::open(storage, EngineConfig::default_config());
    assert_eq!(reopened.roster(), before.as_slice());
}

#[test]
fn strict_parsing_rejects_blank_entries() {
    let config = EngineConfig::default_config().with_parse_policy(ParsePolicy::Strict);
    let mut engine = StatsEngine::open(MemoryStorage::new(), config);
    let submission = Submission::new("Alice", "ClanX")
        .with_kills([1])
        .with_damages([EntryValue::from("  ")])
        .with_accuracies([1])
        .with_events(1);
    let err = engine.submit(&submission).unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidEntry {
            field: StatField::Damages,
            index: 0,
            raw: "  ".to_string(),
        }
    );
    assert!(engine.roster().is_empty());
}

#![cfg(target_arch = "wasm32")]

use tourney_core::{RosterStorage, RosterStore, StatsEngine, Submission};
use tourney_web::dom;
use tourney_web::storage::{WebRosterStorage, create_web_engine};
use wasm_bindgen_test::*;

wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

fn reset() {
    let storage = dom::local_storage().expect("localStorage");
    storage.remove_item("players").expect("remove players");
}

#[wasm_bindgen_test]
fn local_storage_round_trips_raw_values() {
    reset();
    let storage = WebRosterStorage;
    assert_eq!(storage.read("players").unwrap(), None);
    storage.write("players", "[]").unwrap();
    assert_eq!(storage.read("players").unwrap().as_deref(), Some("[]"));
    storage.remove("players").unwrap();
    assert_eq!(storage.read("players").unwrap(), None);
}

#[wasm_bindgen_test]
fn engine_persists_under_players_key() {
    reset();
    let mut engine: StatsEngine<WebRosterStorage> = create_web_engine();
    let submission = Submission::new("Alice", "ClanX")
        .with_kills([3, 2])
        .with_damages([10, 20])
        .with_accuracies([50, 60])
        .with_events(2);
    engine.submit(&submission).unwrap();

    let raw = dom::local_storage()
        .unwrap()
        .get_item("players")
        .unwrap()
        .expect("roster stored");
    assert!(raw.contains("\"playerName\":\"Alice\""));

    let reopened = create_web_engine();
    assert_eq!(reopened.roster(), engine.roster());

    engine.clear();
    assert!(RosterStore::new(WebRosterStorage, "players").load().is_empty());
}

#[wasm_bindgen_test]
fn corrupt_local_storage_loads_empty() {
    reset();
    dom::local_storage()
        .unwrap()
        .set_item("players", "not-json")
        .unwrap();
    assert!(create_web_engine().roster().is_empty());
    reset();
}

//! JSON API, schema and ledger persistence working together

mod common;

use common::live_banner;
use gacha_core::api::{draw_json, DrawResponse};
use gacha_core::ledger::{GachaLedger, LedgerStore, PullStatistics};
use gacha_core::{banner_schema_json, BatchOutcome};
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_sample_banner_satisfies_schema() {
    let schema: serde_json::Value = serde_json::from_str(&banner_schema_json()).unwrap();
    let compiled = jsonschema::JSONSchema::compile(&schema).expect("schema compiles");

    let banner = serde_json::to_value(live_banner()).unwrap();
    assert!(compiled.is_valid(&banner));

    let missing_settings = json!({ "name": "No Odds", "probability_progression": {} });
    assert!(!compiled.is_valid(&missing_settings));
}

#[test]
fn test_api_draws_persisted_across_sessions() {
    let dir = TempDir::new().unwrap();
    let store = LedgerStore::new(dir.path());
    let banner = live_banner();
    let banner_id = banner.resolved_id();

    for round in 0..3u64 {
        let mut ledger = store.load_or_default().unwrap();
        let state = ledger.pity("player-7", &banner_id);

        let request = json!({ "banner": banner, "state": state, "count": 10, "seed": round });
        let response: DrawResponse = serde_json::from_str(&draw_json(&request.to_string())).unwrap();
        assert!(response.success, "{:?}", response.error);

        let outcome = BatchOutcome {
            results: response.results,
            state: response.state.unwrap(),
        };
        ledger.record_batch("player-7", &banner_id, &outcome);
        store.save(&mut ledger).unwrap();
    }

    let ledger: GachaLedger = store.load().unwrap();
    let session = ledger.session("player-7", &banner_id).unwrap();
    assert_eq!(session.total_pulls, 30);
    assert_eq!(session.history.len(), 30);
    assert!(session.history.iter().all(|r| r.banner_id == banner_id));

    let stats = PullStatistics::from_session(session);
    assert_eq!(stats.five_star + stats.four_star + stats.three_star, 30);
    assert!(stats.four_star + stats.five_star >= 3);
    assert_eq!(stats.current_pity, session.pity);
}

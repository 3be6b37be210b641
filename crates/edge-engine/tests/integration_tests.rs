// Integration tests for the dynasty edge engine.
//
// These exercise the public API end to end: a league snapshot goes in as JSON,
// a scored report comes out as JSON, and the building blocks the report is made
// of (percentiles, age curves, core assets, classifier, slot parsing) keep
// their documented contracts.

use edge_engine::archetype::{self, Archetype, ArchetypeInputs, ReasonAxis};
use edge_engine::assets::{core_asset_count, select_core_assets};
use edge_engine::config::{self, ArchetypeConfig, EdgeEngineWeights, EngineConfig, DEFAULT_WEIGHTS};
use edge_engine::roster::position::Position;
use edge_engine::roster::{is_starter_slot, is_superflex_from_positions};
use edge_engine::snapshot::{LeagueSnapshot, Player};
use edge_engine::valuation::age_curve::{self, AgeZone};
use edge_engine::valuation::composite::compute_value_weighted_window;
use edge_engine::valuation::percentile::percentile_rank;
use edge_engine::{score_league, score_snapshot, EngineError};

use serde_json::{json, Value};

// ===========================================================================
// Test helpers
// ===========================================================================

fn player(id: &str, pos: &str, age: Option<u32>, value: f64) -> Value {
    json!({
        "player_id": id,
        "full_name": format!("Player {id}"),
        "position": pos,
        "age": age,
        "value": value,
    })
}

/// A 3-team, 1QB league with a mix of contenders and a rebuild.
fn league_json() -> Value {
    json!({
        "league_id": "dyn_2026",
        "name": "Dynasty League",
        "roster_positions": ["QB", "RB", "RB", "WR", "WR", "TE", "FLEX", "BN", "BN", "BN", "IR", "TAXI"],
        "as_of": "2026-09-01",
        "rosters": [
            {
                "roster_id": 1,
                "owner_id": "u1",
                "display_name": "Contender",
                "players": [
                    player("c_qb", "QB", Some(28), 7000.0),
                    player("c_rb1", "RB", Some(25), 6500.0),
                    player("c_rb2", "RB", Some(27), 4000.0),
                    player("c_wr1", "WR", Some(26), 8000.0),
                    player("c_wr2", "WR", Some(29), 5000.0),
                    player("c_te", "TE", Some(28), 3500.0),
                    player("c_wr3", "WR", Some(31), 2500.0),
                    player("c_k", "K", Some(33), 0.0)
                ],
                "picks": [{"season": 2027, "round": 2, "value": 800.0}],
                "max_points_for": 1850.4
            },
            {
                "roster_id": 2,
                "owner_id": "u2",
                "display_name": "Rebuild",
                "players": [
                    player("r_qb", "QB", Some(23), 3000.0),
                    player("r_rb1", "RB", Some(21), 3500.0),
                    player("r_wr1", "WR", Some(22), 4500.0),
                    player("r_wr2", "WR", Some(23), 3000.0),
                    {
                        "player_id": "r_te",
                        "full_name": "Born Player",
                        "position": "TE",
                        "birth_date": "2004-10-15",
                        "value": 1200.0
                    }
                ],
                "picks": [
                    {"season": 2027, "round": 1, "value": 6000.0},
                    {"season": 2027, "round": 1, "original_roster_id": 1, "value": 4500.0},
                    {"season": 2028, "round": 1, "value": 5000.0}
                ],
                "max_points_for": 1420.0
            },
            {
                "roster_id": 3,
                "display_name": "Middle",
                "players": [
                    player("m_qb", "QB", Some(30), 4500.0),
                    player("m_rb1", "RB", Some(28), 3000.0),
                    player("m_wr1", "WR", Some(27), 5500.0),
                    player("m_wr2", "WR", None, 2000.0),
                    player("m_te", "TE", Some(32), 1500.0)
                ],
                "picks": [{"season": 2027, "round": 1, "value": 3000.0}]
            }
        ]
    })
}

fn league() -> LeagueSnapshot {
    serde_json::from_value(league_json()).expect("fixture snapshot should deserialize")
}

// ===========================================================================
// End to end
// ===========================================================================

#[test]
fn scores_fixture_league_end_to_end() {
    let report = score_snapshot(&league(), &EngineConfig::default()).unwrap();

    assert_eq!(report.league_id, "dyn_2026");
    assert!(!report.superflex);
    assert!(report.weights_defaulted);
    assert_eq!(report.weights, DEFAULT_WEIGHTS);
    assert_eq!(report.teams.len(), 3);

    let contender = report.team(1).unwrap();
    let rebuild = report.team(2).unwrap();
    let middle = report.team(3).unwrap();

    // Three teams: percentiles are 0, 33.3.., 66.6..
    assert_eq!(contender.power.percentile, 100.0 * 2.0 / 3.0);
    assert_eq!(rebuild.draft_capital.percentile, 100.0 * 2.0 / 3.0);
    assert_eq!(contender.draft_capital.percentile, 0.0);
    // Prime-age starters outscore a roster still on the ascent.
    assert_eq!(contender.window.percentile, 100.0 * 2.0 / 3.0);
    assert_eq!(rebuild.window.percentile, 100.0 / 3.0);
    assert_eq!(middle.window.percentile, 0.0);

    // Kicker with no value is neither a starter nor counted in coverage.
    assert_eq!(contender.power.coverage_pct, 100.0);
    assert_eq!(contender.bench.coverage_pct, 100.0 * 7.0 / 8.0);

    // Rebuild only has 5 players for 7 starting slots.
    assert!(rebuild.power.coverage_pct < 100.0);

    // max_pf only ranked among the two teams that report it.
    assert_eq!(contender.max_pf.unwrap().percentile, 50.0);
    assert_eq!(rebuild.max_pf.unwrap().percentile, 0.0);
    assert!(middle.max_pf.is_none());
    assert_eq!(contender.reasons.len(), 4);
    assert_eq!(middle.reasons.len(), 3);

    let axes: Vec<ReasonAxis> = contender.reasons.iter().map(|r| r.axis).collect();
    assert_eq!(
        axes,
        vec![ReasonAxis::Power, ReasonAxis::Window, ReasonAxis::Draft, ReasonAxis::MaxPf]
    );

    assert_eq!(report.ranked()[0].roster_id, 1);
}

#[test]
fn birth_date_derives_age_from_as_of() {
    let report = score_snapshot(&league(), &EngineConfig::default()).unwrap();
    let rebuild = report.team(2).unwrap();
    let te = rebuild
        .core_assets
        .iter()
        .find(|a| a.player_id == "r_te")
        .unwrap();
    // Born 2004-10-15, as of 2026-09-01: birthday not reached yet.
    assert_eq!(te.age_curve.age, Some(21));
    assert_eq!(te.age_curve.zone, AgeZone::Ascent);
}

#[test]
fn core_assets_follow_format_size() {
    let report = score_snapshot(&league(), &EngineConfig::default()).unwrap();
    // 7 starting slots -> 10 core assets, but the contender only has 8 players.
    assert_eq!(core_asset_count(7), 10);
    let contender = report.team(1).unwrap();
    assert_eq!(contender.core_assets.len(), 8);
    assert_eq!(contender.core_assets[0].player_id, "c_wr1");
    assert!(contender
        .core_assets
        .windows(2)
        .all(|w| w[0].value >= w[1].value));
}

#[test]
fn every_team_gets_position_needs() {
    let report = score_snapshot(&league(), &EngineConfig::default()).unwrap();
    for team in &report.teams {
        assert_eq!(team.position_needs.len(), 4);
    }
    // Rebuild has the least TE value; the contender holds the most.
    let te_need = |id: u32| {
        report
            .team(id)
            .unwrap()
            .position_needs
            .iter()
            .find(|n| n.position == Position::TightEnd)
            .cloned()
            .unwrap()
    };
    assert_eq!(te_need(2).percentile, 0.0);
    assert_eq!(te_need(3).percentile, 100.0 / 3.0);
    assert_eq!(te_need(1).percentile, 100.0 * 2.0 / 3.0);
}

#[test]
fn report_json_is_rounded_and_labelled() {
    let report = score_snapshot(&league(), &EngineConfig::default()).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let teams = json["teams"].as_array().unwrap();
    assert_eq!(teams.len(), 3);

    let contender = &teams[0];
    assert_eq!(contender["power"]["percentile"].as_f64(), Some(66.7));
    assert_eq!(contender["bench"]["coverage_pct"].as_f64(), Some(87.5));
    assert_eq!(contender["max_pf"]["raw"].as_f64(), Some(1850.4));
    assert!(teams[2]["max_pf"].is_null());
    assert!(contender["archetype"].is_string());
    assert_eq!(contender["reasons"][3]["axis"], "max_pf");

    let asset = &contender["core_assets"][0];
    assert_eq!(asset["age_curve"]["position_bucket"], "WR");
    assert_eq!(asset["age_curve"]["zone"], "Prime");
    assert_eq!(asset["age_curve"]["color"], "green");

    assert_eq!(json["weights_defaulted"], true);
    assert_eq!(json["weights"]["starters"].as_f64(), Some(45.0));
}

#[test]
fn snapshot_round_trips_through_json() {
    let snapshot = league();
    let text = serde_json::to_string(&snapshot).unwrap();
    let back: LeagueSnapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(snapshot, back);
}

#[test]
fn snapshot_weights_and_thresholds_override_defaults() {
    let mut snapshot = league();
    snapshot.weights = Some(EdgeEngineWeights {
        starters: 0.0,
        bench: 0.0,
        picks: 100.0,
        depth: 0.0,
        age: 0.0,
    });
    let report = score_snapshot(&snapshot, &EngineConfig::default()).unwrap();
    assert!(!report.weights_defaulted);
    assert_eq!(report.ranked()[0].roster_id, 2);

    // An override with an impossible threshold is rejected before scoring.
    let mut bad = ArchetypeConfig::default();
    bad.dead_zone.power_min = 90.0;
    snapshot.archetype = Some(bad);
    let err = score_snapshot(&snapshot, &EngineConfig::default()).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArchetypeConfig(_)));
}

#[test]
fn malformed_weights_are_rejected() {
    let snapshot = league();
    let nan = EdgeEngineWeights {
        starters: f64::NAN,
        ..DEFAULT_WEIGHTS
    };
    let err = score_league(&snapshot, &EngineConfig::default(), Some(&nan)).unwrap_err();
    assert!(matches!(err, EngineError::InvalidWeights(_)));
    assert!(err.to_string().contains("starters"));
}

#[test]
fn superflex_league_is_flagged() {
    let mut snapshot = league();
    snapshot.roster_positions.insert(1, "SUPER_FLEX".into());
    let report = score_snapshot(&snapshot, &EngineConfig::default()).unwrap();
    assert!(report.superflex);
}

#[test]
fn shipped_defaults_score_like_builtin_defaults() {
    let text = std::fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/defaults/engine.toml")).unwrap();
    let shipped = config::parse_config(&text).unwrap();
    let a = score_snapshot(&league(), &shipped).unwrap();
    let b = score_snapshot(&league(), &EngineConfig::default()).unwrap();
    assert_eq!(a, b);
}

// ===========================================================================
// Contracts of the building blocks
// ===========================================================================

#[test]
fn percentile_rank_contract() {
    assert_eq!(percentile_rank(&[], 7.0), 50.0);
    assert_eq!(percentile_rank(&[3.0], 99.0), 50.0);
    assert_eq!(percentile_rank(&[10.0, 20.0, 20.0, 30.0], 20.0), 25.0);
}

#[test]
fn age_curve_is_total_for_unknown_age() {
    let cfg = config::AgeCurveConfig::default();
    for pos in ["QB", "RB", "WR", "TE", "K", "DEF", "DL", "LB", "DB", "??"] {
        assert_eq!(age_curve::status(pos, None, &cfg).zone, AgeZone::Unknown, "{pos}");
    }
}

#[test]
fn window_is_zero_without_valued_players() {
    let cfg = config::AgeCurveConfig::default();
    let empty = compute_value_weighted_window(&[], &[], &cfg);
    assert_eq!((empty.raw, empty.coverage_pct), (0.0, 0.0));

    let worthless: Vec<Player> = serde_json::from_value(json!([
        player("a", "RB", Some(24), 0.0),
        player("b", "WR", Some(27), 0.0)
    ]))
    .unwrap();
    let w = compute_value_weighted_window(&worthless, &[Some(24), Some(27)], &cfg);
    assert_eq!((w.raw, w.coverage_pct), (0.0, 0.0));
}

#[test]
fn core_asset_selection_is_bounded_sorted_and_idempotent() {
    let players: Vec<Player> = serde_json::from_value(json!(
        (0..30).map(|i| player(&format!("p{i}"), "WR", Some(25), ((i * 37) % 11) as f64 * 100.0)).collect::<Vec<_>>()
    ))
    .unwrap();
    for slots in [0, 5, 9, 20] {
        let picked = select_core_assets(&players, slots);
        assert!(picked.len() <= 12usize.min(slots + 3));
        assert!(picked.windows(2).all(|w| w[0].value >= w[1].value));
        assert_eq!(picked, select_core_assets(&players, slots));
    }
}

#[test]
fn classifier_first_rule_wins() {
    let inputs = ArchetypeInputs {
        power: 85.0,
        window: 75.0,
        draft: 30.0,
        max_pf: None,
    };
    for _ in 0..10 {
        assert_eq!(
            archetype::classify_label(&inputs, &ArchetypeConfig::default()),
            Archetype::DynastyJuggernaut
        );
    }
}

#[test]
fn classifier_is_total_over_grid() {
    let cfg = ArchetypeConfig::default();
    let mut axis: Vec<f64> = (0..=20).map(|i| i as f64 * 5.0).collect();
    axis.extend([29.9, 30.1, 39.9, 40.1, 49.9, 59.9, 60.1, 69.9, 70.1, 74.9, 79.9, 80.1]);
    for &power in &axis {
        for &window in &axis {
            for &draft in &axis {
                for max_pf in [None, Some(power), Some(100.0 - power)] {
                    let c = archetype::classify(&ArchetypeInputs { power, window, draft, max_pf }, &cfg);
                    assert!(Archetype::ALL.contains(&c.archetype));
                    assert_eq!(c.reasons.len(), if max_pf.is_some() { 4 } else { 3 });
                }
            }
        }
    }
}

#[test]
fn slot_and_superflex_contracts() {
    assert!(!is_starter_slot("BN"));
    assert!(!is_starter_slot("IR"));
    assert!(is_starter_slot("FLEX"));
    assert!(is_starter_slot("AnyFutureLabel"));

    assert!(is_superflex_from_positions(&["QB", "QB", "RB"]));
    assert!(is_superflex_from_positions(&["SUPER_FLEX"]));
    assert!(!is_superflex_from_positions(&["QB", "RB"]));
}

// Copyright 2020-2022 Kevin Reid under the terms of the MIT License as detailed
// in the accompanying file README.md or <https://opensource.org/licenses/MIT>.

//! End-to-end coverage of the scenarios worked through by hand against the
//! per-rule formulas: each one runs the full pipeline through the
//! crate-root functions rather than exercising a single module.

use dungeon_quality::assess;

fn room(id: &str, x: f64, y: f64, w: f64, h: f64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "shape": "rectangle",
        "position": { "x": x, "y": y },
        "size": { "width": w, "height": h }
    })
}

fn conn(id: &str, a: &str, b: &str) -> serde_json::Value {
    serde_json::json!({ "id": id, "from_room": a, "to_room": b })
}

fn document(rooms: serde_json::Value, connections: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "header": { "schemaName": "dnd-dungeon-unified", "schemaVersion": "1.0.0" },
        "levels": [{
            "id": "l1",
            "map": { "width": 200, "height": 200 },
            "rooms": rooms,
            "connections": connections
        }]
    })
}

#[test]
fn s1_linear_chain_of_five_rooms() {
    let rooms = serde_json::json!([
        room("r1", 0.0, 0.0, 10.0, 10.0),
        room("r2", 20.0, 0.0, 10.0, 10.0),
        room("r3", 40.0, 0.0, 10.0, 10.0),
        room("r4", 60.0, 0.0, 10.0, 10.0),
        room("r5", 80.0, 0.0, 10.0, 10.0),
    ]);
    let connections = serde_json::json!([
        conn("c1", "r1", "r2"),
        conn("c2", "r2", "r3"),
        conn("c3", "r3", "r4"),
        conn("c4", "r4", "r5"),
    ]);
    let result = assess(document(rooms, connections)).unwrap();

    assert!((result.rule_outcomes["degree_variance"].score - 0.32).abs() < 0.02);
    assert!((result.rule_outcomes["loop_ratio"].score - 0.135).abs() < 0.02);
    assert!((result.rule_outcomes["key_path_length"].score - 1.0).abs() < 1e-6);
}

#[test]
fn s2_square_loop_of_four_rooms() {
    let rooms = serde_json::json!([
        room("r1", 0.0, 0.0, 10.0, 10.0),
        room("r2", 20.0, 0.0, 10.0, 10.0),
        room("r3", 20.0, 20.0, 10.0, 10.0),
        room("r4", 0.0, 20.0, 10.0, 10.0),
    ]);
    let connections = serde_json::json!([
        conn("c1", "r1", "r2"),
        conn("c2", "r2", "r3"),
        conn("c3", "r3", "r4"),
        conn("c4", "r4", "r1"),
    ]);
    let result = assess(document(rooms, connections)).unwrap();

    assert!((result.rule_outcomes["degree_variance"].score - 0.135).abs() < 0.02);
    assert!((result.rule_outcomes["loop_ratio"].score - 0.946).abs() < 0.02);
}

#[test]
fn s3_isolated_room_plus_triangle() {
    let rooms = serde_json::json!([
        room("r1", 0.0, 0.0, 10.0, 10.0),
        room("r2", 100.0, 0.0, 10.0, 10.0),
        room("r3", 120.0, 0.0, 10.0, 10.0),
        room("r4", 110.0, 20.0, 10.0, 10.0),
    ]);
    let connections = serde_json::json!([
        conn("c1", "r2", "r3"),
        conn("c2", "r3", "r4"),
        conn("c3", "r4", "r2"),
    ]);
    let result = assess(document(rooms, connections)).unwrap();

    assert!((result.rule_outcomes["accessibility"].score - 0.592).abs() < 0.02);
}

#[test]
fn s4_single_treasure_guarded_by_a_monster() {
    let mut doc = document(
        serde_json::json!([
            room("r1", 0.0, 0.0, 10.0, 10.0),
            room("r2", 20.0, 0.0, 10.0, 10.0),
        ]),
        serde_json::json!([conn("c1", "r1", "r2")]),
    );
    doc["levels"][0]["game_elements"] = serde_json::json!([
        { "id": "t1", "name": "Gold", "type": "treasure", "position": { "x": 5.0, "y": 5.0 } },
        { "id": "m1", "name": "Goblin", "type": "monster", "position": { "x": 5.0, "y": 5.0 } },
    ]);
    let result = assess(doc).unwrap();
    assert!(result.rule_outcomes["treasure_monster_distribution"].score > 0.95);
}

#[test]
fn s5_no_monsters_falls_back_to_treasure_uniformity() {
    let mut doc = document(
        serde_json::json!([room("r1", 0.0, 0.0, 10.0, 10.0)]),
        serde_json::json!([]),
    );
    doc["levels"][0]["game_elements"] = serde_json::json!([
        { "id": "t1", "name": "Gold", "type": "treasure", "position": { "x": 5.0, "y": 5.0 } },
    ]);
    let result = assess(doc).unwrap();
    let outcome = &result.rule_outcomes["treasure_monster_distribution"];
    assert_eq!(outcome.reason.as_deref(), Some("no monsters"));
}

#[test]
fn s6_fully_disconnected_level_degrades_every_graph_rule() {
    let rooms = serde_json::json!([
        room("r1", 0.0, 0.0, 10.0, 10.0),
        room("r2", 100.0, 100.0, 10.0, 10.0),
    ]);
    let result = assess(document(rooms, serde_json::json!([]))).unwrap();
    assert_eq!(result.rule_outcomes["loop_ratio"].score, 0.0);
    assert!(result.overall_score < 0.5);
}

#[test]
fn running_assess_twice_on_the_same_document_is_deterministic() {
    let rooms: Vec<serde_json::Value> =
        (1..=30).map(|i| room(&format!("r{i}"), (i as f64) * 15.0, 0.0, 10.0, 10.0)).collect();
    let connections: Vec<serde_json::Value> = (1..30)
        .map(|i| conn(&format!("c{i}"), &format!("r{i}"), &format!("r{}", i + 1)))
        .collect();
    let doc = document(serde_json::json!(rooms), serde_json::json!(connections));

    let a = assess(doc.clone()).unwrap();
    let b = assess(doc).unwrap();
    assert_eq!(a.overall_score, b.overall_score);
    assert_eq!(
        a.rule_outcomes["path_diversity"].score,
        b.rule_outcomes["path_diversity"].score
    );
}

use lane_core::GridLocation;
use lanebot::{simulate, BotConfig};

#[test]
fn plays_the_requested_number_of_turns() {
    let config = BotConfig {
        turns: 4,
        ..BotConfig::default()
    };

    let summary = simulate(&config).unwrap();
    assert_eq!(summary.profile, "standard");
    assert_eq!(summary.turns.len(), 4);
    assert_eq!(
        summary.turns.iter().map(|t| t.turn).collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
    assert!(summary.turns.iter().all(|t| !t.forfeited));
    assert!(summary.turns[0].accepted > 0);
    assert!(summary.breaches.is_empty());
    assert_eq!(summary.final_health, 30.0);
    assert_eq!(summary.trace.turns_started(), 4);
    assert!(summary.trace.forfeits().next().is_none());
}

#[test]
fn scenario_breaches_reach_the_ledger() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("leaky.yaml");
    std::fs::write(
        &path,
        "breaches:\n  - { at: [5, 0], turn: 0, damage: 2 }\n  - { at: [9, 1], turn: 0 }\n  - { at: [5, 0], turn: 1 }\n",
    )
    .unwrap();

    let config = BotConfig {
        profile: "dynamic".to_string(),
        turns: 3,
        scenario: Some(path),
        ..BotConfig::default()
    };

    let summary = simulate(&config).unwrap();
    assert_eq!(summary.profile, "dynamic");
    assert_eq!(
        summary.breaches,
        vec![GridLocation::new(5, 0), GridLocation::new(9, 1)]
    );
    assert_eq!(summary.final_health, 26.0);
    assert_eq!(summary.turns[0].health, 27.0);
}

#[test]
fn stops_once_health_is_gone() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lethal.yaml");
    std::fs::write(&path, "breaches:\n  - { at: [13, 0], turn: 1, damage: 50 }\n").unwrap();

    let config = BotConfig {
        turns: 10,
        scenario: Some(path),
        ..BotConfig::default()
    };

    let summary = simulate(&config).unwrap();
    assert_eq!(summary.turns.len(), 2);
    assert!(summary.final_health <= 0.0);
}

#[test]
fn missing_scenario_is_an_error() {
    let config = BotConfig {
        scenario: Some("/nonexistent/scenario.yaml".into()),
        ..BotConfig::default()
    };
    assert!(simulate(&config).is_err());
}

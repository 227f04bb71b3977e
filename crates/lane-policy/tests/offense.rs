use lane_core::{BuildRequest, GridLocation, MatchConfig, MobileKind, StationaryKind, UnitKind};
use lane_policy::{
    choose_attack, plan_offense, AttackChoice, DamageModel, LaunchPoint, PolicyProfile,
    ThreatSnapshot,
};
use lane_sim::Sandbox;

fn threat(turn: u32, turrets: usize, interceptors: usize) -> ThreatSnapshot {
    ThreatSnapshot {
        turn,
        enemy_turrets: turrets,
        enemy_turrets_total: turrets,
        enemy_turrets_left: turrets,
        enemy_turrets_right: 0,
        enemy_scouts: 0,
        enemy_demolishers: 0,
        enemy_interceptors: interceptors,
    }
}

#[test]
fn nothing_before_the_first_attack_turn() {
    let offense = PolicyProfile::standard().offense;
    assert_eq!(choose_attack(&offense, &threat(2, 10, 0), 50.0), None);
}

#[test]
fn heavy_only_above_the_turret_threshold() {
    let offense = PolicyProfile::standard().offense;
    assert_eq!(
        choose_attack(&offense, &threat(3, 4, 0), 50.0),
        Some(AttackChoice::Light)
    );
    assert_eq!(
        choose_attack(&offense, &threat(3, 5, 0), 50.0),
        Some(AttackChoice::Heavy)
    );
}

#[test]
fn interceptor_swarm_forces_the_light_attack() {
    let offense = PolicyProfile::standard().offense;
    assert_eq!(
        choose_attack(&offense, &threat(4, 9, 6), 50.0),
        Some(AttackChoice::Light)
    );
    assert_eq!(
        choose_attack(&offense, &threat(4, 9, 5), 50.0),
        Some(AttackChoice::Heavy)
    );
}

#[test]
fn unmet_minimum_means_no_attack_and_no_fallback() {
    let offense = PolicyProfile::aggressive().offense;
    assert_eq!(choose_attack(&offense, &threat(5, 0, 0), 5.9), None);
    assert_eq!(choose_attack(&offense, &threat(5, 9, 0), 5.9), None);
    assert_eq!(
        choose_attack(&offense, &threat(5, 9, 0), 6.0),
        Some(AttackChoice::Heavy)
    );

    // Standard heavy needs 3 MP; with 2 the heavy choice does not fall back to scouts.
    let standard = PolicyProfile::standard().offense;
    assert_eq!(choose_attack(&standard, &threat(5, 9, 0), 2.0), None);
    assert_eq!(
        choose_attack(&standard, &threat(5, 0, 0), 2.0),
        Some(AttackChoice::Light)
    );
}

#[test]
fn heavy_push_builds_prep_walls_then_spawns() {
    let sb = Sandbox::new(MatchConfig::standard());
    let offense = PolicyProfile::standard().offense;

    let attack = plan_offense(
        &sb,
        sb.match_config(),
        DamageModel::RepresentativeTurret,
        &offense,
        &threat(6, 6, 0),
        12.0,
    )
    .unwrap()
    .unwrap();

    assert_eq!(attack.name, "demolisher_attack");
    assert_eq!(attack.launch, GridLocation::new(13, 0));
    assert_eq!(attack.estimated_damage, None);
    assert_eq!(attack.requests.first().and_then(|r| r.unit()), Some(UnitKind::Wall));
    assert_eq!(
        attack.requests.last(),
        Some(&BuildRequest::spawn(
            MobileKind::Demolisher,
            GridLocation::new(13, 0),
            1000
        ))
    );
    let mobile = attack.requests.iter().filter(|r| r.is_mobile_spawn()).count();
    assert_eq!(mobile, 1);
}

#[test]
fn fewer_turrets_launch_picks_the_weaker_lane() {
    let sb = Sandbox::new(MatchConfig::standard());
    let mut offense = PolicyProfile::standard().offense;
    offense.light.launch = LaunchPoint::FewerTurrets {
        left: GridLocation::new(13, 0),
        right: GridLocation::new(14, 0),
    };

    let mut snapshot = threat(6, 2, 0);
    let left_heavy = plan_offense(
        &sb,
        sb.match_config(),
        DamageModel::RepresentativeTurret,
        &offense,
        &snapshot,
        5.0,
    )
    .unwrap()
    .unwrap();
    assert_eq!(left_heavy.launch, GridLocation::new(14, 0));

    snapshot.enemy_turrets_left = 1;
    snapshot.enemy_turrets_right = 1;
    let tied = plan_offense(
        &sb,
        sb.match_config(),
        DamageModel::RepresentativeTurret,
        &offense,
        &snapshot,
        5.0,
    )
    .unwrap()
    .unwrap();
    assert_eq!(tied.launch, GridLocation::new(13, 0));
}

#[test]
fn prep_placements_use_place_then_upgrade_for_dynamic() {
    let heavy = PolicyProfile::dynamic().offense.heavy;
    let requests: Vec<_> = heavy.prep.iter().flat_map(|p| p.requests()).collect();
    assert_eq!(
        requests.first(),
        Some(&BuildRequest::place(
            StationaryKind::Wall,
            vec![
                GridLocation::new(6, 11),
                GridLocation::new(9, 11),
                GridLocation::new(18, 11),
                GridLocation::new(21, 11),
            ]
        ))
    );
    assert!(matches!(requests.last(), Some(BuildRequest::Upgrade { .. })));
}

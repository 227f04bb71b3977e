use lane_core::{GridLocation, MatchConfig, MobileKind, StationaryKind};
use lane_policy::{
    detect_enemy_mobile_units, detect_enemy_unit, AxisRange, ThreatConfig, ThreatSnapshot,
    UnitFilter,
};
use lane_sim::Sandbox;

fn loc(x: i32, y: i32) -> GridLocation {
    GridLocation::new(x, y)
}

fn board() -> Sandbox {
    let mut sb = Sandbox::new(MatchConfig::standard());
    for at in [loc(3, 14), loc(10, 15), loc(20, 14), loc(13, 20)] {
        assert!(sb.place_enemy(StationaryKind::Turret, at, false));
    }
    assert!(sb.place_enemy(StationaryKind::Wall, loc(11, 15), false));
    assert!(sb.place_friendly(StationaryKind::Turret, loc(13, 12)));
    sb
}

#[test]
fn detect_enemy_unit_applies_kind_and_region() {
    let sb = board();

    assert_eq!(detect_enemy_unit(&sb, &UnitFilter::default()).unwrap(), 5);
    assert_eq!(
        detect_enemy_unit(&sb, &UnitFilter::unit(StationaryKind::Turret)).unwrap(),
        4
    );
    let front = UnitFilter::unit(StationaryKind::Turret).with_y(AxisRange::new(14, 15));
    assert_eq!(detect_enemy_unit(&sb, &front).unwrap(), 3);
    let left_front = front.with_x(AxisRange::new(0, 13));
    assert_eq!(detect_enemy_unit(&sb, &left_front).unwrap(), 2);
}

#[test]
fn mobile_units_on_structure_tiles_are_not_counted() {
    let mut sb = board();
    sb.spawn_enemy_mobile(MobileKind::Scout, loc(13, 27), 4);
    sb.spawn_enemy_mobile(MobileKind::Scout, loc(10, 15), 2);
    sb.spawn_enemy_mobile(MobileKind::Interceptor, loc(14, 27), 1);

    assert_eq!(detect_enemy_mobile_units(&sb, MobileKind::Scout).unwrap(), 4);
    assert_eq!(detect_enemy_mobile_units(&sb, MobileKind::Interceptor).unwrap(), 1);
    assert_eq!(detect_enemy_mobile_units(&sb, MobileKind::Demolisher).unwrap(), 0);
}

#[test]
fn snapshot_splits_lanes_and_region() {
    let mut sb = board();
    sb.spawn_enemy_mobile(MobileKind::Demolisher, loc(13, 26), 2);
    sb.set_turn(6);

    let config = ThreatConfig {
        turret_y: Some(AxisRange::new(14, 15)),
        ..ThreatConfig::default()
    };
    let snapshot = ThreatSnapshot::assess(&sb, &config).unwrap();

    assert_eq!(snapshot.turn, 6);
    assert_eq!(snapshot.enemy_turrets, 3);
    assert_eq!(snapshot.enemy_turrets_total, 4);
    assert_eq!(snapshot.enemy_turrets_left, 3);
    assert_eq!(snapshot.enemy_turrets_right, 1);
    assert_eq!(snapshot.mobile(MobileKind::Demolisher), 2);
    assert_eq!(snapshot.enemy_scouts, 0);
}

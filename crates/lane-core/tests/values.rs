use lane_core::{BuildRequest, GridLocation, MobileKind, StationaryKind, UnitKind};

#[test]
fn grid_location_serializes_as_pair() {
    let loc = GridLocation::new(13, 0);
    assert_eq!(serde_json::to_string(&loc).unwrap(), "[13,0]");

    let back: GridLocation = serde_json::from_str("[24, 10]").unwrap();
    assert_eq!(back, GridLocation::new(24, 10));
    assert_eq!(back.to_string(), "[24, 10]");
}

#[test]
fn step_forward_moves_one_row_away_from_own_edge() {
    assert_eq!(GridLocation::new(5, 0).step_forward(), GridLocation::new(5, 1));
    assert_eq!(GridLocation::new(9, 1).step_forward(), GridLocation::new(9, 2));
}

#[test]
fn unit_kinds_partition_into_stationary_and_mobile() {
    for kind in UnitKind::ALL {
        assert_ne!(kind.as_stationary().is_some(), kind.as_mobile().is_some());
        assert_eq!(UnitKind::ALL[kind.index()], kind);
    }
    assert_eq!(UnitKind::from(StationaryKind::Turret), UnitKind::Turret);
    assert_eq!(UnitKind::from(MobileKind::Scout), UnitKind::Scout);
}

#[test]
fn build_request_accessors() {
    let place = BuildRequest::place(StationaryKind::Wall, [GridLocation::new(0, 13)]);
    assert_eq!(place.unit(), Some(UnitKind::Wall));
    assert!(!place.is_mobile_spawn());

    let spawn = BuildRequest::spawn(MobileKind::Scout, GridLocation::new(13, 0), 1000);
    assert!(spawn.is_mobile_spawn());
    assert_eq!(spawn.locations(), &[GridLocation::new(13, 0)]);

    let upgrade = BuildRequest::upgrade(vec![GridLocation::new(3, 12)]);
    assert_eq!(upgrade.unit(), None);
}

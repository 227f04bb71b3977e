use std::cell::RefCell;
use std::rc::Rc;

use lane_core::{
    BoardView, BuildRequest, GridLocation, MatchConfig, MobileKind, ResourceKind, ServiceError,
    StationaryKind, UnitKind,
};
use lane_policy::{DecisionEngine, PolicyProfile, TurnOutcome, TurnPhase, TurnReport};
use lane_sim::{Sandbox, SandboxAction, SandboxConfig, Scenario};
use lane_tools::{TraceKind, TraceLog};

fn loc(x: i32, y: i32) -> GridLocation {
    GridLocation::new(x, y)
}

fn submitted(outcome: TurnOutcome) -> TurnReport {
    match outcome {
        TurnOutcome::Submitted(report) => report,
        TurnOutcome::Forfeited { turn, reason } => panic!("turn {turn} forfeited: {reason}"),
    }
}

fn engine(profile: PolicyProfile) -> DecisionEngine {
    DecisionEngine::new(MatchConfig::standard(), profile)
}

fn traced(profile: PolicyProfile) -> (DecisionEngine, Rc<RefCell<TraceLog>>) {
    let log = Rc::new(RefCell::new(TraceLog::default()));
    let engine = engine(profile).with_trace_sink(Box::new(log.clone()));
    (engine, log)
}

#[test]
fn opening_rush_on_an_empty_board_launches_from_the_first_candidate() {
    let mut profile = PolicyProfile::standard();
    profile.probe = None;
    let mut engine = engine(profile);
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_resource(ResourceKind::MobilePoints, 5.0);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    assert!(report.opening);
    let attack = report.attack.as_ref().expect("opening attack");
    assert_eq!(attack.launch, loc(13, 0));
    assert_eq!(attack.estimated_damage, Some(0.0));

    let opening: Vec<_> = report.in_phase(TurnPhase::Opening).collect();
    assert_eq!(opening.len(), 1);
    assert_eq!(
        opening[0].request,
        BuildRequest::spawn(MobileKind::Scout, loc(13, 0), 1000)
    );
    assert_eq!(opening[0].accepted, 5);

    // The standard opening runs before any defense and ends the turn.
    assert_eq!(report.in_phase(TurnPhase::Defense).count(), 0);
    assert!(report.threat.is_none());
    assert_eq!(sb.turn_number(), 1);
}

#[test]
fn probe_is_issued_before_everything_else() {
    let mut engine = engine(PolicyProfile::standard());
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_resource(ResourceKind::MobilePoints, 5.0);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    assert_eq!(report.requests[0].phase, TurnPhase::Probe);
    assert_eq!(
        report.requests[0].request,
        BuildRequest::spawn(MobileKind::Demolisher, loc(24, 10), 3)
    );
    // One demolisher fits in 5 MP; the rush gets what is left.
    assert_eq!(report.requests[0].accepted, 1);
    assert_eq!(report.requests[1].accepted, 2);
}

#[test]
fn later_opening_turns_defend_first() {
    let mut engine = engine(PolicyProfile::dynamic());
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(1);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    assert!(report.opening);
    assert!(report.in_phase(TurnPhase::Defense).count() > 0);
    assert!(report.threat.is_some());
    assert!(report.contingencies.is_empty());
    assert!(report.economy.is_empty());
}

#[test]
fn breach_history_drives_repairs_at_the_next_row() {
    let mut engine = engine(PolicyProfile::standard());
    let frame = r#"{"turnInfo":[1,2,0,0],"events":{"breach":[
        [[5,0],1,3,"a",2],[[5,0],1,3,"b",2],[[9,1],1,3,"c",2],[[20,6],1,3,"d",1]]}}"#;
    assert_eq!(engine.on_action_frame(frame), 2);
    assert_eq!(engine.on_action_frame(frame), 0);
    assert_eq!(engine.ledger().len(), 2);

    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(3);
    sb.set_resource(ResourceKind::StructurePoints, 200.0);
    let report = submitted(engine.take_turn(&mut sb).unwrap());

    let targets: Vec<_> = report
        .in_phase(TurnPhase::Repair)
        .map(|r| r.request.locations()[0])
        .collect();
    assert_eq!(
        targets,
        vec![loc(5, 1), loc(5, 1), loc(5, 1), loc(9, 2), loc(9, 2), loc(9, 2)]
    );
}

#[test]
fn many_front_turrets_trigger_the_heavy_push() {
    let mut engine = engine(PolicyProfile::standard());
    let mut sb = Sandbox::new(MatchConfig::standard());
    for x in [2, 5, 8, 19, 22, 25] {
        assert!(sb.place_enemy(StationaryKind::Turret, loc(x, 14), false));
    }
    sb.set_turn(3);
    sb.set_resource(ResourceKind::MobilePoints, 20.0);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    assert_eq!(report.threat.map(|t| t.enemy_turrets), Some(6));
    let attack = report.attack.as_ref().expect("attack");
    assert_eq!(attack.name, "demolisher_attack");
    let spawns: Vec<_> = report
        .in_phase(TurnPhase::Attack)
        .filter(|r| r.request.is_mobile_spawn())
        .collect();
    assert_eq!(spawns.len(), 1);
    assert_eq!(
        spawns[0].request,
        BuildRequest::spawn(MobileKind::Demolisher, loc(13, 0), 1000)
    );
    assert!(spawns[0].accepted > 0);
}

#[test]
fn no_attack_requests_below_every_minimum() {
    let mut profile = PolicyProfile::standard();
    profile.probe = None;
    let mut engine = engine(profile);
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(4);
    sb.set_resource(ResourceKind::MobilePoints, 0.5);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    assert!(report.attack.is_none());
    assert_eq!(report.in_phase(TurnPhase::Attack).count(), 0);
    assert!(report.requests.iter().all(|r| !r.request.is_mobile_spawn()));
}

#[test]
fn scout_swarm_fires_the_defensive_contingency() {
    let mut engine = engine(PolicyProfile::standard());
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.spawn_enemy_mobile(MobileKind::Scout, loc(13, 27), 6);
    sb.set_turn(4);
    sb.set_resource(ResourceKind::StructurePoints, 200.0);
    sb.set_resource(ResourceKind::MobilePoints, 20.0);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    assert_eq!(report.contingencies, vec!["scout_defense".to_string()]);
    let interceptors = report
        .in_phase(TurnPhase::Contingency)
        .filter(|r| r.request.unit() == Some(UnitKind::Interceptor))
        .count();
    assert_eq!(interceptors, 1);
    // Reactions come before the attack.
    let first_attack = report
        .requests
        .iter()
        .position(|r| r.phase == TurnPhase::Attack)
        .expect("attack dispatched");
    let last_reaction = report
        .requests
        .iter()
        .rposition(|r| r.phase == TurnPhase::Contingency)
        .expect("reaction dispatched");
    assert!(last_reaction < first_attack);
}

#[test]
fn low_health_reaction_waits_for_its_turn() {
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_health(10.0);
    sb.set_turn(4);
    let report = submitted(engine(PolicyProfile::standard()).take_turn(&mut sb).unwrap());
    assert!(report.contingencies.is_empty());

    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_health(10.0);
    sb.set_turn(5);
    let report = submitted(engine(PolicyProfile::standard()).take_turn(&mut sb).unwrap());
    assert_eq!(report.contingencies, vec!["heavy_defense".to_string()]);
}

#[test]
fn heavy_defense_spends_only_what_the_economy_pass_left() {
    let mut profile = PolicyProfile::standard();
    profile.probe = None;
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(5);
    sb.set_health(10.0);
    sb.set_resource(ResourceKind::StructurePoints, 60.0);
    sb.set_resource(ResourceKind::MobilePoints, 0.0);

    let report = submitted(engine(profile).take_turn(&mut sb).unwrap());

    assert_eq!(report.economy, vec!["upgrade_defenses".to_string()]);
    assert_eq!(report.contingencies, vec!["heavy_defense".to_string()]);

    let position = |phase: TurnPhase| report.requests.iter().position(|r| r.phase == phase);
    let last_economy = report
        .requests
        .iter()
        .rposition(|r| r.phase == TurnPhase::Economy)
        .expect("economy dispatched");
    let first_reaction = position(TurnPhase::Contingency).expect("reaction dispatched");
    assert!(last_economy < first_reaction);
    assert!(sb
        .history()
        .last()
        .is_some_and(|t| t.actions.contains(&SandboxAction::Upgraded { location: loc(0, 13) })));
}

#[test]
fn interceptor_cycle_runs_on_even_turns() {
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(4);
    let report = submitted(engine(PolicyProfile::dynamic()).take_turn(&mut sb).unwrap());
    assert!(report.contingencies.contains(&"interceptor_cycle".to_string()));

    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(5);
    let report = submitted(engine(PolicyProfile::dynamic()).take_turn(&mut sb).unwrap());
    assert!(report.contingencies.is_empty());
}

#[test]
fn surplus_structure_points_buy_upgrades() {
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(4);
    sb.set_resource(ResourceKind::StructurePoints, 100.0);

    let report = submitted(engine(PolicyProfile::standard()).take_turn(&mut sb).unwrap());

    assert!(report.economy.contains(&"upgrade_defenses".to_string()));
    assert!(sb
        .history()
        .last()
        .is_some_and(|t| t.actions.contains(&SandboxAction::Upgraded { location: loc(0, 13) })));
}

#[test]
fn economy_rule_respects_its_first_turn() {
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(10);
    sb.set_resource(ResourceKind::StructurePoints, 100.0);
    let report = submitted(engine(PolicyProfile::aggressive()).take_turn(&mut sb).unwrap());
    assert!(report.economy.is_empty());

    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(11);
    sb.set_resource(ResourceKind::StructurePoints, 100.0);
    let report = submitted(engine(PolicyProfile::aggressive()).take_turn(&mut sb).unwrap());
    assert_eq!(report.economy, vec!["late_supports".to_string()]);
}

#[test]
fn service_failure_forfeits_with_an_empty_turn() {
    let (mut engine, log) = traced(PolicyProfile::standard());
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(3);
    let before = sb.resource(ResourceKind::StructurePoints).unwrap();
    // Enough calls to queue a few builds, not enough to finish the turn.
    sb.fail_after(6);

    let outcome = engine.take_turn(&mut sb).unwrap();

    assert_eq!(
        outcome,
        TurnOutcome::Forfeited {
            turn: 3,
            reason: ServiceError::Unavailable("call budget exhausted".into()),
        }
    );
    assert_eq!(sb.turn_number(), 4);
    let record = sb.history().last().expect("turn submitted");
    assert_eq!(record.turn, 3);
    assert!(record.actions.is_empty());
    assert_eq!(log.borrow().forfeits().collect::<Vec<_>>(), vec![3]);
    assert!(log.borrow().events.iter().any(|e| matches!(
        &e.kind,
        TraceKind::Forfeit { reason } if reason.contains("call budget exhausted")
    )));

    sb.fail_after(usize::MAX);
    assert_eq!(
        sb.resource(ResourceKind::StructurePoints).unwrap(),
        before + 5.0
    );
}

#[test]
fn failed_submission_is_an_error() {
    let mut engine = engine(PolicyProfile::aggressive());
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_submit_failure(Some("socket closed"));
    assert!(engine.take_turn(&mut sb).is_err());
}

#[test]
fn trace_records_phases_and_the_launch() {
    let (mut engine, log) = traced(PolicyProfile::standard());
    let mut sb = Sandbox::new(MatchConfig::standard());
    sb.set_turn(3);

    let report = submitted(engine.take_turn(&mut sb).unwrap());

    let log = log.borrow();
    assert_eq!(log.events[0].kind, TraceKind::TurnStart);
    let defense_accepted: u32 = report.in_phase(TurnPhase::Defense).map(|r| r.accepted).sum();
    assert_eq!(log.accepted_in(TurnPhase::Defense), defense_accepted);

    let attack = report.attack.as_ref().expect("attack");
    assert_eq!(log.launches().collect::<Vec<_>>(), vec![(3, attack.launch)]);
    assert!(log.events.iter().any(|e| matches!(
        &e.kind,
        TraceKind::Launch { attack: name, estimated_damage, .. }
            if *name == attack.name && *estimated_damage == attack.estimated_damage
    )));
}

#[test]
fn scripted_match_runs_end_to_end() {
    let scenario = Scenario::from_yaml_str(
        r#"
enemy_structures:
  - { unit: turret, at: [13, 15], turn: 0 }
  - { unit: turret, at: [14, 15], turn: 2 }
breaches:
  - { at: [5, 8], turn: 2 }
"#,
    )
    .unwrap();
    let config = SandboxConfig {
        structure_income: 30.0,
        ..SandboxConfig::default()
    };
    let mut sb = Sandbox::with_config(MatchConfig::standard(), config).with_scenario(scenario);
    let mut engine = engine(PolicyProfile::dynamic());

    for _ in 0..6 {
        for frame in sb.drain_action_frames() {
            engine.on_action_frame(&frame);
        }
        submitted(engine.take_turn(&mut sb).unwrap());
    }

    assert_eq!(sb.turn_number(), 6);
    assert_eq!(engine.ledger().len(), 1);
    assert!(sb.contains_stationary_unit(loc(5, 9)).unwrap());
}

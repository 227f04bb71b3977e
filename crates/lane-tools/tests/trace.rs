use std::cell::RefCell;
use std::rc::Rc;

use lane_core::{GridLocation, TurnPhase};
use lane_tools::{emit, TraceEvent, TraceKind, TraceLog, TraceSink};

fn phase(turn: u32, phase: TurnPhase, requests: usize, accepted: u32) -> TraceEvent {
    TraceEvent::new(
        turn,
        TraceKind::Phase {
            phase,
            requests,
            accepted,
        },
    )
}

fn launch(turn: u32, x: i32, y: i32) -> TraceEvent {
    TraceEvent::new(
        turn,
        TraceKind::Launch {
            attack: "scout_rush".into(),
            at: GridLocation::new(x, y),
            estimated_damage: Some(12.5),
        },
    )
}

#[test]
fn shared_log_sees_what_the_boxed_sink_emits() {
    let log = Rc::new(RefCell::new(TraceLog::default()));
    let mut sink: Option<Box<dyn TraceSink>> = Some(Box::new(log.clone()));

    emit(&mut sink, TraceEvent::new(2, TraceKind::TurnStart));
    emit(&mut sink, phase(2, TurnPhase::Defense, 3, 7));
    drop(sink);

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log.events[1], phase(2, TurnPhase::Defense, 3, 7));
}

#[test]
fn missing_sink_drops_events() {
    let mut sink: Option<Box<dyn TraceSink>> = None;
    emit(
        &mut sink,
        TraceEvent::new(
            0,
            TraceKind::Forfeit {
                reason: "unavailable".into(),
            },
        ),
    );
    assert!(sink.is_none());
}

#[test]
fn log_summarises_a_match() {
    let mut log = TraceLog::default();
    for event in [
        TraceEvent::new(0, TraceKind::TurnStart),
        phase(0, TurnPhase::Defense, 3, 16),
        phase(0, TurnPhase::Economy, 1, 2),
        launch(0, 13, 0),
        TraceEvent::new(1, TraceKind::TurnStart),
        phase(1, TurnPhase::Defense, 3, 0),
        TraceEvent::new(
            1,
            TraceKind::Forfeit {
                reason: "call budget exhausted".into(),
            },
        ),
        TraceEvent::new(2, TraceKind::TurnStart),
        launch(2, 14, 0),
    ] {
        log.emit(event);
    }

    assert_eq!(log.turns_started(), 3);
    assert_eq!(log.accepted_in(TurnPhase::Defense), 16);
    assert_eq!(log.accepted_in(TurnPhase::Attack), 0);
    assert_eq!(
        log.launches().collect::<Vec<_>>(),
        vec![(0, GridLocation::new(13, 0)), (2, GridLocation::new(14, 0))]
    );
    assert_eq!(log.forfeits().collect::<Vec<_>>(), vec![1]);
    assert_eq!(log.for_turn(1).count(), 3);
}

#[cfg(feature = "serde")]
#[test]
fn events_serialize_with_an_event_tag() {
    let mut log = TraceLog::default();
    log.push(TraceEvent::new(4, TraceKind::TurnStart));
    log.push(launch(4, 13, 0));

    let json = serde_json::to_value(&log).expect("serialize");
    assert_eq!(json["events"][0]["kind"]["event"], "turn_start");
    assert_eq!(json["events"][1]["kind"]["event"], "launch");
    assert_eq!(json["events"][1]["kind"]["at"], serde_json::json!([13, 0]));

    let back: TraceLog = serde_json::from_value(json).expect("deserialize");
    assert_eq!(back, log);
}

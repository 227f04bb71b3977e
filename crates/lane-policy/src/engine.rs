use lane_core::{BuildRequest, GameService, MatchConfig, ResourceKind, ServiceError, TurnPhase};
use lane_tools::{emit, TraceEvent, TraceKind, TraceSink};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::offense::launch;
use crate::{
    plan_defense, plan_offense, plan_repairs, BreachEvent, BreachLedger, ContingencyPhase,
    LaunchedAttack, OpeningRush, PolicyProfile, ThreatSnapshot,
};

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedRequest {
    pub phase: TurnPhase,
    pub request: BuildRequest,
    /// Units the service accepted. Informational only.
    pub accepted: u32,
}

/// Everything one decision pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub turn: u32,
    pub requests: Vec<DispatchedRequest>,
    /// Unset when the opening rush ended the turn before assessment.
    pub threat: Option<ThreatSnapshot>,
    pub attack: Option<LaunchedAttack>,
    /// The opening rush supplied this turn's attack.
    pub opening: bool,
    pub contingencies: Vec<String>,
    pub economy: Vec<String>,
}

impl TurnReport {
    fn new(turn: u32) -> Self {
        Self {
            turn,
            requests: Vec::new(),
            threat: None,
            attack: None,
            opening: false,
            contingencies: Vec::new(),
            economy: Vec::new(),
        }
    }

    pub fn in_phase(&self, phase: TurnPhase) -> impl Iterator<Item = &DispatchedRequest> {
        self.requests.iter().filter(move |r| r.phase == phase)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Submitted(TurnReport),
    /// The service failed mid-turn; queued requests were dropped and an empty turn submitted.
    Forfeited { turn: u32, reason: ServiceError },
}

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("game service failed while planning: {0}")]
    Service(#[from] ServiceError),

    #[error("turn submission failed: {0}")]
    Submit(ServiceError),
}

/// One per match. The breach ledger is the only state carried from turn to turn.
pub struct DecisionEngine {
    config: MatchConfig,
    profile: PolicyProfile,
    ledger: BreachLedger,
    trace: Option<Box<dyn TraceSink>>,
}

impl DecisionEngine {
    pub fn new(config: MatchConfig, profile: PolicyProfile) -> Self {
        Self {
            config,
            profile,
            ledger: BreachLedger::new(),
            trace: None,
        }
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn match_config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn profile(&self) -> &PolicyProfile {
        &self.profile
    }

    pub fn ledger(&self) -> &BreachLedger {
        &self.ledger
    }

    /// Feed an action frame from the transport. Returns how many new breaches were recorded.
    pub fn on_action_frame(&mut self, frame: &str) -> usize {
        self.ledger.ingest(BreachEvent::parse_frame(frame))
    }

    pub fn record_breach(&mut self, event: BreachEvent) -> bool {
        let added = self.ledger.record(event);
        if added {
            debug!(at = %event.location, turn = event.turn, "breach recorded");
        }
        added
    }

    /// Plan and submit one turn.
    ///
    /// A service failure while planning forfeits the turn instead of failing the match; only a
    /// failed submission is returned as an error.
    pub fn take_turn<S>(&mut self, service: &mut S) -> Result<TurnOutcome, TurnError>
    where
        S: GameService + ?Sized,
    {
        let turn = service.turn_number();
        match self.plan_turn(service) {
            Ok(report) => {
                service.submit_turn().map_err(TurnError::Submit)?;
                info!(
                    turn,
                    requests = report.requests.len(),
                    attack = report.attack.as_ref().map(|a| a.name.as_str()),
                    breaches = self.ledger.len(),
                    "turn submitted"
                );
                Ok(TurnOutcome::Submitted(report))
            }
            Err(TurnError::Service(reason)) => {
                warn!(turn, error = %reason, "game service failed; forfeiting turn");
                emit(
                    &mut self.trace,
                    TraceEvent::new(turn, TraceKind::Forfeit { reason: reason.to_string() }),
                );
                service.abandon_turn();
                service.submit_turn().map_err(TurnError::Submit)?;
                Ok(TurnOutcome::Forfeited { turn, reason })
            }
            Err(err) => Err(err),
        }
    }

    /// Run every phase and dispatch its requests, without submitting.
    pub fn plan_turn<S>(&mut self, service: &mut S) -> Result<TurnReport, TurnError>
    where
        S: GameService + ?Sized,
    {
        let turn = service.turn_number();
        let mut report = TurnReport::new(turn);
        emit(&mut self.trace, TraceEvent::new(turn, TraceKind::TurnStart));

        if let Some(probe) = self.profile.probe.filter(|p| p.is_active(turn)) {
            let request = BuildRequest::spawn(probe.unit, probe.at, probe.count);
            self.dispatch_all(service, &mut report, TurnPhase::Probe, vec![request])?;
        }

        let opening = self
            .profile
            .opening
            .as_ref()
            .filter(|o| o.is_active(turn))
            .cloned();
        if let Some(opening) = opening.as_ref().filter(|o| o.before_defense) {
            self.run_opening(service, &mut report, opening, None)?;
            return Ok(report);
        }

        let defense = plan_defense(&self.profile.defense, turn);
        self.dispatch_all(service, &mut report, TurnPhase::Defense, defense)?;

        let repairs = plan_repairs(&self.ledger, &self.profile.repair);
        self.dispatch_all(service, &mut report, TurnPhase::Repair, repairs)?;

        let threat = ThreatSnapshot::assess(&*service, &self.profile.threat)?;
        debug!(
            turn,
            enemy_turrets = threat.enemy_turrets,
            enemy_scouts = threat.enemy_scouts,
            enemy_interceptors = threat.enemy_interceptors,
            "threat assessed"
        );
        report.threat = Some(threat);

        if let Some(opening) = &opening {
            self.run_opening(service, &mut report, opening, Some(&threat))?;
            return Ok(report);
        }

        let health = if self.profile.contingencies.is_empty() {
            None
        } else {
            Some(service.health()?)
        };
        if let Some(health) = health {
            self.run_contingencies(
                service,
                &mut report,
                &threat,
                health,
                ContingencyPhase::BeforeAttack,
            )?;
        }

        let mobile_points = service.resource(ResourceKind::MobilePoints)?;
        let attack = plan_offense(
            &*service,
            &self.config,
            self.profile.damage_model,
            &self.profile.offense,
            &threat,
            mobile_points,
        )?;
        if let Some(attack) = attack {
            self.trace_launch(turn, &attack);
            self.dispatch_all(service, &mut report, TurnPhase::Attack, attack.requests.clone())?;
            report.attack = Some(attack);
        } else {
            debug!(turn, mobile_points, "no attack this turn");
        }

        for i in 0..self.profile.economy.len() {
            let rule = &self.profile.economy[i];
            let balance = service.resource(rule.resource)?;
            if !rule.applies(turn, balance) {
                continue;
            }
            let name = rule.name.clone();
            let requests = rule.requests();
            self.dispatch_all(service, &mut report, TurnPhase::Economy, requests)?;
            report.economy.push(name);
        }

        if let Some(health) = health {
            self.run_contingencies(
                service,
                &mut report,
                &threat,
                health,
                ContingencyPhase::AfterEconomy,
            )?;
        }

        Ok(report)
    }

    fn run_contingencies<S>(
        &mut self,
        service: &mut S,
        report: &mut TurnReport,
        threat: &ThreatSnapshot,
        health: f64,
        phase: ContingencyPhase,
    ) -> Result<(), TurnError>
    where
        S: GameService + ?Sized,
    {
        for i in 0..self.profile.contingencies.len() {
            let contingency = &self.profile.contingencies[i];
            if contingency.phase != phase || !contingency.trigger.fires(threat, health) {
                continue;
            }
            let name = contingency.name.clone();
            let mobile_points = service.resource(ResourceKind::MobilePoints)?;
            let requests = contingency.respond(mobile_points);
            debug!(turn = report.turn, contingency = %name, ?phase, "contingency fired");
            self.dispatch_all(service, report, TurnPhase::Contingency, requests)?;
            report.contingencies.push(name);
        }
        Ok(())
    }

    fn run_opening<S>(
        &mut self,
        service: &mut S,
        report: &mut TurnReport,
        opening: &OpeningRush,
        threat: Option<&ThreatSnapshot>,
    ) -> Result<(), TurnError>
    where
        S: GameService + ?Sized,
    {
        let mobile_points = service.resource(ResourceKind::MobilePoints)?;
        if !opening.attack.affordable(mobile_points) {
            debug!(turn = report.turn, mobile_points, "opening rush skipped");
            return Ok(());
        }
        // Only the lane split matters to the launch point before assessment, and an empty
        // snapshot ties it to the left lane.
        let fallback = ThreatSnapshot {
            turn: report.turn,
            enemy_turrets: 0,
            enemy_turrets_total: 0,
            enemy_turrets_left: 0,
            enemy_turrets_right: 0,
            enemy_scouts: 0,
            enemy_demolishers: 0,
            enemy_interceptors: 0,
        };
        let threat = threat.copied().unwrap_or(fallback);

        let attack = launch(
            &*service,
            &self.config,
            self.profile.damage_model,
            &opening.attack,
            &threat,
        )?;
        if let Some(attack) = attack {
            self.trace_launch(report.turn, &attack);
            self.dispatch_all(service, report, TurnPhase::Opening, attack.requests.clone())?;
            report.attack = Some(attack);
            report.opening = true;
        }
        Ok(())
    }

    fn trace_launch(&mut self, turn: u32, attack: &LaunchedAttack) {
        let kind = TraceKind::Launch {
            attack: attack.name.clone(),
            at: attack.launch,
            estimated_damage: attack.estimated_damage,
        };
        emit(&mut self.trace, TraceEvent::new(turn, kind));
    }

    fn dispatch_all<S>(
        &mut self,
        service: &mut S,
        report: &mut TurnReport,
        phase: TurnPhase,
        requests: Vec<BuildRequest>,
    ) -> Result<(), TurnError>
    where
        S: GameService + ?Sized,
    {
        let requests_len = requests.len();
        let mut accepted_total = 0;
        for request in requests {
            let accepted = request.dispatch(service)?;
            debug!(
                turn = report.turn,
                phase = ?phase,
                unit = request.unit().map(|u| u.as_str()).unwrap_or("upgrade"),
                locations = request.locations().len(),
                accepted,
                "request dispatched"
            );
            accepted_total += accepted;
            report.requests.push(DispatchedRequest {
                phase,
                request,
                accepted,
            });
        }
        if requests_len > 0 {
            let kind = TraceKind::Phase {
                phase,
                requests: requests_len,
                accepted: accepted_total,
            };
            emit(&mut self.trace, TraceEvent::new(report.turn, kind));
        }
        Ok(())
    }
}

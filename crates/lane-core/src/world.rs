use crate::{GridLocation, ResourceKind, ServiceError, Side, UnitInfo, UnitKind};

/// Read-only view of the current turn's board, as supplied by the game-state service.
///
/// Every query reflects the snapshot the service holds *now*; implementations may or may not
/// fold this turn's own queued builds into later answers, and callers must not depend on either.
pub trait BoardView {
    fn turn_number(&self) -> u32;

    fn resource(&self, kind: ResourceKind) -> Result<f64, ServiceError>;

    /// The agent's remaining health.
    fn health(&self) -> Result<f64, ServiceError>;

    fn contains_stationary_unit(&self, location: GridLocation) -> Result<bool, ServiceError>;

    /// Every location currently holding at least one visible unit. Order is not significant.
    fn occupied_locations(&self) -> Result<Vec<GridLocation>, ServiceError>;

    fn units_at(&self, location: GridLocation) -> Result<Vec<UnitInfo>, ServiceError>;

    /// Stationary units able to hit a unit of side `target` standing on `location`.
    fn attackers(&self, location: GridLocation, target: Side)
        -> Result<Vec<UnitInfo>, ServiceError>;
}

/// Pathfinding extension.
pub trait PathView: BoardView {
    /// Full path (start included) to the opposing edge under the current stationary layout.
    ///
    /// An empty path, or [`ServiceError::Unreachable`], means no route exists.
    fn find_path_to_edge(&self, start: GridLocation) -> Result<Vec<GridLocation>, ServiceError>;
}

/// Effect sink for the turn being planned.
///
/// Requests are best-effort and non-transactional: the return value is how many units the
/// service accepted, and rejections are not errors.
pub trait TurnSink: BoardView {
    fn attempt_spawn(
        &mut self,
        unit: UnitKind,
        locations: &[GridLocation],
        count: u32,
    ) -> Result<u32, ServiceError>;

    fn attempt_upgrade(&mut self, locations: &[GridLocation]) -> Result<u32, ServiceError>;

    /// Finalize the turn. Called exactly once per turn, after every request is queued.
    fn submit_turn(&mut self) -> Result<(), ServiceError>;

    /// Drop every request queued since the turn began.
    fn abandon_turn(&mut self);
}

/// Everything the decision engine needs from its collaborators.
pub trait GameService: TurnSink + PathView {}

impl<T> GameService for T where T: TurnSink + PathView + ?Sized {}

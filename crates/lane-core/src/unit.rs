use serde::{Deserialize, Serialize};

/// Every unit type in the match, in the order the config provider lists them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    Wall,
    Support,
    Turret,
    Scout,
    Demolisher,
    Interceptor,
}

impl UnitKind {
    /// Config order: `unitInformation[i]` describes `ALL[i]`.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Wall,
        UnitKind::Support,
        UnitKind::Turret,
        UnitKind::Scout,
        UnitKind::Demolisher,
        UnitKind::Interceptor,
    ];

    pub fn index(self) -> usize {
        match self {
            UnitKind::Wall => 0,
            UnitKind::Support => 1,
            UnitKind::Turret => 2,
            UnitKind::Scout => 3,
            UnitKind::Demolisher => 4,
            UnitKind::Interceptor => 5,
        }
    }

    pub fn is_stationary(self) -> bool {
        self.as_stationary().is_some()
    }

    pub fn as_stationary(self) -> Option<StationaryKind> {
        match self {
            UnitKind::Wall => Some(StationaryKind::Wall),
            UnitKind::Support => Some(StationaryKind::Support),
            UnitKind::Turret => Some(StationaryKind::Turret),
            _ => None,
        }
    }

    pub fn as_mobile(self) -> Option<MobileKind> {
        match self {
            UnitKind::Scout => Some(MobileKind::Scout),
            UnitKind::Demolisher => Some(MobileKind::Demolisher),
            UnitKind::Interceptor => Some(MobileKind::Interceptor),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitKind::Wall => "wall",
            UnitKind::Support => "support",
            UnitKind::Turret => "turret",
            UnitKind::Scout => "scout",
            UnitKind::Demolisher => "demolisher",
            UnitKind::Interceptor => "interceptor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationaryKind {
    Wall,
    Support,
    Turret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MobileKind {
    Scout,
    Demolisher,
    Interceptor,
}

impl MobileKind {
    pub const ALL: [MobileKind; 3] = [
        MobileKind::Scout,
        MobileKind::Demolisher,
        MobileKind::Interceptor,
    ];
}

impl From<StationaryKind> for UnitKind {
    fn from(value: StationaryKind) -> Self {
        match value {
            StationaryKind::Wall => UnitKind::Wall,
            StationaryKind::Support => UnitKind::Support,
            StationaryKind::Turret => UnitKind::Turret,
        }
    }
}

impl From<MobileKind> for UnitKind {
    fn from(value: MobileKind) -> Self {
        match value {
            MobileKind::Scout => UnitKind::Scout,
            MobileKind::Demolisher => UnitKind::Demolisher,
            MobileKind::Interceptor => UnitKind::Interceptor,
        }
    }
}

/// Ownership of a unit, from the agent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Friendly,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Friendly => Side::Enemy,
            Side::Enemy => Side::Friendly,
        }
    }
}

/// A unit as reported by the game-state service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitInfo {
    pub kind: UnitKind,
    pub owner: Side,
    /// Damage per attack against mobile units.
    pub damage: f64,
    pub health: f64,
    pub upgraded: bool,
}

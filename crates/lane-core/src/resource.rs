use serde::{Deserialize, Serialize};

/// The two currencies each side holds.
///
/// Structure points pay for walls, supports and turrets (and their upgrades); mobile points pay
/// for scouts, demolishers and interceptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    StructurePoints,
    MobilePoints,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::StructurePoints => "SP",
            ResourceKind::MobilePoints => "MP",
        }
    }
}

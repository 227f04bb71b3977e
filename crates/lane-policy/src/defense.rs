use lane_core::BuildRequest;
use serde::{Deserialize, Serialize};

use crate::template::{expand, Placement, TemplateStage};

/// Baseline defense layout.
///
/// Stages are emitted in order every turn they are active; the funnel, if any, follows them.
/// Re-issuing a template on a board where it is already built only produces rejections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefenseConfig {
    pub stages: Vec<TemplateStage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub funnel: Vec<Placement>,
}

pub fn plan_defense(config: &DefenseConfig, turn: u32) -> Vec<BuildRequest> {
    let mut out: Vec<BuildRequest> = config
        .stages
        .iter()
        .filter(|stage| stage.is_active(turn))
        .flat_map(|stage| expand(&stage.placements))
        .collect();
    out.extend(expand(&config.funnel));
    out
}

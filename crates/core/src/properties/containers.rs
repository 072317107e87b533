use serde::Serialize;

use crate::template::{GridSpec, ItemTemplate};

/// Total cell count plus the individual grids.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridLayout {
    pub capacity: i64,
    pub grids: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridCell {
    pub width: i64,
    pub height: i64,
}

impl GridLayout {
    pub fn of(t: &ItemTemplate) -> Self {
        let specs = t.grids();
        Self {
            capacity: specs.iter().map(|g| g.cells_h * g.cells_v).sum(),
            grids: specs.iter().map(GridCell::from).collect(),
        }
    }
}

impl From<&GridSpec> for GridCell {
    fn from(g: &GridSpec) -> Self {
        Self {
            width: g.cells_h,
            height: g.cells_v,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackpackProperties {
    pub speed_penalty: f64,
    pub turn_penalty: f64,
    pub ergo_penalty: f64,
    #[serde(flatten)]
    pub grid: GridLayout,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContainerProperties {
    #[serde(flatten)]
    pub grid: GridLayout,
}

pub(super) fn build_backpack(t: &ItemTemplate) -> BackpackProperties {
    BackpackProperties {
        speed_penalty: t.f64_or_zero("speedPenaltyPercent") / 100.0,
        turn_penalty: t.f64_or_zero("mousePenalty") / 100.0,
        ergo_penalty: t.f64_or_zero("weaponErgonomicPenalty"),
        grid: GridLayout::of(t),
    }
}

pub(super) fn build_container(t: &ItemTemplate) -> ContainerProperties {
    ContainerProperties {
        grid: GridLayout::of(t),
    }
}

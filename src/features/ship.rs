use serde::Serialize;

use crate::config::UiNames;
use crate::features::text::texts_in_subtree;
use crate::ui_tree::{RawNode, RegionNode, Visibility};

#[derive(Debug, Clone, Serialize)]
pub struct ShipStatus {
    pub element: RegionNode,
    pub indication: Visibility<ShipIndication>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipIndication {
    pub maneuver: Visibility<ManeuverKind>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ManeuverKind {
    Warp,
    Jump,
    Orbit,
    Approach,
}

impl ManeuverKind {
    /// Checked in this order; the first kind whose keyword appears anywhere wins.
    pub const PRIORITY: [ManeuverKind; 4] = [
        ManeuverKind::Warp,
        ManeuverKind::Jump,
        ManeuverKind::Orbit,
        ManeuverKind::Approach,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            ManeuverKind::Warp => "Warp",
            ManeuverKind::Jump => "Jump",
            ManeuverKind::Orbit => "Orbit",
            ManeuverKind::Approach => "Approach",
        }
    }

    /// Pick the maneuver named by a set of indication texts.
    pub fn from_texts(texts: &[&str]) -> Option<ManeuverKind> {
        Self::PRIORITY
            .into_iter()
            .find(|kind| texts.iter().any(|text| text.contains(kind.keyword())))
    }
}

/// The ship status panel and, when shown, the maneuver it indicates.
pub fn parse_ship_status(root: &RegionNode, names: &UiNames) -> Visibility<ShipStatus> {
    let Some(ship_ui) = root
        .descendants_with_region()
        .find(|node| node.type_name() == names.ship_ui)
    else {
        return Visibility::NotVisible;
    };

    Visibility::Visible(ShipStatus {
        element: ship_ui.clone(),
        indication: parse_indication(&ship_ui.raw, names).into(),
    })
}

// The indication container usually has no region of its own, so it is searched
// for in the raw subtree.
fn parse_indication(ship_ui: &RawNode, names: &UiNames) -> Option<ShipIndication> {
    let container = ship_ui.descendants().find(|node| {
        node.name()
            .is_some_and(|name| name.to_lowercase().contains(&names.indication_container))
    })?;

    let texts: Vec<&str> = texts_in_subtree(container).collect();
    let maneuver = ManeuverKind::from_texts(&texts);
    tracing::trace!(?texts, ?maneuver, "ship indication texts");

    Some(ShipIndication {
        maneuver: maneuver.into(),
    })
}

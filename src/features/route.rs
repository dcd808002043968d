use serde::Serialize;

use crate::config::UiNames;
use crate::ui_tree::{RegionNode, Visibility};

#[derive(Debug, Clone, Serialize)]
pub struct RouteIndicator {
    /// In tree order.
    pub markers: Vec<RouteMarker>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteMarker {
    pub element: RegionNode,
}

pub fn parse_route(root: &RegionNode, names: &UiNames) -> Visibility<RouteIndicator> {
    let Some(panel) = root
        .descendants_with_region()
        .find(|node| node.type_name() == names.route_panel)
    else {
        return Visibility::NotVisible;
    };

    let markers = panel
        .descendants_with_region()
        .filter(|node| node.type_name() == names.route_marker)
        .map(|node| RouteMarker {
            element: node.clone(),
        })
        .collect();

    Visibility::Visible(RouteIndicator { markers })
}

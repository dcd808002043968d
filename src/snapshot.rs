use std::sync::Arc;

use serde::Serialize;

use crate::config::ParserConfig;
use crate::errors::UiTreeResult;
use crate::features::{
    parse_context_menus, parse_route, parse_ship_status, ContextMenu, RouteIndicator, ShipStatus,
};
use crate::ui_tree::decode::decode_tree;
use crate::ui_tree::region::resolve_root;
use crate::ui_tree::{RegionNode, Visibility};

/// Everything known about the UI from one captured tree.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tree: RegionNode,
    pub ship: Visibility<ShipStatus>,
    pub context_menus: Vec<ContextMenu>,
    pub route: Visibility<RouteIndicator>,
}

/// Parse a captured UI tree with the default configuration.
pub fn parse_snapshot(json: &str) -> UiTreeResult<Snapshot> {
    parse_snapshot_with(json, &ParserConfig::default())
}

/// Decode `json`, resolve display regions, then run every feature extractor.
pub fn parse_snapshot_with(json: &str, config: &ParserConfig) -> UiTreeResult<Snapshot> {
    let root = decode_tree(json)?;
    let snapshot = Snapshot::from_tree(resolve_root(Arc::new(root)), config);

    tracing::debug!(
        nodes = snapshot.tree.raw.count_nodes(),
        nodes_with_region = 1 + snapshot.tree.descendants_with_region().count(),
        ship_visible = snapshot.ship.is_visible(),
        context_menus = snapshot.context_menus.len(),
        route_visible = snapshot.route.is_visible(),
        "snapshot parsed"
    );
    Ok(snapshot)
}

impl Snapshot {
    /// Run the feature extractors over an already resolved tree.
    pub fn from_tree(tree: RegionNode, config: &ParserConfig) -> Self {
        let names = &config.names;
        let ship = parse_ship_status(&tree, names);
        let context_menus = parse_context_menus(&tree, names);
        let route = parse_route(&tree, names);
        Self {
            tree,
            ship,
            context_menus,
            route,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UiTreeError;

    #[test]
    fn test_bare_root() {
        let snapshot = parse_snapshot(
            r#"{"nativeObjectAddress": 1, "nativeObjectTypeName": "UIRoot", "attributesOfInterest": {}}"#,
        )
        .unwrap();
        assert_eq!(snapshot.tree.type_name(), "UIRoot");
        assert!(snapshot.tree.children.is_empty());
        assert!(!snapshot.ship.is_visible());
        assert!(snapshot.context_menus.is_empty());
        assert!(!snapshot.route.is_visible());
    }

    #[test]
    fn test_decode_errors_are_fatal() {
        assert!(matches!(
            parse_snapshot("not json"),
            Err(UiTreeError::DecodeSyntax { .. })
        ));
        assert!(matches!(
            parse_snapshot(r#"{"attributesOfInterest": {}}"#),
            Err(UiTreeError::DecodeSchema { .. })
        ));
    }

    #[test]
    fn test_custom_route_panel_name() {
        let config = ParserConfig::from_toml_str("[names]\nroute_panel = \"RoutePanel\"\n").unwrap();
        let json = r#"{
            "nativeObjectAddress": 1,
            "attributesOfInterest": {},
            "children": [{
                "nativeObjectAddress": 2,
                "nativeObjectTypeName": "RoutePanel",
                "attributesOfInterest": {"displayX": 0, "displayY": 0, "displayWidth": 5, "displayHeight": 5}
            }]
        }"#;
        assert!(parse_snapshot_with(json, &config).unwrap().route.is_visible());
        assert!(!parse_snapshot(json).unwrap().route.is_visible());
    }
}

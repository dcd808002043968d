pub mod config;
pub mod errors;
pub mod features;
pub mod snapshot;
pub mod ui_tree;

pub use config::{ParserConfig, UiNames};
pub use errors::{NumeralError, UiTreeError, UiTreeResult};
pub use features::{
    ContextMenu, ContextMenuEntry, ManeuverKind, RouteIndicator, RouteMarker, ShipIndication,
    ShipStatus,
};
pub use snapshot::{parse_snapshot, parse_snapshot_with, Snapshot};
pub use ui_tree::{ChildSlot, DisplayRegion, RawNode, RegionNode, Visibility};

/// Install a fmt subscriber filtered by `RUST_LOG`, defaulting to `info`.
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

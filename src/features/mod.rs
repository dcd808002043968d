pub mod context_menu;
pub mod route;
pub mod ship;
pub mod text;

pub use context_menu::{parse_context_menus, ContextMenu, ContextMenuEntry};
pub use route::{parse_route, RouteIndicator, RouteMarker};
pub use ship::{parse_ship_status, ManeuverKind, ShipIndication, ShipStatus};

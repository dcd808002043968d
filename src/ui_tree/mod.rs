pub mod decode;
pub mod node;
pub mod numeral;
pub mod region;
pub mod types;

pub use node::RawNode;
pub use region::{ChildSlot, RegionNode};
pub use types::{DisplayRegion, Visibility};

use std::sync::Arc;

use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;
use serde_json::Value;

use crate::errors::NumeralError;
use crate::ui_tree::node::RawNode;
use crate::ui_tree::numeral::recover_i32;
use crate::ui_tree::types::DisplayRegion;

const X_ATTRIBUTE: &str = "displayX";
const Y_ATTRIBUTE: &str = "displayY";
const WIDTH_ATTRIBUTE: &str = "displayWidth";
const HEIGHT_ATTRIBUTE: &str = "displayHeight";

/// A raw node together with its absolute region and resolved children.
#[derive(Debug, Clone)]
pub struct RegionNode {
    pub raw: Arc<RawNode>,
    pub region: DisplayRegion,
    pub children: Vec<ChildSlot>,
}

#[derive(Debug, Clone)]
pub enum ChildSlot {
    WithRegion(RegionNode),
    /// Lacks coordinates; its own children are not resolved.
    WithoutRegion(Arc<RawNode>),
}

impl RegionNode {
    pub fn type_name(&self) -> &str {
        &self.raw.native_object_type_name
    }

    pub fn address(&self) -> &str {
        &self.raw.native_object_address
    }

    pub fn children_with_region(&self) -> impl Iterator<Item = &RegionNode> {
        self.children.iter().filter_map(|slot| match slot {
            ChildSlot::WithRegion(node) => Some(node),
            ChildSlot::WithoutRegion(_) => None,
        })
    }

    /// Depth-first, pre-order walk over the region-bearing nodes below this one.
    pub fn descendants_with_region(&self) -> RegionDescendants<'_> {
        RegionDescendants {
            stack: self.children_with_region().collect::<Vec<_>>().into_iter().rev().collect(),
        }
    }
}

impl Drop for RegionNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(slot) = stack.pop() {
            if let ChildSlot::WithRegion(mut node) = slot {
                stack.append(&mut node.children);
            }
        }
    }
}

pub struct RegionDescendants<'a> {
    stack: Vec<&'a RegionNode>,
}

impl<'a> Iterator for RegionDescendants<'a> {
    type Item = &'a RegionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let start = self.stack.len();
        self.stack.extend(node.children_with_region());
        self.stack[start..].reverse();
        Some(node)
    }
}

// ── Resolution ──────────────────────────────────────────────────────────────

/// Resolve the tree rooted at `root`. The root's own coordinates are taken as
/// absolute, or all zero when it has none.
///
/// Every other node's coordinate attributes are offsets from its parent's
/// origin; width and height are taken as they are. A node without a full,
/// decodable set of coordinates is kept as a regionless leaf and its subtree is
/// not resolved.
pub fn resolve_root(root: Arc<RawNode>) -> RegionNode {
    let region = read_offsets(&root).unwrap_or_default();

    // Explicit stack: captured trees can be nested deeper than the call stack allows.
    let mut stack: Vec<PendingRegion> = Vec::new();
    let mut current = PendingRegion::new(root, region);
    loop {
        if let Some(child) = current.raw.children().get(current.next_child).cloned() {
            current.next_child += 1;
            match read_offsets(&child) {
                Some(offsets) => {
                    let region = DisplayRegion {
                        x: current.region.x.wrapping_add(offsets.x),
                        y: current.region.y.wrapping_add(offsets.y),
                        width: offsets.width,
                        height: offsets.height,
                    };
                    let next = PendingRegion::new(child, region);
                    stack.push(std::mem::replace(&mut current, next));
                }
                None => {
                    tracing::trace!(
                        address = %child.native_object_address,
                        type_name = %child.native_object_type_name,
                        "node has no display region"
                    );
                    current.children.push(ChildSlot::WithoutRegion(child));
                }
            }
            continue;
        }

        let node = current.finish();
        match stack.pop() {
            Some(mut parent) => {
                parent.children.push(ChildSlot::WithRegion(node));
                current = parent;
            }
            None => return node,
        }
    }
}

struct PendingRegion {
    raw: Arc<RawNode>,
    region: DisplayRegion,
    next_child: usize,
    children: Vec<ChildSlot>,
}

impl PendingRegion {
    fn new(raw: Arc<RawNode>, region: DisplayRegion) -> Self {
        let children = Vec::with_capacity(raw.children().len());
        Self {
            raw,
            region,
            next_child: 0,
            children,
        }
    }

    fn finish(self) -> RegionNode {
        RegionNode {
            raw: self.raw,
            region: self.region,
            children: self.children,
        }
    }
}

/// The node's four coordinate attributes as given, or `None` if any is missing
/// or cannot be recovered.
fn read_offsets(node: &RawNode) -> Option<DisplayRegion> {
    Some(DisplayRegion {
        x: read_coordinate(node, X_ATTRIBUTE)?,
        y: read_coordinate(node, Y_ATTRIBUTE)?,
        width: read_coordinate(node, WIDTH_ATTRIBUTE)?,
        height: read_coordinate(node, HEIGHT_ATTRIBUTE)?,
    })
}

fn read_coordinate(node: &RawNode, attribute: &str) -> Option<i32> {
    let value = node.attributes.get(attribute)?;
    match coordinate_from_json(value) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::debug!(
                address = %node.native_object_address,
                attribute,
                error = %e,
                "coordinate could not be recovered"
            );
            None
        }
    }
}

/// Run the integer recovery over the compact JSON encoding of `value`.
fn coordinate_from_json(value: &Value) -> Result<i32, NumeralError> {
    let text = serde_json::to_string(value)
        .map_err(|e| NumeralError::InvalidNumeral(e.to_string()))?;
    recover_i32(&text)
}

// ── Serialization ───────────────────────────────────────────────────────────

impl Serialize for RegionNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("RegionNode", 4)?;
        state.serialize_field("nativeObjectAddress", self.address())?;
        state.serialize_field("nativeObjectTypeName", self.type_name())?;
        state.serialize_field("region", &self.region)?;
        state.serialize_field("children", &self.children)?;
        state.end()
    }
}

impl Serialize for ChildSlot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ChildSlot::WithRegion(node) => node.serialize(serializer),
            ChildSlot::WithoutRegion(raw) => raw.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui_tree::node::test_support::raw;
    use serde_json::json;

    fn coords(x: i64, y: i64, w: i64, h: i64) -> Value {
        json!({ "displayX": x, "displayY": y, "displayWidth": w, "displayHeight": h })
    }

    fn only_region_child(node: &RegionNode) -> &RegionNode {
        node.children_with_region().next().expect("child with region")
    }

    #[test]
    fn test_offset_inheritance() {
        let root = raw(
            "Root",
            coords(10, 20, 100, 50),
            vec![raw("Child", coords(5, -3, 10, 10), vec![])],
        );
        let tree = resolve_root(Arc::new(root));
        assert_eq!(tree.region, DisplayRegion::new(10, 20, 100, 50));
        assert_eq!(only_region_child(&tree).region, DisplayRegion::new(15, 17, 10, 10));
    }

    #[test]
    fn test_offsets_accumulate_but_sizes_do_not() {
        let root = raw(
            "Root",
            coords(0, 0, 1920, 1080),
            vec![raw(
                "Window",
                coords(100, 200, 400, 300),
                vec![raw("Button", coords(10, 20, 80, 24), vec![])],
            )],
        );
        let tree = resolve_root(Arc::new(root));
        let button = only_region_child(only_region_child(&tree));
        assert_eq!(button.region, DisplayRegion::new(110, 220, 80, 24));
    }

    #[test]
    fn test_zero_extended_negative_offset() {
        let root = raw(
            "Root",
            coords(0, 0, 800, 600),
            vec![raw(
                "Child",
                json!({
                    "displayX": 4294967286_u64,
                    "displayY": 30,
                    "displayWidth": 5,
                    "displayHeight": 5
                }),
                vec![],
            )],
        );
        let tree = resolve_root(Arc::new(root));
        assert_eq!(only_region_child(&tree).region, DisplayRegion::new(-10, 30, 5, 5));
    }

    #[test]
    fn test_root_without_coordinates_defaults_to_zero() {
        let root = raw("Root", json!({}), vec![raw("Child", coords(3, 4, 5, 6), vec![])]);
        let tree = resolve_root(Arc::new(root));
        assert_eq!(tree.region, DisplayRegion::default());
        assert_eq!(only_region_child(&tree).region, DisplayRegion::new(3, 4, 5, 6));
    }

    // Regionless nodes cut off their whole subtree, even region-bearing grandchildren.
    #[test]
    fn test_regionless_node_prunes_its_subtree() {
        let root = raw(
            "Root",
            coords(0, 0, 100, 100),
            vec![raw(
                "Holder",
                json!({ "displayX": 1, "displayY": 1, "displayWidth": 1 }),
                vec![raw("Deep", coords(1, 1, 1, 1), vec![])],
            )],
        );
        let tree = resolve_root(Arc::new(root));
        assert_eq!(tree.children.len(), 1);
        match &tree.children[0] {
            ChildSlot::WithoutRegion(holder) => assert_eq!(holder.children().len(), 1),
            ChildSlot::WithRegion(_) => panic!("holder should have no region"),
        }
        assert_eq!(tree.descendants_with_region().count(), 0);
    }

    #[test]
    fn test_undecodable_coordinate_drops_region() {
        for bad in [json!("12"), json!(1.5), json!(null), json!([1])] {
            let mut attributes = coords(1, 1, 1, 1);
            attributes["displayWidth"] = bad;
            let root = raw("Root", json!({}), vec![raw("Child", attributes, vec![])]);
            let tree = resolve_root(Arc::new(root));
            assert!(matches!(tree.children[0], ChildSlot::WithoutRegion(_)));
        }
    }

    #[test]
    fn test_descendants_with_region_order() {
        let root = raw(
            "Root",
            coords(0, 0, 10, 10),
            vec![
                raw("A", coords(0, 0, 1, 1), vec![raw("A1", coords(0, 0, 1, 1), vec![])]),
                raw("Gap", json!({}), vec![raw("Hidden", coords(0, 0, 1, 1), vec![])]),
                raw("B", coords(0, 0, 1, 1), vec![]),
            ],
        );
        let tree = resolve_root(Arc::new(root));
        let order: Vec<&str> = tree.descendants_with_region().map(RegionNode::type_name).collect();
        assert_eq!(order, ["A", "A1", "B"]);
    }

    #[test]
    fn test_deep_chain_resolves_and_drops() {
        let mut node = raw("Leaf", coords(1, 2, 3, 4), vec![]);
        for _ in 0..100_000 {
            node = raw("Container", coords(1, 2, 3, 4), vec![node]);
        }
        let tree = resolve_root(Arc::new(node));
        let leaf = tree.descendants_with_region().last().expect("leaf");
        assert_eq!(leaf.type_name(), "Leaf");
        assert_eq!(leaf.region, DisplayRegion::new(100_001, 200_002, 3, 4));
        assert_eq!(tree.descendants_with_region().count(), 100_000);
        drop(tree);
    }

    #[test]
    fn test_serializes_region_tree() {
        let root = raw(
            "Root",
            coords(1, 2, 3, 4),
            vec![raw("Gap", json!({ "_name": "gap" }), vec![])],
        );
        let tree = resolve_root(Arc::new(root));
        let value = serde_json::to_value(&tree).unwrap();
        assert_eq!(value["nativeObjectTypeName"], "Root");
        assert_eq!(value["region"], json!({ "x": 1, "y": 2, "width": 3, "height": 4 }));
        assert_eq!(value["children"][0]["attributesOfInterest"]["_name"], "gap");
    }
}

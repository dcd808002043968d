use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

/// Attribute holding the node's internal name.
pub const NAME_ATTRIBUTE: &str = "_name";

/// Attributes that can hold a node's display text, in preference order.
pub const TEXT_ATTRIBUTES: [&str; 2] = ["_setText", "_text"];

/// One object from the inspected process's object graph, as captured.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    /// The node's JSON object without its `children`, kept for diagnostics.
    #[serde(skip)]
    pub payload: Value,
    /// Exact source text of the address; never parsed into a machine integer.
    pub native_object_address: String,
    /// Empty when the capture did not name the type.
    pub native_object_type_name: String,
    #[serde(rename = "attributesOfInterest")]
    pub attributes: Map<String, Value>,
    /// `None` when the capture had no `children` (absent or null).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<RawNode>>>,
}

impl RawNode {
    pub fn children(&self) -> &[Arc<RawNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Depth-first, pre-order walk over every node below this one.
    pub fn descendants(&self) -> RawDescendants<'_> {
        RawDescendants {
            stack: self.children().iter().rev().map(Arc::as_ref).collect(),
        }
    }

    /// Number of nodes in this subtree, this one included.
    pub fn count_nodes(&self) -> usize {
        1 + self.descendants().count()
    }

    /// The `_name` attribute, when it is a string.
    pub fn name(&self) -> Option<&str> {
        self.attributes.get(NAME_ATTRIBUTE).and_then(Value::as_str)
    }

    /// The longest of the node's `_setText` / `_text` strings. On equal length
    /// `_setText` wins.
    pub fn display_text(&self) -> Option<&str> {
        let mut best: Option<&str> = None;
        for key in TEXT_ATTRIBUTES {
            let Some(text) = self.attributes.get(key).and_then(Value::as_str) else {
                continue;
            };
            if best.map_or(true, |b| text.chars().count() > b.chars().count()) {
                best = Some(text);
            }
        }
        best
    }
}

// Deep captures would overflow the stack with the derived, recursive drop.
impl Drop for RawNode {
    fn drop(&mut self) {
        let mut stack = self.children.take().unwrap_or_default();
        while let Some(child) = stack.pop() {
            // Subtrees still shared elsewhere are dropped by their last owner.
            if let Ok(mut node) = Arc::try_unwrap(child) {
                stack.extend(node.children.take().unwrap_or_default());
            }
        }
    }
}

pub struct RawDescendants<'a> {
    stack: Vec<&'a RawNode>,
}

impl<'a> Iterator for RawDescendants<'a> {
    type Item = &'a RawNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(Arc::as_ref));
        Some(node)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal node builder for unit tests.
    pub fn raw(type_name: &str, attributes: Value, children: Vec<RawNode>) -> RawNode {
        let attributes = match attributes {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        RawNode {
            payload: Value::Null,
            native_object_address: "0".to_string(),
            native_object_type_name: type_name.to_string(),
            attributes,
            children: if children.is_empty() {
                None
            } else {
                Some(children.into_iter().map(Arc::new).collect())
            },
        }
    }
}

use std::fmt::Write as _;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::errors::{UiTreeError, UiTreeResult};
use crate::ui_tree::node::RawNode;

const ADDRESS_FIELD: &str = "nativeObjectAddress";
const TYPE_NAME_FIELD: &str = "nativeObjectTypeName";
const ATTRIBUTES_FIELD: &str = "attributesOfInterest";
const CHILDREN_FIELD: &str = "children";

/// Parse `json` and decode the whole node tree eagerly.
///
/// Nesting depth is only bounded by the input. The JSON parser grows its stack
/// on the heap and the node tree is built with an explicit stack.
pub fn decode_tree(json: &str) -> UiTreeResult<RawNode> {
    let value = parse_json(json)?;

    let mut stack: Vec<PendingNode> = Vec::new();
    let mut current =
        PendingNode::open(value, None).map_err(|message| UiTreeError::schema("$", message))?;
    loop {
        if let Some((i, child)) = current.remaining.next() {
            let next = match PendingNode::open(child, Some(i)) {
                Ok(next) => next,
                Err(message) => {
                    stack.push(current);
                    let path = node_path(&stack, i);
                    stack.into_iter().for_each(PendingNode::discard);
                    return Err(UiTreeError::schema(&path, message));
                }
            };
            stack.push(std::mem::replace(&mut current, next));
            continue;
        }

        let node = current.finish();
        match stack.pop() {
            Some(mut parent) => {
                if let Some(children) = parent.children.as_mut() {
                    children.push(Arc::new(node));
                }
                current = parent;
            }
            None => return Ok(node),
        }
    }
}

/// Path of child `index` below the chain of pending nodes, e.g. `$.children[3].children[0]`.
fn node_path(ancestors: &[PendingNode], index: usize) -> String {
    let mut path = String::from("$");
    for i in ancestors.iter().filter_map(|node| node.index).chain([index]) {
        let _ = write!(path, ".{CHILDREN_FIELD}[{i}]");
    }
    path
}

fn parse_json(json: &str) -> UiTreeResult<Value> {
    let mut de = serde_json::Deserializer::from_str(json);
    de.disable_recursion_limit();
    let value = Value::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

/// A node whose own fields are decoded while its children are still pending.
struct PendingNode {
    /// Position among the parent's children; `None` for the root.
    index: Option<usize>,
    payload: Map<String, Value>,
    native_object_address: String,
    native_object_type_name: String,
    attributes: Map<String, Value>,
    remaining: std::iter::Enumerate<std::vec::IntoIter<Value>>,
    children: Option<Vec<Arc<RawNode>>>,
}

impl PendingNode {
    /// Decode the node's own fields. Errors are messages; the caller knows the path.
    fn open(value: Value, index: Option<usize>) -> Result<Self, String> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                let found = kind(&other);
                dismantle(other);
                return Err(format!("expected a node object, found {found}"));
            }
        };

        let fields = match NodeFields::read(&object) {
            Ok(fields) => fields,
            Err(message) => {
                dismantle(Value::Object(object));
                return Err(message);
            }
        };

        let (items, children) = match object.remove(CHILDREN_FIELD) {
            Some(Value::Array(items)) => {
                let children = Vec::with_capacity(items.len());
                (items, Some(children))
            }
            _ => (Vec::new(), None),
        };

        Ok(Self {
            index,
            payload: object,
            native_object_address: fields.address,
            native_object_type_name: fields.type_name,
            attributes: fields.attributes,
            remaining: items.into_iter().enumerate(),
            children,
        })
    }

    /// Drop the undecoded siblings without recursing through them.
    fn discard(self) {
        for (_, value) in self.remaining {
            dismantle(value);
        }
    }

    fn finish(self) -> RawNode {
        RawNode {
            payload: Value::Object(self.payload),
            native_object_address: self.native_object_address,
            native_object_type_name: self.native_object_type_name,
            attributes: self.attributes,
            children: self.children,
        }
    }
}

struct NodeFields {
    address: String,
    type_name: String,
    attributes: Map<String, Value>,
}

impl NodeFields {
    fn read(object: &Map<String, Value>) -> Result<Self, String> {
        match object.get(CHILDREN_FIELD) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            Some(other) => {
                return Err(format!(
                    "field '{CHILDREN_FIELD}' must be an array or null, found {}",
                    kind(other)
                ))
            }
        }

        let address = match object.get(ADDRESS_FIELD) {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(format!(
                    "field '{ADDRESS_FIELD}' must be a number or string, found {}",
                    kind(other)
                ))
            }
            None => return Err(missing(ADDRESS_FIELD)),
        };

        let type_name = match object.get(TYPE_NAME_FIELD) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                return Err(format!(
                    "field '{TYPE_NAME_FIELD}' must be a string, found {}",
                    kind(other)
                ))
            }
        };

        let attributes = match object.get(ATTRIBUTES_FIELD) {
            Some(Value::Object(map)) => map.clone(),
            Some(other) => {
                return Err(format!(
                    "field '{ATTRIBUTES_FIELD}' must be an object, found {}",
                    kind(other)
                ))
            }
            None => return Err(missing(ATTRIBUTES_FIELD)),
        };

        Ok(Self {
            address,
            type_name,
            attributes,
        })
    }
}

/// Drop a JSON value of any depth with a heap stack instead of recursion.
fn dismantle(value: Value) {
    let mut stack = vec![value];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items),
            Value::Object(map) => stack.extend(map.into_iter().map(|(_, v)| v)),
            _ => {}
        }
    }
}

fn missing(field: &str) -> String {
    format!("missing required field '{field}'")
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

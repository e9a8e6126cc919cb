//! Canonical node/edge representation handed to rendering engines.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An ordered list of style rules, applied by the engine in sequence.
pub type StyleRules = Vec<StyleRule>;

/// One `{ selector, style }` rule.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StyleRule {
	pub selector: String,
	#[serde(default)]
	pub style: Map<String, Value>,
}

impl StyleRule {
	pub fn new(selector: impl Into<String>, style: Value) -> Self {
		let style = match style {
			Value::Object(map) => map,
			_ => Map::new(),
		};
		Self {
			selector: selector.into(),
			style,
		}
	}
}

/// Decoded graph: elements plus the style the document carried, if any.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalGraph {
	#[serde(default)]
	pub elements: Elements,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub style: Option<StyleRules>,
}

/// Node and edge collections. Either may be absent in a host document.
///
/// Also reads the flat `[{group, data, ...}]` list form; it always writes the
/// grouped form.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementsRepr")]
pub struct Elements {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub nodes: Option<Vec<NodeRecord>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub edges: Option<Vec<EdgeRecord>>,
}

impl Elements {
	pub fn nodes(&self) -> &[NodeRecord] {
		self.nodes.as_deref().unwrap_or_default()
	}

	pub fn edges(&self) -> &[EdgeRecord] {
		self.edges.as_deref().unwrap_or_default()
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ElementsRepr {
	Grouped {
		#[serde(default)]
		nodes: Option<Vec<NodeRecord>>,
		#[serde(default)]
		edges: Option<Vec<EdgeRecord>>,
	},
	Flat(Vec<FlatElement>),
}

#[derive(Deserialize)]
struct FlatElement {
	#[serde(default)]
	group: Option<String>,
	#[serde(flatten)]
	record: NodeRecord,
}

impl FlatElement {
	/// Without a `group`, anything with both endpoints is an edge.
	fn is_edge(&self) -> bool {
		match self.group.as_deref() {
			Some(group) => group == "edges",
			None => {
				self.record.data.contains_key("source") && self.record.data.contains_key("target")
			}
		}
	}
}

impl From<ElementsRepr> for Elements {
	fn from(repr: ElementsRepr) -> Self {
		match repr {
			ElementsRepr::Grouped { nodes, edges } => Elements { nodes, edges },
			ElementsRepr::Flat(items) => {
				let (mut nodes, mut edges) = (Vec::new(), Vec::new());
				for item in items {
					if item.is_edge() {
						let NodeRecord {
							data,
							position,
							mut extra,
						} = item.record;
						if let Some(position) = position {
							extra.insert("position".into(), position);
						}
						edges.push(EdgeRecord { data, extra });
					} else {
						nodes.push(item.record);
					}
				}
				Elements {
					nodes: Some(nodes),
					edges: Some(edges),
				}
			}
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
	#[serde(default)]
	pub data: Map<String, Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub position: Option<Value>,
	/// Fields the widget does not interpret (`classes`, `selected`, ...).
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl NodeRecord {
	pub fn id(&self) -> Option<String> {
		self.data.get("id").and_then(value_as_label)
	}

	/// Embedded `{x, y}` coordinates, when both are numeric.
	pub fn point(&self) -> Option<(f64, f64)> {
		let position = self.position.as_ref()?;
		Some((position.get("x")?.as_f64()?, position.get("y")?.as_f64()?))
	}
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
	#[serde(default)]
	pub data: Map<String, Value>,
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl EdgeRecord {
	pub fn source(&self) -> Option<String> {
		self.data.get("source").and_then(value_as_label)
	}

	pub fn target(&self) -> Option<String> {
		self.data.get("target").and_then(value_as_label)
	}
}

/// JSON truthiness as the host model defines it: `null`, `false`, `0` and
/// `""` are falsy; arrays and objects are truthy even when empty.
pub fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}

/// Renders scalar data values the way they appear in labels and ids.
pub fn value_as_label(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

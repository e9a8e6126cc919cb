use log::debug;
use serde_json::{Map, Value};

use crate::widget::StyleRules;
use crate::widget::graph::value_as_label;

/// Where a node label comes from.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LabelSource {
	#[default]
	None,
	/// `data(field)`
	Field(String),
	Text(String),
}

impl LabelSource {
	fn parse(value: &Value) -> Self {
		match value.as_str() {
			None | Some("") => LabelSource::None,
			Some(s) => match s.strip_prefix("data(").and_then(|r| r.strip_suffix(')')) {
				Some(field) => LabelSource::Field(field.trim().to_string()),
				None => LabelSource::Text(s.to_string()),
			},
		}
	}

	pub fn resolve(&self, data: &Map<String, Value>) -> Option<String> {
		match self {
			LabelSource::None => None,
			LabelSource::Field(field) => data.get(field).and_then(value_as_label),
			LabelSource::Text(text) => Some(text.clone()),
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: String,
	pub width: f64,
	pub height: f64,
	pub opacity: f64,
	pub label: LabelSource,
	pub label_color: String,
	pub font_size: f64,
	pub border_color: Option<String>,
	pub border_width: f64,
}

impl Default for NodeStyle {
	fn default() -> Self {
		Self {
			fill: "#999999".into(),
			width: 30.0,
			height: 30.0,
			opacity: 1.0,
			label: LabelSource::None,
			label_color: "#000000".into(),
			font_size: 16.0,
			border_color: None,
			border_width: 0.0,
		}
	}
}

impl NodeStyle {
	fn apply(&mut self, properties: &Map<String, Value>) {
		for (property, value) in properties {
			match property.as_str() {
				"background-color" => set_string(&mut self.fill, value),
				"width" => set_length(&mut self.width, value),
				"height" => set_length(&mut self.height, value),
				"background-opacity" => set_length(&mut self.opacity, value),
				"label" => self.label = LabelSource::parse(value),
				"color" => set_string(&mut self.label_color, value),
				"font-size" => set_length(&mut self.font_size, value),
				"border-color" => self.border_color = value.as_str().map(str::to_string),
				"border-width" => set_length(&mut self.border_width, value),
				_ => {}
			}
		}
	}

	/// Bounding radius, used for hit testing and edge clipping.
	pub fn radius(&self) -> f64 {
		self.width.max(self.height) / 2.0
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub line_color: String,
	pub width: f64,
	pub opacity: f64,
	pub arrow_color: String,
	pub arrow: bool,
}

impl Default for EdgeStyle {
	fn default() -> Self {
		Self {
			line_color: "#999999".into(),
			width: 3.0,
			opacity: 1.0,
			arrow_color: "#999999".into(),
			arrow: false,
		}
	}
}

impl EdgeStyle {
	fn apply(&mut self, properties: &Map<String, Value>) {
		for (property, value) in properties {
			match property.as_str() {
				"line-color" => set_string(&mut self.line_color, value),
				"width" => set_length(&mut self.width, value),
				"opacity" => set_length(&mut self.opacity, value),
				"target-arrow-color" => set_string(&mut self.arrow_color, value),
				"target-arrow-shape" => self.arrow = value.as_str().is_some_and(|s| s != "none"),
				_ => {}
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
enum Selector {
	Nodes,
	Edges,
	Id(String),
}

impl Selector {
	fn parse_list(selector: &str) -> Vec<Selector> {
		selector
			.split(',')
			.filter_map(|part| {
				let part = part.trim();
				let parsed = match part {
					"node" => Some(Selector::Nodes),
					"edge" => Some(Selector::Edges),
					_ => part
						.strip_prefix("node#")
						.or_else(|| part.strip_prefix('#'))
						.map(|id| Selector::Id(id.to_string())),
				};
				if parsed.is_none() {
					debug!("canvas engine ignores selector `{part}`");
				}
				parsed
			})
			.collect()
	}
}

/// Style rules reduced to what the canvas engine can draw. Rules apply in
/// order, so later rules override earlier ones. Edges are styled uniformly.
#[derive(Clone, Debug, Default)]
pub struct StyleSheet {
	rules: Vec<(Vec<Selector>, Map<String, Value>)>,
	edge: EdgeStyle,
}

impl StyleSheet {
	pub fn compile(rules: &StyleRules) -> Self {
		let rules: Vec<_> = rules
			.iter()
			.map(|rule| (Selector::parse_list(&rule.selector), rule.style.clone()))
			.filter(|(selectors, _)| !selectors.is_empty())
			.collect();
		let mut edge = EdgeStyle::default();
		for (selectors, properties) in &rules {
			if selectors.contains(&Selector::Edges) {
				edge.apply(properties);
			}
		}
		Self { rules, edge }
	}

	pub fn node_style(&self, id: Option<&str>) -> NodeStyle {
		let mut style = NodeStyle::default();
		for (selectors, properties) in &self.rules {
			let applies = selectors.iter().any(|selector| match selector {
				Selector::Nodes => true,
				Selector::Id(wanted) => id == Some(wanted.as_str()),
				Selector::Edges => false,
			});
			if applies {
				style.apply(properties);
			}
		}
		style
	}

	pub fn edge_style(&self) -> &EdgeStyle {
		&self.edge
	}
}

fn set_string(slot: &mut String, value: &Value) {
	if let Some(s) = value.as_str() {
		*slot = s.to_string();
	}
}

/// Accepts `12`, `12.5` and `"12px"`.
fn set_length(slot: &mut f64, value: &Value) {
	let parsed = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().trim_end_matches("px").parse().ok(),
		_ => None,
	};
	if let Some(parsed) = parsed {
		*slot = parsed;
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::widget::{StyleRule, WidgetDefaults};

	#[test]
	fn builtin_style_compiles() {
		let sheet = StyleSheet::compile(&WidgetDefaults::default().style);
		let node = sheet.node_style(Some("a"));
		assert_eq!(node.fill, "#37474F");
		assert_eq!(node.radius(), 6.0);
		assert_eq!(node.label, LabelSource::Field("id".into()));
		assert_eq!(node.font_size, 16.0);
		let edge = sheet.edge_style();
		assert_eq!(edge.width, 1.0);
		assert!(edge.arrow);
	}

	#[test]
	fn id_rules_override_in_order() {
		let sheet = StyleSheet::compile(&vec![
			StyleRule::new("node", json!({"background-color": "red", "width": "20px"})),
			StyleRule::new("#b", json!({"background-color": "blue"})),
			StyleRule::new("node[weight > 3]", json!({"background-color": "green"})),
		]);
		assert_eq!(sheet.node_style(Some("a")).fill, "red");
		let b = sheet.node_style(Some("b"));
		assert_eq!(b.fill, "blue");
		assert_eq!(b.width, 20.0);
	}

	#[test]
	fn labels_resolve_from_data() {
		let data = json!({"id": 4, "name": "four"});
		let data = data.as_object().unwrap();
		assert_eq!(
			LabelSource::parse(&json!("data(name)")).resolve(data).as_deref(),
			Some("four")
		);
		assert_eq!(
			LabelSource::parse(&json!("data(id)")).resolve(data).as_deref(),
			Some("4")
		);
		assert_eq!(LabelSource::parse(&json!("")).resolve(data), None);
		assert_eq!(
			LabelSource::parse(&json!("fixed")).resolve(data).as_deref(),
			Some("fixed")
		);
	}

	#[test]
	fn shared_selectors_apply_to_both() {
		let sheet = StyleSheet::compile(&vec![StyleRule::new(
			"node, edge",
			json!({"width": 5, "target-arrow-shape": "none"}),
		)]);
		assert_eq!(sheet.node_style(None).width, 5.0);
		assert_eq!(sheet.edge_style().width, 5.0);
		assert!(!sheet.edge_style().arrow);
	}
}

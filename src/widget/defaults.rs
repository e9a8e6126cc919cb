//! Fallback values used when the host leaves an attribute unset.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::WidgetError;
use super::graph::{StyleRule, StyleRules};

pub const DEFAULT_BACKGROUND: &str = "#FFFFFF";
pub const DEFAULT_HEIGHT: &str = "500px";
/// Force-directed algorithm used when nothing else picks one.
pub const DEFAULT_LAYOUT: &str = "cose";
/// Tells the engine to keep embedded coordinates.
pub const PRESET_LAYOUT: &str = "preset";

/// Built-in style: small dark circles labelled by id, thin arrowed edges.
pub fn default_style() -> StyleRules {
	vec![
		StyleRule::new(
			"node",
			json!({
				"background-color": "#37474F",
				"label": "data(id)",
				"width": 12,
				"height": 12,
				"color": "#333333",
				"font-weight": 400,
				"text-halign": "right",
				"text-valign": "bottom",
				"font-size": 16
			}),
		),
		StyleRule::new(
			"edge",
			json!({
				"width": 1,
				"line-color": "#37474F",
				"target-arrow-color": "#37474F",
				"target-arrow-shape": "triangle"
			}),
		),
	]
}

/// The defaults table. Any field may be overridden from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetDefaults {
	pub background: String,
	pub height: String,
	pub layout: String,
	pub style: StyleRules,
}

impl Default for WidgetDefaults {
	fn default() -> Self {
		Self {
			background: DEFAULT_BACKGROUND.into(),
			height: DEFAULT_HEIGHT.into(),
			layout: DEFAULT_LAYOUT.into(),
			style: default_style(),
		}
	}
}

impl WidgetDefaults {
	/// Parses overrides on top of the built-in table and validates the result.
	pub fn from_json(json: &str) -> Result<Self, WidgetError> {
		let defaults: Self =
			serde_json::from_str(json).map_err(|e| WidgetError::InvalidDefaults(e.to_string()))?;
		defaults.validate()?;
		Ok(defaults)
	}

	/// Every fallback must itself be usable; an empty default would leave the
	/// chain with nothing to fall back to.
	pub fn validate(&self) -> Result<(), WidgetError> {
		let empty = [
			("background", self.background.is_empty()),
			("height", self.height.is_empty()),
			("layout", self.layout.is_empty()),
			("style", self.style.is_empty()),
		];
		match empty.iter().find(|(_, is_empty)| *is_empty) {
			Some((field, _)) => Err(WidgetError::InvalidDefaults(format!(
				"`{field}` must not be empty"
			))),
			None => Ok(()),
		}
	}
}

//! Container background and height.

use serde::{Deserialize, Serialize};

use super::defaults::WidgetDefaults;

/// Id given to every widget container.
pub const CONTAINER_ID: &str = "cyjs";
/// Class given to every widget container.
pub const CONTAINER_CLASS: &str = "cytoscape-widget";

/// Resolved container geometry and colour.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
	pub background: String,
	pub height: String,
}

impl Presentation {
	/// Inline style for the container element.
	pub fn css(&self) -> String {
		format!("background: {}; height: {};", self.background, self.height)
	}
}

impl Default for Presentation {
	fn default() -> Self {
		resolve_presentation(None, None, &WidgetDefaults::default())
	}
}

/// Each attribute falls back on its own when absent or empty.
pub fn resolve_presentation(
	background: Option<&str>,
	cell_height: Option<&str>,
	defaults: &WidgetDefaults,
) -> Presentation {
	Presentation {
		background: non_empty_or(background, &defaults.background),
		height: non_empty_or(cell_height, &defaults.height),
	}
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
	value
		.filter(|v| !v.is_empty())
		.unwrap_or(fallback)
		.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::widget::defaults::{DEFAULT_BACKGROUND, DEFAULT_HEIGHT};

	#[test]
	fn missing_background_is_white() {
		let p = resolve_presentation(None, Some("320px"), &WidgetDefaults::default());
		assert_eq!(p.background, DEFAULT_BACKGROUND);
		assert_eq!(p.height, "320px");
	}

	#[test]
	fn attributes_resolve_independently() {
		let defaults = WidgetDefaults::default();
		let p = resolve_presentation(Some("#000000"), None, &defaults);
		assert_eq!(p.background, "#000000");
		assert_eq!(p.height, DEFAULT_HEIGHT);

		let p = resolve_presentation(Some("#000000"), Some(""), &defaults);
		assert_eq!(p.background, "#000000");
		assert_eq!(p.height, DEFAULT_HEIGHT);
	}

	#[test]
	fn empty_strings_are_unset() {
		let p = resolve_presentation(Some(""), Some(""), &WidgetDefaults::default());
		assert_eq!(p, Presentation::default());
		assert_eq!(p.css(), "background: #FFFFFF; height: 500px;");
	}
}

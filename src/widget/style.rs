//! Picks the style rule set for a draw.

use super::defaults::WidgetDefaults;
use super::graph::StyleRules;

/// Explicit style wins outright, then the decoder-derived style, then the
/// built-in default. Tiers are never merged.
pub fn resolve_style(
	derived: Option<&StyleRules>,
	explicit: Option<&StyleRules>,
	defaults: &WidgetDefaults,
) -> StyleRules {
	explicit
		.or(derived)
		.cloned()
		.unwrap_or_else(|| defaults.style.clone())
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::widget::graph::StyleRule;

	fn rules(selector: &str, color: &str) -> StyleRules {
		vec![StyleRule::new(selector, json!({ "background-color": color }))]
	}

	#[test]
	fn explicit_is_used_verbatim() {
		let defaults = WidgetDefaults::default();
		let explicit = rules("node", "#FF0000");
		let derived = rules("edge", "#00FF00");
		assert_eq!(
			resolve_style(Some(&derived), Some(&explicit), &defaults),
			explicit
		);
		assert_eq!(resolve_style(None, Some(&explicit), &defaults), explicit);
	}

	#[test]
	fn empty_explicit_list_still_wins() {
		let defaults = WidgetDefaults::default();
		let derived = rules("node", "#00FF00");
		assert!(resolve_style(Some(&derived), Some(&Vec::new()), &defaults).is_empty());
	}

	#[test]
	fn derived_beats_default() {
		let defaults = WidgetDefaults::default();
		let derived = rules("node", "#00FF00");
		assert_eq!(resolve_style(Some(&derived), None, &defaults), derived);
	}

	#[test]
	fn falls_back_to_builtin() {
		let defaults = WidgetDefaults::default();
		let style = resolve_style(None, None, &defaults);
		assert!(!style.is_empty());
		assert_eq!(style, defaults.style);
	}
}

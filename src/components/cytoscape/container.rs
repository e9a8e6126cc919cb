use leptos::html::Div;
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

use crate::widget::{Container, Presentation};

/// The widget's `div`, as seen by the controller and the engines.
#[derive(Clone, Copy)]
pub struct DomContainer {
	node: NodeRef<Div>,
	presentation: RwSignal<Presentation>,
}

impl DomContainer {
	pub fn new(node: NodeRef<Div>) -> Self {
		Self {
			node,
			presentation: RwSignal::new(Presentation::default()),
		}
	}

	/// Reactive inline style of the container.
	pub fn style(&self) -> String {
		self.presentation.with(Presentation::css)
	}

	/// The mounted element, if any.
	pub fn element(&self) -> Option<HtmlElement> {
		self.node.get_untracked().map(Into::into)
	}
}

impl Container for DomContainer {
	fn apply_presentation(&mut self, presentation: &Presentation) {
		// engines size themselves from the element in the same turn
		if let Some(element) = self.element() {
			if let Err(err) = write_presentation(&element, presentation) {
				warn!("applying container presentation failed: {err:?}");
			}
		}
		self.presentation.set(presentation.clone());
	}
}

/// Writes background and height onto the element's inline style right away.
pub fn write_presentation(
	element: &HtmlElement,
	presentation: &Presentation,
) -> Result<(), JsValue> {
	let style = element.style();
	style.set_property("background", &presentation.background)?;
	style.set_property("height", &presentation.height)?;
	Ok(())
}

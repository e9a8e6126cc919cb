use js_sys::{Function, Reflect};
use log::{debug, error, warn};
use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::container::DomContainer;
use crate::components::force_graph::ForceGraphEngine;
use crate::widget::{Elements, LayoutOptions, RenderingEngine, ResolvedConfiguration, StyleRules};

#[wasm_bindgen]
extern "C" {
	/// The page-global `cytoscape(options)` factory.
	#[wasm_bindgen(catch, js_name = cytoscape)]
	fn create_cytoscape(options: &JsValue) -> Result<JsValue, JsValue>;
}

/// Options object handed to `cytoscape`, minus the container element.
#[derive(Debug, Serialize)]
pub struct CytoscapeOptions<'a> {
	pub elements: &'a Elements,
	pub style: &'a StyleRules,
	pub layout: LayoutOptions<'a>,
}

impl<'a> CytoscapeOptions<'a> {
	pub fn new(config: &'a ResolvedConfiguration) -> Self {
		Self {
			elements: &config.elements,
			style: &config.style,
			layout: config.layout(),
		}
	}

	/// Plain JS object, maps as objects rather than `Map`s.
	pub fn to_js(&self) -> Result<JsValue, serde_wasm_bindgen::Error> {
		self.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
	}
}

/// Draws through the cytoscape.js library loaded on the page.
#[derive(Default)]
pub struct CytoscapeEngine {
	instance: Option<JsValue>,
}

impl CytoscapeEngine {
	fn destroy_previous(&mut self) {
		let Some(instance) = self.instance.take() else {
			return;
		};
		let destroy = Reflect::get(&instance, &"destroy".into())
			.ok()
			.and_then(|f| f.dyn_into::<Function>().ok());
		match destroy {
			Some(destroy) => {
				if let Err(err) = destroy.call0(&instance) {
					warn!("destroying previous cytoscape instance failed: {err:?}");
				}
			}
			None => warn!("previous cytoscape instance has no destroy()"),
		}
	}
}

impl RenderingEngine<DomContainer> for CytoscapeEngine {
	fn draw(&mut self, container: &DomContainer, config: ResolvedConfiguration) {
		self.destroy_previous();
		let Some(element) = container.element() else {
			warn!("cytoscape container is not mounted; nothing drawn");
			return;
		};
		let options = match CytoscapeOptions::new(&config).to_js() {
			Ok(options) => options,
			Err(err) => {
				error!("serializing cytoscape options failed: {err}");
				return;
			}
		};
		if let Err(err) = Reflect::set(&options, &"container".into(), &element) {
			error!("attaching container to cytoscape options failed: {err:?}");
			return;
		}
		match create_cytoscape(&options) {
			Ok(instance) => {
				debug!("cytoscape instance created with layout `{}`", config.layout_name);
				self.instance = Some(instance);
			}
			Err(err) => error!("cytoscape() threw: {err:?}"),
		}
	}
}

impl Drop for CytoscapeEngine {
	fn drop(&mut self) {
		self.destroy_previous();
	}
}

/// Which engine a widget draws with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Renderer {
	/// cytoscape.js, which must be loaded on the page.
	#[default]
	Cytoscape,
	/// Built-in canvas engine.
	ForceCanvas,
}

impl Renderer {
	pub fn engine(self) -> Box<dyn RenderingEngine<DomContainer>> {
		match self {
			Renderer::Cytoscape => Box::new(CytoscapeEngine::default()),
			Renderer::ForceCanvas => Box::new(ForceGraphEngine::default()),
		}
	}
}

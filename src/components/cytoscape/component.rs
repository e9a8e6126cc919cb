use futures::channel::mpsc;
use leptos::html::Div;
use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen_futures::spawn_local;

use super::container::DomContainer;
use super::engine::Renderer;
use crate::widget::{
	CONTAINER_CLASS, CONTAINER_ID, CxDecoder, LifecycleController, ModelAttribute, ModelEvent,
	WidgetDefaults, WidgetModel, display_signal,
};

/// Graph widget bound to a host model.
///
/// Each update of `model` is reported attribute by attribute, followed by a
/// `value` change: the container presentation is re-applied at once and the
/// graph is redrawn in full once the container is on the page.
#[component]
pub fn CytoscapeWidget(
	/// Host model; any update redraws.
	#[prop(into)]
	model: Signal<WidgetModel>,
	/// Engine to draw with.
	#[prop(optional)]
	renderer: Renderer,
	/// Overrides for the built-in fallbacks.
	#[prop(optional)]
	defaults: Option<WidgetDefaults>,
) -> impl IntoView {
	let node_ref = NodeRef::<Div>::new();
	let container = DomContainer::new(node_ref);
	let (trigger, displayed) = display_signal();
	let (controller, first) = LifecycleController::mount(
		model,
		CxDecoder,
		renderer.engine(),
		container,
		displayed,
		defaults.unwrap_or_default(),
	);
	debug!("widget mounted with {renderer:?} renderer");

	let (events, changes) = mpsc::unbounded();
	spawn_local(controller.run(first, changes));

	// the mount already scheduled the first draw, so the initial run only
	// takes the snapshot later runs diff against
	Effect::new(move |prev: Option<WidgetModel>| {
		let next = model.get();
		if let Some(prev) = prev {
			let changes = ModelAttribute::changed_between(&prev, &next)
				.into_iter()
				.chain([ModelAttribute::Value]);
			for attribute in changes {
				if events.unbounded_send(ModelEvent::changed(attribute)).is_err() {
					warn!("widget controller stopped; {attribute:?} change dropped");
					break;
				}
			}
		}
		next
	});

	let mut trigger = Some(trigger);
	Effect::new(move |_| {
		if node_ref.get().is_some() {
			if let Some(trigger) = trigger.take() {
				trigger.fire();
			}
		}
	});

	view! {
		<div
			node_ref=node_ref
			class=CONTAINER_CLASS
			id=CONTAINER_ID
			style=move || container.style()
		/>
	}
}

use std::cell::RefCell;
use std::rc::Rc;

use cytoscape_widget::widget::{
	Container, CxDecoder, DrawOutcome, GraphFormat, LifecycleController, LifecycleState,
	ModelAttribute, ModelEvent, PendingDraw, Presentation, RenderingEngine, ResolvedConfiguration,
	WidgetDefaults, WidgetError, WidgetModel, display_signal,
};
use futures::channel::mpsc;
use futures::executor::LocalPool;
use futures::task::LocalSpawnExt;
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct RecordingContainer {
	applied: Rc<RefCell<Vec<Presentation>>>,
}

impl Container for RecordingContainer {
	fn apply_presentation(&mut self, presentation: &Presentation) {
		self.applied.borrow_mut().push(presentation.clone());
	}
}

#[derive(Clone, Default)]
struct RecordingEngine {
	draws: Rc<RefCell<Vec<ResolvedConfiguration>>>,
}

impl RenderingEngine<RecordingContainer> for RecordingEngine {
	fn draw(&mut self, _container: &RecordingContainer, config: ResolvedConfiguration) {
		self.draws.borrow_mut().push(config);
	}
}

type Controller =
	LifecycleController<Rc<RefCell<WidgetModel>>, CxDecoder, RecordingEngine, RecordingContainer>;

type Outcomes = Rc<RefCell<Vec<Result<DrawOutcome, WidgetError>>>>;

struct Harness {
	model: Rc<RefCell<WidgetModel>>,
	container: RecordingContainer,
	engine: RecordingEngine,
	pool: LocalPool,
	outcomes: Outcomes,
}

impl Harness {
	fn new(data: Value) -> Self {
		Self {
			model: Rc::new(RefCell::new(WidgetModel::new(data))),
			container: RecordingContainer::default(),
			engine: RecordingEngine::default(),
			pool: LocalPool::new(),
			outcomes: Rc::default(),
		}
	}

	fn mount(&self) -> (Controller, PendingDraw, cytoscape_widget::widget::DisplayTrigger) {
		let (trigger, displayed) = display_signal();
		let (controller, first) = LifecycleController::mount(
			Rc::clone(&self.model),
			CxDecoder,
			self.engine.clone(),
			self.container.clone(),
			displayed,
			WidgetDefaults::default(),
		);
		(controller, first, trigger)
	}

	fn spawn(&self, draw: PendingDraw) {
		let outcomes = Rc::clone(&self.outcomes);
		self.pool
			.spawner()
			.spawn_local(async move {
				let outcome = draw.await;
				outcomes.borrow_mut().push(outcome);
			})
			.unwrap();
	}

	fn settle(&mut self) {
		self.pool.run_until_stalled();
	}

	fn draw_count(&self) -> usize {
		self.engine.draws.borrow().len()
	}

	fn last_presentation(&self) -> Presentation {
		self.container.applied.borrow().last().cloned().unwrap()
	}

	fn drawn(&self) -> Vec<DrawOutcome> {
		self.outcomes
			.borrow()
			.iter()
			.filter_map(|o| o.as_ref().ok().copied())
			.collect()
	}
}

fn simple_graph() -> Value {
	json!({"elements": {
		"nodes": [{"data": {"id": "a"}}, {"data": {"id": "b"}}],
		"edges": [{"data": {"id": "ab", "source": "a", "target": "b"}}]
	}})
}

#[test]
fn mount_applies_presentation_before_any_change() {
	let h = Harness::new(simple_graph());
	let (controller, _first, _trigger) = h.mount();
	assert_eq!(controller.state(), LifecycleState::MountedPending);
	assert_eq!(controller.generation(), 1);
	assert_eq!(h.container.applied.borrow().len(), 1);
	assert_eq!(h.last_presentation(), Presentation::default());
	assert_eq!(h.draw_count(), 0);
}

#[test]
fn first_draw_waits_for_display() {
	let mut h = Harness::new(simple_graph());
	let (controller, first, trigger) = h.mount();
	h.spawn(first);
	h.settle();
	assert_eq!(h.draw_count(), 0);
	assert_eq!(controller.state(), LifecycleState::MountedPending);

	trigger.fire();
	h.settle();
	assert_eq!(h.draw_count(), 1);
	assert_eq!(controller.state(), LifecycleState::Rendered);
	assert_eq!(h.drawn(), [DrawOutcome::Drawn { generation: 1 }]);

	let draws = h.engine.draws.borrow();
	assert_eq!(draws[0].layout_name, "cose");
	assert_eq!(draws[0].style, WidgetDefaults::default().style);
	assert_eq!(draws[0].elements.nodes().len(), 2);
}

#[test]
fn only_the_latest_change_before_display_is_drawn() {
	let mut h = Harness::new(simple_graph());
	let (controller, first, trigger) = h.mount();
	h.spawn(first);

	h.model.borrow_mut().background = Some("#111111".into());
	h.spawn(controller.value_changed());
	h.model.borrow_mut().background = Some("#222222".into());
	h.model.borrow_mut().layout_name = Some(json!("grid"));
	h.spawn(controller.value_changed());
	h.settle();
	assert_eq!(h.draw_count(), 0);
	assert_eq!(h.last_presentation().background, "#222222");

	trigger.fire();
	h.settle();
	assert_eq!(h.draw_count(), 1);
	assert_eq!(h.engine.draws.borrow()[0].layout_name, "grid");
	let mut outcomes = h.drawn();
	outcomes.sort_by_key(|o| match o {
		DrawOutcome::Drawn { generation }
		| DrawOutcome::Superseded { generation }
		| DrawOutcome::NeverDisplayed { generation } => *generation,
	});
	assert_eq!(
		outcomes,
		[
			DrawOutcome::Superseded { generation: 1 },
			DrawOutcome::Superseded { generation: 2 },
			DrawOutcome::Drawn { generation: 3 },
		]
	);
}

#[test]
fn changes_after_render_redraw_in_full() {
	let mut h = Harness::new(simple_graph());
	let (controller, first, trigger) = h.mount();
	trigger.fire();
	h.spawn(first);
	h.settle();
	assert_eq!(controller.state(), LifecycleState::Rendered);

	h.model.borrow_mut().layout.attributes.height = Some("240px".into());
	let redraw = controller.value_changed();
	assert_eq!(redraw.generation(), 2);
	assert_eq!(controller.generation(), 2);
	assert_eq!(controller.state(), LifecycleState::MountedPending);
	assert_eq!(h.last_presentation().height, "240px");
	h.spawn(redraw);
	h.settle();
	assert_eq!(h.draw_count(), 2);
	assert_eq!(controller.state(), LifecycleState::Rendered);
}

#[test]
fn exchange_document_draws_its_own_style() {
	let mut h = Harness::new(json!([
		{"nodes": [{"@id": 1, "n": "a"}, {"@id": 2, "n": "b"}]},
		{"edges": [{"@id": 3, "s": 1, "t": 2}]},
		{"cyVisualProperties": [
			{"properties_of": "nodes:default", "properties": {"NODE_FILL_COLOR": "#AA0000"}},
			{"properties_of": "edges:default", "properties": {"EDGE_WIDTH": "4"}}
		]}
	]));
	h.model.borrow_mut().format = GraphFormat::Cx;
	let (_controller, first, trigger) = h.mount();
	trigger.fire();
	h.spawn(first);
	h.settle();

	let draws = h.engine.draws.borrow();
	assert_eq!(draws.len(), 1);
	assert_ne!(draws[0].style, WidgetDefaults::default().style);
	assert_eq!(draws[0].style[0].style["background-color"], "#AA0000");
	assert_eq!(draws[0].style[1].style["width"], json!(4.0));
	assert_eq!(draws[0].layout_name, "cose");
}

#[test]
fn decode_failure_leaves_controller_pending_until_next_change() {
	let mut h = Harness::new(json!({"not": "cx"}));
	h.model.borrow_mut().format = GraphFormat::Cx;
	let (controller, first, trigger) = h.mount();
	trigger.fire();
	h.spawn(first);
	h.settle();
	assert_eq!(h.draw_count(), 0);
	assert_eq!(controller.state(), LifecycleState::MountedPending);
	assert!(matches!(
		h.outcomes.borrow()[0],
		Err(WidgetError::Decode {
			format: GraphFormat::Cx,
			..
		})
	));

	h.model.borrow_mut().data = json!([{"nodes": [{"@id": 1}]}]);
	h.spawn(controller.value_changed());
	h.settle();
	assert_eq!(h.draw_count(), 1);
	assert_eq!(controller.state(), LifecycleState::Rendered);
}

#[test]
fn dropped_trigger_never_draws() {
	let mut h = Harness::new(simple_graph());
	let (controller, first, trigger) = h.mount();
	drop(trigger);
	h.spawn(first);
	h.settle();
	assert_eq!(h.draw_count(), 0);
	assert_eq!(h.drawn(), [DrawOutcome::NeverDisplayed { generation: 1 }]);
	assert_eq!(controller.state(), LifecycleState::MountedPending);
}

#[test]
fn run_reacts_to_value_changes_only() {
	let mut h = Harness::new(simple_graph());
	let (controller, first, trigger) = h.mount();
	let (tx, rx) = mpsc::unbounded();
	let finished = Rc::new(RefCell::new(false));
	let done = Rc::clone(&finished);
	h.pool
		.spawner()
		.spawn_local(async move {
			controller.run(first, rx).await;
			*done.borrow_mut() = true;
		})
		.unwrap();

	trigger.fire();
	h.settle();
	assert_eq!(h.draw_count(), 1);

	tx.unbounded_send(ModelEvent::changed(ModelAttribute::Background))
		.unwrap();
	h.settle();
	assert_eq!(h.draw_count(), 1);
	assert_eq!(h.container.applied.borrow().len(), 1);

	h.model.borrow_mut().background = Some("#000000".into());
	tx.unbounded_send(ModelEvent::changed(ModelAttribute::Value))
		.unwrap();
	h.settle();
	assert_eq!(h.draw_count(), 2);
	assert_eq!(h.last_presentation().background, "#000000");

	drop(tx);
	h.settle();
	assert!(*finished.borrow());
}

#[test]
fn run_survives_failed_draws() {
	let mut h = Harness::new(json!({"elements": "broken"}));
	let (controller, first, trigger) = h.mount();
	let (tx, rx) = mpsc::unbounded();
	h.pool
		.spawner()
		.spawn_local(controller.run(first, rx))
		.unwrap();
	trigger.fire();
	h.settle();
	assert_eq!(h.draw_count(), 0);

	h.model.borrow_mut().data = simple_graph();
	tx.unbounded_send(ModelEvent::changed(ModelAttribute::Value))
		.unwrap();
	h.settle();
	assert_eq!(h.draw_count(), 1);
}

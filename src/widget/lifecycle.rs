//! Render trigger and lifecycle controller.
//!
//! The controller owns the container and the engine. Every `value` change
//! re-applies the container presentation right away and schedules one draw.
//! Draws wait on a one-shot display signal. Each scheduled draw carries a
//! generation number and only the newest one reaches the engine; older ones
//! resolve as [`DrawOutcome::Superseded`] without touching anything.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use futures::stream::{FuturesUnordered, Stream, StreamExt};
use log::{debug, error, trace};

use super::decode::FormatDecoder;
use super::defaults::WidgetDefaults;
use super::error::WidgetError;
use super::model::{HostModel, ModelEvent};
use super::presentation::{Presentation, resolve_presentation};
use super::resolve::{ResolvedConfiguration, resolve_configuration};

/// The element the widget draws into.
pub trait Container {
	fn apply_presentation(&mut self, presentation: &Presentation);
}

/// Draws a resolved configuration into a container, replacing whatever the
/// previous draw left there.
pub trait RenderingEngine<C> {
	fn draw(&mut self, container: &C, config: ResolvedConfiguration);
}

impl<C, E> RenderingEngine<C> for Box<E>
where
	E: RenderingEngine<C> + ?Sized,
{
	fn draw(&mut self, container: &C, config: ResolvedConfiguration) {
		(**self).draw(container, config)
	}
}

/// Creates the one-shot "container is displayed" signal.
pub fn display_signal() -> (DisplayTrigger, DisplaySignal) {
	let (tx, rx) = oneshot::channel();
	(DisplayTrigger(tx), DisplaySignal(rx.shared()))
}

/// Fires the display signal. Dropping it unfired means the signal never fires.
#[derive(Debug)]
pub struct DisplayTrigger(oneshot::Sender<()>);

impl DisplayTrigger {
	pub fn fire(self) {
		let _ = self.0.send(());
	}
}

#[derive(Clone)]
pub struct DisplaySignal(Shared<oneshot::Receiver<()>>);

impl DisplaySignal {
	/// Resolves once the container is displayed. `false` if it never will be.
	pub async fn wait(&self) -> bool {
		self.0.clone().await.is_ok()
	}

	pub fn is_displayed(&self) -> bool {
		matches!(self.0.peek(), Some(Ok(())))
	}
}

impl fmt::Debug for DisplaySignal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("DisplaySignal")
			.field(&self.is_displayed())
			.finish()
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
	/// Nothing applied to the container yet.
	Idle,
	/// Presentation applied, draw waiting on the display signal.
	MountedPending,
	/// The engine has drawn the latest scheduled configuration.
	Rendered,
}

/// How a scheduled draw ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawOutcome {
	Drawn { generation: u64 },
	/// A newer change arrived before this draw ran.
	Superseded { generation: u64 },
	/// The display trigger was dropped without firing.
	NeverDisplayed { generation: u64 },
}

/// A scheduled draw. Polling it to completion performs the draw once the
/// container is displayed.
pub struct PendingDraw {
	generation: u64,
	future: LocalBoxFuture<'static, Result<DrawOutcome, WidgetError>>,
}

impl PendingDraw {
	pub fn generation(&self) -> u64 {
		self.generation
	}
}

impl Future for PendingDraw {
	type Output = Result<DrawOutcome, WidgetError>;

	fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		self.future.as_mut().poll(cx)
	}
}

impl fmt::Debug for PendingDraw {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PendingDraw")
			.field("generation", &self.generation)
			.finish_non_exhaustive()
	}
}

struct Surface<E, C> {
	engine: E,
	container: C,
}

struct Inner<M, D, E, C> {
	model: M,
	decoder: D,
	defaults: WidgetDefaults,
	displayed: DisplaySignal,
	state: Cell<LifecycleState>,
	generation: Cell<u64>,
	surface: RefCell<Surface<E, C>>,
}

impl<M, D, E, C> Inner<M, D, E, C>
where
	M: HostModel,
	D: FormatDecoder,
	E: RenderingEngine<C>,
	C: Container,
{
	fn draw(&self, generation: u64) -> Result<DrawOutcome, WidgetError> {
		let latest = self.generation.get();
		if generation != latest {
			trace!("draw {generation} superseded by {latest}");
			return Ok(DrawOutcome::Superseded { generation });
		}

		let config = self
			.model
			.with_model(|model| resolve_configuration(model, &self.decoder, &self.defaults))?;
		debug!(
			"drawing generation {generation}: {} nodes, {} edges, layout `{}`",
			config.elements.nodes().len(),
			config.elements.edges().len(),
			config.layout_name
		);

		let mut surface = self.surface.borrow_mut();
		let Surface { engine, container } = &mut *surface;
		engine.draw(container, config);
		self.state.set(LifecycleState::Rendered);
		Ok(DrawOutcome::Drawn { generation })
	}
}

/// Drives resolution and drawing for one container.
pub struct LifecycleController<M, D, E, C> {
	inner: Rc<Inner<M, D, E, C>>,
}

impl<M, D, E, C> Clone for LifecycleController<M, D, E, C> {
	fn clone(&self) -> Self {
		Self {
			inner: Rc::clone(&self.inner),
		}
	}
}

impl<M, D, E, C> LifecycleController<M, D, E, C>
where
	M: HostModel + 'static,
	D: FormatDecoder + 'static,
	E: RenderingEngine<C> + 'static,
	C: Container + 'static,
{
	/// Takes ownership of the container and applies the presentation
	/// immediately, without waiting for a change notification. The returned
	/// draw is the first render.
	pub fn mount(
		model: M,
		decoder: D,
		engine: E,
		container: C,
		displayed: DisplaySignal,
		defaults: WidgetDefaults,
	) -> (Self, PendingDraw) {
		let controller = Self {
			inner: Rc::new(Inner {
				model,
				decoder,
				defaults,
				displayed,
				state: Cell::new(LifecycleState::Idle),
				generation: Cell::new(0),
				surface: RefCell::new(Surface { engine, container }),
			}),
		};
		let first = controller.value_changed();
		(controller, first)
	}

	pub fn state(&self) -> LifecycleState {
		self.inner.state.get()
	}

	/// Generation of the most recently scheduled draw.
	pub fn generation(&self) -> u64 {
		self.inner.generation.get()
	}

	/// Handles a `value` change: re-applies the presentation and schedules a
	/// draw that supersedes any draw still waiting.
	pub fn value_changed(&self) -> PendingDraw {
		let presentation = self.inner.model.with_model(|model| {
			resolve_presentation(
				model.background.as_deref(),
				model.cell_height(),
				&self.inner.defaults,
			)
		});
		self.inner
			.surface
			.borrow_mut()
			.container
			.apply_presentation(&presentation);

		let generation = self.inner.generation.get() + 1;
		self.inner.generation.set(generation);
		let previous = self.inner.state.replace(LifecycleState::MountedPending);
		debug!(
			"{previous:?} -> MountedPending, generation {generation} ({})",
			presentation.css()
		);

		let inner = Rc::clone(&self.inner);
		let future = async move {
			if !inner.displayed.wait().await {
				debug!("container never displayed, dropping draw {generation}");
				return Ok(DrawOutcome::NeverDisplayed { generation });
			}
			inner.draw(generation)
		};
		PendingDraw {
			generation,
			future: future.boxed_local(),
		}
	}

	/// Consumes change notifications in delivery order until the stream ends,
	/// then finishes the draws still in flight. Failed draws are logged; the
	/// next `value` change is the retry.
	pub async fn run<S>(self, first: PendingDraw, events: S)
	where
		S: Stream<Item = ModelEvent> + Unpin,
	{
		let mut draws = FuturesUnordered::new();
		trace!("awaiting first draw {}", first.generation());
		draws.push(first);
		let mut events = events.fuse();
		loop {
			futures::select! {
				event = events.next() => match event {
					Some(event) if event.triggers_render() => {
						let draw = self.value_changed();
						trace!("draw {} scheduled", draw.generation());
						draws.push(draw);
					}
					Some(event) => trace!("ignoring {:?} change", event.attribute),
					None => break,
				},
				outcome = draws.select_next_some() => report(outcome),
			}
		}
		while let Some(outcome) = draws.next().await {
			report(outcome);
		}
	}
}

fn report(outcome: Result<DrawOutcome, WidgetError>) {
	match outcome {
		Ok(outcome) => trace!("{outcome:?}"),
		Err(err) => error!("render attempt failed: {err}"),
	}
}

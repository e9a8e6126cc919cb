use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, error, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, MouseEvent, WheelEvent};

use super::render;
use super::state::ForceGraphState;
use crate::components::cytoscape::DomContainer;
use crate::widget::{RenderingEngine, ResolvedConfiguration};

type Animation = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Canvas engine running the `force_graph` simulation.
#[derive(Default)]
pub struct ForceGraphEngine {
	session: Option<Session>,
}

impl RenderingEngine<DomContainer> for ForceGraphEngine {
	fn draw(&mut self, container: &DomContainer, config: ResolvedConfiguration) {
		// stop the previous loop before its canvas goes away
		self.session = None;
		let Some(element) = container.element() else {
			warn!("force graph container is not mounted; nothing drawn");
			return;
		};
		match Session::start(&element, &config) {
			Ok(session) => self.session = Some(session),
			Err(err) => error!("force graph canvas failed to start: {err:?}"),
		}
	}
}

/// One draw's canvas, animation loop and input handlers.
struct Session {
	frame: Rc<Cell<Option<i32>>>,
	animate: Animation,
	_mouse: Vec<Closure<dyn FnMut(MouseEvent)>>,
	_wheel: Closure<dyn FnMut(WheelEvent)>,
}

impl Session {
	fn start(element: &HtmlElement, config: &ResolvedConfiguration) -> Result<Self, JsValue> {
		let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
		let document = window
			.document()
			.ok_or_else(|| JsValue::from_str("no document"))?;

		element.set_inner_html("");
		let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
		let (w, h) = match (element.client_width(), element.client_height()) {
			(w, h) if w > 0 && h > 0 => (w as f64, h as f64),
			_ => (800.0, 600.0),
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		canvas.set_class_name("force-graph-canvas");
		canvas.style().set_property("display", "block")?;
		canvas.style().set_property("cursor", "grab")?;
		element.append_child(&canvas)?;

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")?
			.ok_or_else(|| JsValue::from_str("2d context unavailable"))?
			.dyn_into()?;
		let state = Rc::new(RefCell::new(ForceGraphState::new(config, w, h)));
		debug!(
			"force graph canvas {w}x{h}, placement {:?}",
			state.borrow().placement
		);

		let mouse = vec![
			listen_mouse(&canvas, "mousedown", &state, |s, x, y| s.press(x, y))?,
			listen_mouse(&canvas, "mousemove", &state, |s, x, y| s.pointer_moved(x, y))?,
			listen_mouse(&canvas, "mouseup", &state, |s, _, _| s.release())?,
			listen_mouse(&canvas, "mouseleave", &state, |s, _, _| s.leave())?,
		];

		let (state_wheel, canvas_wheel) = (state.clone(), canvas.clone());
		let wheel = Closure::<dyn FnMut(WheelEvent)>::new(move |ev: WheelEvent| {
			ev.prevent_default();
			let (x, y) = local_point(&canvas_wheel, ev.client_x(), ev.client_y());
			state_wheel.borrow_mut().zoom(x, y, ev.delta_y());
		});
		canvas.add_event_listener_with_callback("wheel", wheel.as_ref().unchecked_ref())?;

		let frame = Rc::new(Cell::new(None));
		let animate: Animation = Rc::new(RefCell::new(None));
		let (state_anim, animate_inner, frame_inner) = (state, animate.clone(), frame.clone());
		*animate.borrow_mut() = Some(Closure::new(move || {
			{
				let mut s = state_anim.borrow_mut();
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(&s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_inner.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(cb) = &*animate.borrow() {
			frame.set(Some(window.request_animation_frame(cb.as_ref().unchecked_ref())?));
		}

		Ok(Self {
			frame,
			animate,
			_mouse: mouse,
			_wheel: wheel,
		})
	}
}

impl Drop for Session {
	fn drop(&mut self) {
		if let (Some(handle), Some(window)) = (self.frame.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
		self.animate.borrow_mut().take();
	}
}

fn local_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(client_x as f64 - rect.left(), client_y as f64 - rect.top())
}

fn listen_mouse(
	canvas: &HtmlCanvasElement,
	event: &str,
	state: &Rc<RefCell<ForceGraphState>>,
	handle: impl Fn(&mut ForceGraphState, f64, f64) + 'static,
) -> Result<Closure<dyn FnMut(MouseEvent)>, JsValue> {
	let (state, target) = (state.clone(), canvas.clone());
	let closure = Closure::<dyn FnMut(MouseEvent)>::new(move |ev: MouseEvent| {
		let (x, y) = local_point(&target, ev.client_x(), ev.client_y());
		handle(&mut state.borrow_mut(), x, y);
	});
	canvas.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
	Ok(closure)
}

//! Browser bindings: `requestAnimationFrame`, window resize, and canvas 2D.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, Window};

use super::animation::{FrameHandle, FrameScheduler};
use super::render::{DrawSurface, Fill};
use super::surface::{Bounds, ResizeFn, SurfaceHost};
use crate::error::{FxError, Result};

/// Shared slot for the per-frame closure. The closure is installed after the
/// loop exists and taken out at teardown, which breaks the `Rc` cycle.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// The global window, or an error outside a browser.
pub fn window() -> Result<Window> {
	web_sys::window().ok_or(FxError::WindowUnavailable)
}

/// Schedules frames on the window, always with the same shared callback.
pub struct RafScheduler {
	window: Window,
	callback: FrameCallback,
}

impl RafScheduler {
	/// A scheduler that always requests `callback`.
	pub fn new(callback: FrameCallback) -> Result<Self> {
		Ok(Self {
			window: window()?,
			callback,
		})
	}
}

impl FrameScheduler for RafScheduler {
	fn request_frame(&mut self) -> Result<FrameHandle> {
		let slot = self.callback.borrow();
		let cb = slot
			.as_ref()
			.ok_or_else(|| FxError::Js("frame callback is not installed".into()))?;
		let id = self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
		Ok(FrameHandle(id))
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		if let Err(e) = self.window.cancel_animation_frame(handle.0) {
			warn!("jellyguard-fx: cancelAnimationFrame failed: {:?}", e);
		}
	}
}

/// A canvas whose backing store tracks its laid-out size.
#[derive(Clone)]
pub struct CanvasHost {
	window: Window,
	canvas: HtmlCanvasElement,
}

impl CanvasHost {
	/// Wraps `canvas` for measuring and resize tracking.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
		Ok(Self {
			window: window()?,
			canvas,
		})
	}

	/// The canvas's 2D drawing context.
	pub fn context(&self) -> Result<CanvasRenderingContext2d> {
		self.canvas
			.get_context("2d")?
			.ok_or(FxError::ContextUnavailable)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| FxError::ContextUnavailable)
	}

	/// Sizes the backing store to `offsetWidth x offsetHeight`.
	fn fit(&self) -> Bounds {
		let (w, h) = (self.canvas.offset_width().max(0), self.canvas.offset_height().max(0));
		self.canvas.set_width(w as u32);
		self.canvas.set_height(h as u32);
		Bounds::new(f64::from(w), f64::from(h))
	}
}

impl SurfaceHost for CanvasHost {
	type Listener = Closure<dyn FnMut()>;

	fn measure(&self) -> Bounds {
		self.fit()
	}

	fn listen(&self, mut on_resize: ResizeFn) -> Result<Self::Listener> {
		let host = self.clone();
		let cb = Closure::<dyn FnMut()>::new(move || on_resize(host.fit()));
		self.window
			.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
		Ok(cb)
	}

	fn unlisten(&self, listener: Self::Listener) {
		if let Err(e) = self
			.window
			.remove_event_listener_with_callback("resize", listener.as_ref().unchecked_ref())
		{
			warn!("jellyguard-fx: failed to remove resize listener: {:?}", e);
		}
	}
}

fn drawable(radius: f64) -> bool {
	radius.is_finite() && radius > 0.0
}

fn apply_fill(ctx: &CanvasRenderingContext2d, x: f64, y: f64, fill: &Fill) {
	match fill {
		Fill::Solid(color) => ctx.set_fill_style_str(color),
		Fill::Radial { radius, stops } => {
			let Ok(gradient) = ctx.create_radial_gradient(x, y, 0.0, x, y, *radius) else {
				return;
			};
			for (offset, color) in stops {
				let _ = gradient.add_color_stop(*offset as f32, color);
			}
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		Fill::Linear { start, end, stops } => {
			let gradient = ctx.create_linear_gradient(start.0, start.1, end.0, end.1);
			for (offset, color) in stops {
				let _ = gradient.add_color_stop(*offset as f32, color);
			}
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
	}
}

impl DrawSurface for CanvasRenderingContext2d {
	fn clear(&mut self, bounds: Bounds) {
		let _ = self.set_line_dash(&js_sys::Array::new());
		self.clear_rect(0.0, 0.0, bounds.width, bounds.height);
	}

	fn wash(&mut self, bounds: Bounds, color: &str) {
		self.set_fill_style_str(color);
		CanvasRenderingContext2d::fill_rect(self, 0.0, 0.0, bounds.width, bounds.height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, fill: &Fill) {
		if !drawable(width) || !drawable(height) {
			return;
		}
		apply_fill(self, x, y, fill);
		CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, fill: &Fill) {
		if !drawable(radius) {
			return;
		}
		apply_fill(self, x, y, fill);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, TAU);
		self.fill();
	}

	fn fill_ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64, rotation: f64, fill: &Fill) {
		if !drawable(rx) || !drawable(ry) {
			return;
		}
		apply_fill(self, x, y, fill);
		self.begin_path();
		let _ = self.ellipse(x, y, rx, ry, rotation, 0.0, TAU);
		self.fill();
	}

	fn fill_polygon(&mut self, points: &[(f64, f64)], fill: &Fill) {
		let Some(((x0, y0), rest)) = points.split_first() else {
			return;
		};
		if rest.len() < 2 {
			return;
		}
		apply_fill(self, *x0, *y0, fill);
		self.begin_path();
		self.move_to(*x0, *y0);
		for (x, y) in rest {
			self.line_to(*x, *y);
		}
		self.close_path();
		self.fill();
	}

	fn stroke_circle(&mut self, x: f64, y: f64, radius: f64, color: &str, width: f64) {
		if !drawable(radius) {
			return;
		}
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, TAU);
		self.stroke();
	}

	fn stroke_path(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
		let Some(((x0, y0), rest)) = points.split_first() else {
			return;
		};
		if rest.is_empty() {
			return;
		}
		self.set_stroke_style_str(color);
		self.set_line_width(width);
		self.set_line_cap("round");
		self.set_line_join("round");
		self.begin_path();
		self.move_to(*x0, *y0);
		for (x, y) in rest {
			self.line_to(*x, *y);
		}
		self.stroke();
	}
}

//! Surface size tracking and resize subscriptions.
//!
//! A [`Subscription`] owns exactly one resize listener on its host for as long
//! as it lives. Detaching consumes the subscription, and dropping one that was
//! never detached removes the listener too, so mount/unmount cycles can't
//! leave listeners behind.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::Result;

/// Pixel dimensions of a drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounds {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Bounds {
	/// Bounds of the given size.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// True before layout, or for any degenerate size.
	pub fn is_empty(&self) -> bool {
		!(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
	}

	/// Whether `(x, y)` lies inside the bounds grown by `margin` on every side.
	pub fn contains_with_margin(&self, x: f64, y: f64, margin: f64) -> bool {
		x >= -margin && x <= self.width + margin && y >= -margin && y <= self.height + margin
	}
}

/// Resize callback handed to a host.
pub type ResizeFn = Box<dyn FnMut(Bounds)>;

/// Something that can be measured and that reports resizes.
pub trait SurfaceHost {
	/// Handle that keeps one listener registered.
	type Listener;

	/// Current size of the surface.
	fn measure(&self) -> Bounds;

	/// Registers `on_resize`; it receives the new size on every resize event.
	fn listen(&self, on_resize: ResizeFn) -> Result<Self::Listener>;

	/// Removes a listener previously returned by [`SurfaceHost::listen`].
	fn unlisten(&self, listener: Self::Listener);
}

/// A live resize listener plus the latest known size.
pub struct Subscription<H: SurfaceHost> {
	host: H,
	listener: Option<H::Listener>,
	bounds: Rc<Cell<Bounds>>,
}

/// Measures `host` and installs a single resize listener.
///
/// The stored size is updated before `on_resize` runs, so the callback and
/// [`Subscription::bounds`] always agree.
pub fn attach<H, F>(host: H, mut on_resize: F) -> Result<Subscription<H>>
where
	H: SurfaceHost,
	F: FnMut(Bounds) + 'static,
{
	let bounds = Rc::new(Cell::new(host.measure()));
	let shared = bounds.clone();
	let listener = host.listen(Box::new(move |next| {
		shared.set(next);
		on_resize(next);
	}))?;

	Ok(Subscription {
		host,
		listener: Some(listener),
		bounds,
	})
}

impl<H: SurfaceHost> Subscription<H> {
	/// Size as of the last measure or resize.
	pub fn bounds(&self) -> Bounds {
		self.bounds.get()
	}

	/// The host being tracked.
	pub fn host(&self) -> &H {
		&self.host
	}

	/// Whether the resize listener is still installed.
	pub fn is_attached(&self) -> bool {
		self.listener.is_some()
	}

	/// Removes the resize listener.
	pub fn detach(mut self) {
		self.release();
	}

	fn release(&mut self) {
		if let Some(listener) = self.listener.take() {
			self.host.unlisten(listener);
		}
	}
}

impl<H: SurfaceHost> Drop for Subscription<H> {
	fn drop(&mut self) {
		self.release();
	}
}

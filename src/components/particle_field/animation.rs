//! Frame loop lifecycle, independent of the browser.
//!
//! [`AnimationLoop`] keeps at most one frame request outstanding and moves
//! through `Idle -> Running -> Stopped`. Once stopped it never schedules
//! again, so a field that unmounts before its first tick draws nothing.

use crate::error::Result;

/// Elapsed-time cap so a background tab doesn't teleport particles.
pub const MAX_FRAME_DELTA: f64 = 0.125;

/// Delta reported for the very first frame, when there is no previous timestamp.
pub const NOMINAL_FRAME_DELTA: f64 = 1.0 / 60.0;

/// Lifecycle of an [`AnimationLoop`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
	/// Built but not started.
	Idle,
	/// A frame is requested or being handled.
	Running,
	/// Terminal; no further frames are requested.
	Stopped,
}

/// Identifier for an outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Something that can schedule and cancel one display-refresh callback.
pub trait FrameScheduler {
	/// Asks for one callback on the next display refresh.
	fn request_frame(&mut self) -> Result<FrameHandle>;
	/// Withdraws a request that has not fired yet.
	fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Converts monotonic millisecond timestamps into capped second deltas.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameClock {
	last: Option<f64>,
}

impl FrameClock {
	/// Seconds since the previous timestamp, clamped to `[0, MAX_FRAME_DELTA]`.
	pub fn tick(&mut self, timestamp_ms: f64) -> f64 {
		if !timestamp_ms.is_finite() {
			return 0.0;
		}
		let dt = match self.last.replace(timestamp_ms) {
			None => NOMINAL_FRAME_DELTA,
			Some(prev) => (timestamp_ms - prev) / 1000.0,
		};
		dt.clamp(0.0, MAX_FRAME_DELTA)
	}
}

/// Drives per-frame work through a [`FrameScheduler`].
pub struct AnimationLoop<S: FrameScheduler> {
	scheduler: S,
	state: LoopState,
	pending: Option<FrameHandle>,
	clock: FrameClock,
}

impl<S: FrameScheduler> AnimationLoop<S> {
	/// An idle loop; nothing is requested until [`AnimationLoop::start`].
	pub fn new(scheduler: S) -> Self {
		Self {
			scheduler,
			state: LoopState::Idle,
			pending: None,
			clock: FrameClock::default(),
		}
	}

	/// Requests the first frame. Returns `false` if the loop was already
	/// running or has been stopped; a stopped loop cannot be restarted.
	pub fn start(&mut self) -> Result<bool> {
		if self.state != LoopState::Idle {
			return Ok(false);
		}
		self.pending = Some(self.scheduler.request_frame()?);
		self.state = LoopState::Running;
		Ok(true)
	}

	/// Handles a delivered frame: runs `work` with the elapsed seconds and
	/// schedules the next frame.
	///
	/// Frames delivered after [`AnimationLoop::stop`] are ignored.
	pub fn on_frame(&mut self, timestamp_ms: f64, work: impl FnOnce(f64)) -> Result<bool> {
		self.pending = None;
		if self.state != LoopState::Running {
			return Ok(false);
		}
		work(self.clock.tick(timestamp_ms));
		match self.scheduler.request_frame() {
			Ok(handle) => {
				self.pending = Some(handle);
				Ok(true)
			}
			Err(e) => {
				self.state = LoopState::Stopped;
				Err(e)
			}
		}
	}

	/// Cancels any outstanding frame and stops for good.
	pub fn stop(&mut self) {
		if let Some(handle) = self.pending.take() {
			self.scheduler.cancel_frame(handle);
		}
		self.state = LoopState::Stopped;
	}

	/// Current lifecycle state.
	pub fn state(&self) -> LoopState {
		self.state
	}

	/// Whether the loop is in [`LoopState::Running`].
	pub fn is_running(&self) -> bool {
		self.state == LoopState::Running
	}

	/// Whether a frame request is outstanding.
	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}
}

#[cfg(test)]
pub(crate) mod testing {
	use std::cell::RefCell;
	use std::rc::Rc;

	use super::*;
	use crate::error::FxError;

	/// What a [`FakeScheduler`] has been asked to do.
	#[derive(Default)]
	pub struct Ledger {
		pub next: i32,
		pub outstanding: Vec<i32>,
		pub requested: usize,
		pub cancelled: usize,
		pub fail: bool,
	}

	/// Scheduler double whose clones share one ledger.
	#[derive(Clone, Default)]
	pub struct FakeScheduler(pub Rc<RefCell<Ledger>>);

	impl FrameScheduler for FakeScheduler {
		fn request_frame(&mut self) -> Result<FrameHandle> {
			let mut l = self.0.borrow_mut();
			if l.fail {
				return Err(FxError::Js("requestAnimationFrame".into()));
			}
			l.next += 1;
			let id = l.next;
			l.outstanding.push(id);
			l.requested += 1;
			Ok(FrameHandle(id))
		}

		fn cancel_frame(&mut self, handle: FrameHandle) {
			let mut l = self.0.borrow_mut();
			l.outstanding.retain(|id| *id != handle.0);
			l.cancelled += 1;
		}
	}

	impl FakeScheduler {
		/// Delivers the oldest outstanding frame, as the browser would.
		pub fn deliver(&self) -> bool {
			let mut l = self.0.borrow_mut();
			if l.outstanding.is_empty() {
				return false;
			}
			l.outstanding.remove(0);
			true
		}

		pub fn outstanding(&self) -> usize {
			self.0.borrow().outstanding.len()
		}
	}
}

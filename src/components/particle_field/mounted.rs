//! Ownership of a running field and its teardown order.
//!
//! The browser component fills this with a rAF scheduler, a canvas host, a
//! wasm closure and a gloo interval; tests fill it with in-memory doubles.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use super::animation::{AnimationLoop, FrameScheduler};
use super::behavior::Behavior;
use super::surface::{Subscription, SurfaceHost};
use super::system::ParticleSystem;
use crate::error::Result;

/// A system shared between the frame callback and the spawn timer.
pub type SharedSystem = Rc<RefCell<ParticleSystem<Box<dyn Behavior>>>>;

/// Everything a running field owns. Dropping it tears the field down.
///
/// `F` is the per-frame callback. It usually holds a clone of the loop, so
/// the slot is emptied on drop to break that cycle. `T` is the spawn timer,
/// cancelled by dropping it.
pub struct MountedField<S: FrameScheduler, H: SurfaceHost, F, T> {
	anim: Rc<RefCell<AnimationLoop<S>>>,
	frame: Rc<RefCell<Option<F>>>,
	system: SharedSystem,
	spawner: Option<T>,
	subscription: Option<Subscription<H>>,
}

impl<S: FrameScheduler, H: SurfaceHost, F, T> MountedField<S, H, F, T> {
	/// Bundles the parts of a field; nothing runs until [`MountedField::start`].
	pub fn new(
		anim: Rc<RefCell<AnimationLoop<S>>>,
		frame: Rc<RefCell<Option<F>>>,
		system: SharedSystem,
		spawner: Option<T>,
		subscription: Subscription<H>,
	) -> Self {
		Self {
			anim,
			frame,
			system,
			spawner,
			subscription: Some(subscription),
		}
	}

	/// Requests the first frame. On failure the field is dropped here, which
	/// unwinds everything it owns.
	pub fn start(self) -> Result<Self> {
		let started = self.anim.borrow_mut().start();
		started.map(|_| self)
	}

	/// The field's particle system.
	pub fn system(&self) -> &SharedSystem {
		&self.system
	}

	/// Whether the animation loop is running.
	pub fn is_running(&self) -> bool {
		self.anim.try_borrow().is_ok_and(|anim| anim.is_running())
	}
}

impl<S: FrameScheduler, H: SurfaceHost, F, T> Drop for MountedField<S, H, F, T> {
	fn drop(&mut self) {
		match self.anim.try_borrow_mut() {
			Ok(mut anim) => anim.stop(),
			Err(_) => warn!("jellyguard-fx: teardown during a frame; loop will stop on next tick"),
		}
		self.frame.borrow_mut().take();
		if let Ok(mut system) = self.system.try_borrow_mut() {
			system.clear();
		}
		drop(self.spawner.take());
		if let Some(subscription) = self.subscription.take() {
			subscription.detach();
		}
	}
}

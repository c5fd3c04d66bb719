//! Leptos component that mounts one particle field on a canvas.
//!
//! Mounting attaches the canvas to window resizes, seeds a system, and starts
//! a `requestAnimationFrame` loop that advances then renders every frame.
//! Unmounting stops the loop, cancels any spawn timer, removes the resize
//! listener and drops the particles. A field that fails to start logs a
//! warning and leaves its canvas blank.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::callback::Interval;
use leptos::prelude::*;
use log::{debug, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::HtmlCanvasElement;

use super::animation::AnimationLoop;
use super::mounted::{MountedField, SharedSystem};
use super::preset::{Field, FieldSpec};
use super::render::RenderFrame;
use super::surface::{self, Bounds};
use super::system::ParticleSystem;
use super::web::{CanvasHost, FrameCallback, RafScheduler};
use crate::error::Result;

/// A field running on a canvas.
type CanvasField = MountedField<RafScheduler, CanvasHost, Closure<dyn FnMut(f64)>, Interval>;

fn mount(canvas: HtmlCanvasElement, spec: &FieldSpec) -> Result<CanvasField> {
	let host = CanvasHost::new(canvas)?;
	let mut ctx = host.context()?;

	let live = Rc::new(Cell::new(Bounds::default()));
	let subscription = surface::attach(host, {
		let live = live.clone();
		move |bounds| live.set(bounds)
	})?;
	live.set(subscription.bounds());

	let Field {
		behavior,
		renderer,
		count,
		spawn_interval_ms,
	} = spec.build();
	let system: SharedSystem = Rc::new(RefCell::new(ParticleSystem::initialize(
		count,
		behavior,
		live.get(),
	)));

	let frame: FrameCallback = Rc::new(RefCell::new(None));
	let anim = Rc::new(RefCell::new(AnimationLoop::new(RafScheduler::new(frame.clone())?)));

	let (anim_tick, system_tick) = (anim.clone(), system.clone());
	*frame.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
		let Ok(mut anim) = anim_tick.try_borrow_mut() else {
			return;
		};
		let outcome = anim.on_frame(timestamp, |dt| {
			let Ok(mut system) = system_tick.try_borrow_mut() else {
				return;
			};
			let bounds = live.get();
			system.advance(dt, bounds);
			let frame = RenderFrame {
				bounds,
				time: system.time(),
			};
			renderer.render(system.snapshot(), &mut ctx, &frame);
		});
		if let Err(e) = outcome {
			warn!("jellyguard-fx: animation stopped: {}", e);
		}
	}));

	let spawner = spawn_interval_ms.map(|ms| {
		let system = system.clone();
		Interval::new(ms, move || {
			if let Ok(mut system) = system.try_borrow_mut() {
				system.emit();
			}
		})
	});

	MountedField::new(anim, frame, system, spawner, subscription).start()
}

/// A full-bleed, non-interactive canvas running one particle field.
///
/// The canvas is absolutely positioned to fill its nearest positioned
/// ancestor and sizes its backing store to its laid-out box.
#[component]
pub fn ParticleCanvas(
	spec: FieldSpec,
	#[prop(optional, into)] class: Option<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted: Rc<RefCell<Option<CanvasField>>> = Rc::new(RefCell::new(None));
	let mounted_init = mounted.clone();
	let kind = spec.kind;

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if mounted_init.borrow().is_some() {
			return;
		}
		match mount(canvas.into(), &spec) {
			Ok(field) => {
				info!("jellyguard-fx: mounted {:?} field", kind);
				*mounted_init.borrow_mut() = Some(field);
			}
			Err(e) => warn!("jellyguard-fx: {:?} field failed to start: {}", kind, e),
		}
	});

	let mounted = StoredValue::new_local(mounted);
	on_cleanup(move || {
		let field = mounted.try_with_value(|slot| slot.borrow_mut().take()).flatten();
		if field.is_some() {
			debug!("jellyguard-fx: tearing down {:?} field", kind);
		}
		drop(field);
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class=class.unwrap_or_else(|| "particle-field".to_owned())
			aria-hidden="true"
			style="position: absolute; inset: 0; width: 100%; height: 100%; pointer-events: none;"
		/>
	}
}

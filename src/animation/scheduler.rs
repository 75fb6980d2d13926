use std::panic::{self, AssertUnwindSafe};

use crate::animation::registry::AnimationRegistry;
use crate::scene::Scene;

/// Per-tick procedural animation function. Receives the scene and the frame delta.
pub type AnimationCallback = Box<dyn FnMut(&mut Scene, f32)>;

/// Identity of a registered callback, returned by [`AnimationScheduler::add_callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(u64);

/// Runs procedural callbacks in insertion order, then advances every clip
/// mixer of its [`AnimationRegistry`], once per tick.
#[derive(Default)]
pub struct AnimationScheduler {
    callbacks: Vec<(CallbackId, AnimationCallback)>,
    next_id: u64,
    registry: AnimationRegistry,
}

impl AnimationScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_callback(&mut self, callback: impl FnMut(&mut Scene, f32) + 'static) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.callbacks.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Unknown ids are ignored.
    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        let before = self.callbacks.len();
        self.callbacks.retain(|(existing, _)| *existing != id);
        before != self.callbacks.len()
    }

    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn registry(&self) -> &AnimationRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut AnimationRegistry {
        &mut self.registry
    }

    /// Calls every callback, then advances every mixer, all with the same `dt`.
    ///
    /// A callback that panics is logged and skipped for this tick; the rest
    /// still run.
    pub fn tick(&mut self, scene: &mut Scene, dt: f32) {
        for (id, callback) in &mut self.callbacks {
            let result = panic::catch_unwind(AssertUnwindSafe(|| callback(scene, dt)));
            if let Err(payload) = result {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| (*s).to_owned())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_owned());
                log::error!("Animation callback {id:?} panicked: {message}");
            }
        }

        self.registry.advance(dt, scene);
    }
}

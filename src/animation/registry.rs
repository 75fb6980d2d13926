//! Animation Clip Registry
//!
//! One [`AnimationMixer`] and its named clip set per model root. Every
//! operation returns a [`Result`]; failures are logged, leave the registry
//! untouched and never stop the frame loop.

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::animation::action::AnimationAction;
use crate::animation::clip::AnimationClip;
use crate::animation::mixer::AnimationMixer;
use crate::errors::{Result, StageError};
use crate::scene::{NodeHandle, Scene};

struct ModelAnimations {
    mixer: AnimationMixer,
    clips: Vec<Arc<AnimationClip>>,
}

impl ModelAnimations {
    fn clip(&self, name: &str) -> Option<&Arc<AnimationClip>> {
        self.clips.iter().find(|c| c.name == name)
    }
}

#[derive(Default)]
pub struct AnimationRegistry {
    models: FxHashMap<NodeHandle, ModelAnimations>,
}

/// Logs `err` and hands it back, so call sites stay one-liners.
fn report(err: StageError) -> StageError {
    log::error!("{err}");
    err
}

impl AnimationRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a mixer for `model` and stores its clips.
    ///
    /// A model that is already registered has its playback stopped and its
    /// entry replaced.
    pub fn register(&mut self, scene: &Scene, model: NodeHandle, clips: Vec<Arc<AnimationClip>>) -> Result<()> {
        if clips.is_empty() {
            return Err(report(StageError::EmptyClipSet { model }));
        }
        if !scene.contains(model) {
            return Err(report(StageError::NodeNotFound(model)));
        }

        if let Some(mut previous) = self.models.remove(&model) {
            previous.mixer.stop_all();
            log::info!("Replacing animation registration for {model:?}");
        }

        log::debug!("Registered {} clip(s) for {model:?}", clips.len());
        self.models.insert(
            model,
            ModelAnimations {
                mixer: AnimationMixer::new(model),
                clips,
            },
        );
        Ok(())
    }

    /// Stops all playback of `model` and drops its entry.
    pub fn unregister(&mut self, model: NodeHandle) -> Result<()> {
        let Some(mut entry) = self.models.remove(&model) else {
            return Err(report(StageError::ModelNotRegistered(model)));
        };
        entry.mixer.stop_all();
        log::debug!("Unregistered animations for {model:?}");
        Ok(())
    }

    fn lookup(&mut self, model: NodeHandle, clip: &str) -> Result<(&mut AnimationMixer, Arc<AnimationClip>)> {
        let Some(entry) = self.models.get_mut(&model) else {
            return Err(report(StageError::ModelNotRegistered(model)));
        };
        let Some(found) = entry.clip(clip).cloned() else {
            return Err(report(StageError::ClipNotFound {
                model,
                clip: clip.to_owned(),
            }));
        };
        Ok((&mut entry.mixer, found))
    }

    /// Rewinds the clip and starts it.
    pub fn play(&mut self, scene: &Scene, model: NodeHandle, clip: &str) -> Result<()> {
        let (mixer, found) = self.lookup(model, clip)?;
        mixer.clip_action(&found, scene).reset().play();
        Ok(())
    }

    /// Freezes the play-head where it is.
    pub fn pause(&mut self, scene: &Scene, model: NodeHandle, clip: &str) -> Result<()> {
        let (mixer, found) = self.lookup(model, clip)?;
        mixer.clip_action(&found, scene).paused = true;
        Ok(())
    }

    /// Halts and rewinds. Stopping a clip that is not playing is a no-op.
    pub fn stop(&mut self, model: NodeHandle, clip: &str) -> Result<()> {
        let (mixer, found) = self.lookup(model, clip)?;
        if let Some(action) = mixer.existing_action(&found.name) {
            action.stop();
        }
        Ok(())
    }

    pub fn set_speed(&mut self, scene: &Scene, model: NodeHandle, clip: &str, factor: f32) -> Result<()> {
        let (mixer, found) = self.lookup(model, clip)?;
        mixer.clip_action(&found, scene).time_scale = factor;
        Ok(())
    }

    #[must_use]
    pub fn is_registered(&self, model: NodeHandle) -> bool {
        self.models.contains_key(&model)
    }

    /// Clip names of `model` in registration order.
    #[must_use]
    pub fn clip_names(&self, model: NodeHandle) -> Option<Vec<&str>> {
        self.models
            .get(&model)
            .map(|entry| entry.clips.iter().map(|c| c.name.as_str()).collect())
    }

    /// The action of a clip that has been played, paused or sped up at least once.
    #[must_use]
    pub fn action(&self, model: NodeHandle, clip: &str) -> Option<&AnimationAction> {
        self.models.get(&model)?.mixer.action(clip)
    }

    #[must_use]
    pub fn mixer(&self, model: NodeHandle) -> Option<&AnimationMixer> {
        self.models.get(&model).map(|entry| &entry.mixer)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.models.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Advances every mixer by `dt`.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        for entry in self.models.values_mut() {
            entry.mixer.update(dt, scene);
        }
    }
}

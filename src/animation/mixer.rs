use std::sync::Arc;

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Playback controller of one model: one action per clip name, bound to
/// nodes under `root`.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: Vec<AnimationAction>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Action for `clip`, created and bound on first request.
    pub fn clip_action(&mut self, clip: &Arc<AnimationClip>, scene: &Scene) -> &mut AnimationAction {
        let index = match self.actions.iter().position(|a| a.name() == clip.name) {
            Some(index) => index,
            None => {
                let mut action = AnimationAction::new(Arc::clone(clip));
                action.bindings = Binder::bind(scene, self.root, clip);
                self.actions.push(action);
                self.actions.len() - 1
            }
        };
        &mut self.actions[index]
    }

    /// Action previously created for `name`, if any.
    pub fn existing_action(&mut self, name: &str) -> Option<&mut AnimationAction> {
        self.actions.iter_mut().find(|a| a.name() == name)
    }

    #[must_use]
    pub fn action(&self, name: &str) -> Option<&AnimationAction> {
        self.actions.iter().find(|a| a.name() == name)
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    pub fn stop_all(&mut self) {
        for action in &mut self.actions {
            action.stop();
        }
    }

    /// Advances every action, then writes sampled values into the scene.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.update(dt);
        }

        for action in &mut self.actions {
            action.apply(scene);
        }
    }
}

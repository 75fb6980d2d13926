use std::sync::Arc;

use glam::Vec3;

use crate::animation::{
    binding::{PropertyBinding, TargetPath},
    clip::{AnimationClip, TrackData},
    tracks::KeyframeCursor,
};
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoopMode {
    /// Play to the end and hold the last frame.
    Once,
    #[default]
    Loop,
    PingPong,
}

/// Playback state of one clip on one model.
///
/// An action is inert until [`play`](Self::play) is called. [`stop`](Self::stop)
/// rewinds and deactivates it, `paused` freezes the play-head in place.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub weight: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,
    running: bool,

    pub bindings: Vec<PropertyBinding>,

    pub(crate) track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            weight: 1.0,
            loop_mode: LoopMode::Loop,
            paused: false,
            enabled: true,
            running: false,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.clip.name
    }

    /// Rewinds to the start and clears `paused`. Does not start playback.
    pub fn reset(&mut self) -> &mut Self {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
        self
    }

    pub fn play(&mut self) -> &mut Self {
        self.running = true;
        self
    }

    /// Deactivates and rewinds. Calling it on a stopped action does nothing.
    pub fn stop(&mut self) -> &mut Self {
        if self.running {
            self.running = false;
            self.reset();
        }
        self
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the play-head moves on [`update`](Self::update).
    #[must_use]
    pub fn is_advancing(&self) -> bool {
        self.running && self.enabled && !self.paused
    }

    /// Advances the play-head by `dt * time_scale`.
    pub fn update(&mut self, dt: f32) {
        if !self.is_advancing() {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Loop => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
            LoopMode::PingPong => {
                let double_duration = duration * 2.0;
                let mut t = self.time % double_duration;
                if t < 0.0 {
                    t += double_duration;
                }
                if t > duration {
                    t = double_duration - t;
                }
                self.time = t;
            }
        }
    }

    /// Writes every bound track, sampled at the current time, into the scene.
    pub(crate) fn apply(&mut self, scene: &mut Scene) {
        if !self.running || !self.enabled || self.weight <= 0.0 {
            return;
        }

        for binding in &self.bindings {
            let (Some(track), Some(cursor)) = (
                self.clip.tracks.get(binding.track_index),
                self.track_cursors.get_mut(binding.track_index),
            ) else {
                continue;
            };
            let Some(node) = scene.get_node_mut(binding.node_handle) else {
                continue;
            };
            let transform = &mut node.transform;

            match (&track.data, binding.target) {
                (TrackData::Vector3(t), TargetPath::Translation) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        transform.position = value;
                    }
                }
                (TrackData::Vector3(t), TargetPath::Scale) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        transform.scale = value;
                    }
                }
                (TrackData::Scalar(t), TargetPath::Scale) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        transform.scale = Vec3::splat(value);
                    }
                }
                (TrackData::Quaternion(t), TargetPath::Rotation) => {
                    if let Some(value) = t.sample_with_cursor(self.time, cursor) {
                        transform.rotation = value;
                    }
                }
                _ => continue,
            }
            transform.mark_dirty();
        }
    }
}

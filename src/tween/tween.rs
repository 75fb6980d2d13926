use std::fmt;
use std::sync::Arc;

use glam::Vec3;

use crate::scene::NodeHandle;
use crate::tween::curve::Curve;
use crate::tween::easing::Ease;

/// What a tween writes to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// The stage camera position. The camera is turned towards `look_at`
    /// after every write.
    Camera { look_at: Vec3 },
    /// The local position of a scene node.
    Node(NodeHandle),
}

impl TweenTarget {
    /// Identity used for preemption: one in-flight transition per key.
    #[must_use]
    pub fn key(&self) -> TargetKey {
        match self {
            TweenTarget::Camera { .. } => TargetKey::Camera,
            TweenTarget::Node(handle) => TargetKey::Node(*handle),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKey {
    Camera,
    Node(NodeHandle),
}

/// How progress maps to a value.
#[derive(Clone)]
pub enum Motion {
    /// From the target's value at segment start to a fixed destination.
    To(Vec3),
    /// Along a curve by arc length.
    Along(Arc<dyn Curve>),
}

impl Motion {
    #[must_use]
    pub fn sample(&self, from: Vec3, progress: f32) -> Vec3 {
        match self {
            Motion::To(to) if progress >= 1.0 => *to,
            Motion::To(to) => from.lerp(*to, progress),
            Motion::Along(curve) => curve.point_at(progress),
        }
    }
}

impl fmt::Debug for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Motion::To(to) => f.debug_tuple("To").field(to).finish(),
            Motion::Along(curve) => f.debug_tuple("Along").field(curve).finish(),
        }
    }
}

/// Repeat policy of a single tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    #[default]
    Once,
    /// Plays `1 + n` times in total.
    Times(u32),
    /// Never completes; only cancellation ends it.
    Infinite,
}

impl Repeat {
    /// Whether another pass may start after `completed_passes` passes.
    #[must_use]
    pub fn allows(self, completed_passes: u32) -> bool {
        match self {
            Repeat::Once => false,
            Repeat::Times(n) => completed_passes <= n,
            Repeat::Infinite => true,
        }
    }
}

pub type UpdateFn = Box<dyn FnMut(Vec3)>;
pub type CompleteFn = Box<dyn FnOnce()>;

/// One time-driven interpolation of a target position.
///
/// ```rust,ignore
/// let tween = Tween::to(TweenTarget::Node(cube), Vec3::Y * 3.0, 2.0)
///     .with_ease(Ease::Power2Out)
///     .on_complete(|| log::info!("arrived"));
/// driver.start(tween);
/// ```
pub struct Tween {
    pub target: TweenTarget,
    pub motion: Motion,
    pub duration: f32,
    pub ease: Ease,
    pub repeat: Repeat,
    pub(crate) on_update: Option<UpdateFn>,
    pub(crate) on_complete: Option<CompleteFn>,
}

impl Tween {
    #[must_use]
    pub fn to(target: TweenTarget, destination: Vec3, duration: f32) -> Self {
        Self::new(target, Motion::To(destination), duration)
    }

    #[must_use]
    pub fn along(target: TweenTarget, curve: Arc<dyn Curve>, duration: f32) -> Self {
        Self::new(target, Motion::Along(curve), duration)
    }

    fn new(target: TweenTarget, motion: Motion, duration: f32) -> Self {
        Self {
            target,
            motion,
            duration,
            ease: Ease::default(),
            repeat: Repeat::Once,
            on_update: None,
            on_complete: None,
        }
    }

    #[must_use]
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Called with the written value after every tick.
    #[must_use]
    pub fn on_update(mut self, f: impl FnMut(Vec3) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }

    /// Called once, after the final update. Never called for infinite
    /// repeats or cancelled tweens.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl fmt::Debug for Tween {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tween")
            .field("target", &self.target)
            .field("motion", &self.motion)
            .field("duration", &self.duration)
            .field("ease", &self.ease)
            .field("repeat", &self.repeat)
            .finish_non_exhaustive()
    }
}

/// Tweens played back to back. Each segment starts from wherever the
/// previous one left its target.
#[derive(Default)]
pub struct Timeline {
    pub(crate) segments: Vec<Tween>,
    pub(crate) on_complete: Option<CompleteFn>,
}

impl Timeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a segment. Its own `on_complete` fires when the segment ends.
    #[must_use]
    pub fn then(mut self, tween: Tween) -> Self {
        self.segments.push(tween);
        self
    }

    /// Called once after the last segment.
    #[must_use]
    pub fn on_complete(mut self, f: impl FnOnce() + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of segment durations. Infinite segments count once.
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.segments.iter().map(|s| s.duration.max(0.0)).sum()
    }
}

impl fmt::Debug for Timeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timeline")
            .field("segments", &self.segments)
            .field("has_on_complete", &self.on_complete.is_some())
            .finish()
    }
}

//! Tween Driver
//!
//! Owns every in-flight tween and timeline and advances them from the frame
//! tick. The driver never holds references into the scene: current values
//! are read and new values written through a [`TweenSink`] passed to
//! [`TweenDriver::advance`], so the sink's owner stays the single writer of
//! its fields.
//!
//! # Preemption
//!
//! Each entry is registered against the [`TargetKey`]s it writes. Starting a
//! new entry cancels every in-flight entry sharing one of its keys; the
//! cancelled entry's completion callbacks never run.

use std::collections::VecDeque;

use glam::Vec3;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::tween::tween::{CompleteFn, Repeat, TargetKey, Timeline, Tween, TweenTarget};

new_key_type! {
    /// Handle to a tween or timeline started on a [`TweenDriver`].
    pub struct TweenHandle;
}

/// Read/write access to tween targets.
pub trait TweenSink {
    /// Current value of the target, or `None` if it no longer exists.
    fn current(&self, target: &TweenTarget) -> Option<Vec3>;

    /// Writes a new value. Returns `false` if the target no longer exists.
    fn apply(&mut self, target: &TweenTarget, value: Vec3) -> bool;
}

enum Step {
    Running,
    Finished,
    Lost,
}

struct ActiveSegment {
    tween: Tween,
    from: Vec3,
    elapsed: f32,
    passes: u32,
}

impl ActiveSegment {
    fn write<S: TweenSink + ?Sized>(&mut self, progress: f32, sink: &mut S) -> bool {
        let eased = self.tween.ease.evaluate(progress);
        let value = self.tween.motion.sample(self.from, eased);
        if !sink.apply(&self.tween.target, value) {
            return false;
        }
        if let Some(on_update) = &mut self.tween.on_update {
            on_update(value);
        }
        true
    }
}

struct Entry {
    keys: SmallVec<[TargetKey; 2]>,
    pending: VecDeque<Tween>,
    active: Option<ActiveSegment>,
    on_complete: Option<CompleteFn>,
}

impl Entry {
    fn step<S: TweenSink + ?Sized>(&mut self, dt: f32, sink: &mut S) -> Step {
        let mut remaining = dt;

        loop {
            if self.active.is_none() {
                let Some(tween) = self.pending.pop_front() else {
                    return Step::Finished;
                };
                let Some(from) = sink.current(&tween.target) else {
                    return Step::Lost;
                };
                self.active = Some(ActiveSegment {
                    tween,
                    from,
                    elapsed: 0.0,
                    passes: 0,
                });
            }
            let Some(active) = self.active.as_mut() else {
                return Step::Finished;
            };

            let duration = active.tween.duration;
            let overflow = if duration > 0.0 {
                active.elapsed += remaining;
                if active.elapsed < duration {
                    let progress = active.elapsed / duration;
                    return if active.write(progress, sink) { Step::Running } else { Step::Lost };
                }

                match wrap_passes(active, duration) {
                    Some(carry) => carry,
                    None => {
                        let progress = active.elapsed / duration;
                        return if active.write(progress, sink) { Step::Running } else { Step::Lost };
                    }
                }
            } else {
                remaining
            };

            // Segment done: land exactly on the end value, then hand the
            // leftover time to the next segment.
            if !active.write(1.0, sink) {
                return Step::Lost;
            }
            if let Some(on_complete) = active.tween.on_complete.take() {
                on_complete();
            }
            self.active = None;
            remaining = overflow;
        }
    }
}

/// Consumes finished passes of a segment whose elapsed time reached its
/// duration. Returns the leftover time once the segment has no passes left,
/// or `None` when it wrapped into a new pass (elapsed is then rewound).
fn wrap_passes(active: &mut ActiveSegment, duration: f32) -> Option<f32> {
    let mut overflow = active.elapsed - duration;
    loop {
        active.passes += 1;
        if !active.tween.repeat.allows(active.passes) {
            return Some(overflow);
        }
        if active.tween.repeat == Repeat::Infinite {
            overflow %= duration;
        }
        if overflow < duration {
            active.elapsed = overflow;
            return None;
        }
        overflow -= duration;
    }
}

/// Time-driven interpolation engine.
#[derive(Default)]
pub struct TweenDriver {
    entries: SlotMap<TweenHandle, Entry>,
}

impl TweenDriver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
        }
    }

    /// Starts a single tween, preempting any in-flight entry on its target.
    pub fn start(&mut self, tween: Tween) -> TweenHandle {
        self.start_timeline(Timeline::new().then(tween))
    }

    /// Starts a sequence of tweens, preempting any in-flight entry on any of
    /// the targets it writes.
    pub fn start_timeline(&mut self, timeline: Timeline) -> TweenHandle {
        let mut keys: SmallVec<[TargetKey; 2]> = SmallVec::new();
        for segment in &timeline.segments {
            let key = segment.target.key();
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        for &key in &keys {
            let cancelled = self.cancel_target(key);
            if cancelled > 0 {
                log::debug!("Preempted {cancelled} tween(s) on {key:?}");
            }
        }

        self.entries.insert(Entry {
            keys,
            pending: timeline.segments.into(),
            active: None,
            on_complete: timeline.on_complete,
        })
    }

    /// Advances every entry by `dt` seconds.
    ///
    /// Returns the handles that completed during this call. Entries whose
    /// target disappeared are dropped with a warning and are not reported.
    pub fn advance<S: TweenSink + ?Sized>(&mut self, dt: f32, sink: &mut S) -> SmallVec<[TweenHandle; 4]> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        let mut completed: SmallVec<[TweenHandle; 4]> = SmallVec::new();
        let mut lost: SmallVec<[TweenHandle; 4]> = SmallVec::new();

        for (handle, entry) in &mut self.entries {
            match entry.step(dt, sink) {
                Step::Running => {}
                Step::Finished => completed.push(handle),
                Step::Lost => lost.push(handle),
            }
        }

        for handle in &lost {
            if let Some(entry) = self.entries.remove(*handle) {
                log::warn!("Tween {handle:?} lost its target {:?}, dropping it", entry.keys.as_slice());
            }
        }

        for handle in &completed {
            if let Some(mut entry) = self.entries.remove(*handle)
                && let Some(on_complete) = entry.on_complete.take()
            {
                on_complete();
            }
        }

        completed
    }

    /// Cancels one entry. Its completion callbacks never run.
    pub fn cancel(&mut self, handle: TweenHandle) -> bool {
        self.entries.remove(handle).is_some()
    }

    /// Cancels every entry writing `key`. Returns how many were cancelled.
    pub fn cancel_target(&mut self, key: TargetKey) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.keys.contains(&key));
        before - self.entries.len()
    }

    #[must_use]
    pub fn is_active(&self, handle: TweenHandle) -> bool {
        self.entries.contains_key(handle)
    }

    /// Whether any entry is writing `key`.
    #[must_use]
    pub fn is_target_busy(&self, key: TargetKey) -> bool {
        self.entries.values().any(|e| e.keys.contains(&key))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

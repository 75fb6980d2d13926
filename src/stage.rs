//! Stage
//!
//! The per-frame entry point. A [`Stage`] owns the scene, the camera rig, the
//! tween driver and the animation scheduler, and runs them in a fixed order
//! on every tick:
//!
//! 1. orbit controls (only while the camera is idle)
//! 2. procedural callbacks, then clip mixers
//! 3. tweens and timelines
//! 4. the camera glide
//!
//! Choreography calls such as [`Stage::frame_object`] return immediately; their
//! effects unfold over the following ticks.

use std::sync::Arc;

use glam::Vec3;

use crate::animation::{AnimationClip, AnimationRegistry, AnimationScheduler, CallbackId};
use crate::camera::{Camera, CameraRig, OrbitControls, Waypoint, frame_bounds, reframe_bounds};
use crate::config::StageConfig;
use crate::errors::{Result, StageError};
use crate::math::{center_on_origin, compute_bounds};
use crate::scene::{NodeHandle, Scene};
use crate::time::FrameClock;
use crate::tween::{Curve, Ease, Repeat, Timeline, Tween, TweenDriver, TweenHandle, TweenSink, TweenTarget};

/// Tween writes routed into the scene and the camera rig.
struct StageSink<'a> {
    scene: &'a mut Scene,
    rig: &'a mut CameraRig,
}

impl TweenSink for StageSink<'_> {
    fn current(&self, target: &TweenTarget) -> Option<Vec3> {
        match target {
            TweenTarget::Camera { .. } => Some(self.rig.position()),
            TweenTarget::Node(handle) => self.scene.position(*handle),
        }
    }

    fn apply(&mut self, target: &TweenTarget, value: Vec3) -> bool {
        match target {
            TweenTarget::Camera { look_at } => {
                self.rig.apply_tween_value(value, *look_at);
                true
            }
            TweenTarget::Node(handle) => self.scene.set_position(*handle, value),
        }
    }
}

fn report(err: StageError) -> StageError {
    log::error!("{err}");
    err
}

fn check_duration(duration: f32) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(report(StageError::InvalidDuration(duration)))
    }
}

pub struct Stage {
    scene: Scene,
    rig: CameraRig,
    tweens: TweenDriver,
    scheduler: AnimationScheduler,
    controls: Option<OrbitControls>,
    config: StageConfig,
    clock: FrameClock,
}

impl Default for Stage {
    fn default() -> Self {
        Self::build(StageConfig::default())
    }
}

impl Stage {
    /// Builds a stage from a validated configuration.
    pub fn new(config: StageConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: StageConfig) -> Self {
        let cam = &config.camera;
        let camera = Camera::new_perspective(cam.fov_degrees, cam.aspect, cam.near, cam.far);
        let rig = CameraRig::new(camera, cam.position, config.glide_settings());

        let controls = cam.orbit_controls.then(|| {
            let mut controls = OrbitControls::new(Vec3::ZERO, cam.position.length());
            controls.mark_stale();
            controls
        });

        Self {
            scene: Scene::new(),
            rig,
            tweens: TweenDriver::new(),
            scheduler: AnimationScheduler::new(),
            controls,
            clock: FrameClock::new(config.timing.max_frame_delta),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[must_use]
    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    #[must_use]
    pub fn tweens(&self) -> &TweenDriver {
        &self.tweens
    }

    pub fn tweens_mut(&mut self) -> &mut TweenDriver {
        &mut self.tweens
    }

    #[must_use]
    pub fn registry(&self) -> &AnimationRegistry {
        self.scheduler.registry()
    }

    #[must_use]
    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    pub fn controls_mut(&mut self) -> Option<&mut OrbitControls> {
        self.controls.as_mut()
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.rig.camera.set_aspect(aspect);
    }

    /// Teleports the camera and stops whatever transition owned it.
    pub fn set_camera_pose(&mut self, position: Vec3, look_at: Vec3) {
        self.stop_camera();
        self.rig.set_position(position);
        self.rig.look_at(look_at);
    }

    // ========================================================================
    // Camera choreography
    // ========================================================================

    /// Hands the camera slot to a new timeline, cancelling the previous owner.
    fn start_camera_timeline(&mut self, timeline: Timeline, destination: Vec3) -> TweenHandle {
        if let Some(previous) = self.rig.tween_handle()
            && self.tweens.cancel(previous)
        {
            log::debug!("Cancelled camera tween {previous:?}");
        }
        let handle = self.tweens.start_timeline(timeline);
        self.rig.begin_tween(handle, destination);
        if let Some(controls) = &mut self.controls {
            controls.mark_stale();
        }
        handle
    }

    /// Cancels any camera transition, leaving the camera where it is.
    ///
    /// Orbit controls re-sync from the resulting pose on the next tick.
    pub fn stop_camera(&mut self) {
        if let Some(handle) = self.rig.tween_handle() {
            self.tweens.cancel(handle);
        }
        self.rig.halt();
        if let Some(controls) = &mut self.controls {
            controls.mark_stale();
        }
    }

    /// Animates the camera so the whole subtree of `node` fits the view.
    ///
    /// The camera looks at the bounds center on every tick; `on_complete`
    /// runs once when it arrives.
    pub fn frame_object(&mut self, node: NodeHandle, on_complete: impl FnOnce() + 'static) -> Result<TweenHandle> {
        let bounds = compute_bounds(&self.scene, node).ok_or_else(|| report(StageError::NodeNotFound(node)))?;
        let plan = frame_bounds(&bounds, self.rig.camera.fov, &self.config.framing_settings());
        log::debug!(
            "Framing {node:?}: size {:?}, distance {:.3}, flat {}",
            bounds.size,
            plan.distance,
            plan.flat
        );

        let tween = Tween::to(
            TweenTarget::Camera { look_at: plan.look_at },
            plan.position,
            self.config.framing.duration,
        )
        .with_ease(self.config.framing.frame_ease)
        .on_complete(on_complete);

        Ok(self.start_camera_timeline(Timeline::new().then(tween), plan.position))
    }

    /// Moves the camera to an elevated view of `node`, sized by its largest axis.
    pub fn move_camera_to_mesh(&mut self, node: NodeHandle) -> Result<TweenHandle> {
        let bounds = compute_bounds(&self.scene, node).ok_or_else(|| report(StageError::NodeNotFound(node)))?;
        let plan = reframe_bounds(&bounds, &self.config.framing_settings());

        let tween = Tween::to(
            TweenTarget::Camera { look_at: plan.look_at },
            plan.position,
            self.config.framing.duration,
        )
        .with_ease(self.config.framing.reframe_ease);

        Ok(self.start_camera_timeline(Timeline::new().then(tween), plan.position))
    }

    /// Flies the camera through `waypoints`, then back to where it started.
    ///
    /// `total_duration` is split evenly across the waypoints. The return leg
    /// takes `framing.return_duration` and faces the original view direction.
    pub fn animate_along_path(
        &mut self,
        waypoints: &[Waypoint],
        total_duration: f32,
        on_complete: impl FnOnce() + 'static,
    ) -> Result<TweenHandle> {
        if waypoints.is_empty() {
            return Err(report(StageError::EmptyPath));
        }
        check_duration(total_duration)?;

        let home = self.rig.position();
        let home_look = home + self.rig.forward();

        let segment = total_duration / waypoints.len() as f32;

        let mut timeline = Timeline::new();
        for waypoint in waypoints {
            timeline = timeline.then(Tween::to(
                TweenTarget::Camera {
                    look_at: waypoint.look_at,
                },
                waypoint.position,
                segment,
            ));
        }
        timeline = timeline
            .then(Tween::to(
                TweenTarget::Camera { look_at: home_look },
                home,
                self.config.framing.return_duration,
            ))
            .on_complete(on_complete);

        log::debug!(
            "Camera path: {} waypoint(s), {:.3}s each, returning to {home:?}",
            waypoints.len(),
            segment
        );
        Ok(self.start_camera_timeline(timeline, home))
    }

    /// Starts the idle glide towards `target`, looking at the origin.
    pub fn glide_camera_to(&mut self, target: Vec3) {
        if let Some(handle) = self.rig.tween_handle() {
            self.tweens.cancel(handle);
        }
        self.rig.begin_glide(target);
        if let Some(controls) = &mut self.controls {
            controls.mark_stale();
        }
    }

    // ========================================================================
    // Node motion
    // ========================================================================

    /// Loops `node` along `curve` forever at constant speed, one lap per `duration`.
    pub fn follow_curve(&mut self, node: NodeHandle, curve: Arc<dyn Curve>, duration: f32) -> Result<TweenHandle> {
        if !self.scene.contains(node) {
            return Err(report(StageError::NodeNotFound(node)));
        }
        check_duration(duration)?;

        let tween = Tween::along(TweenTarget::Node(node), curve, duration)
            .with_ease(Ease::Linear)
            .with_repeat(Repeat::Infinite);
        Ok(self.tweens.start(tween))
    }

    /// Tweens the local position of `node`, replacing any motion already on it.
    pub fn move_node_to(&mut self, node: NodeHandle, destination: Vec3, duration: f32, ease: Ease) -> Result<TweenHandle> {
        if !self.scene.contains(node) {
            return Err(report(StageError::NodeNotFound(node)));
        }
        check_duration(duration)?;

        Ok(self
            .tweens
            .start(Tween::to(TweenTarget::Node(node), destination, duration).with_ease(ease)))
    }

    /// Offsets `node` so its bounds are centered on the origin.
    pub fn center_model(&mut self, node: NodeHandle) -> Result<Vec3> {
        center_on_origin(&mut self.scene, node).ok_or_else(|| report(StageError::NodeNotFound(node)))
    }

    // ========================================================================
    // Animation
    // ========================================================================

    pub fn add_callback(&mut self, callback: impl FnMut(&mut Scene, f32) + 'static) -> CallbackId {
        self.scheduler.add_callback(callback)
    }

    pub fn remove_callback(&mut self, id: CallbackId) -> bool {
        self.scheduler.remove_callback(id)
    }

    pub fn add_animation(&mut self, model: NodeHandle, clips: Vec<Arc<AnimationClip>>) -> Result<()> {
        self.scheduler.registry_mut().register(&self.scene, model, clips)
    }

    pub fn remove_animation(&mut self, model: NodeHandle) -> Result<()> {
        self.scheduler.registry_mut().unregister(model)
    }

    pub fn play_animation(&mut self, model: NodeHandle, clip: &str) -> Result<()> {
        self.scheduler.registry_mut().play(&self.scene, model, clip)
    }

    pub fn pause_animation(&mut self, model: NodeHandle, clip: &str) -> Result<()> {
        self.scheduler.registry_mut().pause(&self.scene, model, clip)
    }

    pub fn stop_animation(&mut self, model: NodeHandle, clip: &str) -> Result<()> {
        self.scheduler.registry_mut().stop(model, clip)
    }

    pub fn set_animation_speed(&mut self, model: NodeHandle, clip: &str, factor: f32) -> Result<()> {
        self.scheduler.registry_mut().set_speed(&self.scene, model, clip, factor)
    }

    // ========================================================================
    // Frame loop
    // ========================================================================

    /// Samples the frame clock and ticks. Returns the delta used.
    pub fn frame(&mut self) -> f32 {
        let dt = self.clock.tick();
        self.tick(dt);
        dt
    }

    /// Advances everything by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(controls) = &mut self.controls {
            if self.rig.is_animating() {
                controls.mark_stale();
            } else {
                if controls.is_stale() {
                    controls.sync_from(self.rig.position(), self.rig.look_target());
                }
                controls.update(&mut self.rig.transform, self.rig.camera.fov, dt);
                self.rig.adopt_orbit_pose(controls.center);
            }
        }

        self.scheduler.tick(&mut self.scene, dt);

        let mut sink = StageSink {
            scene: &mut self.scene,
            rig: &mut self.rig,
        };
        self.tweens.advance(dt, &mut sink);

        let tweens = &self.tweens;
        self.rig.release_finished_tween(|handle| tweens.is_active(handle));
        self.rig.update(dt);

        self.scene.update_matrix_world();
    }
}

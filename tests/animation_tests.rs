//! Keyframe Animation Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation and empty tracks
//! - KeyframeCursor sequential access and binary search fallback
//! - AnimationAction lifecycle (reset/play/stop) and loop modes
//! - Binder by-name binding and AnimationMixer scene writes

use std::f32::consts::FRAC_PI_2;
use std::sync::Arc;

use glam::{Quat, Vec3};

use stagehand::animation::action::{AnimationAction, LoopMode};
use stagehand::animation::binder::Binder;
use stagehand::animation::binding::TargetPath;
use stagehand::animation::clip::{AnimationClip, Track, TrackData};
use stagehand::animation::mixer::AnimationMixer;
use stagehand::animation::tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
use stagehand::animation::values::Interpolatable;
use stagehand::scene::{Node, Scene};

const EPSILON: f32 = 1e-5;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

// ============================================================================
// KeyframeTrack
// ============================================================================

#[test]
fn track_linear_f32_midpoint() {
    let track = KeyframeTrack::linear(vec![0.0, 1.0], vec![0.0_f32, 10.0]);

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor).unwrap();
    assert!(approx(val, 5.0), "Expected 5.0, got {val}");
}

#[test]
fn track_linear_clamps_outside_range() {
    let track = KeyframeTrack::linear(vec![1.0, 2.0], vec![3.0_f32, 7.0]);

    assert!(approx(track.sample(0.0).unwrap(), 3.0));
    assert!(approx(track.sample(5.0).unwrap(), 7.0));
}

#[test]
fn track_step_holds_value() {
    let track = KeyframeTrack::new(vec![0.0, 1.0, 2.0], vec![1.0_f32, 2.0, 3.0], InterpolationMode::Step);

    assert!(approx(track.sample(0.99).unwrap(), 1.0));
    assert!(approx(track.sample(1.5).unwrap(), 2.0));
    assert!(approx(track.sample(2.0).unwrap(), 3.0));
}

#[test]
fn track_linear_quat_slerp() {
    let a = Quat::IDENTITY;
    let b = Quat::from_rotation_y(FRAC_PI_2);
    let track = KeyframeTrack::linear(vec![0.0, 1.0], vec![a, b]);

    let result = track.sample(0.5).unwrap();
    let angle = result.angle_between(a.slerp(b, 0.5));
    assert!(angle < 1e-4, "Slerp mismatch: angle={angle}");
}

#[test]
fn track_cubic_f32_endpoints() {
    // [in_tangent, value, out_tangent] per keyframe
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![0.0_f32, 0.0, 0.0, 0.0, 10.0, 0.0],
        InterpolationMode::CubicSpline,
    );

    assert!(approx(track.sample(0.0).unwrap(), 0.0));
    assert!(approx(track.sample(1.0).unwrap(), 10.0));
    let mid = track.sample(0.5).unwrap();
    assert!(approx(mid, 5.0), "Zero tangents give a symmetric midpoint, got {mid}");
}

#[test]
fn empty_track_samples_none() {
    let track: KeyframeTrack<f32> = KeyframeTrack::linear(vec![], vec![]);
    let mut cursor = KeyframeCursor::default();

    assert!(track.sample(0.5).is_none());
    assert!(track.sample_with_cursor(0.5, &mut cursor).is_none());
}

#[test]
fn mismatched_values_sample_none_instead_of_panicking() {
    let track = KeyframeTrack::linear(vec![0.0, 1.0, 2.0], vec![0.0_f32, 1.0]);
    assert!(track.sample(1.5).is_none());
}

// ============================================================================
// KeyframeCursor
// ============================================================================

#[test]
fn cursor_sequential_forward() {
    let track = KeyframeTrack::linear(vec![0.0, 1.0, 2.0, 3.0, 4.0], vec![0.0_f32, 10.0, 20.0, 30.0, 40.0]);
    let mut cursor = KeyframeCursor::default();

    for step in 0..40 {
        let t = step as f32 * 0.1;
        let val = track.sample_with_cursor(t, &mut cursor).unwrap();
        assert!((val - t * 10.0).abs() < 1e-3, "t={t}: expected {}, got {val}", t * 10.0);
    }
    assert_eq!(cursor.last_index, 3);
}

#[test]
fn cursor_forward_then_jump_back() {
    let times: Vec<f32> = (0..20).map(|i| i as f32).collect();
    let values: Vec<f32> = (0..20).map(|i| i as f32 * 2.0).collect();
    let track = KeyframeTrack::linear(times, values);
    let mut cursor = KeyframeCursor::default();

    let _ = track.sample_with_cursor(15.5, &mut cursor);
    assert_eq!(cursor.last_index, 15);

    let val = track.sample_with_cursor(0.5, &mut cursor).unwrap();
    assert!(approx(val, 1.0));
    assert_eq!(cursor.last_index, 0);
}

#[test]
fn sample_matches_cursor_across_all_times() {
    let track = KeyframeTrack::linear(vec![0.0, 0.3, 1.1, 2.0], vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::Z]);
    let mut cursor = KeyframeCursor::default();

    for step in 0..=25 {
        let t = step as f32 * 0.1;
        let a = track.sample(t).unwrap();
        let b = track.sample_with_cursor(t, &mut cursor).unwrap();
        assert!(a.distance(b) < 1e-5, "t={t}: {a:?} vs {b:?}");
    }
}

#[test]
fn interpolatable_vec3_cubic_hits_endpoints() {
    let a = Vec3::new(1.0, 2.0, 3.0);
    let b = Vec3::new(4.0, 5.0, 6.0);
    assert!(Vec3::interpolate_cubic(a, Vec3::ONE, Vec3::ONE, b, 0.0, 1.0).distance(a) < EPSILON);
    assert!(Vec3::interpolate_cubic(a, Vec3::ONE, Vec3::ONE, b, 1.0, 1.0).distance(b) < EPSILON);
}

// ============================================================================
// AnimationAction
// ============================================================================

fn make_simple_clip(name: &str, duration: f32) -> Arc<AnimationClip> {
    Arc::new(AnimationClip::new(
        name,
        vec![Track::new(
            "node",
            TargetPath::Translation,
            TrackData::Vector3(KeyframeTrack::linear(vec![0.0, duration], vec![Vec3::ZERO, Vec3::X])),
        )],
    ))
}

fn playing(clip: Arc<AnimationClip>) -> AnimationAction {
    let mut action = AnimationAction::new(clip);
    action.play();
    action
}

#[test]
fn action_is_inert_until_played() {
    let mut action = AnimationAction::new(make_simple_clip("idle", 2.0));
    action.update(1.0);
    assert!(!action.is_running());
    assert!(approx(action.time, 0.0));
}

#[test]
fn action_loop_mode_once() {
    let mut action = playing(make_simple_clip("test", 2.0));
    action.loop_mode = LoopMode::Once;

    action.update(3.0);
    assert!(approx(action.time, 2.0), "Once: should clamp to duration, got {}", action.time);
    assert!(action.paused, "Once: should auto-pause at end");
}

#[test]
fn action_loop_mode_loop() {
    let mut action = playing(make_simple_clip("test", 2.0));

    action.update(2.5);
    assert!(approx(action.time, 0.5), "Loop: should wrap to 0.5, got {}", action.time);
    assert!(!action.paused);
}

#[test]
fn action_loop_mode_ping_pong() {
    let mut action = playing(make_simple_clip("test", 2.0));
    action.loop_mode = LoopMode::PingPong;

    action.update(2.5);
    assert!(approx(action.time, 1.5), "PingPong: should bounce to 1.5, got {}", action.time);
}

#[test]
fn action_time_scale() {
    let mut action = playing(make_simple_clip("test", 4.0));
    action.loop_mode = LoopMode::Once;
    action.time_scale = 2.0;

    action.update(1.0);
    assert!(approx(action.time, 2.0), "Expected 2.0, got {}", action.time);
}

#[test]
fn action_pause_keeps_play_head() {
    let mut action = playing(make_simple_clip("test", 4.0));
    action.update(1.25);
    action.paused = true;
    action.update(1.0);
    assert!(approx(action.time, 1.25));
    assert!(action.is_running());
}

#[test]
fn action_stop_rewinds_and_is_idempotent() {
    let mut action = playing(make_simple_clip("test", 4.0));
    action.update(1.0);

    action.stop();
    assert!(!action.is_running());
    assert!(approx(action.time, 0.0));

    action.stop();
    assert!(!action.is_running());
    assert!(approx(action.time, 0.0));
}

#[test]
fn clip_auto_duration() {
    let clip = AnimationClip::new(
        "test",
        vec![
            Track::new(
                "a",
                TargetPath::Translation,
                TrackData::Vector3(KeyframeTrack::linear(vec![0.0, 1.5], vec![Vec3::ZERO, Vec3::X])),
            ),
            Track::new(
                "b",
                TargetPath::Rotation,
                TrackData::Quaternion(KeyframeTrack::linear(
                    vec![0.0, 3.0],
                    vec![Quat::IDENTITY, Quat::from_rotation_y(1.0)],
                )),
            ),
        ],
    );

    assert!(approx(clip.duration, 3.0), "Duration should be max of all tracks, got {}", clip.duration);
    assert!(approx(AnimationClip::new("empty", vec![]).duration, 0.0));
}

// ============================================================================
// Binder & Mixer
// ============================================================================

fn model_scene() -> (Scene, stagehand::scene::NodeHandle, stagehand::scene::NodeHandle) {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("model"));
    let child = scene.add_to_parent(Node::new("node"), root);
    (scene, root, child)
}

#[test]
fn binder_resolves_tracks_by_name_and_skips_missing() {
    let (scene, root, child) = model_scene();
    let clip = AnimationClip::new(
        "walk",
        vec![
            Track::new(
                "missing",
                TargetPath::Translation,
                TrackData::Vector3(KeyframeTrack::linear(vec![0.0, 1.0], vec![Vec3::ZERO, Vec3::Y])),
            ),
            Track::new(
                "node",
                TargetPath::Scale,
                TrackData::Scalar(KeyframeTrack::linear(vec![0.0, 1.0], vec![1.0, 2.0])),
            ),
        ],
    );

    let bindings = Binder::bind(&scene, root, &clip);
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].track_index, 1);
    assert_eq!(bindings[0].node_handle, child);
    assert_eq!(bindings[0].target, TargetPath::Scale);
}

#[test]
fn mixer_writes_sampled_values_into_scene() {
    let (mut scene, root, child) = model_scene();
    let clip = make_simple_clip("slide", 2.0);

    let mut mixer = AnimationMixer::new(root);
    mixer.clip_action(&clip, &scene).play();
    mixer.update(1.0, &mut scene);

    let position = scene.position(child).unwrap();
    assert!(position.distance(Vec3::new(0.5, 0.0, 0.0)) < 1e-5, "got {position:?}");
}

#[test]
fn mixer_reuses_action_per_clip_name() {
    let (scene, root, _) = model_scene();
    let clip = make_simple_clip("slide", 2.0);

    let mut mixer = AnimationMixer::new(root);
    mixer.clip_action(&clip, &scene).time_scale = 3.0;
    let again = mixer.clip_action(&clip, &scene);
    assert!(approx(again.time_scale, 3.0));
    assert_eq!(mixer.actions().len(), 1);
}

#[test]
fn mixer_stop_all_halts_every_action() {
    let (mut scene, root, child) = model_scene();
    let a = make_simple_clip("a", 2.0);
    let b = make_simple_clip("b", 2.0);

    let mut mixer = AnimationMixer::new(root);
    mixer.clip_action(&a, &scene).play();
    mixer.clip_action(&b, &scene).play();
    mixer.stop_all();

    assert!(mixer.actions().iter().all(|action| !action.is_running()));
    mixer.update(1.0, &mut scene);
    assert_eq!(scene.position(child), Some(Vec3::ZERO));
}

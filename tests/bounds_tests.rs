//! Bounding Volume & Framing Tests
//!
//! Tests for:
//! - World-space subtree bounds (nested children, parent transforms, rotation)
//! - Empty subtrees and dead handles
//! - center_on_origin under a transformed parent
//! - frame_bounds / reframe_bounds placement rules

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};

use stagehand::camera::{FramingSettings, frame_bounds, reframe_bounds};
use stagehand::math::{BoundingBox, Bounds, center_on_origin, compute_bounds, compute_box};
use stagehand::scene::{Node, Scene};

const EPSILON: f32 = 1e-4;

fn close(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < EPSILON
}

// ============================================================================
// Subtree Bounds
// ============================================================================

#[test]
fn single_box_at_offset() {
    let mut scene = Scene::new();
    let mut node = Node::with_box("crate", Vec3::new(2.0, 4.0, 6.0));
    node.transform.position = Vec3::new(1.0, 2.0, 3.0);
    let handle = scene.add_node(node);

    let bounds = compute_bounds(&scene, handle).unwrap();
    assert!(close(bounds.size, Vec3::new(2.0, 4.0, 6.0)));
    assert!(close(bounds.center, Vec3::new(1.0, 2.0, 3.0)));
}

#[test]
fn nested_children_are_included_with_parent_transform() {
    let mut scene = Scene::new();
    let mut root = Node::new("group");
    root.transform.position = Vec3::new(10.0, 0.0, 0.0);
    root.transform.scale = Vec3::splat(2.0);
    let root = scene.add_node(root);

    let arm = scene.add_to_parent(Node::new("arm"), root);
    let mut hand = Node::with_box("hand", Vec3::ONE);
    hand.transform.position = Vec3::new(0.0, 3.0, 0.0);
    scene.add_to_parent(hand, arm);
    scene.add_to_parent(Node::with_box("torso", Vec3::ONE), root);

    // Never refreshed cached matrices: bounds must not depend on them
    let bounds = compute_box(&scene, root).unwrap();
    assert!(close(bounds.min, Vec3::new(9.0, -1.0, -1.0)), "min {:?}", bounds.min);
    assert!(close(bounds.max, Vec3::new(11.0, 7.0, 1.0)), "max {:?}", bounds.max);
}

#[test]
fn rotated_box_grows_axis_aligned_extent() {
    let mut scene = Scene::new();
    let mut node = Node::with_box("plank", Vec3::new(4.0, 1.0, 1.0));
    node.transform.rotation = Quat::from_rotation_z(FRAC_PI_2);
    let handle = scene.add_node(node);

    let bounds = compute_bounds(&scene, handle).unwrap();
    assert!(close(bounds.size, Vec3::new(1.0, 4.0, 1.0)), "size {:?}", bounds.size);
}

#[test]
fn subtree_without_geometry_is_a_point_at_world_position() {
    let mut scene = Scene::new();
    let mut parent = Node::new("anchor");
    parent.transform.position = Vec3::new(0.0, 5.0, 0.0);
    let parent = scene.add_node(parent);
    let mut empty = Node::new("empty");
    empty.transform.position = Vec3::X;
    let empty = scene.add_to_parent(empty, parent);

    let bounds = compute_bounds(&scene, empty).unwrap();
    assert_eq!(bounds.size, Vec3::ZERO);
    assert!(close(bounds.center, Vec3::new(1.0, 5.0, 0.0)));
}

#[test]
fn dead_handle_has_no_bounds() {
    let mut scene = Scene::new();
    let handle = scene.add_node(Node::with_box("gone", Vec3::ONE));
    scene.remove_node(handle);
    assert!(compute_bounds(&scene, handle).is_none());
}

#[test]
fn center_on_origin_accounts_for_parent_space() {
    let mut scene = Scene::new();
    let mut parent = Node::new("parent");
    parent.transform.position = Vec3::new(2.0, 0.0, 0.0);
    parent.transform.scale = Vec3::splat(2.0);
    let parent = scene.add_node(parent);

    let mut model = Node::with_box("model", Vec3::ONE);
    model.transform.position = Vec3::new(1.0, 1.0, 0.0);
    let model = scene.add_to_parent(model, parent);

    let offset = center_on_origin(&mut scene, model).unwrap();
    assert!(close(offset, Vec3::new(-4.0, -2.0, 0.0)));
    assert!(close(compute_bounds(&scene, model).unwrap().center, Vec3::ZERO));
}

// ============================================================================
// Framing
// ============================================================================

fn fov() -> f32 {
    75f32.to_radians()
}

#[test]
fn cube_keeps_center_height() {
    let bounds: Bounds = BoundingBox::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::splat(10.0)).into();
    let plan = frame_bounds(&bounds, fov(), &FramingSettings::default());

    let expected = Vec3::splat(10.0).length() / (2.0 * (fov() / 2.0).tan()) * 1.2;
    assert!(!plan.flat);
    assert_eq!(plan.position.y, 2.0);
    assert_eq!(plan.position.x, 1.0);
    assert!((plan.position.z - (3.0 + expected)).abs() < EPSILON);
    assert_eq!(plan.look_at, Vec3::new(1.0, 2.0, 3.0));
}

#[test]
fn flat_object_raises_camera() {
    let size = Vec3::new(10.0, 0.5, 10.0);
    let bounds: Bounds = BoundingBox::from_center_size(Vec3::ZERO, size).into();
    let plan = frame_bounds(&bounds, fov(), &FramingSettings::default());

    assert!(plan.flat);
    assert!((plan.position.y - plan.distance * 0.5).abs() < EPSILON);
    assert!((plan.position.z - plan.distance).abs() < EPSILON);
}

#[test]
fn flatness_threshold_is_configurable() {
    let bounds: Bounds = BoundingBox::from_center_size(Vec3::ZERO, Vec3::new(10.0, 2.0, 10.0)).into();
    let strict = frame_bounds(&bounds, fov(), &FramingSettings::default());
    let loose = frame_bounds(
        &bounds,
        fov(),
        &FramingSettings {
            flatness_threshold: 0.5,
            ..FramingSettings::default()
        },
    );
    assert!(!strict.flat);
    assert!(loose.flat);
}

#[test]
fn zero_size_bounds_frame_finitely() {
    let bounds: Bounds = BoundingBox::point(Vec3::new(0.0, 1.0, 0.0)).into();
    let plan = frame_bounds(&bounds, fov(), &FramingSettings::default());
    assert!(plan.position.is_finite());
    assert!(plan.distance > 0.0);
    assert!(plan.position.z > 0.0);
}

#[test]
fn reframe_uses_largest_axis_and_elevated_offset() {
    let bounds: Bounds = BoundingBox::from_center_size(Vec3::new(0.0, 1.0, 0.0), Vec3::new(2.0, 8.0, 4.0)).into();
    let plan = reframe_bounds(&bounds, &FramingSettings::default());

    let d = 8.0 * 1.2;
    assert!((plan.distance - d).abs() < EPSILON);
    assert!(close(plan.position, Vec3::new(0.0, 1.0 + d, d)));
    assert!(close(plan.look_at, Vec3::new(0.0, 1.0, 0.0)));
}

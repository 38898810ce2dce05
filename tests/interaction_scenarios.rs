//! End-to-end interaction scenarios driven through the public API with
//! scripted pointers and the null renderer.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Quaternion, Rad, Rotation3, Vector3};
use grabscene::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const EPS: f32 = 1e-4;

fn eye_pose() -> Transform {
    Transform::from_position(Vector3::new(0.0, 1.6, 3.0))
}

/// Pose at `position` looking along +Z (forward axis turned around)
fn facing_back(position: Vector3<f32>) -> Transform {
    Transform::from_position_rotation(position, Quaternion::from_angle_y(Rad(PI)))
}

fn box_at(pool: &mut ShapePool, position: Vector3<f32>) -> ObjectId {
    pool.insert(
        ShapeKind::Box,
        Transform::from_position(position),
        Material::default(),
    )
}

fn highlight_of(driver: &FrameDriver, id: ObjectId) -> f32 {
    driver
        .pool()
        .get(id)
        .unwrap()
        .material
        .indicator(Indicator::Highlight)
}

fn held_of(driver: &FrameDriver, id: ObjectId) -> f32 {
    driver
        .pool()
        .get(id)
        .unwrap()
        .material
        .indicator(Indicator::Held)
}

fn assert_ownership_invariant(driver: &FrameDriver) {
    let counts = driver.pool().owner_counts();
    assert_eq!(counts.total(), driver.pool().len());

    for device in DeviceId::ALL {
        let state = driver.device(device);
        let held: Vec<ObjectId> = driver.pool().held_by(device).map(|o| o.id).collect();
        assert_eq!(held, state.held().into_iter().collect::<Vec<_>>());
    }
}

struct Session {
    driver: FrameDriver,
    pointers: ScriptedPointers,
    renderer: NullRenderer,
}

impl Session {
    fn new(pool: ShapePool) -> Self {
        Self {
            driver: FrameDriver::new(pool, 5.0),
            pointers: ScriptedPointers::new(),
            renderer: NullRenderer::default(),
        }
    }

    fn tick(&mut self) -> FrameStats {
        self.driver
            .tick(&mut self.pointers, &mut self.renderer)
            .unwrap()
    }
}

#[test]
fn box_in_front_of_device_is_highlighted_at_expected_distance() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    let stats = session.tick();

    assert_eq!(stats.highlighted, 1);
    assert_eq!(highlight_of(&session.driver, target), 1.0);
    let length = session.driver.device(DeviceId::Left).ray_length;
    assert!((length - 1.9).abs() < EPS, "ray length {length}");
}

#[test]
fn only_the_object_under_the_ray_is_highlighted() {
    let mut pool = ShapePool::new();
    let ids: Vec<ObjectId> = (0..5)
        .map(|i| box_at(&mut pool, Vector3::new(i as f32 * 0.5 - 1.0, 1.6, 1.0)))
        .collect();
    let mut session = Session::new(pool);

    // Straight ahead of x = 0.0, which is the third box
    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session.tick();

    for (i, id) in ids.iter().enumerate() {
        let expected = if i == 2 { 1.0 } else { 0.0 };
        assert_eq!(highlight_of(&session.driver, *id), expected, "box {i}");
    }
}

#[test]
fn highlights_clear_when_the_ray_moves_away() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session.tick();
    assert_eq!(highlight_of(&session.driver, target), 1.0);

    session.pointers.set_pose(
        DeviceId::Left,
        Some(Transform::from_position(Vector3::new(1.5, 1.6, 3.0))),
    );
    let stats = session.tick();
    assert_eq!(stats.highlighted, 0);
    assert_eq!(highlight_of(&session.driver, target), 0.0);
    assert_eq!(session.driver.device(DeviceId::Left).ray_length, 5.0);
}

#[test]
fn both_devices_on_one_object_highlight_it_once() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session
        .pointers
        .set_pose(DeviceId::Right, Some(facing_back(Vector3::new(0.0, 1.6, -1.0))));
    let stats = session.tick();

    assert_eq!(stats.highlighted, 1);
    assert_eq!(session.driver.highlights().iter().collect::<Vec<_>>(), vec![target]);
    assert!((session.driver.device(DeviceId::Right).ray_length - 1.9).abs() < EPS);
}

#[test]
fn grabbed_object_is_excluded_from_the_other_device() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session
        .pointers
        .set_pose(DeviceId::Right, Some(facing_back(Vector3::new(0.0, 1.6, -1.0))));
    session.tick();

    session.pointers.press(DeviceId::Left);
    let stats = session.tick();

    let object = session.driver.pool().get(target).unwrap();
    assert_eq!(object.owner, Owner::Device(DeviceId::Left));
    assert_eq!(held_of(&session.driver, target), 1.0);
    assert_eq!(stats.held, 1);

    // Device 1 still points straight through the box's position
    assert_eq!(stats.highlighted, 0);
    assert_eq!(highlight_of(&session.driver, target), 0.0);
    assert_eq!(session.driver.device(DeviceId::Right).ray_length, 5.0);
    assert!(session.driver.pool().pool_candidates().next().is_none());

    // Pressing device 1 now finds nothing
    session.pointers.press(DeviceId::Right);
    session.tick();
    assert!(session.driver.device(DeviceId::Right).is_idle());
    assert_ownership_invariant(&session.driver);
}

#[test]
fn release_returns_object_to_the_pool() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session.pointers.press(DeviceId::Left);
    session.tick();
    assert_eq!(session.driver.device(DeviceId::Left).held(), Some(target));

    session.pointers.release(DeviceId::Left);
    let stats = session.tick();

    let object = session.driver.pool().get(target).unwrap();
    assert!(object.in_pool());
    assert_eq!(held_of(&session.driver, target), 0.0);
    assert_eq!(stats.held, 0);

    // Back among the candidates, so it is highlighted again in the same frame
    assert_eq!(highlight_of(&session.driver, target), 1.0);
    assert_eq!(session.driver.pool().pool_candidates().count(), 1);
}

#[test]
fn grab_and_drop_do_not_move_the_object() {
    let mut pool = ShapePool::new();
    let target = pool.insert(
        ShapeKind::Cylinder,
        Transform::new(
            Vector3::new(0.0, 1.6, 1.0),
            Transform::rotation_from_euler_xyz(0.3, 1.2, -0.4),
            1.3,
        ),
        Material::default(),
    );
    let mut session = Session::new(pool);

    let tilted = Transform::from_position_rotation(
        Vector3::new(0.05, 1.62, 3.0),
        Quaternion::from_angle_z(Rad(0.6)),
    );
    session.pointers.set_pose(DeviceId::Left, Some(tilted));
    session.tick();
    let before = session
        .driver
        .pool()
        .world_transform(target, &session.driver.device_poses())
        .unwrap();

    session.pointers.press(DeviceId::Left);
    session.tick();
    assert_eq!(session.driver.device(DeviceId::Left).held(), Some(target));
    let held = session.driver.view().objects[0].world;
    assert!((held.position - before.position).magnitude() < EPS);
    assert!(held.rotation.dot(before.rotation).abs() > 1.0 - EPS);
    assert!((held.scale - before.scale).abs() < EPS);

    // Move the device while holding: the object follows by the same offset
    let mut moved = tilted;
    moved.position += Vector3::new(0.2, 0.1, -0.3);
    session.pointers.set_pose(DeviceId::Left, Some(moved));
    session.tick();
    let carried = session.driver.view().objects[0].world;
    assert!((carried.position - (before.position + Vector3::new(0.2, 0.1, -0.3))).magnitude() < EPS);

    session.pointers.release(DeviceId::Left);
    session.tick();
    let dropped = session.driver.pool().get(target).unwrap().local;
    assert!((dropped.position - carried.position).magnitude() < EPS);
    assert!(dropped.rotation.dot(carried.rotation).abs() > 1.0 - EPS);
    assert_eq!(session.driver.pool().get(target).unwrap().owner, Owner::Pool);
}

#[test]
fn release_while_idle_and_double_press_are_ignored() {
    let mut pool = ShapePool::new();
    let first = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    box_at(&mut pool, Vector3::new(0.0, 1.6, 0.0));
    let mut session = Session::new(pool);
    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));

    assert_eq!(
        session.driver.handle_event(PointerEvent::release(DeviceId::Left)).unwrap(),
        EventOutcome::Ignored
    );

    session.tick();
    session.pointers.press(DeviceId::Left);
    session.pointers.press(DeviceId::Left);
    let stats = session.tick();

    assert_eq!(session.driver.device(DeviceId::Left).held(), Some(first));
    assert_eq!(stats.held, 1);
    assert_ownership_invariant(&session.driver);
}

#[test]
fn invalid_pose_skips_casting_and_keeps_state() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session.tick();

    let mut broken = eye_pose();
    broken.rotation.s = f32::NAN;
    session.pointers.set_pose(DeviceId::Left, Some(broken));
    session.pointers.press(DeviceId::Left);
    let stats = session.tick();

    let device = session.driver.device(DeviceId::Left);
    assert!(!device.tracked);
    assert!(device.is_idle());
    assert_eq!(device.pose, eye_pose());
    assert_eq!(stats.highlighted, 0);
    assert_eq!(highlight_of(&session.driver, target), 0.0);
}

#[test]
fn zero_rotation_pose_never_corrupts_a_held_object() {
    let mut pool = ShapePool::new();
    let target = box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session.pointers.press(DeviceId::Left);
    session.tick();
    assert_eq!(session.driver.device(DeviceId::Left).held(), Some(target));

    let mut degenerate = eye_pose();
    degenerate.rotation = Quaternion::new(0.0, 0.0, 0.0, 0.0);
    session.pointers.set_pose(DeviceId::Left, Some(degenerate));
    session.tick();
    assert!(!session.driver.device(DeviceId::Left).tracked);
    assert!(session.driver.view().objects[0].world.is_finite());

    session.pointers.release(DeviceId::Left);
    session.tick();
    let object = session.driver.pool().get(target).unwrap();
    assert!(object.in_pool());
    assert!(object.local.is_finite());
    assert!((object.local.position - Vector3::new(0.0, 1.6, 1.0)).magnitude() < EPS);

    // Tracking resumes and the dropped box is pickable again
    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    let stats = session.tick();
    assert_eq!(stats.highlighted, 1);
    assert_eq!(highlight_of(&session.driver, target), 1.0);
}

#[test]
fn ray_length_is_frozen_while_holding() {
    let mut pool = ShapePool::new();
    box_at(&mut pool, Vector3::new(0.0, 1.6, 1.0));
    let mut session = Session::new(pool);

    session.pointers.set_pose(DeviceId::Left, Some(eye_pose()));
    session.pointers.press(DeviceId::Left);
    session.tick();

    session.pointers.set_pose(
        DeviceId::Left,
        Some(Transform::from_position(Vector3::new(1.0, 1.0, 2.0))),
    );
    session.tick();
    assert!((session.driver.device(DeviceId::Left).ray_length - 1.9).abs() < EPS);
}

#[test]
fn ownership_invariant_holds_under_random_events() {
    let config = SessionConfig::default().with_seed(2024).with_shape_count(40);
    let mut driver = FrameDriver::from_config(&config).unwrap();
    let mut pointers = ScriptedPointers::new();
    let mut renderer = NullRenderer::default();
    let mut rng = StdRng::seed_from_u64(99);
    let total = driver.pool().len();

    for _ in 0..300 {
        for device in DeviceId::ALL {
            let pose = if rng.random_bool(0.1) {
                None
            } else {
                let position = Vector3::new(
                    rng.random_range(-1.0..1.0),
                    rng.random_range(0.5..2.0),
                    3.0,
                );
                let rotation = Quaternion::from_angle_y(Rad(rng.random_range(-0.6..0.6)))
                    * Quaternion::from_angle_x(Rad(rng.random_range(-0.4..0.4)));
                Some(Transform::from_position_rotation(position, rotation))
            };
            pointers.set_pose(device, pose);

            if rng.random_bool(0.2) {
                pointers.press(device);
            }
            if rng.random_bool(0.2) {
                pointers.release(device);
            }
        }

        let stats = driver.tick(&mut pointers, &mut renderer).unwrap();
        assert!(stats.highlighted <= 2);
        assert!(stats.held <= 2);
        assert_eq!(driver.pool().len(), total);
        assert_ownership_invariant(&driver);
    }
    assert_eq!(renderer.frames, 300);
}

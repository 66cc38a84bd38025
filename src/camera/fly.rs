//! Free-flying first-person camera

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Mat4, Vec3};
use tracing::{trace, warn};

use super::{Camera, InputScope};
use crate::config::CameraConfig;
use crate::time::FrameClock;
use crate::window::{Action, Key, MouseButton, Window, WindowState};

const PITCH_LIMIT: f32 = 89.0;
const MIN_FOV: f32 = 1.0;
const MAX_FOV: f32 = 45.0;

/// First-person camera steered by mouse-look and WASD translation
///
/// Orientation is stored as yaw/pitch in degrees; `front`, `right` and `up`
/// are always re-derived from them and the world up axis.
pub struct FlyCamera {
    window: Rc<RefCell<WindowState>>,
    position: Vec3,
    front: Vec3,
    right: Vec3,
    up: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32,
    near: f32,
    far: f32,
    movement_speed: f32,
    mouse_sensitivity: f32,
    first_mouse: bool,
    last_cursor: (f64, f64),
    keys: HashMap<Key, Action>,
}

impl FlyCamera {
    /// Creates a camera at `position` with default tuning
    pub fn new(window: &Window, position: Vec3) -> Self {
        Self::with_config(window, position, &CameraConfig::default())
    }

    /// Creates a camera at `position` with the given tuning
    ///
    /// The camera stays bound to `window` for its whole lifetime.
    pub fn with_config(window: &Window, position: Vec3, config: &CameraConfig) -> Self {
        let mut camera = Self {
            window: window.state_handle(),
            position,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            world_up: Vec3::Y,
            yaw: config.yaw,
            pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
            fov: config.fov,
            near: config.near,
            far: config.far,
            movement_speed: config.movement_speed,
            mouse_sensitivity: config.mouse_sensitivity,
            first_mouse: true,
            last_cursor: (0.0, 0.0),
            keys: HashMap::new(),
        };
        camera.update_vectors();
        camera
    }

    /// Wraps the camera for sharing with a window's arbiter
    pub fn shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.derive_right_up();
    }

    fn derive_right_up(&mut self) {
        self.right = self.front.cross(self.world_up).normalize();
        self.up = self.right.cross(self.front).normalize();
    }

    /// Points the camera along `front`
    ///
    /// Right and up are re-derived and yaw/pitch are re-synced so later
    /// mouse-look continues from this direction. Zero-length input is ignored.
    pub fn set_front(&mut self, front: Vec3) {
        let Some(front) = front.try_normalize() else {
            warn!(caller = "FlyCamera::set_front", "ignoring zero-length front vector");
            return;
        };
        self.front = front;
        self.yaw = front.z.atan2(front.x).to_degrees();
        self.pitch = front
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.derive_right_up();
    }

    /// Moves the camera to `position`
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn set_movement_speed(&mut self, speed: f32) {
        self.movement_speed = speed;
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    pub fn set_mouse_sensitivity(&mut self, sensitivity: f32) {
        self.mouse_sensitivity = sensitivity;
    }

    /// Tracked state of `key`, if it is pressed or awaiting its release
    pub fn key_state(&self, key: Key) -> Option<Action> {
        self.keys.get(&key).copied()
    }

    /// Whether `key` is currently held
    pub fn is_key_down(&self, key: Key) -> bool {
        self.key_state(key).is_some_and(Action::is_down)
    }

    /// Number of keys currently tracked
    pub fn tracked_keys(&self) -> usize {
        self.keys.len()
    }

    /// Treats the next cursor position as a reference point
    pub fn reset_first_movement(&mut self) {
        self.first_mouse = true;
    }

    /// Advances by the time elapsed on `clock` since its previous tick
    pub fn update_from_clock(&mut self, clock: &mut FrameClock) {
        let dt = clock.tick();
        self.update(dt);
    }

    fn direction_for(&self, key: Key) -> Option<Vec3> {
        match key {
            Key::W => Some(self.front),
            Key::S => Some(-self.front),
            Key::A => Some(-self.right),
            Key::D => Some(self.right),
            Key::Space => Some(self.world_up),
            Key::LeftShift => Some(-self.world_up),
            _ => None,
        }
    }
}

impl Camera for FlyCamera {
    fn name(&self) -> &str {
        "fly"
    }

    fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    fn projection_matrix(&self) -> Mat4 {
        let Ok(window) = self.window.try_borrow() else {
            warn!(caller = "FlyCamera::projection_matrix", "window state busy, using identity");
            return Mat4::IDENTITY;
        };
        match window.aspect_ratio() {
            Some(aspect) => {
                Mat4::perspective_rh_gl(self.fov.to_radians(), aspect, self.near, self.far)
            }
            None => Mat4::IDENTITY,
        }
    }

    fn handle_key(&mut self, key: Key, action: Action) {
        self.keys.insert(key, action);
    }

    fn handle_mouse_move(&mut self, x: f64, y: f64) {
        if self.first_mouse {
            self.last_cursor = (x, y);
            self.first_mouse = false;
            return;
        }

        // Screen y grows downward; looking up should raise pitch.
        let x_offset = (x - self.last_cursor.0) as f32 * self.mouse_sensitivity;
        let y_offset = (self.last_cursor.1 - y) as f32 * self.mouse_sensitivity;
        self.last_cursor = (x, y);

        self.yaw += x_offset;
        self.pitch = (self.pitch + y_offset).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Adds the vertical offset to the field of view
    ///
    /// winit reports wheel-towards-the-user as negative, so that direction
    /// zooms in and wheel-away zooms out. The result is clamped to 1..=45
    /// degrees on every event.
    fn handle_scroll(&mut self, _x: f64, y: f64) {
        self.fov = (self.fov + y as f32).clamp(MIN_FOV, MAX_FOV);
    }

    fn handle_button(&mut self, button: MouseButton, action: Action) {
        trace!(caller = "FlyCamera::handle_button", ?button, ?action, "ignored");
    }

    fn update(&mut self, dt: f32) {
        let step = self.movement_speed * dt;
        let mut displacement = Vec3::ZERO;
        for (&key, &action) in &self.keys {
            if action.is_down()
                && let Some(direction) = self.direction_for(key)
            {
                displacement += direction * step;
            }
        }
        self.position += displacement;

        self.keys.retain(|_, action| action.is_down());
    }

    fn acquire_input(&mut self, scope: InputScope) {
        if scope.includes_mouse() {
            self.first_mouse = true;
        }
        if scope.includes_keyboard() {
            self.keys.clear();
        }
    }

    fn release_input(&mut self, scope: InputScope) {
        if scope.includes_keyboard() {
            self.keys.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn camera() -> (Window, FlyCamera) {
        let window = Window::new("test", 800, 600);
        let camera = FlyCamera::new(&window, Vec3::ZERO);
        (window, camera)
    }

    fn assert_orthonormal(camera: &FlyCamera) {
        assert!((camera.front().length() - 1.0).abs() < EPSILON);
        assert!((camera.right().length() - 1.0).abs() < EPSILON);
        assert!((camera.up().length() - 1.0).abs() < EPSILON);
        assert!(camera.front().dot(camera.right()).abs() < EPSILON);
        assert!(camera.front().dot(camera.up()).abs() < EPSILON);
        assert!(camera.right().dot(camera.up()).abs() < EPSILON);
    }

    #[test]
    fn test_default_orientation() {
        let (_window, camera) = camera();
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);
        assert_eq!(camera.fov(), 70.0);
        assert!((camera.front() - Vec3::NEG_Z).length() < EPSILON);
        assert!((camera.up() - Vec3::Y).length() < EPSILON);
        assert_orthonormal(&camera);
    }

    #[test]
    fn test_basis_orthonormal_across_angles() {
        let (_window, mut camera) = camera();
        camera.reset_first_movement();
        camera.handle_mouse_move(0.0, 0.0);
        for step in 0..200 {
            let x = step as f64 * 37.0;
            let y = (step % 17) as f64 * 53.0 - 400.0;
            camera.handle_mouse_move(x, y);
            assert!(camera.pitch() >= -PITCH_LIMIT && camera.pitch() <= PITCH_LIMIT);
            assert_orthonormal(&camera);
        }
    }

    #[test]
    fn test_first_movement_is_reference_only() {
        let (_window, mut camera) = camera();
        camera.handle_mouse_move(500.0, 300.0);
        assert_eq!(camera.yaw(), -90.0);
        assert_eq!(camera.pitch(), 0.0);

        camera.handle_mouse_move(510.0, 290.0);
        assert!((camera.yaw() - -89.0).abs() < EPSILON);
        assert!((camera.pitch() - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_pitch_clamps_at_bounds() {
        let (_window, mut camera) = camera();
        camera.handle_mouse_move(0.0, 0.0);
        camera.handle_mouse_move(0.0, -1.0e6);
        assert_eq!(camera.pitch(), 89.0);

        camera.handle_mouse_move(0.0, 1.0e6);
        assert_eq!(camera.pitch(), -89.0);
    }

    #[test]
    fn test_yaw_is_not_clamped() {
        let (_window, mut camera) = camera();
        camera.handle_mouse_move(0.0, 0.0);
        camera.handle_mouse_move(10_000.0, 0.0);
        assert!((camera.yaw() - 910.0).abs() < 1e-2);
        assert_orthonormal(&camera);
    }

    #[test]
    fn test_scroll_clamps_on_every_event() {
        let (_window, mut camera) = camera();
        camera.handle_scroll(0.0, -1.0);
        assert_eq!(camera.fov(), 45.0);
        camera.handle_scroll(0.0, -1.0);
        assert_eq!(camera.fov(), 44.0);
        camera.handle_scroll(0.0, 3.0);
        assert_eq!(camera.fov(), 45.0);
    }

    #[test]
    fn test_fov_clamps() {
        let (_window, mut camera) = camera();
        for _ in 0..100 {
            camera.handle_scroll(0.0, -1.0);
        }
        assert_eq!(camera.fov(), 1.0);

        for _ in 0..100 {
            camera.handle_scroll(0.0, 1.0);
        }
        assert_eq!(camera.fov(), 45.0);
    }

    #[test]
    fn test_released_key_pruned_after_one_update() {
        let (_window, mut camera) = camera();
        camera.handle_key(Key::W, Action::Press);
        camera.update(0.1);
        assert_eq!(camera.key_state(Key::W), Some(Action::Press));

        camera.handle_key(Key::W, Action::Release);
        let before = camera.position();
        camera.update(0.1);
        assert_eq!(camera.position(), before);
        assert_eq!(camera.key_state(Key::W), None);
        assert_eq!(camera.tracked_keys(), 0);
    }

    #[test]
    fn test_update_from_clock_moves_by_elapsed_time() {
        let (_window, mut camera) = camera();
        let mut clock = FrameClock::new();
        camera.handle_key(Key::W, Action::Press);

        let start = std::time::Instant::now();
        camera.update_from_clock(&mut clock);
        assert_eq!(camera.position(), Vec3::ZERO);

        std::thread::sleep(std::time::Duration::from_millis(20));
        camera.update_from_clock(&mut clock);
        let upper = start.elapsed().as_secs_f32();

        let travelled = -camera.position().z;
        assert!(travelled >= camera.movement_speed() * 0.02 - EPSILON);
        assert!(travelled <= camera.movement_speed() * upper + EPSILON);
    }

    #[test]
    fn test_strafe_and_vertical_keys() {
        let (_window, mut camera) = camera();
        camera.handle_key(Key::D, Action::Repeat);
        camera.update(1.0);
        assert!((camera.position() - Vec3::new(2.5, 0.0, 0.0)).length() < EPSILON);

        camera.handle_key(Key::D, Action::Release);
        camera.handle_key(Key::Space, Action::Press);
        camera.update(1.0);
        assert!((camera.position() - Vec3::new(2.5, 2.5, 0.0)).length() < EPSILON);
    }

    #[test]
    fn test_acquire_clears_ghost_keys() {
        let (_window, mut camera) = camera();
        camera.handle_key(Key::W, Action::Press);
        camera.acquire_input(InputScope::All);
        assert_eq!(camera.tracked_keys(), 0);

        camera.handle_key(Key::S, Action::Press);
        camera.acquire_input(InputScope::Mouse);
        assert!(camera.is_key_down(Key::S));
    }

    #[test]
    fn test_set_front_rederives_basis() {
        let (_window, mut camera) = camera();
        camera.set_front(Vec3::new(1.0, 0.0, 0.0));
        assert!((camera.front() - Vec3::X).length() < EPSILON);
        assert!((camera.right() - Vec3::Z).length() < EPSILON);
        assert!(camera.yaw().abs() < EPSILON);
        assert_orthonormal(&camera);

        camera.set_front(Vec3::ZERO);
        assert!((camera.front() - Vec3::X).length() < EPSILON);
    }

    #[test]
    fn test_projection_uses_window_aspect() {
        let (_window, camera) = camera();
        let projection = camera.projection_matrix();
        let expected = Mat4::perspective_rh_gl(70f32.to_radians(), 800.0 / 600.0, 0.1, 100.0);
        assert!(projection.abs_diff_eq(expected, 1e-6));
        assert!(projection.is_finite());
    }

    #[test]
    fn test_view_looks_along_front() {
        let (_window, camera) = camera();
        let view = camera.view_matrix();
        let ahead = view.transform_point3(Vec3::new(0.0, 0.0, -5.0));
        assert!((ahead - Vec3::new(0.0, 0.0, -5.0)).length() < EPSILON);
    }
}

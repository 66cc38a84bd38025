//! Integration tests for camera input routed through a window

use coil::camera::{Camera, FlyCamera};
use coil::window::{Action, CursorMode, Key, NativeEvent, Window};
use glam::{Mat4, Vec3};

const EPSILON: f32 = 1e-5;

fn scroll(window: &Window, y: f64) {
    window.deliver(NativeEvent::Scroll { x: 0.0, y });
}

#[test]
fn test_scroll_zoom_scenario() {
    let window = Window::new("zoom", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();
    window.arbiter().take_over_all(camera.clone());

    assert_eq!(camera.borrow().fov(), 70.0);

    scroll(&window, -50.0);
    assert!((camera.borrow().fov() - 20.0).abs() < EPSILON);

    scroll(&window, -30.0);
    assert_eq!(camera.borrow().fov(), 1.0);

    for _ in 0..10 {
        scroll(&window, 25.0);
    }
    assert_eq!(camera.borrow().fov(), 45.0);
}

#[test]
fn test_held_key_moves_forward_scenario() {
    let window = Window::new("walk", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();
    window.arbiter().take_over_all(camera.clone());

    let front = camera.borrow().front();
    assert!((front - Vec3::new(0.0, 0.0, -1.0)).length() < EPSILON);

    window.deliver(NativeEvent::key(Key::W, Action::Press));
    for _ in 0..3 {
        camera.borrow_mut().update(0.1);
    }

    let position = camera.borrow().position();
    assert!((position - Vec3::new(0.0, 0.0, -0.75)).length() < EPSILON);
    assert!(camera.borrow().is_key_down(Key::W));

    window.deliver(NativeEvent::key(Key::W, Action::Release));
    camera.borrow_mut().update(0.1);
    assert_eq!(camera.borrow().key_state(Key::W), None);
    assert!((camera.borrow().position() - position).length() < EPSILON);
}

#[test]
fn test_second_take_over_wins_all_input() {
    let window = Window::new("exclusive", 800, 600);
    let first = FlyCamera::new(&window, Vec3::ZERO).shared();
    let second = FlyCamera::new(&window, Vec3::ZERO).shared();
    let arbiter = window.arbiter();

    arbiter.take_over_all(first.clone());
    arbiter.take_over_all(second.clone());

    window.deliver(NativeEvent::key(Key::W, Action::Press));
    scroll(&window, -30.0);

    assert!(second.borrow().is_key_down(Key::W));
    assert_eq!(second.borrow().fov(), 40.0);
    assert!(!first.borrow().is_key_down(Key::W));
    assert_eq!(first.borrow().fov(), 70.0);
}

#[test]
fn test_focus_gain_suppresses_first_mouse_move() {
    let window = Window::new("look", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();
    window.designate_camera(camera.clone());
    assert_eq!(window.cursor_mode(), CursorMode::Normal);

    window.deliver(NativeEvent::Focus(true));
    assert_eq!(window.cursor_mode(), CursorMode::Disabled);

    window.deliver(NativeEvent::CursorPosition { x: 500.0, y: 300.0 });
    assert_eq!(camera.borrow().yaw(), -90.0);
    assert_eq!(camera.borrow().pitch(), 0.0);

    window.deliver(NativeEvent::CursorPosition { x: 510.0, y: 290.0 });
    assert!((camera.borrow().yaw() - -89.0).abs() < EPSILON);
    assert!((camera.borrow().pitch() - 1.0).abs() < EPSILON);

    // Leaving and returning starts a new reference point
    window.deliver(NativeEvent::Focus(false));
    assert_eq!(window.cursor_mode(), CursorMode::Normal);
    window.deliver(NativeEvent::Focus(true));
    window.deliver(NativeEvent::CursorPosition { x: 0.0, y: 0.0 });
    assert!((camera.borrow().yaw() - -89.0).abs() < EPSILON);
}

#[test]
fn test_pitch_never_exceeds_bounds() {
    let window = Window::new("pitch", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();
    window.arbiter().take_over_mouse(camera.clone());

    window.deliver(NativeEvent::CursorPosition { x: 0.0, y: 0.0 });
    window.deliver(NativeEvent::CursorPosition { x: 0.0, y: -100_000.0 });
    assert_eq!(camera.borrow().pitch(), 89.0);

    window.deliver(NativeEvent::CursorPosition { x: 0.0, y: 100_000.0 });
    assert_eq!(camera.borrow().pitch(), -89.0);
}

#[test]
fn test_projection_degrades_to_identity() {
    let window = Window::new("projection", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO);

    let projection = camera.projection_matrix();
    assert_ne!(projection, Mat4::IDENTITY);
    assert!(projection.is_finite());

    window.deliver(NativeEvent::Size {
        width: 0,
        height: 600,
    });
    assert_eq!(camera.projection_matrix(), Mat4::IDENTITY);

    window.deliver(NativeEvent::Size {
        width: 800,
        height: -1,
    });
    assert_eq!(camera.projection_matrix(), Mat4::IDENTITY);
}

//! Integration tests for window event fan-out and callback chaining

use std::cell::RefCell;
use std::rc::Rc;

use coil::camera::{Camera, FlyCamera};
use coil::window::{
    Action, CursorMode, EventKind, HostWindow, Key, NativeCallback, NativeEvent, Window,
};
use glam::{Mat4, Vec3};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn recording_callback(log: &Log, tag: &'static str) -> NativeCallback {
    let log = log.clone();
    Rc::new(move |_: &HostWindow, _: &NativeEvent| log.borrow_mut().push(tag))
}

#[test]
fn test_previous_callback_runs_before_subscribers() {
    let host = HostWindow::open("chained", 800, 600).unwrap();
    let log: Log = Rc::default();
    host.set_callback(EventKind::Size, Some(recording_callback(&log, "previous")));

    let window = Window::from_host(host);
    let first = log.clone();
    window.on_size(move |_| first.borrow_mut().push("first"));
    let second = log.clone();
    window.on_size(move |_| second.borrow_mut().push("second"));

    window.deliver(NativeEvent::Size {
        width: 640,
        height: 480,
    });
    assert_eq!(*log.borrow(), vec!["previous", "first", "second"]);

    log.borrow_mut().clear();
    window.set_chaining(false);
    window.deliver(NativeEvent::Size {
        width: 320,
        height: 240,
    });
    assert_eq!(*log.borrow(), vec!["first", "second"]);
}

#[test]
fn test_resize_subscriber_sees_new_projection() {
    let window = Window::new("resize", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();

    let projections: Rc<RefCell<Vec<Mat4>>> = Rc::default();
    let seen = projections.clone();
    let in_handler = camera.clone();
    window.on_size(move |_| seen.borrow_mut().push(in_handler.borrow().projection_matrix()));

    window.deliver(NativeEvent::Size {
        width: 1024,
        height: 768,
    });

    let expected = camera.borrow().projection_matrix();
    assert_ne!(expected, Mat4::IDENTITY);
    assert_eq!(*projections.borrow(), vec![expected]);
}

#[test]
fn test_unsubscribed_handler_stops_receiving() {
    let window = Window::new("unsubscribe", 800, 600);
    let log: Log = Rc::default();
    let kept = log.clone();
    window.on_close(move |_| kept.borrow_mut().push("kept"));
    let removed = log.clone();
    let token = window.on_close(move |_| removed.borrow_mut().push("removed"));

    assert!(window.unsubscribe(token));
    assert!(!window.unsubscribe(token));
    window.deliver(NativeEvent::Close);

    assert_eq!(*log.borrow(), vec!["kept"]);
    assert!(window.should_close());
}

#[test]
fn test_focus_cycle_hands_input_back_to_window() {
    let window = Window::new("focus", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();
    window.designate_camera(camera.clone());

    let keys: Rc<RefCell<Vec<Key>>> = Rc::default();
    let seen = keys.clone();
    window.on_key(move |state| {
        if let Some((key, _)) = state.last_key {
            seen.borrow_mut().push(key);
        }
    });

    window.deliver(NativeEvent::key(Key::A, Action::Press));
    assert_eq!(*keys.borrow(), vec![Key::A]);

    window.deliver(NativeEvent::Focus(true));
    assert!(window.arbiter().holds_keyboard());
    assert_eq!(window.cursor_mode(), CursorMode::Disabled);

    window.deliver(NativeEvent::key(Key::D, Action::Press));
    assert_eq!(*keys.borrow(), vec![Key::A]);
    assert!(camera.borrow().is_key_down(Key::D));

    window.deliver(NativeEvent::Focus(false));
    assert!(window.arbiter().active().is_none());
    assert_eq!(window.cursor_mode(), CursorMode::Normal);
    assert_eq!(camera.borrow().tracked_keys(), 0);

    window.deliver(NativeEvent::key(Key::S, Action::Press));
    assert_eq!(*keys.borrow(), vec![Key::A, Key::S]);
    assert!(!camera.borrow().is_key_down(Key::S));
}

#[test]
fn test_focus_subscribers_run_alongside_capture() {
    let window = Window::new("focus-subscriber", 800, 600);
    let camera = FlyCamera::new(&window, Vec3::ZERO).shared();
    window.designate_camera(camera);

    let focus: Rc<RefCell<Vec<bool>>> = Rc::default();
    let seen = focus.clone();
    window.on_focus(move |state| seen.borrow_mut().push(state.focused));

    window.deliver(NativeEvent::Focus(true));
    window.deliver(NativeEvent::Focus(false));

    assert_eq!(*focus.borrow(), vec![true, false]);
    assert!(!window.is_focused());
}

#[test]
fn test_uninstall_leaves_foreign_callbacks() {
    let host = HostWindow::open("uninstall", 800, 600).unwrap();
    let mut window = Window::from_host(host.clone());

    let log: Log = Rc::default();
    host.set_callback(EventKind::Refresh, Some(recording_callback(&log, "foreign")));
    window.uninstall();

    assert!(host.callback(EventKind::Refresh).is_some());
    assert!(host.callback(EventKind::Size).is_none());
    host.deliver(NativeEvent::Refresh);
    assert_eq!(*log.borrow(), vec!["foreign"]);
}

#[test]
fn test_two_windows_dispatch_independently() {
    let left = Window::new("left", 800, 600);
    let right = Window::new("right", 1024, 768);

    left.deliver(NativeEvent::Size {
        width: 100,
        height: 100,
    });

    assert_eq!(left.width(), 100);
    assert_eq!(right.width(), 1024);
    assert_ne!(left.id(), right.id());
}

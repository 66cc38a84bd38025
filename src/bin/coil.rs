use anyhow::Result;
use glam::Vec3;
use tracing::info;
use winit::event_loop::{ControlFlow, EventLoop};

use coil::app::{App, Scene};
use coil::camera::{Camera, FlyCamera};
use coil::config::{AppConfig, CameraConfig};
use coil::time::FrameClock;
use coil::window::{Key, Window};

/// Seconds between camera position reports
const REPORT_INTERVAL: f32 = 1.0;

/// Fly camera driven by the focused window
struct FlyScene {
    camera_config: CameraConfig,
    camera: Option<std::rc::Rc<std::cell::RefCell<FlyCamera>>>,
    clock: FrameClock,
    since_report: f32,
}

impl Scene for FlyScene {
    fn setup(&mut self, window: &Window) {
        let camera = FlyCamera::with_config(window, Vec3::new(0.0, 0.0, 3.0), &self.camera_config)
            .shared();
        window.designate_camera(camera.clone());
        self.camera = Some(camera);
        info!("WASD to move, Space/Shift up and down, scroll to zoom, Escape to quit");
    }

    fn frame(&mut self, window: &Window, dt: f32) {
        let Some(camera) = &self.camera else {
            return;
        };
        let mut camera = camera.borrow_mut();
        if camera.is_key_down(Key::Escape) {
            window.set_should_close(true);
            return;
        }
        camera.update_from_clock(&mut self.clock);

        self.since_report += dt;
        if self.since_report >= REPORT_INTERVAL {
            self.since_report = 0.0;
            let position = camera.position();
            let view = camera.view_matrix();
            info!(
                x = position.x,
                y = position.y,
                z = position.z,
                fov = camera.fov(),
                view_origin = ?view.w_axis.truncate(),
                "camera"
            );
        }
    }
}

fn main() -> Result<()> {
    let config = AppConfig::load_from_env().unwrap_or_else(|e| {
        eprintln!("Failed to load config ({e}), using defaults");
        AppConfig::builtin("release")
    });
    coil::logging::init(&config.logging)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let scene = FlyScene {
        camera_config: config.camera.clone(),
        camera: None,
        clock: FrameClock::new(),
        since_report: 0.0,
    };
    let mut app = App::new(config, scene);
    event_loop.run_app(&mut app)?;
    Ok(())
}

//! Application configuration
//!
//! Supports multiple profiles (debug, release) with different settings.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width
    pub width: i32,
    /// Window height
    pub height: i32,
    /// Whether the window should be fullscreen
    pub fullscreen: bool,
    /// Whether the window should be resizable
    pub resizable: bool,
    /// Whether the window should be decorated (has title bar, borders, etc.)
    pub decorated: bool,
    /// Whether previous native callbacks are forwarded before our own
    pub chaining: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Coil".to_string(),
            width: 800,
            height: 600,
            fullscreen: false,
            resizable: true,
            decorated: true,
            chaining: true,
        }
    }
}

/// Fly camera tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial yaw in degrees
    pub yaw: f32,
    /// Initial pitch in degrees
    pub pitch: f32,
    /// Initial vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Units per second
    pub movement_speed: f32,
    /// Degrees per pixel of cursor travel
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw: -90.0,
            pitch: 0.0,
            fov: 70.0,
            near: 0.1,
            far: 100.0,
            movement_speed: 2.5,
            mouse_sensitivity: 0.1,
        }
    }
}

/// Where log records go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogMode {
    /// Write to `LoggingConfig::file`
    File,
    /// Write to stderr
    Console,
    /// Drop everything
    Disabled,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub mode: LogMode,
    /// Log file used in `file` mode
    pub file: PathBuf,
    /// Default filter directive when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            mode: LogMode::Console,
            file: PathBuf::from("coil.log"),
            level: "info".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// The active profile (debug, release, etc.)
    pub profile: String,
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/{profile}.toml (next to the executable, else ./config)
    /// 2. Environment variables with prefix COIL_ (e.g., COIL_WINDOW__WIDTH=1920)
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(dir) = Self::find_config_dir() {
            let profile_path = dir.join(profile);
            builder = builder.add_source(File::from(profile_path.as_path()).required(false));
        } else {
            builder =
                builder.add_source(File::with_name(&format!("config/{}", profile)).required(false));
        }

        // Use __ as separator for nested fields (e.g., COIL_CAMERA__FOV)
        builder = builder.add_source(
            Environment::with_prefix("COIL")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.set_override("profile", profile)?.build()?;

        config.try_deserialize()
    }

    /// Finds the config directory next to the executable or in the current directory
    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        cwd_config.exists().then_some(cwd_config)
    }

    /// Loads configuration using the COIL_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("COIL_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }

    /// Built-in configuration for `profile`, without reading any source
    pub fn builtin(profile: &str) -> Self {
        Self {
            profile: profile.to_string(),
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self::builtin("release"))
    }
}

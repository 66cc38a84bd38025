//! Shader program helper
//!
//! Source files are read from disk, then compiled and linked by a
//! [`ShaderDriver`]. The driver is the only part that talks to the graphics
//! API; [`GlowDriver`] is the OpenGL implementation.

mod glow_driver;

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};
use tracing::{debug, error, info, warn};

use crate::error::{CoilError, Status};

pub use glow_driver::GlowDriver;

/// Programmable pipeline stage, in compile order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShaderStage {
    Vertex,
    TessControl,
    TessEvaluation,
    Geometry,
    Fragment,
    Compute,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Vertex => "vertex",
            Self::TessControl => "tessellation control",
            Self::TessEvaluation => "tessellation evaluation",
            Self::Geometry => "geometry",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        };
        f.write_str(name)
    }
}

/// Value for a uniform variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat3(Mat3),
    Mat4(Mat4),
}

/// The graphics API operations a shader program needs
///
/// Compile and link failures are reported as the driver's diagnostic log.
pub trait ShaderDriver {
    type Program: Copy;
    type Stage: Copy;
    type Uniform;

    fn create_program(&mut self) -> Result<Self::Program, String>;

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String>;

    fn attach(&mut self, program: Self::Program, stage: Self::Stage);

    fn link(&mut self, program: Self::Program) -> Result<(), String>;

    fn delete_stage(&mut self, stage: Self::Stage);

    fn delete_program(&mut self, program: Self::Program);

    fn use_program(&mut self, program: Self::Program);

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Uniform>;

    fn set_uniform(&mut self, location: &Self::Uniform, value: UniformValue);
}

/// A linked shader program
///
/// A failed compile or link aborts the remaining stages and leaves the
/// program unlinked; [`ShaderProgram::use_program`] then refuses to run it
/// and [`ShaderProgram::delete`] can still release what was created.
pub struct ShaderProgram<D: ShaderDriver> {
    driver: D,
    program: Option<D::Program>,
    linked: bool,
}

impl<D: ShaderDriver> ShaderProgram<D> {
    /// Creates an empty program on `driver`
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            program: None,
            linked: false,
        }
    }

    /// Reads, compiles and links the given stage files
    pub fn load(&mut self, sources: &BTreeMap<ShaderStage, PathBuf>) -> Status {
        Status::from_result("ShaderProgram::load", self.try_load(sources))
    }

    /// Like [`ShaderProgram::load`], returning the error instead of logging it
    pub fn try_load(&mut self, sources: &BTreeMap<ShaderStage, PathBuf>) -> Result<(), CoilError> {
        let mut texts = BTreeMap::new();
        for (&stage, path) in sources {
            debug!(caller = "ShaderProgram::load", %stage, path = %path.display(), "reading shader source");
            let text = std::fs::read_to_string(path).map_err(|source| CoilError::Io {
                path: path.clone(),
                source,
            })?;
            texts.insert(stage, text);
        }
        self.try_load_sources(&texts)
    }

    /// Compiles and links in-memory stage sources
    pub fn load_sources(&mut self, sources: &BTreeMap<ShaderStage, String>) -> Status {
        Status::from_result("ShaderProgram::load_sources", self.try_load_sources(sources))
    }

    /// Like [`ShaderProgram::load_sources`], returning the error
    pub fn try_load_sources(
        &mut self,
        sources: &BTreeMap<ShaderStage, String>,
    ) -> Result<(), CoilError> {
        if sources.is_empty() {
            return Err(CoilError::NoSources);
        }

        self.linked = false;
        let program = match self.program {
            Some(program) => program,
            None => {
                let program = self.driver.create_program().map_err(CoilError::Driver)?;
                self.program = Some(program);
                program
            }
        };

        let mut compiled = Vec::with_capacity(sources.len());
        for (&stage, source) in sources {
            let handle = self
                .driver
                .compile_stage(stage, source)
                .map_err(|log| CoilError::Compile { stage, log })?;
            self.driver.attach(program, handle);
            compiled.push(handle);
        }

        self.driver
            .link(program)
            .map_err(|log| CoilError::Link { log })?;

        for handle in compiled {
            self.driver.delete_stage(handle);
        }
        self.linked = true;
        info!(caller = "ShaderProgram::load", stages = sources.len(), "shader program linked");
        Ok(())
    }

    /// Whether the last load linked successfully
    pub fn is_linked(&self) -> bool {
        self.linked
    }

    /// Binds the program for subsequent draws
    pub fn use_program(&mut self) -> Status {
        match self.program {
            Some(program) if self.linked => {
                self.driver.use_program(program);
                Status::Success
            }
            _ => Status::from_result::<()>("ShaderProgram::use_program", Err(CoilError::NotLinked)),
        }
    }

    /// Releases the program; a second call is a soft failure
    pub fn delete(&mut self) -> Status {
        match self.program.take() {
            Some(program) => {
                self.driver.delete_program(program);
                self.linked = false;
                Status::Success
            }
            None => Status::soft("ShaderProgram::delete", "program already deleted"),
        }
    }

    /// Sets a uniform; unknown names are logged and otherwise ignored
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        let Some(program) = self.program else {
            error!(caller = "ShaderProgram::set_uniform", name, "no program to set uniform on");
            return;
        };
        match self.driver.uniform_location(program, name) {
            Some(location) => self.driver.set_uniform(&location, value),
            None => warn!(caller = "ShaderProgram::set_uniform", name, "uniform not found"),
        }
    }

    pub fn set_bool(&mut self, name: &str, value: bool) {
        self.set_uniform(name, UniformValue::Bool(value));
    }

    pub fn set_int(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::Int(value));
    }

    pub fn set_float(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::Float(value));
    }

    pub fn set_vec2(&mut self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value));
    }

    pub fn set_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value));
    }

    pub fn set_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value));
    }

    pub fn set_mat3(&mut self, name: &str, value: Mat3) {
        self.set_uniform(name, UniformValue::Mat3(value));
    }

    pub fn set_mat4(&mut self, name: &str, value: Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value));
    }

    /// The underlying driver
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    /// Driver double that records calls and fails on request
    #[derive(Default)]
    struct RecordingDriver {
        next_handle: u32,
        compiled: Vec<ShaderStage>,
        deleted_stages: Vec<u32>,
        deleted_programs: Vec<u32>,
        used: Vec<u32>,
        uniforms: HashMap<String, u32>,
        set: Vec<(u32, UniformValue)>,
        fail_stage: Option<ShaderStage>,
        fail_link: bool,
    }

    impl RecordingDriver {
        fn handle(&mut self) -> u32 {
            self.next_handle += 1;
            self.next_handle
        }
    }

    impl ShaderDriver for RecordingDriver {
        type Program = u32;
        type Stage = u32;
        type Uniform = u32;

        fn create_program(&mut self) -> Result<u32, String> {
            Ok(self.handle())
        }

        fn compile_stage(&mut self, stage: ShaderStage, _source: &str) -> Result<u32, String> {
            if self.fail_stage == Some(stage) {
                return Err(format!("0:1({stage}): error: syntax error"));
            }
            self.compiled.push(stage);
            Ok(self.handle())
        }

        fn attach(&mut self, _program: u32, _stage: u32) {}

        fn link(&mut self, _program: u32) -> Result<(), String> {
            if self.fail_link {
                Err("link error: unresolved varying".to_string())
            } else {
                Ok(())
            }
        }

        fn delete_stage(&mut self, stage: u32) {
            self.deleted_stages.push(stage);
        }

        fn delete_program(&mut self, program: u32) {
            self.deleted_programs.push(program);
        }

        fn use_program(&mut self, program: u32) {
            self.used.push(program);
        }

        fn uniform_location(&mut self, _program: u32, name: &str) -> Option<u32> {
            self.uniforms.get(name).copied()
        }

        fn set_uniform(&mut self, location: &u32, value: UniformValue) {
            self.set.push((*location, value));
        }
    }

    fn sources() -> BTreeMap<ShaderStage, String> {
        BTreeMap::from([
            (ShaderStage::Vertex, "void main() {}".to_string()),
            (ShaderStage::Fragment, "void main() {}".to_string()),
        ])
    }

    #[test]
    fn test_load_sources_links_and_frees_stages() {
        let mut program = ShaderProgram::new(RecordingDriver::default());
        assert_eq!(program.load_sources(&sources()), Status::Success);
        assert!(program.is_linked());
        assert_eq!(
            program.driver().compiled,
            vec![ShaderStage::Vertex, ShaderStage::Fragment]
        );
        assert_eq!(program.driver().deleted_stages.len(), 2);
        assert_eq!(program.use_program(), Status::Success);
    }

    #[test]
    fn test_compile_failure_aborts_remaining_stages() {
        let driver = RecordingDriver {
            fail_stage: Some(ShaderStage::Vertex),
            ..RecordingDriver::default()
        };
        let mut program = ShaderProgram::new(driver);

        let err = program.try_load_sources(&sources()).unwrap_err();
        assert!(matches!(err, CoilError::Compile { stage: ShaderStage::Vertex, .. }));
        assert!(program.driver().compiled.is_empty());
        assert!(!program.is_linked());
        assert_eq!(program.use_program(), Status::HardError);
    }

    #[test]
    fn test_link_failure_is_hard_error() {
        let driver = RecordingDriver {
            fail_link: true,
            ..RecordingDriver::default()
        };
        let mut program = ShaderProgram::new(driver);
        assert_eq!(program.load_sources(&sources()), Status::HardError);
        assert!(!program.is_linked());
    }

    #[test]
    fn test_empty_sources_rejected() {
        let mut program = ShaderProgram::new(RecordingDriver::default());
        assert!(matches!(
            program.try_load_sources(&BTreeMap::new()),
            Err(CoilError::NoSources)
        ));
    }

    #[test]
    fn test_load_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        let vertex = dir.path().join("shader.vert");
        let fragment = dir.path().join("shader.frag");
        for path in [&vertex, &fragment] {
            let mut file = std::fs::File::create(path).unwrap();
            writeln!(file, "#version 330 core\nvoid main() {{}}").unwrap();
        }

        let mut program = ShaderProgram::new(RecordingDriver::default());
        let paths = BTreeMap::from([
            (ShaderStage::Vertex, vertex),
            (ShaderStage::Fragment, fragment),
        ]);
        assert_eq!(program.load(&paths), Status::Success);
    }

    #[test]
    fn test_missing_file_fails_before_compiling() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BTreeMap::from([(ShaderStage::Vertex, dir.path().join("missing.vert"))]);

        let mut program = ShaderProgram::new(RecordingDriver::default());
        assert!(matches!(program.try_load(&paths), Err(CoilError::Io { .. })));
        assert!(program.driver().compiled.is_empty());
        assert_eq!(program.load(&paths), Status::HardError);
    }

    #[test]
    fn test_delete_twice_is_soft_failure() {
        let mut program = ShaderProgram::new(RecordingDriver::default());
        program.load_sources(&sources());
        assert_eq!(program.delete(), Status::Success);
        assert_eq!(program.delete(), Status::SoftFailure);
        assert_eq!(program.driver().deleted_programs.len(), 1);
    }

    #[test]
    fn test_missing_uniform_is_noop() {
        let mut driver = RecordingDriver::default();
        driver.uniforms.insert("view".to_string(), 7);
        let mut program = ShaderProgram::new(driver);
        program.load_sources(&sources());

        program.set_mat4("view", Mat4::IDENTITY);
        program.set_float("missing", 1.0);
        assert_eq!(
            program.driver().set,
            vec![(7, UniformValue::Mat4(Mat4::IDENTITY))]
        );
    }
}

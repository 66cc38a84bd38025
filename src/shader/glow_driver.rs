//! OpenGL shader driver on top of `glow`

use std::sync::Arc;

use glow::HasContext;

use super::{ShaderDriver, ShaderStage, UniformValue};

/// [`ShaderDriver`] backed by a `glow` context
///
/// Every call assumes the context is current on the calling thread.
pub struct GlowDriver<C: HasContext> {
    gl: Arc<C>,
}

impl<C: HasContext> GlowDriver<C> {
    pub fn new(gl: Arc<C>) -> Self {
        Self { gl }
    }

    pub fn context(&self) -> &Arc<C> {
        &self.gl
    }
}

fn gl_kind(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::TessControl => glow::TESS_CONTROL_SHADER,
        ShaderStage::TessEvaluation => glow::TESS_EVALUATION_SHADER,
        ShaderStage::Geometry => glow::GEOMETRY_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        ShaderStage::Compute => glow::COMPUTE_SHADER,
    }
}

impl<C: HasContext> ShaderDriver for GlowDriver<C> {
    type Program = C::Program;
    type Stage = C::Shader;
    type Uniform = C::UniformLocation;

    fn create_program(&mut self) -> Result<Self::Program, String> {
        unsafe { self.gl.create_program() }
    }

    fn compile_stage(&mut self, stage: ShaderStage, source: &str) -> Result<Self::Stage, String> {
        let gl = &self.gl;
        unsafe {
            let shader = gl.create_shader(gl_kind(stage))?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }
            Ok(shader)
        }
    }

    fn attach(&mut self, program: Self::Program, stage: Self::Stage) {
        unsafe { self.gl.attach_shader(program, stage) }
    }

    fn link(&mut self, program: Self::Program) -> Result<(), String> {
        let gl = &self.gl;
        unsafe {
            gl.link_program(program);
            if gl.get_program_link_status(program) {
                Ok(())
            } else {
                Err(gl.get_program_info_log(program))
            }
        }
    }

    fn delete_stage(&mut self, stage: Self::Stage) {
        unsafe { self.gl.delete_shader(stage) }
    }

    fn delete_program(&mut self, program: Self::Program) {
        unsafe { self.gl.delete_program(program) }
    }

    fn use_program(&mut self, program: Self::Program) {
        unsafe { self.gl.use_program(Some(program)) }
    }

    fn uniform_location(&mut self, program: Self::Program, name: &str) -> Option<Self::Uniform> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn set_uniform(&mut self, location: &Self::Uniform, value: UniformValue) {
        let gl = &self.gl;
        let loc = Some(location);
        unsafe {
            match value {
                UniformValue::Bool(v) => gl.uniform_1_i32(loc, i32::from(v)),
                UniformValue::Int(v) => gl.uniform_1_i32(loc, v),
                UniformValue::Float(v) => gl.uniform_1_f32(loc, v),
                UniformValue::Vec2(v) => gl.uniform_2_f32(loc, v.x, v.y),
                UniformValue::Vec3(v) => gl.uniform_3_f32(loc, v.x, v.y, v.z),
                UniformValue::Vec4(v) => gl.uniform_4_f32(loc, v.x, v.y, v.z, v.w),
                UniformValue::Mat3(m) => {
                    gl.uniform_matrix_3_f32_slice(loc, false, &m.to_cols_array())
                }
                UniformValue::Mat4(m) => {
                    gl.uniform_matrix_4_f32_slice(loc, false, &m.to_cols_array())
                }
            }
        }
    }
}

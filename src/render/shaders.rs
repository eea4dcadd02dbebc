// shaders.rs - compile and link GLSL stages into scoped program objects

use gl::types::*;
use glam::Mat4;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::ffi::{CString, NulError};
use std::fmt;
use thiserror::Error;

use super::backend::SharedGl;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub(crate) fn to_gl(self) -> GLenum {
        match self {
            ShaderStage::Vertex => gl::VERTEX_SHADER,
            ShaderStage::Fragment => gl::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{stage} shader compilation failed: {diagnostic}")]
    Compile { stage: ShaderStage, diagnostic: String },
    #[error("Program linking failed: {diagnostic}")]
    Link { diagnostic: String },
    #[error("Driver could not allocate a {0} shader")]
    Create(ShaderStage),
    #[error("Driver could not allocate a program")]
    ProgramCreate,
    #[error("Expected a {expected} shader, got a {found} shader")]
    StageMismatch { expected: ShaderStage, found: ShaderStage },
    #[error("Attribute not found: {0}")]
    AttributeNotFound(String),
    #[error("Null byte error: {0}")]
    Nul(#[from] NulError),
}

/// GLSL text for one stage, fixed at build time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderSource {
    pub stage: ShaderStage,
    pub text: &'static str,
}

impl ShaderSource {
    pub const fn vertex(text: &'static str) -> Self {
        Self { stage: ShaderStage::Vertex, text }
    }

    pub const fn fragment(text: &'static str) -> Self {
        Self { stage: ShaderStage::Fragment, text }
    }
}

/// A successfully compiled stage. The handle is deleted on drop.
pub struct CompiledShader {
    gl: SharedGl,
    id: GLuint,
    stage: ShaderStage,
}

impl CompiledShader {
    pub fn compile(gl: &SharedGl, source: &ShaderSource) -> Result<Self, ShaderError> {
        let text = CString::new(source.text)?;

        let id = gl.create_shader(source.stage);
        if id == 0 {
            return Err(ShaderError::Create(source.stage));
        }

        gl.compile_shader(id, &text);
        if !gl.shader_compile_status(id) {
            let mut diagnostic = gl.shader_info_log(id);
            gl.delete_shader(id);
            if diagnostic.is_empty() {
                diagnostic = format!("{} shader rejected without an info log", source.stage);
            }
            return Err(ShaderError::Compile { stage: source.stage, diagnostic });
        }

        debug!("Compiled {} shader {}", source.stage, id);
        Ok(Self { gl: gl.clone(), id, stage: source.stage })
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for CompiledShader {
    fn drop(&mut self) {
        self.gl.delete_shader(self.id);
    }
}

/// A linked program. Either fully linked or never constructed.
pub struct ShaderProgram {
    gl: SharedGl,
    id: GLuint,
    uniforms: HashMap<String, GLint>,
}

impl ShaderProgram {
    /// Links both stages, binding `output` to color number 0 first.
    ///
    /// The stages are consumed: they are detached and deleted whether or not linking
    /// succeeds, and a failed program handle is deleted before the error is returned.
    pub fn link(
        gl: &SharedGl,
        vertex: CompiledShader,
        fragment: CompiledShader,
        output: &str,
    ) -> Result<Self, ShaderError> {
        let stages = [(&vertex, ShaderStage::Vertex), (&fragment, ShaderStage::Fragment)];
        for (shader, expected) in stages {
            if shader.stage != expected {
                return Err(ShaderError::StageMismatch { expected, found: shader.stage });
            }
        }
        let output = CString::new(output)?;

        let id = gl.create_program();
        if id == 0 {
            return Err(ShaderError::ProgramCreate);
        }

        gl.attach_shader(id, vertex.id);
        gl.attach_shader(id, fragment.id);
        gl.bind_frag_data_location(id, 0, &output);
        gl.link_program(id);

        let linked = gl.program_link_status(id);
        let diagnostic = if linked { String::new() } else { gl.program_info_log(id) };

        gl.detach_shader(id, vertex.id);
        gl.detach_shader(id, fragment.id);
        drop(fragment);
        drop(vertex);

        if !linked {
            gl.delete_program(id);
            let diagnostic = if diagnostic.is_empty() {
                String::from("program rejected without an info log")
            } else {
                diagnostic
            };
            return Err(ShaderError::Link { diagnostic });
        }

        info!("Linked shader program {}", id);
        Ok(Self { gl: gl.clone(), id, uniforms: HashMap::new() })
    }

    /// Compiles both sources and links them. Any failure is returned before a program exists.
    pub fn from_sources(
        gl: &SharedGl,
        vertex: &ShaderSource,
        fragment: &ShaderSource,
        output: &str,
    ) -> Result<Self, ShaderError> {
        let vertex_shader = CompiledShader::compile(gl, vertex)?;
        let fragment_shader = CompiledShader::compile(gl, fragment)?;
        Self::link(gl, vertex_shader, fragment_shader, output)
    }

    pub fn id(&self) -> GLuint {
        self.id
    }

    pub fn set_used(&self) {
        self.gl.use_program(self.id);
    }

    pub fn attrib_location(&self, name: &str) -> Result<GLuint, ShaderError> {
        let cname = CString::new(name)?;
        let location = self.gl.attrib_location(self.id, &cname);
        if location < 0 {
            return Err(ShaderError::AttributeNotFound(name.to_string()));
        }
        Ok(location as GLuint)
    }

    pub fn uniform_location(&mut self, name: &str) -> GLint {
        if let Some(location) = self.uniforms.get(name) {
            return *location;
        }

        let location = match CString::new(name) {
            Ok(cname) => self.gl.uniform_location(self.id, &cname),
            Err(_) => -1,
        };

        if location == -1 {
            warn!("Uniform '{}' not found in shader", name);
        }

        self.uniforms.insert(name.to_string(), location);
        location
    }

    /// Expects the program to be in use. Unknown uniforms are skipped.
    pub fn set_uniform_mat4(&mut self, name: &str, mat: &Mat4) {
        let location = self.uniform_location(name);
        if location != -1 {
            self.gl.uniform_matrix4(location, &mat.to_cols_array());
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.gl.delete_program(self.id);
    }
}

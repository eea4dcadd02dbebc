//! The slice of OpenGL the demos rely on.
//!
//! Resource wrappers (`CompiledShader`, `ShaderProgram`, `Buffer`, `VertexArray`) hold a
//! [`SharedGl`] so they can release their handle on drop. `GlApi` forwards to the `gl`
//! crate and is only constructible after the function pointers are loaded.

use gl::types::*;
use std::ffi::{c_void, CStr};
use std::os::raw::c_char;
use std::ptr;
use std::rc::Rc;

use super::shaders::ShaderStage;

pub type SharedGl = Rc<dyn GraphicsApi>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Array,
    ElementArray,
}

impl BufferTarget {
    fn to_gl(self) -> GLenum {
        match self {
            BufferTarget::Array => gl::ARRAY_BUFFER,
            BufferTarget::ElementArray => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

pub trait GraphicsApi {
    /// Returns 0 when the driver refuses to allocate a shader object.
    fn create_shader(&self, stage: ShaderStage) -> GLuint;
    fn compile_shader(&self, shader: GLuint, source: &CStr);
    fn shader_compile_status(&self, shader: GLuint) -> bool;
    fn shader_info_log(&self, shader: GLuint) -> String;
    fn delete_shader(&self, shader: GLuint);

    /// Returns 0 on failure.
    fn create_program(&self) -> GLuint;
    fn attach_shader(&self, program: GLuint, shader: GLuint);
    fn detach_shader(&self, program: GLuint, shader: GLuint);
    fn bind_frag_data_location(&self, program: GLuint, color_number: GLuint, name: &CStr);
    fn link_program(&self, program: GLuint);
    fn program_link_status(&self, program: GLuint) -> bool;
    fn program_info_log(&self, program: GLuint) -> String;
    fn use_program(&self, program: GLuint);
    fn delete_program(&self, program: GLuint);

    /// -1 when the program has no active attribute of that name.
    fn attrib_location(&self, program: GLuint, name: &CStr) -> GLint;
    /// -1 when the program has no active uniform of that name.
    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint;
    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]);

    fn create_vertex_array(&self) -> GLuint;
    fn bind_vertex_array(&self, vao: GLuint);
    fn delete_vertex_array(&self, vao: GLuint);

    fn create_buffer(&self) -> GLuint;
    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint);
    /// Uploads `data` with `STATIC_DRAW` usage to the buffer bound at `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8]);
    fn delete_buffer(&self, buffer: GLuint);

    /// Enables float attribute `index` and points it into the bound array buffer.
    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        components: GLint,
        stride: GLsizei,
        offset: usize,
    );

    fn clear(&self, color: [f32; 4]);
    fn draw_arrays(&self, first: GLint, count: GLsizei);
    /// Indexed triangles with `u16` indices from the bound element buffer.
    fn draw_elements(&self, count: GLsizei);
}

/// `GraphicsApi` over the global `gl` function table.
pub struct GlApi {
    _loaded: (),
}

impl GlApi {
    /// Loads the function pointers through `loader`. The context must be current.
    pub fn load<F>(mut loader: F) -> Self
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(|symbol| loader(symbol));
        Self { _loaded: () }
    }

    pub fn version(&self) -> String {
        unsafe {
            let raw = gl::GetString(gl::VERSION);
            if raw.is_null() {
                return String::from("unknown");
            }
            CStr::from_ptr(raw as *const c_char).to_string_lossy().into_owned()
        }
    }
}

fn read_info_log(len: GLint, fetch: impl FnOnce(GLint, *mut GLchar)) -> String {
    if len <= 0 {
        return String::new();
    }
    let mut buffer = vec![0u8; len as usize];
    fetch(len, buffer.as_mut_ptr() as *mut GLchar);
    String::from_utf8_lossy(&buffer)
        .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
        .to_string()
}

impl GraphicsApi for GlApi {
    fn create_shader(&self, stage: ShaderStage) -> GLuint {
        unsafe { gl::CreateShader(stage.to_gl()) }
    }

    fn compile_shader(&self, shader: GLuint, source: &CStr) {
        unsafe {
            gl::ShaderSource(shader, 1, &source.as_ptr(), ptr::null());
            gl::CompileShader(shader);
        }
    }

    fn shader_compile_status(&self, shader: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::COMPILE_STATUS, &mut success);
        }
        success != 0
    }

    fn shader_info_log(&self, shader: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetShaderiv(shader, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |len, buf| unsafe {
            gl::GetShaderInfoLog(shader, len, ptr::null_mut(), buf);
        })
    }

    fn delete_shader(&self, shader: GLuint) {
        unsafe { gl::DeleteShader(shader) }
    }

    fn create_program(&self) -> GLuint {
        unsafe { gl::CreateProgram() }
    }

    fn attach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::AttachShader(program, shader) }
    }

    fn detach_shader(&self, program: GLuint, shader: GLuint) {
        unsafe { gl::DetachShader(program, shader) }
    }

    fn bind_frag_data_location(&self, program: GLuint, color_number: GLuint, name: &CStr) {
        unsafe { gl::BindFragDataLocation(program, color_number, name.as_ptr()) }
    }

    fn link_program(&self, program: GLuint) {
        unsafe { gl::LinkProgram(program) }
    }

    fn program_link_status(&self, program: GLuint) -> bool {
        let mut success = 0;
        unsafe {
            gl::GetProgramiv(program, gl::LINK_STATUS, &mut success);
        }
        success != 0
    }

    fn program_info_log(&self, program: GLuint) -> String {
        let mut len = 0;
        unsafe {
            gl::GetProgramiv(program, gl::INFO_LOG_LENGTH, &mut len);
        }
        read_info_log(len, |len, buf| unsafe {
            gl::GetProgramInfoLog(program, len, ptr::null_mut(), buf);
        })
    }

    fn use_program(&self, program: GLuint) {
        unsafe { gl::UseProgram(program) }
    }

    fn delete_program(&self, program: GLuint) {
        unsafe { gl::DeleteProgram(program) }
    }

    fn attrib_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetAttribLocation(program, name.as_ptr()) }
    }

    fn uniform_location(&self, program: GLuint, name: &CStr) -> GLint {
        unsafe { gl::GetUniformLocation(program, name.as_ptr()) }
    }

    fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
        unsafe { gl::UniformMatrix4fv(location, 1, gl::FALSE, value.as_ptr()) }
    }

    fn create_vertex_array(&self) -> GLuint {
        let mut vao = 0;
        unsafe {
            gl::GenVertexArrays(1, &mut vao);
        }
        vao
    }

    fn bind_vertex_array(&self, vao: GLuint) {
        unsafe { gl::BindVertexArray(vao) }
    }

    fn delete_vertex_array(&self, vao: GLuint) {
        unsafe { gl::DeleteVertexArrays(1, &vao) }
    }

    fn create_buffer(&self) -> GLuint {
        let mut buffer = 0;
        unsafe {
            gl::GenBuffers(1, &mut buffer);
        }
        buffer
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
        unsafe { gl::BindBuffer(target.to_gl(), buffer) }
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
        unsafe {
            gl::BufferData(
                target.to_gl(),
                data.len() as GLsizeiptr,
                data.as_ptr() as *const c_void,
                gl::STATIC_DRAW,
            );
        }
    }

    fn delete_buffer(&self, buffer: GLuint) {
        unsafe { gl::DeleteBuffers(1, &buffer) }
    }

    fn vertex_attrib_pointer(
        &self,
        index: GLuint,
        components: GLint,
        stride: GLsizei,
        offset: usize,
    ) {
        unsafe {
            gl::EnableVertexAttribArray(index);
            gl::VertexAttribPointer(
                index,
                components,
                gl::FLOAT,
                gl::FALSE,
                stride,
                offset as *const c_void,
            );
        }
    }

    fn clear(&self, color: [f32; 4]) {
        unsafe {
            gl::ClearColor(color[0], color[1], color[2], color[3]);
            gl::Clear(gl::COLOR_BUFFER_BIT);
        }
    }

    fn draw_arrays(&self, first: GLint, count: GLsizei) {
        unsafe { gl::DrawArrays(gl::TRIANGLES, first, count) }
    }

    fn draw_elements(&self, count: GLsizei) {
        unsafe { gl::DrawElements(gl::TRIANGLES, count, gl::UNSIGNED_SHORT, ptr::null()) }
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq)]
    pub enum GlCall {
        CreateShader(GLuint, ShaderStage),
        CompileShader(GLuint),
        DeleteShader(GLuint),
        CreateProgram(GLuint),
        AttachShader(GLuint, GLuint),
        DetachShader(GLuint, GLuint),
        BindFragDataLocation(GLuint, GLuint, String),
        LinkProgram(GLuint),
        UseProgram(GLuint),
        DeleteProgram(GLuint),
        UniformMatrix4(GLint, [f32; 16]),
        CreateVertexArray(GLuint),
        BindVertexArray(GLuint),
        DeleteVertexArray(GLuint),
        CreateBuffer(GLuint),
        BindBuffer(BufferTarget, GLuint),
        BufferData(BufferTarget, usize),
        DeleteBuffer(GLuint),
        VertexAttribPointer(GLuint, GLint, GLsizei, usize),
        Clear([f32; 4]),
        DrawArrays(GLint, GLsizei),
        DrawElements(GLsizei),
    }

    /// Logs every call and hands out unique handles across all object kinds.
    #[derive(Default)]
    pub struct RecordingGl {
        calls: RefCell<Vec<GlCall>>,
        next_handle: Cell<GLuint>,
        stages: RefCell<HashMap<GLuint, ShaderStage>>,
        locations: RefCell<HashMap<String, GLint>>,
        reject_stage: Option<(ShaderStage, String)>,
        reject_link: Option<String>,
        missing_symbols: Vec<String>,
    }

    impl RecordingGl {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn rejecting_stage(mut self, stage: ShaderStage, diagnostic: &str) -> Self {
            self.reject_stage = Some((stage, diagnostic.to_string()));
            self
        }

        pub fn rejecting_link(mut self, diagnostic: &str) -> Self {
            self.reject_link = Some(diagnostic.to_string());
            self
        }

        pub fn without_symbol(mut self, name: &str) -> Self {
            self.missing_symbols.push(name.to_string());
            self
        }

        pub fn calls(&self) -> Vec<GlCall> {
            self.calls.borrow().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.borrow().len()
        }

        pub fn draw_calls(&self) -> usize {
            self.calls
                .borrow()
                .iter()
                .filter(|call| matches!(call, GlCall::DrawArrays(..) | GlCall::DrawElements(..)))
                .count()
        }

        /// Handles of every object created, in creation order.
        pub fn created(&self) -> Vec<GLuint> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    GlCall::CreateShader(id, _)
                    | GlCall::CreateProgram(id)
                    | GlCall::CreateVertexArray(id)
                    | GlCall::CreateBuffer(id) => Some(*id),
                    _ => None,
                })
                .collect()
        }

        /// Handles of every object released, in release order.
        pub fn deleted(&self) -> Vec<GLuint> {
            self.calls
                .borrow()
                .iter()
                .filter_map(|call| match call {
                    GlCall::DeleteShader(id)
                    | GlCall::DeleteProgram(id)
                    | GlCall::DeleteVertexArray(id)
                    | GlCall::DeleteBuffer(id) => Some(*id),
                    _ => None,
                })
                .collect()
        }

        fn record(&self, call: GlCall) {
            self.calls.borrow_mut().push(call);
        }

        fn allocate(&self) -> GLuint {
            let id = self.next_handle.get() + 1;
            self.next_handle.set(id);
            id
        }

        fn location_of(&self, name: &CStr) -> GLint {
            let name = name.to_string_lossy().into_owned();
            if self.missing_symbols.contains(&name) {
                return -1;
            }
            let mut locations = self.locations.borrow_mut();
            let next = locations.len() as GLint;
            *locations.entry(name).or_insert(next)
        }
    }

    impl GraphicsApi for RecordingGl {
        fn create_shader(&self, stage: ShaderStage) -> GLuint {
            let id = self.allocate();
            self.stages.borrow_mut().insert(id, stage);
            self.record(GlCall::CreateShader(id, stage));
            id
        }

        fn compile_shader(&self, shader: GLuint, _source: &CStr) {
            self.record(GlCall::CompileShader(shader));
        }

        fn shader_compile_status(&self, shader: GLuint) -> bool {
            let stage = self.stages.borrow().get(&shader).copied();
            !matches!(
                (&self.reject_stage, stage),
                (Some((rejected, _)), Some(stage)) if *rejected == stage
            )
        }

        fn shader_info_log(&self, _shader: GLuint) -> String {
            self.reject_stage
                .as_ref()
                .map(|(_, log)| log.clone())
                .unwrap_or_default()
        }

        fn delete_shader(&self, shader: GLuint) {
            self.record(GlCall::DeleteShader(shader));
        }

        fn create_program(&self) -> GLuint {
            let id = self.allocate();
            self.record(GlCall::CreateProgram(id));
            id
        }

        fn attach_shader(&self, program: GLuint, shader: GLuint) {
            self.record(GlCall::AttachShader(program, shader));
        }

        fn detach_shader(&self, program: GLuint, shader: GLuint) {
            self.record(GlCall::DetachShader(program, shader));
        }

        fn bind_frag_data_location(&self, program: GLuint, color_number: GLuint, name: &CStr) {
            self.record(GlCall::BindFragDataLocation(
                program,
                color_number,
                name.to_string_lossy().into_owned(),
            ));
        }

        fn link_program(&self, program: GLuint) {
            self.record(GlCall::LinkProgram(program));
        }

        fn program_link_status(&self, _program: GLuint) -> bool {
            self.reject_link.is_none()
        }

        fn program_info_log(&self, _program: GLuint) -> String {
            self.reject_link.clone().unwrap_or_default()
        }

        fn use_program(&self, program: GLuint) {
            self.record(GlCall::UseProgram(program));
        }

        fn delete_program(&self, program: GLuint) {
            self.record(GlCall::DeleteProgram(program));
        }

        fn attrib_location(&self, _program: GLuint, name: &CStr) -> GLint {
            self.location_of(name)
        }

        fn uniform_location(&self, _program: GLuint, name: &CStr) -> GLint {
            self.location_of(name)
        }

        fn uniform_matrix4(&self, location: GLint, value: &[f32; 16]) {
            self.record(GlCall::UniformMatrix4(location, *value));
        }

        fn create_vertex_array(&self) -> GLuint {
            let id = self.allocate();
            self.record(GlCall::CreateVertexArray(id));
            id
        }

        fn bind_vertex_array(&self, vao: GLuint) {
            self.record(GlCall::BindVertexArray(vao));
        }

        fn delete_vertex_array(&self, vao: GLuint) {
            self.record(GlCall::DeleteVertexArray(vao));
        }

        fn create_buffer(&self) -> GLuint {
            let id = self.allocate();
            self.record(GlCall::CreateBuffer(id));
            id
        }

        fn bind_buffer(&self, target: BufferTarget, buffer: GLuint) {
            self.record(GlCall::BindBuffer(target, buffer));
        }

        fn buffer_data(&self, target: BufferTarget, data: &[u8]) {
            self.record(GlCall::BufferData(target, data.len()));
        }

        fn delete_buffer(&self, buffer: GLuint) {
            self.record(GlCall::DeleteBuffer(buffer));
        }

        fn vertex_attrib_pointer(
            &self,
            index: GLuint,
            components: GLint,
            stride: GLsizei,
            offset: usize,
        ) {
            self.record(GlCall::VertexAttribPointer(index, components, stride, offset));
        }

        fn clear(&self, color: [f32; 4]) {
            self.record(GlCall::Clear(color));
        }

        fn draw_arrays(&self, first: GLint, count: GLsizei) {
            self.record(GlCall::DrawArrays(first, count));
        }

        fn draw_elements(&self, count: GLsizei) {
            self.record(GlCall::DrawElements(count));
        }
    }
}

use bytemuck::{Pod, Zeroable};
use gl::types::*;
use log::debug;
use std::mem;

use super::backend::{BufferTarget, SharedGl};
use super::shaders::{ShaderError, ShaderProgram};

pub const POSITION_ATTRIBUTE: &str = "position";
pub const COLOR_ATTRIBUTE: &str = "color";

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 2], color: [f32; 3]) -> Self {
        Self { position, color }
    }

    pub const STRIDE: usize = mem::size_of::<Vertex>();
    pub const COLOR_OFFSET: usize = mem::size_of::<[f32; 2]>();
}

pub struct VertexArray {
    gl: SharedGl,
    id: GLuint,
}

impl VertexArray {
    pub fn new(gl: &SharedGl) -> Self {
        let id = gl.create_vertex_array();
        Self { gl: gl.clone(), id }
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(self.id);
    }

    pub fn id(&self) -> GLuint {
        self.id
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.gl.delete_vertex_array(self.id);
    }
}

/// A static buffer object bound to one target for its whole life.
pub struct Buffer {
    gl: SharedGl,
    id: GLuint,
    target: BufferTarget,
}

impl Buffer {
    pub fn with_data<T: Pod>(gl: &SharedGl, target: BufferTarget, data: &[T]) -> Self {
        let id = gl.create_buffer();
        gl.bind_buffer(target, id);
        gl.buffer_data(target, bytemuck::cast_slice(data));
        Self { gl: gl.clone(), id, target }
    }

    pub fn target(&self) -> BufferTarget {
        self.target
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.gl.delete_buffer(self.id);
    }
}

/// Immutable geometry uploaded once. Fields drop in reverse creation order.
pub struct Mesh {
    index_buffer: Option<Buffer>,
    vertex_buffer: Buffer,
    vertex_array: VertexArray,
    gl: SharedGl,
    vertex_count: GLsizei,
    index_count: GLsizei,
}

impl Mesh {
    /// Creates VAO, VBO and (for non-empty `indices`) EBO, then wires the `position` and
    /// `color` attributes of `program` to the [`Vertex`] layout.
    pub fn upload(
        gl: &SharedGl,
        program: &ShaderProgram,
        vertices: &[Vertex],
        indices: &[u16],
    ) -> Result<Self, ShaderError> {
        let position = program.attrib_location(POSITION_ATTRIBUTE)?;
        let color = program.attrib_location(COLOR_ATTRIBUTE)?;

        let vertex_array = VertexArray::new(gl);
        vertex_array.bind();

        let vertex_buffer = Buffer::with_data(gl, BufferTarget::Array, vertices);
        let index_buffer = if indices.is_empty() {
            None
        } else {
            Some(Buffer::with_data(gl, BufferTarget::ElementArray, indices))
        };

        let stride = Vertex::STRIDE as GLsizei;
        gl.vertex_attrib_pointer(position, 2, stride, 0);
        gl.vertex_attrib_pointer(color, 3, stride, Vertex::COLOR_OFFSET);

        debug!(
            "Uploaded mesh: {} vertices, {} indices (vao {})",
            vertices.len(),
            indices.len(),
            vertex_array.id()
        );

        Ok(Self {
            index_buffer,
            vertex_buffer,
            vertex_array,
            gl: gl.clone(),
            vertex_count: vertices.len() as GLsizei,
            index_count: indices.len() as GLsizei,
        })
    }

    pub fn is_indexed(&self) -> bool {
        self.index_buffer.is_some()
    }

    /// Issues exactly one draw call for the whole mesh.
    pub fn draw(&self) {
        if self.is_indexed() {
            self.gl.draw_elements(self.index_count);
        } else {
            self.gl.draw_arrays(0, self.vertex_count);
        }
    }

    pub fn vertex_buffer(&self) -> &Buffer {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> Option<&Buffer> {
        self.index_buffer.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::backend::recording::{GlCall, RecordingGl};
    use crate::render::shaders::ShaderSource;
    use std::rc::Rc;

    const VERTICES: [Vertex; 3] = [
        Vertex::new([0.0, 0.5], [1.0, 0.0, 0.0]),
        Vertex::new([0.5, -0.5], [0.0, 1.0, 0.0]),
        Vertex::new([-0.5, -0.5], [0.0, 0.0, 1.0]),
    ];

    fn program(gl: &SharedGl) -> ShaderProgram {
        ShaderProgram::from_sources(
            gl,
            &ShaderSource::vertex("void main() {}"),
            &ShaderSource::fragment("void main() {}"),
            "outColor",
        )
        .unwrap()
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::STRIDE, 5 * mem::size_of::<f32>());
        assert_eq!(Vertex::COLOR_OFFSET, 2 * mem::size_of::<f32>());
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&VERTICES).len(), 60);
    }

    #[test]
    fn test_upload_wires_attributes() {
        let recorder = Rc::new(RecordingGl::new());
        let gl: SharedGl = recorder.clone();
        let program = program(&gl);

        let mesh = Mesh::upload(&gl, &program, &VERTICES, &[]).unwrap();
        assert!(!mesh.is_indexed());

        let calls = recorder.calls();
        assert!(calls.contains(&GlCall::BufferData(BufferTarget::Array, 60)));
        assert!(calls.contains(&GlCall::VertexAttribPointer(0, 2, 20, 0)));
        assert!(calls.contains(&GlCall::VertexAttribPointer(1, 3, 20, 8)));

        mesh.draw();
        assert_eq!(recorder.calls().last(), Some(&GlCall::DrawArrays(0, 3)));
    }

    #[test]
    fn test_indexed_mesh_draws_elements() {
        let recorder = Rc::new(RecordingGl::new());
        let gl: SharedGl = recorder.clone();
        let program = program(&gl);

        let mesh = Mesh::upload(&gl, &program, &VERTICES, &[0, 1, 2]).unwrap();
        assert!(mesh.is_indexed());
        assert_eq!(mesh.index_buffer().map(Buffer::target), Some(BufferTarget::ElementArray));
        assert_eq!(mesh.vertex_buffer().target(), BufferTarget::Array);
        mesh.draw();
        assert_eq!(recorder.draw_calls(), 1);
        assert_eq!(recorder.calls().last(), Some(&GlCall::DrawElements(3)));
    }

    #[test]
    fn test_mesh_releases_in_reverse_order() {
        let recorder = Rc::new(RecordingGl::new());
        let gl: SharedGl = recorder.clone();
        let program = program(&gl);
        let before = recorder.created().len();

        let mesh = Mesh::upload(&gl, &program, &VERTICES, &[0, 1, 2]).unwrap();
        let mut acquired = recorder.created().split_off(before);
        let released_before = recorder.deleted().len();
        drop(mesh);

        acquired.reverse();
        assert_eq!(recorder.deleted().split_off(released_before), acquired);
    }

    #[test]
    fn test_missing_attribute_allocates_nothing() {
        let recorder = Rc::new(RecordingGl::new().without_symbol(COLOR_ATTRIBUTE));
        let gl: SharedGl = recorder.clone();
        let program = program(&gl);
        let before = recorder.created().len();

        assert!(Mesh::upload(&gl, &program, &VERTICES, &[]).is_err());
        assert_eq!(recorder.created().len(), before);
    }
}

use crate::render::backend::SharedGl;
use crate::render::frame::{FrameTime, Scene};
use crate::render::mesh::{Mesh, Vertex};
use crate::render::shaders::{ShaderProgram, ShaderSource};
use crate::utils::error::DemoError;

use super::OUTPUT_COLOR;

pub const VERTEX_SOURCE: ShaderSource = ShaderSource::vertex(
    r#"
    #version 150 core
    in vec2 position;
    in vec3 color;
    out vec3 Color;
    void main()
    {
        Color = color;
        gl_Position = vec4(position, 0.0, 1.0);
    }
"#,
);

pub const FRAGMENT_SOURCE: ShaderSource = ShaderSource::fragment(
    r#"
    #version 150 core
    in vec3 Color;
    out vec4 outColor;
    void main()
    {
        outColor = vec4(Color, 1.0);
    }
"#,
);

pub const VERTICES: [Vertex; 3] = [
    Vertex::new([0.0, 0.5], [1.0, 0.0, 0.0]),
    Vertex::new([0.5, -0.5], [0.0, 1.0, 0.0]),
    Vertex::new([-0.5, -0.5], [0.0, 0.0, 1.0]),
];

/// One static triangle, one draw call per frame.
pub struct TriangleScene {
    mesh: Mesh,
    _program: ShaderProgram,
}

impl TriangleScene {
    pub fn new(gl: &SharedGl) -> Result<Self, DemoError> {
        let program =
            ShaderProgram::from_sources(gl, &VERTEX_SOURCE, &FRAGMENT_SOURCE, OUTPUT_COLOR)?;
        program.set_used();
        let mesh = Mesh::upload(gl, &program, &VERTICES, &[])?;
        Ok(Self { mesh, _program: program })
    }
}

impl Scene for TriangleScene {
    fn render(&mut self, _frame: &FrameTime) -> Result<u32, DemoError> {
        self.mesh.draw();
        Ok(1)
    }
}

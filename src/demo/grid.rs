use crate::config::GridConfig;
use crate::render::backend::SharedGl;
use crate::render::camera::Camera;
use crate::render::frame::{FrameTime, Scene};
use crate::render::grid::GridLayout;
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
    uniform mat4 model;
    uniform mat4 view;
    uniform mat4 proj;
    void main()
    {
        Color = color;
        gl_Position = proj * view * model * vec4(position, 0.0, 1.0);
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

pub const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 3, 0];

const CAMERA_DISTANCE: f32 = 1.5;

pub fn quad_vertices(half_extent: f32) -> [Vertex; 4] {
    let h = half_extent;
    [
        Vertex::new([-h, -h], [1.0, 0.0, 0.0]),
        Vertex::new([h, -h], [0.0, 1.0, 0.0]),
        Vertex::new([h, h], [0.0, 0.0, 1.0]),
        Vertex::new([-h, h], [1.0, 1.0, 1.0]),
    ]
}

/// One quad mesh drawn once per grid cell, bobbing along Z.
pub struct GridScene {
    mesh: Mesh,
    program: ShaderProgram,
    layout: GridLayout,
    camera: Camera,
}

impl GridScene {
    pub fn new(gl: &SharedGl, config: &GridConfig, aspect_ratio: f32) -> Result<Self, DemoError> {
        let program =
            ShaderProgram::from_sources(gl, &VERTEX_SOURCE, &FRAGMENT_SOURCE, OUTPUT_COLOR)?;
        program.set_used();
        let vertices = quad_vertices(config.quad_half_extent);
        let mesh = Mesh::upload(gl, &program, &vertices, &QUAD_INDICES)?;

        Ok(Self {
            mesh,
            program,
            layout: GridLayout::from(config),
            camera: Camera::facing_origin(CAMERA_DISTANCE, aspect_ratio),
        })
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }
}

impl Scene for GridScene {
    fn render(&mut self, frame: &FrameTime) -> Result<u32, DemoError> {
        self.program.set_uniform_mat4("view", &self.camera.view_matrix());
        self.program.set_uniform_mat4("proj", &self.camera.projection_matrix());

        let mut draw_calls = 0;
        for instance in self.layout.instances(frame.elapsed) {
            self.program.set_uniform_mat4("model", &instance.model);
            self.mesh.draw();
            draw_calls += 1;
        }
        Ok(draw_calls)
    }
}

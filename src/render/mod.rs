pub mod backend;
pub mod camera;
pub mod frame;
pub mod grid;
pub mod mesh;
pub mod shaders;

pub use backend::{GlApi, GraphicsApi, SharedGl};
pub use camera::Camera;
pub use frame::{FrameLoop, FrameStats, FrameTime, LoopContext, LoopState, Scene};
pub use grid::{GridLayout, ModelInstance};
pub use mesh::{Mesh, Vertex};
pub use shaders::{CompiledShader, ShaderError, ShaderProgram, ShaderSource, ShaderStage};

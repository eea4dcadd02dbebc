use glam::{Mat4, Quat, Vec3};

pub struct Camera {
    pub position: Vec3,
    pub rotation: Quat,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov,
            aspect_ratio,
            near,
            far,
        }
    }

    /// Camera on the +Z axis at `distance`, looking down -Z at the origin.
    pub fn facing_origin(distance: f32, aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, distance),
            ..Self::new(45.0, aspect_ratio, 0.1, 10.0)
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }
}

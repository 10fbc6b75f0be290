use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_4;

/// Closest and farthest the orbit camera may sit from the look-at axis.
pub const MIN_CAMERA_DISTANCE: f32 = 30.0;
pub const MAX_CAMERA_DISTANCE: f32 = 80.0;

/// Lowest and highest camera height above the ground plane.
pub const MIN_CAMERA_HEIGHT: f32 = 20.0;
pub const MAX_CAMERA_HEIGHT: f32 = 60.0;

/// Clamp ranges applied to [`CameraState`] before every pose computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_height: f32,
    pub max_height: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: MIN_CAMERA_DISTANCE,
            max_distance: MAX_CAMERA_DISTANCE,
            min_height: MIN_CAMERA_HEIGHT,
            max_height: MAX_CAMERA_HEIGHT,
        }
    }
}

/// Orbit parameters around the scene origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Azimuth in radians. Unbounded; wraps through sin/cos.
    pub angle: f32,
    /// Horizontal distance from the look-at axis.
    pub distance: f32,
    /// Height above the ground plane.
    pub height: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self {
            angle: FRAC_PI_4,
            distance: 50.0,
            height: 30.0,
        }
    }
}

impl CameraState {
    /// Pulls `distance` and `height` back into range.
    pub fn clamp(&mut self, limits: &OrbitLimits) {
        self.distance = self.distance.clamp(limits.min_distance, limits.max_distance);
        self.height = self.height.clamp(limits.min_height, limits.max_height);
    }

    /// Re-clamps, then derives the pose. State injected out of range
    /// corrects itself here.
    pub fn recompute(&mut self, limits: &OrbitLimits) -> CameraPose {
        self.clamp(limits);
        compute_camera_pose(self)
    }
}

/// Where the camera is and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }

    pub fn view_proj(&self, projection: &Projection) -> Mat4 {
        projection.matrix() * self.view()
    }
}

/// `position = (d·cos θ, h, d·sin θ)`, looking at the origin.
pub fn compute_camera_pose(state: &CameraState) -> CameraPose {
    let (sin, cos) = state.angle.sin_cos();
    CameraPose {
        position: Vec3::new(state.distance * cos, state.height, state.distance * sin),
        look_at: Vec3::ZERO,
    }
}

/// Perspective projection of the hero viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_y_rad: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y_rad: 75f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// OpenGL clip conventions (z in [-1, 1]), matching the NDC used for picking.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_rad, self.aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pose() {
        let mut state = CameraState::default();
        let pose = state.recompute(&OrbitLimits::default());
        let d = 50.0 * FRAC_PI_4.cos();
        assert!((pose.position.x - d).abs() < 1e-4);
        assert!((pose.position.z - d).abs() < 1e-4);
        assert_eq!(pose.position.y, 30.0);
        assert_eq!(pose.look_at, Vec3::ZERO);
    }

    #[test]
    fn injected_out_of_range_state_self_corrects() {
        let mut state = CameraState {
            angle: 0.0,
            distance: 500.0,
            height: -3.0,
        };
        let pose = state.recompute(&OrbitLimits::default());
        assert_eq!(state.distance, MAX_CAMERA_DISTANCE);
        assert_eq!(state.height, MIN_CAMERA_HEIGHT);
        assert_eq!(pose.position, Vec3::new(MAX_CAMERA_DISTANCE, MIN_CAMERA_HEIGHT, 0.0));
    }

    #[test]
    fn angle_wraps_through_trig() {
        let a = compute_camera_pose(&CameraState {
            angle: 0.3,
            ..Default::default()
        });
        let b = compute_camera_pose(&CameraState {
            angle: 0.3 + std::f32::consts::TAU,
            ..Default::default()
        });
        assert!(a.position.distance(b.position) < 1e-3);
    }
}

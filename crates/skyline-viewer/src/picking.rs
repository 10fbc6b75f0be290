//! Screen-to-ground picking for the spotlight.

use crate::camera::{CameraPose, Projection};
use glam::{Vec2, Vec3, Vec4Swizzles};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from the camera through normalized device coordinates
    /// (`x`, `y` in `[-1, 1]`, `y` up).
    pub fn from_camera(pose: &CameraPose, projection: &Projection, ndc: Vec2) -> Self {
        let inv = pose.view_proj(projection).inverse();
        let near = inv * ndc.extend(-1.0).extend(1.0);
        let far = inv * ndc.extend(1.0).extend(1.0);
        let near = near.xyz() / near.w;
        let far = far.xyz() / far.w;

        Self {
            origin: pose.position,
            direction: (far - near).normalize_or_zero(),
        }
    }

    /// Intersection with the ground plane `y = 0`, if the ray reaches it
    /// in front of its origin.
    pub fn intersect_ground(&self) -> Option<Vec3> {
        if self.direction.y.abs() < f32::EPSILON {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        let mut hit = self.origin + self.direction * t;
        hit.y = 0.0;
        Some(hit)
    }
}

/// Pixel position inside a `width x height` viewport to NDC.
pub fn pixel_to_ndc(point: Vec2, width: f32, height: f32) -> Vec2 {
    Vec2::new(
        point.x / width.max(1.0) * 2.0 - 1.0,
        -(point.y / height.max(1.0)) * 2.0 + 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{compute_camera_pose, CameraState};

    #[test]
    fn center_of_screen_hits_the_origin() {
        let pose = compute_camera_pose(&CameraState::default());
        let ray = Ray::from_camera(&pose, &Projection::default(), Vec2::ZERO);
        let hit = ray.intersect_ground().unwrap();
        assert!(hit.length() < 1e-2, "hit {hit:?}");
    }

    #[test]
    fn ray_pointing_up_misses() {
        let ray = Ray {
            origin: Vec3::new(0.0, 30.0, 0.0),
            direction: Vec3::Y,
        };
        assert_eq!(ray.intersect_ground(), None);

        let parallel = Ray {
            origin: Vec3::new(0.0, 30.0, 0.0),
            direction: Vec3::X,
        };
        assert_eq!(parallel.intersect_ground(), None);
    }

    #[test]
    fn top_edge_of_screen_looks_above_the_horizon() {
        // 75° fov at a ~31° downward pitch: the top edge points at the sky.
        let pose = compute_camera_pose(&CameraState::default());
        let ray = Ray::from_camera(&pose, &Projection::default(), Vec2::new(0.0, 1.0));
        assert_eq!(ray.intersect_ground(), None);
    }

    #[test]
    fn ndc_mapping() {
        assert_eq!(pixel_to_ndc(Vec2::new(0.0, 0.0), 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(pixel_to_ndc(Vec2::new(400.0, 300.0), 800.0, 600.0), Vec2::ZERO);
        assert_eq!(pixel_to_ndc(Vec2::new(800.0, 600.0), 800.0, 600.0), Vec2::new(1.0, -1.0));
    }
}

use bevy::prelude::*;

use crate::geometry::measure::BoundingExtent;
use crate::geometry::ray::nearest_hit;

/// World-space triangle soup sampled from the loaded model, plus its
/// bounding extent. Rebuilt wholesale on every load; annotation meshes are
/// never part of it, so picks always land on model surfaces.
#[derive(Resource, Default)]
pub struct PickableGeometry {
    pub triangles: Vec<[Vec3; 3]>,
    pub extent: Option<BoundingExtent>,
}

impl PickableGeometry {
    /// Largest bounding dimension, used to scale thresholds and visuals.
    /// Falls back to 1.0 when no model is loaded or the model is a point.
    pub fn model_size(&self) -> f32 {
        self.extent
            .map(|e| e.largest_dimension())
            .filter(|size| *size > 0.0)
            .unwrap_or(1.0)
    }

    pub fn clear(&mut self) {
        self.triangles.clear();
        self.extent = None;
    }
}

/// Window cursor position to normalised device coordinates. The cursor y
/// axis points down, NDC y points up.
pub fn cursor_to_ndc(cursor: Vec2, viewport_size: Vec2) -> Vec2 {
    Vec2::new(
        cursor.x / viewport_size.x * 2.0 - 1.0,
        1.0 - cursor.y / viewport_size.y * 2.0,
    )
}

/// Unproject an NDC position into a world-space ray through the camera.
pub fn pick_ray(camera: &Camera, camera_transform: &GlobalTransform, ndc: Vec2) -> Option<Ray3d> {
    let near = camera.ndc_to_world(camera_transform, ndc.extend(1.0))?;
    let far = camera.ndc_to_world(camera_transform, ndc.extend(f32::EPSILON))?;
    let direction = Dir3::new(far - near).ok()?;
    Some(Ray3d {
        origin: near,
        direction,
    })
}

/// Pick the nearest model surface point under an NDC position. A miss is
/// an ordinary None; no state changes on a miss.
pub fn pick_point(
    camera: &Camera,
    camera_transform: &GlobalTransform,
    ndc: Vec2,
    geometry: &PickableGeometry,
) -> Option<Vec3> {
    let ray = pick_ray(camera, camera_transform, ndc)?;
    nearest_hit(
        ray.origin,
        *ray.direction,
        &geometry.triangles,
        geometry.extent.as_ref(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_corners_map_to_ndc_corners() {
        let size = Vec2::new(800.0, 600.0);
        assert_eq!(cursor_to_ndc(Vec2::ZERO, size), Vec2::new(-1.0, 1.0));
        assert_eq!(cursor_to_ndc(size, size), Vec2::new(1.0, -1.0));
        assert_eq!(cursor_to_ndc(size * 0.5, size), Vec2::ZERO);
    }

    #[test]
    fn model_size_defaults_without_geometry() {
        let geometry = PickableGeometry::default();
        assert_eq!(geometry.model_size(), 1.0);
    }

    #[test]
    fn model_size_tracks_the_largest_dimension() {
        let geometry = PickableGeometry {
            triangles: Vec::new(),
            extent: Some(BoundingExtent {
                min: Vec3::ZERO,
                max: Vec3::new(2.0, 7.0, 3.0),
            }),
        };
        assert_eq!(geometry.model_size(), 7.0);
    }
}

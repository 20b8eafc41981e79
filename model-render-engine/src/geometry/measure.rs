use bevy::prelude::*;

use super::error::GeometryError;

/// Axis-aligned box enclosing a set of points.
///
/// Always recomputed from scratch: model content changes wholesale on
/// reload, never incrementally, so there is nothing worth maintaining.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingExtent {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingExtent {
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent per axis. Zero on an axis for planar content.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest single dimension, used to scale thresholds and annotation
    /// visuals to the model.
    pub fn largest_dimension(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    /// Box volume. Degenerates to zero for planar models; that is an
    /// acceptable answer, not an error.
    pub fn volume(&self) -> f32 {
        let size = self.size();
        size.x * size.y * size.z
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// Midpoint of a point pair.
pub fn midpoint(a: Vec3, b: Vec3) -> Vec3 {
    (a + b) * 0.5
}

/// Componentwise min/max fold over a point set.
pub fn bounding_extent(points: impl IntoIterator<Item = Vec3>) -> Result<BoundingExtent, GeometryError> {
    let mut points = points.into_iter();
    let first = points.next().ok_or(GeometryError::EmptyInput)?;
    let extent = points.fold(
        BoundingExtent { min: first, max: first },
        |extent, p| BoundingExtent {
            min: extent.min.min(p),
            max: extent.max.max(p),
        },
    );
    Ok(extent)
}

/// Bounding extent of a triangle set.
pub fn triangle_extent(triangles: &[[Vec3; 3]]) -> Result<BoundingExtent, GeometryError> {
    bounding_extent(triangles.iter().flatten().copied())
}

/// Sum of triangle areas via the cross-product formula.
///
/// An approximation when the soup is non-manifold or carries duplicate or
/// overlapping faces; duplicated area is counted twice. That is a
/// documented limitation of the measurement display, not a bug.
pub fn surface_area(triangles: impl IntoIterator<Item = [Vec3; 3]>) -> f32 {
    triangles
        .into_iter()
        .map(|[a, b, c]| 0.5 * (b - a).cross(c - a).length())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube_triangles() -> Vec<[Vec3; 3]> {
        // 12 triangles, two per face, side length 1.
        let corners = |x: f32, y: f32, z: f32| Vec3::new(x, y, z);
        let faces = [
            // -z and +z
            [corners(0., 0., 0.), corners(1., 0., 0.), corners(1., 1., 0.), corners(0., 1., 0.)],
            [corners(0., 0., 1.), corners(1., 0., 1.), corners(1., 1., 1.), corners(0., 1., 1.)],
            // -y and +y
            [corners(0., 0., 0.), corners(1., 0., 0.), corners(1., 0., 1.), corners(0., 0., 1.)],
            [corners(0., 1., 0.), corners(1., 1., 0.), corners(1., 1., 1.), corners(0., 1., 1.)],
            // -x and +x
            [corners(0., 0., 0.), corners(0., 1., 0.), corners(0., 1., 1.), corners(0., 0., 1.)],
            [corners(1., 0., 0.), corners(1., 1., 0.), corners(1., 1., 1.), corners(1., 0., 1.)],
        ];
        faces
            .iter()
            .flat_map(|[a, b, c, d]| [[*a, *b, *c], [*a, *c, *d]])
            .collect()
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_identity() {
        let a = Vec3::new(1.5, -2.0, 7.25);
        let b = Vec3::new(-3.0, 0.5, 2.0);
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn three_four_five_triangle() {
        assert_eq!(distance(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0)), 5.0);
    }

    #[test]
    fn midpoint_is_halfway() {
        let m = midpoint(Vec3::new(2.0, 0.0, -4.0), Vec3::new(4.0, 2.0, 0.0));
        assert_eq!(m, Vec3::new(3.0, 1.0, -2.0));
    }

    #[test]
    fn extent_bounds_every_point() {
        let points = vec![
            Vec3::new(1.0, -2.0, 3.0),
            Vec3::new(-5.0, 7.0, 0.5),
            Vec3::new(2.0, 2.0, -9.0),
        ];
        let extent = bounding_extent(points.iter().copied()).unwrap();
        for p in &points {
            assert!(extent.min.cmple(*p).all());
            assert!(extent.max.cmpge(*p).all());
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert_eq!(bounding_extent([]), Err(GeometryError::EmptyInput));
    }

    #[test]
    fn box_model_dimensions() {
        // 2 x 3 x 4 box reported through size and volume.
        let extent = bounding_extent([Vec3::ZERO, Vec3::new(2.0, 3.0, 4.0)]).unwrap();
        assert_eq!(extent.size(), Vec3::new(2.0, 3.0, 4.0));
        assert_relative_eq!(extent.volume(), 24.0);
        assert_eq!(extent.largest_dimension(), 4.0);
    }

    #[test]
    fn planar_model_has_zero_volume() {
        let extent = bounding_extent([Vec3::ZERO, Vec3::new(2.0, 3.0, 0.0)]).unwrap();
        assert_eq!(extent.volume(), 0.0);
    }

    #[test]
    fn unit_cube_surface_area_is_six() {
        assert_relative_eq!(surface_area(unit_cube_triangles()), 6.0, epsilon = 1e-5);
    }
}

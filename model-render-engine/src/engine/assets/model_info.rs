use bevy::prelude::*;
use serde::Serialize;

use crate::geometry::measure::{surface_area, BoundingExtent};

/// Bounding-box dimensions of the loaded model, in metres.
///
/// `surface_area` sums raw triangle areas; on non-manifold or overlapping
/// geometry duplicated faces are counted twice. That is a limitation of
/// the display, not a bug.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub volume: f32,
    pub surface_area: f32,
}

/// Dimensions and statistics of the loaded model, mirrored to the host
/// page and the native overlay. `dimensions` is absent while no
/// measurable geometry is loaded.
#[derive(Resource, Debug, Clone, Default, Serialize)]
pub struct ModelInfo {
    pub dimensions: Option<ModelDimensions>,
    pub vertices: usize,
    pub triangles: usize,
    pub meshes: usize,
    pub materials: usize,
}

impl ModelInfo {
    pub fn from_geometry(
        extent: Option<&BoundingExtent>,
        triangles: &[[Vec3; 3]],
        vertices: usize,
        meshes: usize,
        materials: usize,
    ) -> Self {
        let dimensions = extent.map(|extent| {
            let size = extent.size();
            ModelDimensions {
                width: size.x,
                height: size.y,
                depth: size.z,
                volume: extent.volume(),
                surface_area: surface_area(triangles.iter().copied()),
            }
        });
        Self {
            dimensions,
            vertices,
            triangles: triangles.len(),
            meshes,
            materials,
        }
    }

    /// Multiline summary for the native overlay.
    pub fn overlay_text(&self) -> String {
        let mut lines = Vec::new();
        match &self.dimensions {
            Some(d) => {
                lines.push(format!(
                    "W {:.2}m  H {:.2}m  D {:.2}m",
                    d.width, d.height, d.depth
                ));
                lines.push(format!(
                    "Volume {:.2}m3  Surface {:.2}m2",
                    d.volume, d.surface_area
                ));
            }
            None => lines.push("No measurable geometry".to_string()),
        }
        lines.push(format!(
            "{} vertices  {} triangles  {} meshes  {} materials",
            self.vertices, self.triangles, self.meshes, self.materials
        ));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dimensions_come_from_the_extent() {
        let extent = BoundingExtent {
            min: Vec3::ZERO,
            max: Vec3::new(2.0, 3.0, 4.0),
        };
        let tri = [[Vec3::ZERO, Vec3::X, Vec3::Y]];
        let info = ModelInfo::from_geometry(Some(&extent), &tri, 3, 1, 1);

        let dims = info.dimensions.unwrap();
        assert_eq!((dims.width, dims.height, dims.depth), (2.0, 3.0, 4.0));
        assert_relative_eq!(dims.volume, 24.0);
        assert_relative_eq!(dims.surface_area, 0.5);
        assert_eq!(info.triangles, 1);
    }

    #[test]
    fn missing_extent_disables_the_dimension_block() {
        let info = ModelInfo::from_geometry(None, &[], 0, 0, 0);
        assert!(info.dimensions.is_none());
        assert!(info.overlay_text().contains("No measurable geometry"));
    }

    #[test]
    fn overlay_lists_statistics() {
        let extent = BoundingExtent {
            min: Vec3::ZERO,
            max: Vec3::ONE,
        };
        let info = ModelInfo::from_geometry(Some(&extent), &[], 120, 3, 2);
        let text = info.overlay_text();
        assert!(text.contains("120 vertices"));
        assert!(text.contains("3 meshes"));
        assert!(text.contains("2 materials"));
    }
}

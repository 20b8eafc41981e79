use bevy::prelude::*;

/// Iterate the triangles of a non-indexed flat position buffer.
///
/// The buffer is a sequence of scalar triples; a trailing partial triangle
/// (length not a multiple of 9) is dropped rather than treated as an error.
pub fn triangles(positions: &[f32]) -> impl Iterator<Item = [Vec3; 3]> + '_ {
    let whole = positions.len() - positions.len() % 9;
    let vertices: &[[f32; 3]] = bytemuck::cast_slice(&positions[..whole]);
    vertices.chunks_exact(3).map(|tri| {
        [
            Vec3::from_array(tri[0]),
            Vec3::from_array(tri[1]),
            Vec3::from_array(tri[2]),
        ]
    })
}

/// Iterate the triangles of an indexed position buffer.
///
/// A trailing partial triangle (index count not a multiple of 3) is
/// dropped, and any triangle referencing an out-of-range vertex is
/// skipped. Never errors.
pub fn indexed_triangles<'a>(
    positions: &'a [f32],
    indices: &'a [u32],
) -> impl Iterator<Item = [Vec3; 3]> + 'a {
    let whole = positions.len() - positions.len() % 3;
    let vertices: &[[f32; 3]] = bytemuck::cast_slice(&positions[..whole]);
    indices.chunks_exact(3).filter_map(|tri| {
        let a = vertices.get(tri[0] as usize)?;
        let b = vertices.get(tri[1] as usize)?;
        let c = vertices.get(tri[2] as usize)?;
        Some([
            Vec3::from_array(*a),
            Vec3::from_array(*b),
            Vec3::from_array(*c),
        ])
    })
}

/// Collect world-space triangles from a buffer pair, applying a transform.
pub fn world_triangles(
    positions: &[f32],
    indices: Option<&[u32]>,
    transform: &GlobalTransform,
) -> Vec<[Vec3; 3]> {
    let to_world =
        |tri: [Vec3; 3]| tri.map(|v| transform.transform_point(v));
    match indices {
        Some(indices) => indexed_triangles(positions, indices).map(to_world).collect(),
        None => triangles(positions).map(to_world).collect(),
    }
}

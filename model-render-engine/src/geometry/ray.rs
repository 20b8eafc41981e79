use bevy::prelude::*;

use super::measure::BoundingExtent;

/// Slab-method ray-AABB intersection, returns Some(t) or None.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let inv = Vec3::new(
        if ray_direction.x != 0.0 { 1.0 / ray_direction.x } else { f32::INFINITY },
        if ray_direction.y != 0.0 { 1.0 / ray_direction.y } else { f32::INFINITY },
        if ray_direction.z != 0.0 { 1.0 / ray_direction.z } else { f32::INFINITY },
    );

    let (mut tmin, mut tmax) = ((min.x - ray_origin.x) * inv.x, (max.x - ray_origin.x) * inv.x);
    if tmin > tmax { std::mem::swap(&mut tmin, &mut tmax); }

    let (mut tymin, mut tymax) = ((min.y - ray_origin.y) * inv.y, (max.y - ray_origin.y) * inv.y);
    if tymin > tymax { std::mem::swap(&mut tymin, &mut tymax); }

    if (tmin > tymax) || (tymin > tmax) { return None; }
    if tymin > tmin { tmin = tymin; }
    if tymax < tmax { tmax = tymax; }

    let (mut tzmin, mut tzmax) = ((min.z - ray_origin.z) * inv.z, (max.z - ray_origin.z) * inv.z);
    if tzmin > tzmax { std::mem::swap(&mut tzmin, &mut tzmax); }

    if (tmin > tzmax) || (tzmin > tmax) { return None; }
    if tzmin > tmin { tmin = tzmin; }
    if tzmax < tmax { tmax = tzmax; }

    if tmax < 0.0 { return None; }
    Some(if tmin >= 0.0 { tmin } else { tmax })
}

/// Moeller-Trumbore ray-triangle intersection, returns the ray parameter
/// of the hit or None. Backfaces count as hits; the picker should land on
/// whatever surface is under the pointer regardless of winding.
pub fn ray_triangle_hit_t(origin: Vec3, direction: Vec3, triangle: &[Vec3; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let [a, b, c] = *triangle;
    let ab = b - a;
    let ac = c - a;
    let p = direction.cross(ac);
    let det = ab.dot(p);
    if det.abs() < EPSILON {
        // Ray parallel to the triangle plane.
        return None;
    }

    let inv_det = 1.0 / det;
    let s = origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(ab);
    let v = direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = ac.dot(q) * inv_det;
    (t > EPSILON).then_some(t)
}

/// Nearest intersection of a ray with a triangle set.
///
/// Nearest is computed explicitly as the minimum ray parameter over all
/// hits; no ordering of the input is assumed. The extent, when provided,
/// is used as a broad-phase cull before testing triangles.
pub fn nearest_hit(
    origin: Vec3,
    direction: Vec3,
    triangles: &[[Vec3; 3]],
    extent: Option<&BoundingExtent>,
) -> Option<Vec3> {
    if let Some(extent) = extent {
        ray_aabb_hit_t(origin, direction, extent.min, extent.max)?;
    }

    triangles
        .iter()
        .filter_map(|tri| ray_triangle_hit_t(origin, direction, tri))
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|t| origin + direction * t)
}

use bevy::prelude::*;
use std::collections::HashMap;

use constants::measurement::{
    AXIS_ALIGNMENT_MIN_COS, EDGE_KEY_DECIMALS, MAJOR_AXES, MAX_SIGNIFICANT_EDGES,
};

/// A triangle edge worth annotating. Derived once, never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Vec3,
    pub end: Vec3,
    pub length: f32,
    /// Normalised `end - start`. Zero-length edges never reach this type.
    pub direction: Vec3,
}

/// Endpoint quantised to a fixed decimal precision so float noise between
/// triangles sharing a physical edge maps to the same key.
type VertexKey = (i64, i64, i64);

fn vertex_key(v: Vec3) -> VertexKey {
    let scale = 10f32.powi(EDGE_KEY_DECIMALS);
    (
        (v.x * scale).round() as i64,
        (v.y * scale).round() as i64,
        (v.z * scale).round() as i64,
    )
}

/// Order-independent key for an edge: the smaller endpoint key first.
fn edge_key(a: Vec3, b: Vec3) -> (VertexKey, VertexKey) {
    let (ka, kb) = (vertex_key(a), vertex_key(b));
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

fn is_axis_aligned(direction: Vec3) -> bool {
    MAJOR_AXES
        .iter()
        .any(|axis| direction.dot(*axis).abs() > AXIS_ALIGNMENT_MIN_COS)
}

/// Extract the significant edges of a triangle soup.
///
/// An edge survives when it is at least `threshold` long and lies within
/// 15 degrees of a major axis. Edges shared between triangles are
/// deduplicated by quantised endpoints, keeping the longer of a colliding
/// pair. Each edge is oriented with the smaller endpoint key first, so the
/// surviving representative never depends on triangle winding or input
/// order. Survivors are sorted by descending length (ties broken by key)
/// and capped at [`MAX_SIGNIFICANT_EDGES`]. Degenerate zero-length edges
/// are silently excluded.
pub fn significant_edges(
    triangles: impl IntoIterator<Item = [Vec3; 3]>,
    threshold: f32,
) -> Vec<Edge> {
    let mut unique: HashMap<(VertexKey, VertexKey), Edge> = HashMap::new();

    for [a, b, c] in triangles {
        for (a, b) in [(a, b), (b, c), (c, a)] {
            let length = (b - a).length();
            if length < threshold {
                continue;
            }
            let (start, end) = if vertex_key(a) <= vertex_key(b) { (a, b) } else { (b, a) };
            let Some(direction) = (end - start).try_normalize() else {
                continue;
            };
            if !is_axis_aligned(direction) {
                continue;
            }

            let edge = Edge { start, end, length, direction };
            unique
                .entry(edge_key(start, end))
                .and_modify(|kept| {
                    if length > kept.length {
                        *kept = edge;
                    }
                })
                .or_insert(edge);
        }
    }

    let mut edges: Vec<(Edge, (VertexKey, VertexKey))> = unique
        .into_iter()
        .map(|(key, edge)| (edge, key))
        .collect();
    edges.sort_by(|(a, ka), (b, kb)| {
        b.length
            .partial_cmp(&a.length)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| ka.cmp(kb))
    });
    edges.truncate(MAX_SIGNIFICANT_EDGES);
    edges.into_iter().map(|(edge, _)| edge).collect()
}

//! Uniform bucket grid over triangle footprints, answering vertical
//! "what is the surface height at (x, z)" queries.

use bevy::math::{Vec2, Vec3, Vec3Swizzles};

use crate::config::HEIGHT_INDEX_BUCKETS;

/// Tolerance for barycentric containment, so points on shared edges hit.
const EDGE_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct TriangleHeightIndex {
    positions: Vec<Vec3>,
    triangles: Vec<[u32; 3]>,
    min: Vec2,
    bucket_size: Vec2,
    buckets_x: usize,
    buckets_z: usize,
    /// Triangle ids per bucket, row-major by z.
    buckets: Vec<Vec<u32>>,
}

impl TriangleHeightIndex {
    pub fn build(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> Self {
        Self::with_buckets(positions, triangles, HEIGHT_INDEX_BUCKETS)
    }

    pub fn with_buckets(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>, per_axis: usize) -> Self {
        let per_axis = per_axis.max(1);
        let (min, max) = positions.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(p.xz()), hi.max(p.xz())),
        );
        let extent = if positions.is_empty() {
            Vec2::ONE
        } else {
            (max - min).max(Vec2::splat(f32::EPSILON))
        };
        let min = if positions.is_empty() { Vec2::ZERO } else { min };

        let mut index = Self {
            positions,
            triangles,
            min,
            bucket_size: extent / per_axis as f32,
            buckets_x: per_axis,
            buckets_z: per_axis,
            buckets: (0..per_axis * per_axis).map(|_| Vec::new()).collect(),
        };
        for t in 0..index.triangles.len() {
            index.insert(t as u32);
        }
        index
    }

    fn corners(&self, t: u32) -> [Vec3; 3] {
        self.triangles[t as usize].map(|i| self.positions[i as usize])
    }

    #[inline]
    fn bucket_coord(&self, p: Vec2) -> (i64, i64) {
        let local = (p - self.min) / self.bucket_size;
        (local.x.floor() as i64, local.y.floor() as i64)
    }

    fn insert(&mut self, t: u32) {
        let [a, b, c] = self.corners(t);
        let lo = a.xz().min(b.xz()).min(c.xz());
        let hi = a.xz().max(b.xz()).max(c.xz());
        let (bx0, bz0) = self.clamp_coord(self.bucket_coord(lo));
        let (bx1, bz1) = self.clamp_coord(self.bucket_coord(hi));
        for bz in bz0..=bz1 {
            for bx in bx0..=bx1 {
                self.buckets[bz * self.buckets_x + bx].push(t);
            }
        }
    }

    fn clamp_coord(&self, (bx, bz): (i64, i64)) -> (usize, usize) {
        (
            bx.clamp(0, self.buckets_x as i64 - 1) as usize,
            bz.clamp(0, self.buckets_z as i64 - 1) as usize,
        )
    }

    #[inline]
    fn flat_index(&self, (bx, bz): (i64, i64)) -> Option<usize> {
        if bx >= 0 && bz >= 0 && (bx as usize) < self.buckets_x && (bz as usize) < self.buckets_z {
            Some(bz as usize * self.buckets_x + bx as usize)
        } else {
            None
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Surface height at `(x, z)`, or `None` when no triangle covers it.
    /// Where triangles overlap in projection, the highest surface wins.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let p = Vec2::new(x, z);
        let mut coord = self.bucket_coord(p);
        // Points exactly on the max edge belong to the last bucket.
        let max = self.min + self.bucket_size * Vec2::new(self.buckets_x as f32, self.buckets_z as f32);
        if coord.0 == self.buckets_x as i64 && p.x <= max.x {
            coord.0 -= 1;
        }
        if coord.1 == self.buckets_z as i64 && p.y <= max.y {
            coord.1 -= 1;
        }
        let bucket = self.flat_index(coord)?;

        self.buckets[bucket]
            .iter()
            .filter_map(|&t| {
                let [a, b, c] = self.corners(t);
                barycentric_height(p, a, b, c)
            })
            .reduce(f32::max)
    }
}

/// Interpolated Y of triangle `abc` at `p` if `p` lies inside its XZ
/// projection.
fn barycentric_height(p: Vec2, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let v0 = b.xz() - a.xz();
    let v1 = c.xz() - a.xz();
    let v2 = p - a.xz();
    let det = v0.x * v1.y - v1.x * v0.y;
    if det.abs() < f32::EPSILON {
        return None;
    }
    let l1 = (v2.x * v1.y - v1.x * v2.y) / det;
    let l2 = (v0.x * v2.y - v2.x * v0.y) / det;
    let l0 = 1.0 - l1 - l2;
    if l0 < -EDGE_EPSILON || l1 < -EDGE_EPSILON || l2 < -EDGE_EPSILON {
        return None;
    }
    Some(l0 * a.y + l1 * b.y + l2 * c.y)
}

//! Planar Delaunay triangulation over arbitrary items.
//!
//! Thin adapter around `delaunator`: items are projected to 2D, triangulated,
//! and the flat index list is regrouped into counter-clockwise triples.

use std::fmt;

use delaunator::Point;

/// Why a point set could not be triangulated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriangulationError {
    /// Fewer than three points.
    TooFewPoints(usize),
    /// Every point lies on a single line.
    Collinear,
    /// Point `index` coincides with another point and was left out.
    Duplicate { index: usize },
}

impl fmt::Display for TriangulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewPoints(n) => write!(f, "need at least 3 points, got {n}"),
            Self::Collinear => write!(f, "all points are collinear"),
            Self::Duplicate { index } => write!(f, "point {index} duplicates another point"),
        }
    }
}

impl std::error::Error for TriangulationError {}

/// Delaunay-triangulate `items` projected to 2D by `coords`.
///
/// Returns triangles as index triples into `items`, each wound
/// counter-clockwise in the projected plane. Every input point appears in at
/// least one triangle; duplicate or collinear input is an error.
pub fn triangulate<T, F>(items: &[T], coords: F) -> Result<Vec<[u32; 3]>, TriangulationError>
where
    F: Fn(&T) -> (f64, f64),
{
    let n = items.len();
    if n < 3 {
        return Err(TriangulationError::TooFewPoints(n));
    }

    let points: Vec<Point> = items
        .iter()
        .map(|item| {
            let (x, y) = coords(item);
            Point { x, y }
        })
        .collect();

    let result = delaunator::triangulate(&points);
    if result.triangles.is_empty() {
        return Err(TriangulationError::Collinear);
    }

    // delaunator silently drops coincident points.
    let mut used = vec![false; n];
    for &i in &result.triangles {
        used[i] = true;
    }
    if let Some(index) = used.iter().position(|&u| !u) {
        return Err(TriangulationError::Duplicate { index });
    }

    let mut triangles: Vec<[u32; 3]> = result
        .triangles
        .chunks_exact(3)
        .map(|t| [t[0] as u32, t[1] as u32, t[2] as u32])
        .collect();
    for tri in &mut triangles {
        if signed_area(&points, tri) < 0.0 {
            tri.swap(1, 2);
        }
    }

    Ok(triangles)
}

/// Twice the signed area of `tri`; positive when counter-clockwise.
fn signed_area(points: &[Point], tri: &[u32; 3]) -> f64 {
    let a = &points[tri[0] as usize];
    let b = &points[tri[1] as usize];
    let c = &points[tri[2] as usize];
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

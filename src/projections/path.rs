//! Footprint paths.
//!
//! A `MapPath` is a polyline/polygon in either geographic
//! (west longitude, latitude) or projected (x, y) coordinates, with
//! drawing codes so a multi-ring footprint (a polygon split by the
//! anti-meridian) stays a single path.

/// Drawing code of one path vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathCode {
    /// Start a new sub-path.
    MoveTo,
    /// Straight segment from the previous vertex.
    LineTo,
    /// Close the current sub-path (vertex is a placeholder).
    ClosePoly,
}

/// A path of vertices with per-vertex drawing codes.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPath {
    vertices: Vec<(f64, f64)>,
    codes: Vec<PathCode>,
}

impl MapPath {
    /// Path from raw vertices and codes (lengths must match).
    pub fn new(vertices: Vec<(f64, f64)>, codes: Vec<PathCode>) -> MapPath {
        debug_assert_eq!(vertices.len(), codes.len());
        MapPath { vertices, codes }
    }

    /// Closed polygon from a ring of points (no repeated endpoint).
    pub fn polygon(ring: &[(f64, f64)]) -> MapPath {
        let mut vertices = ring.to_vec();
        let mut codes = vec![PathCode::LineTo; ring.len()];
        if let Some(&first) = ring.first() {
            codes[0] = PathCode::MoveTo;
            vertices.push(first);
            codes.push(PathCode::ClosePoly);
        }
        MapPath { vertices, codes }
    }

    /// Open polyline from a list of points.
    pub fn line(points: &[(f64, f64)]) -> MapPath {
        let mut codes = vec![PathCode::LineTo; points.len()];
        if !codes.is_empty() {
            codes[0] = PathCode::MoveTo;
        }
        MapPath {
            vertices: points.to_vec(),
            codes,
        }
    }

    /// Path vertices.
    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.vertices
    }

    /// Per-vertex drawing codes.
    pub fn codes(&self) -> &[PathCode] {
        &self.codes
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Whether the path has no vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Number of sub-paths (MoveTo count).
    pub fn n_subpaths(&self) -> usize {
        self.codes
            .iter()
            .filter(|&&c| c == PathCode::MoveTo)
            .count()
    }

    /// Rings of the path: each sub-path as a vertex list, without the
    /// closing placeholder vertex.
    pub fn rings(&self) -> Vec<Vec<(f64, f64)>> {
        let mut rings = Vec::new();
        let mut current: Vec<(f64, f64)> = Vec::new();
        for (&v, &c) in self.vertices.iter().zip(&self.codes) {
            match c {
                PathCode::MoveTo => {
                    if !current.is_empty() {
                        rings.push(std::mem::take(&mut current));
                    }
                    current.push(v);
                }
                PathCode::LineTo => current.push(v),
                PathCode::ClosePoly => {
                    if !current.is_empty() {
                        rings.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            rings.push(current);
        }
        rings
    }
}

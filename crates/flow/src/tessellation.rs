//! Nearest-site tessellation of the raster extent.
//!
//! Built with a Bowyer–Watson Delaunay triangulation of the site
//! positions; the Voronoi region adjacency needed by the force sampler is
//! exactly the Delaunay edge set, so the triangulation is kept only long
//! enough to materialize per-site neighbor lists. Nearest-site queries use
//! a greedy walk over those lists (move to any neighbor closer to the
//! query, stop at a local minimum), which on a Delaunay graph terminates
//! at the true owner. Points outside the extent are answered by the same
//! walk; behavior exactly on region boundaries is implementation-defined.
//!
//! Degenerate inputs (one or two sites, collinear sites) produce an
//! edge-poor graph; queries then fall back to a linear scan rather than
//! panic.

use crate::site::SiteSet;
use driftfield_core::DriftError;
use glam::DVec2;

/// A triangle over point indices, with its precomputed circumcircle.
struct Triangle {
    v: [usize; 3],
    center: DVec2,
    r2: f64,
}

impl Triangle {
    fn new(v: [usize; 3], points: &[DVec2]) -> Self {
        match circumcircle(points[v[0]], points[v[1]], points[v[2]]) {
            Some((center, r2)) => Self { v, center, r2 },
            // Collinear corners: an unbounded circumcircle makes the
            // triangle swallow every later insertion and disappear.
            None => Self {
                v,
                center: (points[v[0]] + points[v[1]] + points[v[2]]) / 3.0,
                r2: f64::INFINITY,
            },
        }
    }

    fn contains_in_circumcircle(&self, p: DVec2) -> bool {
        p.distance_squared(self.center) <= self.r2
    }
}

/// Circumcenter and squared radius of the triangle `(a, b, c)`.
///
/// Returns `None` when the corners are (nearly) collinear.
fn circumcircle(a: DVec2, b: DVec2, c: DVec2) -> Option<(DVec2, f64)> {
    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }
    let a2 = a.length_squared();
    let b2 = b.length_squared();
    let c2 = c.length_squared();
    let ux = (a2 * (b.y - c.y) + b2 * (c.y - a.y) + c2 * (a.y - b.y)) / d;
    let uy = (a2 * (c.x - b.x) + b2 * (a.x - c.x) + c2 * (b.x - a.x)) / d;
    let center = DVec2::new(ux, uy);
    Some((center, a.distance_squared(center)))
}

/// Nearest-site partition of the plane with per-site neighbor lists.
#[derive(Debug)]
pub struct Tessellation {
    positions: Vec<DVec2>,
    adjacency: Vec<Vec<usize>>,
}

impl Tessellation {
    /// Builds the tessellation for sites scattered over a `width x height`
    /// extent.
    ///
    /// Returns `DriftError::NoSites` for an empty site set and
    /// `DriftError::InvalidDimensions` for a zero-area extent.
    pub fn build(sites: &SiteSet, width: usize, height: usize) -> Result<Self, DriftError> {
        if width == 0 || height == 0 {
            return Err(DriftError::InvalidDimensions);
        }
        if sites.is_empty() {
            return Err(DriftError::NoSites);
        }

        let positions: Vec<DVec2> = sites.positions().to_vec();
        let n = positions.len();
        let adjacency = if n == 1 {
            vec![Vec::new()]
        } else {
            triangulate(&positions, width as f64, height as f64)
        };

        Ok(Self {
            positions,
            adjacency,
        })
    }

    /// Number of sites.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when the tessellation has no sites (never, post-`build`).
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of site `index`.
    pub fn position(&self, index: usize) -> DVec2 {
        self.positions[index]
    }

    /// Sites sharing a region boundary with site `index`.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        &self.adjacency[index]
    }

    /// Index of the site owning the region that contains `p`.
    pub fn nearest(&self, p: DVec2) -> usize {
        self.nearest_from(0, p)
    }

    /// Like [`nearest`](Self::nearest), but starts the walk at `hint`.
    ///
    /// Passing the previous query's result exploits spatial coherence
    /// during the row-major bake.
    pub fn nearest_from(&self, hint: usize, p: DVec2) -> usize {
        let n = self.positions.len();
        let mut current = hint.min(n - 1);
        if self.adjacency[current].is_empty() {
            return self.nearest_scan(p);
        }
        let mut best_d2 = self.positions[current].distance_squared(p);
        loop {
            let mut moved = false;
            for &nb in &self.adjacency[current] {
                let d2 = self.positions[nb].distance_squared(p);
                if d2 < best_d2 {
                    best_d2 = d2;
                    current = nb;
                    moved = true;
                }
            }
            if !moved {
                return current;
            }
        }
    }

    fn nearest_scan(&self, p: DVec2) -> usize {
        let mut best = 0;
        let mut best_d2 = f64::INFINITY;
        for (i, &pos) in self.positions.iter().enumerate() {
            let d2 = pos.distance_squared(p);
            if d2 < best_d2 {
                best_d2 = d2;
                best = i;
            }
        }
        best
    }
}

/// Bowyer–Watson incremental triangulation; returns per-site adjacency.
///
/// Three synthetic super-triangle vertices are appended after the real
/// sites; triangles touching them still contribute the hull edges between
/// their real corners, so boundary sites keep their region neighbors.
fn triangulate(positions: &[DVec2], width: f64, height: f64) -> Vec<Vec<usize>> {
    let n = positions.len();
    let mut points = positions.to_vec();

    // Super-triangle generously covering the extent and every site.
    let (mut lo, mut hi) = (DVec2::ZERO, DVec2::new(width, height));
    for &p in positions {
        lo = lo.min(p);
        hi = hi.max(p);
    }
    let mid = (lo + hi) * 0.5;
    let span = (hi - lo).max_element().max(1.0) * 16.0;
    points.push(DVec2::new(mid.x - 20.0 * span, mid.y - span));
    points.push(DVec2::new(mid.x, mid.y + 20.0 * span));
    points.push(DVec2::new(mid.x + 20.0 * span, mid.y - span));

    let mut triangles = vec![Triangle::new([n, n + 1, n + 2], &points)];

    for i in 0..n {
        let p = points[i];

        // Triangles whose circumcircle swallows the new point.
        let mut bad = Vec::new();
        for (t, tri) in triangles.iter().enumerate() {
            if tri.contains_in_circumcircle(p) {
                bad.push(t);
            }
        }

        // Boundary of the cavity: edges used by exactly one bad triangle.
        let mut boundary: Vec<(usize, usize)> = Vec::new();
        for &t in &bad {
            let v = triangles[t].v;
            for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
                let key = (a.min(b), a.max(b));
                if let Some(pos) = boundary.iter().position(|&e| e == key) {
                    boundary.swap_remove(pos);
                } else {
                    boundary.push(key);
                }
            }
        }

        for &t in bad.iter().rev() {
            triangles.swap_remove(t);
        }
        for (a, b) in boundary {
            triangles.push(Triangle::new([a, b, i], &points));
        }
    }

    // Adjacency between real sites; edges to super vertices are dropped.
    let mut adjacency = vec![Vec::new(); n];
    for tri in &triangles {
        let v = tri.v;
        for (a, b) in [(v[0], v[1]), (v[1], v[2]), (v[2], v[0])] {
            if a < n && b < n {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
    }
    for list in &mut adjacency {
        list.sort_unstable();
        list.dedup();
    }
    adjacency
}

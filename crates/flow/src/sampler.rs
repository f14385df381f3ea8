//! Per-point force sampling over a tessellated site set.
//!
//! A query point is influenced by the site owning its region plus that
//! site's direct neighbors (typically 3–8 contributors). Each contributes
//! its force vector scaled by `min(1, base_force / d^4)` — an inverse
//! quartic of the distance, steep enough that only near sites matter. The
//! weighted sum is normalized to a unit vector.

use crate::site::SiteSet;
use crate::tessellation::Tessellation;
use driftfield_core::DriftError;
use glam::DVec2;

/// Weight falloff constant. Matches the sketch this engine grew out of;
/// usable values sit around 4e6–5e6 for screen-sized extents.
pub const DEFAULT_BASE_FORCE: f64 = 4.0e6;

/// Magnitudes below this normalize to the zero vector instead of dividing.
const NORM_EPS: f64 = 1e-9;

/// Samples blended force directions from a tessellation.
///
/// Owns the contributor cache: per owning site, the resolved list of
/// contributing site indices (the site itself followed by its neighbors),
/// built on first query and reused for every later query landing in the
/// same region. The cache dies with the sampler — one sampler per
/// generation cycle.
pub struct ForceSampler<'a> {
    tessellation: &'a Tessellation,
    sites: &'a SiteSet,
    base_force: f64,
    contributors: Vec<Option<Box<[usize]>>>,
    last_site: usize,
}

impl<'a> ForceSampler<'a> {
    /// Creates a sampler over a tessellation and its site set.
    ///
    /// Returns `DriftError::DimensionMismatch` if the tessellation was
    /// built from a differently sized site set.
    pub fn new(
        tessellation: &'a Tessellation,
        sites: &'a SiteSet,
        base_force: f64,
    ) -> Result<Self, DriftError> {
        if tessellation.len() != sites.len() {
            return Err(DriftError::DimensionMismatch {
                lhs_w: tessellation.len(),
                lhs_h: 1,
                rhs_w: sites.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            tessellation,
            sites,
            base_force,
            contributors: vec![None; tessellation.len()],
            last_site: 0,
        })
    }

    /// The falloff constant in use.
    pub fn base_force(&self) -> f64 {
        self.base_force
    }

    /// Samples the blended unit force direction at `p`.
    ///
    /// A point coinciding exactly with a site returns that site's stored
    /// force unmodified. A sum that cancels to (near) zero magnitude
    /// returns the zero vector; the result is never non-finite.
    pub fn sample(&mut self, p: DVec2) -> DVec2 {
        let owner = self.tessellation.nearest_from(self.last_site, p);
        self.last_site = owner;

        if self.contributors[owner].is_none() {
            let mut list = Vec::with_capacity(1 + self.tessellation.neighbors(owner).len());
            list.push(owner);
            list.extend_from_slice(self.tessellation.neighbors(owner));
            self.contributors[owner] = Some(list.into_boxed_slice());
        }
        let list = self.contributors[owner].as_deref().unwrap_or(&[]);

        let mut sum = DVec2::ZERO;
        for &i in list {
            let d2 = self.sites.position(i).distance_squared(p);
            if d2 == 0.0 {
                return self.sites.force(i);
            }
            let influence = (self.base_force / (d2 * d2)).min(1.0);
            sum += self.sites.force(i) * influence;
        }

        let len = sum.length();
        if len < NORM_EPS {
            DVec2::ZERO
        } else {
            sum / len
        }
    }
}

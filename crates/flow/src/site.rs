//! Force-carrying point samples placed along shape boundaries.
//!
//! Sites live on integer coordinates and are deduplicated through a
//! composite-key index: inserting at an occupied coordinate overwrites the
//! stored force (last write wins) instead of adding a second site. Callers
//! must not rely on duplicate site identities.

use glam::DVec2;
use std::collections::HashMap;

/// A deduplicated set of sites, each with a position and a force vector.
///
/// Positions and forces are stored as parallel arrays; the index maps an
/// integer coordinate pair to its slot.
#[derive(Debug, Clone, Default)]
pub struct SiteSet {
    positions: Vec<DVec2>,
    forces: Vec<DVec2>,
    index: HashMap<(i32, i32), usize>,
}

impl SiteSet {
    /// Creates an empty site set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a site at integer coordinates with the given force vector.
    ///
    /// If the coordinate is already occupied, the existing site keeps its
    /// slot and its force is overwritten. Returns the site's index.
    pub fn insert(&mut self, x: i32, y: i32, force: DVec2) -> usize {
        match self.index.get(&(x, y)) {
            Some(&i) => {
                self.forces[i] = force;
                i
            }
            None => {
                let i = self.positions.len();
                self.positions.push(DVec2::new(x as f64, y as f64));
                self.forces.push(force);
                self.index.insert((x, y), i);
                i
            }
        }
    }

    /// Number of distinct sites.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// True when no sites have been inserted.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// All site positions, in insertion order.
    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    /// All site forces, parallel to [`positions`](Self::positions).
    pub fn forces(&self) -> &[DVec2] {
        &self.forces
    }

    /// Position of the site at `index`.
    pub fn position(&self, index: usize) -> DVec2 {
        self.positions[index]
    }

    /// Force of the site at `index`.
    pub fn force(&self, index: usize) -> DVec2 {
        self.forces[index]
    }

    /// Looks up the site occupying an integer coordinate, if any.
    pub fn index_of(&self, x: i32, y: i32) -> Option<usize> {
        self.index.get(&(x, y)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_sequential_indices() {
        let mut s = SiteSet::new();
        assert_eq!(s.insert(1, 2, DVec2::X), 0);
        assert_eq!(s.insert(3, 4, DVec2::Y), 1);
        assert_eq!(s.len(), 2);
        assert_eq!(s.position(1), DVec2::new(3.0, 4.0));
    }

    #[test]
    fn duplicate_coordinate_collapses_last_force_wins() {
        let mut s = SiteSet::new();
        s.insert(5, 5, DVec2::X);
        let i = s.insert(5, 5, DVec2::NEG_Y);
        assert_eq!(i, 0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.force(0), DVec2::NEG_Y);
    }

    #[test]
    fn index_of_resolves_occupied_coordinates_only() {
        let mut s = SiteSet::new();
        s.insert(-3, 7, DVec2::X);
        assert_eq!(s.index_of(-3, 7), Some(0));
        assert_eq!(s.index_of(7, -3), None);
    }

    #[test]
    fn empty_set_reports_empty() {
        let s = SiteSet::new();
        assert!(s.is_empty());
        assert_eq!(s.len(), 0);
    }

    #[test]
    fn positions_and_forces_stay_parallel() {
        let mut s = SiteSet::new();
        for i in 0..10i32 {
            s.insert(i, -i, DVec2::new(i as f64, 1.0));
        }
        assert_eq!(s.positions().len(), s.forces().len());
        assert_eq!(s.force(4).x, 4.0);
    }
}

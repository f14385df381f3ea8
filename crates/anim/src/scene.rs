//! Base composition: translucent circle scatter and boundary site seeding.
//!
//! Circles are scattered until a randomly chosen share of the canvas area
//! is spent, each filled src-over with a translucent palette color. Three
//! out of four circles use a linear gradient fill that fades to transparent
//! across the disc along one of three axes shared by the whole composition;
//! the fourth uses a flat alpha. Along every circle's boundary, sites are
//! dropped at equal angular steps and given a unit force at the boundary
//! angle rotated by a random number of quarter turns — so a circle either
//! pushes outward, swirls, or pulls inward, and neighboring circles fight
//! over the pixels between them.

use driftfield_core::{DriftError, Raster, Srgb, Xorshift64};
use driftfield_flow::SiteSet;
use glam::DVec2;
use std::f64::consts::{PI, TAU};

/// Boundary arc length between consecutive sites, in pixels.
///
/// Circles with a circumference below this produce no sites at all.
pub const BOUNDARY_RESOLUTION: f64 = 80.0;

/// Default palette, background included.
pub const DEFAULT_PALETTE: [&str; 5] = ["#454d66", "#309975", "#58b368", "#dad873", "#efeeb4"];

/// Minimum circle radius in pixels.
const MIN_RADIUS: f64 = 10.0;

/// Inputs to [`compose`].
#[derive(Debug, Clone)]
pub struct SceneParams {
    pub width: usize,
    pub height: usize,
    pub palette: Vec<Srgb>,
}

impl SceneParams {
    /// Creates params with the default palette.
    pub fn new(width: usize, height: usize) -> Result<Self, DriftError> {
        let palette = DEFAULT_PALETTE
            .iter()
            .map(|hex| Srgb::from_hex(hex))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            width,
            height,
            palette,
        })
    }
}

/// A composed base image plus the boundary sites seeded on it.
#[derive(Debug, Clone)]
pub struct Scene {
    pub raster: Raster,
    pub sites: SiteSet,
}

/// How a circle's coverage varies over its disc.
enum CircleFill {
    /// One alpha for the whole disc.
    Flat { alpha: f64 },
    /// Alpha ramps linearly from `alpha` at the disc edge facing against
    /// `direction` down to zero at the far edge.
    Gradient { direction: DVec2, alpha: f64 },
}

/// Three gradient axes shared by every circle of one composition: a random
/// base angle, its opposite, and a diagonal a random quarter turn away.
fn shared_directions(rng: &mut Xorshift64) -> [DVec2; 3] {
    let base = rng.next_f64() * TAU;
    let diagonal = base + TAU / 8.0 + rng.next_usize(4) as f64 * TAU / 4.0;
    [
        DVec2::from_angle(base),
        DVec2::from_angle(base + TAU / 2.0),
        DVec2::from_angle(diagonal),
    ]
}

/// Composes a fresh scene from the given randomness.
///
/// Deterministic for a fixed PRNG state; every trigger calls this with a
/// freshly drawn sub-seed.
pub fn compose(params: &SceneParams, rng: &mut Xorshift64) -> Result<Scene, DriftError> {
    if params.palette.is_empty() {
        return Err(DriftError::InvalidColor("empty palette".into()));
    }
    let width = params.width;
    let height = params.height;

    let directions = shared_directions(rng);
    let bg_index = rng.next_usize(params.palette.len());
    let bg = params.palette[bg_index];
    let mut raster = Raster::filled(width, height, bg.to_rgba8())?;
    let mut sites = SiteSet::new();

    let size = width.min(height) as f64;
    let pow = 0.2 + rng.next_f64();
    let mut area = (width * height) as f64 * (0.15 + 0.85 * rng.next_f64());

    while area > 0.0 {
        let color = pick_excluding(&params.palette, bg_index, rng);
        let choice = rng.next_usize(4);
        let radius = (MIN_RADIUS + rng.next_f64().powf(pow) * size / 5.0).round();
        let cx = rng.next_usize(width) as f64;
        let cy = rng.next_usize(height) as f64;
        let fill = if choice == 0 {
            CircleFill::Flat {
                alpha: 0.1 + 0.85 * rng.next_f64(),
            }
        } else {
            CircleFill::Gradient {
                direction: directions[choice - 1],
                alpha: 0.1 + 0.9 * rng.next_f64(),
            }
        };

        fill_circle(&mut raster, cx, cy, radius, color, &fill);

        let count = (TAU * radius / BOUNDARY_RESOLUTION).floor() as usize;
        if count > 0 {
            let step = TAU / count as f64;
            let offset = rng.next_usize(4) as f64 * TAU / 4.0;
            for i in 0..count {
                let angle = i as f64 * step;
                let sx = (cx + angle.cos() * radius).round() as i32;
                let sy = (cy + angle.sin() * radius).round() as i32;
                let force = DVec2::from_angle(angle + offset);
                sites.insert(sx, sy, force);
            }
        }

        area -= PI * radius * radius;
    }

    Ok(Scene { raster, sites })
}

/// Picks a palette color other than the background (unless the palette has
/// only one entry).
fn pick_excluding(palette: &[Srgb], excluded: usize, rng: &mut Xorshift64) -> Srgb {
    if palette.len() == 1 {
        return palette[0];
    }
    loop {
        let i = rng.next_usize(palette.len());
        if i != excluded {
            return palette[i];
        }
    }
}

/// Src-over composites a translucent disc, clipped to the raster bounds.
fn fill_circle(raster: &mut Raster, cx: f64, cy: f64, radius: f64, color: Srgb, fill: &CircleFill) {
    let [sr, sg, sb, _] = color.to_rgba8();
    let src = [sr as f64, sg as f64, sb as f64];
    let r2 = radius * radius;

    let x_min = ((cx - radius).floor().max(0.0)) as usize;
    let x_max = ((cx + radius).ceil().min(raster.width() as f64 - 1.0)) as usize;
    let y_min = ((cy - radius).floor().max(0.0)) as usize;
    let y_max = ((cy + radius).ceil().min(raster.height() as f64 - 1.0)) as usize;

    for y in y_min..=y_max {
        let dy = y as f64 - cy;
        for x in x_min..=x_max {
            let dx = x as f64 - cx;
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let alpha = match fill {
                CircleFill::Flat { alpha } => *alpha,
                CircleFill::Gradient { direction, alpha } => {
                    // Projection onto the axis, mapped to [0, 1] across
                    // the disc diameter.
                    let t = ((dx * direction.x + dy * direction.y) / radius + 1.0) * 0.5;
                    alpha * (1.0 - t.clamp(0.0, 1.0))
                }
            };
            let dst = raster.get(x as isize, y as isize);
            let mut out = [0u8; 4];
            for c in 0..3 {
                let blended = src[c] * alpha + dst[c] as f64 * (1.0 - alpha);
                out[c] = blended.round() as u8;
            }
            out[3] = (255.0 * alpha + dst[3] as f64 * (1.0 - alpha)).round() as u8;
            raster.set(x as isize, y as isize, out);
        }
    }
}

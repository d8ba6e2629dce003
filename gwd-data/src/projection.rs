//! Map projection from lon/lat to the screen plane that selections are
//! drawn in.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Standard parallels of the contiguous-US Albers projection, in degrees.
pub const STANDARD_PARALLELS: (f64, f64) = (29.5, 45.5);
/// Longitude rotation applied before projecting, in degrees.
pub const ROTATION: f64 = 96.0;
/// Projection center (lon, lat) in the rotated frame, in degrees.
pub const CENTER: (f64, f64) = (-0.6, 38.7);
/// Half-width and half-height of the lower-48 clip window, in units of scale.
pub const CLIP_HALF_EXTENT: (f64, f64) = (0.455, 0.238);

/// Anything that can place a lon/lat pair on the projected plane.
///
/// `None` means the location has no position in this projection and must
/// be left out of plane-space computations.
pub trait Projection {
    fn project(&self, longitude: f64, latitude: f64) -> Option<(f64, f64)>;
}

/// Conic equal-area projection of the contiguous United States.
///
/// Points falling outside the lower-48 clip window project to `None`, so
/// wells in Alaska, Hawaii, or territories are dropped from plane-space
/// selections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlbersUsa {
    pub scale: f64,
    pub translate: (f64, f64),
}

impl Default for AlbersUsa {
    fn default() -> Self {
        Self {
            scale: 1070.0,
            translate: (480.0, 250.0),
        }
    }
}

impl AlbersUsa {
    pub fn new(scale: f64, translate: (f64, f64)) -> Self {
        Self { scale, translate }
    }

    /// Unit-sphere conic equal-area coordinates for (lambda, phi) in radians.
    fn raw(lambda: f64, phi: f64) -> (f64, f64) {
        let sy0 = STANDARD_PARALLELS.0.to_radians().sin();
        let n = (sy0 + STANDARD_PARALLELS.1.to_radians().sin()) / 2.0;
        let c = 1.0 + sy0 * (2.0 * n - sy0);
        let r0 = c.sqrt() / n;
        let r = (c - 2.0 * n * phi.sin()).max(0.0).sqrt() / n;
        let theta = lambda * n;
        (r * theta.sin(), r0 - r * theta.cos())
    }
}

/// Wrap an angle in radians into [-PI, PI].
fn wrap_longitude(lambda: f64) -> f64 {
    if lambda > PI {
        lambda - 2.0 * PI
    } else if lambda < -PI {
        lambda + 2.0 * PI
    } else {
        lambda
    }
}

impl Projection for AlbersUsa {
    fn project(&self, longitude: f64, latitude: f64) -> Option<(f64, f64)> {
        if !longitude.is_finite() || !latitude.is_finite() || latitude.abs() > 90.0 {
            return None;
        }
        let lambda = wrap_longitude((longitude + ROTATION).to_radians());
        let (x, y) = Self::raw(lambda, latitude.to_radians());
        let (cx, cy) = Self::raw(CENTER.0.to_radians(), CENTER.1.to_radians());
        let (tx, ty) = self.translate;
        let px = tx + self.scale * (x - cx);
        let py = ty - self.scale * (y - cy);

        let (hx, hy) = (CLIP_HALF_EXTENT.0 * self.scale, CLIP_HALF_EXTENT.1 * self.scale);
        let inside = px >= tx - hx && px <= tx + hx && py >= ty - hy && py <= ty + hy;
        inside.then_some((px, py))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_projects_to_translate() {
        let projection = AlbersUsa::default();
        let (x, y) = projection.project(CENTER.0 - ROTATION, CENTER.1).unwrap();
        assert!((x - 480.0).abs() < 1e-9);
        assert!((y - 250.0).abs() < 1e-9);
    }

    #[test]
    fn test_orientation() {
        let projection = AlbersUsa::new(1200.0, (480.0, 300.0));
        let kansas = projection.project(-98.0, 38.5).unwrap();
        let maine = projection.project(-69.0, 45.0).unwrap();
        let texas = projection.project(-99.0, 29.0).unwrap();
        // east is right, north is up
        assert!(maine.0 > kansas.0);
        assert!(maine.1 < kansas.1);
        assert!(texas.1 > kansas.1);
    }

    #[test]
    fn test_outside_lower_48_is_none() {
        let projection = AlbersUsa::default();
        // Honolulu and Anchorage
        assert_eq!(projection.project(-157.86, 21.31), None);
        assert_eq!(projection.project(-149.9, 61.2), None);
        assert_eq!(projection.project(f64::NAN, 40.0), None);
    }

    #[test]
    fn test_scale_is_linear_about_translate() {
        let small = AlbersUsa::new(1000.0, (0.0, 0.0));
        let large = AlbersUsa::new(2000.0, (0.0, 0.0));
        let (x1, y1) = small.project(-90.0, 35.0).unwrap();
        let (x2, y2) = large.project(-90.0, 35.0).unwrap();
        assert!((x2 - 2.0 * x1).abs() < 1e-9);
        assert!((y2 - 2.0 * y1).abs() < 1e-9);
    }
}

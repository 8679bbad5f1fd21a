//! Infinite ground plane.

use glam::Vec3A;

use crate::hittable::{HitRecord, Hittable, SurfaceKind};
use crate::interval::Interval;
use crate::ray::Ray;
use crate::scene::SceneError;
use crate::shading::Color;

/// Plane through `point` with unit `normal`, facing the camera half-space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Any point on the plane.
    pub point: Vec3A,
    /// Unit normal.
    pub normal: Vec3A,
    /// Surface color.
    pub color: Color,
}

impl Plane {
    /// Create a plane, normalizing `normal`.
    pub fn new(point: Vec3A, normal: Vec3A, color: Color) -> Result<Self, SceneError> {
        let normal = normal.try_normalize().ok_or(SceneError::DegenerateNormal)?;
        let plane = Self {
            point,
            normal,
            color,
        };
        plane.validate()?;
        Ok(plane)
    }

    pub(crate) fn validate(&self) -> Result<(), SceneError> {
        if !self.point.is_finite() {
            return Err(SceneError::NonFinite("plane point"));
        }
        if !self.normal.is_finite() || (self.normal.length() - 1.0).abs() > 1e-4 {
            return Err(SceneError::DegenerateNormal);
        }
        if !self.color.is_finite() {
            return Err(SceneError::NonFinite("plane color"));
        }
        Ok(())
    }

    /// True when `r` travels against the normal, the only way it can reach
    /// the visible side. Parallel rays (`D·N == 0`) never face the plane.
    pub fn faces(&self, r: &Ray) -> bool {
        r.direction.dot(self.normal) < 0.0
    }

    /// Mirror `d` about the plane: `d - 2(d·n)n`.
    pub fn reflect(&self, d: Vec3A) -> Vec3A {
        d - 2.0 * d.dot(self.normal) * self.normal
    }
}

impl Hittable for Plane {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let denom = r.direction.dot(self.normal);
        if denom == 0.0 {
            return false;
        }

        let t = (self.point - r.origin).dot(self.normal) / denom;
        if !ray_t.surrounds(t) {
            return false;
        }

        rec.t = t;
        rec.p = r.at(t);
        rec.normal = self.normal;
        rec.color = self.color;
        rec.kind = SurfaceKind::Plane;

        true
    }
}

//! Sphere primitive for ray casting.
//!
//! Ray-sphere intersection for a unit-direction ray E + tD against center C,
//! radius r. With W = E - C the hit discriminant is
//! `(D·W)² - W·W + r²`; only the entry root `-(D·W) - sqrt(disc)` is ever
//! used, spheres are always seen from outside.

use glam::Vec3A;

use crate::hittable::{HitRecord, Hittable, SurfaceKind};
use crate::interval::Interval;
use crate::ray::Ray;
use crate::scene::SceneError;
use crate::shading::Color;

/// Sphere primitive defined by center, radius, and surface color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in world coordinates.
    pub center: Vec3A,

    /// Radius of the sphere (strictly positive).
    pub radius: f32,

    /// Surface color used by the diffuse and ambient terms.
    pub color: Color,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Fails unless `radius` is finite and strictly positive and the center
    /// and color are finite.
    pub fn new(center: Vec3A, radius: f32, color: Color) -> Result<Self, SceneError> {
        let sphere = Self {
            center,
            radius,
            color,
        };
        sphere.validate()?;
        Ok(sphere)
    }

    pub(crate) fn validate(&self) -> Result<(), SceneError> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(SceneError::InvalidRadius(self.radius));
        }
        if !self.center.is_finite() {
            return Err(SceneError::NonFinite("sphere center"));
        }
        if !self.color.is_finite() {
            return Err(SceneError::NonFinite("sphere color"));
        }
        Ok(())
    }

    /// Hit discriminant of `r` against this sphere; negative means a miss.
    pub fn discriminant(&self, r: &Ray) -> f32 {
        let w = r.origin - self.center;
        let b = r.direction.dot(w);
        b * b - w.dot(w) + self.radius * self.radius
    }

    /// Entry root along `r`, if the ray meets the sphere at all.
    pub fn near_root(&self, r: &Ray) -> Option<f32> {
        let disc = self.discriminant(r);
        if disc < 0.0 {
            return None;
        }
        let b = r.direction.dot(r.origin - self.center);
        Some(-b - disc.sqrt())
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal_at(&self, p: Vec3A) -> Vec3A {
        (p - self.center).normalize()
    }
}

impl Hittable for Sphere {
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool {
        let Some(root) = self.near_root(r) else {
            return false;
        };
        if !ray_t.surrounds(root) {
            return false;
        }

        rec.t = root;
        rec.p = r.at(root);
        rec.normal = self.normal_at(rec.p);
        rec.color = self.color;
        rec.kind = SurfaceKind::Sphere;

        true
    }
}

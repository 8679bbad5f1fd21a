//! Ray-surface intersection system.
//!
//! Defines the [`Hittable`] trait implemented by spheres and the plane,
//! [`HitRecord`] for the data the shading engine needs, and the ordered
//! [`SphereList`] traversal together with the policies that decide which
//! sphere answers a query.

use glam::Vec3A;
use serde::Deserialize;

use crate::interval::Interval;
use crate::ray::Ray;
use crate::shading::Color;
use crate::sphere::Sphere;

/// Which kind of surface produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// One of the scene's spheres.
    Sphere,
    /// The ground plane.
    Plane,
}

/// Ray-surface intersection information.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    /// Point where the ray meets the surface
    pub p: Vec3A,
    /// Unit surface normal at `p`
    pub normal: Vec3A,
    /// Ray parameter of the hit (signed; may be negative under the discriminant-only queries)
    pub t: f32,
    /// Surface color at `p`
    pub color: Color,
    /// Kind of surface that was hit
    pub kind: SurfaceKind,
}

impl Default for HitRecord {
    fn default() -> Self {
        Self {
            p: Vec3A::ZERO,
            normal: Vec3A::ZERO,
            t: 0.0,
            color: Color::ZERO,
            kind: SurfaceKind::Sphere,
        }
    }
}

/// Trait for surfaces that can be intersected by rays.
///
/// Must be thread-safe (Sync + Send) for parallel rendering.
pub trait Hittable: Sync + Send {
    /// Test for ray intersection with a root inside `ray_t`.
    ///
    /// Returns true if hit, updating the hit record. `rec` is left untouched
    /// on a miss.
    fn hit(&self, r: &Ray, ray_t: Interval, rec: &mut HitRecord) -> bool;
}

/// How a query picks among several spheres the ray meets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HitPolicy {
    /// First sphere in list order with a non-negative discriminant wins,
    /// wherever along the ray it lies. Spheres always shadow the plane.
    #[default]
    FirstInList,
    /// Smallest near root in front of the ray origin wins, across the
    /// spheres and the plane.
    Nearest,
}

impl HitPolicy {
    /// Parameter range this policy accepts roots in.
    pub fn interval(self) -> Interval {
        match self {
            HitPolicy::FirstInList => Interval::UNIVERSE,
            HitPolicy::Nearest => Interval::ahead(f32::INFINITY),
        }
    }
}

/// How the shadow probe decides a sphere blocks the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShadowTest {
    /// Any sphere with a non-negative discriminant along the light
    /// direction occludes, including spheres past the light or behind the point.
    #[default]
    Discriminant,
    /// The occluder's near root must lie between the point and the light.
    Bounded,
}

/// Intersection policies applied for one render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracePolicy {
    /// Sphere selection for primary and reflection rays
    pub hit: HitPolicy,
    /// Occlusion rule for the shadow probe
    pub shadow: ShadowTest,
}

/// Ordered collection of spheres.
///
/// Uses linear search; list order is significant under
/// [`HitPolicy::FirstInList`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SphereList {
    /// Spheres in traversal order
    pub spheres: Vec<Sphere>,
}

impl SphereList {
    /// Create a list keeping the given order.
    pub fn new(spheres: Vec<Sphere>) -> Self {
        Self { spheres }
    }

    /// Number of spheres in the list.
    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    /// True when the scene has no spheres.
    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Find the sphere answering `r` under `policy`.
    ///
    /// Returns the index of the winning sphere and fills `rec` with its hit.
    pub fn hit(&self, r: &Ray, policy: HitPolicy, rec: &mut HitRecord) -> Option<usize> {
        let ray_t = policy.interval();
        match policy {
            HitPolicy::FirstInList => self
                .spheres
                .iter()
                .position(|sphere| sphere.hit(r, ray_t, rec)),
            HitPolicy::Nearest => {
                let mut temp_rec = HitRecord::default();
                let mut closest_so_far = ray_t.max;
                let mut winner = None;

                for (index, sphere) in self.spheres.iter().enumerate() {
                    if sphere.hit(r, ray_t.clip(closest_so_far), &mut temp_rec) {
                        closest_so_far = temp_rec.t;
                        *rec = temp_rec;
                        winner = Some(index);
                    }
                }

                winner
            }
        }
    }

    /// True if any sphere has a root inside `ray_t`.
    pub fn occludes(&self, r: &Ray, ray_t: Interval) -> bool {
        let mut scratch = HitRecord::default();
        self.spheres
            .iter()
            .any(|sphere| sphere.hit(r, ray_t, &mut scratch))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(z: f32, radius: f32, color: Color) -> Sphere {
        Sphere::new(Vec3A::new(0.0, 0.0, z), radius, color).unwrap()
    }

    #[test]
    fn first_in_list_takes_list_order_over_distance() {
        let far = sphere(-20.0, 1.0, Color::X);
        let near = sphere(-5.0, 1.0, Color::Y);
        let list = SphereList::new(vec![far, near]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::NEG_Z);

        let mut rec = HitRecord::default();
        assert_eq!(list.hit(&ray, HitPolicy::FirstInList, &mut rec), Some(0));
        assert!((rec.t - 19.0).abs() < 1e-4);
        assert_eq!(rec.color, Color::X);
    }

    #[test]
    fn nearest_takes_smallest_positive_root() {
        let far = sphere(-20.0, 1.0, Color::X);
        let near = sphere(-5.0, 1.0, Color::Y);
        let list = SphereList::new(vec![far, near]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::NEG_Z);

        let mut rec = HitRecord::default();
        assert_eq!(list.hit(&ray, HitPolicy::Nearest, &mut rec), Some(1));
        assert!((rec.t - 4.0).abs() < 1e-4);
        assert_eq!(rec.color, Color::Y);
    }

    #[test]
    fn first_in_list_accepts_spheres_behind_the_origin() {
        let behind = sphere(5.0, 1.0, Color::X);
        let list = SphereList::new(vec![behind]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::NEG_Z);

        let mut rec = HitRecord::default();
        assert_eq!(list.hit(&ray, HitPolicy::FirstInList, &mut rec), Some(0));
        assert!(rec.t < 0.0);
        assert_eq!(list.hit(&ray, HitPolicy::Nearest, &mut rec), None);
    }

    #[test]
    fn occludes_respects_interval() {
        let list = SphereList::new(vec![sphere(-10.0, 1.0, Color::ONE)]);
        let ray = Ray::new(Vec3A::ZERO, Vec3A::NEG_Z);

        assert!(list.occludes(&ray, Interval::UNIVERSE));
        assert!(list.occludes(&ray, Interval::ahead(20.0)));
        assert!(!list.occludes(&ray, Interval::ahead(5.0)));
    }

    #[test]
    fn empty_list_never_hits() {
        let list = SphereList::default();
        let ray = Ray::new(Vec3A::ZERO, Vec3A::NEG_Z);
        let mut rec = HitRecord::default();
        assert!(list.is_empty());
        assert_eq!(list.hit(&ray, HitPolicy::FirstInList, &mut rec), None);
        assert!(!list.occludes(&ray, Interval::UNIVERSE));
    }
}

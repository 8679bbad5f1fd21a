//! Ray representation for ray casting.
//!
//! A ray is defined as r(t) = origin + t * direction. Every ray built through
//! [`Ray::new`] carries a unit direction, so `t` is a distance and dot
//! products against it can be used directly in the shading math.

use glam::Vec3A;

/// Ray in 3D space defined by origin and unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Starting point of the ray in world coordinates.
    ///
    /// The camera eye for primary rays, a point on the plane for the
    /// reflection and shadow probes.
    pub origin: Vec3A,

    /// Unit-length direction of the ray.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a ray, normalizing `direction`.
    ///
    /// A zero direction has no meaning here; callers always build rays
    /// toward a point distinct from the origin.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Ray from `origin` toward `target`.
    pub fn toward(origin: Vec3A, target: Vec3A) -> Self {
        Self::new(origin, target - origin)
    }

    /// Compute a point at parameter t along the ray.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_is_normalized() {
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(3.0, 0.0, 4.0));
        assert!((r.direction.length() - 1.0).abs() < 1e-6);
        assert!((r.direction.x - 0.6).abs() < 1e-6);
        assert!((r.direction.z - 0.8).abs() < 1e-6);
    }

    #[test]
    fn at_walks_distance_along_direction() {
        let r = Ray::toward(Vec3A::new(0.0, 1.0, 0.0), Vec3A::new(0.0, 1.0, -10.0));
        let p = r.at(2.5);
        assert!((p - Vec3A::new(0.0, 1.0, -2.5)).length() < 1e-6);
    }
}

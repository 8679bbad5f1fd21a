//! Immutable scene description and the scene-level intersection queries.
//!
//! A [`Scene`] is built once, validated, and then only read while rendering.
//! Besides holding the surfaces it answers the three questions the caster and
//! the shading engine ask: what does a ray hit, is a point shadowed, and which
//! sphere does the plane mirror at a point.

use glam::Vec3A;

use crate::camera::Camera;
use crate::hittable::{HitPolicy, HitRecord, Hittable, ShadowTest, SphereList};
use crate::interval::Interval;
use crate::plane::Plane;
use crate::ray::Ray;
use crate::shading::Color;
use crate::sphere::Sphere;

/// Invalid scene description, reported at construction time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// Sphere radius not strictly positive.
    #[error("sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    /// Plane normal of zero length.
    #[error("plane normal must be non-zero")]
    DegenerateNormal,

    /// Camera basis cannot be built.
    #[error("degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    /// Focal distance not strictly positive.
    #[error("focal distance must be positive and finite, got {0}")]
    InvalidFocalDistance(f32),

    /// Light intensities must be non-negative.
    #[error("light intensity {intensity} and ambient {ambient} must be non-negative")]
    NegativeIntensity {
        /// Diffuse/specular intensity
        intensity: f32,
        /// Ambient intensity
        ambient: f32,
    },

    /// Resolution with a zero dimension.
    #[error("resolution must be positive, got {width}x{height}")]
    EmptyResolution {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// Supersampling pattern without offsets.
    #[error("sample pattern needs at least one offset")]
    EmptySamplePattern,

    /// A position, color or offset is NaN or infinite.
    #[error("{0} must be finite")]
    NonFinite(&'static str),
}

/// Point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Light position
    pub position: Vec3A,
    /// Diffuse and specular intensity
    pub intensity: f32,
    /// Ambient intensity
    pub ambient: f32,
}

impl Light {
    /// Create a light; both intensities must be finite and non-negative.
    pub fn new(position: Vec3A, intensity: f32, ambient: f32) -> Result<Self, SceneError> {
        let light = Self {
            position,
            intensity,
            ambient,
        };
        light.validate()?;
        Ok(light)
    }

    pub(crate) fn validate(&self) -> Result<(), SceneError> {
        if !self.position.is_finite() {
            return Err(SceneError::NonFinite("light position"));
        }
        let valid = |x: f32| x.is_finite() && x >= 0.0;
        if !(valid(self.intensity) && valid(self.ambient)) {
            return Err(SceneError::NegativeIntensity {
                intensity: self.intensity,
                ambient: self.ambient,
            });
        }
        Ok(())
    }
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3A::new(-4.0, 4.0, -4.0),
            intensity: 1.0,
            ambient: 0.75,
        }
    }
}

/// Everything a render reads: camera, light, ordered spheres, ground plane
/// and background color.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    camera: Camera,
    light: Light,
    spheres: SphereList,
    plane: Plane,
    background: Color,
}

impl Scene {
    /// Assemble and validate a scene. Sphere order is kept as given.
    pub fn new(
        camera: Camera,
        light: Light,
        spheres: Vec<Sphere>,
        plane: Plane,
    ) -> Result<Self, SceneError> {
        camera.validate()?;
        light.validate()?;
        plane.validate()?;
        for sphere in &spheres {
            sphere.validate()?;
        }

        Ok(Self {
            camera,
            light,
            spheres: SphereList::new(spheres),
            plane,
            background: Color::ZERO,
        })
    }

    /// Same scene with a different background color.
    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    /// Two spheres over a gray ground plane, lit from the upper left.
    pub fn demo() -> Self {
        Self {
            camera: Camera::default(),
            light: Light::default(),
            spheres: SphereList::new(vec![
                Sphere {
                    center: Vec3A::new(-2.0, 0.0, -4.0),
                    radius: 1.0,
                    color: Color::new(1.0, 0.0, 0.0),
                },
                Sphere {
                    center: Vec3A::new(2.0, 1.0, -4.0),
                    radius: 2.0,
                    color: Color::new(0.0, 0.0, 1.0),
                },
            ]),
            plane: Plane {
                point: Vec3A::new(0.0, -1.0, 0.0),
                normal: Vec3A::Y,
                color: Color::splat(0.35),
            },
            background: Color::ZERO,
        }
    }

    /// Camera the primary rays start from.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The scene's single point light.
    pub fn light(&self) -> &Light {
        &self.light
    }

    /// Spheres in traversal order.
    pub fn spheres(&self) -> &SphereList {
        &self.spheres
    }

    /// The ground plane.
    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    /// Color of rays that reach nothing.
    pub fn background(&self) -> Color {
        self.background
    }

    /// Intersect a ray with the scene.
    ///
    /// Under [`HitPolicy::FirstInList`] any sphere hit wins over the plane;
    /// under [`HitPolicy::Nearest`] the plane wins when it is closer. The
    /// plane is only considered when the ray travels against its normal.
    pub fn hit(&self, r: &Ray, policy: HitPolicy, rec: &mut HitRecord) -> bool {
        let ray_t = policy.interval();
        let sphere_hit = self.spheres.hit(r, policy, rec).is_some();
        if sphere_hit && policy == HitPolicy::FirstInList {
            return true;
        }

        let bound = if sphere_hit { rec.t } else { ray_t.max };
        let plane_hit = self.plane.faces(r) && self.plane.hit(r, ray_t.clip(bound), rec);
        plane_hit || sphere_hit
    }

    /// True if a sphere blocks the light as seen from `p`.
    pub fn in_shadow(&self, p: Vec3A, test: ShadowTest) -> bool {
        let to_light = self.light.position - p;
        let probe = Ray::new(p, to_light);
        let ray_t = match test {
            ShadowTest::Discriminant => Interval::UNIVERSE,
            ShadowTest::Bounded => Interval::ahead(to_light.length()),
        };
        self.spheres.occludes(&probe, ray_t)
    }

    /// Sphere mirrored by the plane at `p` for a viewer at `eye`.
    ///
    /// The probe leaves `p` along `d - 2(d·n)n`, `d` being the unit vector
    /// from `eye` toward `p`. Reflected rays are never probed further.
    pub fn reflection(&self, p: Vec3A, eye: Vec3A, policy: HitPolicy) -> Option<HitRecord> {
        let d = (p - eye).normalize();
        let probe = Ray::new(p, self.plane.reflect(d));
        let mut rec = HitRecord::default();
        self.spheres.hit(&probe, policy, &mut rec).map(|_| rec)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::demo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::SurfaceKind;

    fn ground() -> Plane {
        Plane::new(Vec3A::new(0.0, -1.0, 0.0), Vec3A::Y, Color::splat(0.35)).unwrap()
    }

    fn camera_at_origin() -> Camera {
        Camera::new(Vec3A::ZERO, Vec3A::NEG_Z, Vec3A::Y, 1.0).unwrap()
    }

    fn scene_over_ground(light: Light, spheres: Vec<Sphere>) -> Scene {
        Scene::new(camera_at_origin(), light, spheres, ground()).unwrap()
    }

    #[test]
    fn demo_scene_is_valid() {
        let demo = Scene::demo();
        let rebuilt = Scene::new(
            *demo.camera(),
            *demo.light(),
            demo.spheres().spheres.clone(),
            *demo.plane(),
        )
        .unwrap();
        assert_eq!(rebuilt, demo);
        assert_eq!(demo.spheres().len(), 2);
    }

    #[test]
    fn negative_light_is_rejected() {
        assert!(matches!(
            Light::new(Vec3A::ZERO, -1.0, 0.5),
            Err(SceneError::NegativeIntensity { .. })
        ));
    }

    #[test]
    fn scene_new_rechecks_public_fields() {
        let mut sphere = Sphere::new(Vec3A::new(0.0, 0.0, -4.0), 1.0, Color::ONE).unwrap();
        sphere.radius = -2.0;
        let result = Scene::new(camera_at_origin(), Light::default(), vec![sphere], ground());
        assert_eq!(result, Err(SceneError::InvalidRadius(-2.0)));
    }

    #[test]
    fn non_finite_colors_are_rejected() {
        let mut sphere = Sphere::new(Vec3A::new(0.0, 0.0, -4.0), 1.0, Color::ONE).unwrap();
        sphere.color = Color::new(f32::NAN, 0.0, 0.0);
        let result = Scene::new(camera_at_origin(), Light::default(), vec![sphere], ground());
        assert_eq!(result, Err(SceneError::NonFinite("sphere color")));

        let mut plane = ground();
        plane.color = Color::splat(f32::INFINITY);
        let result = Scene::new(camera_at_origin(), Light::default(), vec![], plane);
        assert_eq!(result, Err(SceneError::NonFinite("plane color")));
    }

    #[test]
    fn spheres_shadow_the_plane_under_first_in_list() {
        // sphere sits below the plane, in front of the camera
        let sphere = Sphere::new(Vec3A::new(0.0, -3.0, -6.0), 1.0, Color::X).unwrap();
        let scene = scene_over_ground(Light::default(), vec![sphere]);
        let r = Ray::toward(Vec3A::ZERO, sphere.center);

        let mut rec = HitRecord::default();
        assert!(scene.hit(&r, HitPolicy::FirstInList, &mut rec));
        assert_eq!(rec.kind, SurfaceKind::Sphere);

        assert!(scene.hit(&r, HitPolicy::Nearest, &mut rec));
        assert_eq!(rec.kind, SurfaceKind::Plane);
        assert!((rec.p.y + 1.0).abs() < 1e-4);
    }

    #[test]
    fn upward_ray_misses_everything() {
        let scene = scene_over_ground(Light::default(), vec![]);
        let r = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 1.0, -1.0));
        let mut rec = HitRecord::default();
        assert!(!scene.hit(&r, HitPolicy::FirstInList, &mut rec));
        assert!(!scene.hit(&r, HitPolicy::Nearest, &mut rec));
    }

    #[test]
    fn sphere_between_point_and_light_casts_shadow() {
        let light = Light::new(Vec3A::new(0.0, 9.0, -4.0), 1.0, 0.5).unwrap();
        let blocker = Sphere::new(Vec3A::new(0.0, 3.0, -4.0), 1.0, Color::ONE).unwrap();
        let scene = scene_over_ground(light, vec![blocker]);
        let p = Vec3A::new(0.0, -1.0, -4.0);

        assert!(scene.in_shadow(p, ShadowTest::Discriminant));
        assert!(scene.in_shadow(p, ShadowTest::Bounded));
        assert!(!scene.in_shadow(Vec3A::new(8.0, -1.0, -4.0), ShadowTest::Bounded));
    }

    #[test]
    fn sphere_past_the_light_only_shadows_under_discriminant_test() {
        let light = Light::new(Vec3A::new(0.0, 3.0, -4.0), 1.0, 0.5).unwrap();
        let beyond = Sphere::new(Vec3A::new(0.0, 9.0, -4.0), 1.0, Color::ONE).unwrap();
        let scene = scene_over_ground(light, vec![beyond]);
        let p = Vec3A::new(0.0, -1.0, -4.0);

        assert!(scene.in_shadow(p, ShadowTest::Discriminant));
        assert!(!scene.in_shadow(p, ShadowTest::Bounded));
    }

    #[test]
    fn plane_mirrors_sphere_above_it() {
        let mirrored = Sphere::new(Vec3A::new(0.0, 1.0, -4.0), 1.0, Color::Z).unwrap();
        let scene = scene_over_ground(Light::default(), vec![mirrored]);

        // the point where the eye sees the sphere's mirror image
        let p = Vec3A::new(0.0, -1.0, -4.0 / 3.0);
        let hit = scene.reflection(p, Vec3A::ZERO, HitPolicy::FirstInList).unwrap();
        assert_eq!(hit.color, Color::Z);
        assert!((hit.p.distance(mirrored.center) - 1.0).abs() < 1e-4);

        // looking straight down there is nothing to mirror under nearest-hit
        let below = Vec3A::new(0.0, -1.0, -0.001);
        let above = Vec3A::new(0.0, 5.0, 0.0);
        assert!(scene.reflection(below, above, HitPolicy::Nearest).is_none());
    }
}

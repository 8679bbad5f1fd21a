//! Phong shading and the plane compositing rules.
//!
//! Every surface color is the sum of three terms evaluated at the hit point
//! with normal N, light direction L, and half-vector H = normalize(V + L):
//!
//! ```text
//! surface * intensity * max(0, N·L)                 diffuse
//! highlight * intensity * max(0, N·H)^shininess     specular
//! surface * ambient                                 ambient
//! ```
//!
//! Sums are not clamped; the image sinks deal with values above 1.0.

use glam::Vec3A;

use crate::hittable::{HitRecord, TracePolicy};
use crate::ray::Ray;
use crate::scene::{Light, Scene};

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Specular highlight color shared by every surface (light gray).
pub const HIGHLIGHT: Color = Color::new(0.8, 0.8, 0.8);

/// Phong exponent for spheres.
pub const SPHERE_SHININESS: f32 = 10.0;

/// Phong exponent for the ground plane; a much tighter highlight.
pub const PLANE_SHININESS: f32 = 1000.0;

/// Weight of a mirrored sphere in the plane color. The plane's own color
/// gets `1 - REFLECTION_WEIGHT` when a reflection is present.
pub const REFLECTION_WEIGHT: f32 = 0.2;

/// Phong parameters for one kind of surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phong {
    /// Specular exponent
    pub shininess: f32,
    /// Specular color
    pub highlight: Color,
}

impl Phong {
    /// Parameters used for spheres, directly seen or mirrored.
    pub const SPHERE: Phong = Phong {
        shininess: SPHERE_SHININESS,
        highlight: HIGHLIGHT,
    };

    /// Parameters used for the ground plane.
    pub const PLANE: Phong = Phong {
        shininess: PLANE_SHININESS,
        highlight: HIGHLIGHT,
    };

    /// Full Phong color of `surface` at `p` with unit `normal`, seen from `eye`.
    pub fn shade(
        &self,
        surface: Color,
        light: &Light,
        p: Vec3A,
        normal: Vec3A,
        eye: Vec3A,
    ) -> Color {
        let l = (light.position - p).normalize_or_zero();
        let v = (eye - p).normalize_or_zero();
        // V = -L leaves no half-vector; the specular term vanishes
        let h = (v + l).normalize_or_zero();

        let diffuse = surface * light.intensity * normal.dot(l).max(0.0);
        let lobe = normal.dot(h).max(0.0).powf(self.shininess);
        let specular = self.highlight * light.intensity * lobe;

        diffuse + specular + ambient(surface, light)
    }
}

/// Ambient-only color, used for shadowed plane points.
pub fn ambient(surface: Color, light: &Light) -> Color {
    surface * light.ambient
}

/// Combine the plane's own colors with an optional mirrored sphere color.
///
/// First match wins:
/// 1. reflection and shadow: `0.2 * reflected + 0.8 * ambient_only`
/// 2. reflection only: `0.2 * reflected + 0.8 * full`
/// 3. shadow only: `ambient_only`
/// 4. neither: `full`
///
/// The 0.8 scale only applies when a reflection was found.
pub fn composite_plane(
    reflected: Option<Color>,
    shadowed: bool,
    ambient_only: Color,
    full: Color,
) -> Color {
    let own = if shadowed { ambient_only } else { full };
    match reflected {
        Some(mirrored) => REFLECTION_WEIGHT * mirrored + (1.0 - REFLECTION_WEIGHT) * own,
        None => own,
    }
}

/// Color of a sphere hit seen from `eye`.
pub fn shade_sphere(scene: &Scene, rec: &HitRecord, eye: Vec3A) -> Color {
    Phong::SPHERE.shade(rec.color, scene.light(), rec.p, rec.normal, eye)
}

/// Color of a plane hit reached by `incoming`, including its shadow and
/// one-bounce mirror image of a sphere.
pub fn shade_plane(scene: &Scene, rec: &HitRecord, incoming: &Ray, policy: TracePolicy) -> Color {
    let light = scene.light();
    let eye = incoming.origin;

    let full = Phong::PLANE.shade(rec.color, light, rec.p, rec.normal, eye);
    let ambient_only = ambient(rec.color, light);
    let shadowed = scene.in_shadow(rec.p, policy.shadow);
    // the plane point is the eye of the mirrored sphere
    let reflected = scene
        .reflection(rec.p, eye, policy.hit)
        .map(|hit| shade_sphere(scene, &hit, rec.p));

    composite_plane(reflected, shadowed, ambient_only, full)
}

//! Scene files.
//!
//! A scene file is TOML describing the camera, the light, the spheres in
//! traversal order, the ground plane, and render settings. Everything except
//! the light and the plane has a default matching [`Scene::demo`].
//!
//! ```toml
//! background = [0.0, 0.0, 0.0]
//!
//! [render]
//! width = 640
//! height = 480
//! hit_policy = "first-in-list"   # or "nearest"
//! shadow_test = "discriminant"   # or "bounded"
//! samples = [[0.25, 0.25], [0.75, 0.25], [0.75, 0.75], [0.25, 0.75]]
//!
//! [camera]
//! eye = [0.0, 0.0, 1.0]
//! view = [0.0, 0.0, -1.0]
//! up = [0.0, 1.0, 0.0]
//! focal_distance = 1.0
//!
//! [light]
//! position = [-4.0, 4.0, -4.0]
//! intensity = 1.0
//! ambient = 0.75
//!
//! [[spheres]]
//! center = [-2.0, 0.0, -4.0]
//! radius = 1.0
//! color = [1.0, 0.0, 0.0]
//!
//! [plane]
//! point = [0.0, -1.0, 0.0]
//! normal = [0.0, 1.0, 0.0]
//! color = [0.35, 0.35, 0.35]
//! ```

use std::fs;
use std::path::Path;

use glam::Vec3A;
use log::debug;
use serde::Deserialize;

use crate::camera::{Camera, Resolution};
use crate::hittable::{HitPolicy, ShadowTest, TracePolicy};
use crate::plane::Plane;
use crate::render::{RenderOptions, SamplePattern};
use crate::scene::{Light, Scene, SceneError};
use crate::sphere::Sphere;

/// Failure to turn a scene file into a render job.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read scene file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for a scene.
    #[error("failed to parse scene file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The file parsed but describes an invalid scene.
    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// `[render]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Sphere selection policy
    pub hit_policy: HitPolicy,
    /// Shadow probe rule
    pub shadow_test: ShadowTest,
    /// Sample offsets in pixel units; the default 2×2 grid when absent
    pub samples: Option<Vec<[f32; 2]>>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        let res = Resolution::default();
        Self {
            width: res.width,
            height: res.height,
            hit_policy: HitPolicy::default(),
            shadow_test: ShadowTest::default(),
            samples: None,
        }
    }
}

/// `[camera]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraSettings {
    /// Eye position
    pub eye: [f32; 3],
    /// View direction
    pub view: [f32; 3],
    /// Approximate up vector
    pub up: [f32; 3],
    /// Eye to image plane distance
    pub focal_distance: f32,
    /// Half the image plane height
    pub half_height: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let camera = Camera::default();
        Self {
            eye: camera.eye.into(),
            view: camera.view.into(),
            up: camera.up.into(),
            focal_distance: camera.focal_distance,
            half_height: camera.half_height,
        }
    }
}

/// `[light]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightSettings {
    /// Light position
    pub position: [f32; 3],
    /// Diffuse and specular intensity
    pub intensity: f32,
    /// Ambient intensity
    pub ambient: f32,
}

/// One `[[spheres]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SphereSettings {
    /// Sphere center
    pub center: [f32; 3],
    /// Sphere radius
    pub radius: f32,
    /// Surface color
    pub color: [f32; 3],
}

/// `[plane]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlaneSettings {
    /// Point on the plane
    pub point: [f32; 3],
    /// Plane normal, normalized on load
    pub normal: [f32; 3],
    /// Surface color
    pub color: [f32; 3],
}

/// Whole scene file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    /// Render settings
    #[serde(default)]
    pub render: RenderSettings,
    /// Camera pose
    #[serde(default)]
    pub camera: CameraSettings,
    /// Point light
    pub light: LightSettings,
    /// Spheres in traversal order
    #[serde(default)]
    pub spheres: Vec<SphereSettings>,
    /// Ground plane
    pub plane: PlaneSettings,
    /// Color of rays that hit nothing
    #[serde(default)]
    pub background: [f32; 3],
}

/// Everything needed for one render call.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    /// Scene to render
    pub scene: Scene,
    /// Policies, sampling and progress display
    pub options: RenderOptions,
    /// Output size
    pub resolution: Resolution,
}

impl RenderJob {
    /// The built-in demo scene at 640×480 with default options.
    pub fn demo() -> Self {
        Self {
            scene: Scene::demo(),
            options: RenderOptions::default(),
            resolution: Resolution::default(),
        }
    }
}

impl SceneConfig {
    /// Read and parse a scene file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading scene file {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Parse scene TOML.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Validate the description and build the render job.
    pub fn build(&self) -> Result<RenderJob, ConfigError> {
        let cam = &self.camera;
        let camera = Camera::new(
            cam.eye.into(),
            cam.view.into(),
            cam.up.into(),
            cam.focal_distance,
        )?;
        let camera = camera.with_half_height(cam.half_height)?;

        let light = &self.light;
        let light = Light::new(light.position.into(), light.intensity, light.ambient)?;

        let spheres = self
            .spheres
            .iter()
            .map(|s| Sphere::new(s.center.into(), s.radius, s.color.into()))
            .collect::<Result<Vec<_>, _>>()?;

        let plane = &self.plane;
        let plane = Plane::new(plane.point.into(), plane.normal.into(), plane.color.into())?;

        let background = Vec3A::from(self.background);
        if !background.is_finite() {
            return Err(SceneError::NonFinite("background").into());
        }
        let scene = Scene::new(camera, light, spheres, plane)?.with_background(background);

        let pattern = match &self.render.samples {
            Some(offsets) => {
                SamplePattern::new(offsets.iter().map(|&[dx, dy]| (dx, dy)).collect())?
            }
            None => SamplePattern::default(),
        };

        Ok(RenderJob {
            scene,
            options: RenderOptions {
                policy: TracePolicy {
                    hit: self.render.hit_policy,
                    shadow: self.render.shadow_test,
                },
                pattern,
                progress: false,
            },
            resolution: Resolution::new(self.render.width, self.render.height)?,
        })
    }
}

//! Ray caster: primary rays, supersampling and dispatch into shading.

use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};

use crate::camera::{ImagePlane, Resolution};
use crate::framebuffer::FrameBuffer;
use crate::hittable::{HitRecord, SurfaceKind, TracePolicy};
use crate::ray::Ray;
use crate::scene::{Scene, SceneError};
use crate::shading::{shade_plane, shade_sphere, Color};

/// Sub-pixel sample positions, in pixel units from the pixel's top-left
/// corner. The pixel color is the mean over all offsets.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePattern {
    offsets: Vec<(f32, f32)>,
}

impl SamplePattern {
    /// Create a pattern; at least one finite offset is required.
    pub fn new(offsets: Vec<(f32, f32)>) -> Result<Self, SceneError> {
        if offsets.is_empty() {
            return Err(SceneError::EmptySamplePattern);
        }
        if offsets.iter().any(|(dx, dy)| !(dx.is_finite() && dy.is_finite())) {
            return Err(SceneError::NonFinite("sample offset"));
        }
        Ok(Self { offsets })
    }

    /// One sample through the pixel center.
    pub fn center() -> Self {
        Self {
            offsets: vec![(0.5, 0.5)],
        }
    }

    /// Offsets in sampling order.
    pub fn offsets(&self) -> &[(f32, f32)] {
        &self.offsets
    }

    /// Number of samples per pixel.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Always false; patterns are never empty.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl Default for SamplePattern {
    /// 2×2 grid centered on the pixel.
    fn default() -> Self {
        Self {
            offsets: vec![(0.25, 0.25), (0.75, 0.25), (0.75, 0.75), (0.25, 0.75)],
        }
    }
}

/// Knobs for one render call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    /// Intersection policies
    pub policy: TracePolicy,
    /// Supersampling pattern
    pub pattern: SamplePattern,
    /// Draw a progress bar on stderr
    pub progress: bool,
}

/// Casts rays into one immutable scene.
///
/// Stateless between pixels; every pixel can be computed in any order.
#[derive(Debug, Clone, Copy)]
pub struct RayCaster<'a> {
    scene: &'a Scene,
    options: &'a RenderOptions,
}

impl<'a> RayCaster<'a> {
    /// Create a caster for `scene`.
    pub fn new(scene: &'a Scene, options: &'a RenderOptions) -> Self {
        Self { scene, options }
    }

    /// Color seen along a single ray.
    pub fn cast(&self, r: &Ray) -> Color {
        let mut rec = HitRecord::default();
        if !self.scene.hit(r, self.options.policy.hit, &mut rec) {
            return self.scene.background();
        }

        match rec.kind {
            SurfaceKind::Sphere => shade_sphere(self.scene, &rec, r.origin),
            SurfaceKind::Plane => shade_plane(self.scene, &rec, r, self.options.policy),
        }
    }

    /// Mean color of the pattern's samples for pixel (`col`, `row`).
    pub fn pixel_color(&self, plane: &ImagePlane, res: Resolution, col: u32, row: u32) -> Color {
        let camera = self.scene.camera();
        let pattern = &self.options.pattern;

        let sum: Color = pattern
            .offsets()
            .iter()
            .map(|&(dx, dy)| self.cast(&camera.ray(plane, res, col as f32 + dx, row as f32 + dy)))
            .sum();

        sum / pattern.len() as f32
    }

    /// Render the whole frame.
    ///
    /// Rows and pixels are shaded in parallel on the rayon pool.
    pub fn render(&self, res: Resolution) -> FrameBuffer {
        let plane = self.scene.camera().image_plane(res);

        info!(
            "Rendering {}x{} with {} samples per pixel on {} threads",
            res.width,
            res.height,
            self.options.pattern.len(),
            rayon::current_num_threads()
        );
        debug!("Image plane {:?}, policy {:?}", plane, self.options.policy);

        let generation_start = std::time::Instant::now();
        let pb = if self.options.progress {
            ProgressBar::new(res.pixel_count())
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} ETA: {eta}");
        if let Ok(style) = style {
            pb.set_style(style);
        }

        let frame = FrameBuffer::par_fill(res, |col, row| {
            let c = self.pixel_color(&plane, res, col, row);
            pb.inc(1);
            c
        });

        pb.finish();
        info!("Image generated in {:.2?}", generation_start.elapsed());

        frame
    }
}

//! Pinhole camera and primary ray generation.

use glam::Vec3A;

use crate::ray::Ray;
use crate::scene::SceneError;

/// Target image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// Number of pixel columns
    pub width: u32,
    /// Number of pixel rows
    pub height: u32,
}

impl Resolution {
    /// Create a resolution; both dimensions must be positive.
    pub fn new(width: u32, height: u32) -> Result<Self, SceneError> {
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyResolution { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
        }
    }
}

/// Extents of the image plane along the camera's right and up axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlane {
    /// Coordinate of the first column along `right`
    pub left: f32,
    /// Coordinate one past the last column along `right`
    pub right: f32,
    /// Coordinate one past the last row along `up`
    pub bottom: f32,
    /// Coordinate of the first row along `up`
    pub top: f32,
}

/// Pinhole camera.
///
/// The image plane sits `focal_distance` in front of the eye along `view`,
/// spanned by the `right`/`up` basis. Fields are public for inspection; build
/// cameras through [`Camera::new`] so the basis is orthonormal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub eye: Vec3A,
    /// Unit view direction (w)
    pub view: Vec3A,
    /// Unit up vector, orthogonal to `view` (v)
    pub up: Vec3A,
    /// Unit right vector, `view × up` (u)
    pub right: Vec3A,
    /// Distance from the eye to the image plane
    pub focal_distance: f32,
    /// Half the image plane height; the width follows the aspect ratio
    pub half_height: f32,
}

impl Camera {
    /// Build a camera from an eye, a view direction and an approximate up
    /// vector. `up` is re-orthogonalized against `view`.
    pub fn new(
        eye: Vec3A,
        view: Vec3A,
        up: Vec3A,
        focal_distance: f32,
    ) -> Result<Self, SceneError> {
        if !eye.is_finite() {
            return Err(SceneError::NonFinite("camera eye"));
        }
        if !(focal_distance.is_finite() && focal_distance > 0.0) {
            return Err(SceneError::InvalidFocalDistance(focal_distance));
        }

        let w = view
            .try_normalize()
            .ok_or(SceneError::DegenerateCamera("view direction is zero"))?;
        let u = w
            .cross(up)
            .try_normalize()
            .ok_or(SceneError::DegenerateCamera("up vector is parallel to the view"))?;
        let v = u.cross(w);

        Ok(Self {
            eye,
            view: w,
            up: v,
            right: u,
            focal_distance,
            half_height: 1.0,
        })
    }

    /// Same camera with a different image plane half height.
    pub fn with_half_height(mut self, half_height: f32) -> Result<Self, SceneError> {
        if !(half_height.is_finite() && half_height > 0.0) {
            return Err(SceneError::DegenerateCamera("image plane half height must be positive"));
        }
        self.half_height = half_height;
        Ok(self)
    }

    pub(crate) fn validate(&self) -> Result<(), SceneError> {
        let unit = |a: Vec3A| (a.length() - 1.0).abs() < 1e-4;
        let orthogonal = |a: Vec3A, b: Vec3A| a.dot(b).abs() < 1e-4;
        let orthonormal = unit(self.view)
            && unit(self.up)
            && unit(self.right)
            && orthogonal(self.view, self.up)
            && orthogonal(self.view, self.right)
            && orthogonal(self.up, self.right);
        if !orthonormal {
            return Err(SceneError::DegenerateCamera("basis is not orthonormal"));
        }
        if !(self.focal_distance.is_finite() && self.focal_distance > 0.0) {
            return Err(SceneError::InvalidFocalDistance(self.focal_distance));
        }
        if !(self.half_height.is_finite() && self.half_height > 0.0) {
            return Err(SceneError::DegenerateCamera("image plane half height must be positive"));
        }
        Ok(())
    }

    /// Image plane extents for `res`: ±half_height vertically, scaled by the
    /// aspect ratio horizontally.
    pub fn image_plane(&self, res: Resolution) -> ImagePlane {
        let half_width = self.half_height * res.aspect_ratio();
        ImagePlane {
            left: -half_width,
            right: half_width,
            bottom: -self.half_height,
            top: self.half_height,
        }
    }

    /// Primary ray through the image plane at pixel coordinates (`x`, `y`).
    ///
    /// `x` counts columns from the left edge and `y` rows from the top edge,
    /// so (col + 0.5, row + 0.5) is the center of a pixel.
    pub fn ray(&self, plane: &ImagePlane, res: Resolution, x: f32, y: f32) -> Ray {
        let step_u = (plane.right - plane.left) / res.width as f32;
        let step_v = (plane.top - plane.bottom) / res.height as f32;

        let u = plane.left + x * step_u;
        let v = plane.top - y * step_v;

        let pixel = self.eye + self.focal_distance * self.view + u * self.right + v * self.up;
        Ray::toward(self.eye, pixel)
    }
}

impl Default for Camera {
    /// Eye at (0, 0, 1) looking down -Z with +Y up, image plane through the origin.
    fn default() -> Self {
        Self {
            eye: Vec3A::new(0.0, 0.0, 1.0),
            view: Vec3A::NEG_Z,
            up: Vec3A::Y,
            right: Vec3A::X,
            focal_distance: 1.0,
            half_height: 1.0,
        }
    }
}

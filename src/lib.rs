//! phongtrace ray tracer
//!
//! Casts rays from a pinhole camera into a scene of spheres over a ground
//! plane lit by one point light. Surfaces are Phong shaded; the plane adds
//! hard shadows and a single mirror bounce off the spheres. The finished
//! linear frame is written as PNG, BMP or EXR, or previewed in TEV.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod camera;
pub mod config;
pub mod framebuffer;
pub mod hittable;
pub mod interval;
pub mod output;
pub mod plane;
pub mod ray;
pub mod render;
pub mod scene;
pub mod shading;
pub mod sphere;

//! # Output Module
//!
//! Hands a finished [`FrameBuffer`] to an external sink:
//! - PNG and BMP files, quantized to 8 bits per channel
//! - OpenEXR files with the linear f32 values untouched
//! - The TEV image viewer over TCP, as an on-screen preview
//!
//! The render core never clamps; all clamping and encoding happens here.

use std::net::TcpStream;
use std::path::Path;

use exr::prelude::write_rgb_file;
use image::{ImageBuffer, Rgb};
use log::{debug, info};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::framebuffer::FrameBuffer;

/// Port TEV listens on when the address omits one.
pub const TEV_DEFAULT_PORT: u16 = 14158;

/// Name of the image shown in TEV.
const TEV_IMAGE_NAME: &str = "phongtrace_output";

/// Errors raised while delivering a frame to a sink.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// The output path has no extension we can encode.
    #[error("unsupported output extension '{0}' (expected .png, .bmp or .exr)")]
    UnsupportedExtension(String),

    /// PNG/BMP encoding or file I/O failed.
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    /// EXR encoding or file I/O failed.
    #[error("failed to write EXR: {0}")]
    Exr(#[from] exr::error::Error),

    /// No TEV instance reachable at the address.
    #[error("failed to connect to TEV at {address}: {source}")]
    TevConnect {
        /// Address that was tried
        address: String,
        /// Underlying socket error
        source: std::io::Error,
    },

    /// TEV accepted the connection but a packet failed.
    #[error("failed to send image to TEV: {0}")]
    Tev(std::io::Error),
}

/// Transfer curve applied before 8-bit quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Clamp to [0, 1] and scale to [0, 255].
    #[default]
    Linear,
    /// Clamp, then apply the sRGB curve before scaling.
    Srgb,
}

impl Encoding {
    fn apply(self, linear: f32) -> f32 {
        let linear = linear.clamp(0.0, 1.0);
        match self {
            Encoding::Linear => linear,
            Encoding::Srgb if linear <= 0.0031308 => 12.92 * linear,
            Encoding::Srgb => 1.055 * linear.powf(1.0 / 2.4) - 0.055,
        }
    }
}

/// File formats the sinks can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// 8-bit PNG
    Png,
    /// 8-bit BMP
    Bmp,
    /// 32-bit float OpenEXR
    Exr,
}

impl Format {
    /// Pick the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, OutputError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(Format::Png),
            "bmp" => Ok(Format::Bmp),
            "exr" => Ok(Format::Exr),
            _ => Err(OutputError::UnsupportedExtension(ext)),
        }
    }
}

/// Write `frame` to `path`, choosing the format from the extension.
pub fn save(frame: &FrameBuffer, path: &Path, encoding: Encoding) -> Result<(), OutputError> {
    match Format::from_path(path)? {
        Format::Png | Format::Bmp => save_ldr(frame, path, encoding),
        Format::Exr => save_exr(frame, path),
    }
}

/// Quantize an HDR frame to 8 bits per channel.
///
/// Out-of-range values are clamped: overexposed areas become white and
/// negative values black.
pub fn to_ldr(frame: &FrameBuffer, encoding: Encoding) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let c = frame.pixel(x, y);
        let quantize = |v: f32| (encoding.apply(v) * 255.0).round() as u8;
        Rgb([quantize(c.x), quantize(c.y), quantize(c.z)])
    })
}

fn save_ldr(frame: &FrameBuffer, path: &Path, encoding: Encoding) -> Result<(), OutputError> {
    to_ldr(frame, encoding).save(path)?;
    info!("Image saved as {}", path.display());
    Ok(())
}

/// Save the frame as EXR with full HDR precision, no clamping or gamma.
pub fn save_exr(frame: &FrameBuffer, path: &Path) -> Result<(), OutputError> {
    let width = frame.width() as usize;
    let height = frame.height() as usize;

    write_rgb_file(path, width, height, |x, y| {
        let c = frame.pixel(x as u32, y as u32);
        (c.x, c.y, c.z)
    })?;

    info!("HDR image saved as EXR: {}", path.display());
    Ok(())
}

/// Append the default TEV port when `address` has none.
pub fn tev_address(address: &str) -> String {
    if address.contains(':') {
        address.to_string()
    } else {
        format!("{}:{}", address, TEV_DEFAULT_PORT)
    }
}

/// Convert interleaved RGB to the planar RRR...GGG...BBB layout TEV expects.
pub fn planar_channels(frame: &FrameBuffer) -> Vec<f32> {
    let raw = frame.image().as_raw();
    (0..3)
        .flat_map(|channel| raw.iter().skip(channel).step_by(3).copied())
        .collect()
}

/// Send the frame to a running TEV instance for preview.
pub fn send_to_tev(frame: &FrameBuffer, address: &str) -> Result<(), OutputError> {
    let address = tev_address(address);
    debug!("Attempting to connect to TEV at {}", address);

    let stream = TcpStream::connect(&address).map_err(|source| OutputError::TevConnect {
        address: address.clone(),
        source,
    })?;
    if let Err(e) = stream.set_nodelay(true) {
        debug!("Failed to set TCP_NODELAY: {}", e);
    }
    let mut client = TevClient::wrap(stream);

    let (width, height) = (frame.width(), frame.height());
    client
        .send(PacketCreateImage {
            image_name: TEV_IMAGE_NAME,
            width,
            height,
            channel_names: &["R", "G", "B"],
            grab_focus: true,
        })
        .map_err(OutputError::Tev)?;

    let data = planar_channels(frame);
    let plane_len = width as u64 * height as u64;
    let megabytes = data.len() as f32 * 4.0 / 1_000_000.0;
    debug!("Sending {} pixels to TEV ({:.1} MB)", plane_len, megabytes);

    let start_time = std::time::Instant::now();
    client
        .send(PacketUpdateImage {
            image_name: TEV_IMAGE_NAME,
            grab_focus: false,
            channel_names: &["R", "G", "B"],
            x: 0,
            y: 0,
            width,
            height,
            channel_offsets: &[0, plane_len, 2 * plane_len],
            channel_strides: &[1, 1, 1],
            data: &data,
        })
        .map_err(OutputError::Tev)?;

    info!(
        "Image sent to TEV at {} in {:.2?}",
        address,
        start_time.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Resolution;
    use crate::shading::Color;

    fn gradient() -> FrameBuffer {
        FrameBuffer::par_fill(Resolution::new(4, 2).unwrap(), |col, row| {
            Color::new(col as f32 * 0.5 - 0.5, row as f32, 2.0)
        })
    }

    #[test]
    fn ldr_clamps_out_of_range_values() {
        let ldr = to_ldr(&gradient(), Encoding::Linear);
        assert_eq!(ldr.get_pixel(0, 0).0, [0, 0, 255]);
        assert_eq!(ldr.get_pixel(2, 1).0, [128, 255, 255]);
        assert_eq!(ldr.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn srgb_brightens_midtones() {
        let frame = FrameBuffer::par_fill(Resolution::new(1, 1).unwrap(), |_, _| Color::splat(0.2));
        let linear = to_ldr(&frame, Encoding::Linear).get_pixel(0, 0).0[0];
        let srgb = to_ldr(&frame, Encoding::Srgb).get_pixel(0, 0).0[0];
        assert_eq!(linear, 51);
        assert!(srgb > 110 && srgb < 130, "{srgb}");
    }

    #[test]
    fn format_follows_extension() {
        let format = |name: &str| Format::from_path(Path::new(name)).unwrap();
        assert_eq!(format("out.PNG"), Format::Png);
        assert_eq!(format("a/b.bmp"), Format::Bmp);
        assert_eq!(format("hdr.exr"), Format::Exr);
        assert!(matches!(
            Format::from_path(Path::new("out.jpg")),
            Err(OutputError::UnsupportedExtension(ext)) if ext == "jpg"
        ));
        assert!(Format::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn saves_png_and_bmp_with_frame_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["frame.png", "frame.bmp"] {
            let path = dir.path().join(name);
            save(&gradient(), &path, Encoding::Linear).unwrap();
            let read = image::open(&path).unwrap();
            assert_eq!((read.width(), read.height()), (4, 2));
        }
    }

    #[test]
    fn saves_exr() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.exr");
        save(&gradient(), &path, Encoding::Linear).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn tev_layout_is_planar() {
        let frame = FrameBuffer::par_fill(Resolution::new(2, 1).unwrap(), |col, _| {
            Color::new(col as f32, 10.0 + col as f32, 20.0 + col as f32)
        });
        let expected = vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0];
        assert_eq!(planar_channels(&frame), expected);
        assert_eq!(tev_address("localhost"), "localhost:14158");
        assert_eq!(tev_address("10.0.0.2:9000"), "10.0.0.2:9000");
    }
}

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use phongtrace::camera::Resolution;
use phongtrace::config::RenderJob;
use phongtrace::hittable::{HitPolicy, ShadowTest};
use phongtrace::output::Encoding;
use phongtrace::scene::SceneError;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HitPolicyArg {
    /// First sphere in scene order wins
    FirstInList,
    /// Closest surface wins
    Nearest,
}

impl From<HitPolicyArg> for HitPolicy {
    fn from(arg: HitPolicyArg) -> Self {
        match arg {
            HitPolicyArg::FirstInList => HitPolicy::FirstInList,
            HitPolicyArg::Nearest => HitPolicy::Nearest,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ShadowTestArg {
    /// Any sphere along the light direction shadows
    Discriminant,
    /// Only spheres between the point and the light shadow
    Bounded,
}

impl From<ShadowTestArg> for ShadowTest {
    fn from(arg: ShadowTestArg) -> Self {
        match arg {
            ShadowTestArg::Discriminant => ShadowTest::Discriminant,
            ShadowTestArg::Bounded => ShadowTest::Bounded,
        }
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Debug, Parser)]
#[command(name = "phongtrace")]
#[command(about = "Ray trace spheres over a mirror-ish ground plane with Phong shading")]
pub struct Args {
    /// Scene file (TOML); the built-in demo scene when omitted
    #[arg(short, long)]
    pub scene: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,

    /// Image width in pixels, overriding the scene file
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels, overriding the scene file
    #[arg(long)]
    pub height: Option<u32>,

    /// Output file path (.png/.bmp for 8-bit, .exr for HDR linear)
    #[arg(short, long, default_value = "out.png")]
    pub output: PathBuf,

    /// Sphere selection policy, overriding the scene file
    #[arg(long, value_enum)]
    pub hit_policy: Option<HitPolicyArg>,

    /// Shadow probe rule, overriding the scene file
    #[arg(long, value_enum)]
    pub shadow_test: Option<ShadowTestArg>,

    /// Apply the sRGB curve when writing 8-bit images
    #[arg(long)]
    pub srgb: bool,

    /// Send image to TEV for preview
    #[arg(long)]
    pub tev: bool,

    /// TEV address, host[:port] (automatically enables --tev)
    #[arg(long)]
    pub tev_address: Option<String>,

    /// Do not draw the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl Args {
    /// Apply command line overrides on top of a loaded job.
    pub fn apply(&self, job: &mut RenderJob) -> Result<(), SceneError> {
        if self.width.is_some() || self.height.is_some() {
            job.resolution = Resolution::new(
                self.width.unwrap_or(job.resolution.width),
                self.height.unwrap_or(job.resolution.height),
            )?;
        }
        if let Some(policy) = self.hit_policy {
            job.options.policy.hit = policy.into();
        }
        if let Some(test) = self.shadow_test {
            job.options.policy.shadow = test.into();
        }
        job.options.progress = !self.no_progress;
        Ok(())
    }

    /// TEV address to preview on, if preview was requested.
    pub fn tev_target(&self) -> Option<&str> {
        match (&self.tev_address, self.tev) {
            (Some(address), _) => Some(address.as_str()),
            (None, true) => Some("localhost"),
            (None, false) => None,
        }
    }

    pub fn encoding(&self) -> Encoding {
        if self.srgb {
            Encoding::Srgb
        } else {
            Encoding::Linear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_render_demo_to_png() {
        let args = Args::try_parse_from(["phongtrace"]).unwrap();
        assert!(args.scene.is_none());
        assert_eq!(args.output, PathBuf::from("out.png"));
        assert_eq!(args.tev_target(), None);
        assert_eq!(args.encoding(), Encoding::Linear);

        let mut job = RenderJob::demo();
        args.apply(&mut job).unwrap();
        assert_eq!(job.resolution, Resolution::default());
        assert!(job.options.progress);
    }

    #[test]
    fn flags_override_job() {
        let args = Args::try_parse_from([
            "phongtrace",
            "--width",
            "64",
            "--hit-policy",
            "nearest",
            "--shadow-test",
            "bounded",
            "--no-progress",
            "--tev-address",
            "10.0.0.2",
        ])
        .unwrap();

        let mut job = RenderJob::demo();
        args.apply(&mut job).unwrap();
        assert_eq!(job.resolution, Resolution::new(64, 480).unwrap());
        assert_eq!(job.options.policy.hit, HitPolicy::Nearest);
        assert_eq!(job.options.policy.shadow, ShadowTest::Bounded);
        assert!(!job.options.progress);
        assert_eq!(args.tev_target(), Some("10.0.0.2"));
    }

    #[test]
    fn zero_width_is_rejected() {
        let args = Args::try_parse_from(["phongtrace", "--width", "0"]).unwrap();
        let mut job = RenderJob::demo();
        assert!(args.apply(&mut job).is_err());
    }
}

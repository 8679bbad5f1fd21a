use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

mod cli;
mod logger;

use cli::Args;
use logger::init_logger;
use phongtrace::config::{RenderJob, SceneConfig};
use phongtrace::output::{save, send_to_tev};
use phongtrace::render::RayCaster;

fn main() -> Result<()> {
    let args = Args::parse();

    init_logger(args.log_level.clone().into());

    // Log application startup with version information
    info!(
        "phongtrace - Git Version {} ({})",
        env!("GIT_HASH"),
        env!("GIT_DATE")
    );

    let mut job = match &args.scene {
        Some(path) => SceneConfig::load(path)
            .and_then(|config| config.build())
            .with_context(|| format!("failed to load scene {}", path.display()))?,
        None => {
            info!("No scene file given, rendering the built-in demo scene");
            RenderJob::demo()
        }
    };
    args.apply(&mut job).context("invalid command line overrides")?;

    info!(
        "Scene: {} sphere(s), hit policy {:?}, shadow test {:?}",
        job.scene.spheres().len(),
        job.options.policy.hit,
        job.options.policy.shadow
    );

    let frame = RayCaster::new(&job.scene, &job.options).render(job.resolution);
    if !frame.is_finite() {
        warn!("Rendered frame contains NaN or infinite values");
    }

    // Preview failures never stop the file from being written
    if let Some(address) = args.tev_target() {
        if let Err(e) = send_to_tev(&frame, address) {
            warn!("{}", e);
        }
    }

    save(&frame, &args.output, args.encoding())
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    Ok(())
}

use anyhow::{Context, Result};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use shp2geojson::{run, Config};

fn main() -> Result<()> {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_target(false)
            .finish(),
    )
    .context("installing log subscriber")?;

    // failures are logged by `run`, the exit status stays 0
    let report = run(&Config::default());
    if report.is_success() {
        info!("Converted {} datasets", report.converted().count());
    }
    Ok(())
}

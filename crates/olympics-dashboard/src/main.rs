mod bootstrap;
mod render;
mod settings;

use std::sync::Arc;

use anyhow::Result;
use olympics_runtime::data_manager::{CsvDirectorySource, DataStore};
use olympics_runtime::session::DashboardSession;

use crate::render::OutputFormat;
use crate::settings::Settings;

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level, settings.log_file.as_ref())?;

    tracing::info!("Olympics dashboard v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = bootstrap::discover_data_dir(settings.data_dir.as_deref())?;
    tracing::info!(data_dir = %data_dir.display(), page = %settings.page, "loading datasets");

    let store = Arc::new(DataStore::new(CsvDirectorySource::new(&data_dir)));
    let mut session = DashboardSession::new(store);
    settings.apply(&mut session)?;

    let format = OutputFormat::from_flag(&settings.format);
    let output = if settings.list_filters {
        render::render_filters(&session.filter_options(), format)?
    } else {
        render::render(&session.render(), format)?
    };
    println!("{output}");

    Ok(())
}

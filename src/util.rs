use std::path::PathBuf;

use crate::{
    browser::Session,
    config::ScrapeOptions,
    output, pipeline,
    target::Target,
};

/// `pretty_env_logger` at `info` unless `RUST_LOG` says otherwise.
pub fn init_logger() {
    let mut builder = pretty_env_logger::formatted_timed_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    builder.init();
}

/// Launches chrome, scrapes `target` and writes the records. Returns where
/// they were written.
pub async fn scrape_to_file(target: &Target, opts: &ScrapeOptions) -> anyhow::Result<PathBuf> {
    let cfg = opts.scrape_config();
    let path = opts
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(target.default_output().as_str()));

    tracing::info!(target: "main", "scraping {target} from {}", cfg.site);
    let session = Session::launch(&opts.launch_config())?;
    let records = pipeline::run(&session.page, target, &cfg).await?;
    drop(session);

    output::write_records(&path, &records)?;
    Ok(path)
}

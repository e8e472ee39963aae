use ascr::{config::ScrapeOptions, target::Target};

/// Scrape every alternative listed for one program on alternativeto.net.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Software slug as it appears in `/software/<slug>/`, e.g. `snaptube`.
    software: compact_str::CompactString,
    #[command(flatten)]
    opts: ScrapeOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    ascr::util::init_logger();

    let args = Args::parse();
    let target = Target::Alternatives {
        software: args.software,
    };

    let path = ascr::util::scrape_to_file(&target, &args.opts).await?;
    tracing::info!(target: "main", "\x1b[1;36mdone\x1b[0m: {}", path.display());

    Ok(())
}

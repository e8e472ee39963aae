use ascr::{
    config::ScrapeOptions,
    target::{DEFAULT_SECTION, Target},
};

/// Scrape every program filed under a category tag on alternativeto.net.
#[derive(clap::Parser)]
#[command(version)]
struct Args {
    /// Category tag as it appears in `/category/<section>/<tag>/`, e.g. `vpn`.
    tag: compact_str::CompactString,
    #[arg(long, env = "ASCR_SECTION", default_value = DEFAULT_SECTION)]
    section: compact_str::CompactString,
    #[command(flatten)]
    opts: ScrapeOptions,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use clap::Parser;

    ascr::util::init_logger();

    let args = Args::parse();
    let target = Target::Category {
        section: args.section,
        tag: args.tag,
    };

    let path = ascr::util::scrape_to_file(&target, &args.opts).await?;
    tracing::info!(target: "main", "\x1b[1;36mdone\x1b[0m: {}", path.display());

    Ok(())
}

use core::time::Duration;
use std::path::PathBuf;

use crate::{browser::LaunchConfig, delay::Jitter, retry::RetryPolicy, target::DEFAULT_SITE};

/// Knobs that hold for both entry points. Every flag may also come from the
/// environment.
#[derive(clap::Args, Clone, Debug)]
pub struct ScrapeOptions {
    /// Site origin to scrape.
    #[arg(long, env = "ASCR_SITE", default_value = DEFAULT_SITE)]
    pub site: String,

    /// Run chrome without a window.
    #[arg(long, env = "ASCR_HEADLESS")]
    pub headless: bool,

    /// Proxy server handed to chrome, e.g. `http://127.0.0.1:8080`.
    #[arg(long, env = "ASCR_PROXY")]
    pub proxy: Option<String>,

    #[arg(long, env = "ASCR_WINDOW_SIZE", value_name = "WxH", default_value = "1920x1080", value_parser = parse_window_size)]
    pub window_size: (u32, u32),

    /// Navigation attempts per URL before it is skipped.
    #[arg(long, env = "ASCR_RETRIES", default_value_t = 3)]
    pub retries: u32,

    /// Pause between navigation attempts.
    #[arg(long, env = "ASCR_RETRY_WAIT_SECS", default_value_t = 10)]
    pub retry_wait_secs: u64,

    /// How long to wait for listing items or a detail title to appear.
    #[arg(long, env = "ASCR_WAIT_TIMEOUT_SECS", default_value_t = 30)]
    pub wait_timeout_secs: u64,

    /// Pause after each listing page, in milliseconds (`MIN-MAX` or `N`).
    #[arg(long, env = "ASCR_PAGE_DELAY", default_value = "1000-3000")]
    pub page_delay: Jitter,

    /// Pause between listing items, in milliseconds.
    #[arg(long, env = "ASCR_ITEM_DELAY", default_value = "500-1200")]
    pub item_delay: Jitter,

    /// Pause after each detail page, in milliseconds.
    #[arg(long, env = "ASCR_DETAIL_DELAY", default_value = "2000-5000")]
    pub detail_delay: Jitter,

    /// Stop paginating after this many listing pages.
    #[arg(long, env = "ASCR_MAX_PAGES")]
    pub max_pages: Option<u32>,

    /// Visit at most this many detail pages.
    #[arg(long, env = "ASCR_LIMIT")]
    pub limit: Option<usize>,

    /// Output file; defaults to a name derived from the target.
    #[arg(short, long, env = "ASCR_OUTPUT", value_name = "file")]
    pub output: Option<PathBuf>,
}

fn parse_window_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got {s:?}"))?;
    let dim = |x: &str| {
        x.trim()
            .parse::<u32>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("invalid dimension {x:?}"))
    };
    Ok((dim(w)?, dim(h)?))
}

/// Timing and pagination settings the pipeline runs with.
#[derive(Clone, Debug)]
pub struct ScrapeConfig {
    pub site: String,
    pub retry: RetryPolicy,
    pub wait_timeout: Duration,
    pub page_delay: Jitter,
    pub item_delay: Jitter,
    pub detail_delay: Jitter,
    pub max_pages: Option<u32>,
    pub limit: Option<usize>,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            site: DEFAULT_SITE.to_owned(),
            retry: RetryPolicy::default(),
            wait_timeout: const { Duration::from_secs(30) },
            page_delay: Jitter::new(1000, 3000),
            item_delay: Jitter::new(500, 1200),
            detail_delay: Jitter::new(2000, 5000),
            max_pages: None,
            limit: None,
        }
    }
}

impl ScrapeOptions {
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            site: self.site.clone(),
            retry: RetryPolicy {
                attempts: self.retries,
                wait: Duration::from_secs(self.retry_wait_secs),
            },
            wait_timeout: Duration::from_secs(self.wait_timeout_secs),
            page_delay: self.page_delay,
            item_delay: self.item_delay,
            detail_delay: self.detail_delay,
            max_pages: self.max_pages,
            limit: self.limit,
        }
    }

    pub fn launch_config(&self) -> LaunchConfig {
        LaunchConfig {
            headless: self.headless,
            proxy: self.proxy.clone(),
            window_size: self.window_size,
            navigation_timeout: Duration::from_secs(self.wait_timeout_secs),
        }
    }
}

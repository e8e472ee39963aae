use std::{ffi::OsStr, sync::Arc, time::Duration};

use anyhow::Context;
use headless_chrome::{Browser, LaunchOptions, Tab, browser::tab::NoElementFound};
use tokio::{
    task::spawn_blocking,
    time::{Instant, sleep},
};

/// The three things the scraper needs from a browser tab.
#[allow(async_fn_in_trait)]
pub trait Page {
    /// Loads `url` and waits for the navigation to settle.
    async fn goto(&self, url: &str) -> anyhow::Result<()>;

    /// Resolves once `selector` matches something, or fails after `timeout`.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> anyhow::Result<()>;

    /// Serialized DOM of the current page.
    async fn content(&self) -> anyhow::Result<String>;
}

#[derive(Clone, Debug)]
pub struct LaunchConfig {
    pub headless: bool,
    pub proxy: Option<String>,
    pub window_size: (u32, u32),
    pub navigation_timeout: Duration,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            headless: false,
            proxy: None,
            window_size: (1920, 1080),
            navigation_timeout: const { Duration::from_secs(30) },
        }
    }
}

// Must outlast the longest backoff sleep plus detail jitter.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

pub fn puppeteer(cfg: &LaunchConfig) -> anyhow::Result<Browser> {
    Browser::new(LaunchOptions {
        args: vec![OsStr::new("--disable-blink-features=AutomationControlled")],
        headless: cfg.headless,
        window_size: Some(cfg.window_size),
        proxy_server: cfg.proxy.as_deref(),
        idle_browser_timeout: IDLE_TIMEOUT,
        ..LaunchOptions::default()
    })
}

#[allow(clippy::significant_drop_tightening)]
pub fn first_tab(browser: &Browser) -> anyhow::Result<Arc<Tab>> {
    let tab = browser.new_tab()?;

    {
        let tabs_guard = browser
            .get_tabs()
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        for remain in &*tabs_guard {
            if !Arc::ptr_eq(&tab, remain) {
                remain.close(true)?;
            }
        }
    }

    Ok(tab)
}

pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>, navigation_timeout: Duration) -> Self {
        tab.set_default_timeout(navigation_timeout);
        Self { tab }
    }
}

impl Page for ChromePage {
    async fn goto(&self, url: &str) -> anyhow::Result<()> {
        let tab = self.tab.clone();
        let url = url.to_owned();

        spawn_blocking(move || {
            tab.navigate_to(&url)?.wait_until_navigated()?;
            anyhow::Ok(())
        })
        .await?
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> anyhow::Result<()> {
        const PERIOD: Duration = Duration::from_millis(1832 / 4);

        let deadline = Instant::now() + timeout;
        loop {
            let tab = self.tab.clone();
            let owned = selector.to_owned();
            let found = spawn_blocking(move || tab.find_element(&owned).map(|_| ())).await?;

            match found {
                Ok(()) => break Ok(()),
                Err(err) if !err.is::<NoElementFound>() => break Err(err),
                Err(_) => (),
            }

            if Instant::now() >= deadline {
                anyhow::bail!("no {selector:?} after {timeout:?}");
            }
            sleep(PERIOD).await;
        }
    }

    async fn content(&self) -> anyhow::Result<String> {
        let tab = self.tab.clone();
        spawn_blocking(move || tab.get_content()).await?
    }
}

/// A running browser and the single tab the scrape drives. Dropping it kills
/// the browser process.
pub struct Session {
    _browser: Browser,
    pub page: ChromePage,
}

impl Session {
    pub fn launch(cfg: &LaunchConfig) -> anyhow::Result<Self> {
        tracing::info!(
            target: "browser",
            "launching chrome ({}x{}, headless = {}, proxy = {:?})",
            cfg.window_size.0,
            cfg.window_size.1,
            cfg.headless,
            cfg.proxy,
        );
        let browser = puppeteer(cfg).context("failed to launch chrome")?;
        let tab = first_tab(&browser).context("failed to open a tab")?;
        Ok(Self {
            _browser: browser,
            page: ChromePage::new(tab, cfg.navigation_timeout),
        })
    }
}

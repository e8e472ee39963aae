use hashbrown::HashSet;
use url::Url;

use crate::{
    browser::Page,
    config::ScrapeConfig,
    extract::{self, DETAIL_TITLE, LISTING_ITEM, Selectors},
    model::{ListingEntry, SoftwareInfo},
    retry::safe_get,
    target::Target,
};

/// Walks `?p=1, 2, ...` collecting listing entries until a page fails to
/// load, shows no items, or adds nothing new. Entries come back in discovery
/// order, deduplicated by link.
pub async fn collect_links<P: Page>(
    page: &P,
    target: &Target,
    cfg: &ScrapeConfig,
    sel: &Selectors,
) -> Vec<ListingEntry> {
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for page_num in 1.. {
        if let Some(max) = cfg.max_pages.filter(|&max| page_num > max) {
            tracing::info!(target: "listing", "reached page cap {max}, stopping");
            break;
        }

        let url = target.page_url(&cfg.site, page_num);
        tracing::info!(target: "listing", "\x1b[33mvisiting\x1b[0m {url}");
        if !safe_get(page, &url, cfg.retry).await {
            tracing::warn!(target: "listing", "[Page #{page_num}] {url} unreachable, stopping");
            break;
        }
        cfg.page_delay.sleep().await;

        if let Err(e) = page.wait_for(LISTING_ITEM, cfg.wait_timeout).await {
            tracing::warn!(target: "listing", "[Page #{page_num}] no item list: {e}");
            break;
        }
        let html = match page.content().await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(target: "listing", "[Page #{page_num}] err: {e:?}");
                break;
            }
        };

        let page_url = match Url::parse(&url) {
            Ok(u) => u,
            Err(e) => {
                tracing::error!(target: "listing", "[Page #{page_num}] bad url {url:?}: {e}");
                break;
            }
        };
        let listing = extract::parse_listing(&html, &page_url, sel);
        if listing.entries.is_empty() {
            tracing::info!(target: "listing", "[Page #{page_num}] no entries, stopping");
            break;
        }

        let before = entries.len();
        let mut first = true;
        for entry in listing.entries {
            if !first {
                cfg.item_delay.sleep().await;
            }
            first = false;
            if seen.insert(entry.link.clone()) {
                entries.push(entry);
            }
        }
        let added = entries.len() - before;
        tracing::info!(
            target: "listing",
            "\x1b[36m[Page #{page_num}] +{added} entries ({} malformed, {} total)\x1b[0m",
            listing.malformed,
            entries.len(),
        );
        if added == 0 {
            tracing::info!(target: "listing", "[Page #{page_num}] nothing new, stopping");
            break;
        }
    }

    tracing::info!(target: "listing", "collected {} links", entries.len());
    entries
}

/// Visits each entry's about page and extracts its fields. Entries whose page
/// cannot be loaded or never renders a title are skipped.
pub async fn collect_details<P: Page>(
    page: &P,
    entries: &[ListingEntry],
    cfg: &ScrapeConfig,
    sel: &Selectors,
) -> Vec<SoftwareInfo> {
    let entries = match cfg.limit {
        Some(limit) if limit < entries.len() => &entries[..limit],
        _ => entries,
    };
    let total = entries.len();
    let mut records = Vec::with_capacity(total);

    for (idx, entry) in entries.iter().enumerate() {
        let about = extract::about_url(&entry.link);
        tracing::info!(target: "detail", "{}/{total}: parsing {about}", idx + 1);

        if safe_get(page, &about, cfg.retry).await {
            match page.wait_for(DETAIL_TITLE, cfg.wait_timeout).await {
                Ok(()) => match page.content().await {
                    Ok(html) => records.push(extract::parse_detail(&html, &about, &entry.name, sel)),
                    Err(e) => tracing::warn!(target: "detail", "{about} err: {e:?}"),
                },
                Err(e) => tracing::warn!(target: "detail", "{about} has no title: {e}"),
            }
        } else {
            tracing::warn!(target: "detail", "{about} unreachable, skipping");
            continue;
        }

        cfg.detail_delay.sleep().await;
    }

    tracing::info!(target: "detail", "parsed {}/{total} entries", records.len());
    records
}

/// The whole scrape for one target. Fails only when the entry page itself
/// cannot be reached.
pub async fn run<P: Page>(page: &P, target: &Target, cfg: &ScrapeConfig) -> anyhow::Result<Vec<SoftwareInfo>> {
    let sel = Selectors::new()?;

    let base = target.base_url(&cfg.site);
    if !safe_get(page, &base, cfg.retry).await {
        anyhow::bail!("{base} unreachable after {} attempts", cfg.retry.attempts.max(1));
    }

    let entries = collect_links(page, target, cfg, &sel).await;
    Ok(collect_details(page, &entries, cfg, &sel).await)
}

//! Turning rendered HTML into records.
//!
//! Nothing here touches the browser: the pipeline hands over whatever
//! `document.documentElement.outerHTML` looked like once the page settled, so
//! every rule below can be checked against saved snapshots.

use compact_str::CompactString;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::model::{ListingEntry, SoftwareInfo};

pub const LISTING_ITEM: &str = r#"li[data-testid^="item-"]"#;
pub const DETAIL_TITLE: &str = "h1";

const BLOCKS: [&str; 6] = ["p", "div", "li", "ul", "ol", "section"];

pub struct Selectors {
    pub item: Selector,
    pub item_name: Selector,
    pub item_link: Selector,
    pub title: Selector,
    pub description: Selector,
    pub platform: Selector,
    pub external_link: Selector,
    pub button: Selector,
}

fn css(selector: &str) -> anyhow::Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow::anyhow!("bad selector {selector:?}: {e}"))
}

impl Selectors {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            item: css(LISTING_ITEM)?,
            item_name: css("h2")?,
            item_link: css(r#"a[href*="/software/"][href$="/about/"]"#)?,
            title: css(DETAIL_TITLE)?,
            description: css(r#"div[itemprop="description"]"#)?,
            platform: css(r#"ul[data-testid="platform-row"] li span"#)?,
            external_link: css(r#"a[data-testid="external-link"]"#)?,
            button: css("button")?,
        })
    }
}

#[derive(Debug, Default)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    /// Items that matched the row selector but had no `h2` or no about link.
    /// An `h2` with no text still counts as a name.
    pub malformed: usize,
}

/// Text of an element with all whitespace runs folded to one space.
pub fn inline_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for word in element.text().flat_map(str::split_whitespace) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

fn render_into(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                out.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
            }
            Node::Element(elem) if elem.name() == "br" => out.push('\n'),
            Node::Element(elem) => {
                let block = BLOCKS.contains(&elem.name());
                if block {
                    out.push('\n');
                }
                if let Some(inner) = ElementRef::wrap(child) {
                    render_into(inner, out);
                }
                if block {
                    out.push('\n');
                }
            }
            _ => (),
        }
    }
}

/// Rendered text of a block: `<br>` and block boundaries become line breaks,
/// each line is whitespace-folded, and empty lines are dropped.
pub fn block_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    render_into(element, &mut raw);

    let mut out = String::with_capacity(raw.len());
    for line in raw.lines() {
        let mut words = line.split_whitespace().peekable();
        if words.peek().is_none() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        for (i, word) in words.enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    out
}

/// Detail links on listing pages already point at `/about/`; anything else
/// gets it appended.
pub fn about_url(link: &str) -> String {
    if link.ends_with("/about/") {
        link.to_owned()
    } else {
        format!("{}/about", link.trim_end_matches('/'))
    }
}

pub fn parse_listing(html: &str, page_url: &Url, sel: &Selectors) -> ListingPage {
    let document = Html::parse_document(html);
    let mut page = ListingPage::default();

    for item in document.select(&sel.item) {
        let name = item.select(&sel.item_name).next().map(inline_text);
        let link = item
            .select(&sel.item_link)
            .next()
            .and_then(|a| a.attr("href"))
            .and_then(|href| page_url.join(href).ok());

        match (name, link) {
            (Some(name), Some(link)) => page.entries.push(ListingEntry {
                name: CompactString::from(name),
                link: link.into(),
            }),
            (name, link) => {
                tracing::warn!(
                    target: "listing",
                    "skipping item {:?}: name = {name:?}, link = {:?}",
                    item.attr("data-testid").unwrap_or_default(),
                    link.map(String::from),
                );
                page.malformed += 1;
            }
        }
    }

    page
}

pub fn parse_detail(html: &str, about_url: &str, fallback_name: &str, sel: &Selectors) -> SoftwareInfo {
    let document = Html::parse_document(html);

    let name = document
        .select(&sel.title)
        .next()
        .map(inline_text)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| fallback_name.to_owned());

    let description = document
        .select(&sel.description)
        .next()
        .map(block_text)
        .unwrap_or_default();

    let platforms = document
        .select(&sel.platform)
        .map(inline_text)
        .filter(|s| !s.is_empty())
        .collect();

    let mut official_website = String::new();
    let mut github = String::new();
    for a in document.select(&sel.external_link) {
        let href = a.attr("href").filter(|h| !h.is_empty());
        if a
            .select(&sel.button)
            .any(|btn| inline_text(btn).contains("Official Website"))
        {
            if let Some(url) = a.attr("title").filter(|t| !t.is_empty()).or(href) {
                url.clone_into(&mut official_website);
            }
        }
        if let Some(href) = href.filter(|h| h.contains("github.com")) {
            href.clone_into(&mut github);
        }
    }

    SoftwareInfo {
        name,
        link: about_url.to_owned(),
        description,
        platforms,
        official_website,
        github,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_url_appends_suffix() {
        assert_eq!(
            about_url("https://alternativeto.net/software/tor/about/"),
            "https://alternativeto.net/software/tor/about/"
        );
        assert_eq!(
            about_url("https://alternativeto.net/software/tor/"),
            "https://alternativeto.net/software/tor/about"
        );
        assert_eq!(
            about_url("https://alternativeto.net/software/tor"),
            "https://alternativeto.net/software/tor/about"
        );
    }

    #[test]
    fn block_text_breaks_on_blocks_and_br() {
        let html = Html::parse_fragment(
            "<div id=\"d\"><p>First   line\n   wraps</p><p>Second<br>Third</p>  <span>tail</span></div>",
        );
        let sel = Selector::parse("#d").unwrap();
        let div = html.select(&sel).next().unwrap();
        assert_eq!(block_text(div), "First line wraps\nSecond\nThird\ntail");
    }

    #[test]
    fn blank_heading_keeps_the_entry() {
        let sel = Selectors::new().unwrap();
        let url = Url::parse("https://alternativeto.net/category/security/vpn/").unwrap();
        let page = parse_listing(
            r#"<ul><li data-testid="item-x"><h2>  </h2><a href="/software/x/about/">i</a></li>
            <li data-testid="item-y"><a href="/software/y/about/">i</a></li></ul>"#,
            &url,
            &sel,
        );
        assert_eq!(page.entries.len(), 1);
        assert_eq!(page.entries[0].name.as_str(), "");
        assert_eq!(page.entries[0].link, "https://alternativeto.net/software/x/about/");
        assert_eq!(page.malformed, 1);
    }

    #[test]
    fn official_website_falls_back_to_href() {
        let sel = Selectors::new().unwrap();
        let html = r#"<html><body><h1>X</h1>
            <a data-testid="external-link" href="https://x.example/"><button>Official Website</button></a>
        </body></html>"#;
        let info = parse_detail(html, "u", "fallback", &sel);
        assert_eq!(info.official_website, "https://x.example/");
        assert!(info.github.is_empty());
    }

    #[test]
    fn empty_title_uses_listing_name() {
        let sel = Selectors::new().unwrap();
        let info = parse_detail("<h1>  </h1>", "u", "Listing Name", &sel);
        assert_eq!(info.name, "Listing Name");
        assert!(info.platforms.is_empty());
        assert!(info.description.is_empty());
    }
}

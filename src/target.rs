use core::fmt;

use compact_str::{CompactString, format_compact};

pub const DEFAULT_SITE: &str = "https://alternativeto.net";
pub const DEFAULT_SECTION: &str = "security";

/// Where a scrape starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// `/software/<software>/`: the alternatives of a single program.
    Alternatives { software: CompactString },
    /// `/category/<section>/<tag>/`: everything filed under a category tag.
    Category {
        section: CompactString,
        tag: CompactString,
    },
}

impl Target {
    pub fn base_url(&self, site: &str) -> String {
        let site = site.trim_end_matches('/');
        match self {
            Self::Alternatives { software } => format!("{site}/software/{software}/"),
            Self::Category { section, tag } => format!("{site}/category/{section}/{tag}/"),
        }
    }

    /// Page 1 is the bare base URL; later pages use the `p` query parameter.
    pub fn page_url(&self, site: &str, page: u32) -> String {
        let base = self.base_url(site);
        if page <= 1 {
            base
        } else {
            format!("{base}?p={page}")
        }
    }

    pub fn default_output(&self) -> CompactString {
        match self {
            Self::Alternatives { software } => format_compact!("{software}_alternatives.json"),
            Self::Category { tag, .. } => format_compact!("{tag}_alternativeto.json"),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alternatives { software } => write!(f, "alternatives of {software}"),
            Self::Category { section, tag } => write!(f, "category {section}/{tag}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternatives_urls() {
        let t = Target::Alternatives {
            software: "snaptube".into(),
        };
        assert_eq!(
            t.base_url(DEFAULT_SITE),
            "https://alternativeto.net/software/snaptube/"
        );
        assert_eq!(t.page_url(DEFAULT_SITE, 1), t.base_url(DEFAULT_SITE));
        assert_eq!(
            t.page_url("https://alternativeto.net/", 3),
            "https://alternativeto.net/software/snaptube/?p=3"
        );
        assert_eq!(t.default_output(), "snaptube_alternatives.json");
    }

    #[test]
    fn category_urls() {
        let t = Target::Category {
            section: DEFAULT_SECTION.into(),
            tag: "vpn".into(),
        };
        assert_eq!(
            t.page_url(DEFAULT_SITE, 2),
            "https://alternativeto.net/category/security/vpn/?p=2"
        );
        assert_eq!(t.default_output(), "vpn_alternativeto.json");
        assert_eq!(t.to_string(), "category security/vpn");
    }
}

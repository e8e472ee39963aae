use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// One row of a listing page: what the site calls the item, and where its
/// about page lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ListingEntry {
    pub name: CompactString,
    pub link: String,
}

/// Fields scraped from a detail page. Absent values are empty strings so the
/// JSON output always carries every key.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftwareInfo {
    pub name: String,
    pub link: String,
    pub description: String,
    pub platforms: Vec<String>,
    pub official_website: String,
    pub github: String,
}

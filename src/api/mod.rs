pub mod comments;
pub mod groups;
pub mod posts;
pub mod profiles;

use serde::Deserialize;

/// The `?page=` query parameter. Deserialized as a raw string so a
/// non-numeric value reads as "no page requested" rather than a 400.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> Option<usize> {
        self.page.as_deref().and_then(|page| page.parse().ok())
    }
}

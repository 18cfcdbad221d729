use anyhow::Context;
use folio_core::model::RepositorySummary;
use serde::Deserialize;
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[derive(Debug, Deserialize)]
pub(crate) struct RepoItem {
    pub(crate) name: String,
    pub(crate) html_url: String,
    pub(crate) description: Option<String>,
    pub(crate) language: Option<String>,
    pub(crate) updated_at: String,
}

impl RepoItem {
    pub(crate) fn into_summary(self) -> anyhow::Result<RepositorySummary> {
        let updated_at = OffsetDateTime::parse(&self.updated_at, &Rfc3339)
            .with_context(|| format!("parse updated_at for {}", self.name))?;
        Ok(RepositorySummary {
            name: self.name,
            url: self.html_url,
            description: self.description.filter(|value| !value.is_empty()),
            language: self.language.filter(|value| !value.is_empty()),
            updated_at,
        })
    }
}

/// Decodes a listing body. A JSON value that is not an array is treated as
/// an empty listing; anything that is not JSON, or an array with malformed
/// entries, is an error.
pub fn parse_listing(body: &str) -> anyhow::Result<Vec<RepositorySummary>> {
    let value: Value = serde_json::from_str(body).context("decode repos response")?;
    if !value.is_array() {
        return Ok(Vec::new());
    }
    let items: Vec<RepoItem> = serde_json::from_value(value).context("decode repo entries")?;
    items.into_iter().map(RepoItem::into_summary).collect()
}

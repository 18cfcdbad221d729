use crate::github_models::parse_listing;
use crate::http::send_once;
use crate::spec::{host_or_default, parse_identity, repos_url};
use anyhow::Context;
use folio_core::feed::FeedError;
use folio_core::listing::{ListingFuture, RepoListing};
use folio_core::model::RepositorySummary;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub struct GitHubListing {
    client: Client,
    host: String,
}

impl GitHubListing {
    pub fn new(host: Option<&str>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            host: host_or_default(host),
        })
    }

    async fn fetch(&self, identity: &str) -> Result<Vec<RepositorySummary>, FeedError> {
        let identity = parse_identity(identity).map_err(FeedError::transport)?;
        let url = repos_url(&self.host, identity);
        debug!(url = %url, "Listing repositories");
        let builder = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        let response = send_once(builder).await?;
        let body = response
            .text()
            .await
            .context("read repos response")
            .map_err(FeedError::transport)?;
        parse_listing(&body).map_err(FeedError::transport)
    }
}

impl RepoListing for GitHubListing {
    fn name(&self) -> &'static str {
        "github"
    }

    fn list_repositories<'a>(
        &'a self,
        identity: &'a str,
    ) -> ListingFuture<'a, Vec<RepositorySummary>> {
        Box::pin(self.fetch(identity))
    }
}

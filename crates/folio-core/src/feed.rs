//! Repository feed: skeleton placeholders, one listing request, and the
//! rendered card grid or a single message.

use crate::dom::{Document, NodeId};
use crate::listing::RepoListing;
use crate::model::RepositorySummary;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::{self, OwnedFormatItem};
use tracing::{debug, error, warn};

pub const CONTAINER_ID: &str = "repos";
pub const PAGE_SIZE: u32 = 50;
pub const DISPLAY_LIMIT: usize = 12;
pub const SKELETON_COUNT: usize = 6;

pub const NO_DESCRIPTION: &str = "No description";
pub const EMPTY_MESSAGE: &str = "No public repositories found.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Unable to load projects from GitHub at this time.";

/// Terminal outcomes of a failed load. None of them is retried.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("GitHub API error: {status} {reason}")]
    EndpointUnavailable { status: u16, reason: String },
    #[error("no public repositories found")]
    EmptyResult,
    #[error("transport failure")]
    TransportFailure {
        #[source]
        source: anyhow::Error,
    },
}

impl FeedError {
    pub fn transport(err: impl Into<anyhow::Error>) -> Self {
        FeedError::TransportFailure { source: err.into() }
    }

    /// Text written into the container for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FeedError::EndpointUnavailable { status, reason } => {
                format!("GitHub API error: {status} {reason}")
                    .trim_end()
                    .to_string()
            }
            FeedError::EmptyResult => EMPTY_MESSAGE.to_string(),
            FeedError::TransportFailure { .. } => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedOutcome {
    Rendered { cards: usize },
    Empty,
    Unavailable { status: u16 },
    Failed,
}

/// Date rendering for the card metadata line.
#[derive(Clone, Debug, Default)]
pub struct CardFormat {
    date: Option<OwnedFormatItem>,
}

impl CardFormat {
    pub fn new(date_format: &str) -> anyhow::Result<Self> {
        let date = format_description::parse_owned::<2>(date_format)
            .map_err(|err| anyhow::anyhow!("invalid date format {date_format:?}: {err}"))?;
        Ok(Self { date: Some(date) })
    }

    pub fn format_date(&self, timestamp: OffsetDateTime) -> String {
        if let Some(format) = &self.date
            && let Ok(value) = timestamp.format(format)
        {
            return value;
        }
        format!(
            "{}/{}/{}",
            u8::from(timestamp.month()),
            timestamp.day(),
            timestamp.year()
        )
    }
}

pub fn render_skeletons(doc: &mut Document, container: NodeId) {
    doc.clear_children(container);
    for _ in 0..SKELETON_COUNT {
        let card = doc.element(container, "div");
        doc.add_class(card, "project-card");
        doc.add_class(card, "skeleton");
        for (height, width, margin) in [
            ("120px", None, Some("8px")),
            ("12px", Some("60%"), Some("6px")),
            ("10px", Some("40%"), None),
        ] {
            let block = doc.element(card, "div");
            doc.set_style(block, "height", height);
            doc.set_style(block, "background", "#f3f4f6");
            doc.set_style(block, "border-radius", "6px");
            if let Some(width) = width {
                doc.set_style(block, "width", width);
            }
            if let Some(margin) = margin {
                doc.set_style(block, "margin-bottom", margin);
            }
        }
    }
}

/// Most recently updated first, ties in response order, at most
/// [`DISPLAY_LIMIT`] entries.
pub fn select_for_display(mut repos: Vec<RepositorySummary>) -> Vec<RepositorySummary> {
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    repos.truncate(DISPLAY_LIMIT);
    repos
}

/// Writes the final state of a load into `container`.
pub fn render_result(
    doc: &mut Document,
    container: NodeId,
    result: Result<Vec<RepositorySummary>, FeedError>,
    format: &CardFormat,
) -> FeedOutcome {
    let repos = match result {
        Ok(repos) if repos.is_empty() => Err(FeedError::EmptyResult),
        other => other,
    };
    match repos {
        Ok(repos) => {
            let fetched = repos.len();
            let repos = select_for_display(repos);
            doc.clear_children(container);
            for repo in &repos {
                render_card(doc, container, repo, format);
            }
            debug!(fetched, shown = repos.len(), "Rendered repository cards");
            FeedOutcome::Rendered { cards: repos.len() }
        }
        Err(err) => {
            let outcome = match &err {
                FeedError::EndpointUnavailable { status, .. } => {
                    warn!(status, "Repository listing returned an error status");
                    FeedOutcome::Unavailable { status: *status }
                }
                FeedError::EmptyResult => FeedOutcome::Empty,
                FeedError::TransportFailure { source } => {
                    error!(error = %format!("{source:#}"), "Failed to load repositories");
                    FeedOutcome::Failed
                }
            };
            render_message(doc, container, &err.user_message());
            outcome
        }
    }
}

fn render_message(doc: &mut Document, container: NodeId, text: &str) {
    doc.clear_children(container);
    let message = doc.element(container, "p");
    doc.append_text(message, text);
}

fn render_card(
    doc: &mut Document,
    container: NodeId,
    repo: &RepositorySummary,
    format: &CardFormat,
) -> NodeId {
    let card = doc.element(container, "article");
    doc.add_class(card, "project-card");

    let heading = doc.element(card, "h3");
    let link = doc.element(heading, "a");
    doc.set_attr(link, "href", &repo.url);
    doc.set_attr(link, "target", "_blank");
    doc.set_attr(link, "rel", "noopener noreferrer");
    doc.append_text(link, &repo.name);

    let description = doc.element(card, "p");
    doc.add_class(description, "muted");
    doc.append_text(
        description,
        repo.description.as_deref().unwrap_or(NO_DESCRIPTION),
    );

    let meta = doc.element(card, "p");
    doc.add_class(meta, "meta");
    if let Some(language) = repo.language.as_deref() {
        let badge = doc.element(meta, "span");
        doc.add_class(badge, "lang");
        doc.append_text(badge, language);
        doc.append_text(meta, " · ");
    }
    doc.append_text(meta, &format.format_date(repo.updated_at));
    card
}

/// Fetches one account's repositories and renders them into a container.
pub struct RepositoryFeed<'a> {
    listing: &'a dyn RepoListing,
    format: CardFormat,
}

impl<'a> RepositoryFeed<'a> {
    pub fn new(listing: &'a dyn RepoListing, format: CardFormat) -> Self {
        Self { listing, format }
    }

    /// Returns `None` without touching the network when the container is
    /// missing from the page.
    pub async fn load(
        &self,
        identity: &str,
        doc: &mut Document,
        container_id: &str,
    ) -> Option<FeedOutcome> {
        let container = doc.get_element_by_id(container_id)?;
        render_skeletons(doc, container);
        debug!(
            identity,
            provider = self.listing.name(),
            "Requesting repository listing"
        );
        let result = self.listing.list_repositories(identity).await;
        Some(render_result(doc, container, result, &self.format))
    }
}

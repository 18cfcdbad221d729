use super::*;
pub(super) async fn handle_repos(
    args: ReposArgs,
    config_path: &Path,
    logs: &logging::LogBuffer,
) -> anyhow::Result<()> {
    let config = FolioConfig::load(config_path)?;
    let identity = args.identity.unwrap_or_else(|| config.identity.clone());
    let host = args.api_host.or_else(|| config.api_host.clone());
    let listing = GitHubListing::new(host.as_deref())?;
    let format = CardFormat::new(&config.date_format)?;

    let (outcome, text) = load_preview(&listing, &identity, format).await?;
    info!(identity = %identity, outcome = ?outcome, "Repository feed finished");
    print!("{text}");

    if args.diagnostics {
        for entry in logs.at_least(Level::DEBUG) {
            eprintln!("{}", entry.format_compact());
        }
    }
    Ok(())
}

/// Runs the feed against a fresh page holding only the repository container.
pub(super) async fn load_preview(
    listing: &dyn RepoListing,
    identity: &str,
    format: CardFormat,
) -> anyhow::Result<(FeedOutcome, String)> {
    let mut doc = Document::new();
    let container = doc.element_with_id(doc.body(), "div", feed::CONTAINER_ID);
    let outcome = RepositoryFeed::new(listing, format)
        .load(identity, &mut doc, feed::CONTAINER_ID)
        .await
        .context("repository container missing")?;
    Ok((outcome, preview::render_container(&doc, container)))
}

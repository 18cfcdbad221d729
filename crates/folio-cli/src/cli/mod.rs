use crate::{logging, preview};
use anyhow::Context;
use clap::Parser;
use folio_core::config::{FolioConfig, default_config_path, default_preferences_path};
use folio_core::contact::{self, REPLY_DELAY, SENDING_MESSAGE, THANKS_MESSAGE};
use folio_core::dom::Document;
use folio_core::feed::{self, CardFormat, FeedOutcome, RepositoryFeed};
use folio_core::listing::RepoListing;
use folio_core::palette::{FileStore, PALETTE_KEY, PALETTES, PreferenceStore, is_known_palette};
use folio_providers::GitHubListing;
use std::path::{Path, PathBuf};
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

mod app;
mod args;
mod config_cmd;
mod contact_cmd;
mod palette_cmd;
mod repos_cmd;

use args::*;

use config_cmd::handle_config;
use contact_cmd::handle_contact;
use palette_cmd::handle_palette;
use repos_cmd::handle_repos;

pub async fn run() -> anyhow::Result<()> {
    app::run().await
}

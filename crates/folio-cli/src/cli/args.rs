use super::*;
#[derive(Parser)]
#[command(author, version, about)]
pub(super) struct Cli {
    #[arg(long, global = true, help = "Use this config file instead of the default")]
    pub(super) config: Option<PathBuf>,
    #[arg(
        long,
        global = true,
        help = "Use this preferences file instead of the default"
    )]
    pub(super) preferences: Option<PathBuf>,
    #[command(subcommand)]
    pub(super) command: Commands,
}

impl Cli {
    pub(super) fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => default_config_path(),
        }
    }

    pub(super) fn preferences_path(&self) -> anyhow::Result<PathBuf> {
        match &self.preferences {
            Some(path) => Ok(path.clone()),
            None => default_preferences_path(),
        }
    }
}

#[derive(clap::Subcommand)]
pub(super) enum Commands {
    #[command(about = "Manage config")]
    Config(ConfigArgs),
    #[command(about = "Load and preview the repository feed")]
    Repos(ReposArgs),
    #[command(about = "Read or change the colour palette preference")]
    Palette(PaletteArgs),
    #[command(about = "Validate a contact form submission")]
    Contact(ContactArgs),
}

#[derive(Parser)]
pub(super) struct ConfigArgs {
    #[command(subcommand)]
    pub(super) command: ConfigCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum ConfigCommands {
    #[command(about = "Write the config file")]
    Init(InitArgs),
    #[command(about = "Print the effective config as JSON")]
    Show,
}

#[derive(Parser)]
pub(super) struct InitArgs {
    #[arg(long)]
    pub(super) identity: Option<String>,
    #[arg(long)]
    pub(super) api_host: Option<String>,
    #[arg(long)]
    pub(super) palette: Option<String>,
}

#[derive(Parser)]
pub(super) struct ReposArgs {
    #[arg(long, help = "Account whose public repositories are listed")]
    pub(super) identity: Option<String>,
    #[arg(long)]
    pub(super) api_host: Option<String>,
    #[arg(long, help = "Print captured debug log entries after the preview")]
    pub(super) diagnostics: bool,
}

#[derive(Parser)]
pub(super) struct PaletteArgs {
    #[command(subcommand)]
    pub(super) command: PaletteCommands,
}

#[derive(clap::Subcommand)]
pub(super) enum PaletteCommands {
    #[command(about = "Print the active palette")]
    Get,
    #[command(about = "Persist a palette choice")]
    Set(SetPaletteArgs),
}

#[derive(Parser)]
pub(super) struct SetPaletteArgs {
    pub(super) name: String,
}

#[derive(Parser)]
pub(super) struct ContactArgs {
    #[arg(long, default_value = "")]
    pub(super) name: String,
    #[arg(long, default_value = "")]
    pub(super) email: String,
    #[arg(long, default_value = "")]
    pub(super) message: String,
}

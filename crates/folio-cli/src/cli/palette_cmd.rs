use super::config_cmd::ensure_known_palette;
use super::*;
pub(super) fn handle_palette(
    args: PaletteArgs,
    config_path: &Path,
    preferences_path: &Path,
) -> anyhow::Result<()> {
    let mut store = FileStore::open(preferences_path)?;
    match args.command {
        PaletteCommands::Get => {
            let config = FolioConfig::load(config_path)?;
            println!("{}", active_palette(&store, &config));
        }
        PaletteCommands::Set(args) => {
            set_palette(&mut store, &args.name)?;
            println!("Palette set to {}", args.name);
        }
    }
    Ok(())
}

/// Stored choice, else the configured default.
pub(super) fn active_palette(store: &dyn PreferenceStore, config: &FolioConfig) -> String {
    store
        .get(PALETTE_KEY)
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| config.default_palette.clone())
}

pub(super) fn set_palette(store: &mut dyn PreferenceStore, name: &str) -> anyhow::Result<()> {
    ensure_known_palette(name)?;
    store
        .set(PALETTE_KEY, name)
        .context("persist palette preference")
}

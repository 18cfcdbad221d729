use super::*;
pub(super) fn handle_config(args: ConfigArgs, config_path: &Path) -> anyhow::Result<()> {
    match args.command {
        ConfigCommands::Init(args) => {
            init_config(args, config_path)?;
            println!("Config saved to {}", config_path.display());
            Ok(())
        }
        ConfigCommands::Show => {
            let config = FolioConfig::load(config_path)?;
            let data = serde_json::to_string_pretty(&config).context("serialize config")?;
            println!("{data}");
            Ok(())
        }
    }
}

/// Merges the given overrides into the stored config and writes it back.
pub(super) fn init_config(args: InitArgs, config_path: &Path) -> anyhow::Result<FolioConfig> {
    let mut config = FolioConfig::load(config_path)?;
    if let Some(identity) = args.identity {
        config.identity = identity;
    }
    if let Some(host) = args.api_host {
        config.api_host = Some(host);
    }
    if let Some(palette) = args.palette {
        ensure_known_palette(&palette)?;
        config.default_palette = palette;
    }
    CardFormat::new(&config.date_format)?;
    config.save(config_path)?;
    Ok(config)
}

pub(super) fn ensure_known_palette(name: &str) -> anyhow::Result<()> {
    if !is_known_palette(name) {
        anyhow::bail!(
            "unknown palette '{name}', expected one of: {}",
            PALETTES.join(", ")
        );
    }
    Ok(())
}

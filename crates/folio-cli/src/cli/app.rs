use super::*;
pub async fn run() -> anyhow::Result<()> {
    let log_buffer = logging::LogBuffer::new(200);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .with(logging::LogLayer::new(log_buffer.clone()).with_filter(LevelFilter::DEBUG))
        .init();

    let cli = Cli::parse();
    info!(command = command_label(&cli.command), "Running command");
    let config_path = cli.config_path()?;
    let preferences_path = cli.preferences_path()?;

    match cli.command {
        Commands::Config(args) => handle_config(args, &config_path),
        Commands::Repos(args) => handle_repos(args, &config_path, &log_buffer).await,
        Commands::Palette(args) => handle_palette(args, &config_path, &preferences_path),
        Commands::Contact(args) => handle_contact(args).await,
    }
}

pub(super) fn command_label(command: &Commands) -> &'static str {
    match command {
        Commands::Config(args) => match args.command {
            ConfigCommands::Init(_) => "config.init",
            ConfigCommands::Show => "config.show",
        },
        Commands::Repos(_) => "repos",
        Commands::Palette(args) => match args.command {
            PaletteCommands::Get => "palette.get",
            PaletteCommands::Set(_) => "palette.set",
        },
        Commands::Contact(_) => "contact",
    }
}

use tracing_subscriber::EnvFilter;

use pod_dl::{
    cli::{Cli, Commands},
    config::Config,
    error::{ConfigError, PodError},
    pipeline::{self, RunOptions},
    progress,
};

type Result<T> = std::result::Result<T, PodError>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_and_validate();

    // Handle special commands first
    if let Some(command) = &cli.command {
        init_logging(&cli, None)?;
        return handle_command(command, &cli);
    }

    // Load configuration and apply CLI overrides
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(cli.get_config_overrides());
    config.validate()?;

    init_logging(&cli, Some(&config))?;

    if cli.list {
        return handle_list_mode(&config).await;
    }

    handle_download_mode(&cli, &config).await
}

/// Initialize logging based on CLI arguments and config
fn init_logging(cli: &Cli, config: Option<&Config>) -> Result<()> {
    let level = match (cli.log_level.as_deref(), cli.verbose, cli.quiet, config) {
        (None, 0, false, Some(config)) => config.logging.level.clone(),
        _ => cli.get_log_level().to_string(),
    };
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let log_file = cli
        .log_file
        .clone()
        .or_else(|| config.and_then(|c| c.logging.file.clone()));

    if let Some(log_file) = log_file {
        if let Some(parent) = log_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        subscriber.with_ansi(false).with_writer(file).init();
    } else if cli.quiet || config.is_some_and(|c| c.logging.format == "compact") {
        subscriber.without_time().with_writer(std::io::stderr).init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

/// Handle subcommands
fn handle_command(command: &Commands, cli: &Cli) -> Result<()> {
    match command {
        Commands::Config { init } => {
            let config_path = Config::config_path()?;

            if *init {
                if config_path.exists() {
                    println!("Configuration already exists at: {}", config_path.display());
                } else {
                    Config::create_sample(&config_path)?;
                    println!("📝 Created default configuration at: {}", config_path.display());
                }
                return Ok(());
            }

            println!("Configuration file location:");
            println!("  {}", config_path.display());
            println!();

            let config = Config::load(cli.config.as_deref())?;
            println!("Effective configuration:");
            println!("{}", "─".repeat(60));
            let toml = toml::to_string_pretty(&config).map_err(|e| {
                ConfigError::ParseError(format!("Failed to serialize config: {}", e))
            })?;
            println!("{}", toml);
            println!("{}", "─".repeat(60));

            Ok(())
        }

        Commands::Version => {
            println!("pod-dl {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Handle list mode
async fn handle_list_mode(config: &Config) -> Result<()> {
    let pending = pipeline::list(config).await?;

    if pending.is_empty() {
        println!("Nothing new to download.");
        return Ok(());
    }

    for (episode, path) in &pending {
        println!("{}", path.display());
        println!("  └─ {}", episode.media_url);
    }
    println!();
    println!("{} episode{} pending", pending.len(), if pending.len() == 1 { "" } else { "s" });

    Ok(())
}

/// Handle download mode
async fn handle_download_mode(cli: &Cli, config: &Config) -> Result<()> {
    let options = RunOptions {
        show_progress: cli.show_progress(),
    };

    let report = pipeline::run(config, options).await?;

    if cli.json {
        let json = pod_dl::serde_json::to_string_pretty(&report)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize report: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    println!("{}", progress::format_run_summary(report.downloaded));
    if !cli.quiet && (report.downloaded > 0 || report.failed > 0) {
        println!("{}", progress::format_transfer_details(report.bytes, report.failed));
    }

    Ok(())
}

mod cli;

use marquee::{config, probe, server};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use std::time::Duration;

async fn start_server(
    host: String,
    port: u16,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI
    config.server.host = host;
    config.server.port = port;
    config::validate_config(&config)?;

    tracing::info!("Starting {}", config.server.site_name);
    tracing::info!("Catalog API: {}", config.catalog.api_base);

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "marquee=trace,marquee_player=trace,marquee_common=debug,tower_http=debug".to_string()
        } else {
            "marquee=debug,marquee_player=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::ProbeStream { url, json } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(probe_stream(&url, json, cli.config.as_deref()))
        }
        Commands::Version => {
            println!("marquee {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn probe_stream(url: &str, json: bool, config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;
    let timeout = Duration::from_secs(config.catalog.timeout_secs);
    let report = probe::probe_stream(url, timeout).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("URL: {}", report.url);
    if let Some(version) = report.playlist.version {
        println!("HLS version: {}", version);
    }
    if report.playlist.is_media_playlist {
        println!("Media playlist (single rendition, no quality switching)");
    }

    println!("\nLevels: {}", report.playlist.levels.len());
    for level in &report.playlist.levels {
        print!(
            "  [{}] {}x{} {} kbps",
            level.index,
            level.width,
            level.height,
            level.bandwidth / 1000
        );
        if let Some(ref codecs) = level.codecs {
            print!(" ({})", codecs);
        }
        println!(" - {}", level.uri);
    }

    let labels: Vec<_> = report.qualities.iter().map(|q| q.label.as_str()).collect();
    println!("\nQuality menu: {}", labels.join(", "));

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            config::validate_config(&config)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Catalog API: {}", config.catalog.api_base);
            println!("  Images: {}", config.catalog.image_base);
            println!(
                "  Cache: {} entries, {} req/s",
                config.catalog.cache_max_entries, config.catalog.requests_per_second
            );
            println!(
                "  Search: {}ms debounce, {} suggestions",
                config.search.debounce_ms, config.search.suggestion_limit
            );
            println!("  Player controls: {}", config.player.controls.len());
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Catalog API: {}", config.catalog.api_base);
        }
    }

    Ok(())
}

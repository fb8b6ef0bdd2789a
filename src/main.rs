//! Doodle Gallery - share drawings through a Google Drive folder.
//!
//! This binary starts the HTTP server and configures all components.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use doodle_gallery::{
    config::{CheckConfig, Cli, Command, ServeConfig, StoreArgs},
    gallery::GalleryService,
    notify::EmailJsNotifier,
    server::{create_router, RouterConfig},
    store::DriveStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("");
    info!("Doodle Gallery v{}", env!("CARGO_PKG_VERSION"));
    info!("");
    info!("Configuration:");
    info!("  Drive folder: {}", config.store.folder_id);
    info!("  Drive API: {}", config.store.drive_api_base);
    info!(
        "  Refresh token: {}",
        if config.store.google_refresh_token.is_some() {
            "configured"
        } else {
            "not configured"
        }
    );
    info!("  Body limit: {} bytes", config.body_limit);

    let store = match build_store(&config.store) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let mut gallery = GalleryService::new(store, config.store.folder_id.clone());

    match config.emailjs_config() {
        Some(emailjs) => {
            info!("  Notifications: EmailJS (template {})", emailjs.template_id);
            let notifier = EmailJsNotifier::new(reqwest::Client::new(), emailjs);
            gallery = gallery.with_notifier(Arc::new(notifier));
        }
        None => warn!("  Notifications: disabled"),
    }

    let router = create_router(gallery, build_router_config(&config));

    let addr = config.bind_address();

    info!("");
    info!("────────────────────────────────────────────────────────────────");
    info!("  Server listening on: http://{}", addr);
    info!("");
    info!("  Gallery:  open http://{}/", addr);
    info!("  Draw:     open http://{}/draw", addr);
    info!("  Liveness: curl http://{}/test", addr);
    info!("────────────────────────────────────────────────────────────────");
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Create the Drive store, logging why it failed if it did.
fn build_store(args: &StoreArgs) -> Result<DriveStore, ExitCode> {
    DriveStore::with_endpoints(args.credentials(), args.endpoints()).map_err(|e| {
        error!("Failed to create Drive client: {}", e);
        ExitCode::FAILURE
    })
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "doodle_gallery=debug,tower_http=debug"
    } else {
        "doodle_gallery=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::default().with_body_limit(config.body_limit);

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config.with_tracing(!config.no_tracing)
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("Doodle Gallery Configuration Check");
    println!("══════════════════════════════════");
    println!();

    if let Err(e) = config.store.validate() {
        println!("✗ Configuration: {}", e);
        return ExitCode::FAILURE;
    }
    println!("✓ Folder: {}", config.store.folder_id);
    println!("✓ Drive API: {}", config.store.drive_api_base);
    println!();

    let store = match build_store(&config.store) {
        Ok(store) => store,
        Err(code) => {
            println!("✗ Could not create the Drive client");
            return code;
        }
    };
    let gallery = GalleryService::new(store, config.store.folder_id.clone());

    print!("Listing folder... ");

    let doodles: Vec<_> = match gallery.list().await {
        Ok(doodles) => doodles.collect(),
        Err(e) => {
            println!("✗ failed");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check:");
            println!("  - The Google OAuth credentials are valid");
            println!(
                "  - The folder '{}' exists and is shared with the account",
                config.store.folder_id
            );
            return ExitCode::FAILURE;
        }
    };
    println!("✓ success");
    println!("  Found {} doodle(s)", doodles.len());

    if config.list_doodles {
        println!();
        println!("Doodles in folder:");
        println!("──────────────────");
        if doodles.is_empty() {
            println!("  (no doodles found)");
        } else {
            for doodle in &doodles {
                println!("  {}  {}", doodle.name, doodle.view_link);
            }
        }
    }

    println!();
    println!("══════════════════════════════════");
    println!("✓ All checks passed!");

    ExitCode::SUCCESS
}

//! Configuration management for the doodle gallery.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables (Google credentials use the standard `GOOGLE_*` names)
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use clap::Parser;
//! use doodle_gallery::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.command {
//!     Command::Serve(config) => println!("Listening on {}", config.bind_address()),
//!     Command::Check(config) => println!("Checking folder {}", config.store.folder_id),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `DOODLE_HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `DOODLE_FOLDER_ID` - Drive folder holding the doodles (required)
//! - `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`, `GOOGLE_REDIRECT_URI` - OAuth2 client
//! - `GOOGLE_ACCESS_TOKEN`, `GOOGLE_REFRESH_TOKEN` - OAuth2 tokens
//! - `DOODLE_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)
//! - `DOODLE_BODY_LIMIT` - Max request body in bytes (default: 10MB)
//! - `EMAILJS_SERVICE_ID`, `EMAILJS_TEMPLATE_ID`, `EMAILJS_PUBLIC_KEY`,
//!   `EMAILJS_PRIVATE_KEY` - Optional new-doodle email notifications

use clap::{Args, Parser, Subcommand};

use crate::notify::EmailJsConfig;
use crate::server::DEFAULT_BODY_LIMIT;
use crate::store::{
    DriveEndpoints, OAuthCredentials, DEFAULT_API_BASE, DEFAULT_TOKEN_URL, DEFAULT_UPLOAD_BASE,
};

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

// =============================================================================
// CLI Arguments
// =============================================================================

/// Doodle Gallery - store drawings in a Google Drive folder and browse them.
#[derive(Parser, Debug, Clone)]
#[command(name = "doodle-gallery")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeConfig),

    /// Verify credentials and folder access, then exit.
    Check(CheckConfig),
}

/// Remote store settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Google Drive folder holding the doodles.
    #[arg(long, env = "DOODLE_FOLDER_ID")]
    pub folder_id: String,

    /// OAuth2 client id.
    #[arg(long, env = "GOOGLE_CLIENT_ID")]
    pub google_client_id: Option<String>,

    /// OAuth2 client secret.
    #[arg(long, env = "GOOGLE_CLIENT_SECRET", hide_env_values = true)]
    pub google_client_secret: Option<String>,

    /// OAuth2 redirect URI registered for the client.
    #[arg(long, env = "GOOGLE_REDIRECT_URI")]
    pub google_redirect_uri: Option<String>,

    /// OAuth2 access token.
    #[arg(long, env = "GOOGLE_ACCESS_TOKEN", hide_env_values = true)]
    pub google_access_token: Option<String>,

    /// OAuth2 refresh token, used to obtain new access tokens.
    #[arg(long, env = "GOOGLE_REFRESH_TOKEN", hide_env_values = true)]
    pub google_refresh_token: Option<String>,

    /// Drive REST API base URL.
    #[arg(long, default_value = DEFAULT_API_BASE, env = "DOODLE_DRIVE_API_BASE")]
    pub drive_api_base: String,

    /// Drive upload API base URL.
    #[arg(long, default_value = DEFAULT_UPLOAD_BASE, env = "DOODLE_DRIVE_UPLOAD_BASE")]
    pub drive_upload_base: String,

    /// OAuth2 token endpoint.
    #[arg(long, default_value = DEFAULT_TOKEN_URL, env = "DOODLE_TOKEN_URL")]
    pub token_url: String,
}

impl StoreArgs {
    /// Validate the store settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.folder_id.trim().is_empty() {
            return Err(
                "Drive folder id is required. Set --folder-id or DOODLE_FOLDER_ID".to_string(),
            );
        }

        if self.google_access_token.is_none() && self.google_refresh_token.is_none() {
            return Err(
                "No Google credentials provided. Set GOOGLE_ACCESS_TOKEN and/or GOOGLE_REFRESH_TOKEN"
                    .to_string(),
            );
        }

        if self.google_refresh_token.is_some()
            && (self.google_client_id.is_none() || self.google_client_secret.is_none())
        {
            return Err(
                "A refresh token needs GOOGLE_CLIENT_ID and GOOGLE_CLIENT_SECRET".to_string(),
            );
        }

        Ok(())
    }

    /// The OAuth2 credential set.
    pub fn credentials(&self) -> OAuthCredentials {
        OAuthCredentials {
            client_id: self.google_client_id.clone(),
            client_secret: self.google_client_secret.clone(),
            redirect_uri: self.google_redirect_uri.clone(),
            access_token: self.google_access_token.clone(),
            refresh_token: self.google_refresh_token.clone(),
        }
    }

    /// The Drive endpoints to talk to.
    pub fn endpoints(&self) -> DriveEndpoints {
        DriveEndpoints {
            api_base: self.drive_api_base.clone(),
            upload_base: self.drive_upload_base.clone(),
            token_url: self.token_url.clone(),
        }
    }
}

/// Settings for `serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "DOODLE_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    /// Maximum request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_BODY_LIMIT, env = "DOODLE_BODY_LIMIT")]
    pub body_limit: usize,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "DOODLE_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Store Configuration
    // =========================================================================
    #[command(flatten)]
    pub store: StoreArgs,

    // =========================================================================
    // Notification Configuration
    // =========================================================================
    /// EmailJS service id.
    #[arg(long, env = "EMAILJS_SERVICE_ID")]
    pub emailjs_service_id: Option<String>,

    /// EmailJS template id.
    #[arg(long, env = "EMAILJS_TEMPLATE_ID")]
    pub emailjs_template_id: Option<String>,

    /// EmailJS public key.
    #[arg(long, env = "EMAILJS_PUBLIC_KEY")]
    pub emailjs_public_key: Option<String>,

    /// EmailJS private key (only needed when the account requires it).
    #[arg(long, env = "EMAILJS_PRIVATE_KEY", hide_env_values = true)]
    pub emailjs_private_key: Option<String>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()?;

        if self.body_limit == 0 {
            return Err("body_limit must be greater than 0".to_string());
        }

        let emailjs = [
            &self.emailjs_service_id,
            &self.emailjs_template_id,
            &self.emailjs_public_key,
        ];
        let set = emailjs.iter().filter(|v| v.is_some()).count();
        if set != 0 && set != emailjs.len() {
            return Err(
                "EmailJS notifications need EMAILJS_SERVICE_ID, EMAILJS_TEMPLATE_ID and \
                 EMAILJS_PUBLIC_KEY together"
                    .to_string(),
            );
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// EmailJS settings, if notifications are configured.
    pub fn emailjs_config(&self) -> Option<EmailJsConfig> {
        Some(EmailJsConfig {
            service_id: self.emailjs_service_id.clone()?,
            template_id: self.emailjs_template_id.clone()?,
            public_key: self.emailjs_public_key.clone()?,
            private_key: self.emailjs_private_key.clone(),
        })
    }
}

/// Settings for `check`.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Print every doodle in the folder.
    #[arg(long, default_value_t = false)]
    pub list_doodles: bool,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================

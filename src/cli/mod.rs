//! CLI module for the SalonKit command-line interface.
//!
//! Without a subcommand the binary starts the server. Subcommands work on the
//! configured database directly:
//! - `config check` - Validate configuration file
//! - `tenants create` - Create a salon tenant
//! - `users create` - Create a dashboard account

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::api::auth::{hash_password, validate_password_strength};
use crate::api::integrations::google_business_status;
use crate::api::validation::validate_email;
use crate::config::Config;
use crate::db::{generate_slug, NewUser, Role, Tenant, User};

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "salonkit")]
#[command(author, version, about = "Salon platform: marketing site, role dashboards and homepage builder", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "salonkit.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Skip startup self-checks (for development only)
    #[arg(long)]
    pub skip_checks: bool,

    /// Subcommand to run (if none, starts the server)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Tenant management commands
    #[command(subcommand)]
    Tenants(TenantCommands),

    /// User management commands
    #[command(subcommand)]
    Users(UserCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

#[derive(Subcommand, Debug)]
pub enum TenantCommands {
    /// Create a salon tenant
    Create {
        /// Display name of the salon
        #[arg(long)]
        name: String,
        /// URL slug (derived from the name when omitted)
        #[arg(long)]
        slug: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Create a dashboard account
    Create {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        /// salon-owner, stylist or admin
        #[arg(long)]
        role: Role,
        #[arg(long, env = "SALONKIT_NEW_USER_PASSWORD")]
        password: String,
        /// Tenant slug the account belongs to (salon owners and stylists)
        #[arg(long)]
        tenant: Option<String>,
    },
}

/// Run a CLI command
pub async fn run_command(cli: &Cli) -> Result<()> {
    match &cli.command {
        Some(Commands::Config(ConfigCommands::Check)) => cmd_config_check(cli),
        Some(Commands::Tenants(TenantCommands::Create { name, slug })) => {
            cmd_tenants_create(cli, name, slug.as_deref()).await
        }
        Some(Commands::Users(UserCommands::Create {
            email,
            name,
            role,
            password,
            tenant,
        })) => cmd_users_create(cli, email, name, *role, password, tenant.as_deref()).await,
        None => {
            // No subcommand means start the server - this is handled in main.rs
            Ok(())
        }
    }
}

fn cmd_config_check(cli: &Cli) -> Result<()> {
    let config_path = &cli.config;

    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("A default configuration will be used when starting the server.");
        println!("To create a custom configuration, copy salonkit.example.toml to salonkit.toml");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("Server:");
            println!("  Host:         {}", config.server.host);
            println!("  Port:         {}", config.server.port);
            println!("  Static Dir:   {}", config.server.static_dir.display());
            println!();
            println!("Database:");
            println!("  URL:          {}", config.database.url);
            println!("  Connections:  {}", config.database.max_connections);
            println!();
            println!("UI:");
            println!("  Public Theme: {}", config.ui.public_theme.as_str());
            println!("  Language:     {}", config.ui.default_language);
            println!();
            println!("Sessions:");
            println!("  Lifetime:     {} days", config.auth.session_ttl_days);
            println!(
                "  Cookies:      {}",
                if config.auth.secure_cookies {
                    "Secure"
                } else {
                    "Not secure (HTTP only deployments)"
                }
            );
            println!();

            let mut warnings = Vec::new();

            let google = google_business_status(&config.integrations.google_business);
            if !google.is_configured {
                warnings.push(google.message);
            }

            if config.auth.admin_email.is_some() != config.auth.admin_password.is_some() {
                warnings.push(
                    "Only one of admin_email/admin_password is set - no admin will be bootstrapped"
                        .to_string(),
                );
            }

            if !config.auth.secure_cookies {
                warnings.push("Session cookies are sent over plain HTTP".to_string());
            }

            if !warnings.is_empty() {
                println!("Warnings:");
                for warning in warnings {
                    println!("  [!] {}", warning);
                }
                println!();
            }

            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {}", e);
            println!();
            println!("Please check the configuration file syntax and try again.");
            anyhow::bail!("Invalid configuration file");
        }
    }
}

async fn connect(cli: &Cli) -> Result<crate::DbPool> {
    let config = Config::load(&cli.config)?;
    crate::db::init(&config.database)
        .await
        .context("Failed to open database")
}

async fn cmd_tenants_create(cli: &Cli, name: &str, slug: Option<&str>) -> Result<()> {
    let name = name.trim();
    if name.is_empty() {
        anyhow::bail!("Tenant name must not be empty");
    }
    let slug = slug.map(str::to_string).unwrap_or_else(|| generate_slug(name));
    if slug.is_empty() {
        anyhow::bail!("Could not derive a slug from '{}', pass --slug", name);
    }

    let pool = connect(cli).await?;
    if Tenant::find_by_slug(&pool, &slug).await?.is_some() {
        anyhow::bail!("A tenant with slug '{}' already exists", slug);
    }

    let tenant = Tenant::create(&pool, name, &slug).await?;
    println!("[OK] Created tenant {} ({})", tenant.name, tenant.slug);
    println!("  ID: {}", tenant.id);
    Ok(())
}

async fn cmd_users_create(
    cli: &Cli,
    email: &str,
    name: &str,
    role: Role,
    password: &str,
    tenant: Option<&str>,
) -> Result<()> {
    if let Err(e) = validate_email(email) {
        anyhow::bail!("Invalid email: {}", e);
    }
    if let Some(error) = validate_password_strength(password) {
        anyhow::bail!("Password rejected: {}", error);
    }
    if role != Role::Admin && tenant.is_none() {
        anyhow::bail!("Salon owners and stylists need --tenant");
    }

    let pool = connect(cli).await?;

    if User::find_by_email(&pool, email).await?.is_some() {
        anyhow::bail!("A user with email '{}' already exists", email);
    }

    let tenant_id = match tenant {
        Some(slug) => Some(
            Tenant::find_by_slug(&pool, slug)
                .await?
                .with_context(|| format!("Tenant '{}' not found", slug))?
                .id,
        ),
        None => None,
    };

    let password_hash =
        hash_password(password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = User::create(
        &pool,
        &NewUser {
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
            role,
            tenant_id,
        },
    )
    .await?;

    println!("[OK] Created {} account {}", user.role, user.email);
    println!("  ID: {}", user.id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_starts_server() {
        let cli = Cli::try_parse_from(["salonkit"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("salonkit.toml"));
    }

    #[test]
    fn test_parse_users_create() {
        let cli = Cli::try_parse_from([
            "salonkit",
            "users",
            "create",
            "--email",
            "mara@salon.example",
            "--name",
            "Mara",
            "--role",
            "salon-owner",
            "--password",
            "Haarschnitt2026",
            "--tenant",
            "salon-mara",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Users(UserCommands::Create { role, tenant, .. })) => {
                assert_eq!(role, Role::SalonOwner);
                assert_eq!(tenant.as_deref(), Some("salon-mara"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_role_is_rejected() {
        let result = Cli::try_parse_from([
            "salonkit", "users", "create", "--email", "a@b.example", "--name", "A", "--role",
            "janitor", "--password", "x",
        ]);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_check_missing_file_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "salonkit",
            "--config",
            dir.path().join("absent.toml").to_str().unwrap(),
            "config",
            "check",
        ])
        .unwrap();
        assert!(run_command(&cli).await.is_ok());
    }
}

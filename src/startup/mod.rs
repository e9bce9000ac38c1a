//! Startup self-checks module
//!
//! This module performs system verification before the server starts accepting requests.
//! Checks include:
//! - Database connectivity and schema
//! - Static asset directory
//! - Google Business integration settings
//! - An admin account that can reach the content dashboard

use serde::Serialize;
use tracing::{error, info, warn};

use crate::api::integrations::google_business_status;
use crate::config::Config;
use crate::db::{Role, User, ESSENTIAL_TABLES};
use crate::DbPool;

/// Result of a single startup check
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Whether this check is critical (failure should abort startup)
    pub critical: bool,
    /// Human-readable message describing the result
    pub message: String,
    /// Additional details (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            critical: false,
            message: message.into(),
            details: None,
        }
    }

    pub fn fail(name: impl Into<String>, message: impl Into<String>, critical: bool) -> Self {
        Self {
            name: name.into(),
            passed: false,
            critical,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Aggregated startup check results
#[derive(Debug, Clone, Serialize)]
pub struct StartupCheckReport {
    pub checks: Vec<CheckResult>,
    /// Whether all critical checks passed
    pub all_critical_passed: bool,
    pub all_passed: bool,
    pub summary: String,
}

impl StartupCheckReport {
    pub fn new(checks: Vec<CheckResult>) -> Self {
        let all_critical_passed = checks.iter().filter(|c| c.critical).all(|c| c.passed);
        let all_passed = checks.iter().all(|c| c.passed);

        let failed_critical = checks
            .iter()
            .filter(|c| c.critical && !c.passed)
            .count();
        let failed_non_critical = checks
            .iter()
            .filter(|c| !c.critical && !c.passed)
            .count();
        let total = checks.len();
        let passed = checks.iter().filter(|c| c.passed).count();

        let summary = if all_passed {
            format!("All {} startup checks passed", total)
        } else if all_critical_passed {
            format!(
                "{}/{} checks passed ({} non-critical warnings)",
                passed, total, failed_non_critical
            )
        } else {
            format!(
                "{}/{} checks passed ({} critical failures)",
                passed, total, failed_critical
            )
        };

        Self {
            checks,
            all_critical_passed,
            all_passed,
            summary,
        }
    }
}

/// Run all startup self-checks
pub async fn run_startup_checks(config: &Config, db: &DbPool) -> StartupCheckReport {
    info!("Running startup self-checks...");

    let checks = vec![
        check_database_connectivity(db).await,
        check_database_schema(db).await,
        check_static_directory(config),
        check_google_business(config),
        check_admin_account(db).await,
    ];

    let report = StartupCheckReport::new(checks);

    for check in &report.checks {
        if check.passed {
            info!(
                check = %check.name,
                message = %check.message,
                "Startup check PASSED"
            );
        } else if check.critical {
            error!(
                check = %check.name,
                message = %check.message,
                details = ?check.details,
                "Startup check FAILED (CRITICAL)"
            );
        } else {
            warn!(
                check = %check.name,
                message = %check.message,
                details = ?check.details,
                "Startup check FAILED (non-critical)"
            );
        }
    }

    info!(
        summary = %report.summary,
        all_passed = report.all_passed,
        all_critical_passed = report.all_critical_passed,
        "Startup checks completed"
    );

    report
}

async fn check_database_connectivity(db: &DbPool) -> CheckResult {
    match sqlx::query("SELECT 1").fetch_one(db).await {
        Ok(_) => CheckResult::pass("database_connectivity", "Database connection successful"),
        Err(e) => CheckResult::fail(
            "database_connectivity",
            "Failed to connect to database",
            true,
        )
        .with_details(e.to_string()),
    }
}

async fn check_database_schema(db: &DbPool) -> CheckResult {
    let result: Result<Vec<(String,)>, _> = sqlx::query_as(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(db)
    .await;

    match result {
        Ok(tables) => {
            let table_names: Vec<&str> = tables.iter().map(|(n,)| n.as_str()).collect();
            let missing = missing_tables(&table_names);

            if missing.is_empty() {
                CheckResult::pass(
                    "database_schema",
                    format!("Database schema valid ({} tables)", tables.len()),
                )
                .with_details(format!("Tables: {}", table_names.join(", ")))
            } else {
                CheckResult::fail("database_schema", "Missing essential database tables", true)
                    .with_details(format!("Missing: {}", missing.join(", ")))
            }
        }
        Err(e) => CheckResult::fail("database_schema", "Failed to query database schema", true)
            .with_details(e.to_string()),
    }
}

fn missing_tables(present: &[&str]) -> Vec<&'static str> {
    ESSENTIAL_TABLES
        .iter()
        .filter(|t| !present.contains(*t))
        .copied()
        .collect()
}

// Styles are optional; pages still render without them
fn check_static_directory(config: &Config) -> CheckResult {
    let dir = &config.server.static_dir;
    if dir.join("app.css").is_file() {
        CheckResult::pass("static_directory", "Static assets found")
            .with_details(format!("Path: {}", dir.display()))
    } else {
        CheckResult::fail(
            "static_directory",
            "Static assets not found (pages render unstyled)",
            false,
        )
        .with_details(format!("Expected: {}", dir.join("app.css").display()))
    }
}

fn check_google_business(config: &Config) -> CheckResult {
    let status = google_business_status(&config.integrations.google_business);
    if status.is_configured {
        CheckResult::pass("google_business", status.message)
    } else {
        CheckResult::fail("google_business", status.message, false)
    }
}

async fn check_admin_account(db: &DbPool) -> CheckResult {
    match User::count_with_role(db, Role::Admin).await {
        Ok(0) => CheckResult::fail("admin_account", "No admin account exists", false)
            .with_details("Create one with `salonkit users create --role admin`"),
        Ok(count) => CheckResult::pass("admin_account", format!("{} admin account(s)", count)),
        Err(e) => CheckResult::fail("admin_account", "Failed to count admin accounts", false)
            .with_details(e.to_string()),
    }
}

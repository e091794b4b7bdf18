//! Doctor command - validate configuration and show status

use anyhow::Result;
use gazette_domain::{ArticleQuery, ArticleStore, Role, Session};
use serde::Serialize;
use std::path::PathBuf;

use crate::args::DoctorArgs;
use crate::commands::{build_gateway, build_session};
use crate::config::AppConfig;

#[derive(Debug, Serialize)]
struct DoctorReport {
    config: CheckResult,
    gateway: CheckResult,
    generation: CheckResult,
    session: CheckResult,
    overall: String,
}

#[derive(Debug, Serialize)]
struct CheckResult {
    status: String,
    message: String,
    details: Option<serde_json::Value>,
}

impl CheckResult {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            status: "ok".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn warn(message: impl Into<String>) -> Self {
        Self {
            status: "warn".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
            details: None,
        }
    }

    fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    fn is_error(&self) -> bool {
        self.status == "error"
    }
}

pub async fn execute(args: DoctorArgs, config_path: Option<PathBuf>) -> Result<()> {
    let mut report = DoctorReport {
        config: CheckResult::error("Not checked"),
        gateway: CheckResult::error("Not checked"),
        generation: CheckResult::error("Not checked"),
        session: CheckResult::error("Not checked"),
        overall: "error".to_string(),
    };

    let config = match AppConfig::load(config_path.as_deref()) {
        Ok(c) => {
            report.config = CheckResult::ok("Configuration loaded successfully");
            Some(c)
        }
        Err(e) => {
            report.config = CheckResult::error(format!("Failed to load config: {:#}", e));
            None
        }
    };

    if let Some(ref config) = config {
        let session = build_session(config);
        report.session = check_session(config, &session);
        report.gateway = check_gateway(config, &session).await;
        report.generation = check_generation(config);
    }

    let checks = [
        &report.config,
        &report.gateway,
        &report.generation,
        &report.session,
    ];

    let has_error = checks.iter().any(|c| c.is_error());
    let all_ok = checks.iter().all(|c| c.is_ok());

    report.overall = if has_error {
        "error".to_string()
    } else if all_ok {
        "ok".to_string()
    } else {
        "warn".to_string()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if report.overall == "error" {
        std::process::exit(1);
    }

    Ok(())
}

async fn check_gateway(config: &AppConfig, session: &Session) -> CheckResult {
    let kind = &config.gateway.kind;

    let gateway = match build_gateway(config, session).await {
        Ok(g) => g,
        Err(e) => return CheckResult::error(format!("Gateway {}: {:#}", kind, e)),
    };

    match gateway
        .list_articles(&ArticleQuery::published().with_limit(1))
        .await
    {
        Ok(rows) => {
            let message = if kind == "memory" {
                "Gateway: memory (nothing is persisted)".to_string()
            } else {
                format!("Gateway: {}, reachable", kind)
            };
            let result = if kind == "memory" {
                CheckResult::warn(message)
            } else {
                CheckResult::ok(message)
            };
            result.with_details(serde_json::json!({
                "kind": kind,
                "has_published_articles": !rows.is_empty(),
            }))
        }
        Err(e) => CheckResult::error(format!("Gateway {} query failed: {}", kind, e)),
    }
}

fn check_generation(config: &AppConfig) -> CheckResult {
    let generation = &config.generation;

    match generation.provider.as_str() {
        "stub" => CheckResult::ok("Provider: stub (offline)"),
        "openai" => {
            let env_var = &generation.openai.api_key_env;
            if env_var.is_empty() {
                return CheckResult::error("No API key env var configured for openai");
            }

            match std::env::var(env_var) {
                Ok(val) if !val.is_empty() => CheckResult::ok(format!(
                    "Provider: openai, Model: {}, API key: {} (set)",
                    generation.model, env_var
                )),
                _ => CheckResult::warn(format!(
                    "Provider: openai, Model: {}, API key: {} (not set)",
                    generation.model, env_var
                )),
            }
        }
        other => CheckResult::error(format!("Unknown provider: {}", other)),
    }
}

fn check_session(config: &AppConfig, session: &Session) -> CheckResult {
    let Some(user) = session.user() else {
        return CheckResult::warn("Anonymous session: favorites and comments are disabled");
    };

    if user.email.is_empty() {
        return CheckResult::warn(format!("Signed in as {} without an email", user.id));
    }

    let role = match user.role {
        Role::Admin => "admin",
        Role::Reader => "reader",
    };

    CheckResult::ok(format!("Signed in as {} <{}> ({})", user.id, user.email, role))
        .with_details(serde_json::json!({
            "role": role,
            "admin_emails": config.admin.emails.len(),
        }))
}

fn print_report(report: &DoctorReport) {
    println!("gazette Doctor Report");
    println!("=====================");
    println!();

    print_check("Config", &report.config);
    print_check("Gateway", &report.gateway);
    print_check("Generation", &report.generation);
    print_check("Session", &report.session);

    println!();
    let symbol = match report.overall.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} Overall: {}", symbol, report.overall.to_uppercase());

    if report.overall != "error" {
        println!();
        println!("Ready! Try: gazette feed");
    }
}

fn print_check(name: &str, result: &CheckResult) {
    let symbol = match result.status.as_str() {
        "ok" => "✓",
        "warn" => "⚠",
        _ => "✗",
    };
    println!("{} {}: {}", symbol, name, result.message);
}

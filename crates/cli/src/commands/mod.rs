//! Command implementations and the wiring they share

pub mod admin;
pub mod article;
pub mod banner;
pub mod config;
pub mod doctor;
pub mod favorites;
pub mod feed;

use anyhow::{Context, Result, bail};
use gazette_adapters::gateway::{InMemoryGateway, RestGateway, SqliteGateway};
use gazette_adapters::generation::{
    GenerationConfig as AdapterGenerationConfig, OpenAiGenerator, StubGenerator,
};
use gazette_domain::policy::RolePolicy;
use gazette_domain::{ContentGenerator, Gateway, Session};
use secrecy::SecretString;
use std::sync::Arc;

use crate::config::AppConfig;

/// Build the session from the configured identity
pub(crate) fn build_session(config: &AppConfig) -> Session {
    let user_id = config.session.user_id.trim();
    if user_id.is_empty() {
        return Session::anonymous();
    }

    let policy = RolePolicy::new(config.admin.emails.clone());
    let user = policy.user(user_id, config.session.email.trim());
    tracing::debug!(user_id = %user.id, role = ?user.role, "Session resolved");
    Session::signed_in(user)
}

pub(crate) async fn build_gateway(
    config: &AppConfig,
    session: &Session,
) -> Result<Arc<dyn Gateway>> {
    let gateway = &config.gateway;

    match gateway.kind.as_str() {
        "sqlite" => {
            let store = SqliteGateway::new(&gateway.db_path)
                .await
                .with_context(|| {
                    format!("Failed to open SQLite database {}", gateway.db_path.display())
                })?;
            Ok(Arc::new(store))
        }
        "rest" => {
            if gateway.base_url.trim().is_empty() {
                bail!("gateway.base_url is required for the rest gateway");
            }
            let api_key = load_api_key(&gateway.api_key_env, "rest gateway")?;
            let mut store = RestGateway::new(gateway.base_url.trim(), api_key, gateway.timeout_secs)
                .context("Failed to build REST gateway")?;

            if session.is_signed_in() {
                match load_api_key(&config.session.access_token_env, "session") {
                    Ok(token) => store = store.with_access_token(token),
                    Err(e) => tracing::warn!(error = %e, "No access token, using the anonymous key"),
                }
            }
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(InMemoryGateway::new())),
        other => bail!("Unknown gateway kind: {}", other),
    }
}

pub(crate) fn build_generator(config: &AppConfig) -> Result<Arc<dyn ContentGenerator>> {
    let generation = &config.generation;

    match generation.provider.as_str() {
        "openai" => {
            let api_key = load_api_key(&generation.openai.api_key_env, "openai")?;
            let generator = OpenAiGenerator::with_base_url(
                api_key,
                generation.openai.base_url.clone(),
                AdapterGenerationConfig {
                    model: generation.model.clone(),
                    image_model: generation.image_model.clone(),
                    image_size: generation.image_size.clone(),
                    timeout_secs: generation.timeout_secs,
                },
            )
            .context("Failed to build OpenAI generator")?;
            Ok(Arc::new(generator))
        }
        "stub" => Ok(Arc::new(StubGenerator::new())),
        other => bail!("Unknown generation provider: {}", other),
    }
}

pub(crate) fn load_api_key(env_var: &str, provider: &str) -> Result<SecretString> {
    if env_var.trim().is_empty() {
        bail!("No API key env var configured for {}", provider);
    }

    let key = std::env::var(env_var)
        .with_context(|| format!("Missing API key env var {} for {}", env_var, provider))?;

    if key.trim().is_empty() {
        bail!("API key env var {} is empty for {}", env_var, provider);
    }

    Ok(SecretString::new(key.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gazette_domain::Role;

    fn config_with_user(user_id: &str, email: &str, admins: &[&str]) -> AppConfig {
        let mut config = AppConfig::default();
        config.session.user_id = user_id.to_string();
        config.session.email = email.to_string();
        config.admin.emails = admins.iter().map(|e| e.to_string()).collect();
        config
    }

    #[test]
    fn test_empty_user_is_anonymous() {
        let session = build_session(&AppConfig::default());
        assert!(!session.is_signed_in());
    }

    #[test]
    fn test_admin_email_grants_admin_role() {
        let session = build_session(&config_with_user(
            "u1",
            "Boss@Example.fr",
            &["boss@example.fr"],
        ));
        assert_eq!(session.role(), Some(Role::Admin));

        let reader = build_session(&config_with_user("u2", "lecteur@example.fr", &["boss@example.fr"]));
        assert_eq!(reader.role(), Some(Role::Reader));
    }

    #[test]
    fn test_missing_key_env_is_error() {
        let result = load_api_key("GAZETTE_TEST_UNSET_KEY_VAR", "openai");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unknown_gateway_kind_is_error() {
        let mut config = AppConfig::default();
        config.gateway.kind = "ftp".to_string();
        let result = build_gateway(&config, &Session::anonymous()).await;
        assert!(result.is_err());
    }
}

//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub admin: AdminConfig,

    #[serde(default)]
    pub carousel: CarouselConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Public origin used to build article and share URLs
    #[serde(default = "default_site_url")]
    pub site_url: String,
}

/// The signed-in identity; an empty user id means anonymous
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub user_id: String,

    #[serde(default)]
    pub email: String,

    /// Env var holding the user's access token for the hosted gateway
    #[serde(default = "default_access_token_env")]
    pub access_token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// rest, sqlite or memory
    #[serde(default = "default_gateway_kind")]
    pub kind: String,

    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    #[serde(default)]
    pub base_url: String,

    #[serde(default = "default_gateway_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_gateway_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// openai or stub
    #[serde(default = "default_provider")]
    pub provider: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_image_model")]
    pub image_model: String,

    #[serde(default = "default_image_size")]
    pub image_size: String,

    #[serde(default = "default_true")]
    pub generate_images: bool,

    #[serde(default = "default_generation_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub openai: OpenAiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    /// Accounts granted the admin role
    #[serde(default)]
    pub emails: Vec<String>,

    /// Batch generation topics; empty uses the built-in list
    #[serde(default)]
    pub topics: Vec<String>,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselConfig {
    #[serde(default = "default_banner_url")]
    pub banner_url: String,

    #[serde(default = "default_rotation_secs")]
    pub rotation_secs: u64,
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_site_url() -> String {
    "http://localhost:5173".to_string()
}

fn default_access_token_env() -> String {
    "GAZETTE_ACCESS_TOKEN".to_string()
}

fn default_gateway_kind() -> String {
    "sqlite".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./gazette.sqlite")
}

fn default_gateway_api_key_env() -> String {
    "GAZETTE_API_KEY".to_string()
}

fn default_gateway_timeout() -> u64 {
    30
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_true() -> bool {
    true
}

fn default_generation_timeout() -> u64 {
    60
}

fn default_openai_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_batch_size() -> usize {
    2
}

fn default_recent_limit() -> usize {
    10
}

fn default_banner_url() -> String {
    "https://res.cloudinary.com/daroyxenr/image/upload/q_auto:best/v1739102257/Designer_9_j5mysd.avif"
        .to_string()
}

fn default_rotation_secs() -> u64 {
    5
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            site_url: default_site_url(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            email: String::new(),
            access_token_env: default_access_token_env(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            kind: default_gateway_kind(),
            db_path: default_db_path(),
            base_url: String::new(),
            api_key_env: default_gateway_api_key_env(),
            timeout_secs: default_gateway_timeout(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
            generate_images: default_true(),
            timeout_secs: default_generation_timeout(),
            openai: OpenAiConfig::default(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key_env: default_openai_api_key_env(),
            base_url: default_openai_base_url(),
        }
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            emails: vec![],
            topics: vec![],
            batch_size: default_batch_size(),
            recent_limit: default_recent_limit(),
        }
    }
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            banner_url: default_banner_url(),
            rotation_secs: default_rotation_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Try default config path if none specified
        let default_path = PathBuf::from("./gazette.toml");
        let path = config_path.unwrap_or(&default_path);

        if path.exists() {
            builder = builder.add_source(config::File::from(path));
        } else if config_path.is_some() {
            anyhow::bail!("Config file not found: {}", path.display());
        }

        // Environment overrides, e.g. GAZETTE__GATEWAY__KIND=memory
        builder = builder.add_source(
            config::Environment::with_prefix("GAZETTE")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("admin.emails")
                .with_list_parse_key("admin.topics"),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Generate example configuration as TOML string
    pub fn example_toml() -> String {
        r#"# gazette configuration

[general]
log_level = "info"
site_url = "http://localhost:5173"

[session]
# Leave user_id empty to browse anonymously
user_id = ""
email = ""
access_token_env = "GAZETTE_ACCESS_TOKEN"

[gateway]
kind = "sqlite"  # rest, sqlite, memory
db_path = "./gazette.sqlite"
# base_url = "https://your-project.supabase.co"
api_key_env = "GAZETTE_API_KEY"
timeout_secs = 30

[generation]
provider = "openai"  # openai, stub
model = "gpt-3.5-turbo"
image_model = "dall-e-3"
image_size = "1024x1024"
generate_images = true
timeout_secs = 60

[generation.openai]
api_key_env = "OPENAI_API_KEY"
base_url = "https://api.openai.com/v1"

[admin]
emails = ["admin@example.fr"]
# topics = ["Latest Technology Trends in 2025", "Remote Work Best Practices"]
batch_size = 2
recent_limit = 10

[carousel]
banner_url = "https://res.cloudinary.com/daroyxenr/image/upload/q_auto:best/v1739102257/Designer_9_j5mysd.avif"
rotation_secs = 5
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_toml_parses_to_defaults() {
        let parsed: AppConfig = toml::from_str(&AppConfig::example_toml()).unwrap();

        assert_eq!(parsed.gateway.kind, "sqlite");
        assert_eq!(parsed.generation.model, "gpt-3.5-turbo");
        assert_eq!(parsed.admin.batch_size, 2);
        assert_eq!(parsed.admin.emails, vec!["admin@example.fr".to_string()]);
        assert_eq!(parsed.carousel.rotation_secs, 5);
        assert!(parsed.session.user_id.is_empty());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let parsed: AppConfig = toml::from_str("[gateway]\nkind = \"memory\"\n").unwrap();

        assert_eq!(parsed.gateway.kind, "memory");
        assert_eq!(parsed.gateway.timeout_secs, 30);
        assert_eq!(parsed.admin.recent_limit, 10);
        assert_eq!(parsed.general.site_url, "http://localhost:5173");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/gazette.toml")));
        assert!(result.is_err());
    }
}

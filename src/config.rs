//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/audiotailoc/config.toml`),
//! then overridden by environment variables so containers can be configured
//! without a file. Every section has working development defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Default config location: `<config dir>/audiotailoc/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("audiotailoc")
        .join("config.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds allowed for in-flight requests after a shutdown signal
    pub shutdown_timeout: u64,
    /// Allowed CORS origins; empty means any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3010,
            shutdown_timeout: 30,
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: "sqlite://./audiotailoc.db?mode=rwc".to_string(),
            max_connections: 10,
        }
    }
}

impl DatabaseSection {
    pub fn connection_url(&self) -> String {
        self.url.clone()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Static key accepted in `X-API-Key` with admin rights (dashboard jobs)
    pub admin_api_key: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "audiotailoc-dev-secret-change-me".to_string(),
            jwt_expiration_hours: 24,
            admin_api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Accounts with these emails are admins; missing ones are created at boot
    pub emails: Vec<String>,
    pub default_password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            emails: vec!["admin@audiotailoc.com".to_string()],
            default_password: "Admin@123456".to_string(),
        }
    }
}

impl AdminConfig {
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.emails.iter().any(|e| e.eq_ignore_ascii_case(email))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub dir: PathBuf,
    /// Prefix for public file URLs, e.g. `https://api.audiotailoc.com/uploads`
    pub public_base_url: String,
    pub max_size_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./uploads"),
            public_base_url: "/uploads".to_string(),
            max_size_bytes: 10 * 1024 * 1024,
            allowed_mime_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
                "image/gif".to_string(),
                "application/pdf".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VnpayConfig {
    pub tmn_code: String,
    pub hash_secret: String,
    pub pay_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MomoConfig {
    pub partner_code: String,
    pub access_key: String,
    pub secret_key: String,
    pub checkout_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PayosConfig {
    pub client_id: String,
    pub api_key: String,
    pub checksum_key: String,
    pub checkout_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    pub return_url: String,
    pub vnpay: VnpayConfig,
    pub momo: MomoConfig,
    pub payos: PayosConfig,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            return_url: "http://localhost:3000/checkout/return".to_string(),
            vnpay: VnpayConfig {
                pay_url: "https://sandbox.vnpayment.vn/paymentv2/vpcpay.html".to_string(),
                ..VnpayConfig::default()
            },
            momo: MomoConfig {
                checkout_url: "https://test-payment.momo.vn/v2/gateway/pay".to_string(),
                ..MomoConfig::default()
            },
            payos: PayosConfig {
                checkout_url: "https://pay.payos.vn/web".to_string(),
                ..PayosConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct I18nConfig {
    pub default_locale: String,
    pub supported_locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "vi".to_string(),
            supported_locales: vec!["vi".to_string(), "en".to_string()],
        }
    }
}

/// Full application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
    pub uploads: UploadConfig,
    pub payments: PaymentConfig,
    pub i18n: I18nConfig,
}

impl AppConfig {
    /// Load from `path` (defaults when the file does not exist), then apply
    /// environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply overrides from a variable lookup (the process env in production).
    pub fn apply_env(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("DATABASE_URL") {
            self.database.url = v;
        }
        if let Some(v) = get("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = v;
        }
        if let Some(v) = get("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = get("ADMIN_API_KEY") {
            self.security.admin_api_key = Some(v);
        }
        if let Some(v) = get("ADMIN_EMAILS") {
            self.admin.emails = v
                .split(',')
                .map(|e| e.trim().to_lowercase())
                .filter(|e| !e.is_empty())
                .collect();
        }
        if let Some(v) = get("UPLOAD_DIR") {
            self.uploads.dir = PathBuf::from(v);
        }
        if let Some(v) = get("PUBLIC_BASE_URL") {
            self.uploads.public_base_url = v;
        }
        if let Some(v) = get("PAYMENT_RETURN_URL") {
            self.payments.return_url = v;
        }
        if let Some(v) = get("VNPAY_TMN_CODE") {
            self.payments.vnpay.tmn_code = v;
        }
        if let Some(v) = get("VNPAY_HASH_SECRET") {
            self.payments.vnpay.hash_secret = v;
        }
        if let Some(v) = get("MOMO_PARTNER_CODE") {
            self.payments.momo.partner_code = v;
        }
        if let Some(v) = get("MOMO_ACCESS_KEY") {
            self.payments.momo.access_key = v;
        }
        if let Some(v) = get("MOMO_SECRET_KEY") {
            self.payments.momo.secret_key = v;
        }
        if let Some(v) = get("PAYOS_CLIENT_ID") {
            self.payments.payos.client_id = v;
        }
        if let Some(v) = get("PAYOS_API_KEY") {
            self.payments.payos.api_key = v;
        }
        if let Some(v) = get("PAYOS_CHECKSUM_KEY") {
            self.payments.payos.checksum_key = v;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.security.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("security.jwt_secret is empty".into()));
        }
        if self.security.jwt_expiration_hours <= 0 {
            return Err(ConfigError::Invalid(
                "security.jwt_expiration_hours must be positive".into(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must not be 0".into()));
        }
        if self.uploads.max_size_bytes == 0 {
            return Err(ConfigError::Invalid(
                "uploads.max_size_bytes must be positive".into(),
            ));
        }
        if !self
            .i18n
            .supported_locales
            .iter()
            .any(|l| l == &self.i18n.default_locale)
        {
            return Err(ConfigError::Invalid(format!(
                "i18n.default_locale '{}' is not in supported_locales",
                self.i18n.default_locale
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_are_valid() {
        let cfg = AppConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.i18n.default_locale, "vi");
        assert_eq!(cfg.server.address(), "0.0.0.0:3010");
    }

    #[test]
    fn gateway_credentials_default_to_empty() {
        let cfg = AppConfig::default();
        assert!(cfg.payments.vnpay.tmn_code.is_empty());
        assert!(cfg.payments.vnpay.hash_secret.is_empty());
        assert!(cfg.payments.momo.secret_key.is_empty());
        assert!(cfg.payments.payos.checksum_key.is_empty());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 8080

            [admin]
            emails = ["owner@audiotailoc.com"]
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert!(cfg.admin.is_admin_email("OWNER@audiotailoc.com"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("DATABASE_URL", "sqlite::memory:"),
            ("ADMIN_EMAILS", "a@x.vn, B@x.vn ,"),
            ("PORT", "9999"),
            ("PAYOS_CHECKSUM_KEY", "chk"),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.admin.emails, vec!["a@x.vn", "b@x.vn"]);
        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.payments.payos.checksum_key, "chk");
    }

    #[test]
    fn invalid_settings_are_reported() {
        let mut cfg = AppConfig::default();
        cfg.security.jwt_secret = " ".into();
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));

        let mut cfg = AppConfig::default();
        cfg.i18n.default_locale = "fr".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load(Path::new("/definitely/not/here.toml")).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.i18n.supported_locales, vec!["vi", "en"]);
    }
}

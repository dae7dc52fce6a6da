//! Configuration module
//!
//! Reads a TOML file (default `~/.config/tabletime/config.toml`, override
//! with the `TABLETIME_CONFIG` env var). Every section has sensible
//! defaults so the service runs out of the box with the in-memory or
//! JSON-file store and payments/notifications disabled until configured.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub venue: VenueConfig,
    pub pricing: PricingConfig,
    pub payment: PaymentConfig,
    pub notifications: NotificationConfig,
    pub storage: StorageConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// REST API bind host
    pub host: String,
    /// REST API port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// Venue-day configuration: slot labels and seats per slot.
///
/// Capacity may be adjusted at runtime by staff; this is the startup value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueConfig {
    /// Ordered slot labels offered for booking
    pub slots: Vec<String>,
    /// Seats available per slot
    pub capacity_per_slot: u32,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            slots: [
                "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "17:00",
                "17:30", "18:00", "18:30", "19:00", "19:30", "20:00", "20:30", "21:00",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            capacity_per_slot: 40,
        }
    }
}

/// Deposit pricing policy. Money values are minor currency units (cents).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Estimated price per seat
    pub price_per_seat: i64,
    /// Deposit share of the estimated total, 0.0..=1.0
    pub deposit_percent: f64,
    /// Deposit floor
    pub minimum_deposit: i64,
    /// ISO 4217 currency code
    pub currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            price_per_seat: 500,
            deposit_percent: 0.2,
            minimum_deposit: 100,
            currency: "USD".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentConfig {
    /// Payment provider REST base URL (sandbox by default)
    pub base_url: String,
    /// OAuth client ID; empty disables the deposit flow
    pub client_id: String,
    /// OAuth client secret
    pub client_secret: String,
    /// Upper bound for each payment-service call, in seconds
    pub timeout_secs: u64,
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-m.sandbox.paypal.com".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            timeout_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Notification API base URL
    pub api_base: String,
    /// Notification API project identifier
    pub project_id: String,
    /// Notification API key
    pub api_key: String,
    /// Staff inbox for reservation/deposit notifications; unset = skip
    pub staff_email: Option<String>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.notificationapi.com".to_string(),
            project_id: String::new(),
            api_key: String::new(),
            staff_email: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// `json` (flat data file) or `memory`
    pub backend: String,
    /// Data file for the `json` backend
    pub data_file: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: "json".to_string(),
            data_file: None,
        }
    }
}

impl StorageConfig {
    /// Resolved data file path for the JSON backend.
    pub fn data_file_path(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(|| {
            dirs_next::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tabletime")
                .join("reservations.json")
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Shared token identifying the staff role (`X-Staff-Token` header).
    /// Empty disables all staff endpoints.
    pub staff_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default config file location: `~/.config/tabletime/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabletime")
        .join("config.toml")
}

// ── Tests ──────────────────────────────────────────────────────

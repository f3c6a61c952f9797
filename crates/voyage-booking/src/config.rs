//! # Booking Configuration
//!
//! Pricing, mock supplier latency and storage settings.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VOYAGE_NGN_RATE=1650                                               │
//! │     VOYAGE_STORAGE=file                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/voyage/booking.toml (Linux)                              │
//! │     ~/Library/Application Support/com.voyage.booking/booking.toml      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     7.5% VAT, 5% visa fee, ₦1650/$, in-memory storage                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # booking.toml
//! [pricing]
//! tax_rate_bps = 750
//! visa_service_fee_bps = 500
//! ngn_rate = 1650.0
//!
//! [latency]
//! flight_order_ms = 2200
//! hotel_availability_ms = 1400
//!
//! [storage]
//! backend = "file"   # memory | file
//! directory = "/var/lib/voyage"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use voyage_core::{Currency, ExchangeRate, Rate, DEFAULT_NGN_RATE, DEFAULT_TAX_RATE, VISA_SERVICE_FEE_RATE};

use crate::error::{BookingError, BookingResult};

// =============================================================================
// Pricing
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// VAT in basis points (750 = 7.5%).
    #[serde(default = "default_tax_rate_bps")]
    pub tax_rate_bps: u32,

    /// Visa service fee in basis points (500 = 5%).
    #[serde(default = "default_visa_service_fee_bps")]
    pub visa_service_fee_bps: u32,

    /// Naira per US dollar.
    #[serde(default = "default_ngn_rate")]
    pub ngn_rate: f64,
}

fn default_tax_rate_bps() -> u32 {
    DEFAULT_TAX_RATE.bps()
}

fn default_visa_service_fee_bps() -> u32 {
    VISA_SERVICE_FEE_RATE.bps()
}

fn default_ngn_rate() -> f64 {
    DEFAULT_NGN_RATE as f64
}

impl Default for PricingConfig {
    fn default() -> Self {
        PricingConfig {
            tax_rate_bps: default_tax_rate_bps(),
            visa_service_fee_bps: default_visa_service_fee_bps(),
            ngn_rate: default_ngn_rate(),
        }
    }
}

/// Validated pricing inputs handed to every store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingContext {
    pub tax_rate: Rate,
    pub visa_service_fee: Rate,
    pub ngn_rate: ExchangeRate,
}

impl Default for PricingContext {
    fn default() -> Self {
        PricingContext {
            tax_rate: DEFAULT_TAX_RATE,
            visa_service_fee: VISA_SERVICE_FEE_RATE,
            ngn_rate: ExchangeRate::from_whole(Currency::Usd, Currency::Ngn, DEFAULT_NGN_RATE),
        }
    }
}

impl PricingConfig {
    pub fn context(&self) -> BookingResult<PricingContext> {
        Ok(PricingContext {
            tax_rate: Rate::try_from_bps(self.tax_rate_bps)?,
            visa_service_fee: Rate::try_from_bps(self.visa_service_fee_bps)?,
            ngn_rate: ExchangeRate::from_decimal(Currency::Usd, Currency::Ngn, self.ngn_rate)?,
        })
    }
}

// =============================================================================
// Latency
// =============================================================================

/// Simulated supplier latency for the mock gateway (milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    #[serde(default = "default_flight_order_ms")]
    pub flight_order_ms: u64,
    #[serde(default = "default_hotel_availability_ms")]
    pub hotel_availability_ms: u64,
    #[serde(default = "default_booking_ms")]
    pub hotel_booking_ms: u64,
    #[serde(default = "default_tour_packages_ms")]
    pub tour_packages_ms: u64,
    #[serde(default = "default_booking_ms")]
    pub tour_booking_ms: u64,
    #[serde(default = "default_login_ms")]
    pub login_ms: u64,
    #[serde(default = "default_register_ms")]
    pub register_ms: u64,
    #[serde(default = "default_forgot_password_ms")]
    pub forgot_password_ms: u64,
    #[serde(default = "default_profile_ms")]
    pub profile_ms: u64,
}

fn default_flight_order_ms() -> u64 {
    2200
}

fn default_hotel_availability_ms() -> u64 {
    1400
}

fn default_booking_ms() -> u64 {
    2000
}

fn default_tour_packages_ms() -> u64 {
    1300
}

fn default_login_ms() -> u64 {
    900
}

fn default_register_ms() -> u64 {
    1000
}

fn default_forgot_password_ms() -> u64 {
    800
}

fn default_profile_ms() -> u64 {
    700
}

impl Default for LatencyConfig {
    fn default() -> Self {
        LatencyConfig {
            flight_order_ms: default_flight_order_ms(),
            hotel_availability_ms: default_hotel_availability_ms(),
            hotel_booking_ms: default_booking_ms(),
            tour_packages_ms: default_tour_packages_ms(),
            tour_booking_ms: default_booking_ms(),
            login_ms: default_login_ms(),
            register_ms: default_register_ms(),
            forgot_password_ms: default_forgot_password_ms(),
            profile_ms: default_profile_ms(),
        }
    }
}

impl LatencyConfig {
    /// No simulated latency at all.
    pub fn none() -> Self {
        LatencyConfig {
            flight_order_ms: 0,
            hotel_availability_ms: 0,
            hotel_booking_ms: 0,
            tour_packages_ms: 0,
            tour_booking_ms: 0,
            login_ms: 0,
            register_ms: 0,
            forgot_password_ms: 0,
            profile_ms: 0,
        }
    }

    pub fn duration(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }
}

// =============================================================================
// Storage
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// Lost when the process exits.
    #[default]
    Memory,
    /// One JSON file per key.
    File,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Memory => write!(f, "memory"),
            StorageBackend::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "file" | "disk" => Ok(StorageBackend::File),
            other => Err(BookingError::Config(format!(
                "Unknown storage backend: '{}'. Valid options: memory, file",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend. Defaults to the platform data dir.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

// =============================================================================
// Booking Config
// =============================================================================

/// Complete configuration for the booking services.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BookingConfig {
    #[serde(default)]
    pub pricing: PricingConfig,

    #[serde(default)]
    pub latency: LatencyConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl BookingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (booking.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> BookingResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading booking config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load booking config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> BookingResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| BookingError::Config("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Booking config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> BookingResult<()> {
        if !self.pricing.ngn_rate.is_finite() || self.pricing.ngn_rate <= 0.0 {
            return Err(BookingError::Config(format!(
                "ngn_rate must be a positive number, got: {}",
                self.pricing.ngn_rate
            )));
        }

        if self.pricing.tax_rate_bps > Rate::MAX_BPS {
            return Err(BookingError::Config(format!(
                "tax_rate_bps must be at most {}, got: {}",
                Rate::MAX_BPS,
                self.pricing.tax_rate_bps
            )));
        }

        if self.pricing.visa_service_fee_bps > Rate::MAX_BPS {
            return Err(BookingError::Config(format!(
                "visa_service_fee_bps must be at most {}, got: {}",
                Rate::MAX_BPS,
                self.pricing.visa_service_fee_bps
            )));
        }

        Ok(())
    }

    /// Applies `VOYAGE_*` overrides read through `lookup`.
    ///
    /// `load` passes the process environment; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bps) = lookup("VOYAGE_TAX_RATE_BPS") {
            match bps.parse::<u32>() {
                Ok(v) => {
                    debug!(tax_rate_bps = v, "Overriding tax rate from environment");
                    self.pricing.tax_rate_bps = v;
                }
                Err(_) => warn!(value = %bps, "Ignoring non-numeric VOYAGE_TAX_RATE_BPS"),
            }
        }

        if let Some(bps) = lookup("VOYAGE_VISA_FEE_BPS") {
            if let Ok(v) = bps.parse::<u32>() {
                self.pricing.visa_service_fee_bps = v;
            }
        }

        if let Some(rate) = lookup("VOYAGE_NGN_RATE") {
            match rate.parse::<f64>() {
                Ok(v) => {
                    debug!(ngn_rate = v, "Overriding naira rate from environment");
                    self.pricing.ngn_rate = v;
                }
                Err(_) => warn!(value = %rate, "Ignoring non-numeric VOYAGE_NGN_RATE"),
            }
        }

        if let Some(backend) = lookup("VOYAGE_STORAGE") {
            match backend.parse() {
                Ok(parsed) => self.storage.backend = parsed,
                Err(e) => warn!(error = %e, "Ignoring VOYAGE_STORAGE"),
            }
        }

        if let Some(dir) = lookup("VOYAGE_STORAGE_DIR") {
            self.storage.directory = Some(PathBuf::from(dir));
        }

        if let Some(latency) = lookup("VOYAGE_LATENCY") {
            if latency.eq_ignore_ascii_case("none") || latency == "0" {
                debug!("Disabling simulated supplier latency");
                self.latency = LatencyConfig::none();
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "voyage", "booking").map(|dirs| dirs.config_dir().join("booking.toml"))
    }

    /// Returns the default directory of the file storage backend.
    pub fn default_data_dir() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "voyage", "booking").map(|dirs| dirs.data_dir().to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = BookingConfig::default();
        assert_eq!(config.pricing.tax_rate_bps, 750);
        assert_eq!(config.pricing.visa_service_fee_bps, 500);
        assert!((config.pricing.ngn_rate - 1650.0).abs() < f64::EPSILON);
        assert_eq!(config.latency.flight_order_ms, 2200);
        assert_eq!(config.latency.tour_packages_ms, 1300);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let toml_str = r#"
            [pricing]
            ngn_rate = 1580.5

            [storage]
            backend = "file"
        "#;

        let config: BookingConfig = toml::from_str(toml_str).unwrap();
        assert!((config.pricing.ngn_rate - 1580.5).abs() < f64::EPSILON);
        assert_eq!(config.pricing.tax_rate_bps, 750);
        assert_eq!(config.latency, LatencyConfig::default());
        assert_eq!(config.storage.backend, StorageBackend::File);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = BookingConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: BookingConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = BookingConfig::default();
        config.apply_overrides(lookup_from(&[
            ("VOYAGE_TAX_RATE_BPS", "800"),
            ("VOYAGE_NGN_RATE", "1700"),
            ("VOYAGE_STORAGE", "file"),
            ("VOYAGE_STORAGE_DIR", "/tmp/voyage"),
            ("VOYAGE_LATENCY", "none"),
        ]));

        assert_eq!(config.pricing.tax_rate_bps, 800);
        assert!((config.pricing.ngn_rate - 1700.0).abs() < f64::EPSILON);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.directory, Some(PathBuf::from("/tmp/voyage")));
        assert_eq!(config.latency, LatencyConfig::none());
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let mut config = BookingConfig::default();
        config.apply_overrides(lookup_from(&[("VOYAGE_NGN_RATE", "lots"), ("VOYAGE_STORAGE", "s3")]));
        assert_eq!(config, BookingConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = BookingConfig::default();
        config.pricing.ngn_rate = 0.0;
        assert!(matches!(config.validate(), Err(BookingError::Config(_))));

        let mut config = BookingConfig::default();
        config.pricing.tax_rate_bps = 10_001;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pricing_context() {
        let ctx = PricingConfig::default().context().unwrap();
        assert_eq!(ctx, PricingContext::default());
        assert_eq!(ctx.tax_rate.bps(), 750);
    }

    #[test]
    fn test_storage_backend_parsing() {
        assert_eq!("memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert_eq!("FILE".parse::<StorageBackend>().unwrap(), StorageBackend::File);
        assert!("s3".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let path = std::env::temp_dir().join(format!("voyage-missing-{}.toml", uuid::Uuid::new_v4()));
        let config = BookingConfig::load_or_default(Some(path));
        assert_eq!(config.pricing, PricingConfig::default());
    }
}

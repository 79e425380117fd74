//! Server configuration.
//!
//! Values come from the process environment, which `main` first seeds from
//! an optional `.env` file.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};
use tracing::warn;

use crate::fare::NightFarePolicy;

/// Addis Ababa is UTC+3 all year.
const DEFAULT_UTC_OFFSET_HOURS: i32 = 3;

/// Configuration for the fare server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Document store file
    pub data_path: PathBuf,
    /// Per-call deadline for store operations, in seconds
    pub store_timeout_secs: u64,
    pub osrm_base_url: String,
    /// Per-request deadline for directions, in seconds
    pub directions_timeout_secs: u64,
    /// Offset of the local clock used for night fares
    pub utc_offset_hours: i32,
    /// Browser origin allowed by CORS
    pub allowed_origin: String,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_upload_preset: Option<String>,
    pub resend_api_key: Option<String>,
    pub admin_email: Option<String>,
    pub night_policy: NightFarePolicy,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            data_path: PathBuf::from("data/taxi_fare_db.json"),
            store_timeout_secs: 10,
            osrm_base_url: "http://router.project-osrm.org".to_string(),
            directions_timeout_secs: 10,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            allowed_origin: "http://localhost:3000".to_string(),
            static_dir: PathBuf::from("static"),
            cloudinary_cloud_name: None,
            cloudinary_upload_preset: None,
            resend_api_key: None,
            admin_email: None,
            night_policy: NightFarePolicy::default(),
        }
    }
}

impl ServerConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            host: text("HOST").unwrap_or(defaults.host),
            port: number(text("PORT"), "PORT", defaults.port),
            data_path: text("DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),
            store_timeout_secs: number(
                text("STORE_TIMEOUT_SECS"),
                "STORE_TIMEOUT_SECS",
                defaults.store_timeout_secs,
            ),
            osrm_base_url: text("OSRM_BASE_URL").unwrap_or(defaults.osrm_base_url),
            directions_timeout_secs: number(
                text("DIRECTIONS_TIMEOUT_SECS"),
                "DIRECTIONS_TIMEOUT_SECS",
                defaults.directions_timeout_secs,
            ),
            utc_offset_hours: number(
                text("FARE_UTC_OFFSET_HOURS"),
                "FARE_UTC_OFFSET_HOURS",
                defaults.utc_offset_hours,
            ),
            allowed_origin: text("CORS_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            static_dir: text("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            cloudinary_cloud_name: text("CLOUDINARY_CLOUD_NAME"),
            cloudinary_upload_preset: text("CLOUDINARY_UPLOAD_PRESET"),
            resend_api_key: text("RESEND_API_KEY"),
            admin_email: text("ADMIN_EMAIL"),
            night_policy: defaults.night_policy,
        }
    }

    /// Socket address to listen on.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }

    /// Offset for local time. Out-of-range hours fall back to the default.
    pub fn fare_offset(&self) -> FixedOffset {
        self.utc_offset_hours
            .checked_mul(3600)
            .and_then(FixedOffset::east_opt)
            .or_else(|| FixedOffset::east_opt(DEFAULT_UTC_OFFSET_HOURS * 3600))
            .unwrap_or(Utc.fix())
    }
}

fn number<T>(raw: Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match raw {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, %default, "ignoring unparseable setting");
            default
        }),
    }
}

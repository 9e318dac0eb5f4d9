//! Studio configuration.

use crate::brand::{find_brand, Branding, NANO_BANANO};
use crate::error::{Result, StudioError};
use crate::image::EditingMode;
use std::time::Duration;

/// Interval between credential status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Settings for one studio session.
#[derive(Debug, Clone, Copy)]
pub struct StudioConfig {
    /// Active branding.
    pub brand: &'static Branding,
    /// Mode selected when the session starts.
    pub default_mode: EditingMode,
    /// How often the credential flag is refreshed.
    pub poll_interval: Duration,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            brand: &NANO_BANANO,
            default_mode: EditingMode::Standard,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl StudioConfig {
    /// Creates a new `StudioConfigBuilder`.
    pub fn builder() -> StudioConfigBuilder {
        StudioConfigBuilder::new()
    }

    /// Reads `BANANO_BRAND`, `BANANO_MODE` and `BANANO_POLL_INTERVAL_MS`.
    pub fn from_env() -> Result<Self> {
        Self::builder().with_env()?.build()
    }
}

/// Builder for StudioConfig.
#[derive(Debug, Clone, Default)]
pub struct StudioConfigBuilder {
    brand: Option<&'static Branding>,
    default_mode: Option<EditingMode>,
    poll_interval: Option<Duration>,
}

impl StudioConfigBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the branding.
    pub fn brand(mut self, brand: &'static Branding) -> Self {
        self.brand = Some(brand);
        self
    }

    /// Sets the branding by slug.
    pub fn brand_slug(self, slug: &str) -> Result<Self> {
        let brand = find_brand(slug)
            .ok_or_else(|| StudioError::InvalidRequest(format!("unknown brand: {slug}")))?;
        Ok(self.brand(brand))
    }

    /// Sets the starting mode.
    pub fn default_mode(mut self, mode: EditingMode) -> Self {
        self.default_mode = Some(mode);
        self
    }

    /// Sets the credential poll interval.
    pub fn poll_interval(mut self, every: Duration) -> Self {
        self.poll_interval = Some(every);
        self
    }

    /// Fills unset fields from the process environment.
    ///
    /// `BANANO_BRAND` is only consulted when no brand has been set.
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if self.brand.is_none() {
            if let Some(slug) = var("BANANO_BRAND") {
                self = self.brand_slug(&slug)?;
            }
        }
        if self.default_mode.is_none() {
            if let Some(mode) = var("BANANO_MODE") {
                let mode: EditingMode = mode.parse().map_err(StudioError::InvalidRequest)?;
                self = self.default_mode(mode);
            }
        }
        if self.poll_interval.is_none() {
            if let Some(ms) = var("BANANO_POLL_INTERVAL_MS") {
                let ms: u64 = ms.trim().parse().map_err(|_| {
                    StudioError::InvalidRequest(format!(
                        "BANANO_POLL_INTERVAL_MS is not a number: {ms}"
                    ))
                })?;
                self = self.poll_interval(Duration::from_millis(ms));
            }
        }
        Ok(self)
    }

    /// Builds the config, validating the poll interval.
    pub fn build(self) -> Result<StudioConfig> {
        let defaults = StudioConfig::default();
        let poll_interval = self.poll_interval.unwrap_or(defaults.poll_interval);
        if poll_interval.is_zero() {
            return Err(StudioError::InvalidRequest(
                "poll interval must be positive".into(),
            ));
        }
        Ok(StudioConfig {
            brand: self.brand.unwrap_or(defaults.brand),
            default_mode: self.default_mode.unwrap_or(defaults.default_mode),
            poll_interval,
        })
    }
}

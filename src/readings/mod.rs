//! Readings service
//!
//! Ties the pipeline together: date -> target URL -> transport -> extraction.
//! The service never returns an error; every failure is reported inside a
//! [`ResultEnvelope`].

mod types;

pub use types::{ExtractedReading, FailureEnvelope, ReadingsResult, ResultEnvelope, SuccessEnvelope};

use crate::config::{Config, FetchMode, SourceConfig};
use crate::date::{parse_reading_date, target_url, today};
use crate::extract::extract_readings;
use crate::fetch::{build_transport, Transport};
use crate::ReadingsError;
use std::sync::Arc;

/// Fetches and extracts the readings for a date
#[derive(Clone)]
pub struct ReadingsService {
    source: SourceConfig,
    transport: Arc<dyn Transport>,
}

impl ReadingsService {
    /// Creates a service over an explicit transport
    ///
    /// # Arguments
    ///
    /// * `source` - Base URL and date offset used to resolve page URLs
    /// * `transport` - How the page HTML is fetched
    pub fn new(source: SourceConfig, transport: Arc<dyn Transport>) -> Self {
        Self { source, transport }
    }

    /// Creates a service with the transport selected by the configuration
    pub fn from_config(config: &Config) -> Result<Self, ReadingsError> {
        let transport = build_transport(config)?;
        tracing::info!("Readings service using {} transport", transport.mode());
        Ok(Self::new(config.source.clone(), transport))
    }

    /// Fetch mode of the underlying transport
    pub fn mode(&self) -> FetchMode {
        self.transport.mode()
    }

    /// Resolves the page URL for a date string without fetching it
    pub fn resolve_url(&self, fecha: &str) -> Result<String, ReadingsError> {
        let date = parse_reading_date(fecha)?;
        target_url(&self.source.base_url, date, self.source.day_offset)
    }

    /// Retrieves the readings for `fecha` (`YYYY-MM-DD`)
    ///
    /// # Returns
    ///
    /// A success envelope echoing `fecha` with the resolved URL and the
    /// extracted readings, or a failure envelope with the error message.
    pub async fn get_readings(&self, fecha: &str) -> ResultEnvelope {
        match self.try_get_readings(fecha).await {
            Ok((url, lecturas)) => ResultEnvelope::success(fecha, url, lecturas),
            Err(e) => {
                tracing::error!("Failed to get readings for {:?}: {}", fecha, e);
                ResultEnvelope::failure(fecha, e.to_string())
            }
        }
    }

    /// Retrieves the readings for today's date
    pub async fn get_readings_today(&self) -> ResultEnvelope {
        self.get_readings(&today()).await
    }

    async fn try_get_readings(&self, fecha: &str) -> Result<(String, ReadingsResult), ReadingsError> {
        // Validate the date before any network access
        let url = self.resolve_url(fecha)?;
        tracing::info!("Fetching readings for {} from {}", fecha.trim(), url);

        let html = self.transport.fetch(&url).await?;
        let lecturas = extract_readings(&html);

        if lecturas == ReadingsResult::default() {
            tracing::warn!("No readings found in {}", url);
        }

        Ok((url, lecturas))
    }
}

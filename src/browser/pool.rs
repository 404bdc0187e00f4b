//! Persistent remote browser connection
//!
//! The pool holds at most one remote session. Every request first probes the
//! current session and reuses it when it answers. After a failed connection
//! attempt, new attempts are refused until the cool-down window has passed,
//! so an unreachable service is not hammered by every incoming request.
//!
//! The state lives behind an async mutex that is held across the probe and
//! the connect, which also serializes concurrent connection attempts. Both
//! steps are time-bounded so a stalled remote never holds the lock.

use crate::browser::{redact_endpoint, remote_endpoint, BrowserLauncher, BrowserSession};
use crate::config::BrowserConfig;
use crate::{ConfigError, ReadingsError};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{timeout, Instant};

/// Last failed connection attempt
#[derive(Debug, Clone)]
pub struct FailureMemo {
    /// When the attempt failed
    pub at: Instant,
    /// Error reported by the attempt, echoed while cooling down
    pub message: String,
}

/// Observable state of the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolStatus {
    /// No connection and nothing preventing a new attempt
    Empty,
    /// A connection is held (not probed by this call)
    Connected,
    /// A recent failure blocks reconnection for the remaining time
    CoolingDown {
        /// Time left before a new attempt is allowed
        remaining: Duration,
    },
}

/// Mutable pool state, guarded by the pool mutex
#[derive(Default)]
struct PoolState {
    current: Option<Arc<dyn BrowserSession>>,
    failure: Option<FailureMemo>,
}

/// Shared holder of the remote browser connection
pub struct BrowserPool {
    launcher: Arc<dyn BrowserLauncher>,
    endpoint: Option<String>,
    cooldown: Duration,
    probe_timeout: Duration,
    connect_timeout: Duration,
    state: Mutex<PoolState>,
}

impl BrowserPool {
    /// Creates a pool
    ///
    /// # Arguments
    ///
    /// * `launcher` - Driver used to open the remote connection
    /// * `endpoint` - Full remote endpoint including the token, or `None` when
    ///   no token is configured
    /// * `cooldown` - Minimum time between a failed attempt and the next one
    /// * `probe_timeout` - Upper bound for the liveness probe
    /// * `connect_timeout` - Upper bound for establishing a new connection
    pub fn new(
        launcher: Arc<dyn BrowserLauncher>,
        endpoint: Option<String>,
        cooldown: Duration,
        probe_timeout: Duration,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            launcher,
            endpoint,
            cooldown,
            probe_timeout,
            connect_timeout,
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Creates a pool from configuration, reading the token from the environment
    pub fn from_config(
        config: &BrowserConfig,
        launcher: Arc<dyn BrowserLauncher>,
    ) -> Result<Self, ConfigError> {
        let endpoint = config
            .token()
            .map(|token| remote_endpoint(&config.endpoint, &token))
            .transpose()?;

        if endpoint.is_none() {
            tracing::info!(
                "{} not set, rendered mode will use a local browser",
                config.token_env
            );
        }

        Ok(Self::new(
            launcher,
            endpoint,
            Duration::from_millis(config.cooldown_ms),
            Duration::from_millis(config.probe_timeout_ms),
            Duration::from_millis(config.connect_timeout_ms),
        ))
    }

    /// Whether a remote endpoint (and therefore a token) is configured
    pub fn has_remote(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Returns a live remote session, reusing the pooled one when possible
    ///
    /// # Returns
    ///
    /// The pooled session after a successful probe, otherwise a freshly
    /// connected one that becomes the pooled session
    ///
    /// # Errors
    ///
    /// * `ConnectionCoolingDown` - a previous attempt failed less than the
    ///   cool-down window ago; no connection is attempted
    /// * `ConnectionFailed` - no token is configured, or the connect failed
    ///   or did not finish within the connect timeout
    pub async fn acquire(&self) -> Result<Arc<dyn BrowserSession>, ReadingsError> {
        let mut state = self.state.lock().await;

        // Probe the held connection
        if let Some(session) = state.current.clone() {
            match timeout(self.probe_timeout, session.version()).await {
                Ok(Ok(version)) => {
                    tracing::debug!("Reusing pooled browser connection ({})", version);
                    return Ok(session);
                }
                Ok(Err(e)) => {
                    tracing::warn!("Pooled browser connection is no longer valid ({}), reconnecting", e);
                }
                Err(_) => {
                    tracing::warn!(
                        "Pooled browser connection did not answer within {:?}, reconnecting",
                        self.probe_timeout
                    );
                }
            }
            state.current = None;
        }

        // Fail fast while cooling down
        if let Some(failure) = &state.failure {
            let elapsed = failure.at.elapsed();
            if elapsed < self.cooldown {
                return Err(ReadingsError::ConnectionCoolingDown {
                    remaining_ms: (self.cooldown - elapsed).as_millis() as u64,
                    previous: failure.message.clone(),
                });
            }
        }

        let endpoint = self.endpoint.as_deref().ok_or_else(|| {
            ReadingsError::ConnectionFailed("remote browser token not configured".to_string())
        })?;

        tracing::info!(
            "Creating persistent remote browser connection ({})",
            redact_endpoint(endpoint)
        );

        let attempt = match timeout(self.connect_timeout, self.launcher.connect(endpoint)).await {
            Ok(attempt) => attempt.map_err(|e| e.to_string()),
            Err(_) => Err(format!(
                "remote browser did not complete the connection within {:?}",
                self.connect_timeout
            )),
        };

        match attempt {
            Ok(session) => {
                tracing::info!("Persistent remote browser connection established");
                state.current = Some(session.clone());
                state.failure = None;
                Ok(session)
            }
            Err(message) => {
                tracing::error!("Remote browser connection failed: {}", message);
                state.failure = Some(FailureMemo {
                    at: Instant::now(),
                    message: message.clone(),
                });
                Err(ReadingsError::ConnectionFailed(message))
            }
        }
    }

    /// Current state, without probing the held connection
    pub async fn status(&self) -> PoolStatus {
        let state = self.state.lock().await;

        if state.current.is_some() {
            return PoolStatus::Connected;
        }

        match &state.failure {
            Some(failure) if failure.at.elapsed() < self.cooldown => PoolStatus::CoolingDown {
                remaining: self.cooldown - failure.at.elapsed(),
            },
            _ => PoolStatus::Empty,
        }
    }

    /// The last recorded connection failure, if any
    pub async fn last_failure(&self) -> Option<FailureMemo> {
        self.state.lock().await.failure.clone()
    }
}

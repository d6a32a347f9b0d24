//! Security-focused logging module to track authentication events
//!
//! Events are written through the `log` facade as `SECURITY:` lines and kept
//! in a bounded in-memory buffer with per-type counters. The logger is
//! constructed at startup and shared by `Arc`.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Types of security events to track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    UserRegistered { email: String },
    RegistrationRejected { email: String, reason: String },
    AuthenticationSuccess { email: String, ip: Option<IpAddr> },
    AuthenticationFailed { email: String, ip: Option<IpAddr>, reason: String },
    TokenValidationFailed { ip: Option<IpAddr>, reason: String },
    InvalidInput { input_type: String, details: String },
    StoreFailure { operation: String, error: String },
}

impl SecurityEvent {
    /// Counter key for the event type
    pub fn key(&self) -> &'static str {
        match self {
            SecurityEvent::UserRegistered { .. } => "user_registered",
            SecurityEvent::RegistrationRejected { .. } => "registration_rejected",
            SecurityEvent::AuthenticationSuccess { .. } => "auth_success",
            SecurityEvent::AuthenticationFailed { .. } => "auth_failed",
            SecurityEvent::TokenValidationFailed { .. } => "token_validation_failed",
            SecurityEvent::InvalidInput { .. } => "invalid_input",
            SecurityEvent::StoreFailure { .. } => "store_failure",
        }
    }
}

/// Window reported alongside threshold alerts
const ALERT_WINDOW: Duration = Duration::from_secs(60);

/// Security event with timestamp
#[derive(Debug, Clone)]
struct TimestampedEvent {
    event: SecurityEvent,
    timestamp: Instant,
}

/// Security logger for tracking and alerting on security events
pub struct SecurityLogger {
    events: RwLock<VecDeque<TimestampedEvent>>,
    event_counts: RwLock<HashMap<&'static str, usize>>,
    max_events: usize,
    alert_thresholds: HashMap<&'static str, usize>,
}

impl Default for SecurityLogger {
    fn default() -> Self {
        Self::new(10_000)
    }
}

impl SecurityLogger {
    /// Create a new security logger keeping at most `max_events` events
    pub fn new(max_events: usize) -> Self {
        let mut alert_thresholds = HashMap::new();
        alert_thresholds.insert("auth_failed", 5);
        alert_thresholds.insert("token_validation_failed", 10);
        alert_thresholds.insert("store_failure", 1);

        Self {
            events: RwLock::new(VecDeque::with_capacity(max_events.min(1024))),
            event_counts: RwLock::new(HashMap::new()),
            max_events,
            alert_thresholds,
        }
    }

    /// Shared logger with default capacity
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Log a security event
    pub async fn log_event(&self, event: SecurityEvent) {
        let key = event.key();

        {
            let mut events = self.events.write().await;
            if events.len() >= self.max_events {
                events.pop_front();
            }
            events.push_back(TimestampedEvent {
                event: event.clone(),
                timestamp: Instant::now(),
            });
        }

        {
            let mut counts = self.event_counts.write().await;
            let count = counts.entry(key).or_insert(0);
            *count += 1;

            if let Some(&threshold) = self.alert_thresholds.get(key) {
                if *count % threshold == 0 {
                    let recent = self.count_recent(key, ALERT_WINDOW).await;
                    log::error!(
                        "SECURITY ALERT: {} events of type '{}' detected ({} in the last {}s)",
                        count,
                        key,
                        recent,
                        ALERT_WINDOW.as_secs()
                    );
                }
            }
        }

        match event {
            SecurityEvent::UserRegistered { email } => {
                log::info!("SECURITY: User registered - Email: {}", email);
            }
            SecurityEvent::RegistrationRejected { email, reason } => {
                log::warn!("SECURITY: Registration rejected - Email: {}, Reason: {}", email, reason);
            }
            SecurityEvent::AuthenticationSuccess { email, ip } => {
                log::info!("SECURITY: Authentication success - Email: {}, IP: {:?}", email, ip);
            }
            SecurityEvent::AuthenticationFailed { email, ip, reason } => {
                log::warn!(
                    "SECURITY: Authentication failed - Email: {}, IP: {:?}, Reason: {}",
                    email,
                    ip,
                    reason
                );
            }
            SecurityEvent::TokenValidationFailed { ip, reason } => {
                log::warn!("SECURITY: Token validation failed - IP: {:?}, Reason: {}", ip, reason);
            }
            SecurityEvent::InvalidInput { input_type, details } => {
                log::warn!("SECURITY: Invalid input - Type: {}, Details: {}", input_type, details);
            }
            SecurityEvent::StoreFailure { operation, error } => {
                log::error!("SECURITY: Store failure - Operation: {}, Error: {}", operation, error);
            }
        }
    }

    /// Buffered events of one type seen within `window`
    async fn count_recent(&self, key: &str, window: Duration) -> usize {
        let events = self.events.read().await;
        let now = Instant::now();
        events
            .iter()
            .rev()
            .take_while(|e| now.duration_since(e.timestamp) <= window)
            .filter(|e| e.event.key() == key)
            .count()
    }

    /// Get event statistics
    pub async fn get_event_stats(&self) -> HashMap<&'static str, usize> {
        self.event_counts.read().await.clone()
    }
}

//! Readiness aggregation over the service's backing dependencies.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
pub struct PingError {
    message: String,
}

impl PingError {
    pub fn new(err: impl std::fmt::Display) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// A dependency that can report whether it is reachable.
#[async_trait]
pub trait Pingable: Send + Sync {
    fn name(&self) -> &'static str;

    async fn ping(&self) -> Result<(), PingError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyHealth {
    pub name: &'static str,
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub checks: Vec<DependencyHealth>,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

#[derive(Clone, Default)]
pub struct ReadinessCheck {
    dependencies: Vec<Arc<dyn Pingable>>,
}

impl ReadinessCheck {
    pub fn new(dependencies: Vec<Arc<dyn Pingable>>) -> Self {
        Self { dependencies }
    }

    /// Ping every dependency concurrently. Any failure degrades the report.
    pub async fn check(&self) -> HealthReport {
        let checks: Vec<DependencyHealth> =
            join_all(self.dependencies.iter().map(|dependency| async move {
                match dependency.ping().await {
                    Ok(()) => DependencyHealth {
                        name: dependency.name(),
                        healthy: true,
                        error: None,
                    },
                    Err(err) => DependencyHealth {
                        name: dependency.name(),
                        healthy: false,
                        error: Some(err.to_string()),
                    },
                }
            }))
            .await;

        let status = if checks.iter().all(|check| check.healthy) {
            HealthStatus::Ok
        } else {
            HealthStatus::Degraded
        };

        HealthReport { status, checks }
    }
}

//! Service descriptor and liveness endpoints.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::server::GatewayState;

pub const SERVICE_MESSAGE: &str = "WhatsApp Business Chatbot API";
pub const HEALTH_MESSAGE: &str = "WhatsApp Business Chatbot is running";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Serialize, Deserialize)]
pub struct Endpoints {
    pub health: String,
    pub webhook: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    pub message: String,
    pub status: String,
    pub version: String,
    pub endpoints: Endpoints,
    pub timestamp: DateTime<Utc>,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Handler for `GET /`
pub async fn get_descriptor(State(state): State<GatewayState>) -> Json<ServiceDescriptor> {
    Json(ServiceDescriptor {
        message: SERVICE_MESSAGE.into(),
        status: "running".into(),
        version: state.version.to_string(),
        endpoints: Endpoints {
            health: HEALTH_PATH.into(),
            webhook: state.webhook_path.to_string(),
        },
        timestamp: Utc::now(),
    })
}

/// Handler for `GET /health`
pub async fn get_health() -> Json<HealthReport> {
    Json(HealthReport {
        status: "OK".into(),
        message: HEALTH_MESSAGE.into(),
        timestamp: Utc::now(),
    })
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status of a single component
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthDto {
    /// "up" or "down"
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ComponentHealthDto {
    pub fn up(message: Option<String>) -> Self {
        Self {
            status: "up".to_string(),
            message,
        }
    }

    pub fn down(message: impl Into<String>) -> Self {
        Self {
            status: "down".to_string(),
            message: Some(message.into()),
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == "up"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthInfoDto {
    pub database: ComponentHealthDto,
    pub server: ComponentHealthDto,
}

/// Response DTO for the health check
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponseDto {
    /// "ok" when every component is up, "error" otherwise
    pub status: String,
    pub info: HealthInfoDto,
}

//! Blue-green service configuration and pre-flight validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Service exposure type, mirroring the platform's service kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceType {
    /// No service object is managed for this endpoint.
    #[default]
    None,
    ClusterIp,
    NodePort,
    LoadBalancer,
    ExternalName,
}

/// One managed service endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSpecification {
    pub service_type: ServiceType,
}

/// A blue-green rollout keeps two full service endpoints and switches
/// traffic between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueGreenConfig {
    pub primary_service: Option<ServiceSpecification>,
    pub stage_service: Option<ServiceSpecification>,
}

/// Pre-flight structural validation of a blue-green setup.
///
/// `plain_service_type` is the single-service type configured outside
/// blue-green mode; setting one alongside blue-green is a contradiction
/// (the rollout would have nothing to switch).
pub fn validate_blue_green(
    plain_service_type: Option<ServiceType>,
    config: Option<&BlueGreenConfig>,
) -> Result<(), ValidationError> {
    if let Some(service_type) = plain_service_type {
        if service_type != ServiceType::None {
            return Err(ValidationError::ServiceTypeMismatch(format!(
                "{service_type:?}"
            )));
        }
    }

    let config = config.ok_or(ValidationError::MissingConfig)?;

    match config.primary_service {
        Some(primary) if primary.service_type != ServiceType::None => {}
        _ => return Err(ValidationError::MissingPrimaryService),
    }
    match config.stage_service {
        Some(stage) if stage.service_type != ServiceType::None => {}
        _ => return Err(ValidationError::MissingStageService),
    }

    Ok(())
}

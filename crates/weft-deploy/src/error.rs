//! Deployment error types

use thiserror::Error;

/// Deployment and compilation errors
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("machine '{0}' has no role; call as_master() or as_worker() before deploying")]
    MissingRole(String),

    #[error("the public internet cannot be deployed")]
    PublicInternetNotDeployable,

    #[error("namespace '{0}' is already compiled")]
    Sealed(String),

    #[error("conflicting deployment: {0}")]
    Conflict(String),

    #[error("connection rule references an undeployed entity: {0}")]
    UndeployedEndpoint(String),

    #[error(transparent)]
    Model(#[from] weft_core::ModelError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DeployError>;

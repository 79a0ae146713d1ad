use crate::types::{CoordinatorId, SubjectId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MusterError {
    #[error("no eligible coordinators to receive reassigned subjects")]
    NoEligibleTargets,

    #[error("unknown coordinator: {0}")]
    UnknownCoordinator(CoordinatorId),

    #[error("unknown subject: {0}")]
    UnknownSubject(SubjectId),

    #[error("subject {subject} is not assigned to coordinator {coordinator}")]
    NotAssigned {
        subject: SubjectId,
        coordinator: CoordinatorId,
    },

    #[error("not initialized: run 'muster init'")]
    NotInitialized,

    #[error("invalid id '{0}': expected a 64-bit integer")]
    InvalidId(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, MusterError>;

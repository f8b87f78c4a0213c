//! Error type shared by parameter validation and the simulation driver.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("the chain has no bodies")]
    EmptyChain,

    #[error("state of body {body} became non-finite at sample {sample}")]
    NumericOverflow { sample: usize, body: usize },
}

impl SimError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SimError::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field, if this is a parameter error
    pub fn field(&self) -> Option<&str> {
        match self {
            SimError::InvalidParameter { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }
}

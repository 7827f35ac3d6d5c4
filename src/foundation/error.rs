use crate::foundation::core::SurfaceId;

/// Convenience result type used across the filter pipeline.
pub type FxResult<T> = Result<T, FxError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Bad parameter values (negative strength, zero quality, NaN offsets) are not represented here:
/// filters sanitize those locally and keep rendering.
#[derive(thiserror::Error, Debug)]
pub enum FxError {
    /// A program could not be built, or filter options cannot be combined.
    #[error("construction error: {0}")]
    Construction(String),

    /// The host could not provide a surface.
    #[error("allocation error: {0}")]
    Allocation(String),

    /// The host rejected or failed a draw submission.
    #[error("host error: {0}")]
    Host(String),

    /// Scratch surface returned to the wrong pool or returned twice.
    #[error(transparent)]
    PoolMisuse(#[from] PoolMisuseError),

    /// Invalid filter description.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing filter descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FxError {
    /// Build a [`FxError::Construction`] value.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Build a [`FxError::Allocation`] value.
    pub fn allocation(msg: impl Into<String>) -> Self {
        Self::Allocation(msg.into())
    }

    /// Build a [`FxError::Host`] value.
    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host(msg.into())
    }

    /// Build a [`FxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

/// Programmer errors detected by [`crate::SurfacePool`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolMisuseError {
    /// The surface was never handed out by this pool.
    #[error("pool misuse: surface {0:?} was not acquired from this pool")]
    ForeignSurface(SurfaceId),

    /// The surface is owned by this pool but is not currently on loan.
    #[error("pool misuse: surface {0:?} released twice")]
    DoubleRelease(SurfaceId),
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

//! Top-level error type.

use thiserror::Error;

use jwst_asn_config::ConfigError;
use jwst_asn_core::AsnError;

/// Any failure surfaced by the facade.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Asn(#[from] AsnError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Asn(AsnError::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Asn(AsnError::Json(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

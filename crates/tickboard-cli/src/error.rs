use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
///
/// Dashboard failures are not here: they travel inside the envelope and exit
/// with code 3.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickboard_core::ValidationError),

    #[error(transparent)]
    Companies(#[from] tickboard_core::CompanyDataError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Companies(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

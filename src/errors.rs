pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(windows)]
    #[error("Windows Error: {0}")]
    WindowsCore(#[from] windows_core::Error),
    #[error("Wasapi Error: {0}")]
    Wasapi(String),
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML Serialization Error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("TOML Deserialization Error: {0}")]
    TomlDe(#[from] toml::de::Error),
    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),
    // My errors
    #[error("Native audio layer unavailable: {0}")]
    NativeUnavailable(String),
    #[error("Endpoint returned an unreadable id")]
    InvalidDeviceId,
    #[error("No profile named \"{0}\"")]
    ProfileNotFound(String),
    #[error("Profile \"{0}\" already exists")]
    ProfileExists(String),
    #[error("Required settings file is missing")]
    RequiredSettingsMissing,
    #[error("Failed to get working directory")]
    WorkDir,
}

impl AppError {
    /// wasapi hands back boxed trait objects, keep the message
    pub fn wasapi(error: Box<dyn std::error::Error>) -> Self {
        AppError::Wasapi(error.to_string())
    }
}

//! Process-wide client configuration.
//!
//! Built once at startup (usually from the environment) and handed to the
//! client. Nothing mutates it afterwards.

use crate::error::ConfigError;

/// Environment variable holding the functions host base URL.
pub const BASE_URL_VAR: &str = "FUNCTIONS_BASE";

/// Environment variable holding the optional shared access code.
pub const ACCESS_CODE_VAR: &str = "FUNCTION_CODE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    raw_base_url: String,
    access_code: Option<String>,
}

impl ClientConfig {
    /// A single trailing `/` is stripped from `base_url`; the untouched value
    /// is kept for `getUsers`. An empty access code counts as none.
    pub fn new(base_url: &str, access_code: Option<&str>) -> Self {
        let trimmed = base_url.strip_suffix('/').unwrap_or(base_url);
        Self {
            base_url: trimmed.to_string(),
            raw_base_url: base_url.to_string(),
            access_code: access_code
                .filter(|code| !code.is_empty())
                .map(str::to_string),
        }
    }

    /// Read `FUNCTIONS_BASE` (required) and `FUNCTION_CODE` (optional).
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var(BASE_URL_VAR).map_err(|_| ConfigError::MissingBase(BASE_URL_VAR))?;
        let access_code = std::env::var(ACCESS_CODE_VAR).ok();
        Ok(Self::new(&base_url, access_code.as_deref()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn raw_base_url(&self) -> &str {
        &self.raw_base_url
    }

    pub fn access_code(&self) -> Option<&str> {
        self.access_code.as_deref()
    }
}

use thiserror::Error;

/// An environment variable required by the application is not set.
#[derive(Debug, Error)]
#[error("Missing environment variable: {0}")]
pub struct MissingEnvVarError(pub String);

/// Reads an environment variable, returning a structured error if it's missing.
///
/// Used for the knobs that are deployment-specific rather than part of the
/// report configuration file, e.g. `DATABASE_URL`.
pub fn get_env_var(name: &str) -> Result<String, MissingEnvVarError> {
    std::env::var(name).map_err(|_| MissingEnvVarError(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_reported_by_name() {
        let err = get_env_var("REPORT_SYNC_SURELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("REPORT_SYNC_SURELY_UNSET"));
    }
}

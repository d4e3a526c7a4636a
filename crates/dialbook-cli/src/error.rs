use anyhow::Error;
use dialbook_config::ConfigError;
use dialbook_core::CoreError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_NOT_FOUND: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_PERMISSION_DENIED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn not_found(message: impl Into<String>) -> Error {
    CliError::NotFound(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::NotFound(_) => EXIT_NOT_FOUND,
            });
        }
        if let Some(core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(core_exit_code(core_err));
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn core_exit_code(err: &CoreError) -> u8 {
    match err {
        CoreError::PermissionDenied(_) => EXIT_PERMISSION_DENIED,
        CoreError::UnknownContact(_) => EXIT_NOT_FOUND,
        CoreError::MissingId | CoreError::DuplicateId(_) => EXIT_INVALID_INPUT,
    }
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InvalidSourceSpec(_)
        | ConfigError::InvalidSourceField { .. }
        | ConfigError::InvalidDisplayField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_exit_code, exit_code_for, invalid_input, not_found, CliError, EXIT_INVALID_INPUT,
        EXIT_NOT_FOUND, EXIT_PERMISSION_DENIED,
    };
    use anyhow::Context as _;
    use dialbook_core::{CoreError, PermissionStatus};

    #[test]
    fn core_errors_map_to_exit_codes() {
        assert_eq!(
            core_exit_code(&CoreError::PermissionDenied(PermissionStatus::Denied)),
            EXIT_PERMISSION_DENIED
        );
        assert_eq!(
            core_exit_code(&CoreError::UnknownContact("x".to_string())),
            EXIT_NOT_FOUND
        );
    }

    #[test]
    fn cli_errors_are_found_through_context() {
        let err = Err::<(), _>(invalid_input("bad"))
            .context("outer")
            .unwrap_err();
        assert!(err.chain().any(|cause| cause.is::<CliError>()));
        assert_eq!(
            format!("{:?}", exit_code_for(&err)),
            format!("{:?}", std::process::ExitCode::from(EXIT_INVALID_INPUT))
        );
        let err = not_found("gone");
        assert_eq!(err.to_string(), "not found: gone");
    }
}

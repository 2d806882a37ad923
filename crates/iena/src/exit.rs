use std::fmt;
use std::io;

use iena_wire::IenaError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn codec_error(context: &str, err: IenaError) -> CliError {
    let code = match err {
        IenaError::MissingField { .. } => USAGE,
        _ => DATA_INVALID,
    };
    CliError::new(code, format!("{context}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_errors_map_to_data_invalid() {
        let err = codec_error(
            "decode failed",
            IenaError::TruncatedBuffer { needed: 14, got: 2 },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().contains("decode failed"));
    }

    #[test]
    fn missing_fields_map_to_usage() {
        let err = codec_error("encode failed", IenaError::MissingField { field: "key" });
        assert_eq!(err.code, USAGE);
    }
}

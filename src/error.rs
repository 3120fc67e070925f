use std::time::Duration;

use color_eyre::eyre::Report;
use thiserror::Error;

pub use color_eyre::eyre::eyre;

use crate::constant::ExceptionCode;
use crate::protocol::ErrPayload;

#[derive(Debug, Error)]
pub enum Error {
    /// The server hit an internal fault while executing the query. Not
    /// the client's doing; the message is passed through untouched.
    #[error("Unexpected server error: {0}")]
    ServerFault(String),

    /// The conversation no longer follows the protocol. Unknown opcodes,
    /// malformed bodies and out-of-place responses all land here.
    #[error("Protocol violation, this is a bug in this library or the server, please report: {0}")]
    ProtocolViolation(Report),

    /// The server rejected the query. Carries the error code and message
    /// exactly as sent.
    #[error("Query error: {0}")]
    QueryFailure(ErrPayload),

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] std::io::Error),

    #[error("Bad usage: {0}")]
    BadUsageError(String),

    #[error("No response within {0:?}")]
    WaitTimeout(Duration),
}

impl From<ErrPayload> for Error {
    fn from(payload: ErrPayload) -> Self {
        match payload.code {
            ExceptionCode::ServerError => Error::ServerFault(payload.message),
            ExceptionCode::ProtocolError => Error::ProtocolViolation(eyre!("{}", payload.message)),
            _ => Error::QueryFailure(payload),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(code: ExceptionCode, message: &str) -> ErrPayload {
        ErrPayload {
            code,
            message: message.to_owned(),
        }
    }

    #[test]
    fn test_server_error_classifies_as_server_fault() {
        let err = Error::from(payload(ExceptionCode::ServerError, "disk full"));
        assert!(matches!(err, Error::ServerFault(ref message) if message == "disk full"));
    }

    #[test]
    fn test_protocol_error_classifies_as_violation() {
        let err = Error::from(payload(ExceptionCode::ProtocolError, "bad frame"));
        match err {
            Error::ProtocolViolation(report) => assert_eq!(report.to_string(), "bad frame"),
            other => panic!("expected a protocol violation, got {other}"),
        }
    }

    #[test]
    fn test_other_codes_classify_as_query_failure() {
        for code in [
            ExceptionCode::ReadTimeout,
            ExceptionCode::SyntaxError,
            ExceptionCode::Unavailable,
        ] {
            let err = Error::from(payload(code, "nope"));
            match err {
                Error::QueryFailure(ref kept) => assert_eq!(kept.code, code),
                ref other => panic!("expected a query failure, got {other}"),
            }
        }
    }

    #[test]
    fn test_query_failure_display_keeps_the_server_message() {
        let err = Error::from(payload(ExceptionCode::ReadTimeout, "timed out waiting for replicas"));
        let text = err.to_string();
        assert!(text.contains("read timeout"));
        assert!(text.contains("timed out waiting for replicas"));
    }
}

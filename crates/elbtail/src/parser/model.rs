use std::net::IpAddr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use thiserror::Error;

use super::serde_utils::duration_nanos;

/// One half of a connection: the client side or the backend side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// `None` when the host half of the token is not a literal IP address
    /// (the wire writes `-` for connections that never completed).
    pub ip: Option<IpAddr>,
    /// 0 when the address carried no port. The wire contract accepts the
    /// full signed 32-bit range here, so this is wider than a `u16`.
    pub port: i32,
}

/// A fully parsed access-log line.
///
/// Field order matches the wire format. All fields are set together;
/// a conversion failure on any of them fails the whole parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    /// Time the load balancer received the request, UTC.
    pub timestamp: DateTime<Utc>,
    /// Load-balancer identifier, opaque.
    pub name: String,
    pub from: Endpoint,
    pub to: Endpoint,
    #[serde(serialize_with = "duration_nanos")]
    pub request_processing_time: TimeDelta,
    #[serde(serialize_with = "duration_nanos")]
    pub backend_processing_time: TimeDelta,
    #[serde(serialize_with = "duration_nanos")]
    pub response_processing_time: TimeDelta,
    pub frontend_status_code: i32,
    pub backend_status_code: i32,
    pub received_bytes: i64,
    pub sent_bytes: i64,
    /// Full HTTP request line, delimiting quotes stripped.
    pub request: String,
    /// May contain internal spaces; delimiting quotes stripped.
    pub user_agent: String,
    /// `-` when the connection was not negotiated over SSL.
    pub ssl_cipher: String,
    /// `-` when the connection was not negotiated over SSL.
    pub ssl_protocol: String,
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(#[from] chrono::ParseError),

    #[error("Malformed address {0:?}: bad port")]
    MalformedAddress(String),

    #[error("Malformed duration {0:?}")]
    MalformedDuration(String),

    #[error("Malformed status code {0:?}")]
    MalformedStatusCode(String),

    #[error("Malformed byte count {0:?}")]
    MalformedByteCount(String),

    #[error("Truncated line: {0} of {count} fields", count = super::FIELD_COUNT)]
    Truncated(usize),

    #[error("Non-UTF8 content in field {0}")]
    NonUtf8(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_durations_as_nanos() {
        let record = LogRecord {
            timestamp: "2015-05-13T23:39:43.945958Z".parse().unwrap(),
            name: "my-loadbalancer".to_string(),
            from: Endpoint {
                ip: Some("192.168.131.39".parse().unwrap()),
                port: 2817,
            },
            to: Endpoint {
                ip: Some("10.0.0.1".parse().unwrap()),
                port: 80,
            },
            request_processing_time: TimeDelta::microseconds(73),
            backend_processing_time: TimeDelta::microseconds(1048),
            response_processing_time: TimeDelta::microseconds(57),
            frontend_status_code: 200,
            backend_status_code: 200,
            received_bytes: 0,
            sent_bytes: 29,
            request: "GET http://www.example.com:80/ HTTP/1.1".to_string(),
            user_agent: "curl/7.38.0".to_string(),
            ssl_cipher: "-".to_string(),
            ssl_protocol: "-".to_string(),
        };

        let json: serde_json::Value = serde_json::to_value(&record).unwrap();
        assert_eq!(json["backend_processing_time"], 1_048_000);
        assert_eq!(json["from"]["ip"], "192.168.131.39");
        assert_eq!(json["from"]["port"], 2817);
        assert_eq!(json["timestamp"], "2015-05-13T23:39:43.945958Z");
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = ParseError::Truncated(3);
        assert_eq!(err.to_string(), "Truncated line: 3 of 15 fields");

        let err = ParseError::MalformedStatusCode("abc".to_string());
        assert!(err.to_string().contains("abc"));
    }
}

use chrono::{DateTime, TimeDelta, Utc};

use super::model::{Endpoint, LogRecord, ParseError};
use super::scan::{scan, Scan};
use super::FIELD_COUNT;

/// Parse one access-log line (without its terminator) into a [`LogRecord`].
///
/// The line must carry exactly 15 space-delimited fields in wire order; the
/// request and user-agent fields may be quote-delimited to protect internal
/// spaces. The first conversion failure aborts the parse, and no partial
/// record escapes.
pub fn parse(line: &[u8]) -> Result<LogRecord, ParseError> {
    let mut rec = LogRecord {
        timestamp: DateTime::UNIX_EPOCH,
        name: String::new(),
        from: Endpoint::default(),
        to: Endpoint::default(),
        request_processing_time: TimeDelta::zero(),
        backend_processing_time: TimeDelta::zero(),
        response_processing_time: TimeDelta::zero(),
        frontend_status_code: 0,
        backend_status_code: 0,
        received_bytes: 0,
        sent_bytes: 0,
        request: String::new(),
        user_agent: String::new(),
        ssl_cipher: String::new(),
        ssl_protocol: String::new(),
    };

    let mut rest = line;
    for ordinal in 0..FIELD_COUNT {
        // Only the last field runs in final-token mode; every other field
        // is delimiter-terminated.
        let (advance, token) = match scan(rest, ordinal == FIELD_COUNT - 1)? {
            Scan::Token { advance, token } => (advance, token),
            Scan::Partial { .. } => return Err(ParseError::Truncated(ordinal)),
        };
        rest = &rest[advance..];

        match ordinal {
            0 => {
                rec.timestamp = DateTime::parse_from_rfc3339(token_str(0, token)?)?
                    .with_timezone(&Utc)
            }
            1 => rec.name = token_str(1, token)?.to_string(),
            2 => rec.from = parse_endpoint(2, token)?,
            3 => rec.to = parse_endpoint(3, token)?,
            4 => rec.request_processing_time = parse_seconds(4, token)?,
            5 => rec.backend_processing_time = parse_seconds(5, token)?,
            6 => rec.response_processing_time = parse_seconds(6, token)?,
            7 => rec.frontend_status_code = parse_status(7, token)?,
            8 => rec.backend_status_code = parse_status(8, token)?,
            9 => rec.received_bytes = parse_byte_count(9, token)?,
            10 => rec.sent_bytes = parse_byte_count(10, token)?,
            11 => rec.request = token_str(11, token)?.to_string(),
            12 => rec.user_agent = token_str(12, token)?.to_string(),
            13 => rec.ssl_cipher = token_str(13, token)?.to_string(),
            14 => rec.ssl_protocol = token_str(14, token)?.to_string(),
            _ => unreachable!("ordinal bounded by FIELD_COUNT"),
        }
    }

    Ok(rec)
}

fn token_str(ordinal: usize, token: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(token).map_err(|_| ParseError::NonUtf8(ordinal))
}

/// Split `host[:port]`. A missing port is 0. A token with more than one
/// colon is taken as a bare IPv6 host with no port. The host half is not
/// validated: anything that is not a literal IP becomes `ip: None`.
fn parse_endpoint(ordinal: usize, token: &[u8]) -> Result<Endpoint, ParseError> {
    let s = token_str(ordinal, token)?;
    let parts: Vec<&str> = s.split(':').collect();
    match parts.as_slice() {
        [host, port] => {
            let port = port
                .parse()
                .map_err(|_| ParseError::MalformedAddress(s.to_string()))?;
            Ok(Endpoint {
                ip: host.parse().ok(),
                port,
            })
        }
        _ => Ok(Endpoint {
            ip: s.parse().ok(),
            port: 0,
        }),
    }
}

fn parse_seconds(ordinal: usize, token: &[u8]) -> Result<TimeDelta, ParseError> {
    let s = token_str(ordinal, token)?;
    let secs: f64 = s
        .parse()
        .map_err(|_| ParseError::MalformedDuration(s.to_string()))?;
    // Scaled in three steps: a single 1e9 factor can land one ulp below the
    // exact product and truncate a nanosecond away.
    Ok(TimeDelta::nanoseconds((secs * 1000.0 * 1000.0 * 1000.0) as i64))
}

fn parse_status(ordinal: usize, token: &[u8]) -> Result<i32, ParseError> {
    let s = token_str(ordinal, token)?;
    s.parse()
        .map_err(|_| ParseError::MalformedStatusCode(s.to_string()))
}

/// Stored as `i64`, but the accepted range stays 32-bit per the wire
/// contract.
fn parse_byte_count(ordinal: usize, token: &[u8]) -> Result<i64, ParseError> {
    let s = token_str(ordinal, token)?;
    s.parse::<i32>()
        .map(i64::from)
        .map_err(|_| ParseError::MalformedByteCount(s.to_string()))
}

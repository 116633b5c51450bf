use chrono::TimeDelta;
use serde::Serializer;

/// Serialize a duration as integer nanoseconds.
///
/// Saturates at `i64::MAX`; the parser only produces durations built from
/// an `i64` nanosecond count, so saturation is unreachable from there.
pub fn duration_nanos<S>(duration: &TimeDelta, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(duration.num_nanoseconds().unwrap_or(i64::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Wrapper {
        #[serde(serialize_with = "duration_nanos")]
        duration: TimeDelta,
    }

    #[test]
    fn test_serialize_as_nanos() {
        let w = Wrapper {
            duration: TimeDelta::microseconds(1048),
        };
        assert_eq!(serde_json::to_string(&w).unwrap(), r#"{"duration":1048000}"#);
    }

    #[test]
    fn test_serialize_negative() {
        let w = Wrapper {
            duration: TimeDelta::nanoseconds(-1_000_000_000),
        };
        assert_eq!(
            serde_json::to_string(&w).unwrap(),
            r#"{"duration":-1000000000}"#
        );
    }
}

use std::time::Duration;

use tonic::metadata::MetadataMap;

use crate::domain::context::RequestContext;

/// Metadata key carrying a caller-supplied correlation id.
pub const REQUEST_ID_KEY: &str = "x-request-id";

const GRPC_TIMEOUT_KEY: &str = "grpc-timeout";

/// Build the request context for an inbound call.
///
/// The deadline is the earlier of `server_timeout` and the client's `grpc-timeout`.
pub fn request_context(metadata: &MetadataMap, server_timeout: Duration) -> RequestContext {
    let mut ctx = RequestContext::new().with_timeout(server_timeout);

    if let Some(request_id) = metadata
        .get(REQUEST_ID_KEY)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
    {
        ctx = ctx.with_request_id(request_id);
    }

    if let Some(timeout) = metadata
        .get(GRPC_TIMEOUT_KEY)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_grpc_timeout)
    {
        ctx = ctx.with_timeout(timeout);
    }

    ctx
}

/// Parse a `grpc-timeout` value: at most 8 digits followed by a unit (H, M, S, m, u, n).
fn parse_grpc_timeout(value: &str) -> Option<Duration> {
    if !value.is_ascii() || value.len() < 2 || value.len() > 9 {
        return None;
    }

    let (digits, unit) = value.split_at(value.len() - 1);
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let amount: u64 = digits.parse().ok()?;

    match unit {
        "H" => Some(Duration::from_secs(amount * 60 * 60)),
        "M" => Some(Duration::from_secs(amount * 60)),
        "S" => Some(Duration::from_secs(amount)),
        "m" => Some(Duration::from_millis(amount)),
        "u" => Some(Duration::from_micros(amount)),
        "n" => Some(Duration::from_nanos(amount)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::Instant;

    use super::*;

    #[test]
    fn test_parse_grpc_timeout() {
        assert_eq!(parse_grpc_timeout("1H"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_grpc_timeout("2M"), Some(Duration::from_secs(120)));
        assert_eq!(parse_grpc_timeout("3S"), Some(Duration::from_secs(3)));
        assert_eq!(parse_grpc_timeout("250m"), Some(Duration::from_millis(250)));
        assert_eq!(parse_grpc_timeout("10u"), Some(Duration::from_micros(10)));
        assert_eq!(parse_grpc_timeout("99999999n"), Some(Duration::from_nanos(99_999_999)));
    }

    #[test]
    fn test_parse_grpc_timeout_rejects_malformed() {
        assert_eq!(parse_grpc_timeout(""), None);
        assert_eq!(parse_grpc_timeout("S"), None);
        assert_eq!(parse_grpc_timeout("10"), None);
        assert_eq!(parse_grpc_timeout("10x"), None);
        assert_eq!(parse_grpc_timeout("+1S"), None);
        assert_eq!(parse_grpc_timeout("123456789S"), None);
        assert_eq!(parse_grpc_timeout("1é"), None);
    }

    #[tokio::test]
    async fn test_request_context_from_metadata() {
        let mut metadata = MetadataMap::new();
        metadata.insert(REQUEST_ID_KEY, "req-42".parse().unwrap());
        metadata.insert(GRPC_TIMEOUT_KEY, "100m".parse().unwrap());

        let before = Instant::now();
        let ctx = request_context(&metadata, Duration::from_secs(10));

        assert_eq!(ctx.request_id(), "req-42");
        let deadline = ctx.deadline().unwrap();
        assert!(deadline <= before + Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_request_context_with_huge_server_timeout() {
        let mut metadata = MetadataMap::new();
        metadata.insert(GRPC_TIMEOUT_KEY, "99999999H".parse().unwrap());

        let ctx = request_context(&metadata, Duration::MAX);
        assert!(ctx.deadline().is_some());
    }

    #[tokio::test]
    async fn test_request_context_defaults() {
        let before = Instant::now();
        let ctx = request_context(&MetadataMap::new(), Duration::from_secs(10));

        assert!(!ctx.request_id().is_empty());
        let deadline = ctx.deadline().unwrap();
        assert!(deadline >= before + Duration::from_secs(9));
    }
}

//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::TransferError;
use super::policy::ErrorKind;

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    match code {
        429 | 503 => ErrorKind::Throttled,
        500..=599 => ErrorKind::Http5xx(code as u16),
        _ => ErrorKind::Other,
    }
}

/// Classify a curl error for retry decisions.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        return ErrorKind::Timeout;
    }
    if e.is_couldnt_connect()
        || e.is_couldnt_resolve_host()
        || e.is_couldnt_resolve_proxy()
        || e.is_read_error()
        || e.is_recv_error()
        || e.is_send_error()
        || e.is_got_nothing()
        || e.is_partial_file()
    {
        return ErrorKind::Connection;
    }
    ErrorKind::Other
}

/// Classify a transfer error into an ErrorKind. Storage failures and aborts are final.
pub fn classify(e: &TransferError) -> ErrorKind {
    match e {
        TransferError::Curl(ce) => classify_curl_error(ce),
        TransferError::Http(code) => classify_http_status(*code),
        TransferError::Storage(_) | TransferError::Aborted => ErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_429_and_503_throttled() {
        assert_eq!(classify_http_status(429), ErrorKind::Throttled);
        assert_eq!(classify_http_status(503), ErrorKind::Throttled);
    }

    #[test]
    fn http_5xx_retryable() {
        assert!(matches!(classify_http_status(500), ErrorKind::Http5xx(500)));
        assert!(matches!(classify_http_status(502), ErrorKind::Http5xx(502)));
    }

    #[test]
    fn http_4xx_other() {
        assert_eq!(classify_http_status(404), ErrorKind::Other);
        assert_eq!(classify_http_status(403), ErrorKind::Other);
    }

    #[test]
    fn storage_and_abort_are_final() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(classify(&TransferError::Storage(io)), ErrorKind::Other);
        assert_eq!(classify(&TransferError::Aborted), ErrorKind::Other);
    }

    #[test]
    fn curl_timeout_classified() {
        // CURLE_OPERATION_TIMEDOUT
        let e = curl::Error::new(28);
        assert_eq!(classify_curl_error(&e), ErrorKind::Timeout);
        // CURLE_COULDNT_CONNECT
        let e = curl::Error::new(7);
        assert_eq!(classify_curl_error(&e), ErrorKind::Connection);
    }
}

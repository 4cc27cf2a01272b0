//! Blocking HTTP GET over libcurl.
//!
//! Every function here runs on the calling thread; call from
//! `tokio::task::spawn_blocking` when used from async code.

mod get;

pub use get::{download_to, fetch_text};

use crate::retry::TransferError;
use std::time::Duration;

/// Per-handle transfer settings derived from [`HarvestConfig`](crate::config::HarvestConfig).
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer timeout.
    pub timeout: Duration,
    /// Abort if throughput stays below `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_redirections: u32,
    pub user_agent: Option<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_redirections: 10,
            user_agent: None,
        }
    }
}

/// Build a GET handle for `url` with the shared options applied.
/// `fail_on_error` makes curl stop on 4xx/5xx instead of writing the error page into the sink.
fn new_handle(url: &str, opts: &HttpOptions) -> Result<curl::easy::Easy, TransferError> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(opts.max_redirections)?;
    easy.fail_on_error(true)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }
    Ok(easy)
}

/// Map a failed `perform` to a typed error, recovering the HTTP status when curl stopped on one.
fn perform_error(easy: &mut curl::easy::Easy, e: curl::Error) -> TransferError {
    if e.is_http_returned_error() {
        if let Ok(code) = easy.response_code() {
            if code != 0 {
                return TransferError::Http(code);
            }
        }
    }
    TransferError::Curl(e)
}

/// Non-2xx responses that slipped past `fail_on_error` (e.g. 1xx/3xx without a Location).
fn check_status(easy: &mut curl::easy::Easy) -> Result<(), TransferError> {
    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(TransferError::Http(code));
    }
    Ok(())
}

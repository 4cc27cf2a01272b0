//! GET a listing page into memory, or stream an archive body into a writer.

use std::io::Write;

use super::{check_status, new_handle, perform_error, HttpOptions};
use crate::control::AbortToken;
use crate::retry::TransferError;

/// GET `url` and return the body as text (invalid UTF-8 is replaced, not rejected).
///
/// Setting `abort` stops the transfer with [`TransferError::Aborted`], even
/// while the server is silent.
pub fn fetch_text(
    url: &str,
    opts: &HttpOptions,
    abort: &AbortToken,
) -> Result<String, TransferError> {
    let mut body: Vec<u8> = Vec::new();
    let mut easy = new_handle(url, opts)?;
    easy.progress(true)?;

    let result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.progress_function(|_, _, _, _| !abort.is_aborted())?;
        transfer.perform()
    };
    if abort.is_aborted() {
        return Err(TransferError::Aborted);
    }
    if let Err(e) = result {
        return Err(perform_error(&mut easy, e));
    }
    check_status(&mut easy)?;

    tracing::debug!(url, bytes = body.len(), "fetched listing page");
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// GET `url`, streaming the body into `sink`. Returns the number of bytes written.
///
/// `on_progress(done, total)` is called from curl's progress callback; `total` is
/// `None` until the server has sent a Content-Length. Setting `abort` stops the
/// transfer with [`TransferError::Aborted`].
pub fn download_to<W, P>(
    url: &str,
    sink: &mut W,
    opts: &HttpOptions,
    abort: &AbortToken,
    mut on_progress: P,
) -> Result<u64, TransferError>
where
    W: Write,
    P: FnMut(u64, Option<u64>),
{
    let mut written: u64 = 0;
    let mut write_err: Option<std::io::Error> = None;
    let mut easy = new_handle(url, opts)?;
    easy.progress(true)?;

    let result = {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            if abort.is_aborted() {
                return Ok(0);
            }
            match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    tracing::warn!("archive write failed: {}", e);
                    write_err = Some(e);
                    Ok(0) // abort transfer
                }
            }
        })?;
        transfer.progress_function(|dltotal, dlnow, _, _| {
            let total = if dltotal > 0.0 { Some(dltotal as u64) } else { None };
            on_progress(dlnow as u64, total);
            !abort.is_aborted()
        })?;
        transfer.perform()
    };

    if let Some(e) = write_err {
        return Err(TransferError::Storage(e));
    }
    if abort.is_aborted() {
        return Err(TransferError::Aborted);
    }
    if let Err(e) = result {
        return Err(perform_error(&mut easy, e));
    }
    check_status(&mut easy)?;
    sink.flush().map_err(TransferError::Storage)?;
    Ok(written)
}

//! Capped body reading.

use bytes::Bytes;
use futures::{Stream, StreamExt};

/// Body bytes read through a ceiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CappedBody {
    pub bytes: Vec<u8>,
    pub truncated: bool,
}

/// Read a chunked body, keeping at most `limit` bytes.
///
/// Bytes past the ceiling are dropped rather than reported as an error, and
/// the stream is not polled again once it has overflowed.
pub async fn read_capped<S, E>(stream: S, limit: usize) -> Result<CappedBody, E>
where
    S: Stream<Item = Result<Bytes, E>>,
{
    let mut stream = std::pin::pin!(stream);
    let mut bytes = Vec::new();
    let mut truncated = false;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        let remaining = limit - bytes.len();

        if chunk.len() > remaining {
            bytes.extend_from_slice(&chunk[..remaining]);
            truncated = true;
            break;
        }

        bytes.extend_from_slice(&chunk);
    }

    Ok(CappedBody { bytes, truncated })
}

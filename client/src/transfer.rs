//! Cancellable fetch and chunk-read primitives.
//!
//! Both primitives race real work against the request's cancellation
//! signal in a biased select: the signal is checked first, so when both
//! are ready at once, cancellation wins. The losing future is dropped at
//! the moment the race settles — for the fetch that aborts the in-flight
//! connection, which is exactly how the abort propagates to the far side.

use bytes::Bytes;
use cancelstream_core::{CancelSignal, RequestDescriptor};
use futures::stream::BoxStream;
use futures::{Stream, StreamExt};

use crate::error::FetchError;

/// A streaming response body.
pub type BodyStream = BoxStream<'static, reqwest::Result<Bytes>>;

/// Issue the GET for `descriptor`, racing the descriptor's signal.
///
/// A response with a non-success status is a connection-phase failure
/// carrying the status and whatever description the body holds; no body
/// data is considered delivered in that case.
///
/// # Errors
///
/// [`FetchError::ConnectCancelled`] if the signal wins the race,
/// [`FetchError::ConnectFailed`] for transport failures and error
/// statuses.
pub async fn fetch_streaming(
    client: &reqwest::Client,
    descriptor: &RequestDescriptor,
) -> Result<reqwest::Response, FetchError> {
    tracing::debug!(id = %descriptor.id, url = %descriptor.url, "issuing request");

    let response = tokio::select! {
        biased;
        () = descriptor.signal.cancelled() => return Err(FetchError::ConnectCancelled),
        result = client.get(&descriptor.url).send() => {
            result.map_err(|err| FetchError::ConnectFailed(err.to_string()))?
        }
    };

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let detail = response.text().await.unwrap_or_default();
        Err(FetchError::ConnectFailed(format!(
            "server returned {status}: {detail}"
        )))
    }
}

/// Turn a response into its body stream.
#[must_use]
pub fn body_stream(response: reqwest::Response) -> BodyStream {
    response.bytes_stream().boxed()
}

/// Read the next chunk, racing `signal`.
///
/// `Ok(None)` is a clean end of stream; nothing further may arrive after
/// it.
///
/// # Errors
///
/// [`FetchError::StreamingCancelled`] if the signal wins the race,
/// [`FetchError::StreamingFailed`] if the stream itself fails mid-body.
pub async fn read_chunk<S>(stream: &mut S, signal: &CancelSignal) -> Result<Option<Bytes>, FetchError>
where
    S: Stream<Item = reqwest::Result<Bytes>> + Unpin,
{
    tokio::select! {
        biased;
        () = signal.cancelled() => Err(FetchError::StreamingCancelled),
        chunk = stream.next() => match chunk {
            None => Ok(None),
            Some(Ok(bytes)) => Ok(Some(bytes)),
            Some(Err(err)) => Err(FetchError::StreamingFailed(err.to_string())),
        },
    }
}

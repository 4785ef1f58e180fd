//! Response Capture Adapter
//!
//! A body decorator that forwards every frame to the transport unchanged while
//! keeping a copy of the data. Once the body has been fully produced, the copy
//! becomes a [`CacheEntry`] in the store.

use std::fmt;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use axum::http::{HeaderMap, StatusCode};
use bytes::{Bytes, BytesMut};
use http_body::{Body, Frame, SizeHint};
use tracing::{debug, warn};

use crate::cache::{write_store, CacheEntry, SharedStore};

/// Everything needed to store the response except its body.
#[derive(Debug)]
pub struct PendingEntry {
    pub store: SharedStore,
    pub key: String,
    pub status: StatusCode,
    /// Headers with the exclusion set already removed
    pub headers: HeaderMap,
    pub ttl_seconds: u64,
}

/// Body wrapper that buffers what it forwards.
///
/// The entry is built only after the last frame, so a body that errors or is
/// dropped half way (client disconnect) never reaches the store. Capture is
/// abandoned, without affecting the forwarded stream, once the buffer would
/// exceed `limit` bytes.
pub struct CaptureBody<B> {
    inner: B,
    buffer: BytesMut,
    limit: usize,
    pending: Option<PendingEntry>,
}

impl<B> CaptureBody<B>
where
    B: Body<Data = Bytes>,
{
    pub fn new(inner: B, pending: PendingEntry, limit: usize) -> Self {
        let mut body = Self {
            inner,
            buffer: BytesMut::new(),
            limit,
            pending: Some(pending),
        };
        // An empty body may never be polled
        if body.inner.is_end_stream() {
            body.finish();
        }
        body
    }

    fn capture(&mut self, data: &Bytes) {
        let Some(pending) = &self.pending else {
            return;
        };
        if self.buffer.len() + data.len() > self.limit {
            warn!(
                key = %pending.key,
                limit = self.limit,
                "response body exceeds cache size limit, not caching"
            );
            self.abandon();
            return;
        }
        self.buffer.extend_from_slice(data);
    }

    fn abandon(&mut self) {
        self.pending = None;
        self.buffer = BytesMut::new();
    }

    fn finish(&mut self) {
        let Some(pending) = self.pending.take() else {
            return;
        };
        let body = std::mem::take(&mut self.buffer).freeze();

        if !pending.status.is_success() {
            debug!(
                key = %pending.key,
                status = pending.status.as_u16(),
                "status not cacheable, discarding capture"
            );
            return;
        }

        let entry = CacheEntry::new(
            pending.key.clone(),
            pending.status.as_u16(),
            pending.headers,
            body,
            pending.ttl_seconds,
        );
        let size = entry.size_bytes;
        let evicted = write_store(&pending.store, "capture.set").set(pending.key.clone(), entry);
        debug!(
            key = %pending.key,
            size,
            ttl = pending.ttl_seconds,
            evicted,
            "stored response"
        );
    }
}

impl<B> Body for CaptureBody<B>
where
    B: Body<Data = Bytes> + Unpin,
    B::Error: fmt::Display,
{
    type Data = Bytes;
    type Error = B::Error;

    fn poll_frame(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = &mut *self;
        match ready!(Pin::new(&mut this.inner).poll_frame(cx)) {
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    this.capture(data);
                }
                if this.inner.is_end_stream() {
                    this.finish();
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Some(Err(err)) => {
                if let Some(pending) = &this.pending {
                    warn!(key = %pending.key, error = %err, "response body failed, not caching");
                }
                this.abandon();
                Poll::Ready(Some(Err(err)))
            }
            None => {
                this.finish();
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl<B> CaptureBody<B> {
    /// Bytes accumulated so far.
    fn captured_len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether the response is still a candidate for storage.
    fn is_capturing(&self) -> bool {
        self.pending.is_some()
    }
}

impl<B> fmt::Debug for CaptureBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureBody")
            .field("captured", &self.captured_len())
            .field("limit", &self.limit)
            .field("capturing", &self.is_capturing())
            .finish()
    }
}

//! # Image Upload Plumbing
//!
//! Cancellation tokens and progress reporting for multipart image uploads.
//!
//! ## Upload Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Image Upload Flow                                  │
//! │                                                                         │
//! │  Dashboard picks file                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UploadImageRequest { item_id, bytes, progress, cancel }               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Body streamed in 64 KiB chunks ──► progress(sent, total) per chunk    │
//! │       │                                                                 │
//! │       ├── token.cancel() before resolve ──► ApiError { status: 499 }   │
//! │       │                                     (no state change anywhere)  │
//! │       ▼                                                                 │
//! │  2xx ──► ItemImage appended to the owning item                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Token Lifecycle
//! A token is single-shot: once an upload completes or is cancelled, the
//! caller must issue a fresh token for the next upload. Only image upload
//! supports cancellation; every other operation runs to resolution.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use tokio::sync::watch;

/// Chunk size for the streamed upload body.
const UPLOAD_CHUNK_BYTES: usize = 64 * 1024;

// =============================================================================
// Cancel Token
// =============================================================================

/// Cancellation token for an in-flight image upload.
///
/// Cloneable; any clone may cancel. Cancellation is sticky: once fired,
/// the token stays cancelled and must be replaced for the next upload.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        CancelToken { tx: Arc::new(tx) }
    }

    /// Fires the token. Idempotent.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }

    /// True iff the token has fired.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves when the token fires; pends forever if it never does.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                // Sender kept alive by self; unreachable in practice.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        CancelToken::new()
    }
}

// =============================================================================
// Upload Request
// =============================================================================

/// Progress callback: `(bytes_sent, bytes_total)`.
pub type ProgressFn = Arc<dyn Fn(u64, u64) + Send + Sync>;

/// Parameters for uploading one image to an item.
#[derive(Clone)]
pub struct UploadImageRequest {
    /// Item the image attaches to.
    pub item_id: i64,

    /// File name forwarded in the multipart field.
    pub file_name: String,

    /// MIME type of the image, e.g. `"image/jpeg"`.
    pub content_type: String,

    /// Raw image bytes.
    pub bytes: Bytes,

    /// Optional progress callback, invoked once per streamed chunk.
    pub progress: Option<ProgressFn>,

    /// Optional cancellation token.
    pub cancel: Option<CancelToken>,
}

impl UploadImageRequest {
    pub fn new(
        item_id: i64,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        UploadImageRequest {
            item_id,
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
            progress: None,
            cancel: None,
        }
    }

    pub fn with_progress(mut self, progress: ProgressFn) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Total body size in bytes.
    pub fn total_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl fmt::Debug for UploadImageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadImageRequest")
            .field("item_id", &self.item_id)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("bytes", &self.bytes.len())
            .field("has_progress", &self.progress.is_some())
            .field("has_cancel", &self.cancel.is_some())
            .finish()
    }
}

// =============================================================================
// Progress Stream
// =============================================================================

/// Splits the upload body into chunks, reporting progress after each one.
pub(crate) fn progress_chunks(
    bytes: Bytes,
    progress: Option<ProgressFn>,
) -> impl Stream<Item = Result<Bytes, std::io::Error>> + Send {
    let total = bytes.len() as u64;
    futures::stream::unfold(
        (bytes, progress, 0u64),
        move |(mut remaining, progress, sent)| async move {
            if remaining.is_empty() {
                return None;
            }
            let take = remaining.len().min(UPLOAD_CHUNK_BYTES);
            let chunk = remaining.split_to(take);
            let sent = sent + take as u64;
            if let Some(callback) = &progress {
                callback(sent, total);
            }
            Some((Ok(chunk), (remaining, progress, sent)))
        },
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use std::sync::Mutex;

    #[test]
    fn test_token_starts_unfired() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_is_sticky_and_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert!(token.clone().is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_future_resolves_after_fire() {
        let token = CancelToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_progress_chunks_report_monotonic_totals() {
        let payload = Bytes::from(vec![0u8; UPLOAD_CHUNK_BYTES * 2 + 17]);
        let seen: Arc<Mutex<Vec<(u64, u64)>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress: ProgressFn = Arc::new(move |sent, total| {
            sink.lock().unwrap().push((sent, total));
        });

        let chunks: Vec<_> = progress_chunks(payload.clone(), Some(progress))
            .collect()
            .await;

        let reassembled: usize = chunks.iter().map(|c| c.as_ref().unwrap().len()).sum();
        assert_eq!(reassembled, payload.len());

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen.last().copied(), Some((payload.len() as u64, payload.len() as u64)));
        assert!(seen.windows(2).all(|w| w[0].0 < w[1].0));
    }
}

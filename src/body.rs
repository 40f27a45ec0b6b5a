use crate::config::STREAM_BUFFER_SIZE;
use crate::signal::Completion;
use futures::TryStreamExt;
use http_body_util::combinators::BoxBody;
use http_body_util::StreamBody;
use http_body_util::{BodyExt, Empty};
use hyper::body::{Body, Bytes, Frame, SizeHint};
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

pub fn empty<E>() -> BoxBody<Bytes, E> {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed()
}

/// The file is closed when the returned body is dropped.
pub fn from_file(file: File) -> impl Body<Data = Bytes, Error = io::Error> {
    let stream = ReaderStream::with_capacity(file, STREAM_BUFFER_SIZE);
    StreamBody::new(stream.map_ok(Frame::data))
}

/// Fires the completion signal once hyper is done with the body,
/// whether it was written out fully or abandoned halfway.
pub struct Completing<B> {
    inner: B,
    done: Arc<Completion>,
}

impl<B> Completing<B> {
    pub fn new(inner: B, done: Arc<Completion>) -> Self {
        Self { inner, done }
    }
}

impl<B> Drop for Completing<B> {
    fn drop(&mut self) {
        if self.done.fire() {
            log::debug!("Response finished, signalling shutdown");
        }
    }
}

impl<B: Body + Unpin> Body for Completing<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        Pin::new(&mut self.get_mut().inner).poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn file_body_yields_contents() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"some bytes").unwrap();
        let file = File::open(tmp.path()).await.unwrap();

        let collected = from_file(file).collect().await.unwrap().to_bytes();
        assert_eq!(&collected[..], b"some bytes");
    }

    #[tokio::test]
    async fn completing_fires_after_body_is_consumed() {
        let done = Arc::new(Completion::new());
        let body = Completing::new(empty::<io::Error>(), Arc::clone(&done));
        assert!(!done.is_fired());

        let collected = body.collect().await.unwrap().to_bytes();
        assert!(collected.is_empty());
        assert!(done.is_fired());
    }

    #[test]
    fn completing_fires_when_abandoned() {
        let done = Arc::new(Completion::new());
        drop(Completing::new(empty::<io::Error>(), Arc::clone(&done)));
        assert!(done.is_fired());
    }
}

use crate::err::Error;
use crate::tcp;
use hyper::body::{Body, Incoming};
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use std::convert::Infallible;
use std::future::Future;
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::time::timeout;

/// Serves connections until `shutdown` resolves, then stops accepting and waits for live connections.
pub async fn serve_until<S, F, B>(
    mut listener: TcpListener,
    state: S,
    handle_req: F,
    shutdown: impl Future<Output = ()>,
    shutdown_timeout: Option<Duration>,
) -> Result<(), Error>
where
    S: Send + Sync + 'static,
    F: for<'s> ServiceFn<'s, Request<Incoming>, S, Response<B>> + Copy + Send + 'static,
    B: Body + Send + 'static,
    <B as Body>::Data: Send,
    <B as Body>::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let state = Arc::new(state);
    let graceful = GracefulShutdown::new();
    let builder = auto::Builder::new(TokioExecutor::new());
    let mut shutdown = pin!(shutdown);

    loop {
        let tcp = tokio::select! {
            accepted = tcp::accept(&mut listener) => match accepted {
                Ok(tcp) => tcp,
                Err(source) => {
                    let port = listener.local_addr().map_or(0, |addr| addr.port());
                    return Err(Error::ListenFailure { port, source });
                }
            },
            () = &mut shutdown => break,
        };
        let io = TokioIo::new(tcp);

        let state = Arc::clone(&state);
        let serve = service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { Ok::<_, Infallible>(handle_req(req, &state).await) }
        });

        let conn = graceful.watch(
            builder
                .serve_connection_with_upgrades(io, serve)
                .into_owned(),
        );
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                log::error!("Error serving connection: {}", e);
            }
        });
    }

    // stop accepting: further connections are refused
    drop(listener);

    match shutdown_timeout {
        Some(limit) => timeout(limit, graceful.shutdown())
            .await
            .map_err(|_| Error::ShutdownFailure(limit)),
        None => {
            graceful.shutdown().await;
            Ok(())
        }
    }
}

// Work around the lack of HKT bounds.
// Because the future will borrow from the state argument, we need to write bounds like this:
// ```
// where
//     F: for<'s> FnOnce(Request<Body>, &'s S) -> Fut<'s>
//     Fut<'s>: Future<Output = Result<Response<B>, E>> + 's
// ```
// Which can't currently be done. Instead, factor both bounds out to a dedicated trait,
// which is implemented for all matching functions.
pub trait ServiceFn<'s, T, S, R>
where
    Self: FnOnce(T, &'s S) -> Self::Fut,
    Self::Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut;
}

impl<'s, T, S, R, F, Fut> ServiceFn<'s, T, S, R> for F
where
    F: FnOnce(T, &'s S) -> Fut,
    Fut: Future<Output = R> + Send + 's,
    S: 's,
{
    type Fut = Fut;
}

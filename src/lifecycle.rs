use crate::addrs;
use crate::config::{ServeConfig, Target};
use crate::err::Error;
use crate::http;
use crate::routes::{respond_to_request, Served, State};
use crate::signal::Completion;
use std::fmt::{self, Display};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::fs::File;
use tokio::net::TcpListener;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Starting,
    Serving,
    ShuttingDown,
    Terminated,
}

impl Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Phase::Starting => "starting",
            Phase::Serving => "serving",
            Phase::ShuttingDown => "shutting down",
            Phase::Terminated => "terminated",
        })
    }
}

fn enter(phase: Phase) {
    log::debug!("Lifecycle: {}", phase);
}

pub async fn run(config: ServeConfig, shutdown_timeout: Option<Duration>) -> Result<(), Error> {
    enter(Phase::Starting);

    let served = open(&config.target).await?;

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, config.port));
    log::info!("Binding to: {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| Error::ListenFailure {
            port: config.port,
            source,
        })?;

    println!("{}", banner(&config, &addrs::local_ipv4()));

    serve(listener, served, shutdown_timeout).await
}

async fn open(target: &Target) -> Result<Served, Error> {
    match target {
        Target::File {
            path,
            display_name,
            size_bytes,
        } => match File::open(path).await {
            Ok(file) => Ok(Served::File {
                file,
                display_name: display_name.clone(),
                size_bytes: *size_bytes,
            }),
            Err(source) => Err(Error::Open {
                path: path.clone(),
                source,
            }),
        },
        Target::Redirect { url } => Ok(Served::Redirect { url: url.clone() }),
    }
}

/// Serves on an already-bound listener until the first response is finished, then shuts down.
///
/// `shutdown_timeout` only starts counting once that first response is done.
pub async fn serve(
    listener: TcpListener,
    served: Served,
    shutdown_timeout: Option<Duration>,
) -> Result<(), Error> {
    let done = Arc::new(Completion::new());
    let state = State {
        served,
        done: Arc::clone(&done),
    };

    enter(Phase::Serving);
    let shutdown = async move {
        done.wait().await;
        enter(Phase::ShuttingDown);
    };
    http::serve_until(
        listener,
        state,
        respond_to_request,
        shutdown,
        shutdown_timeout,
    )
    .await?;

    enter(Phase::Terminated);
    Ok(())
}

fn banner(config: &ServeConfig, ips: &[Ipv4Addr]) -> String {
    let info = match &config.target {
        Target::File { display_name, .. } => format!("Serving '{}'", display_name),
        Target::Redirect { url } => {
            format!("Forwarding to '{}'", String::from_utf8_lossy(url.as_bytes()))
        }
    };

    match ips {
        [ip] => format!("{} at http://{}:{}...", info, ip, config.port),
        _ => {
            let ips = ips.iter().map(Ipv4Addr::to_string).collect::<Vec<_>>();
            format!(
                "{} on port {}...\nAlternative IPs: [{}]",
                info,
                config.port,
                ips.join(" ")
            )
        }
    }
}

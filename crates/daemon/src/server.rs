// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.

use std::time::Duration;

use tj_engine::{log_result, Dispatched};
use tokio::io::AsyncWrite;
use tokio::net::UnixStream;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{debug, error, info};

use crate::lifecycle::{DaemonState, LifecycleError};
use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};

/// How a request is answered
pub enum Reply {
    /// Response is ready
    Now(Response),
    /// Response depends on job invocations still running
    Later(Vec<Dispatched>),
}

/// Serve clients and feed published outcomes back into dispatch until
/// SIGTERM, SIGINT or a `Shutdown` request, then shut the daemon down
pub async fn serve(daemon: &mut DaemonState) -> Result<(), LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    while !daemon.shutdown_requested {
        tokio::select! {
            accepted = daemon.listener.accept() => match accepted {
                Ok((stream, _)) => {
                    if let Err(e) = handle_connection(daemon, stream).await {
                        error!("Error handling connection: {}", e);
                    }
                }
                Err(e) => error!("Error accepting connection: {}", e),
            },
            Some(event) = daemon.published.recv() => daemon.handle_published(&event),
            _ = sigterm.recv() => {
                info!("received SIGTERM");
                break;
            }
            _ = sigint.recv() => {
                info!("received SIGINT");
                break;
            }
        }
    }

    daemon.shutdown().await
}

/// Handle a single client connection
///
/// Waiting emits are answered from a spawned task so the accept loop keeps
/// serving other clients and the events those jobs publish.
pub async fn handle_connection(
    daemon: &mut DaemonState,
    stream: UnixStream,
) -> Result<(), ServerError> {
    // Split stream for reading/writing
    let (mut reader, mut writer) = stream.into_split();

    // Read request with timeout
    let request = match protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await {
        Ok(req) => req,
        Err(protocol::ProtocolError::Timeout) => {
            error!("Request read timeout");
            return Err(ServerError::Timeout);
        }
        Err(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected before sending request");
            return Ok(());
        }
        Err(e) => {
            error!("Failed to read request: {}", e);
            return Err(ServerError::Protocol(e));
        }
    };

    debug!("Received request: {:?}", request);

    match handle_request(daemon, request) {
        Reply::Now(response) => respond(&mut writer, &response, DEFAULT_TIMEOUT).await,
        Reply::Later(dispatched) => {
            tokio::spawn(async move {
                let response = collect(dispatched).await;
                if let Err(e) = respond(&mut writer, &response, DEFAULT_TIMEOUT).await {
                    error!("Failed to answer waiting client: {}", e);
                }
            });
            Ok(())
        }
    }
}

async fn respond<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ServerError> {
    debug!("Sending response: {:?}", response);
    protocol::write_response(writer, response, timeout)
        .await
        .map_err(ServerError::Protocol)
}

/// Handle a single request
pub fn handle_request(daemon: &mut DaemonState, request: Request) -> Reply {
    match request {
        Request::Ping => Reply::Now(Response::Pong),

        Request::Hello { version: _ } => Reply::Now(Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        }),

        Request::Emit { event, wait } => {
            let dispatched = daemon.emit(&event);
            if wait {
                Reply::Later(dispatched)
            } else {
                let jobs = dispatched.iter().map(|d| d.job.clone()).collect();
                for dispatched in dispatched {
                    dispatched.detach();
                }
                Reply::Now(Response::Accepted { jobs })
            }
        }

        Request::Status => Reply::Now(Response::Status {
            uptime_secs: daemon.start_time.elapsed().as_secs(),
            jobs: daemon.job_names(),
            events_handled: daemon.events_handled,
        }),

        Request::Shutdown => {
            daemon.shutdown_requested = true;
            Reply::Now(Response::ShuttingDown)
        }
    }
}

/// Wait for every invocation and fold the results into one response
///
/// Any job that did not publish an outcome turns the whole reply into
/// `Rejected`; its error is listed next to the other failures.
pub async fn collect(dispatched: Vec<Dispatched>) -> Response {
    let mut outcomes = Vec::new();
    let mut errors = Vec::new();

    for dispatched in dispatched {
        let job = dispatched.job.clone();
        let result = dispatched.join().await;
        log_result(&job, &result);
        match result {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => errors.push(e.to_string()),
        }
    }

    if errors.is_empty() {
        Response::Completed { outcomes }
    } else {
        Response::Rejected { errors }
    }
}

/// Server errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Request timeout")]
    Timeout,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;

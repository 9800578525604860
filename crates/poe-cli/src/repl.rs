//! Line protocol served on stdin/stdout.
//!
//! One request per line:
//!
//! - `<attribute>` prints the attribute value
//! - `<attribute> <value>` writes it and prints `ok` or `error: <message>`
//! - `list` prints every attribute name
//! - `status` prints the switch status as JSON
//! - `quit` ends the session

use anyhow::Result;
use poe_hardware::GpioPlatform;
use poe_surface::ControlSurface;
use std::future::Future;
use std::io::{self, BufRead};
use std::thread;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::debug;

/// Lines read from the request input.
pub type Requests = mpsc::Receiver<io::Result<String>>;

/// Read `input` line by line on a dedicated thread.
///
/// A blocking read cannot be cancelled, so it runs outside the runtime: when
/// the session ends early the thread is left blocked and does not hold up
/// runtime shutdown.
pub fn spawn_reader<R>(input: R) -> io::Result<Requests>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(16);
    thread::Builder::new()
        .name("poectl-input".to_string())
        .spawn(move || {
            for line in input.lines() {
                if tx.blocking_send(line).is_err() {
                    break;
                }
            }
        })?;
    Ok(rx)
}

/// Serve `requests` until `quit`, end of input or `shutdown` completes.
pub async fn serve_until<P, W, F>(
    surface: &ControlSurface<P>,
    requests: Requests,
    output: &mut W,
    shutdown: F,
) -> Result<()>
where
    P: GpioPlatform,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::select! {
        result = serve(surface, requests, output) => result,
        () = shutdown => Ok(()),
    }
}

/// Serve `requests` until `quit` or end of input.
pub async fn serve<P, W>(
    surface: &ControlSurface<P>,
    mut requests: Requests,
    output: &mut W,
) -> Result<()>
where
    P: GpioPlatform,
    W: AsyncWrite + Unpin,
{
    while let Some(line) = requests.recv().await {
        let line = line?;
        let request = line.trim();
        if request.is_empty() {
            continue;
        }
        if request == "quit" {
            debug!("Session closed by request");
            break;
        }

        let response = handle(surface, request).await?;
        output.write_all(response.as_bytes()).await?;
        output.write_all(b"\n").await?;
        output.flush().await?;
    }

    Ok(())
}

async fn handle<P: GpioPlatform>(surface: &ControlSurface<P>, request: &str) -> Result<String> {
    let response = match request.split_once(char::is_whitespace) {
        None if request == "list" => surface
            .attributes()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"),
        None if request == "status" => serde_json::to_string(&surface.switch().status().await)?,
        None => match surface.read_named(request).await {
            Ok(value) => value,
            Err(e) => format!("error: {e}"),
        },
        Some((name, value)) => match surface.write_named(name, value.trim_start()).await {
            Ok(()) => "ok".to_string(),
            Err(e) => format!("error: {e}"),
        },
    };

    Ok(response)
}

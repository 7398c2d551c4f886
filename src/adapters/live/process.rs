//! Live process launcher using `tokio::process`.

use std::error::Error;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use crate::ports::process::{LaunchRequest, LineSink, ProcessFuture, ProcessLauncher, Stream};

/// Capacity of the line channel shared by the two stream readers.
const LINE_BUFFER: usize = 256;

/// Spawns real child processes and relays their output line by line.
///
/// Each stream gets its own reader task so a chatty stderr can never stall
/// a child that is blocked writing to stdout, and vice versa. The child is
/// not killed when the launcher future is dropped.
pub struct LiveProcessLauncher;

impl ProcessLauncher for LiveProcessLauncher {
    fn launch<'a>(
        &'a self,
        request: &'a LaunchRequest,
        sink: &'a dyn LineSink,
    ) -> ProcessFuture<'a> {
        Box::pin(supervise(request, sink))
    }
}

async fn supervise(
    request: &LaunchRequest,
    sink: &dyn LineSink,
) -> Result<i32, Box<dyn Error + Send + Sync>> {
    let mut child = Command::new(&request.program)
        .arg(&request.script)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let (tx, mut rx) = mpsc::channel::<(Stream, String)>(LINE_BUFFER);
    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        readers.push(tokio::spawn(relay_lines(stdout, Stream::Stdout, tx.clone())));
    }
    if let Some(stderr) = child.stderr.take() {
        readers.push(tokio::spawn(relay_lines(stderr, Stream::Stderr, tx.clone())));
    }
    // Channel closes once both readers hit EOF.
    drop(tx);

    while let Some((stream, line)) = rx.recv().await {
        sink.line(stream, &line);
    }

    let status = child.wait().await?;
    for reader in readers {
        let _ = reader.await;
    }
    Ok(status.code().unwrap_or(-1))
}

/// Reads `reader` to EOF, sending each line (lossily decoded, newline
/// stripped) tagged with `stream`.
async fn relay_lines<R>(reader: R, stream: Stream, tx: mpsc::Sender<(Stream, String)>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(_) => {
                let line = String::from_utf8_lossy(&buf);
                let line = line.trim_end_matches(['\n', '\r']).to_string();
                if tx.send((stream, line)).await.is_err() {
                    break;
                }
            }
        }
    }
}

use std::borrow::Cow;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;

use crate::error::RunnerError;
use crate::frame::{Direction, FrameLog};
use crate::util::LineBuffer;

pub type RelayTask = JoinHandle<Result<u64, RunnerError>>;

/// Client stdin -> child stdin. Each write is drained before the next read, and the
/// child's stdin is shut down once the client reaches end of input.
pub fn relay_client_to_server<R, W>(rd: R, wr: W, log: FrameLog, chunk_size: usize) -> RelayTask
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pump_lines(
        rd,
        wr,
        log,
        chunk_size,
        Direction::ClientToServer,
        ("client stdin", "child stdin"),
        true,
    )
}

/// Child stdout -> client stdout.
pub fn relay_server_to_client<R, W>(rd: R, wr: W, log: FrameLog, chunk_size: usize) -> RelayTask
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pump_lines(
        rd,
        wr,
        log,
        chunk_size,
        Direction::ServerToClient,
        ("child stdout", "client stdout"),
        false,
    )
}

/// Child stderr -> frame log, and to `mirror` when one is given.
///
/// Diagnostics are not framed, so each chunk is logged as-is rather than split into lines.
pub fn relay_server_stderr<R, W>(
    mut rd: R,
    mut mirror: Option<W>,
    log: FrameLog,
    chunk_size: usize,
) -> RelayTask
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut total = 0u64;

        while let Some(chunk) = read_chunk(&mut rd, &mut buf)
            .await
            .map_err(|e| stream_io("child stderr", e))?
        {
            total += chunk.len() as u64;
            log.record(Direction::ServerStderr, &describe_diagnostic(&chunk));

            if let Some(wr) = mirror.as_mut() {
                if let Err(e) = write_drained(wr, &chunk).await {
                    // Keep logging even if our own stderr went away.
                    tracing::debug!(error.kind = "relay.mirror_failed", error.message = %e);
                    mirror = None;
                }
            }
        }

        tracing::debug!(relay = "stderr", bytes = total, "relay reached eof");
        Ok(total)
    })
}

fn pump_lines<R, W>(
    mut rd: R,
    mut wr: W,
    log: FrameLog,
    chunk_size: usize,
    direction: Direction,
    labels: (&'static str, &'static str),
    close_on_eof: bool,
) -> RelayTask
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (src, dst) = labels;
    tokio::spawn(async move {
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut total = 0u64;
        let mut lines = LineBuffer::new();

        let result: Result<(), RunnerError> = async {
            while let Some(chunk) = read_chunk(&mut rd, &mut buf)
                .await
                .map_err(|e| stream_io(src, e))?
            {
                write_drained(&mut wr, &chunk)
                    .await
                    .map_err(|e| stream_io(dst, e))?;
                total += chunk.len() as u64;

                for line in lines.push(&chunk) {
                    log.line(direction, &line);
                }
            }
            Ok(())
        }
        .await;

        // Best effort: whatever is left without a newline still goes to the log.
        if let Some(rest) = lines.finish() {
            log.partial(direction, &rest);
        }

        if close_on_eof {
            if let Err(e) = wr.shutdown().await {
                tracing::debug!(error.kind = "relay.close_failed", stream = dst, error.message = %e);
            }
        }

        tracing::debug!(relay = direction.tag(), bytes = total, "relay finished");
        result.map(|_| total)
    })
}

/// One read as an immutable chunk; `None` at end of stream.
async fn read_chunk<R>(rd: &mut R, buf: &mut [u8]) -> std::io::Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let n = rd.read(buf).await?;
    if n == 0 {
        return Ok(None);
    }
    Ok(Some(Bytes::copy_from_slice(&buf[..n])))
}

async fn write_drained<W>(wr: &mut W, chunk: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    wr.write_all(chunk).await?;
    wr.flush().await
}

fn stream_io(stream: &'static str, source: std::io::Error) -> RunnerError {
    RunnerError::StreamIo { stream, source }
}

/// Permissive decode of a diagnostic chunk; chunks with nothing readable left
/// become a byte-count placeholder.
fn describe_diagnostic(chunk: &[u8]) -> Cow<'_, str> {
    if let Ok(text) = std::str::from_utf8(chunk) {
        return Cow::Borrowed(text);
    }
    let text = String::from_utf8_lossy(chunk);
    let readable = text
        .chars()
        .any(|c| c != char::REPLACEMENT_CHARACTER && !c.is_control());
    if readable {
        text
    } else {
        Cow::Owned(format!("<binary {} bytes>\n", chunk.len()))
    }
}

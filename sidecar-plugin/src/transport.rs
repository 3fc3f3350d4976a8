//! Line-delimited JSON-RPC framing over the stdio streams

use sidecar_protocol::{RpcRequest, RpcResponse};
use thiserror::Error;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

/// What a read produced: a parsed request, or the end of the input stream.
///
/// End-of-stream is a control signal, not an error; the dispatch loop
/// terminates cleanly when it sees it.
#[derive(Debug)]
pub enum Inbound {
    Request(RpcRequest),
    Eof,
}

#[derive(Debug, Error)]
pub enum TransportError {
    /// The line was not a well-formed request object. Recoverable: the
    /// caller skips the line and keeps reading.
    #[error("malformed request line: {0}")]
    Parse(#[from] serde_json::Error),
    /// The underlying stream failed.
    #[error("stdio error: {0}")]
    Io(#[from] io::Error),
}

/// One request per line in, one response per line out.
pub struct Transport<R, W> {
    reader: R,
    writer: W,
}

impl Transport<BufReader<Stdin>, Stdout> {
    /// Transport over the process's real stdin/stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R, W> Transport<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Block until a full line is available, then parse it as a request.
    ///
    /// Blank lines are skipped rather than treated as protocol violations.
    pub async fn read_request(&mut self) -> Result<Inbound, TransportError> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line).await? == 0 {
                return Ok(Inbound::Eof);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return Ok(Inbound::Request(serde_json::from_str(trimmed)?));
        }
    }

    /// Serialize the response, append the newline terminator and flush.
    ///
    /// The flush happens before returning so the response is fully delivered
    /// to the host before the next read; the host may be blocking on it.
    pub async fn write_response(&mut self, response: &RpcResponse) -> Result<(), TransportError> {
        let json = serde_json::to_string(response)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sidecar_protocol::{RequestId, RpcResponse};
    use tokio::io::BufReader;

    #[tokio::test]
    async fn test_read_request_then_eof() {
        let input = b"{\"jsonrpc\":\"2.0\",\"method\":\"metadata\",\"id\":1}\n" as &[u8];
        let mut transport = Transport::new(BufReader::new(input), Vec::new());

        match transport.read_request().await.unwrap() {
            Inbound::Request(req) => assert_eq!(req.method, "metadata"),
            Inbound::Eof => panic!("expected a request"),
        }
        assert!(matches!(
            transport.read_request().await.unwrap(),
            Inbound::Eof
        ));
    }

    #[tokio::test]
    async fn test_blank_lines_are_skipped() {
        let input = b"\n  \n{\"jsonrpc\":\"2.0\",\"method\":\"metadata\"}\n" as &[u8];
        let mut transport = Transport::new(BufReader::new(input), Vec::new());

        assert!(matches!(
            transport.read_request().await.unwrap(),
            Inbound::Request(_)
        ));
    }

    #[tokio::test]
    async fn test_malformed_line_is_a_parse_error() {
        let input = b"this is not json\n" as &[u8];
        let mut transport = Transport::new(BufReader::new(input), Vec::new());

        assert!(matches!(
            transport.read_request().await,
            Err(TransportError::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_write_appends_newline() {
        let mut transport = Transport::new(BufReader::new(&b""[..]), Vec::new());
        let response = RpcResponse::success(serde_json::json!({"ok": true}), RequestId::from(1));
        transport.write_response(&response).await.unwrap();

        let written = String::from_utf8(transport.writer).unwrap();
        assert!(written.ends_with('\n'));
        assert_eq!(written.matches('\n').count(), 1);
    }
}

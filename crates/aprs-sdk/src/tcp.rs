//! Filtered APRS-IS feed over TCP.
//!
//! [`AprsIsTcp`] logs in with a server-side filter, then exchanges one
//! `\r\n`-terminated text line per frame in both directions.
//!
//! ```rust,no_run
//! use aprs_sdk::{AprsIsConfig, AprsIsTcp, Credentials};
//!
//! # async fn run() -> Result<(), aprs_sdk::SdkError> {
//! let config = AprsIsConfig::from_env();
//! let mut feed = AprsIsTcp::connect(&config, &Credentials::new("N0CALL"), Some("r/37.7/-122.4/50")).await?;
//!
//! while let Some(frame) = feed.next_frame().await? {
//!     println!("{frame}");
//! }
//! # Ok(())
//! # }
//! ```

use aprs_codec::Frame;
use futures::Stream;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::AprsIsConfig;
use crate::credentials::Credentials;
use crate::error::SdkError;

/// A logged-in APRS-IS TCP session.
#[derive(Debug)]
pub struct AprsIsTcp {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    line: Vec<u8>,
}

impl AprsIsTcp {
    // ------------------------------------------------------------------
    // Connection
    // ------------------------------------------------------------------

    /// Connect to the first reachable server and log in.
    ///
    /// Servers are tried in configuration order. The error of the last
    /// attempt is returned when none accepts the connection.
    pub async fn connect(
        config: &AprsIsConfig,
        credentials: &Credentials,
        filter: Option<&str>,
    ) -> Result<Self, SdkError> {
        let stream = open(config).await?;
        let (read, writer) = stream.into_split();

        let mut session = Self {
            reader: BufReader::with_capacity(config.recv_buffer, read),
            writer,
            line: Vec::new(),
        };

        let login = credentials.filtered_login_line(&config.software, filter);
        debug!(user = %credentials.user, "sending login");
        session.write_line(login.as_bytes()).await?;
        Ok(session)
    }

    // ------------------------------------------------------------------
    // Traffic
    // ------------------------------------------------------------------

    /// Send one frame as a text line.
    pub async fn send(&mut self, frame: &Frame) -> Result<(), SdkError> {
        debug!(%frame, "sending frame");
        self.write_line(&frame.to_text_bytes()).await
    }

    /// Wait for the next decodable frame. `None` once the server closes
    /// the connection.
    ///
    /// Server comments (`#` lines) are logged, undecodable lines are
    /// skipped.
    pub async fn next_frame(&mut self) -> Result<Option<Frame>, SdkError> {
        loop {
            self.line.clear();
            if self.reader.read_until(b'\n', &mut self.line).await? == 0 {
                info!("APRS-IS closed the connection");
                return Ok(None);
            }

            let line = trim_line_end(&self.line);
            if line.is_empty() {
                continue;
            }
            if line.starts_with(b"#") {
                if contains(line, b"logresp") {
                    debug!(line = %line.escape_ascii(), "login response");
                } else {
                    debug!(line = %line.escape_ascii(), "server comment");
                }
                continue;
            }

            match Frame::parse(line) {
                Ok(frame) => return Ok(Some(frame)),
                Err(err) => warn!(%err, line = %line.escape_ascii(), "skipping undecodable line"),
            }
        }
    }

    /// Turn the session into a stream of frames.
    ///
    /// The stream ends when the server closes the connection or after the
    /// first I/O error, which is yielded.
    pub fn into_stream(self) -> impl Stream<Item = Result<Frame, SdkError>> {
        futures::stream::unfold(Some(self), |state| async move {
            let mut session = state?;
            match session.next_frame().await {
                Ok(Some(frame)) => Some((Ok(frame), Some(session))),
                Ok(None) => None,
                Err(err) => Some((Err(err), None)),
            }
        })
    }

    async fn write_line(&mut self, line: &[u8]) -> Result<(), SdkError> {
        self.writer.write_all(line).await?;
        self.writer.write_all(b"\r\n").await?;
        self.writer.flush().await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn open(config: &AprsIsConfig) -> Result<TcpStream, SdkError> {
    let mut last_error = None;
    for address in config.addresses(config.filter_port) {
        info!(%address, "connecting to APRS-IS");
        match TcpStream::connect(address.as_str()).await {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                warn!(%address, error = %err, "connection failed, trying next server");
                last_error = Some(err);
            }
        }
    }
    Err(match last_error {
        Some(err) => err.into(),
        None => SdkError::Config("no APRS-IS servers configured".into()),
    })
}

fn trim_line_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b'\r' && b != b'\n')
        .map_or(0, |last| last + 1);
    &line[..end]
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

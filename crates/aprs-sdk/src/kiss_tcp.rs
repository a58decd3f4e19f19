//! KISS TNC reached over TCP (Direwolf, soundmodem, ...).

use std::collections::VecDeque;

use aprs_codec::kiss::{KissDecoder, KissFrame};
use aprs_codec::Frame;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tracing::{debug, info, warn};

use crate::error::SdkError;

const READ_CHUNK: usize = 1024;

/// A frame heard by the TNC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heard {
    /// TNC port the frame arrived on.
    pub port: u8,
    /// The decoded frame.
    pub frame: Frame,
}

/// Connection to a KISS-over-TCP TNC.
#[derive(Debug)]
pub struct KissTcp {
    stream: TcpStream,
    decoder: KissDecoder,
    pending: VecDeque<KissFrame>,
}

impl KissTcp {
    /// Connect to the TNC at `addr`.
    pub async fn connect(addr: impl ToSocketAddrs) -> Result<Self, SdkError> {
        let stream = TcpStream::connect(addr).await?;
        info!(peer = ?stream.peer_addr().ok(), "connected to KISS TNC");
        Ok(Self {
            stream,
            decoder: KissDecoder::new(),
            pending: VecDeque::new(),
        })
    }

    /// Queue `frame` for transmission on TNC `port`.
    pub async fn send(&mut self, frame: &Frame, port: u8) -> Result<(), SdkError> {
        debug!(%frame, port, "sending KISS frame");
        self.stream.write_all(&frame.to_kiss(port)).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Wait for the next decodable frame. `None` once the TNC closes the
    /// connection.
    pub async fn next_frame(&mut self) -> Result<Option<Heard>, SdkError> {
        let mut chunk = [0u8; READ_CHUNK];
        loop {
            while let Some(KissFrame { port, payload }) = self.pending.pop_front() {
                match Frame::from_kiss_payload(&payload) {
                    Ok(frame) => return Ok(Some(Heard { port, frame })),
                    Err(err) => warn!(%err, port, "skipping undecodable KISS frame"),
                }
            }

            let read = self.stream.read(&mut chunk).await?;
            if read == 0 {
                info!("KISS TNC closed the connection");
                return Ok(None);
            }
            self.pending.extend(self.decoder.feed(&chunk[..read]));
        }
    }
}

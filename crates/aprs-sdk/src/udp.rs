//! Fire-and-forget APRS-IS submission over UDP.

use aprs_codec::Frame;
use tokio::net::UdpSocket;
use tracing::debug;

use crate::config::AprsIsConfig;
use crate::credentials::Credentials;
use crate::error::SdkError;

/// Sends frames as `<login>\n<frame>` datagrams.
///
/// UDP submission requires a verified passcode on the server side; no
/// acknowledgement is returned either way.
#[derive(Debug)]
pub struct AprsIsUdp {
    socket: UdpSocket,
    target: String,
    login: String,
}

impl AprsIsUdp {
    /// Bind a local socket aimed at the first configured server's
    /// [`rx_port`](AprsIsConfig::rx_port).
    pub async fn connect(config: &AprsIsConfig, credentials: &Credentials) -> Result<Self, SdkError> {
        let target = config
            .addresses(config.rx_port)
            .into_iter()
            .next()
            .ok_or_else(|| SdkError::Config("no APRS-IS servers configured".into()))?;
        let socket = UdpSocket::bind("0.0.0.0:0").await?;

        Ok(Self {
            socket,
            target,
            login: credentials.login_line(&config.software),
        })
    }

    /// Send one frame.
    pub async fn send(&self, frame: &Frame) -> Result<(), SdkError> {
        let line = frame.to_text_bytes();
        let mut datagram = Vec::with_capacity(self.login.len() + 1 + line.len());
        datagram.extend_from_slice(self.login.as_bytes());
        datagram.push(b'\n');
        datagram.extend_from_slice(&line);

        debug!(target_addr = %self.target, %frame, "sending datagram");
        self.socket.send_to(&datagram, self.target.as_str()).await?;
        Ok(())
    }
}

//! APRS-IS submission over HTTP.

use aprs_codec::Frame;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::AprsIsConfig;
use crate::credentials::Credentials;
use crate::error::SdkError;

/// POSTs `<login>\n<frame>` to an APRS-IS HTTP port.
#[derive(Debug, Clone)]
pub struct AprsIsHttp {
    client: reqwest::Client,
    url: String,
    login: String,
}

impl AprsIsHttp {
    /// Target [`AprsIsConfig::url`] with a default HTTP client.
    pub fn new(config: &AprsIsConfig, credentials: &Credentials) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: config.url.clone(),
            login: credentials.login_line(&config.software),
        }
    }

    /// Use a preconfigured HTTP client (proxy, timeouts, ...).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Submit one frame. The server acknowledges with `204 No Content`.
    pub async fn send(&self, frame: &Frame) -> Result<(), SdkError> {
        let line = frame.to_text_bytes();
        let mut body = Vec::with_capacity(self.login.len() + 1 + line.len());
        body.extend_from_slice(self.login.as_bytes());
        body.push(b'\n');
        body.extend_from_slice(&line);

        debug!(url = %self.url, %frame, "posting frame");
        let res = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/octet-stream")
            .header(ACCEPT, "text/plain")
            .body(body)
            .send()
            .await?;

        let status = res.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }

        let text = res.text().await?;
        warn!(%status, response = %text, "APRS-IS refused frame");
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SdkError::Auth(text)),
            _ => Err(SdkError::Rejected(format!("{status}: {text}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Accept one request, answer with `response`, return the raw request.
    async fn one_shot_server(response: &'static str) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = stream.read(&mut chunk).await.unwrap();
                request.extend_from_slice(&chunk[..n]);
                if n == 0 || request_complete(&request) {
                    break;
                }
            }
            stream.write_all(response.as_bytes()).await.unwrap();
            String::from_utf8(request).unwrap()
        });

        (url, handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_ascii_lowercase();
        let length = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= head_end + 4 + length
    }

    fn client_for(url: String) -> AprsIsHttp {
        let config = AprsIsConfig {
            url,
            software: "aprs-rs test".into(),
            ..AprsIsConfig::default()
        };
        AprsIsHttp::new(&config, &Credentials::new("W2GMD").with_passcode("1234"))
            .with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn accepted_on_no_content() {
        let (url, server) =
            one_shot_server("HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n").await;

        client_for(url)
            .send(&Frame::parse("W2GMD>APRS:>via http").unwrap())
            .await
            .unwrap();

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST / HTTP/1.1\r\n"));
        assert!(lower.contains("content-type: application/octet-stream\r\n"));
        assert!(lower.contains("accept: text/plain\r\n"));
        assert!(request.ends_with("\r\n\r\nuser W2GMD pass 1234 vers aprs-rs test\nW2GMD>APRS:>via http"));
    }

    #[tokio::test]
    async fn other_status_is_rejected() {
        let (url, _server) = one_shot_server(
            "HTTP/1.1 200 OK\r\ncontent-length: 7\r\nconnection: close\r\n\r\nignored",
        )
        .await;

        let err = client_for(url)
            .send(&Frame::parse("W2GMD>APRS:>x").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Rejected(ref msg) if msg.contains("ignored")));
    }

    #[tokio::test]
    async fn forbidden_is_an_auth_error() {
        let (url, _server) = one_shot_server(
            "HTTP/1.1 403 Forbidden\r\ncontent-length: 3\r\nconnection: close\r\n\r\nbad",
        )
        .await;

        let err = client_for(url)
            .send(&Frame::parse("W2GMD>APRS:>x").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Auth(ref msg) if msg == "bad"));
    }
}

//! APRS-IS login credentials.

/// Passcode that logs in receive-only.
pub const RECEIVE_ONLY_PASSCODE: &str = "-1";

/// Station login presented to an APRS-IS server.
///
/// * `user`     – the station callsign, with optional SSID.
/// * `passcode` – the APRS-IS passcode; `-1` logs in receive-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Login callsign.
    pub user: String,
    /// APRS-IS passcode.
    pub passcode: String,
}

impl Credentials {
    /// Receive-only credentials for `user`.
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            passcode: RECEIVE_ONLY_PASSCODE.to_string(),
        }
    }

    /// Replace the passcode.
    #[must_use]
    pub fn with_passcode(mut self, passcode: impl Into<String>) -> Self {
        self.passcode = passcode.into();
        self
    }

    /// Whether these credentials can only receive.
    pub fn is_receive_only(&self) -> bool {
        self.passcode == RECEIVE_ONLY_PASSCODE
    }

    /// `user <U> pass <P> vers <SW>`, the login prefix used by every
    /// transport.
    pub fn login_line(&self, software: &str) -> String {
        format!("user {} pass {} vers {software}", self.user, self.passcode)
    }

    /// The TCP login line with a server-side filter appended. Defaults to
    /// `p/<user>`, i.e. packets from this station.
    pub fn filtered_login_line(&self, software: &str, filter: Option<&str>) -> String {
        let filter = match filter {
            Some(filter) => filter.to_string(),
            None => format!("p/{}", self.user),
        };
        format!("{} filter {filter}", self.login_line(software))
    }
}

//! # APRS SDK
//!
//! Transports carrying [`aprs_codec::Frame`] values to and from the APRS
//! network.
//!
//! The SDK provides:
//!
//! * [`AprsIsTcp`]: logged-in, filtered APRS-IS feed (send and receive).
//! * [`AprsIsUdp`] and [`AprsIsHttp`]: one-shot APRS-IS submission.
//! * [`KissTcp`]: a KISS TNC reachable over TCP.
//! * [`AprsIsConfig`]: server list and ports, read from the environment.
//! * [`Credentials`]: login callsign and passcode.
//! * [`SdkError`]: unified error type for all SDK operations.
//!
//! Codec types are re-exported for convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use aprs_sdk::{AprsIsConfig, AprsIsHttp, Credentials, PositionReport};
//!
//! # async fn run() -> Result<(), aprs_sdk::SdkError> {
//! let config = AprsIsConfig::from_env();
//! let creds = Credentials::new("W2GMD-9").with_passcode("12345");
//!
//! let frame = PositionReport::new("W2GMD-9".parse()?, 37.7418096, -122.38833)
//!     .comment("aprs-rs")
//!     .build()?;
//! AprsIsHttp::new(&config, &creds).send(&frame).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod http;
pub mod kiss_tcp;
pub mod tcp;
pub mod udp;

pub use config::{AprsIsConfig, APRSIS_SW_VERSION};
pub use credentials::Credentials;
pub use error::SdkError;
pub use http::AprsIsHttp;
pub use kiss_tcp::{Heard, KissTcp};
pub use tcp::AprsIsTcp;
pub use udp::AprsIsUdp;

// Re-export codec types for ergonomic usage.
pub use aprs_codec::{Callsign, Frame, InformationField, PositionReport};

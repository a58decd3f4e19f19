//! `aprs`: decode, build and exchange APRS frames from the command line.

use anyhow::{anyhow, Context, Result};
use aprs_codec::{Callsign, Frame, PositionReport, RawFrame};
use aprs_sdk::{AprsIsConfig, AprsIsHttp, AprsIsTcp, AprsIsUdp, Credentials, KissTcp};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "aprs")]
#[command(about = "APRS frame codec and APRS-IS client")]
#[command(author, version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a text frame, or an AX.25 frame given as hex
    Decode {
        /// Frame to decode
        input: String,
        /// Treat the input as hex-encoded bytes
        #[arg(long)]
        hex: bool,
        /// Print the decoded frame as JSON
        #[arg(long)]
        json: bool,
    },

    /// Encode a text frame to AX.25, printed as hex
    Encode {
        /// Frame in `SOURCE>DEST,PATH:INFO` form
        text: String,
        /// Emit a KISS data frame instead of a flagged AX.25 frame
        #[arg(long)]
        kiss: bool,
        /// TNC port for the KISS command byte
        #[arg(long, default_value_t = 0, requires = "kiss")]
        port: u8,
    },

    /// Build an uncompressed position report
    Position(PositionArgs),

    /// Submit one frame to APRS-IS
    Send {
        /// Frame in `SOURCE>DEST,PATH:INFO` form
        text: String,
        #[command(flatten)]
        login: LoginArgs,
        /// Transport used for submission
        #[arg(long, value_enum, default_value_t = Via::Tcp)]
        via: Via,
    },

    /// Print frames from the filtered APRS-IS feed
    Listen {
        #[command(flatten)]
        login: LoginArgs,
        /// Server-side filter (defaults to `p/<user>`)
        #[arg(long)]
        filter: Option<String>,
        /// Stop after this many frames
        #[arg(long)]
        count: Option<usize>,
    },

    /// Print frames heard by a KISS TNC over TCP
    Kiss {
        /// TNC address, e.g. `localhost:8001`
        #[arg(long)]
        addr: String,
        /// Stop after this many frames
        #[arg(long)]
        count: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct PositionArgs {
    /// Reporting station
    #[arg(long)]
    source: Callsign,
    /// Latitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lat: f64,
    /// Longitude in decimal degrees
    #[arg(long, allow_hyphen_values = true)]
    lng: f64,
    /// Destination (TOCALL)
    #[arg(long)]
    dest: Option<Callsign>,
    /// Digipeater path, comma separated
    #[arg(long, value_delimiter = ',')]
    path: Vec<Callsign>,
    /// Symbol table identifier
    #[arg(long, default_value_t = '/')]
    table: char,
    /// Symbol code
    #[arg(long, default_value_t = '>')]
    symbol: char,
    /// Free-text comment
    #[arg(long, default_value = "")]
    comment: String,
    /// Number of trailing digits to blank (0-4)
    #[arg(long, default_value_t = 0)]
    ambiguity: u8,
}

#[derive(Args, Debug)]
struct LoginArgs {
    /// Login callsign
    #[arg(long)]
    user: String,
    /// APRS-IS passcode (`-1` for receive-only)
    #[arg(long, default_value = "-1", allow_hyphen_values = true)]
    passcode: String,
    /// APRS-IS server, `host` or `host:port`; repeat to rotate
    #[arg(long = "server")]
    servers: Vec<String>,
}

impl LoginArgs {
    fn credentials(&self) -> Credentials {
        Credentials::new(&self.user).with_passcode(&self.passcode)
    }

    /// Environment configuration with CLI overrides applied.
    fn config(&self) -> AprsIsConfig {
        let mut config = AprsIsConfig::from_env();
        if !self.servers.is_empty() {
            config.servers.clone_from(&self.servers);
        }
        config
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum Via {
    Tcp,
    Udp,
    Http,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise structured logging (controlled via RUST_LOG env var).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode { input, hex, json } => {
            let frame = decode(&input, hex)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&frame)?);
            } else {
                println!("{frame}");
            }
        }
        Commands::Encode { text, kiss, port } => {
            let frame = Frame::parse(text.as_str())?;
            let bytes = if kiss { frame.to_kiss(port) } else { frame.encode() };
            println!("{}", hex::encode(bytes));
        }
        Commands::Position(args) => {
            println!("{}", position(args)?);
        }
        Commands::Send { text, login, via } => {
            let frame = Frame::parse(text.as_str())?;
            let config = login.config();
            let creds = login.credentials();
            match via {
                Via::Tcp => {
                    let mut session = AprsIsTcp::connect(&config, &creds, None).await?;
                    session.send(&frame).await?;
                }
                Via::Udp => AprsIsUdp::connect(&config, &creds).await?.send(&frame).await?,
                Via::Http => AprsIsHttp::new(&config, &creds).send(&frame).await?,
            }
            info!(%frame, ?via, "frame sent");
        }
        Commands::Listen { login, filter, count } => {
            let mut feed =
                AprsIsTcp::connect(&login.config(), &login.credentials(), filter.as_deref()).await?;
            let mut seen = 0;
            while count.is_none_or(|limit| seen < limit) {
                let Some(frame) = feed.next_frame().await? else {
                    break;
                };
                println!("{frame}");
                seen += 1;
            }
        }
        Commands::Kiss { addr, count } => {
            let mut tnc = KissTcp::connect(addr.as_str())
                .await
                .with_context(|| format!("connecting to KISS TNC at {addr}"))?;
            let mut seen = 0;
            while count.is_none_or(|limit| seen < limit) {
                let Some(heard) = tnc.next_frame().await? else {
                    break;
                };
                println!("[{}] {}", heard.port, heard.frame);
                seen += 1;
            }
        }
    }

    Ok(())
}

fn decode(input: &str, is_hex: bool) -> Result<Frame> {
    if is_hex {
        let bytes = decode_hex(input)?;
        Ok(Frame::parse(RawFrame::Binary(&bytes))?)
    } else {
        Ok(Frame::parse(RawFrame::Text(input))?)
    }
}

/// Parse hex, ignoring whitespace and `:` separators.
fn decode_hex(text: &str) -> Result<Vec<u8>> {
    let digits: String = text
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits).with_context(|| format!("invalid hex input {text:?}"))
}

fn position(args: PositionArgs) -> Result<Frame> {
    let mut report = PositionReport::new(args.source, args.lat, args.lng)
        .path(args.path)
        .symbol(args.table, args.symbol)
        .comment(args.comment)
        .ambiguity(args.ambiguity);
    if let Some(dest) = args.dest {
        report = report.destination(dest);
    }
    report
        .build()
        .map_err(|e| anyhow!("cannot build position report: {e}"))
}

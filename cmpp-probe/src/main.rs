//! cmpp-probe — entry point.
//!
//! ```text
//! cmpp-probe digest <text>                 MD5 of <text>
//! cmpp-probe auth [--timestamp MMDDHHMMSS] Connect authenticator for the account
//! cmpp-probe ucs2 <text>                   UCS-2 encoding and scanned length
//! cmpp-probe recode --from F --to T <text> Charset conversion
//! cmpp-probe describe <code>               Error catalog lookup
//! cmpp-probe active-test                   ACTIVE_TEST round trip to the gateway
//! cmpp-probe --gen-config                  Write default config to stdout
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cmpp_probe::config::ProbeConfig;
use cmpp_probe::probe::{self, ProbeError};

// ── CLI ──────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "cmpp-probe", about = "CMPP 2.0 gateway probe")]
struct Cli {
    /// Path to configuration TOML file.
    #[arg(short, long, default_value = "cmpp-probe.toml")]
    config: PathBuf,

    /// Print the default configuration to stdout and exit.
    #[arg(long)]
    gen_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hex MD5 digest of a string.
    Digest { text: String },
    /// Connect authenticator for the configured account.
    Auth {
        /// MMDDHHMMSS; defaults to the current local time.
        #[arg(long)]
        timestamp: Option<u32>,
    },
    /// Encode text as UCS-2 and run the length probe on it.
    Ucs2 { text: String },
    /// Convert text between charsets and print the result as hex.
    Recode {
        #[arg(long, default_value = "UTF-8")]
        from: String,
        #[arg(long, default_value = "UCS-2")]
        to: String,
        /// Output capacity in bytes.
        #[arg(long, default_value_t = cmpp_core::MAX_MSG_LENGTH)]
        capacity: usize,
        text: String,
    },
    /// Describe an error code.
    Describe { code: u32 },
    /// Send ACTIVE_TEST to the gateway and wait for the response.
    ActiveTest,
}

// ── Main ─────────────────────────────────────────────────────────

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // --gen-config: dump defaults and exit.
    if cli.gen_config {
        let text = toml::to_string_pretty(&ProbeConfig::default())?;
        println!("{text}");
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        eprintln!("no command given; see --help");
        return Ok(ExitCode::FAILURE);
    };

    // Load config.
    let config = ProbeConfig::load(&cli.config);

    // Init tracing. Reports go to stdout, logs to stderr.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let report = match command {
        Command::Digest { text } => probe::digest_hex(&text)?,
        Command::Auth { timestamp } => {
            let ts = timestamp.unwrap_or_else(cmpp_core::timestamp_now);
            match probe::authenticator_hex(&config, ts) {
                Ok(report) => report,
                Err(e) => return Ok(fail(&e)),
            }
        }
        Command::Ucs2 { text } => probe::ucs2_report(&text)?,
        Command::Recode {
            from,
            to,
            capacity,
            text,
        } => probe::recode_hex(&text, &from, &to, capacity)?,
        Command::Describe { code } => probe::describe_code(code),
        Command::ActiveTest => match probe::active_test(&config) {
            Ok((seq, rtt)) => {
                info!(sequence_id = seq, "gateway answered");
                format!("ACTIVE_TEST_RESP seq={seq} rtt={rtt:?}")
            }
            Err(e) => return Ok(fail(&e)),
        },
    };

    println!("{report}");
    Ok(ExitCode::SUCCESS)
}

/// Log a failed operation and exit with its catalog code when it has one.
fn fail(e: &ProbeError) -> ExitCode {
    match e.code() {
        Some(code) => {
            error!(code = code as u32, "{e}");
            ExitCode::from(code as u8)
        }
        None => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

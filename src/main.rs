//! QR Payload CLI
//!
//! Classifies QR code text and prints one-time-password codes for
//! `otpauth://` links.

use chrono::{DateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use qr_payload::{
    classify_with, generate_code, CodeSnapshot, FileConfig, ParsedPayload, Session,
};
use std::io::Read;
use std::path::PathBuf;
use tokio::sync::watch;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "qr-payload", version, about = "Classify QR code text and compute one-time passwords")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify scanned text (reads stdin when TEXT is omitted)
    Classify {
        text: Option<String>,
        /// Print the payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the code for an otpauth:// URI
    Code {
        uri: String,
        /// Keep refreshing until Ctrl-C
        #[arg(long)]
        watch: bool,
        /// Unix time to compute the code for
        #[arg(long, conflicts_with = "watch")]
        at: Option<i64>,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => fail(&format!("Failed to load config {}: {}", path.display(), e)),
        },
        None => FileConfig::default(),
    };
    debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Classify { text, json } => classify_cmd(&config, text, json),
        Command::Code { uri, watch, at } => {
            if watch {
                watch_cmd(&config, &uri)
            } else {
                code_cmd(&config, &uri, at)
            }
        }
    }
}

fn classify_cmd(config: &FileConfig, text: Option<String>, json: bool) {
    let text = match text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                fail(&format!("Failed to read stdin: {}", e));
            }
            buf
        }
    };

    let payload = match classify_with(&text, &config.otp) {
        Ok(payload) => payload,
        Err(e) => fail(&e.to_string()),
    };

    if json {
        match serde_json::to_string_pretty(&payload) {
            Ok(out) => println!("{}", out),
            Err(e) => fail(&format!("Failed to encode payload: {}", e)),
        }
    } else {
        print_payload(&payload);
    }
}

fn print_payload(payload: &ParsedPayload) {
    println!("{} [{}]", payload.title(), payload.format());
    println!("{}", payload.summary());
    for field in payload.fields() {
        println!("  {}: {}", field.label, field.value);
    }
    if let Some(params) = payload.otp() {
        println!("  Secret: {}", params.masked_secret());
    }
}

fn code_cmd(config: &FileConfig, uri: &str, at: Option<i64>) {
    let payload = otp_payload(config, uri);
    let Some(params) = payload.otp() else {
        fail("Not an otpauth URI");
    };

    let now: DateTime<Utc> = match at {
        Some(secs) => match Utc.timestamp_opt(secs, 0).single() {
            Some(time) => time,
            None => fail(&format!("Invalid timestamp: {}", secs)),
        },
        None => Utc::now(),
    };

    match generate_code(params, now) {
        Ok(code) => println!("{}", code),
        Err(e) => fail(&e.to_string()),
    }
}

fn watch_cmd(config: &FileConfig, uri: &str) {
    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => fail(&format!("Failed to start runtime: {}", e)),
    };

    let (stop_tx, mut stop_rx) = watch::channel(false);
    if let Err(e) = ctrlc::set_handler(move || {
        stop_tx.send_replace(true);
    }) {
        fail(&format!("Failed to install Ctrl-C handler: {}", e));
    }

    runtime.block_on(async {
        let mut session = Session::new(config);
        session.apply(otp_payload(config, uri));

        let mut codes = session.subscribe_code();
        print_snapshot(&codes.borrow_and_update());
        info!("Refreshing every {:?}, press Ctrl-C to stop", config.refresh.tick());

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                changed = codes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    print_snapshot(&codes.borrow_and_update());
                }
            }
        }
    });

    info!("Stopped");
}

fn print_snapshot(snapshot: &CodeSnapshot) {
    let code = snapshot.code.as_deref().unwrap_or("------");
    match snapshot.seconds_remaining {
        Some(left) => println!("{}  (refreshes in {}s)", code, left),
        None => println!("{}", code),
    }
}

fn otp_payload(config: &FileConfig, uri: &str) -> ParsedPayload {
    match classify_with(uri, &config.otp) {
        Ok(payload) if payload.otp().is_some() => payload,
        Ok(payload) => fail(&format!("Not an otpauth URI ({} payload)", payload.format())),
        Err(e) => fail(&e.to_string()),
    }
}

fn fail(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

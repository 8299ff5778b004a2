use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use server::{accept_peers_until_paired, Recorder, Session, SessionOutcome};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Address to accept peers on
    #[arg(short, long, default_value = "0.0.0.0:12345")]
    bind: SocketAddr,

    /// How many sessions to serve, one after another
    #[arg(short, long, default_value_t = 1)]
    num_sessions: usize,

    /// Treat a peer that sends nothing for this many seconds as disconnected.
    /// Without this, the server waits forever.
    #[arg(long)]
    read_timeout_secs: Option<u64>,

    /// Record each session's messages as JSON files into this directory
    #[arg(short, long)]
    record_sessions_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let mut recorder = if let Some(dir_path) = args.record_sessions_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };
    let read_timeout = args.read_timeout_secs.map(Duration::from_secs);

    let listener = TcpListener::bind(args.bind)?;
    info!(addr = %listener.local_addr()?, "Waiting for players");

    for session_idx in 0..args.num_sessions {
        let [black, white] = accept_peers_until_paired(&listener, read_timeout, &mut recorder);
        let mut session = Session::new(black, white);
        let (scores, how) = match session.run(&mut recorder)? {
            SessionOutcome::Finished { scores } => (scores, String::from("no rematch")),
            SessionOutcome::Disconnected { player, scores } => {
                (scores, format!("{} disconnected", player))
            }
        };
        info!(session_idx, %how, "Session over");
        eprintln!(
            "End result ({}):\n- {} wins by Black\n- {} wins by White",
            how, scores.black, scores.white
        );
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().event_format(format))
        .with(filter)
        .init();
}

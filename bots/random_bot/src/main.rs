use std::io::BufReader;
use std::net::TcpStream;

use clap::Parser;
use gomoku::{Board, Cell, Player, Scores};
use gomoku_bot_utils::Bot;
use rand::{rngs::StdRng, seq::IteratorRandom, SeedableRng};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Address of the server
    #[arg(default_value = "127.0.0.1:12345")]
    server: String,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// How many rematches to agree to before declining
    #[arg(short, long, default_value_t = 0)]
    rematches: usize,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    let stream = TcpStream::connect(&args.server)?;
    let mut bot = RandomBot {
        rng,
        rematches_left: args.rematches,
    };
    match bot.run(BufReader::new(stream.try_clone()?), stream)? {
        Some(scores) => info!(black = scores.black, white = scores.white, "Session over"),
        None => info!("Server closed the connection"),
    }
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

struct RandomBot {
    rng: StdRng,
    rematches_left: usize,
}

impl RandomBot {
    fn random_cell(&mut self, board: &Board, cell: Cell) -> (i32, i32) {
        // The board is never full: stones stop being added after the placing phase.
        board
            .coordinates_of(cell)
            .choose(&mut self.rng)
            .unwrap_or((0, 0))
    }
}

impl Bot for RandomBot {
    fn new_match(&mut self, player: Player) {
        info!(%player, "New match");
    }

    fn place(&mut self, board: &Board, _player: Player) -> (i32, i32) {
        self.random_cell(board, Cell::Empty)
    }

    fn relocate(&mut self, board: &Board, player: Player) -> ((i32, i32), (i32, i32)) {
        let from = self.random_cell(board, Cell::from(player));
        let to = self.random_cell(board, Cell::Empty);
        (from, to)
    }

    fn vote(&mut self, scores: Scores, winner: Player) -> bool {
        info!(%winner, black = scores.black, white = scores.white, "Match over");
        if self.rematches_left == 0 {
            return false;
        }
        self.rematches_left -= 1;
        true
    }
}

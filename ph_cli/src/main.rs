//! An interactive five-card poker hand classifier.
//!
//! Hands are entered in card notation, classified, and compared against
//! the previously entered hand. Random hands can be dealt from a seeded
//! deck.

use anyhow::Error;
use log::info;
use pico_args::Arguments;
use rand::{rngs::StdRng, SeedableRng};
use std::io::{self, Write};

mod app;
use app::App;

const HELP: &str = "\
Classify and compare five-card poker hands

USAGE:
  ph_cli [OPTIONS]

OPTIONS:
  --seed    SEED        Seed for shuffling the deck       [default: random]
  --deal    HANDS       Deal HANDS hands, show the winner(s), and exit

FLAGS:
  --json                Print hands as JSON
  -h, --help            Print help information
";

struct Args {
    seed: Option<u64>,
    deal: Option<usize>,
    json: bool,
}

fn main() -> Result<(), Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let args = Args {
        seed: pargs.opt_value_from_str("--seed")?,
        deal: pargs.opt_value_from_str("--deal")?,
        json: pargs.contains("--json"),
    };

    env_logger::builder().format_target(false).init();
    let rng = match args.seed {
        Some(seed) => {
            info!("seeding deck with {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let mut app = App::new(rng, args.json);
    let mut stdout = io::stdout();
    match args.deal {
        Some(num_hands) => {
            let content = app.showdown(num_hands)?;
            writeln!(stdout, "{content}")?;
        }
        None => app.run(io::stdin().lock(), &mut stdout)?,
    }

    Ok(())
}

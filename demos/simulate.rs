//! Plays a session of bot-driven hands and prints what happened.
//!
//! ```text
//! cargo run --example simulate -- --variant omaha-hi-lo --hands 200 --seed 7
//! ```

use anyhow::{Error, bail};
use log::info;
use pico_args::Arguments;
use poker_settle::{
    bot::{BotDecisionMaker, Personality, Policy},
    game::variant::VariantDescriptor,
    table::{Session, Table, TableSettings},
};

const HELP: &str = "\
Simulate poker hands between bots

USAGE:
  simulate [OPTIONS]

OPTIONS:
  --variant       NAME    holdem, omaha-hi-lo, stud or stud-hi-lo  [default: holdem]
  --variant-file  PATH    Load the variant from a JSON descriptor instead
  --players       N       Number of bots at the table              [default: 6]
  --hands         N       Hands to play                            [default: 100]
  --seed          N       Seed for shuffling and bot decisions     [default: 0]
  --stack         N       Starting stack for every bot             [default: 1000]

FLAGS:
  --histories             Print every hand history
  --burn                  Burn a card before each board deal
  -h, --help              Print help information

Set RUST_LOG=debug for a narrated run.
";

struct Args {
    variant: VariantDescriptor,
    players: usize,
    hands: usize,
    seed: u64,
    stack: u32,
    histories: bool,
    burn: bool,
}

fn variant_by_name(name: &str) -> Result<VariantDescriptor, Error> {
    let variant = match name {
        "holdem" => VariantDescriptor::texas_holdem(),
        "omaha-hi-lo" => VariantDescriptor::omaha_hi_lo(),
        "stud" => VariantDescriptor::seven_card_stud(),
        "stud-hi-lo" => VariantDescriptor::seven_card_stud_hi_lo(),
        other => bail!("unknown variant {other:?}"),
    };
    Ok(variant)
}

fn parse_args() -> Result<Args, Error> {
    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let variant = match pargs.opt_value_from_str::<_, String>("--variant-file")? {
        Some(path) => VariantDescriptor::from_json(&std::fs::read_to_string(path)?)?,
        None => {
            let name: Option<String> = pargs.opt_value_from_str("--variant")?;
            variant_by_name(name.as_deref().unwrap_or("holdem"))?
        }
    };

    Ok(Args {
        variant,
        players: pargs.opt_value_from_str("--players")?.unwrap_or(6),
        hands: pargs.opt_value_from_str("--hands")?.unwrap_or(100),
        seed: pargs.opt_value_from_str("--seed")?.unwrap_or(0),
        stack: pargs.opt_value_from_str("--stack")?.unwrap_or(1000),
        histories: pargs.contains("--histories"),
        burn: pargs.contains("--burn"),
    })
}

fn main() -> Result<(), Error> {
    let args = parse_args()?;
    env_logger::builder().format_target(false).init();

    let mut settings = TableSettings::with_variant(args.variant);
    settings.starting_stack = args.stack;
    settings.burn_cards = args.burn;
    settings.max_players = args.players;
    let mut table = Table::new(settings)?;

    let mut policies = Vec::with_capacity(args.players);
    for seat in 0..args.players {
        let personality = Personality::ALL[seat % Personality::ALL.len()];
        table.seat_player(&format!("{personality}-{seat}"), None)?;
        let seed = args.seed.wrapping_add(seat as u64 + 1);
        policies.push(Policy::from(BotDecisionMaker::seeded(personality, seed)));
    }

    info!(
        "Playing up to {} hands of {} with {} bots",
        args.hands,
        table.settings().variant,
        args.players
    );
    let mut session = Session::new(table, policies, args.seed)?;
    for _ in 0..args.hands {
        if session.table().funded_seats() < 2 {
            break;
        }
        let outcome = session.play_one()?;
        if args.histories {
            println!("{}", outcome.history);
        }
    }

    let stats = session.stats();
    println!("=== {} ===", session.table().settings().name);
    print!("{stats}");

    if !stats.notable.is_empty() {
        println!("\nNotable hands:");
        for hand in &stats.notable {
            println!("  #{:<5} ${:<6} {}", hand.number, hand.pot, hand.reason);
        }
    }

    println!("\nFinal stacks:");
    for seat in session.table().seats() {
        println!("  {:<24} ${}", seat.name, seat.stack);
    }

    Ok(())
}

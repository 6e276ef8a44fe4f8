//! Santorini console front end.
//!
//! Reads commands from stdin and writes responses to stdout. Without
//! `--host` or `--join` both seats are played locally (by humans or by the
//! random strategy); with either flag the local seat plays against one
//! peer over TCP.
//!
//! Usage:
//!   santorini [OPTIONS]
//!
//! Options:
//!   --host               Listen for one guest and play as player 1
//!   --join ADDR          Connect to a host (ADDR or ADDR:PORT) as player 2
//!   --port N             Port to listen on or dial (default: 7777)
//!   --bind IP            Address the host binds to (default: 0.0.0.0)
//!   --name NAME          Username announced to the peer (default: Player)
//!   --ai one|two         Let the random strategy play that seat
//!   --seed N             Random seed, 0 for entropy (default: 0)
//!   --idle-timeout SECS  Drop the peer after this long without a message

use std::env;
use std::io::{self, BufRead};
use std::process;
use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use santorini::agent::Controller;
use santorini::board::PlayerId;
use santorini::console::Console;
use santorini::protocol::parse_command;
use santorini::session::{Session, SessionConfig};

enum Mode {
    Local,
    Host,
    Join(String),
}

struct Options {
    mode: Mode,
    config: SessionConfig,
    ai: Vec<PlayerId>,
    seed: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("santorini=info")),
        )
        .with_writer(io::stderr)
        .init();

    let options = parse_args(env::args().skip(1).collect());
    let mut console = match connect(&options) {
        Ok(console) => console,
        Err(e) => {
            error!(error = %e, "could not open session");
            process::exit(1);
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match console.handle(cmd, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                error!(error = %e, "stdout closed");
                break;
            }
        }
    }
    info!("exiting");
}

fn connect(options: &Options) -> Result<Console, santorini::session::SessionError> {
    let strategy = |id: PlayerId| {
        if options.ai.contains(&id) {
            Controller::random(seat_seed(options.seed, id))
        } else {
            Controller::Human
        }
    };

    let console = match &options.mode {
        Mode::Local => Console::local([strategy(PlayerId::One), strategy(PlayerId::Two)]),
        Mode::Host => {
            let session = Session::host(&options.config)?;
            let seat = session.seat();
            Console::networked(session, strategy(seat))
        }
        Mode::Join(addr) => {
            let target = if addr.contains(':') {
                addr.clone()
            } else {
                format!("{}:{}", addr, options.config.port)
            };
            let session = Session::join(target.as_str(), &options.config)?;
            let seat = session.seat();
            Console::networked(session, strategy(seat))
        }
    };
    Ok(console)
}

/// Distinct streams per seat so two local AIs do not mirror each other.
fn seat_seed(seed: u64, id: PlayerId) -> u64 {
    if seed == 0 {
        0
    } else {
        seed.wrapping_add(id.index() as u64)
    }
}

fn parse_args(args: Vec<String>) -> Options {
    let mut options = Options {
        mode: Mode::Local,
        config: SessionConfig::default(),
        ai: Vec::new(),
        seed: 0,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => options.mode = Mode::Host,
            "--join" => {
                i += 1;
                options.mode = Mode::Join(value(&args, i, "--join").to_string());
            }
            "--port" => {
                i += 1;
                options.config.port = parse_value(&args, i, "--port");
            }
            "--bind" => {
                i += 1;
                options.config.bind = parse_value(&args, i, "--bind");
            }
            "--name" => {
                i += 1;
                options.config.username = value(&args, i, "--name").to_string();
            }
            "--ai" => {
                i += 1;
                let seat = match value(&args, i, "--ai") {
                    "one" | "1" => PlayerId::One,
                    "two" | "2" => PlayerId::Two,
                    other => usage_error(&format!("invalid --ai value: {}", other)),
                };
                options.ai.push(seat);
            }
            "--seed" => {
                i += 1;
                options.seed = parse_value(&args, i, "--seed");
            }
            "--idle-timeout" => {
                i += 1;
                let secs: u64 = parse_value(&args, i, "--idle-timeout");
                options.config.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => usage_error(&format!("Unknown argument: {}", other)),
        }
        i += 1;
    }
    options
}

fn value<'a>(args: &'a [String], i: usize, flag: &str) -> &'a str {
    match args.get(i) {
        Some(v) => v,
        None => usage_error(&format!("missing value for {}", flag)),
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T {
    match value(args, i, flag).parse() {
        Ok(v) => v,
        Err(_) => usage_error(&format!("invalid {} value", flag)),
    }
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{}", msg);
    print_usage();
    process::exit(1);
}

fn print_usage() {
    eprintln!("Usage: santorini [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --host               Listen for one guest and play as player 1");
    eprintln!("  --join ADDR          Connect to a host (ADDR or ADDR:PORT) as player 2");
    eprintln!("  --port N             Port to listen on or dial (default: 7777)");
    eprintln!("  --bind IP            Address the host binds to (default: 0.0.0.0)");
    eprintln!("  --name NAME          Username announced to the peer (default: Player)");
    eprintln!("  --ai one|two         Let the random strategy play that seat");
    eprintln!("  --seed N             Random seed, 0 for entropy (default: 0)");
    eprintln!("  --idle-timeout SECS  Drop the peer after this long without a message");
}

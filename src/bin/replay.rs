// Standalone replay tool for checking Oware move logs
//
// Usage:
//   cargo run --bin replay -- <log_file> [options]
//
// Options:
//   --all                  Replay all moves
//   --plies <p1,p2>        Replay specific plies (comma-separated)
//   --depth <n>            Search AI moves at this depth instead of the logged one
//   --validate             Check expected houses at given plies
//   --verbose              Show detailed output for each move
//   --config <path>        Path to Oware.toml (default: Oware.toml)

use std::env;
use std::process;

use oware_solver::config::Config;
use oware_solver::replay::ReplayEngine;

fn print_usage() {
    eprintln!("Oware Replay Tool");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  replay <log_file> [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --all                   Replay all moves in the log");
    eprintln!("  --plies <P1,P2,...>     Replay specific plies (comma-separated)");
    eprintln!("  --depth <N>             Search AI moves at depth N");
    eprintln!("  --validate <P:H,...>    Validate expected houses (format: ply:house,...)");
    eprintln!("  --verbose               Show detailed output for each move");
    eprintln!("  --config <path>         Path to Oware.toml (default: Oware.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Replay all moves");
    eprintln!("  replay oware_debug.jsonl --all");
    eprintln!();
    eprintln!("  # Replay specific plies at depth 4");
    eprintln!("  replay oware_debug.jsonl --plies 5,10 --depth 4");
    eprintln!();
    eprintln!("  # Validate expected moves (several acceptable houses separated by '|')");
    eprintln!("  replay oware_debug.jsonl --validate 1:3,2:4|5");
}

fn parse_plies(s: &str) -> Result<Vec<usize>, String> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<usize>()
                .map_err(|e| format!("Invalid ply number '{}': {}", p, e))
        })
        .collect()
}

fn parse_expected_moves(s: &str) -> Result<Vec<(usize, Vec<u8>)>, String> {
    s.split(',')
        .map(|pair| {
            let parts: Vec<&str> = pair.trim().split(':').collect();
            if parts.len() != 2 {
                return Err(format!("Invalid format '{}'. Expected 'ply:house'", pair));
            }

            let ply = parts[0]
                .parse::<usize>()
                .map_err(|e| format!("Invalid ply number '{}': {}", parts[0], e))?;

            let houses: Result<Vec<u8>, String> =
                parts[1].split('|').map(ReplayEngine::parse_house).collect();

            Ok((ply, houses?))
        })
        .collect()
}

enum Mode {
    All,
    Plies(Vec<usize>),
    Validate(Vec<(usize, Vec<u8>)>),
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(if args.contains(&"--help".to_string()) {
            0
        } else {
            1
        });
    }

    let log_file = &args[1];
    let mut config_path = "Oware.toml".to_string();
    let mut verbose = false;
    let mut depth = None;
    let mut mode = None;

    let require_value = |i: usize, flag: &str| -> String {
        match args.get(i + 1) {
            Some(value) => value.clone(),
            None => {
                eprintln!("Error: {} requires an argument", flag);
                process::exit(1);
            }
        }
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--all" => mode = Some(Mode::All),
            "--plies" => {
                let value = require_value(i, "--plies");
                match parse_plies(&value) {
                    Ok(plies) => mode = Some(Mode::Plies(plies)),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--validate" => {
                let value = require_value(i, "--validate");
                match parse_expected_moves(&value) {
                    Ok(expected) => mode = Some(Mode::Validate(expected)),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--depth" => {
                let value = require_value(i, "--depth");
                match value.parse::<u8>() {
                    Ok(d) => depth = Some(d),
                    Err(e) => {
                        eprintln!("Error: Invalid depth '{}': {}", value, e);
                        process::exit(1);
                    }
                }
                i += 1;
            }
            "--config" => {
                config_path = require_value(i, "--config");
                i += 1;
            }
            "--verbose" => verbose = true,
            _ => {
                eprintln!("Error: Unknown option '{}'", args[i]);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let mode = match mode {
        Some(mode) => mode,
        None => {
            eprintln!("Error: Must specify --all, --plies, or --validate");
            print_usage();
            process::exit(1);
        }
    };

    let config = Config::from_file(&config_path).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from '{}': {}", config_path, e);
        eprintln!("Using default configuration");
        Config::default_hardcoded()
    });

    println!("Loaded configuration from: {}", config_path);
    println!("Replay log file: {}", log_file);
    println!();

    let mut engine = ReplayEngine::new(config, verbose);
    if let Some(d) = depth {
        engine = engine.with_depth(d);
    }

    let entries = match engine.load_log_file(log_file) {
        Ok(entries) => entries,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match mode {
        Mode::All => {
            let results = engine.replay_all(&entries);
            engine.print_report(&results);
            if results.iter().any(|r| !r.matches()) {
                process::exit(2);
            }
        }
        Mode::Plies(plies) => match engine.replay_plies(&entries, &plies) {
            Ok(results) => {
                engine.print_report(&results);
                if results.iter().any(|r| !r.matches()) {
                    process::exit(2);
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Mode::Validate(expected) => match engine.validate_expected_moves(&entries, &expected) {
            Ok(()) => println!("✓ All {} expected moves validated", expected.len()),
            Err(e) => {
                eprintln!("✗ Validation failed: {}", e);
                process::exit(2);
            }
        },
    }
}

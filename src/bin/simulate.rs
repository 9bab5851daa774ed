//! Battle balance simulator CLI.
//!
//! Run Monte Carlo battles to compare classes against an enemy.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                        # 1000 runs per class vs goblin
//!   cargo run --bin simulate -- -e orc -l 4         # Level 4 characters vs orc
//!   cargo run --bin simulate -- --seed 42 --special # Reproducible, specials when ready

use quest_chronicles::character::CharacterClass;
use quest_chronicles::combat::EnemyKind;
use quest_chronicles::core::{BattleConfig, MAX_SIM_LEVEL};
use quest_chronicles::simulator::{run_simulation, ActionPolicy, SimConfig};
use std::env;
use std::process;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("Run 'simulate --help' for usage.");
            process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              QUEST CHRONICLES BATTLE SIMULATOR                ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs per class: {}", config.num_runs);
    println!("  Enemy:          {}", config.enemy);
    println!("  Level:          {}", config.level);
    println!("  Policy:         {:?}", config.policy);
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();

    let report = match run_simulation(&config) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            process::exit(1);
        }
    };

    println!("{}", report.to_text());

    if args.iter().any(|a| a == "--json") {
        let json = report.to_json();
        let filename = format!(
            "sim_report_{}.json",
            chrono::Utc::now().format("%Y%m%d_%H%M%S")
        );
        match std::fs::write(&filename, json) {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(e) => eprintln!("Failed to write JSON report: {}", e),
        }
    }
}

fn parse_args(args: &[String]) -> Result<SimConfig, String> {
    let mut config = SimConfig::default();

    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match args[i].as_str() {
            "-n" | "--runs" => {
                config.num_runs = parse_value(value, "--runs")?;
                i += 1;
            }
            "-s" | "--seed" => {
                config.seed = Some(parse_value(value, "--seed")?);
                i += 1;
            }
            "-l" | "--level" => {
                let level = parse_value::<u32>(value, "--level")?.max(1);
                if level > MAX_SIM_LEVEL {
                    return Err(format!("--level must be at most {}", MAX_SIM_LEVEL));
                }
                config.level = level;
                i += 1;
            }
            "-e" | "--enemy" => {
                let name = value.ok_or("--enemy needs a value")?;
                config.enemy = name.parse::<EnemyKind>().map_err(|e| e.to_string())?;
                i += 1;
            }
            "-c" | "--class" => {
                let name = value.ok_or("--class needs a value")?;
                let class = name.parse::<CharacterClass>().map_err(|e| e.to_string())?;
                config.classes = vec![class];
                i += 1;
            }
            "--config" => {
                let path = value.ok_or("--config needs a path")?;
                let json = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
                config.battle = BattleConfig::from_json_str(&json).map_err(|e| e.to_string())?;
                i += 1;
            }
            "--special" => {
                config.policy = ActionPolicy::SpecialWhenReady;
            }
            "--policy" => {
                let name = value.ok_or("--policy needs a value")?;
                config.policy =
                    ActionPolicy::parse(name).ok_or(format!("Unknown policy: {}", name))?;
                i += 1;
            }
            "--quick" => {
                config = SimConfig::bracket_test(config.enemy, config.level);
            }
            "--json" => {}
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(config)
}

fn parse_value<T: std::str::FromStr>(value: Option<&String>, flag: &str) -> Result<T, String> {
    value
        .ok_or(format!("{} needs a value", flag))?
        .parse()
        .map_err(|_| format!("Invalid value for {}", flag))
}

fn print_help() {
    println!("Quest Chronicles Battle Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>      Battles per class (default: 1000)");
    println!("    -s, --seed <S>      Random seed for reproducibility");
    println!("    -l, --level <L>     Character level (default: 1)");
    println!("    -e, --enemy <TYPE>  goblin, orc or dragon (default: goblin)");
    println!("    -c, --class <NAME>  Only simulate one class");
    println!("    --policy <P>        attack or special (default: attack)");
    println!("    --special           Same as --policy special");
    println!("    --config <PATH>     Battle config JSON overrides");
    println!("    --quick             100 runs per class");
    println!("    --json              Save JSON report");
    println!("    -h, --help          Show this help");
}

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use weightmix_editor::{run_simulation, EditorConfig, SimulatorConfig, WeightEditor};
use weightmix_engine::{distribute, normalize, Item, StrategyKind};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Command::new("weightmix")
        .version(weightmix_editor::VERSION)
        .about("Percentage weight editor with lock-aware normalization")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to a TOML editor config"),
        )
        .subcommand(
            Command::new("apply")
                .about("Normalize or redistribute items read from a JSON file")
                .arg(
                    Arg::new("input")
                        .long("input")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of items ({name, weight, locked, id?})"),
                )
                .arg(
                    Arg::new("strategy")
                        .long("strategy")
                        .default_value("normalize")
                        .help("normalize, even, bell, exponential or random"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for the random strategy"),
                ),
        )
        .subcommand(
            Command::new("simulate")
                .about("Run a seeded random command sequence and check invariants")
                .arg(
                    Arg::new("operations")
                        .long("ops")
                        .default_value("10000")
                        .value_parser(value_parser!(u64))
                        .help("Number of commands to issue"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("keep-going")
                        .long("keep-going")
                        .action(ArgAction::SetTrue)
                        .help("Continue after the first violation"),
                ),
        )
        .subcommand(Command::new("demo").about("Print the initial editor summary as JSON"));

    let matches = cli.get_matches();

    let config = match matches.get_one::<PathBuf>("config") {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    match matches.subcommand() {
        Some(("apply", args)) => {
            let input = args
                .get_one::<PathBuf>("input")
                .context("missing --input")?;
            let strategy = args
                .get_one::<String>("strategy")
                .map_or("normalize", String::as_str);
            let seed = args.get_one::<u64>("seed").copied().or(config.seed);

            let text = std::fs::read_to_string(input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            let items: Vec<Item> = serde_json::from_str(&text)
                .with_context(|| format!("invalid items in {}", input.display()))?;

            let output = if strategy == "normalize" {
                normalize(&items)
            } else {
                let kind: StrategyKind = strategy.parse()?;
                let mut rng = seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
                distribute(kind, &items, &mut rng)?
            };

            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Some(("simulate", args)) => {
            let operations = args.get_one::<u64>("operations").copied().unwrap_or(10_000);
            let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);

            let report = run_simulation(&SimulatorConfig {
                seed,
                operations,
                stop_on_first_violation: !args.get_flag("keep-going"),
                editor: config,
            });

            println!("{}", report.generate_text());
            std::process::exit(if report.passed() { 0 } else { 1 });
        }
        Some(("demo", _)) => {
            let editor = WeightEditor::new(config);
            let view = serde_json::json!({
                "items": editor.items(),
                "summary": editor.summary(),
            });
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        _ => {}
    }

    Ok(())
}

/// Simulate — interactive shell for generating casts and narratives.
///
/// Usage: simulate --preset <dir> [--seed <n>] [--run <n>]
///
/// Commands:
///   next [n]             generate n narratives (default 1)
///   cast                 list the cast with romance and social ties
///   character <name>     show one character in detail
///   regen                regenerate the cast and its relationships
///   history              list archived narrative conclusions
///   seed <n>             rebuild everything from a new seed
///   help                 list commands
///   quit                 exit

use cast_engine::core::orchestrator::NarrativeOrchestrator;
use cast_engine::schema::character::Character;
use cast_engine::schema::narrative::GeneratedNarrative;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage();
        return;
    }

    let mut preset_dir = None;
    let mut seed: u64 = 42;
    let mut run = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--preset" if i + 1 < args.len() => {
                i += 1;
                preset_dir = Some(args[i].clone());
            }
            "--seed" if i + 1 < args.len() => {
                i += 1;
                seed = args[i].parse().unwrap_or(42);
            }
            "--run" if i + 1 < args.len() => {
                i += 1;
                run = args[i].parse::<usize>().ok();
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let Some(preset_dir) = preset_dir else {
        eprintln!("ERROR: --preset is required");
        print_usage();
        std::process::exit(1);
    };

    let mut orchestrator = match build(&preset_dir, seed) {
        Some(o) => o,
        None => std::process::exit(1),
    };

    println!(
        "Generated {} characters with {} social edges",
        orchestrator.characters().len(),
        orchestrator.context().social_graph.edges().len()
    );
    println!("Seed: {}", seed);

    // Batch mode
    if let Some(n) = run {
        generate(&mut orchestrator, n);
        return;
    }

    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("simulate> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        let cmd = parts[0].to_lowercase();

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => {
                print_help();
            }
            "next" | "n" => {
                let count = parts.get(1).and_then(|s| s.parse().ok()).unwrap_or(1);
                generate(&mut orchestrator, count);
            }
            "cast" => {
                for character in orchestrator.characters() {
                    print_character(character, false);
                }
            }
            "character" | "c" => {
                if parts.len() < 2 {
                    println!("Usage: character <name>");
                    continue;
                }
                match orchestrator.context().character_by_name(parts[1]) {
                    Some(character) => print_character(character, true),
                    None => println!("No character named '{}'", parts[1]),
                }
            }
            "regen" => match orchestrator.regenerate_cast() {
                Ok(()) => println!(
                    "Regenerated {} characters with {} social edges",
                    orchestrator.characters().len(),
                    orchestrator.context().social_graph.edges().len()
                ),
                Err(e) => println!("ERROR: {}", e),
            },
            "history" => {
                for (index, narrative) in orchestrator.history().iter().enumerate() {
                    print_narrative(index, narrative);
                }
                match orchestrator.context().last_conclusion() {
                    Some(conclusion) => println!("Last archived ending: {}", conclusion.describe()),
                    None => println!("No archived narratives yet."),
                }
            }
            "seed" => {
                if parts.len() < 2 {
                    println!("Usage: seed <n>");
                    continue;
                }
                match parts[1].parse::<u64>() {
                    Ok(new_seed) => {
                        if let Some(rebuilt) = build(&preset_dir, new_seed) {
                            orchestrator = rebuilt;
                            println!("Rebuilt from seed {}", new_seed);
                        }
                    }
                    Err(_) => println!("Invalid seed: {}", parts[1]),
                }
            }
            _ => {
                println!("Unknown command: '{}'. Type 'help' for commands.", cmd);
            }
        }
    }
}

fn build(preset_dir: &str, seed: u64) -> Option<NarrativeOrchestrator> {
    match NarrativeOrchestrator::builder()
        .preset_dir(preset_dir)
        .seed(seed)
        .build()
    {
        Ok(orchestrator) => Some(orchestrator),
        Err(e) => {
            eprintln!("ERROR: Failed to build orchestrator: {}", e);
            None
        }
    }
}

fn generate(orchestrator: &mut NarrativeOrchestrator, count: usize) {
    for _ in 0..count {
        if let Err(e) = orchestrator.generate_narrative() {
            println!("ERROR: {}", e);
            return;
        }
        // The current narrative will be archived at this index.
        print_narrative(orchestrator.history().len(), orchestrator.current());
    }
}

fn print_narrative(index: usize, narrative: &GeneratedNarrative) {
    match &narrative.conclusion {
        Some(conclusion) => println!(
            "#{:<3} {:<12} score {:>5.2}  {}",
            index,
            conclusion.mood().tag(),
            conclusion.evaluated_score,
            conclusion.describe()
        ),
        None => println!("#{:<3} (no conclusion)", index),
    }
    for event in &narrative.events {
        println!("       - {}", event.describe());
    }
}

fn print_character(character: &Character, detailed: bool) {
    println!("{}", character.summary());
    if detailed {
        let possessive = character.gender().possessive();
        for tie in &character.social {
            println!("    {} {:?}: {}", possessive, tie.relationship, tie.partner);
        }
    }
}

fn print_usage() {
    println!("Usage: simulate --preset <dir> [--seed <n>] [--run <n>]");
    println!();
    println!("Options:");
    println!("  --preset <dir>  Directory with cast.ron, events.ron, mood_graph.ron");
    println!("  --seed <n>      RNG seed (default 42)");
    println!("  --run <n>       Generate n narratives and exit");
    println!();
    println!("Set RUST_LOG=cast_engine=debug for generation traces.");
}

fn print_help() {
    println!("Commands:");
    println!("  next [n]           Generate n narratives (default 1)");
    println!("  cast               List the cast");
    println!("  character <name>   Show one character with social ties");
    println!("  regen              Regenerate the cast and its relationships");
    println!("  history            List archived narrative conclusions");
    println!("  seed <n>           Rebuild everything from a new seed");
    println!("  help               Show this help");
    println!("  quit               Exit");
}

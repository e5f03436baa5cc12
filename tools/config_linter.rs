/// Config Linter — validates a preset directory before it is used to generate.
///
/// Usage: config_linter <preset_dir>

use cast_engine::core::config::{CastConfig, EventPool, MoodGraphConfig, NarrativeSettings};
use cast_engine::core::mood_graph::MoodGraph;
use cast_engine::schema::character::Gender;
use cast_engine::schema::event::Mood;
use std::path::Path;
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        println!("Usage: config_linter <preset_dir>");
        process::exit(0);
    }

    let preset = Path::new(&args[1]);
    if !preset.is_dir() {
        eprintln!("ERROR: Path '{}' is not a directory", args[1]);
        process::exit(1);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let cast = match CastConfig::load_from_ron(&preset.join("cast.ron")) {
        Ok(cast) => {
            println!("  Loaded: cast.ron");
            Some(cast)
        }
        Err(e) => {
            errors.push(format!("cast.ron: {}", e));
            None
        }
    };
    let events = match EventPool::load_from_ron(&preset.join("events.ron")) {
        Ok(events) => {
            println!("  Loaded: events.ron");
            Some(events)
        }
        Err(e) => {
            errors.push(format!("events.ron: {}", e));
            None
        }
    };
    let mood_graph = match MoodGraphConfig::load_from_ron(&preset.join("mood_graph.ron")) {
        Ok(config) => {
            println!("  Loaded: mood_graph.ron");
            match config.build() {
                Ok(graph) => Some(graph),
                Err(e) => {
                    errors.push(format!("mood_graph.ron: {}", e));
                    None
                }
            }
        }
        Err(e) => {
            errors.push(format!("mood_graph.ron: {}", e));
            None
        }
    };
    let settings_path = preset.join("settings.ron");
    if settings_path.exists() {
        match NarrativeSettings::load_from_ron(&settings_path) {
            Ok(settings) => {
                println!("  Loaded: settings.ron");
                if let Err(e) = settings.validate() {
                    errors.push(format!("settings.ron: {}", e));
                }
            }
            Err(e) => errors.push(format!("settings.ron: {}", e)),
        }
    }

    if let Some(ref cast) = cast {
        lint_cast(cast, &mut errors, &mut warnings);
    }
    if let Some(ref events) = events {
        lint_events(events, mood_graph.as_ref(), &mut errors, &mut warnings);
    }
    if let Some(ref graph) = mood_graph {
        lint_mood_graph(graph, &mut warnings);
    }

    // Print report
    println!("\n=== Config Lint Report ===\n");

    if errors.is_empty() && warnings.is_empty() {
        println!("All checks passed!");
    }

    for warning in &warnings {
        println!("WARNING: {}", warning);
    }

    for error in &errors {
        println!("ERROR: {}", error);
    }

    println!(
        "\nSummary: {} errors, {} warnings",
        errors.len(),
        warnings.len()
    );

    if errors.is_empty() {
        process::exit(0);
    } else {
        process::exit(1);
    }
}

fn lint_cast(cast: &CastConfig, errors: &mut Vec<String>, warnings: &mut Vec<String>) {
    if let Err(e) = cast.validate() {
        errors.push(format!("cast.ron: {}", e));
    }

    let total = cast.total_population_share();
    if (total - 1.0).abs() > 0.01 {
        warnings.push(format!(
            "Population shares sum to {:.4}; draws above the total fall back to a resample",
            total
        ));
    }

    for bucket in &cast.demographics {
        for gender in [Gender::Male, Gender::Female] {
            if bucket.names_for(gender).is_empty() {
                errors.push(format!(
                    "{:?} has no {:?} names",
                    bucket.generation, gender
                ));
            }
        }
    }

    if cast.templates.len() < cast.cast_size {
        warnings.push(format!(
            "Only {} templates for a cast of {}; templates will repeat",
            cast.templates.len(),
            cast.cast_size
        ));
    }

    let r = &cast.romance;
    if r.married + r.divorced + r.widowed > 1.0 {
        warnings.push(
            "Married, divorced and widowed shares exceed 1.0; nobody will be single".to_string(),
        );
    }
}

fn lint_events(
    events: &EventPool,
    mood_graph: Option<&MoodGraph>,
    errors: &mut Vec<String>,
    warnings: &mut Vec<String>,
) {
    if let Err(e) = events.validate() {
        errors.push(format!("events.ron: {}", e));
        return;
    }

    if events.conclusions.len() < 2 {
        warnings.push(
            "Only one conclusion event; every narrative will end the same way".to_string(),
        );
    }

    if let Some(graph) = mood_graph {
        for conclusion in &events.conclusions {
            if !graph.contains(conclusion.mood()) {
                errors.push(format!(
                    "Conclusion '{}' has mood {} which is not in the mood graph",
                    conclusion.describe(),
                    conclusion.mood().tag()
                ));
            }
        }
    }
}

fn lint_mood_graph(graph: &MoodGraph, warnings: &mut Vec<String>) {
    if !graph.is_connected() {
        warnings.push(
            "Mood graph is disconnected; unreachable moods always score as farthest".to_string(),
        );
    }
    for mood in Mood::ALL {
        if !graph.contains(mood) {
            warnings.push(format!("Mood {} is not a vertex", mood.tag()));
        }
    }
}

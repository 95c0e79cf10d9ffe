//! sieve CLI — driving adapter for the sieve specification engine.
//!
//! Rules are structured forms in JSON (`.json`) or YAML (anything else),
//! loaded through the person registry from `sieve-test`.
//!
//! Subcommands:
//! - `eval <rule> [--entity key=value...] [--trace]` — evaluate against one person
//! - `check <rule>` — validate the rule loads without errors
//! - `sql <rule> [--numbered]` — translate to a parameterized SQL clause
//! - `filter <rule> <people> [--native]` — print the matching people as JSON
//! - `info` — print registered attributes and conditions
//!
//! Logging goes to stderr and honours `RUST_LOG` (default `warn`).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use sieve::{
    Collection, InMemoryCollection, Placeholder, RecordStore, Registry, RegistryBuilder,
    Specification, SqlFilter, SqlTranslator, StructuredPredicate, Translator,
};
use sieve_test::{Person, Profession};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sieve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate, validate and translate specification rules", long_about = None)]
struct Cli {
    /// Log filter when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Evaluate a rule against one person
    Eval {
        /// Rule file (JSON or YAML)
        rule: PathBuf,

        /// Person attributes as key=value (name, age, profession)
        #[arg(long, num_args = 1..)]
        entity: Vec<String>,

        /// Print the evaluation trace
        #[arg(long)]
        trace: bool,
    },

    /// Validate a rule
    Check {
        /// Rule file (JSON or YAML)
        rule: PathBuf,
    },

    /// Translate a rule into a SQL WHERE clause
    Sql {
        /// Rule file (JSON or YAML)
        rule: PathBuf,

        /// Use $1, $2, ... placeholders instead of ?
        #[arg(long)]
        numbered: bool,
    },

    /// Filter a list of people by a rule
    Filter {
        /// Rule file (JSON or YAML)
        rule: PathBuf,

        /// People file (JSON or YAML list)
        people: PathBuf,

        /// Filter through the record store instead of the evaluator
        #[arg(long)]
        native: bool,
    },

    /// Print registered attributes and conditions
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let result = match cli.command {
        Command::Eval {
            rule,
            entity,
            trace,
        } => cmd_eval(&rule, &entity, trace),
        Command::Check { rule } => cmd_check(&rule),
        Command::Sql { rule, numbered } => cmd_sql(&rule, numbered),
        Command::Filter {
            rule,
            people,
            native,
        } => cmd_filter(&rule, &people, native),
        Command::Info => cmd_info(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_tracing(default: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

fn cmd_eval(rule: &Path, pairs: &[String], trace: bool) -> Result<(), String> {
    let spec = load_spec(rule)?;
    let person = parse_entity(pairs)?;
    debug!(?person, "evaluating");

    if trace {
        let trace = spec.evaluate_with_trace(&person);
        println!("{}", trace.matched());
        println!("{trace:#?}");
    } else {
        println!("{}", spec.is_satisfied_by(&person));
    }
    Ok(())
}

fn cmd_check(rule: &Path) -> Result<(), String> {
    let form = load_rule(rule)?;
    build_registry()
        .load(&form)
        .map_err(|e| format!("rule invalid: {e}"))?;

    println!("Rule valid");
    println!("  {form}");
    Ok(())
}

fn cmd_sql(rule: &Path, numbered: bool) -> Result<(), String> {
    let sql = translate_rule(rule, numbered)?;
    println!("{}", sql.clause);
    for (i, param) in sql.params.iter().enumerate() {
        println!("  {}: {param}", i + 1);
    }
    Ok(())
}

fn translate_rule(rule: &Path, numbered: bool) -> Result<SqlFilter, String> {
    let form = load_rule(rule)?;
    // Validate names and literals before translating.
    build_registry()
        .load(&form)
        .map_err(|e| format!("rule invalid: {e}"))?;

    let placeholder = if numbered {
        Placeholder::Numbered
    } else {
        Placeholder::Question
    };
    SqlTranslator::new()
        .placeholder(placeholder)
        .translate(&form)
        .map_err(|e| e.to_string())
}

fn cmd_filter(rule: &Path, people: &Path, native: bool) -> Result<(), String> {
    let found = filter_people(rule, people, native)?;
    let json = serde_json::to_string_pretty(&found).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn filter_people(rule: &Path, people: &Path, native: bool) -> Result<Vec<Person>, String> {
    let spec = load_spec(rule)?;
    let people = load_people(people)?;

    let found: Vec<Person> = if native {
        let store: RecordStore<Person> = people.into_iter().collect();
        let matched = store.find(&spec).map_err(|e| e.to_string())?;
        matched.into_iter().cloned().collect()
    } else {
        let collection: InMemoryCollection<Person> = people.into_iter().collect();
        let matched = collection.find(&spec).map_err(|e| e.to_string())?;
        matched.into_iter().cloned().collect()
    };
    debug!(matched = found.len(), native, "filtered people");
    Ok(found)
}

#[allow(clippy::unnecessary_wraps)] // Uniform return type for all commands
fn cmd_info() -> Result<(), String> {
    print!("{}", info_report(&build_registry()));
    Ok(())
}

fn info_report(registry: &Registry<Person>) -> String {
    let mut out = String::from("Registered attributes:\n");
    for name in registry.attribute_names() {
        out.push_str(&format!("  {name}\n"));
    }
    out.push_str("\nRegistered conditions:\n");
    for name in registry.condition_names() {
        out.push_str(&format!("  {name}\n"));
    }
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry assembly (composition root)
// ═══════════════════════════════════════════════════════════════════════════════

fn build_registry() -> Registry<Person> {
    sieve_test::register(RegistryBuilder::new()).build()
}

fn load_spec(path: &Path) -> Result<Specification<Person>, String> {
    let form = load_rule(path)?;
    build_registry()
        .load(&form)
        .map_err(|e| format!("rule load failed: {e}"))
}

// ═══════════════════════════════════════════════════════════════════════════════
// File loading
// ═══════════════════════════════════════════════════════════════════════════════

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read(path: &Path) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{}\": {e}", path.display()))
}

fn load_rule(path: &Path) -> Result<StructuredPredicate, String> {
    let content = read(path)?;
    if is_json(path) {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        // Default to YAML (handles .yaml and .yml)
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

fn load_people(path: &Path) -> Result<Vec<Person>, String> {
    let content = read(path)?;
    if is_json(path) {
        serde_json::from_str(&content).map_err(|e| format!("JSON parse error: {e}"))
    } else {
        serde_yaml::from_str(&content).map_err(|e| format!("YAML parse error: {e}"))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

fn parse_entity(pairs: &[String]) -> Result<Person, String> {
    let mut person = Person::new("");
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| format!("invalid entity pair \"{pair}\", expected key=value"))?;
        match key {
            "name" => person.name = value.to_owned(),
            "age" => {
                let age = value
                    .parse()
                    .map_err(|e| format!("invalid age \"{value}\": {e}"))?;
                person.age = Some(age);
            }
            "profession" => {
                let profession: Profession = value.parse().map_err(|e| format!("{e}"))?;
                person.profession = Some(profession);
            }
            other => {
                return Err(format!(
                    "unknown entity key \"{other}\" (expected name, age or profession)"
                ))
            }
        }
    }
    Ok(person)
}

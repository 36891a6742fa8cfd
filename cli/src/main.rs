//! assay CLI: driving adapter for matcher fixtures.
//!
//! Subcommands:
//! - `run <fixture>... [--json]`: run fixture files, exit 1 on any failure
//! - `check <fixture>...`: validate fixtures build without running them
//! - `describe <matcher>`: print what a matcher config asserts
//!
//! Logging goes to stderr, filtered by `ASSAY_LOG` (default `warn`).

use std::path::Path;
use std::process;

use assay::{Matcher, MatcherConfig};
use assay_model::fixture::{CaseResult, Fixture};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "ASSAY_LOG";

fn main() {
    init_logging();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "run" => cmd_run(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "describe" => cmd_describe(&args[2..]),
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(true)
        }
        other => {
            eprintln!("error: unknown command \"{other}\"");
            print_usage();
            process::exit(1);
        }
    };

    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

// ═══════════════════════════════════════════════════════════════════════════════
// Commands
// ═══════════════════════════════════════════════════════════════════════════════

/// Returns `Ok(false)` when any case failed.
fn cmd_run(args: &[String]) -> Result<bool, String> {
    let options = parse_run_args(args)?;
    let mut results = Vec::new();

    for path in &options.paths {
        for fixture in load_fixtures(path)? {
            info!(fixture = %fixture.name, cases = fixture.cases.len(), "running fixture");
            results.extend(fixture.run());
        }
    }

    if options.json {
        let json = serde_json::to_string_pretty(&results)
            .map_err(|e| format!("failed to encode results: {e}"))?;
        println!("{json}");
    } else {
        print_report(&results);
    }

    Ok(results.iter().all(|r| r.passed))
}

fn cmd_check(args: &[String]) -> Result<bool, String> {
    if args.is_empty() {
        return Err("check requires at least one fixture file".into());
    }

    let mut cases = 0;
    for path in args {
        for fixture in load_fixtures(path)? {
            fixture
                .check()
                .map_err(|e| format!("{path}: fixture \"{}\" invalid: {e}", fixture.name))?;
            cases += fixture.cases.len();
        }
    }

    println!("Fixtures valid ({cases} cases)");
    Ok(true)
}

fn cmd_describe(args: &[String]) -> Result<bool, String> {
    let [path] = args else {
        return Err("describe requires exactly one matcher config file".into());
    };

    let content = read(path)?;
    let config = MatcherConfig::from_yaml(&content).map_err(|e| format!("{path}: {e}"))?;
    let matcher = config
        .build()
        .map_err(|e| format!("{path}: matcher invalid: {e}"))?;

    println!("{}", matcher.description());
    Ok(true)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reporting
// ═══════════════════════════════════════════════════════════════════════════════

fn print_report(results: &[CaseResult]) {
    let mut failed = 0;
    for result in results {
        if result.passed {
            println!("PASS  {} :: {}", result.fixture, result.case_name);
            continue;
        }
        failed += 1;
        println!("FAIL  {} :: {}", result.fixture, result.case_name);
        println!("      expected {:?}, got {:?}", result.expected, result.actual);
        if result.message_matched == Some(false) {
            println!("      message differs from the golden message");
        }
        for line in result.message.lines() {
            println!("      | {line}");
        }
    }
    println!("\n{} passed, {failed} failed", results.len() - failed);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Fixture loading
// ═══════════════════════════════════════════════════════════════════════════════

fn read(path: &str) -> Result<String, String> {
    std::fs::read_to_string(path).map_err(|e| format!("failed to read \"{path}\": {e}"))
}

fn load_fixtures(path: &str) -> Result<Vec<Fixture>, String> {
    let is_yaml = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));
    if !is_yaml {
        return Err(format!("\"{path}\" is not a YAML fixture file"));
    }

    let content = read(path)?;
    let fixtures =
        Fixture::from_yaml_multi(&content).map_err(|e| format!("{path}: YAML parse error: {e}"))?;
    debug!(path, fixtures = fixtures.len(), "loaded fixture file");
    Ok(fixtures)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Argument parsing
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, PartialEq)]
struct RunOptions {
    paths: Vec<String>,
    json: bool,
}

fn parse_run_args(args: &[String]) -> Result<RunOptions, String> {
    let mut options = RunOptions::default();

    for arg in args {
        match arg.as_str() {
            "--json" => options.json = true,
            flag if flag.starts_with("--") => {
                return Err(format!("unexpected argument \"{flag}\""));
            }
            path => options.paths.push(path.to_owned()),
        }
    }

    if options.paths.is_empty() {
        return Err("run requires at least one fixture file".into());
    }
    Ok(options)
}

fn print_usage() {
    eprintln!(
        "Usage: assay <command> [options]

Commands:
  run <fixture>... [--json]   Run fixture files
  check <fixture>...          Validate fixture files
  describe <matcher>          Describe a matcher config
  help                        Show this help

Environment:
  ASSAY_LOG                   Log filter (default: warn)"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn parse_run_args_paths_and_json() {
        let options = parse_run_args(&strings(&["a.yaml", "--json", "b.yaml"])).unwrap();
        assert_eq!(
            options,
            RunOptions {
                paths: strings(&["a.yaml", "b.yaml"]),
                json: true,
            }
        );
    }

    #[test]
    fn parse_run_args_requires_a_path() {
        assert!(parse_run_args(&strings(&["--json"])).is_err());
        assert!(parse_run_args(&[]).is_err());
    }

    #[test]
    fn parse_run_args_rejects_unknown_flags() {
        let err = parse_run_args(&strings(&["a.yaml", "--verbose"])).unwrap_err();
        assert!(err.contains("--verbose"));
    }

    #[test]
    fn load_fixtures_rejects_other_extensions() {
        let err = load_fixtures("fixture.json").unwrap_err();
        assert!(err.contains("not a YAML fixture file"));
    }

    #[test]
    fn load_workspace_fixtures() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/01_length/minimum.yaml");
        let fixtures = load_fixtures(path).unwrap();
        assert!(!fixtures.is_empty());
        assert!(fixtures.iter().all(|f| f.check().is_ok()));
    }

    #[test]
    fn results_encode_as_json() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures/01_length/minimum.yaml");
        let results: Vec<CaseResult> = load_fixtures(path)
            .unwrap()
            .iter()
            .flat_map(Fixture::run)
            .collect();
        let json = serde_json::to_value(&results).unwrap();
        assert_eq!(json[0]["case_name"], "accepts the correct minimum");
        assert_eq!(json[0]["passed"], true);
        assert_eq!(json[0]["trace"]["verdict"]["verdict"], "proved");
    }
}

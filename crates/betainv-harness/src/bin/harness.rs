//! CLI entrypoint for the betainv conformance harness.

use std::path::{Path, PathBuf};
use std::time::Instant;

use betainv_harness::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};
use betainv_harness::{FixtureFunction, HarnessError, VerificationReport, verify_fixture_file};
use clap::{Parser, Subcommand};

/// Conformance tooling for the incomplete beta evaluators.
#[derive(Debug, Parser)]
#[command(name = "betainv-harness")]
#[command(about = "Evaluate and verify the incomplete beta inverses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate one function and print the result as JSON.
    Eval {
        /// `ibeta_inv`, `ibetac_inv`, `ibeta` or `ibetac`.
        function: String,
        #[arg(allow_negative_numbers = true)]
        a: f64,
        #[arg(allow_negative_numbers = true)]
        b: f64,
        /// Probability (`p` or `q`) for the inverses, `x` for the forward functions.
        #[arg(allow_negative_numbers = true)]
        arg: f64,
    },
    /// Verify the evaluators against fixture files.
    Verify {
        /// Fixture JSON file, or a directory of them.
        #[arg(long)]
        fixture: PathBuf,
        /// Output report path (JSON). If omitted, prints to stdout.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Eval {
            function,
            a,
            b,
            arg,
        } => {
            let function = FixtureFunction::parse(&function)?;
            let out = eval_json(function, a, b, arg);
            println!("{}", serde_json::to_string_pretty(&out)?);
            if out.get("error").is_some() {
                std::process::exit(1);
            }
        }
        Command::Verify {
            fixture,
            report,
            log,
        } => {
            let paths = fixture_paths(&fixture)?;
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "betainv-verify")?),
                None => None,
            };

            let mut reports = Vec::new();
            for path in &paths {
                let started = Instant::now();
                let verified = verify_fixture_file(path)?;
                let elapsed_ms = started.elapsed().as_millis() as u64;
                if let Some(emitter) = emitter.as_mut() {
                    log_report(emitter, &verified, elapsed_ms)?;
                }
                eprintln!(
                    "{}: {}/{} passed ({})",
                    path.display(),
                    verified.passed,
                    verified.total,
                    verified.family
                );
                for failure in verified.failures() {
                    eprintln!(
                        "  FAIL {} [{}]: expected {}, got {}",
                        failure.name, failure.function, failure.expected, failure.actual
                    );
                }
                reports.push(verified);
            }
            if let Some(emitter) = emitter.as_mut() {
                emitter.flush()?;
            }

            let json = serde_json::to_string_pretty(&reports)?;
            match report {
                Some(path) => std::fs::write(&path, json + "\n")?,
                None => println!("{json}"),
            }
            if !reports.iter().all(VerificationReport::all_passed) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn eval_json(function: FixtureFunction, a: f64, b: f64, arg: f64) -> serde_json::Value {
    let mut out = serde_json::json!({
        "function": function.as_str(),
        "a": a,
        "b": b,
        "arg": arg,
    });
    let result = match function {
        FixtureFunction::IbetaInv => betainv_core::ibeta_inv(a, b, arg)
            .map(|inv| serde_json::json!({"value": inv.value, "complement": inv.complement})),
        FixtureFunction::IbetacInv => betainv_core::ibetac_inv(a, b, arg)
            .map(|inv| serde_json::json!({"value": inv.value, "complement": inv.complement})),
        FixtureFunction::Ibeta | FixtureFunction::Ibetac => function
            .evaluate(a, b, arg)
            .map(|value| serde_json::json!({"value": value})),
    };
    match result {
        Ok(serde_json::Value::Object(fields)) => {
            for (key, value) in fields {
                out[key] = value;
            }
        }
        Ok(_) => {}
        Err(err) => {
            out["error"] = serde_json::json!({"kind": err.kind().as_str(), "message": err.to_string()});
        }
    }
    out
}

fn fixture_paths(fixture: &Path) -> Result<Vec<PathBuf>, HarnessError> {
    if !fixture.is_dir() {
        return Ok(vec![fixture.to_path_buf()]);
    }
    let mut paths: Vec<PathBuf> = std::fs::read_dir(fixture)
        .map_err(|err| HarnessError::Io {
            path: fixture.to_path_buf(),
            source: err,
        })?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();
    if paths.is_empty() {
        return Err(HarnessError::Usage(format!(
            "no fixture JSON files found in {}",
            fixture.display()
        )));
    }
    Ok(paths)
}

fn log_report(
    emitter: &mut LogEmitter,
    report: &VerificationReport,
    elapsed_ms: u64,
) -> std::io::Result<()> {
    for case in &report.cases {
        let (level, outcome) = if case.passed {
            (LogLevel::Info, Outcome::Pass)
        } else {
            (LogLevel::Error, Outcome::Fail)
        };
        emitter.emit_entry(
            LogEntry::new("", level, "case_result")
                .with_family(&report.family)
                .with_symbol(&case.function)
                .with_outcome(outcome)
                .with_details(serde_json::json!({
                    "case": case.name,
                    "expected": case.expected,
                    "actual": case.actual,
                    "error": case.error,
                })),
        )?;
    }
    let (level, outcome) = if report.all_passed() {
        (LogLevel::Info, Outcome::Pass)
    } else {
        (LogLevel::Warn, Outcome::Fail)
    };
    emitter.emit_entry(
        LogEntry::new("", level, "fixture_set_verified")
            .with_family(&report.family)
            .with_outcome(outcome)
            .with_duration_ms(elapsed_ms)
            .with_details(serde_json::json!({
                "version": report.version,
                "source_sha256": report.source_sha256,
                "total": report.total,
                "passed": report.passed,
                "failed": report.failed,
            })),
    )
}

//! CabScan CLI - cabinet/CAD design file parsing and checking from the
//! command line.

use clap::{Parser, Subcommand, ValueEnum};
use cabscan::{
    discover_design_files, Dialect, FindingSeverity, ParseResult,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "cabscan")]
#[command(about = "Cabinet/CAD design file parsing and checking tool", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and check a single design file
    Check {
        /// Path to a .cab, .moz, .cabx, .dat, .des, .mzb or .xml file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if findings exist at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },

    /// Parse and check all design files in a directory
    Scan {
        /// Path to project directory
        #[arg(value_name = "DIR", default_value = ".")]
        dir: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,

        /// Exit with error code if findings exist at this severity or higher
        #[arg(long, value_enum)]
        fail_on: Option<FailOnSeverity>,
    },

    /// List supported dialects and their file extensions
    Formats,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for CI/CD
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum FailOnSeverity {
    Critical,
    High,
    Medium,
    Low,
}

impl From<FailOnSeverity> for FindingSeverity {
    fn from(value: FailOnSeverity) -> Self {
        match value {
            FailOnSeverity::Critical => FindingSeverity::Critical,
            FailOnSeverity::High => FindingSeverity::High,
            FailOnSeverity::Medium => FindingSeverity::Medium,
            FailOnSeverity::Low => FindingSeverity::Low,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Check {
            file,
            format,
            fail_on,
        } => handle_check(&file, format, fail_on),
        Commands::Scan {
            dir,
            format,
            fail_on,
        } => handle_scan(&dir, format, fail_on),
        Commands::Formats => {
            handle_formats();
            0
        }
    };

    process::exit(exit_code);
}

fn handle_check(file: &PathBuf, format: OutputFormat, fail_on: Option<FailOnSeverity>) -> i32 {
    match cabscan::parse_design_file(file) {
        Ok(result) => {
            output_results(&[result.clone()], &format);
            if should_fail(&[result], fail_on) {
                1
            } else {
                0
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            1
        }
    }
}

fn handle_scan(dir: &PathBuf, format: OutputFormat, fail_on: Option<FailOnSeverity>) -> i32 {
    let files = match discover_design_files(dir) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    let mut results = Vec::new();
    for path in files {
        match cabscan::parse_design_file(&path) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("Error: {}: {e}", path.display());
                return 1;
            }
        }
    }

    output_results(&results, &format);
    if should_fail(&results, fail_on) {
        1
    } else {
        0
    }
}

fn handle_formats() {
    for dialect in [
        Dialect::Markup,
        Dialect::LineA,
        Dialect::LineB,
        Dialect::Model,
    ] {
        let extensions: Vec<String> = dialect
            .extensions()
            .iter()
            .map(|e| format!(".{e}"))
            .collect();
        println!("{:<14} {}", dialect.name(), extensions.join(", "));
    }
}

fn should_fail(results: &[ParseResult], fail_on: Option<FailOnSeverity>) -> bool {
    let Some(threshold) = fail_on else {
        return false;
    };
    let threshold: FindingSeverity = threshold.into();
    results
        .iter()
        .flat_map(|r| r.findings.iter())
        .any(|f| f.severity >= threshold)
}

fn output_results(results: &[ParseResult], format: &OutputFormat) {
    match format {
        OutputFormat::Human => output_human(results),
        OutputFormat::Json => output_json(results),
    }
}

fn output_human(results: &[ParseResult]) {
    for result in results {
        println!("\nFile: {} ({})", result.filename, result.dialect.name());
        println!("{}", "─".repeat(60));
        println!(
            "  {} parts, {} parameters, {} constraints | version {} | complexity {}/100",
            result.statistics.total_parts,
            result.statistics.total_parameters,
            result.statistics.total_constraints,
            result.version.version,
            result.statistics.complexity_score
        );

        for issue in &result.errors {
            println!("  parse error: {}", issue.message);
        }
        for issue in &result.warnings {
            println!("  warning: {}", issue.message);
        }

        if result.findings.is_empty() {
            println!("  No broken logic found");
            continue;
        }
        for severity in [
            FindingSeverity::Critical,
            FindingSeverity::High,
            FindingSeverity::Medium,
            FindingSeverity::Low,
        ] {
            let bucket: Vec<_> = result
                .findings
                .iter()
                .filter(|f| f.severity == severity)
                .collect();
            if bucket.is_empty() {
                continue;
            }
            println!("\n  {severity:?}:");
            for finding in bucket {
                println!("    - {}", finding.description);
                if let Some(ref fix) = finding.suggested_fix {
                    println!("      Fix: {fix}");
                }
            }
        }
    }
}

fn output_json(results: &[ParseResult]) {
    match serde_json::to_string_pretty(results) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error: failed to serialize results: {e}"),
    }
}

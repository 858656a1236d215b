//! Grider - command-line front end for the grid editor.

mod render;

use anyhow::{Context, bail};
use grider_core::{CommandOutcome, Document, load_config};
use grider_engine::engine::format_resolved;
use log::LevelFilter;
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

fn print_usage() {
    eprintln!("Usage: grider [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Document to open (.grider or .csv)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --command <FORMULA>   Evaluate a formula and print the result");
    eprintln!("  -s, --set <REF=TEXT>      Set a cell before anything else (can be repeated)");
    eprintln!("  -x, --exec <CMD>          Run an editor command, e.g. \"w out csv\" (can be repeated)");
    eprintln!("  -p, --print               Print the used area with evaluated values");
    eprintln!("  --config <FILE>           Read configuration from FILE");
    eprintln!("  -v, --verbose             Log debug output to stderr");
    eprintln!("  -h, --help                Print help");
}

#[derive(Default)]
struct Options {
    file_path: Option<PathBuf>,
    config_file: Option<PathBuf>,
    command: Option<String>,
    assignments: Vec<String>,
    exec: Vec<String>,
    print: bool,
    verbose: bool,
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--command" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --command requires a formula");
                    std::process::exit(1);
                }
                options.command = Some(args[i].to_string());
            }
            "-s" | "--set" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --set requires REF=TEXT");
                    std::process::exit(1);
                }
                options.assignments.push(args[i].to_string());
            }
            "-x" | "--exec" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --exec requires a command");
                    std::process::exit(1);
                }
                options.exec.push(args[i].to_string());
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                options.config_file = Some(PathBuf::from(&args[i]));
            }
            "-p" | "--print" => options.print = true,
            "-v" | "--verbose" => options.verbose = true,
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if options.file_path.is_none() {
                    options.file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let _ = TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    match run(options) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Apply the requested edits and commands, then print. Returns the exit code.
fn run(options: Options) -> anyhow::Result<i32> {
    let (config, warnings) = load_config(options.config_file.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
    log::debug!(
        "documents directory {}, {} x {} initial grid",
        config.documents_dir.display(),
        config.initial_rows,
        config.initial_columns
    );

    let mut doc = Document::with_file(options.file_path.clone(), config).with_context(|| {
        match &options.file_path {
            Some(path) => format!("failed to open {}", path.display()),
            None => "failed to create document".to_string(),
        }
    })?;

    for assignment in &options.assignments {
        let Some((name, text)) = assignment.split_once('=') else {
            bail!("--set expects REF=TEXT, got {assignment:?}");
        };
        doc.set_cell_by_name(name, text)?;
    }

    for line in &options.exec {
        match doc
            .execute_command(line)
            .with_context(|| format!("command {line:?} failed"))?
        {
            CommandOutcome::Quit => break,
            CommandOutcome::Saved(path) => eprintln!("Saved {}", path.display()),
            CommandOutcome::Loaded(path) => eprintln!("Opened {}", path.display()),
            CommandOutcome::Continue => {}
        }
    }

    let nothing_requested =
        options.command.is_none() && options.exec.is_empty() && options.assignments.is_empty();
    if options.print || nothing_requested {
        print!("{}", render::render_used_area(&doc));
    }

    if let Some(formula) = &options.command {
        let result = doc.evaluate_formula(formula.trim());
        println!("{}", format_resolved(&result));
        if result.is_err() {
            return Ok(1);
        }
    }
    Ok(0)
}

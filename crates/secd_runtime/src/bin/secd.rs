//! Secd CLI entry point.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use secd_machine::MachineConfig;
use secd_runtime::{load_file, load_stdin, run_words};

/// CLI configuration parsed from arguments.
#[derive(Default)]
struct CliConfig {
    file: Option<PathBuf>,
    show_help: bool,
    show_version: bool,
    trace_vm: bool,
    code_size: Option<usize>,
    stack_size: Option<usize>,
    dump_size: Option<usize>,
    heap_size: Option<usize>,
}

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError: {e}\x1b[0m");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<CliConfig, Box<dyn std::error::Error>> {
    let mut config = CliConfig::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => config.show_help = true,
            "-V" | "--version" => config.show_version = true,
            "--trace-vm" => config.trace_vm = true,
            "--code-size" => {
                i += 1;
                config.code_size = Some(parse_size(&args, i, "--code-size")?);
            }
            "--stack-size" => {
                i += 1;
                config.stack_size = Some(parse_size(&args, i, "--stack-size")?);
            }
            "--dump-size" => {
                i += 1;
                config.dump_size = Some(parse_size(&args, i, "--dump-size")?);
            }
            "--heap-size" => {
                i += 1;
                config.heap_size = Some(parse_size(&args, i, "--heap-size")?);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("unknown option: {arg}").into());
            }
            path => {
                if config.file.is_some() {
                    return Err("expected at most one bytecode file".into());
                }
                config.file = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn parse_size(args: &[String], i: usize, flag: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let Some(value) = args.get(i) else {
        return Err(format!("{flag} requires a value").into());
    };
    value
        .parse()
        .map_err(|_| format!("invalid {flag} value: {value}").into())
}

fn run(args: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(args)?;

    if cli.show_help {
        print_help();
        return Ok(());
    }

    if cli.show_version {
        println!("secd {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let mut config = MachineConfig::new().with_trace(cli.trace_vm);
    if let Some(n) = cli.code_size {
        config = config.with_code_capacity(n);
    }
    if let Some(n) = cli.stack_size {
        config = config.with_stack_capacity(n);
    }
    if let Some(n) = cli.dump_size {
        config = config.with_dump_capacity(n);
    }
    if let Some(n) = cli.heap_size {
        config = config.with_heap_capacity(n);
    }

    let words = match &cli.file {
        Some(path) => load_file(path)?,
        None => load_stdin()?,
    };

    let result = run_words(words, &config)?;
    let Some(n) = result.as_int() else {
        return Err("program result is a closure, not an integer".into());
    };
    println!("{n}");

    Ok(())
}

fn print_help() {
    println!("secd - SECD-style bytecode machine");
    println!();
    println!("Usage: secd [OPTIONS] [FILE]");
    println!();
    println!("Runs the bytecode program in FILE, or from standard input when no");
    println!("file is given, and prints the resulting integer.");
    println!();
    println!("Options:");
    println!("  -h, --help         Show this help message");
    println!("  -V, --version      Show version information");
    println!("      --trace-vm     Trace each instruction to stderr");
    println!("      --code-size N  Maximum code words (default {})", MachineConfig::DEFAULT_CODE_CAPACITY);
    println!("      --stack-size N Maximum stack depth (default {})", MachineConfig::DEFAULT_STACK_CAPACITY);
    println!("      --dump-size N  Maximum dump depth (default {})", MachineConfig::DEFAULT_DUMP_CAPACITY);
    println!("      --heap-size N  Heap cell budget (default {})", MachineConfig::DEFAULT_HEAP_CAPACITY);
    println!();
    println!("Bytecode is a stream of whitespace-separated decimal integers.");
}

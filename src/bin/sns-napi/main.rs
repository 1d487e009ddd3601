//! sns-napi CLI - Tool for inspecting NeXus container files.

use sns_napi::core::AccessMode;
use sns_napi::file::{Navigator, NexusFile};
use sns_napi::marshal::ResultKind;
use sns_napi::mem::MemoryBackend;
use sns_napi::{Error, Result};
use std::env;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "SNS_NAPI_LOG";

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = None;
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = Some("debug"),
            "-vv" | "--trace" => level = Some("trace"),
            "-q" | "--quiet" => level = Some("off"),
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let result = match filtered_args[0] {
        "tree" | "t" => match filtered_args.get(1) {
            Some(file) => cmd_tree(file),
            None => usage("tree <file>"),
        },
        "attrs" | "a" => match filtered_args.get(1) {
            Some(file) => cmd_attrs(file, filtered_args.get(2).copied()),
            None => usage("attrs <file> [path]"),
        },
        "get" | "g" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(file), Some(path)) => cmd_get(file, path, filtered_args.get(3).copied()),
            _ => usage("get <file> <path> [f|i|p]"),
        },
        "slab" | "s" => match (filtered_args.get(1), filtered_args.get(2), filtered_args.get(3), filtered_args.get(4)) {
            (Some(file), Some(path), Some(start), Some(size)) => {
                cmd_slab(file, path, start, size, filtered_args.get(5).copied())
            }
            _ => usage("slab <file> <path> <start> <size> [f|i|p]"),
        },
        "info" | "i" => match (filtered_args.get(1), filtered_args.get(2)) {
            (Some(file), Some(path)) => cmd_info(file, path),
            _ => usage("info <file> <path>"),
        },
        "-V" | "--version" | "version" => {
            println!("sns-napi {} (built {})", env!("CARGO_PKG_VERSION"), env!("SNS_NAPI_BUILD_DATE"));
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_help();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn usage(form: &str) -> Result<()> {
    Err(Error::invalid(format!("missing arguments\nUsage: sns-napi {form}")))
}

fn print_help() {
    println!("sns-napi - NeXus container toolkit");
    println!();
    println!("USAGE:");
    println!("    sns-napi [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    t, tree  <file>                       Show the group hierarchy");
    println!("    a, attrs <file> [path]                List attributes of a node");
    println!("    g, get   <file> <path> [f|i|p]        Print a dataset as JSON");
    println!("    s, slab  <file> <path> <start> <size> Print a region, e.g. 0,0 1,3");
    println!("    i, info  <file> <path>                Show shape and element type");
    println!("    -V, --version                         Show version and build date");
    println!("    h, help                               Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -v, --verbose    Show debug output");
    println!("    -vv, --trace     Show trace output (very verbose)");
    println!("    -q, --quiet      Suppress all log output");
    println!();
    println!("The {LOG_ENV} variable takes a tracing filter when no flag is given.");
}

fn open(path: &str) -> Result<Navigator> {
    info!("Opening file: {}", path);
    let file = NexusFile::<MemoryBackend>::open(path, AccessMode::Read)?;
    Ok(Navigator::new(file))
}

/// Parse a comma separated list such as `0,0`.
fn parse_list(text: &str) -> Result<Vec<i64>> {
    text.split(',')
        .map(|s| s.trim().parse::<i64>().map_err(|_| Error::invalid(format!("not an integer: {s:?}"))))
        .collect()
}

fn cmd_tree(path: &str) -> Result<()> {
    let mut nav = open(path)?;
    println!("{path}");
    print_group(&mut nav, 1)?;
    nav.into_inner().close()
}

fn print_group(nav: &mut Navigator, depth: usize) -> Result<()> {
    let indent = "  ".repeat(depth);
    let entries = nav.file().entries()?;
    debug!("{} entries under /{}", entries.len(), nav.path().join("/"));

    for entry in entries {
        if entry.is_data() {
            nav.open_data(&entry.name)?;
            let (dims, type_name) = nav.file().get_dims()?;
            nav.close_data()?;
            println!("{indent}{} [{} {}]", entry.name, type_name.unwrap_or("?"), dims);
        } else {
            println!("{indent}{} [{}]", entry.name, entry.class);
            nav.open_group(&entry.name, &entry.class)?;
            print_group(nav, depth + 1)?;
            nav.close_group()?;
        }
    }
    Ok(())
}

fn cmd_attrs(file: &str, path: Option<&str>) -> Result<()> {
    let mut nav = open(file)?;
    if let Some(path) = path {
        nav.open_path(path)?;
    }
    for attr in nav.file().attributes()? {
        println!("{} ({}) = {}", attr.name, attr.element_type, attr.value);
    }
    nav.into_inner().close()
}

fn cmd_get(file: &str, path: &str, kind: Option<&str>) -> Result<()> {
    let kind = ResultKind::from_token(kind)?;
    let mut nav = open(file)?;
    nav.open_path(path)?;
    println!("{}", nav.file().get_data(kind)?);
    nav.into_inner().close()
}

fn cmd_slab(file: &str, path: &str, start: &str, size: &str, kind: Option<&str>) -> Result<()> {
    let kind = ResultKind::from_token(kind)?;
    let (start, size) = (parse_list(start)?, parse_list(size)?);
    let mut nav = open(file)?;
    nav.open_path(path)?;
    println!("{}", nav.file().get_slab(&start, &size, kind)?);
    nav.into_inner().close()
}

fn cmd_info(file: &str, path: &str) -> Result<()> {
    let mut nav = open(file)?;
    nav.open_path(path)?;
    let (dims, type_name) = nav.file().get_dims()?;
    println!("shape: {dims}");
    println!("type:  {}", type_name.unwrap_or("unknown"));
    nav.into_inner().close()
}

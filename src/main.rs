//! Waymark CLI
//!
//! Usage:
//!   waymark --schema <FILE> [OPTIONS] [KEY]
//!
//! Options:
//!   -t, --token <NAME=VALUE>  Token value, repeatable
//!   -p, --profile <FILE>      Profile with default tokens and root (TOML)
//!   -r, --root <PATH>         Root path prefix, overrides the profile
//!   -k, --keys                List the addressable keys and exit
//!   -d, --debug               Dump the compiled node table to stderr
//!   -h, --help                Print help

use std::path::PathBuf;
use std::process;

use clap::Parser;

use waymark::{Profile, TemplateTree, TokenMap, TokenValue};

#[derive(Parser)]
#[command(name = "waymark")]
#[command(about = "Build filesystem paths from a declarative naming schema")]
struct Cli {
    /// Logical key of the path to build
    key: Option<String>,

    /// Schema file describing the path hierarchy (YAML)
    #[arg(short, long)]
    schema: PathBuf,

    /// Token values as NAME=VALUE (integers and booleans are detected)
    #[arg(short = 't', long = "token", value_name = "NAME=VALUE")]
    tokens: Vec<String>,

    /// Profile with default tokens and root path (TOML)
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Root path prefix, overrides the profile
    #[arg(short, long)]
    root: Option<String>,

    /// List the addressable keys in the schema and exit
    #[arg(short, long)]
    keys: bool,

    /// Debug mode: dump the compiled node table
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut tree = match TemplateTree::from_file(&cli.schema) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Error loading schema '{}': {}", cli.schema.display(), e);
            process::exit(1);
        }
    };

    // Profile first, explicit flags on top
    let profile = match &cli.profile {
        Some(path) => match Profile::from_file(path) {
            Ok(profile) => Some(profile),
            Err(e) => {
                eprintln!("Error loading profile '{}': {}", path.display(), e);
                process::exit(1);
            }
        },
        None => None,
    };

    if let Some(root) = profile.as_ref().and_then(|p| p.root_path.clone()) {
        tree.set_root_path(root);
    }
    if let Some(root) = &cli.root {
        tree.set_root_path(root.clone());
    }

    if cli.keys {
        let mut keys: Vec<&str> = tree.keys().collect();
        keys.sort_unstable();
        for key in keys {
            println!("{}", key);
        }
        return;
    }

    if cli.debug {
        print_tree(&tree);
    }

    let key = match &cli.key {
        Some(key) => key,
        None => {
            eprintln!("Error: no key given (use --keys to list the schema's keys)");
            process::exit(2);
        }
    };

    let mut tokens = TokenMap::new();
    for arg in &cli.tokens {
        match parse_token(arg) {
            Ok((name, value)) => tokens.insert(name, value),
            Err(message) => {
                eprintln!("Error: {}", message);
                process::exit(2);
            }
        }
    }
    if let Some(profile) = &profile {
        profile.apply(&mut tokens);
    }

    match tree.build_path(key, &tokens) {
        Ok(path) => println!("{}", path),
        Err(e) => {
            eprintln!("{}", e.format());
            process::exit(1);
        }
    }
}

/// Parse a NAME=VALUE token argument. Integer and boolean values are
/// detected; everything else stays a string.
fn parse_token(arg: &str) -> Result<(String, TokenValue), String> {
    let (name, value) = match arg.split_once('=') {
        Some(pair) => pair,
        None => return Err(format!("token '{}' is not in NAME=VALUE form", arg)),
    };
    if name.is_empty() {
        return Err(format!("token '{}' has an empty name", arg));
    }

    let value = if let Ok(number) = value.parse::<i64>() {
        TokenValue::Int(number)
    } else if let Ok(flag) = value.parse::<bool>() {
        TokenValue::Bool(flag)
    } else {
        TokenValue::Str(value.to_string())
    };
    Ok((name.to_string(), value))
}

fn print_tree(tree: &TemplateTree) {
    eprintln!("=== Template Tree ===");
    let mut keys: Vec<&str> = tree.keys().collect();
    keys.sort_unstable();
    for key in keys {
        if let Some(node) = tree.get(key) {
            let placeholders: Vec<&str> = node.placeholders().collect();
            eprintln!("{:<24} {}  [{}]", key, node.pattern(), placeholders.join(", "));
        }
    }
    eprintln!("=====================");
}

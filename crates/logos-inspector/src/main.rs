//! `lm` - Logos Module inspector.
//!
//! Consumes only the host core's public surface: load a module, print its
//! metadata or its method manifest, in human or JSON form.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use logos_module::{MethodInfo, ModuleHandle, ModuleMetadata};

/// Logos Module inspector.
#[derive(Parser, Debug)]
#[command(name = "lm")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show module metadata (name, version, description, etc.).
    Metadata {
        /// Path to the module file (.so, .dylib, .dll).
        path: PathBuf,
        /// Output in JSON format.
        #[arg(long)]
        json: bool,
    },
    /// Show module methods and signatures.
    Methods {
        /// Path to the module file (.so, .dylib, .dll).
        path: PathBuf,
        /// Output in JSON format.
        #[arg(long)]
        json: bool,
        /// Include operations inherited from the framework base object.
        #[arg(long)]
        include_base: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Command::Metadata { path, json } => run_metadata(&path, json),
        Command::Methods {
            path,
            json,
            include_base,
        } => run_methods(&path, json, include_base),
    }
}

fn run_metadata(path: &PathBuf, json: bool) -> Result<()> {
    let Some(metadata) = ModuleHandle::extract_metadata(path) else {
        bail!("no usable metadata found in {}", path.display());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&metadata)?);
    } else {
        print_metadata_human(&metadata);
    }
    Ok(())
}

fn run_methods(path: &PathBuf, json: bool, include_base: bool) -> Result<()> {
    let handle = ModuleHandle::load_from_path(path);
    if !handle.is_valid() {
        bail!(
            "failed to load {}: {}",
            path.display(),
            handle.error_string().unwrap_or("unknown error")
        );
    }

    let exclude_base = !include_base;
    if json {
        let manifest = handle.get_methods_as_json(exclude_base);
        println!("{}", serde_json::to_string_pretty(&manifest)?);
    } else {
        println!("Class: {}\n", handle.get_class_name());
        print_methods_human(&handle.get_methods(exclude_base));
    }
    Ok(())
}

fn print_metadata_human(metadata: &ModuleMetadata) {
    println!("Module Metadata:");
    println!("================");
    println!("Name:         {}", metadata.name);
    println!("Version:      {}", metadata.version);
    println!("Description:  {}", metadata.description);
    println!("Author:       {}", metadata.author);
    println!("Type:         {}", metadata.module_type);
    if metadata.dependencies.is_empty() {
        println!("Dependencies: (none)");
    } else {
        println!("Dependencies: {}", metadata.dependencies.join(", "));
    }
}

fn print_methods_human(methods: &[MethodInfo]) {
    println!("Module Methods:");
    println!("===============");
    println!();

    if methods.is_empty() {
        println!("(no methods found)");
        return;
    }

    for method in methods {
        let params = method
            .parameters
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");
        let return_type = if method.return_type.is_empty() {
            "void"
        } else {
            &method.return_type
        };

        println!("{} {}({})", return_type, method.name, params);
        println!("  Signature: {}", method.signature);
        println!("  Invokable: {}", method.is_invokable);
        println!();
    }
}

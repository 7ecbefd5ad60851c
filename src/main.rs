use clap::{Parser, Subcommand};
use section_store::servlets::DEFAULT_SERVLETS_PATH;
use section_store::store::{env_prefix, get_default_config_path, resolve_config_path};
use section_store::{codec_by_name, codec_for_path, servlet_bindings, Store, StoreError, Value};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

// Command-line arguments
#[derive(Parser, Debug)]
#[command(
    version,
    about = "Inspect and edit hierarchical configuration documents.",
    long_about = "Reads TOML, YAML or JSON configuration files as a tree of sections \
                  addressed by dotted paths. Without --file the configuration is discovered \
                  from <APP>_CONFIG, the current directory, then the user config directory."
)]
struct Args {
    /// Configuration file to operate on.
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    /// Application name used for config discovery and environment overrides.
    #[arg(long, default_value = "sectionctl", global = true)]
    app: String,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the value at a dotted path.
    Get {
        path: String,
        /// Printed when the path is absent instead of failing.
        #[arg(short, long)]
        default: Option<String>,
    },
    /// Set a value and save the file.
    Set { path: String, value: String },
    /// Remove a value and save the file.
    Unset { path: String },
    /// List the keys of a section (the root when no path is given).
    Keys {
        path: Option<String>,
        /// Include every descendant as a dotted path.
        #[arg(short, long)]
        deep: bool,
    },
    /// Print the whole document, optionally converted to another format.
    Dump {
        /// toml, yaml or json
        #[arg(long)]
        format: Option<String>,
    },
    /// List the servlet bindings defined under a section.
    Servlets {
        #[arg(default_value = DEFAULT_SERVLETS_PATH)]
        path: String,
        /// Print a JSON array instead of tab-separated lines.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    match args.command {
        Command::Get { ref path, ref default } => {
            let store = open_for_read(&args)?;
            match store.get(path)? {
                Some(value) => println!("{}", display_value(value)),
                None => match default {
                    Some(d) => println!("{}", d),
                    None => return Err(format!("no value at '{}'", path).into()),
                },
            }
        }
        Command::Set { ref path, ref value } => {
            let mut store = open_for_write(&args)?;
            store.set(path, parse_scalar(value))?;
            store.save()?;
        }
        Command::Unset { ref path } => {
            let mut store = open_for_write(&args)?;
            if store.remove(path)?.is_some() {
                store.save()?;
            } else {
                debug!("Nothing stored at '{}'", path);
            }
        }
        Command::Keys { ref path, deep } => {
            let store = open_for_read(&args)?;
            let keys = match path {
                Some(p) => store
                    .get_section(p)?
                    .map(|s| s.keys(deep))
                    .unwrap_or_default(),
                None => store.keys(deep),
            };
            for key in keys {
                println!("{}", key);
            }
        }
        Command::Dump { ref format } => {
            let store = open_for_read(&args)?;
            let text = match format {
                Some(name) => {
                    let codec = codec_by_name(name)
                        .ok_or_else(|| format!("unknown format '{}'", name))?;
                    store.render_with(codec.as_ref())?
                }
                None => store.render()?,
            };
            print!("{}", text);
        }
        Command::Servlets { ref path, json } => {
            let store = open_for_read(&args)?;
            let bindings = servlet_bindings(&store, path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&bindings)?);
                return Ok(());
            }
            for binding in bindings {
                println!(
                    "{}\t{}\t{}",
                    binding.name,
                    binding.class,
                    binding.url_patterns.join(",")
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Open the configuration and layer environment overrides on top.
fn open_for_read(args: &Args) -> Result<Store, StoreError> {
    match &args.file {
        Some(path) => {
            let mut store = Store::open(path)?;
            store.apply_env_overrides(&env_prefix(&args.app));
            Ok(store)
        }
        None => Store::discover(&args.app),
    }
}

/// Open the configuration without environment overrides, so that saving does
/// not persist them. A missing file yields an empty store bound to that path.
fn open_for_write(args: &Args) -> Result<Store, StoreError> {
    let path = match &args.file {
        Some(path) => path.clone(),
        None => resolve_config_path(&args.app)
            .or_else(|| get_default_config_path(&args.app))
            .ok_or(StoreError::MissingPath)?,
    };

    match Store::open(&path) {
        Ok(store) => Ok(store),
        Err(StoreError::NotFound(_)) => {
            let mut store = Store::with_boxed_codec(codec_for_path(&path));
            store.set_path(path);
            Ok(store)
        }
        Err(e) => Err(e),
    }
}

/// Interpret a command-line value as the narrowest matching scalar.
fn parse_scalar(raw: &str) -> Value {
    if let Ok(b) = raw.parse::<bool>() {
        Value::Bool(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        Value::Int(i)
    } else if let Some(f) = raw.parse::<f64>().ok().filter(|f| f.is_finite()) {
        Value::Float(f)
    } else {
        Value::String(raw.to_string())
    }
}

fn display_value(value: &Value) -> String {
    match value.scalar_string() {
        Some(s) => s,
        None => serde_json::to_string_pretty(&value.to_json()).unwrap_or_default(),
    }
}

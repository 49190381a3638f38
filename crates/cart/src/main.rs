#![forbid(unsafe_code)]

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sharecart_core::constraints::{MISC_LEN, SWITCH_LEN};
use sharecart_core::{Config, FileSystem};
use sharecart_engine::CartManager;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "cart",
    version,
    about = "Read and write the shared sharecart save state (dat/o_o.ini).",
    args_override_self = true
)]
struct Cli {
    /// Directory the search starts from [default: $SHARECART_APPLICATION_DIR or cwd].
    #[arg(long, global = true)]
    app_dir: Option<PathBuf>,

    /// Parent directories to search above the start directory.
    #[arg(long, global = true, allow_negative_numbers = true)]
    levels: Option<i64>,

    /// Create dat/o_o.ini when none is found.
    #[arg(long, global = true)]
    create: bool,

    /// Clamp out-of-range values instead of rejecting them.
    #[arg(long, global = true)]
    clamp: bool,

    /// Fail on malformed file content instead of falling back to defaults.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the path of the sharecart file.
    Locate {
        #[arg(long)]
        json: bool,
    },

    /// Print every parameter.
    Show {
        #[arg(long)]
        json: bool,
    },

    /// Print one parameter: x, y, name, misc0-3, switch0-7.
    Get { field: Field },

    /// Set parameters and save, e.g. `cart set x=10 name=Ann switch3=true`.
    Set {
        #[arg(required = true, value_name = "FIELD=VALUE")]
        assignments: Vec<Assignment>,
    },

    /// Create the sharecart file if needed and fill it with defaults.
    Init,

    /// Delete the sharecart file.
    Remove,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.cmd {
        Cmd::Locate { json } => cmd_locate(&cli, *json),
        Cmd::Show { json } => cmd_show(&cli, *json),
        Cmd::Get { field } => cmd_get(&cli, *field),
        Cmd::Set { assignments } => cmd_set(&cli, assignments),
        Cmd::Init => cmd_init(&cli),
        Cmd::Remove => cmd_remove(&cli),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let json = std::env::var("CART_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

// ── Manager setup ───────────────────────────────────────────────

fn config(cli: &Cli, create: bool) -> Result<Config> {
    let mut builder = Config::builder()
        .auto_create(create)
        .clamp_to_constraints(cli.clamp)
        .strict_parsing(cli.strict);
    if let Some(levels) = cli.levels {
        builder = builder.directory_levels(levels);
    }
    if let Some(dir) = &cli.app_dir {
        builder = builder.application_path(dir);
    }
    let config = builder.build()?;
    tracing::debug!(?config, "configuration");
    Ok(config)
}

fn resolve(cli: &Cli, create: bool) -> Result<CartManager> {
    let config = config(cli, create)?;
    let mut manager = CartManager::new(config);
    if !manager.resolve() {
        let config = manager.config();
        bail!(
            "no sharecart file within {} levels of {}",
            config.directory_levels(),
            config.application_path().display()
        );
    }
    Ok(manager)
}

fn open(cli: &Cli, create: bool) -> Result<CartManager> {
    let mut manager = resolve(cli, create)?;
    let path = location_path(&manager);
    let loaded = manager
        .load()
        .with_context(|| format!("cannot load {path}"))?;
    if !loaded {
        bail!("cannot read {path}");
    }
    Ok(manager)
}

fn location_path(manager: &CartManager) -> String {
    manager
        .location()
        .map(|l| l.to_string())
        .unwrap_or_default()
}

// ── Commands ────────────────────────────────────────────────────

fn cmd_locate(cli: &Cli, json_out: bool) -> Result<()> {
    let manager = resolve(cli, cli.create)?;
    let Some(location) = manager.location() else {
        bail!("no sharecart file resolved");
    };
    if json_out {
        println!("{}", serde_json::to_string_pretty(location)?);
    } else {
        println!("{location}");
    }
    Ok(())
}

fn cmd_show(cli: &Cli, json_out: bool) -> Result<()> {
    let manager = open(cli, cli.create)?;
    let Some(record) = manager.record() else {
        bail!("no record loaded");
    };

    if json_out {
        let out = serde_json::json!({
            "path": location_path(&manager),
            "record": record,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("  Path:    {}", location_path(&manager));
    println!("  MapX:    {}", record.x);
    println!("  MapY:    {}", record.y);
    for (i, v) in record.misc.iter().enumerate() {
        println!("  Misc{i}:   {v}");
    }
    println!("  Name:    {}", record.name);
    let switches: Vec<&str> = record
        .switches
        .iter()
        .map(|&on| if on { "1" } else { "0" })
        .collect();
    println!("  Switch:  {}", switches.join(" "));
    Ok(())
}

fn cmd_get(cli: &Cli, field: Field) -> Result<()> {
    let manager = open(cli, cli.create)?;
    let value = match field {
        Field::X => manager.x()?.to_string(),
        Field::Y => manager.y()?.to_string(),
        Field::Misc(i) => manager.misc(i)?.to_string(),
        Field::Name => manager.name()?.to_string(),
        Field::Switch(i) => manager.switch_value(i)?.to_string(),
    };
    println!("{value}");
    Ok(())
}

fn cmd_set(cli: &Cli, assignments: &[Assignment]) -> Result<()> {
    let mut manager = open(cli, cli.create)?;
    for a in assignments {
        apply(&mut manager, a).with_context(|| format!("cannot set {}", a.field))?;
    }
    if !manager.save()? {
        bail!("cannot write {}", location_path(&manager));
    }
    eprintln!("  saved {}", location_path(&manager));
    Ok(())
}

fn apply(manager: &mut CartManager, assignment: &Assignment) -> Result<()> {
    let value = assignment.value.as_str();
    match assignment.field {
        Field::X => manager.set_x(parse_int(value)?)?,
        Field::Y => manager.set_y(parse_int(value)?)?,
        Field::Misc(i) => manager.set_misc(i, parse_int(value)?)?,
        Field::Name => manager.set_name(value)?,
        Field::Switch(i) => manager.set_switch_value(i, parse_bool(value)?)?,
    }
    Ok(())
}

fn cmd_init(cli: &Cli) -> Result<()> {
    let mut manager = resolve(cli, true)?;
    let created = manager.location().is_some_and(|l| l.is_auto_created());
    let path = location_path(&manager);
    if !manager.load().with_context(|| format!("cannot load {path}"))? {
        bail!("cannot read {path}");
    }
    if created {
        eprintln!("  created {path}");
    } else {
        eprintln!("  exists  {path}");
    }
    println!("{path}");
    Ok(())
}

fn cmd_remove(cli: &Cli) -> Result<()> {
    let manager = resolve(cli, false)?;
    let Some(location) = manager.location() else {
        bail!("no sharecart file resolved");
    };
    manager
        .file_system()
        .remove_file(location.path())
        .with_context(|| format!("cannot remove {location}"))?;
    eprintln!("  removed {location}");
    Ok(())
}

// ── Argument types ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    X,
    Y,
    Misc(usize),
    Name,
    Switch(usize),
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        let indexed = |prefix: &str, len: usize| -> Option<Result<usize, String>> {
            let rest = lower.strip_prefix(prefix)?;
            Some(match rest.parse::<usize>() {
                Ok(i) if i < len => Ok(i),
                _ => Err(format!("{prefix} index must be 0-{}, got '{rest}'", len - 1)),
            })
        };

        match lower.as_str() {
            "x" | "mapx" => return Ok(Field::X),
            "y" | "mapy" => return Ok(Field::Y),
            "name" | "playername" => return Ok(Field::Name),
            _ => {}
        }
        if let Some(i) = indexed("misc", MISC_LEN) {
            return i.map(Field::Misc);
        }
        if let Some(i) = indexed("switch", SWITCH_LEN) {
            return i.map(Field::Switch);
        }
        Err(format!(
            "unknown field '{s}' (expected x, y, name, misc0-3, switch0-7)"
        ))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::X => write!(f, "x"),
            Field::Y => write!(f, "y"),
            Field::Misc(i) => write!(f, "misc{i}"),
            Field::Name => write!(f, "name"),
            Field::Switch(i) => write!(f, "switch{i}"),
        }
    }
}

#[derive(Debug, Clone)]
struct Assignment {
    field: Field,
    value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
        Ok(Assignment {
            field: field.parse()?,
            value: value.to_string(),
        })
    }
}

fn parse_int(value: &str) -> Result<i64> {
    value
        .trim()
        .parse()
        .with_context(|| format!("'{value}' is not an integer"))
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" => Ok(true),
        "false" | "0" | "off" => Ok(false),
        _ => bail!("'{value}' is not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names() {
        assert_eq!("x".parse::<Field>().unwrap(), Field::X);
        assert_eq!("MapY".parse::<Field>().unwrap(), Field::Y);
        assert_eq!("PlayerName".parse::<Field>().unwrap(), Field::Name);
        assert_eq!("misc3".parse::<Field>().unwrap(), Field::Misc(3));
        assert_eq!("Switch7".parse::<Field>().unwrap(), Field::Switch(7));
    }

    #[test]
    fn field_index_bounds() {
        assert!("misc4".parse::<Field>().is_err());
        assert!("switch8".parse::<Field>().is_err());
        assert!("switch".parse::<Field>().is_err());
        assert!("z".parse::<Field>().is_err());
    }

    #[test]
    fn assignment_keeps_value_verbatim() {
        let a: Assignment = "name=a=b".parse().unwrap();
        assert_eq!(a.field, Field::Name);
        assert_eq!(a.value, "a=b");
        assert!("name".parse::<Assignment>().is_err());
    }

    #[test]
    fn value_parsers() {
        assert_eq!(parse_int(" 42 ").unwrap(), 42);
        assert_eq!(parse_int("-3").unwrap(), -3);
        assert!(parse_int("x").is_err());
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }

    #[test]
    fn display_round_trips() {
        for f in [Field::X, Field::Name, Field::Misc(2), Field::Switch(5)] {
            assert_eq!(f.to_string().parse::<Field>().unwrap(), f);
        }
    }
}

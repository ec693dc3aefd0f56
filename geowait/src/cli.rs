use crate::config::{Config, KEYS};
use crate::finder::Finder;
use crate::output::{emit_data, OutputFormat};
use crate::table::ScaleTable;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value as JsonValue;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "geowait",
    about = "Randomized wait times from optimized geometric scales",
    disable_help_subcommand = true,
    after_help = r#"Examples:
  geowait --table scales.csv find 120
  geowait --table scales.csv find 120 --count 5 --seed 7 --json
  geowait --table scales.csv lookup 125
  GEOWAIT_TABLE=scales.csv geowait table --raw
  geowait config set table /data/scales.csv"#
)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// JSON output
    #[arg(long, global = true)]
    pub json: bool,
    /// Raw output (bare values, one per line)
    #[arg(long, global = true)]
    pub raw: bool,
    /// Scale table CSV
    #[arg(long, global = true)]
    pub table: Option<PathBuf>,
    /// Header of the elapsed-time column
    #[arg(long = "key-column", global = true)]
    pub key_column: Option<String>,
    /// Header of the scale column
    #[arg(long = "value-column", global = true)]
    pub value_column: Option<String>,
    /// Verbose logging
    #[arg(long, global = true)]
    pub verbose: bool,
    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,
    /// Color control
    #[arg(long, global = true, value_enum)]
    pub color: Option<ColorChoice>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ColorChoice {
    Always,
    Auto,
    Never,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sample wait times for an elapsed charging time
    Find(FindArgs),
    /// Interpolated scale for an elapsed charging time
    Lookup { t_chr: i64 },
    /// Dump the resampled scale table
    Table,
    Config(ConfigCmd),
}

#[derive(Args, Debug)]
pub struct FindArgs {
    /// Elapsed charging time in slots
    pub t_chr: i64,
    /// Number of wait times to draw
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: u64,
    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,
    /// Clamp negative waits to zero
    #[arg(long = "non-negative")]
    pub non_negative: bool,
}

#[derive(Args, Debug)]
pub struct ConfigCmd {
    #[command(subcommand)]
    sub: ConfigSub,
}
#[derive(Subcommand, Debug)]
pub enum ConfigSub {
    Set { key: String, value: String },
    Get { key: String },
    Show,
    Path,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut cfg = Config::load().context("load config")?;
    cfg.apply_env();
    cfg.apply_cli(&cli);

    match &cli.command {
        Commands::Find(args) => run_find(args, &cfg, &cli),
        Commands::Lookup { t_chr } => run_lookup(*t_chr, &cfg, &cli),
        Commands::Table => run_table(&cfg, &cli),
        Commands::Config(cmd) => run_config(cmd, &cfg, &cli),
    }
}

fn fmt_from_cli(cli: &Cli) -> OutputFormat {
    if cli.raw {
        OutputFormat::Raw
    } else if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Yaml
    }
}

pub fn open_finder(cfg: &Config) -> Result<Finder> {
    let path = cfg.table_path()?;
    info!(
        "loading scale table from {} (source: {})",
        path.display(),
        cfg.table_source_label()
    );
    let mut table = ScaleTable::from_path(path, &cfg.columns())
        .with_context(|| format!("build scale table from {}", path.display()))?;
    if let Some(expected) = cfg.expected_entries {
        table = table.expect_len(expected).context("check expected_entries")?;
    }
    Ok(Finder::from_table(table))
}

fn run_find(args: &FindArgs, cfg: &Config, cli: &Cli) -> Result<()> {
    let finder = open_finder(cfg)?;
    let scale = finder.scale_at(args.t_chr)?;
    let count = args.count as usize;
    let mut waits = match args.seed {
        Some(seed) => finder.wait_times(&mut ChaCha8Rng::seed_from_u64(seed), args.t_chr, count)?,
        None => finder.wait_times(&mut rand::thread_rng(), args.t_chr, count)?,
    };
    if args.non_negative {
        for w in waits.iter_mut() {
            *w = (*w).max(0);
        }
    }
    let fmt = fmt_from_cli(cli);
    if fmt == OutputFormat::Raw {
        return emit_data(&fmt, &serde_json::json!(waits));
    }
    emit_data(&fmt, &serde_json::json!({
        "t_chr": args.t_chr,
        "scale": scale,
        "waits": waits,
    }))
}

fn run_lookup(t_chr: i64, cfg: &Config, cli: &Cli) -> Result<()> {
    let finder = open_finder(cfg)?;
    let scale = finder.scale_at(t_chr)?;
    let fmt = fmt_from_cli(cli);
    if fmt == OutputFormat::Raw {
        return emit_data(&fmt, &serde_json::json!(scale));
    }
    emit_data(&fmt, &serde_json::json!({"t_chr": t_chr, "scale": scale}))
}

fn run_table(cfg: &Config, cli: &Cli) -> Result<()> {
    let finder = open_finder(cfg)?;
    let fmt = fmt_from_cli(cli);
    if fmt == OutputFormat::Raw {
        let rows: Vec<JsonValue> = finder
            .table()
            .entries()
            .map(|(t, v)| JsonValue::String(format!("{},{}", t, v)))
            .collect();
        return emit_data(&fmt, &JsonValue::Array(rows));
    }
    emit_data(&fmt, &table_payload(finder.table()))
}

/// Table summary with one `{t_chr, scale}` row per grid point.
pub fn table_payload(table: &ScaleTable) -> JsonValue {
    let rows: Vec<JsonValue> = table
        .entries()
        .map(|(t, v)| serde_json::json!({"t_chr": t, "scale": widen(v)}))
        .collect();
    serde_json::json!({
        "entries": table.len(),
        "grid_end": table.grid_end(),
        "table": rows,
    })
}

// f32 -> f64 through the shortest decimal, so 0.45f32 prints as 0.45
fn widen(v: f32) -> f64 {
    v.to_string().parse().unwrap_or(v as f64)
}

pub fn build_config_status(cfg: &Config) -> JsonValue {
    let columns = cfg.columns();
    serde_json::json!({
        "table": cfg.table.as_ref().map(|p| p.display().to_string()),
        "table_source": cfg.table_source_label(),
        "key_column": columns.key,
        "value_column": columns.value,
        "expected_entries": cfg.expected_entries,
    })
}

fn run_config(cmd: &ConfigCmd, cfg: &Config, cli: &Cli) -> Result<()> {
    match &cmd.sub {
        ConfigSub::Set { key, value } => {
            // env and flag overrides are not persisted
            let mut stored = Config::load().context("load config")?;
            stored.set(key, value)?;
            stored.save()?;
            emit_data(&OutputFormat::Yaml, &serde_json::json!({"status": "ok"}))
        }
        ConfigSub::Get { key } => {
            if !KEYS.contains(&key.as_str()) {
                anyhow::bail!("unsupported key `{}`; expected one of {}", key, KEYS.join(", "));
            }
            let v = cfg.get(key).unwrap_or_default();
            emit_data(&OutputFormat::Raw, &JsonValue::String(v))
        }
        ConfigSub::Show => emit_data(&fmt_from_cli(cli), &build_config_status(cfg)),
        ConfigSub::Path => {
            let path = Config::config_path()?;
            emit_data(&OutputFormat::Raw, &JsonValue::String(path.display().to_string()))
        }
    }
}

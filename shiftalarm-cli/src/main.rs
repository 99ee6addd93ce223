use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shiftalarm_core::{
    DayPlanDraft, MonthPlanner, SchedulerCall, ShiftCatalog, ShiftClassifier, reassign_range,
    retry_pending,
};
use shiftalarm_ingest::{DumpEngine, recognize_schedule};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod calendar;
mod config;
mod file_store;
mod queue_scheduler;
mod state;

use config::{Config, config_path, load_config, save_config};
use file_store::JsonFileStore;
use queue_scheduler::QueueScheduler;

#[derive(Parser, Debug)]
#[command(name = "shiftalarm", version, about = "Turn a photographed shift schedule into alarms")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write default config and seed the shift catalog under ~/.shiftalarm
    Init,

    /// Shift catalog commands
    Shifts {
        #[command(subcommand)]
        command: ShiftsCommand,
    },

    /// Print the shift a piece of recognized text maps to
    Classify { text: String },

    /// Recognize a schedule from a fragment dump and (optionally) apply it
    Import {
        /// Fragment dump (.json or .csv) produced by a text recognizer
        #[arg(long)]
        fragments: PathBuf,

        /// Reassign a date range before applying: FROM:TO=SHIFT (dates as YYYY-MM-DD)
        #[arg(long = "set", value_name = "FROM:TO=SHIFT")]
        overrides: Vec<String>,

        /// Replace the month's plans and alarms with the result
        #[arg(long, default_value_t = false)]
        apply: bool,
    },

    /// Alarm instance commands
    Alarms {
        #[command(subcommand)]
        command: AlarmsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ShiftsCommand {
    /// List shifts in classification order
    List,
}

#[derive(Subcommand, Debug)]
enum AlarmsCommand {
    /// List stored alarms by time
    List {
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Export stored alarms as an ICS calendar
    ExportIcs {
        /// Output file (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Re-send scheduler calls that failed during earlier imports
    Retry,

    /// Scheduler queue summary (queued/pending)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "shiftalarm=info,shiftalarm_core=info,shiftalarm_ingest=info".into()
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = load_config()?;

    match cli.command {
        Command::Init => init(&cfg)?,

        Command::Shifts { command } => match command {
            ShiftsCommand::List => {
                let catalog = state::load_catalog(&cfg.alarms)?;
                print_catalog(&catalog);
            }
        },

        Command::Classify { text } => {
            let catalog = state::load_catalog(&cfg.alarms)?;
            let classifier =
                ShiftClassifier::new(&catalog).with_fallback(cfg.classifier.fallback());
            match classifier.find_match(&text) {
                Some(name) => println!("{name}"),
                None => println!("{} (no keyword matched)", classifier.classify(&text)),
            }
        }

        Command::Import {
            fragments,
            overrides,
            apply,
        } => import(&cfg, &fragments, &overrides, apply).await?,

        Command::Alarms { command } => match command {
            AlarmsCommand::List { limit } => {
                let store = JsonFileStore::open(state::store_path()?)?;
                let alarms = store.records().all_alarms();
                if alarms.is_empty() {
                    println!("No alarms in {}", store.path().display());
                }
                for a in alarms.iter().take(limit) {
                    println!(
                        "{} {} · {} · {}",
                        if a.enabled { "on " } else { "off" },
                        a.label,
                        a.shift_name,
                        a.date_time.format("%Y-%m-%d %H:%M")
                    );
                }
            }
            AlarmsCommand::ExportIcs { out } => {
                let store = JsonFileStore::open(state::store_path()?)?;
                let ics = calendar::alarms_to_ics(&store.records().all_alarms(), &cfg.timezone)?;
                match out {
                    Some(p) => {
                        fs::write(&p, ics).with_context(|| format!("write {}", p.display()))?;
                        println!("Wrote {}", p.display());
                    }
                    None => print!("{ics}"),
                }
            }
            AlarmsCommand::Retry => retry()?,
            AlarmsCommand::Status => {
                let queued = queue_scheduler::read_queue(&state::scheduler_queue_path()?)?;
                let schedules = queued
                    .iter()
                    .filter(|q| matches!(q.call, SchedulerCall::Schedule(_)))
                    .count();
                let pending = read_pending(&pending_path()?)?;
                println!(
                    "Queue: {} call(s) ({} schedule, {} cancel), {} pending retry",
                    queued.len(),
                    schedules,
                    queued.len() - schedules,
                    pending.len()
                );
                if let Some(last) = queued.last() {
                    println!("Last call queued at {}", last.queued_at_utc);
                }
            }
        },
    }

    Ok(())
}

fn init(cfg: &Config) -> Result<()> {
    let cp = config_path()?;
    if cp.exists() {
        println!("Config already exists: {}", cp.display());
    } else {
        save_config(cfg)?;
        println!("Wrote {}", cp.display());
    }

    let catalog_path = state::catalog_path()?;
    if catalog_path.exists() {
        println!("Catalog already exists: {}", catalog_path.display());
    } else {
        let catalog = shiftalarm_core::default_catalog(&cfg.alarms);
        state::write_catalog(&catalog_path, &catalog)?;
        println!("Wrote {} ({} shifts)", catalog_path.display(), catalog.len());
    }
    Ok(())
}

fn print_catalog(catalog: &ShiftCatalog) {
    for (i, s) in catalog.shifts().iter().enumerate() {
        println!(
            "{}. {}{} {}-{} keywords=[{}]",
            i + 1,
            s.name,
            if s.is_rest() { " (rest)" } else { "" },
            s.start.format("%H:%M"),
            s.end.format("%H:%M"),
            s.keywords.join(", ")
        );
        for t in &s.templates {
            println!(
                "   - {} {:?}{:+}m{}",
                t.label,
                t.anchor,
                t.offset_minutes,
                if t.enabled { "" } else { " (disabled)" }
            );
        }
    }
}

/// Parse `FROM:TO=SHIFT`.
fn parse_override(raw: &str) -> Result<(NaiveDate, NaiveDate, String)> {
    let (range, shift) = raw
        .split_once('=')
        .with_context(|| format!("override '{raw}' must look like FROM:TO=SHIFT"))?;
    let (from, to) = range.split_once(':').unwrap_or((range, range));
    let from = NaiveDate::parse_from_str(from.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{from}'"))?;
    let to = NaiveDate::parse_from_str(to.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid date '{to}'"))?;
    if to < from {
        bail!("override range ends before it starts: {raw}");
    }
    Ok((from, to, shift.trim().to_string()))
}

async fn import(cfg: &Config, fragments: &Path, overrides: &[String], apply: bool) -> Result<()> {
    if !fragments.exists() {
        bail!("fragment dump not found: {}", fragments.display());
    }
    let bytes = fs::read(fragments).with_context(|| format!("read {}", fragments.display()))?;

    let result = recognize_schedule(&DumpEngine, &bytes, &cfg.recognition)
        .await
        .with_context(|| format!("recognizing {}", fragments.display()))?;

    let catalog = state::load_catalog(&cfg.alarms)?;
    let classifier = ShiftClassifier::new(&catalog).with_fallback(cfg.classifier.fallback());
    let mut drafts: Vec<DayPlanDraft> = classifier.map_to_drafts(&result);

    for raw in overrides {
        let (from, to, shift) = parse_override(raw)?;
        if catalog.get(&shift).is_none() {
            bail!("unknown shift in override: {shift}");
        }
        let changed = reassign_range(&mut drafts, from..=to, &shift);
        println!("Override {raw}: {changed} day(s) changed");
    }

    println!("# {}-{:02}: {} day(s)\n", result.year, result.month, drafts.len());
    for d in &drafts {
        println!("{}  {:<4} {}", d.date, d.shift_name, d.raw_text);
    }

    if !apply {
        println!("\nDry run. Re-run with --apply to replace this month's alarms.");
        return Ok(());
    }
    if drafts.is_empty() {
        println!("\nNothing to apply.");
        return Ok(());
    }

    let store = JsonFileStore::open(state::store_path()?)?;
    let scheduler = QueueScheduler::new(state::scheduler_queue_path()?);
    let mut planner = MonthPlanner::new(store, scheduler);
    let report = planner.apply_month(&drafts, &catalog)?;
    let store = planner.into_store();
    store.save()?;
    tracing::info!(path = %store.path().display(), "store saved");

    println!(
        "\nReplaced {} plan(s) / {} alarm(s) with {} plan(s) / {} alarm(s).",
        report.removed_plans, report.removed_alarms, report.created_plans, report.created_alarms
    );
    for d in &report.unresolved {
        println!("- {} '{}' matches no shift; no alarms created", d.date, d.shift_name);
    }
    if !report.pending.is_empty() {
        append_pending(&report.pending)?;
        println!(
            "{} scheduler call(s) failed; run `shiftalarm alarms retry`",
            report.pending.len()
        );
    }
    Ok(())
}

fn pending_path() -> Result<PathBuf> {
    Ok(state::ensure_shiftalarm_home()?.join("scheduler").join("pending.json"))
}

fn read_pending(path: &Path) -> Result<Vec<SchedulerCall>> {
    if !path.exists() {
        return Ok(vec![]);
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

fn write_pending(path: &Path, calls: &[SchedulerCall]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::write(path, serde_json::to_string_pretty(calls)?)
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn append_pending(calls: &[SchedulerCall]) -> Result<()> {
    let p = pending_path()?;
    let mut all = read_pending(&p)?;
    all.extend_from_slice(calls);
    write_pending(&p, &all)
}

fn retry() -> Result<()> {
    let p = pending_path()?;
    let pending = read_pending(&p)?;
    if pending.is_empty() {
        println!("No pending scheduler calls.");
        return Ok(());
    }
    let total = pending.len();
    let store = JsonFileStore::open(state::store_path()?)?;
    let scheduler = QueueScheduler::new(state::scheduler_queue_path()?);
    let still = retry_pending(&scheduler, &store, pending)?;
    write_pending(&p, &still)?;
    println!("Retried {} call(s); {} still pending.", total, still.len());
    Ok(())
}

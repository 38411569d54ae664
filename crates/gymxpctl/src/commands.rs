//! Subcommand implementations.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use gymxp_common::format::{coerce_number, thousands};
use gymxp_common::{
    backup_file_name, Clock, FileStore, GymXpConfig, ItemField, Tracker, TrackerError,
};
use tracing::debug;

use crate::output::{render_header, render_history, render_today, Palette};
use crate::{RowKind, ToggleTarget};

/// Shared state for one invocation.
pub struct Context {
    config: GymXpConfig,
    data_dir: PathBuf,
    palette: Palette,
}

impl Context {
    pub fn new(config: GymXpConfig, data_dir: PathBuf) -> Self {
        let palette = Palette::new(config.output.color);
        Self {
            config,
            data_dir,
            palette,
        }
    }

    fn open(&self) -> Tracker<FileStore> {
        debug!("Using data dir {}", self.data_dir.display());
        Tracker::open(FileStore::new(&self.data_dir), Clock::System)
    }
}

fn print_today(ctx: &Context, tracker: &Tracker<FileStore>) {
    print!(
        "{}",
        render_today(&ctx.palette, &tracker.state().today, &tracker.score())
    );
}

pub fn status(ctx: &Context) -> Result<()> {
    let tracker = ctx.open();
    print!("{}", render_header(&ctx.palette, &tracker.snapshot()));
    println!();
    print_today(ctx, &tracker);
    Ok(())
}

pub fn history(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let tracker = ctx.open();
    let state = tracker.state();
    print!("{}", render_history(&ctx.palette, &state.notes, limit));
    if !state.notes.is_empty() {
        println!(
            "{}",
            ctx.palette.dim(&format!(
                "{} sessions, {} XP recorded",
                state.notes.len(),
                thousands(state.ledger_total() as f64)
            ))
        );
    }
    Ok(())
}

pub fn toggle(ctx: &Context, target: ToggleTarget, index: Option<usize>) -> Result<()> {
    let mut tracker = ctx.open();
    match (target, index) {
        (ToggleTarget::Leg, _) => tracker.toggle_leg_ext()?,
        (ToggleTarget::Item, Some(i)) => tracker.toggle_item(i)?,
        (ToggleTarget::Extra, Some(i)) => tracker.toggle_extra(i)?,
        (_, None) => bail!("toggle {:?} needs an index", target),
    }
    print_today(ctx, &tracker);
    Ok(())
}

pub fn set(ctx: &Context, kind: RowKind, index: usize, field: &str, value: &str) -> Result<()> {
    let field: ItemField = field.parse()?;
    let value = coerce_number(value);
    let mut tracker = ctx.open();
    match kind {
        RowKind::Item => tracker.update_item_field(index, field, value)?,
        RowKind::Extra => tracker.update_extra_field(index, field, value)?,
    }
    print_today(ctx, &tracker);
    Ok(())
}

pub fn set_leg(ctx: &Context, field: &str, value: &str) -> Result<()> {
    let field: ItemField = field.parse()?;
    let mut tracker = ctx.open();
    tracker.update_leg_ext_field(field, coerce_number(value))?;
    print_today(ctx, &tracker);
    Ok(())
}

pub fn rename_extra(ctx: &Context, index: usize, name: &str) -> Result<()> {
    let mut tracker = ctx.open();
    tracker.update_extra_name(index, name)?;
    print_today(ctx, &tracker);
    Ok(())
}

pub fn add_extra(ctx: &Context, name: Option<&str>) -> Result<()> {
    let mut tracker = ctx.open();
    let index = tracker.add_extra(name)?;
    println!("Added extra #{}", index);
    print_today(ctx, &tracker);
    Ok(())
}

pub fn run(ctx: &Context, meters: &str) -> Result<()> {
    let mut tracker = ctx.open();
    tracker.set_run_meters(coerce_number(meters))?;
    print_today(ctx, &tracker);
    Ok(())
}

pub fn commit(ctx: &Context) -> Result<()> {
    let mut tracker = ctx.open();
    let before = tracker.snapshot().level;
    let entry = tracker.commit()?;
    let snap = tracker.snapshot();

    println!(
        "{} {}",
        ctx.palette.green(&format!("+{} XP", thousands(entry.xp as f64))),
        ctx.palette.dim(&entry.memo)
    );
    if snap.level > before {
        println!(
            "{}",
            ctx.palette
                .bold(&format!("Level up! Lv {} 「{}」", snap.level, snap.title))
        );
    }
    println!();
    print!("{}", render_header(&ctx.palette, &snap));
    Ok(())
}

pub fn reset_today(ctx: &Context) -> Result<()> {
    let mut tracker = ctx.open();
    tracker.reset_today()?;
    println!("Today's input cleared");
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub fn hard_reset(ctx: &Context, yes: bool) -> Result<()> {
    if !yes && !confirm("Erase all data (total XP, history, today's input)?")? {
        println!("Aborted");
        return Ok(());
    }
    let mut tracker = ctx.open();
    tracker.hard_reset()?;
    println!("{}", ctx.palette.red("All data erased"));
    Ok(())
}

pub fn set_total(ctx: &Context, value: &str) -> Result<()> {
    let total = coerce_number(value).round() as i64;
    let mut tracker = ctx.open();
    tracker.override_total_xp(total)?;
    print!("{}", render_header(&ctx.palette, &tracker.snapshot()));
    Ok(())
}

pub fn export(ctx: &Context, out: Option<PathBuf>) -> Result<()> {
    let tracker = ctx.open();
    let path = out.unwrap_or_else(|| PathBuf::from(backup_file_name(tracker.state())));
    let blob = tracker.export()?;
    fs::write(&path, blob).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Backup written to {}", path.display());
    Ok(())
}

pub fn import(ctx: &Context, path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut tracker = ctx.open();
    match tracker.import(&bytes) {
        Ok(applied) if applied.is_empty() => {
            println!("Nothing to restore in {}", path.display());
        }
        Ok(applied) => {
            println!("Restored {} from {}", applied.join(", "), path.display());
            print!("{}", render_header(&ctx.palette, &tracker.snapshot()));
        }
        Err(TrackerError::MalformedBackup(reason)) => {
            bail!("{} is not a valid backup ({}); nothing was changed", path.display(), reason)
        }
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn config_show(ctx: &Context) -> Result<()> {
    let text = toml::to_string_pretty(&ctx.config).context("Failed to serialize configuration")?;
    print!("{}", text);
    println!("# data dir in use: {}", ctx.data_dir.display());
    Ok(())
}

pub fn config_path(explicit: Option<&Path>) -> Result<()> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => GymXpConfig::default_path()?,
    };
    println!("{}", path.display());
    Ok(())
}

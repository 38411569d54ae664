//! Terminal rendering for status and history.

use std::io::IsTerminal;

use gymxp_common::config::ColorMode;
use gymxp_common::draft::Volume;
use gymxp_common::format::thousands;
use gymxp_common::{LedgerEntry, ProgressSnapshot, ScoreBreakdown, SessionDraft};
use owo_colors::OwoColorize;

const BAR_WIDTH: usize = 30;

/// Applies colors only when enabled.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(mode: ColorMode) -> Self {
        let enabled = match mode {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => {
                std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
            }
        };
        Self { enabled }
    }

    pub fn bold(&self, s: &str) -> String {
        if self.enabled {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn green(&self, s: &str) -> String {
        if self.enabled {
            s.bright_green().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn cyan(&self, s: &str) -> String {
        if self.enabled {
            s.cyan().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn dim(&self, s: &str) -> String {
        if self.enabled {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    pub fn red(&self, s: &str) -> String {
        if self.enabled {
            s.red().to_string()
        } else {
            s.to_string()
        }
    }
}

/// `[#########---------]` for a 0-100 percentage.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

fn check(done: bool) -> &'static str {
    if done {
        "[x]"
    } else {
        "[ ]"
    }
}

fn volume_line(row: &impl Volume) -> String {
    format!(
        "{:>7} kg x {:>4} x {:>3}  = {:>8} XP",
        thousands(row.weight()),
        thousands(row.reps()),
        thousands(row.sets()),
        thousands(row.xp() as f64)
    )
}

pub fn render_header(p: &Palette, snap: &ProgressSnapshot) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Total XP:  {} XP\n",
        p.bold(&thousands(snap.total_xp as f64))
    ));
    out.push_str(&format!(
        "Level:     {} 「{}」\n",
        p.bold(&format!("Lv {}", snap.level)),
        p.cyan(snap.title)
    ));
    out.push_str(&format!(
        "Next:      {} XP to go  {} {:.0}%\n",
        thousands(snap.remaining as f64),
        progress_bar(snap.progress_percent, BAR_WIDTH),
        snap.progress_percent
    ));
    out
}

pub fn render_today(p: &Palette, draft: &SessionDraft, breakdown: &ScoreBreakdown) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}  ({})\n", p.bold("Today"), draft.date));

    for (i, item) in draft.items.iter().enumerate() {
        out.push_str(&format!(
            "  {} {} {:<20} {}\n",
            i,
            check(item.done),
            item.name,
            volume_line(item)
        ));
    }

    if draft.extras.is_empty() {
        out.push_str(&p.dim("  (no extras)\n"));
    } else {
        out.push_str("  Extras\n");
        for (i, extra) in draft.extras.iter().enumerate() {
            out.push_str(&format!(
                "  {} {} {:<20} {}\n",
                i,
                check(extra.done),
                extra.name,
                volume_line(extra)
            ));
        }
    }

    out.push_str(&format!(
        "  Bonus {} {:<18} {}\n",
        check(draft.leg_ext.done),
        "leg extension",
        volume_line(&draft.leg_ext)
    ));
    out.push_str(&format!(
        "  Bonus run: {} m\n\n",
        thousands(draft.run_meters)
    ));

    out.push_str(&format!(
        "  Base {} / Extras {} / Leg ext {} / Run {}\n",
        thousands(breakdown.base_sum),
        thousands(breakdown.extras_sum),
        thousands(breakdown.leg_ext_xp),
        thousands(breakdown.run_xp)
    ));
    out.push_str(&format!(
        "  Multiplier {:.2} (missing {}, added {})\n",
        breakdown.mult, breakdown.missing, breakdown.added
    ));
    out.push_str(&format!(
        "  Final: {}\n",
        p.green(&format!("{} XP", thousands(breakdown.final_xp as f64)))
    ));
    out
}

pub fn render_history(p: &Palette, notes: &[LedgerEntry], limit: Option<usize>) -> String {
    if notes.is_empty() {
        return p.dim("No sessions recorded yet\n");
    }
    let shown = limit.unwrap_or(notes.len()).min(notes.len());
    let mut out = String::new();
    for note in &notes[..shown] {
        out.push_str(&format!(
            "{}  {}  {}\n",
            note.date,
            p.green(&format!("+{} XP", thousands(note.xp as f64))),
            p.dim(&note.memo)
        ));
    }
    if shown < notes.len() {
        out.push_str(&p.dim(&format!("... {} older\n", notes.len() - shown)));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymxp_common::clock::fixed_clock;
    use gymxp_common::{score, LevelTable};

    fn plain() -> Palette {
        Palette::new(ColorMode::Never)
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(50.0, 4), "[##--]");
        assert_eq!(progress_bar(100.0, 4), "[####]");
        assert_eq!(progress_bar(250.0, 4), "[####]");
    }

    #[test]
    fn test_header_plain() {
        let snap = ProgressSnapshot::from_total(1500, LevelTable::standard());
        let text = render_header(&plain(), &snap);
        assert!(text.contains("1,500 XP"));
        assert!(text.contains("Lv 2"));
        assert!(text.contains("初級プロテイン飲み"));
        assert!(text.contains("1,032 XP to go"));
    }

    #[test]
    fn test_today_lists_rows() {
        let clock = fixed_clock();
        let draft = SessionDraft::fresh(&clock).toggle_item(0).add_extra(&clock);
        let text = render_today(&plain(), &draft, &score(&draft));
        assert!(text.contains("0 [x] チェストプレス"));
        assert!(text.contains("追加種目"));
        assert!(text.contains("Final: 360 XP"));
    }

    #[test]
    fn test_history_limit() {
        let notes: Vec<LedgerEntry> = (0..3)
            .map(|i| LedgerEntry {
                date: format!("2024-01-0{}", i + 1),
                xp: 1000 * i,
                memo: String::new(),
            })
            .collect();
        let text = render_history(&plain(), &notes, Some(2));
        assert!(text.contains("2024-01-01"));
        assert!(text.contains("+1,000 XP"));
        assert!(!text.contains("2024-01-03"));
        assert!(text.contains("1 older"));
        assert!(render_history(&plain(), &[], None).contains("No sessions"));
    }
}

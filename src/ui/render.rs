//! Text rendering for chat replies
//!
//! Renderers see only finished results, never odds or raw draws.

use std::fmt::Write;

use crate::core::error::IntelError;
use crate::core::types::Ledger;
use crate::espionage::report::{IntelCategory, IntelligenceReport};
use crate::espionage::result::MissionResult;
use crate::player::leaderboard::LeaderboardEntry;

pub fn section_header(title: &str) -> String {
    format!("━━━━ {} ━━━━", title)
}

fn join_counts(counts: &Ledger) -> String {
    if counts.is_empty() {
        return "none".to_string();
    }
    counts
        .iter()
        .map(|(name, n)| format!("{} {}", n, name))
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per category; buildings are summarized, the rest listed in full
fn render_report(out: &mut String, report: &IntelligenceReport) {
    for category in IntelCategory::ALL {
        let Some(entries) = report.get(category) else {
            continue;
        };
        let body = match category {
            IntelCategory::Buildings => {
                let highest = entries.iter().max_by_key(|(_, level)| **level);
                match highest {
                    Some((name, level)) => format!(
                        "{} structures, best is {} (level {})",
                        entries.len(),
                        name,
                        level
                    ),
                    None => "none".to_string(),
                }
            }
            IntelCategory::Tech => entries
                .iter()
                .map(|(name, level)| format!("{} L{}", name, level))
                .collect::<Vec<_>>()
                .join(", "),
            IntelCategory::Resources | IntelCategory::Units => join_counts(entries),
        };
        let _ = writeln!(out, "{}: {}", category.label(), body);
    }
}

/// Full mission debrief for the attacker
pub fn render_result(result: &MissionResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", section_header("Spy Mission"));
    let _ = writeln!(out, "Target: {} (#{})", result.target().name, result.target().id);
    let _ = writeln!(out, "Sent: {}", join_counts(result.units_sent()));
    let _ = writeln!(
        out,
        "Outcome: {}",
        if result.success() { "SUCCESS" } else { "FAILED" }
    );
    let _ = writeln!(
        out,
        "Status: {}",
        if result.detected() {
            "Detected by the target"
        } else {
            "Undetected"
        }
    );
    let _ = writeln!(out, "Losses: {}", join_counts(result.units_lost()));

    if let Some(report) = result.report() {
        let _ = writeln!(out, "{}", section_header("Intelligence"));
        if report.categories().is_empty() {
            let _ = writeln!(out, "Nothing of note.");
        }
        render_report(&mut out, report);
    }

    out
}

/// Alert text delivered to a defender who caught a spy
pub fn render_detection_alert(result: &MissionResult) -> String {
    let verdict = if result.success() {
        "They escaped with intelligence on your empire."
    } else {
        "The attempt was foiled."
    };
    format!(
        "🚨 Commander {} sent {} spies against you. {}",
        result.attacker().name,
        result.total_sent(),
        verdict
    )
}

/// Compact newest-first mission list
pub fn render_history(results: &[MissionResult]) -> String {
    let mut out = section_header("Mission Log");
    out.push('\n');
    if results.is_empty() {
        out.push_str("No missions yet.\n");
        return out;
    }
    for result in results {
        let _ = writeln!(
            out,
            "{} → {}: {}{}, lost {}",
            result.resolved_at().format("%Y-%m-%d %H:%M"),
            result.target().name,
            if result.success() { "success" } else { "failure" },
            if result.detected() { " (detected)" } else { "" },
            result.total_lost()
        );
    }
    out
}

pub fn render_leaderboard(entries: &[LeaderboardEntry]) -> String {
    let mut out = section_header("Leaderboard");
    out.push('\n');
    for entry in entries {
        let _ = writeln!(
            out,
            "{}. {} - {} power",
            entry.rank, entry.commander_name, entry.power_score
        );
    }
    out
}

/// What the player sees when a command fails
pub fn render_error(error: &IntelError) -> String {
    format!("⚠️ {}", error.user_message())
}

use anyhow::Result;
use colored::Colorize;
use std::io::Write;
use std::time::Duration;
use tourney_core::{PlayerRecord, SortKey};

use super::ScenarioResult;
use crate::replay::ReplaySummary;

#[allow(clippy::cast_precision_loss)]
fn success_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (passed as f64 / total as f64) * 100.0
}

fn result_label(result: &ScenarioResult) -> String {
    match result.seed {
        Some(seed) => format!("{} (seed {seed})", result.scenario_name),
        None => result.scenario_name.clone(),
    }
}

pub fn generate_console_report<W: Write>(
    writer: &mut W,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Logic Test Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "==============================".cyan())?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(writer, "Total scenarios: {total_tests}")?;
    writeln!(writer, "Passed: {}", passed_tests.to_string().green())?;
    writeln!(writer, "Failed: {}", failed_tests.to_string().red())?;
    writeln!(
        writer,
        "Success rate: {:.1}%",
        success_rate(passed_tests, total_tests)
    )?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(writer, "{} {}", status, result_label(result).bold())?;
        writeln!(
            writer,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(writer, "   Average time: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(writer, "   Failures:")?;
            for failure in &result.failures {
                writeln!(writer, "     • {}", failure.red())?;
            }
        }
        writeln!(writer)?;
    }

    let fastest = results.iter().min_by_key(|r| r.average_duration);
    let slowest = results.iter().max_by_key(|r| r.average_duration);
    if let (Some(fastest), Some(slowest)) = (fastest, slowest) {
        writeln!(writer, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(writer, "{}", "=====================".yellow())?;
        writeln!(
            writer,
            "Fastest: {} ({:?})",
            result_label(fastest).green(),
            fastest.average_duration
        )?;
        writeln!(
            writer,
            "Slowest: {} ({:?})",
            result_label(slowest).yellow(),
            slowest.average_duration
        )?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write>(writer: &mut W, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write>(writer: &mut W, results: &[ScenarioResult]) -> Result<()> {
    writeln!(writer, "# Tourney Logic Test Results\n")?;

    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let failed_tests = total_tests - passed_tests;

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Total scenarios**: {total_tests}")?;
    writeln!(writer, "- **Passed**: {passed_tests}")?;
    writeln!(writer, "- **Failed**: {failed_tests}")?;
    writeln!(
        writer,
        "- **Success rate**: {:.1}%\n",
        success_rate(passed_tests, total_tests)
    )?;

    writeln!(writer, "## Detailed Results\n")?;

    for result in results {
        let status = if result.passed { "✅" } else { "❌" };

        writeln!(writer, "### {} {}\n", status, result_label(result))?;
        writeln!(
            writer,
            "- **Iterations**: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(writer, "- **Average time**: {:?}", result.average_duration)?;

        if !result.failures.is_empty() {
            writeln!(writer, "- **Failures**:")?;
            for failure in &result.failures {
                writeln!(writer, "  - {failure}")?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

const LEADERBOARD_HEADERS: [&str; 7] = [
    "Player",
    "Clan",
    "Kills",
    "Kills/Event",
    "Avg Damage",
    "Avg Accuracy",
    "Events",
];

fn leaderboard_row(record: &PlayerRecord) -> [String; 7] {
    [
        record.player_name.clone(),
        record.clan_name.clone(),
        record.total_kills.to_string(),
        format!("{:.2}", record.kills_per_event),
        format!("{:.2}", record.average_damage),
        format!("{:.2}", record.average_accuracy),
        record.events.to_string(),
    ]
}

pub fn generate_console_leaderboard<W: Write>(
    writer: &mut W,
    roster: &[PlayerRecord],
    sort_key: SortKey,
    summary: &ReplaySummary,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "🏆 Player Statistics".bright_cyan().bold())?;
    writeln!(writer, "{}", "====================".cyan())?;
    writeln!(
        writer,
        "Replayed {} submissions: {} accepted, {} rejected",
        summary.total(),
        summary.accepted.to_string().green(),
        summary.rejected.len().to_string().red()
    )?;
    for rejection in &summary.rejected {
        writeln!(
            writer,
            "   • #{}: {}",
            rejection.position,
            rejection.reason.red()
        )?;
    }
    writeln!(writer, "Sorted by: {}", sort_key.label())?;
    writeln!(writer)?;

    if roster.is_empty() {
        writeln!(writer, "No players recorded yet.")?;
        return Ok(());
    }

    let rows: Vec<[String; 7]> = roster.iter().map(leaderboard_row).collect();
    let mut widths = LEADERBOARD_HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = LEADERBOARD_HEADERS
        .iter()
        .zip(widths)
        .map(|(title, width)| format!("{title:<width$}"))
        .collect();
    writeln!(writer, "{}", header.join("  ").bold())?;
    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(column, (cell, width))| {
                if column < 2 {
                    format!("{cell:<width$}")
                } else {
                    format!("{cell:>width$}")
                }
            })
            .collect();
        writeln!(writer, "{}", cells.join("  "))?;
    }
    Ok(())
}

pub fn generate_json_leaderboard<W: Write>(
    writer: &mut W,
    roster: &[PlayerRecord],
    sort_key: SortKey,
    summary: &ReplaySummary,
) -> Result<()> {
    let payload = serde_json::json!({
        "sortKey": sort_key,
        "accepted": summary.accepted,
        "rejected": summary.rejected,
        "players": roster,
    });
    writeln!(writer, "{}", serde_json::to_string_pretty(&payload)?)?;
    Ok(())
}

pub fn generate_markdown_leaderboard<W: Write>(
    writer: &mut W,
    roster: &[PlayerRecord],
    sort_key: SortKey,
    summary: &ReplaySummary,
) -> Result<()> {
    writeln!(writer, "# Player Statistics\n")?;
    writeln!(
        writer,
        "- **Submissions**: {} accepted, {} rejected",
        summary.accepted,
        summary.rejected.len()
    )?;
    writeln!(writer, "- **Sorted by**: {}\n", sort_key.label())?;

    if roster.is_empty() {
        writeln!(writer, "_No players recorded yet._")?;
        return Ok(());
    }

    writeln!(writer, "| {} |", LEADERBOARD_HEADERS.join(" | "))?;
    writeln!(writer, "|{}", "---|".repeat(LEADERBOARD_HEADERS.len()))?;
    for record in roster {
        writeln!(writer, "| {} |", leaderboard_row(record).join(" | "))?;
    }

    if !summary.rejected.is_empty() {
        writeln!(writer, "\n## Rejected submissions\n")?;
        for rejection in &summary.rejected {
            writeln!(writer, "- #{}: {}", rejection.position, rejection.reason)?;
        }
    }
    Ok(())
}

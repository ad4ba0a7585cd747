use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::acceptance::FairnessRecord;
use super::simulation::BatchRecord;

#[derive(Serialize)]
struct JsonReport<'a> {
    batches: &'a [BatchRecord],
    fairness: &'a [FairnessRecord],
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[BatchRecord],
    fairness: &[FairnessRecord],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Batch Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "========================".cyan())?;

    let total = records.len();
    let passed = records.iter().filter(|r| r.passed).count();
    writeln!(out, "Total batches: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for record in records {
        let status = if record.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} (seed {})",
            status,
            record.scenario.bold(),
            record.seed
        )?;
        writeln!(
            out,
            "   {} runs x {} spins @ {} | mean net {:.2} | best {} | worst {}",
            record.runs,
            record.spins,
            record.bet_size,
            record.mean_final_net,
            fmt_opt(record.best_final_net),
            fmt_opt(record.worst_final_net)
        )?;
        writeln!(
            out,
            "   win rate {:.2}% | mean volatility {:.2} | max drawdown {:.2} | digest {}",
            record.win_rate, record.mean_volatility, record.max_drawdown, record.trajectory_digest
        )?;
        for failure in &record.failures {
            writeln!(out, "     • {}", failure.red())?;
        }
    }

    if !fairness.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🎯 Even-money Fairness".bright_yellow().bold())?;
        writeln!(out, "{}", "======================".yellow())?;
        for record in fairness {
            let line = format!(
                "seed {}: observed {:.4} vs {:.4} (±{})",
                record.seed, record.observed_rate, record.expected_rate, record.tolerance
            );
            if record.passed {
                writeln!(out, "✅ {}", line.green())?;
            } else {
                writeln!(out, "❌ {}", line.red())?;
            }
        }
    }
    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    records: &[BatchRecord],
    fairness: &[FairnessRecord],
) -> Result<()> {
    let report = JsonReport {
        batches: records,
        fairness,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    records: &[BatchRecord],
    fairness: &[FairnessRecord],
) -> Result<()> {
    writeln!(out, "# SpinLab Batch Results\n")?;
    let passed = records.iter().filter(|r| r.passed).count();
    writeln!(out, "- **Batches**: {}", records.len())?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}\n", records.len() - passed)?;

    writeln!(
        out,
        "| Status | Scenario | Seed | Runs | Spins | Bet | Mean net | Win rate | Max drawdown |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|")?;
    for record in records {
        let status = if record.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {status} | {} | {} | {} | {} | {} | {:.2} | {:.2}% | {:.2} |",
            record.scenario,
            record.seed,
            record.runs,
            record.spins,
            record.bet_size,
            record.mean_final_net,
            record.win_rate,
            record.max_drawdown
        )?;
    }

    let failing: Vec<&BatchRecord> = records.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for record in failing {
            writeln!(out, "### {} (seed {})\n", record.scenario, record.seed)?;
            for failure in &record.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }

    if !fairness.is_empty() {
        writeln!(out, "\n## Even-money fairness\n")?;
        for record in fairness {
            let status = if record.passed { "✅" } else { "❌" };
            writeln!(
                out,
                "- {status} seed {}: observed {:.4}, expected {:.4}",
                record.seed, record.observed_rate, record.expected_rate
            )?;
        }
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, records: &[BatchRecord]) -> Result<()> {
    writeln!(
        out,
        "scenario,seed,runs,spins,bet_size,total_final_net,mean_final_net,best_final_net,worst_final_net,win_rate,mean_volatility,max_drawdown,tail_runs,trajectory_digest,duration_ms,passed"
    )?;
    for r in records {
        writeln!(
            out,
            "{},{},{},{},{},{:.4},{:.4},{},{},{:.4},{:.4},{:.4},{},{},{},{}",
            r.scenario,
            r.seed,
            r.runs,
            r.spins,
            r.bet_size,
            r.total_final_net,
            r.mean_final_net,
            r.best_final_net.map(|v| format!("{v:.4}")).unwrap_or_default(),
            r.worst_final_net.map(|v| format!("{v:.4}")).unwrap_or_default(),
            r.win_rate,
            r.mean_volatility,
            r.max_drawdown,
            r.tail_runs,
            r.trajectory_digest,
            r.duration_ms,
            r.passed
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record(passed: bool) -> BatchRecord {
        BatchRecord {
            scenario: "slot-balanced".to_string(),
            label: "Slot - Balanced (medium volatility)".to_string(),
            seed: 42,
            runs: 10,
            spins: 200,
            bet_size: 1.0,
            total_final_net: -80.0,
            mean_final_net: -8.0,
            best_final_net: Some(12.0),
            worst_final_net: None,
            win_rate: 38.5,
            mean_volatility: 6.25,
            max_drawdown: 31.0,
            tail_runs: 0,
            trajectory_digest: "0123456789abcdef".to_string(),
            duration_ms: 3,
            passed,
            failures: if passed {
                Vec::new()
            } else {
                vec!["fold: mismatch".to_string()]
            },
        }
    }

    fn sample_fairness() -> FairnessRecord {
        FairnessRecord {
            seed: 1337,
            spins: 10_000,
            expected_rate: 18.0 / 37.0,
            observed_rate: 0.5015,
            tolerance: 0.025,
            passed: true,
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn json_report_has_batches_and_fairness() {
        let text = render(|out| {
            generate_json_report(out, &[sample_record(true)], &[sample_fairness()])
        });
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["batches"][0]["scenario"], "slot-balanced");
        assert_eq!(value["fairness"][0]["seed"], 1337);
    }

    #[test]
    fn markdown_lists_failures() {
        let text = render(|out| {
            generate_markdown_report(out, &[sample_record(true), sample_record(false)], &[])
        });
        assert!(text.contains("# SpinLab Batch Results"));
        assert!(text.contains("- **Failed**: 1"));
        assert!(text.contains("fold: mismatch"));
    }

    #[test]
    fn csv_has_header_and_row_per_record() {
        let text = render(|out| generate_csv_report(out, &[sample_record(true)]));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("scenario,seed,runs"));
        assert!(lines[1].starts_with("slot-balanced,42,10,200,1,"));
        assert!(lines[1].contains(",12.0000,,"));
    }

    #[test]
    fn console_report_mentions_each_batch() {
        let text = render(|out| {
            generate_console_report(
                out,
                &[sample_record(false)],
                &[sample_fairness()],
                Duration::from_millis(5),
            )
        });
        assert!(text.contains("slot-balanced"));
        assert!(text.contains("fold: mismatch"));
        assert!(text.contains("seed 1337"));
    }
}

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

#[allow(clippy::cast_precision_loss)]
fn success_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (passed as f64 / results.len() as f64) * 100.0
}

fn tier_label(result: &ScenarioResult) -> &'static str {
    result.final_tier.map_or("-", |tier| tier.label())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Playthrough Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "==============================".cyan())?;

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();

    writeln!(out, "Total runs: {total_runs}")?;
    writeln!(out, "Passed: {}", passed_runs.to_string().green())?;
    writeln!(out, "Failed: {}", (total_runs - passed_runs).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };

        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;
        if let Some(averages) = result.final_averages {
            writeln!(
                out,
                "   Averages: TJ {:.1} | SM {:.1} | AD {:.1} ({})",
                averages.technical_judgment,
                averages.stakeholder_management,
                averages.adaptability,
                tier_label(result)
            )?;
        }

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }

    if let (Some(fastest), Some(slowest)) = (
        results.iter().min_by_key(|r| r.average_duration),
        results.iter().max_by_key(|r| r.average_duration),
    ) {
        writeln!(out, "{}", "⚡ Performance Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=====================".yellow())?;
        writeln!(
            out,
            "Fastest: {} ({:?})",
            fastest.scenario_name.green(),
            fastest.average_duration
        )?;
        writeln!(
            out,
            "Slowest: {} ({:?})",
            slowest.scenario_name.yellow(),
            slowest.average_duration
        )?;
    }

    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(out, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    generated_at: DateTime<Utc>,
) -> Result<()> {
    writeln!(out, "# Tech Scenario Solver Playthrough Results\n")?;
    writeln!(
        out,
        "_Generated {}_\n",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    let total_runs = results.len();
    let passed_runs = results.iter().filter(|r| r.passed).count();

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total_runs}")?;
    writeln!(out, "- **Passed**: {passed_runs}")?;
    writeln!(out, "- **Failed**: {}", total_runs - passed_runs)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(out, "| Run | Seed | Iterations | Tier | Avg time |")?;
    writeln!(out, "| --- | ---: | ---: | --- | ---: |")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            out,
            "| {} {} | {} | {}/{} | {} | {:?} |",
            status,
            result.scenario_name,
            result.seed,
            result.successful_iterations,
            result.iterations_run,
            tier_label(result),
            result.average_duration
        )?;
    }

    let failing: Vec<_> = results.iter().filter(|r| !r.failures.is_empty()).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failing {
            writeln!(out, "### {} (seed {})\n", result.scenario_name, result.seed)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::AnswerStrategy;
    use chrono::TimeZone;
    use solver_game::{CompetencyAverages, PerformanceTier, Track};

    fn sample_result(passed: bool) -> ScenarioResult {
        ScenarioResult {
            scenario_name: "AI Engineering / Best Answer".to_string(),
            track: Track::Ai,
            strategy: AnswerStrategy::Best,
            seed: 1337,
            passed,
            iterations_run: 3,
            successful_iterations: if passed { 3 } else { 2 },
            failures: if passed {
                Vec::new()
            } else {
                vec!["Iteration 3: boom".to_string()]
            },
            final_averages: Some(CompetencyAverages::new(9.0, 8.0, 8.0)),
            final_tier: Some(PerformanceTier::Excellent),
            average_duration: Duration::from_micros(40),
            performance_data: vec![Duration::from_micros(40)],
        }
    }

    fn render(f: impl FnOnce(&mut dyn Write) -> Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn console_report_lists_runs_and_performance() {
        colored::control::set_override(false);
        let results = [sample_result(true), sample_result(false)];
        let text = render(|out| generate_console_report(out, &results, Duration::from_millis(5)));
        assert!(text.contains("Total runs: 2"));
        assert!(text.contains("Success rate: 50.0%"));
        assert!(text.contains("TJ 9.0 | SM 8.0 | AD 8.0 (Excellent)"));
        assert!(text.contains("• Iteration 3: boom"));
        assert!(text.contains("Performance Summary"));
    }

    #[test]
    fn console_report_handles_no_results() {
        let text = render(|out| generate_console_report(out, &[], Duration::ZERO));
        assert!(text.contains("Success rate: 0.0%"));
        assert!(!text.contains("Performance Summary"));
    }

    #[test]
    fn markdown_report_has_table_and_failures() {
        let stamp = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let results = [sample_result(false)];
        let text = render(|out| generate_markdown_report(out, &results, stamp));
        assert!(text.starts_with("# Tech Scenario Solver Playthrough Results"));
        assert!(text.contains("_Generated 2026-10-17 12:00:00 UTC_"));
        assert!(text.contains("| ❌ AI Engineering / Best Answer | 1337 | 2/3 | Excellent |"));
        assert!(text.contains("## Failures"));
    }

    #[test]
    fn json_report_is_an_array() {
        let text = render(|out| generate_json_report(out, &[sample_result(true)]));
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["seed"], 1337);
        assert_eq!(parsed[0]["final_tier"], "excellent");
    }
}

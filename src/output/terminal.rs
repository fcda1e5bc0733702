//! Terminal output formatting with colors.

use colored::Colorize;

use crate::report::RunReport;

/// Format a [`RunReport`] for human-readable terminal output.
pub fn format_report(report: &RunReport) -> String {
    let mut output = String::new();

    let header = format!(
        "{} {}",
        "\u{2713}".green().bold(),
        "VERIFIED".green().bold()
    );
    output.push_str(&format!("{header}  {}\n", report.device.bold()));
    output.push_str(&format!(
        "n = {}, work group = {}, laps = {}\n",
        report.n, report.work_group_size, report.laps
    ));

    if let Some(ref log) = report.build_log {
        output.push_str(&format!("{}\n{}\n", "Build log:".dimmed(), log.trim()));
    }

    output.push_str(&format!(
        "Kernel:   {} \u{00b1} {} s\n",
        format_secs(report.kernel.avg_s).bold(),
        format_secs(report.kernel.std_s)
    ));
    output.push_str(&format!(
        "          {} GFLOPS, {} GiB/s device memory\n",
        format!("{:.2}", report.gflops).cyan().bold(),
        format!("{:.2}", report.memory_bandwidth_gib_s).cyan()
    ));
    output.push_str(&format!(
        "Readback: {} \u{00b1} {} s\n",
        format_secs(report.transfer.avg_s).bold(),
        format_secs(report.transfer.std_s)
    ));
    output.push_str(&format!(
        "          {} GiB/s device \u{2192} host\n",
        format!("{:.2}", report.transfer_bandwidth_gib_s).cyan()
    ));

    output
}

fn format_secs(s: f64) -> String {
    format!("{s:.6}")
}

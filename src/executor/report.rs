use colored::*;
use std::fmt::Display;

use crate::models::metrics::Metrics;

fn row(color: &str, label: &str, value: impl Display) {
    println!("\x1b[1;{}m{:<29}: \x1b[0m\x1b[1;97m{}\x1b[0m", color, label, value);
}

pub fn print_report(m: &Metrics) {
    let worker = format!(
        "{} cores, {} / {} bytes free",
        m.worker.cpu_cores, m.worker.available_memory, m.worker.total_memory
    );

    println!();
    println!("\x1b[1;97;44m🔥 ======== BULKHEAD TEST RESULTS ======== 🔥\x1b[0m");
    row("94", "⏰ Timestamp", &m.timestamp);
    row("94", "🎯 Target", format!("{} {}", m.http_method, m.target_url));
    row("94", "👥 Users / duration (s)", format!("{} / {}", m.users, m.duration_secs));
    row("92", "✅ Total requests", m.total_requests);
    row("92", "✅ Successful requests", m.successful_requests);
    row("91", "❌ Failed requests", m.failed_requests);
    row("91", "🧱 Bulkhead rejections", m.bulkhead_rejections);
    row("91", "❓ Unexpected statuses", m.unexpected_statuses);
    row("91", "🔌 Transport errors", m.transport_errors);
    row("96", "⚡ Fastest response (ms)", format!("{:.2}", m.fastest_response));
    row("93", "🐢 Slowest response (ms)", format!("{:.2}", m.slowest_response));
    row("95", "📊 Average response (ms)", format!("{:.2}", m.average_response_time));
    row("95", "📊 Median response time (ms)", format!("{:.2}", m.median_response_time));
    row("95", "📊 p95 response time (ms)", format!("{:.2}", m.p95_response_time));
    row("94", "📈 Requests per second (RPS)", format!("{:.2}", m.throughput));
    row("94", "🖥  Worker", worker);

    println!();
    println!("\x1b[1;97;44m📦 ======== STATUS BREAKDOWN ========\x1b[0m");
    for (status, count) in &m.status_counts {
        let label = if status == "200" { status.green().bold() } else { status.red().bold() };
        println!("• {}: {}", label, count.to_string().bold());
    }

    if !m.failures.is_empty() {
        println!();
        println!("\x1b[1;97;41m💥 ======== FAILURES ========\x1b[0m");
        for (reason, count) in &m.failures {
            println!("• {} {}", format!("{}x", count).red().bold(), reason);
        }
    }
}

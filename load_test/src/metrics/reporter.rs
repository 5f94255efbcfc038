//! Console reporter for metrics with real-time updates

use super::collector::MetricsCollector;
use std::io::{self, Write};
use tokio::time::{interval, Duration};

/// Longest failure message shown in the report tables.
const MAX_MESSAGE_WIDTH: usize = 96;

/// Start periodic metrics reporting (every N seconds)
pub async fn start_periodic_reporter(collector: MetricsCollector, interval_secs: u64) {
    let mut ticker = interval(Duration::from_secs(interval_secs.max(1)));

    loop {
        ticker.tick().await;

        // Update system metrics before printing
        collector.update_system_metrics();

        print_live_metrics(&collector);
    }
}

/// Print live metrics (clears screen and updates in place)
pub fn print_live_metrics(collector: &MetricsCollector) {
    // Clear screen and move cursor to top
    print!("\x1B[2J\x1B[1;1H");

    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_latency_percentiles();

    println!("╔════════════════════════════════════════════════════════════════╗");
    println!("║             Login Attempt Load Test - Live Metrics             ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n⏱️  Elapsed Time: {:02}:{:02}:{:02}",
        elapsed / 3600, (elapsed % 3600) / 60, elapsed % 60);

    println!("\n┌─ USERS ─────────────────────────────────────────────────────┐");
    println!("│  Spawned:      {:>8}    Active:     {:>8}              │",
        metrics.users.spawned, metrics.users.active);
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n┌─ REQUESTS ──────────────────────────────────────────────────┐");
    println!("│  Sent:         {:>8}                                      │",
        metrics.requests.sent);
    println!("│  Succeeded:    {:>8}    Failed:     {:>8}              │",
        metrics.requests.succeeded, metrics.requests.failed);

    if let Some(success_rate) = metrics.requests.success_rate() {
        let throughput = if elapsed > 0 {
            metrics.requests.sent as f64 / elapsed as f64
        } else {
            0.0
        };
        println!("│  Success Rate: {:>7.2}%    Throughput: {:>7.2}/sec        │",
            success_rate, throughput);
    }
    println!("└─────────────────────────────────────────────────────────────┘");

    if latency.count > 0 {
        println!("\n┌─ REQUEST LATENCY (ms) ──────────────────────────────────────┐");
        println!("│  Min: {:>6}  P50: {:>6}  P95: {:>6}  P99: {:>6}  Max: {:>6}│",
            latency.min, latency.p50, latency.p95, latency.p99, latency.max);
        println!("│  Mean: {:>8.2} ms    Count: {:>10}                    │",
            latency.mean, latency.count);
        println!("└─────────────────────────────────────────────────────────────┘");
    }

    println!("\n┌─ SYSTEM ────────────────────────────────────────────────────┐");
    println!("│  CPU Usage:    {:>6.1}%    Memory: {:>6} / {:>6} MB       │",
        metrics.system.cpu_usage, metrics.system.memory_used_mb, metrics.system.memory_total_mb);
    println!("└─────────────────────────────────────────────────────────────┘");

    println!("\n  [Press Ctrl+C to stop test]");

    // Flush stdout to ensure immediate display
    let _ = io::stdout().flush();
}

/// Print final summary report
pub fn print_final_report(collector: &MetricsCollector) {
    let metrics = collector.get_snapshot();
    let elapsed = collector.elapsed_seconds();
    let latency = collector.get_latency_percentiles();

    println!("\n╔════════════════════════════════════════════════════════════════╗");
    println!("║                    FINAL TEST REPORT                           ║");
    println!("╚════════════════════════════════════════════════════════════════╝");

    println!("\n👥 USERS");
    println!("   Total Spawned:        {:>10}", metrics.users.spawned);

    println!("\n📊 REQUESTS");
    println!("   Total Sent:           {:>10}", metrics.requests.sent);
    println!("   Total Succeeded:      {:>10}", metrics.requests.succeeded);
    println!("   Total Failed:         {:>10}", metrics.requests.failed);

    if elapsed > 0 {
        let throughput = metrics.requests.sent as f64 / elapsed as f64;
        println!("   Throughput:           {:>10.2} requests/sec", throughput);
    }

    if let Some(success_rate) = metrics.requests.success_rate() {
        println!("   Success Rate:         {:>10.2}%", success_rate);
    }

    if latency.count > 0 {
        println!("\n📈 REQUEST LATENCY");
        println!("   Min:                  {:>10} ms", latency.min);
        println!("   P50 (Median):         {:>10} ms", latency.p50);
        println!("   P95:                  {:>10} ms", latency.p95);
        println!("   P99:                  {:>10} ms", latency.p99);
        println!("   Max:                  {:>10} ms", latency.max);
        println!("   Mean:                 {:>10.2} ms", latency.mean);
    }

    if !metrics.failures.is_empty() {
        println!("\n❌ FAILURES");
        let mut failures: Vec<_> = metrics.failures.iter().collect();
        failures.sort_by(|a, b| b.1.cmp(a.1));
        for (message, count) in failures {
            println!("   {:>8}  {}", count, truncate(message, MAX_MESSAGE_WIDTH));
        }
    }

    if !metrics.tallies.is_empty() {
        println!("\n🔎 SERVICE VERDICTS");
        for (label, count) in &metrics.tallies {
            println!("   {:<22}{:>10}", format!("{}:", label), count);
        }
    }

    println!("\n⏱️  Test Duration: {} seconds", elapsed);
    println!("════════════════════════════════════════════════════════════════\n");
}

fn truncate(message: &str, width: usize) -> String {
    let single_line = message.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= width {
        single_line
    } else {
        let mut cut: String = single_line.chars().take(width).collect();
        cut.push('…');
        cut
    }
}

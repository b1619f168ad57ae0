//! Logging utilities
//!
//! Tracing setup plus the shared per-run and per-file progress helpers.

use std::path::Path;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// Honors `RUST_LOG`; defaults to `info` when unset. Safe to call more than
/// once; later calls are no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Log the start-of-run banner for a pipeline stage.
pub fn log_run_start(stage: &str, num_files: usize) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 {} run started - {}",
        stage,
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("📄 files to process: {}", num_files);
    info!("{}", "=".repeat(60));
}

/// Log the start of one input file.
pub fn log_file_start(index: usize, total: usize, input: &Path) {
    info!("");
    info!("=== Processing {} ({}/{}) ===", input.display(), index, total);
}

/// Log completion of one input file with its elapsed time.
pub fn log_file_done(index: usize, output: &Path, elapsed: Duration) {
    info!(
        "✓ [{}] done, output saved to {} ({})",
        index,
        output.display(),
        format_elapsed(elapsed)
    );
}

/// Format a duration the way the run reports it: `X min Y.ZZ sec`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total = elapsed.as_secs_f64();
    let minutes = (total / 60.0).floor() as u64;
    let seconds = total - minutes as f64 * 60.0;
    format!("{} min {:.2} sec", minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(0)), "0 min 0.00 sec");
        assert_eq!(format_elapsed(Duration::from_secs(61)), "1 min 1.00 sec");
        assert_eq!(
            format_elapsed(Duration::from_millis(125_500)),
            "2 min 5.50 sec"
        );
    }
}

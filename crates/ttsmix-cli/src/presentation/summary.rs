//! Run results on stdout.

use ttsmix_core::{NoiseStage, PipelineRun, RunOutcome};

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    #[allow(clippy::cast_precision_loss)] // display only
    let value = bytes as f64;
    if value < KIB {
        format!("{bytes} B")
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}

/// Print the artifacts of a finished run.
pub fn print_run_summary(run: &PipelineRun) {
    let RunOutcome::Succeeded { synthesis, noise } = &run.outcome else {
        return;
    };

    println!();
    println!("Job {}: {} file(s) in {}", run.lease, synthesis.success_count, synthesis.output_dir);
    println!("  Processing time: {:.2}s", synthesis.total_processing_time);
    for artifact in &synthesis.artifacts {
        println!("  {}", artifact.path());
    }

    match noise {
        NoiseStage::Skipped => {}
        NoiseStage::Mixed(report) => {
            println!("Noise-mixed file(s): {}", report.artifacts().len());
            for artifact in report.artifacts() {
                println!("  {}", artifact.path());
            }
        }
        NoiseStage::Failed(e) => {
            println!("⚠️  {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MiB");
    }
}

//! Synthesize handler.
//!
//! Runs one pipeline pass; Ctrl-C cancels the running job.

use std::future::Future;
use std::path::Path;

use anyhow::Result;
use ttsmix_core::{
    InputFile, PipelineResult, PipelineRun, RunOutcome, SynthesisInput, SynthesisJob,
    SynthesisOrchestrator,
};

use super::archive::save_archive;
use crate::bootstrap::CliContext;
use crate::commands::SynthesizeArgs;
use crate::error::CliError;
use crate::manifest::Manifest;
use crate::presentation::print_run_summary;

/// Execute the synthesize command.
pub async fn execute(ctx: &CliContext, args: SynthesizeArgs) -> Result<()> {
    execute_with_interrupt(ctx, args, ctrl_c()).await
}

/// Execute the synthesize command, cancelling when `interrupt` resolves.
pub async fn execute_with_interrupt<F>(
    ctx: &CliContext,
    args: SynthesizeArgs,
    interrupt: F,
) -> Result<()>
where
    F: Future<Output = ()>,
{
    let job = build_job(&args).await?;
    let run = run_until_interrupted(ctx.orchestrator(), job, interrupt)
        .await
        .map_err(CliError::from)?;

    print_run_summary(&run);
    match run.outcome {
        RunOutcome::Succeeded { .. } => {}
        RunOutcome::Failed(e) => return Err(CliError::from(e).into()),
        RunOutcome::Cancelled => return Err(CliError::Cancelled.into()),
    }

    let Some(manifest) = Manifest::from_snapshot(&ctx.orchestrator().snapshot()) else {
        // Cleared between the run and now
        return Err(CliError::Cancelled.into());
    };

    if let Some(path) = &args.manifest {
        manifest.save(path).await?;
        println!("✓ Manifest written to {}", path.display());
    }

    if let Some(path) = &args.archive {
        let zip_filename = ctx
            .backend()
            .request_output_dir_archive(&manifest.output_dir)
            .await
            .map_err(CliError::from)?;
        save_archive(ctx.backend().as_ref(), &zip_filename, path).await?;
    }

    Ok(())
}

/// Run the pipeline; when `interrupt` fires first, cancel the job and wait
/// for the run to settle.
pub async fn run_until_interrupted<F>(
    orchestrator: &SynthesisOrchestrator,
    job: SynthesisJob,
    interrupt: F,
) -> PipelineResult<PipelineRun>
where
    F: Future<Output = ()>,
{
    let run = orchestrator.synthesize(job);
    tokio::pin!(run);

    tokio::select! {
        biased;
        result = &mut run => result,
        () = interrupt => {
            tracing::debug!("Interrupt received, cancelling job");
            orchestrator.cancel();
            run.await
        }
    }
}

/// Resolves on Ctrl-C; never resolves if the signal cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C; cancellation disabled");
        std::future::pending::<()>().await;
    }
}

/// Assemble the job from arguments, reading the input file if given.
async fn build_job(args: &SynthesizeArgs) -> Result<SynthesisJob, CliError> {
    let file = match &args.file {
        Some(path) => Some(read_input_file(path).await?),
        None => None,
    };

    Ok(SynthesisJob::new(SynthesisInput::new(args.text.clone(), file))
        .with_params(args.params())
        .with_noise(args.noise_mode()))
}

async fn read_input_file(path: &Path) -> Result<InputFile, CliError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CliError::Io(format!("{}: {e}", path.display())))?;
    let filename = path
        .file_name()
        .map_or_else(|| "input.txt".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(InputFile::new(filename, bytes))
}

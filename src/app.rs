//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - loads the model artifact and builds the pipeline
//! - runs single/batch predictions or light-curve synthesis
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{BatchArgs, Command, CurveArgs, InitModelArgs, ModelArgs, PredictArgs};
use crate::domain::{RawObservation, TransitParams, VettingFlags};
use crate::error::PipelineError;
use crate::model::ModelArtifact;
use crate::pipeline::Pipeline;
use crate::validate::BoundsTable;

/// Entry point for the `tvet` binary.
pub fn run() -> Result<(), PipelineError> {
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Predict(args) => handle_predict(args),
        Command::Batch(args) => handle_batch(args),
        Command::Curve(args) => handle_curve(args),
        Command::InitModel(args) => handle_init_model(args),
    }
}

/// Load the artifact and build the pipeline; any inconsistency is fatal
/// before the first prediction.
fn build_pipeline(args: &ModelArgs) -> Result<Pipeline, PipelineError> {
    let artifact = ModelArtifact::from_json_file(&args.model)?;
    Ok(Pipeline::new(&artifact, BoundsTable::builtin())?.with_top_k(args.top_k))
}

fn handle_predict(args: PredictArgs) -> Result<(), PipelineError> {
    let pipeline = build_pipeline(&args.model)?;

    let obs = RawObservation {
        transit: TransitParams {
            period: Some(args.period),
            depth: Some(args.depth),
            duration: Some(args.duration),
            impact: args.impact,
            model_snr: args.snr,
        },
        planet: None,
        star: None,
        flags: args.score.map(|score| VettingFlags {
            disposition_score: Some(score),
            ..VettingFlags::default()
        }),
    };

    let result = pipeline.predict(&obs)?;
    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| PipelineError::Io(format!("failed to serialize result: {e}")))?;
        println!("{json}");
    } else {
        println!("{}", crate::report::format_prediction(&result));
    }
    Ok(())
}

fn handle_batch(args: BatchArgs) -> Result<(), PipelineError> {
    let pipeline = build_pipeline(&args.model)?;
    let rows = crate::io::ingest::load_batch_rows(&args.input)?;
    let report = crate::batch::run_rows(&pipeline, &rows, None);

    println!("{}", crate::report::format_batch_summary(&report));

    if let Some(path) = &args.export {
        let file = std::fs::File::create(path).map_err(|e| {
            PipelineError::Io(format!("failed to create report '{}': {e}", path.display()))
        })?;
        serde_json::to_writer_pretty(file, &report)
            .map_err(|e| PipelineError::Io(format!("failed to write report: {e}")))?;
    }
    Ok(())
}

fn handle_curve(args: CurveArgs) -> Result<(), PipelineError> {
    let points = crate::curve::synthesize_with_noise(
        args.period,
        args.depth,
        args.duration,
        args.impact,
        args.noise,
        args.seed,
    )?;
    let json = serde_json::to_string_pretty(&points)
        .map_err(|e| PipelineError::Io(format!("failed to serialize curve: {e}")))?;
    println!("{json}");
    Ok(())
}

fn handle_init_model(args: InitModelArgs) -> Result<(), PipelineError> {
    let artifact = ModelArtifact::demonstration();
    artifact.to_json_file(&args.out)?;
    println!("wrote demonstration artifact to {}", args.out.display());
    Ok(())
}

//! Command implementations for the repertoire CLI.

use std::fs;
use std::path::Path;

use crate::cli::args::{Command, PredictArgs, RepertoireArgs, SimilarArgs, TrainArgs};
use crate::cli::output::{TrainingSummary, format_report, print_json};
use crate::corpus::Corpus;
use crate::error::{RepertoireError, Result};
use crate::metrics::{classification_report, confusion_matrix, unique_labels};
use crate::model::GenreModel;
use crate::plot::render_confusion_matrix;
use crate::similarity::{SimilarityQuery, find_similar};
use crate::split::split_train_test;

/// Execute a CLI command.
pub fn execute_command(args: RepertoireArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train(train_args.clone(), &args),
        Command::Predict(predict_args) => predict(predict_args.clone(), &args),
        Command::Similar(similar_args) => similar(similar_args.clone(), &args),
    }
}

/// Train a classifier and persist the artifacts.
fn train(args: TrainArgs, cli_args: &RepertoireArgs) -> Result<()> {
    if cli_args.verbosity() > 1 {
        println!("Loading corpus from: {}", args.csv.display());
    }

    let corpus = Corpus::load_csv(&args.csv)?;
    if corpus.is_empty() {
        return Err(RepertoireError::input("no valid rows found in CSV"));
    }

    let split = split_train_test(&corpus.texts(), &corpus.genres(), args.test_size, args.seed)?;
    log::info!(
        "split {} rows into {} train / {} test (stratified: {})",
        corpus.len(),
        split.train_len(),
        split.test_len(),
        split.stratified
    );

    let model = GenreModel::fit(args.algorithm.into(), &split.train_texts, &split.train_labels)?;
    let y_pred = model.predict_labels(&split.test_texts)?;

    let report = classification_report(&split.test_labels, &y_pred);
    let labels = unique_labels(&split.test_labels);
    let matrix = confusion_matrix(&split.test_labels, &y_pred, &labels);

    model.save(&args.model_out)?;
    write_report(&report, &args.report_out)?;
    render_confusion_matrix(&matrix, &args.matrix_out)?;

    let labels_path = args
        .report_out
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join("labels.txt");
    fs::write(&labels_path, labels.join("\n"))?;

    let summary = TrainingSummary {
        rows: corpus.len(),
        train_rows: split.train_len(),
        test_rows: split.test_len(),
        algorithm: model.metadata().algorithm.clone(),
        model_path: args.model_out.display().to_string(),
        report_path: args.report_out.display().to_string(),
        matrix_path: args.matrix_out.display().to_string(),
        labels_path: labels_path.display().to_string(),
    };

    if cli_args.verbosity() > 0 {
        println!("=== Training complete ===");
        println!("Rows: {}", summary.rows);
        println!("Model: {}", summary.model_path);
        println!("Metrics: {}", summary.report_path);
        println!("Confusion matrix: {}", summary.matrix_path);
        println!("\n--- Classification report ---\n");
        println!("{}", format_report(&report));
    } else {
        print_json(&summary, cli_args.pretty)?;
    }

    Ok(())
}

/// Predict a genre for free text or title/artist/memo parts.
fn predict(args: PredictArgs, cli_args: &RepertoireArgs) -> Result<()> {
    let text = args.input_text();
    if text.is_empty() {
        return Err(RepertoireError::input("input text is empty"));
    }

    if cli_args.verbosity() > 1 {
        println!("Loading model from: {}", args.model.display());
    }

    let model = GenreModel::load(&args.model)?;
    let prediction = model.predict(&text, args.top_k)?;

    print_json(&prediction, cli_args.pretty)
}

/// Rank corpus records by similarity to an id or free-text query.
fn similar(args: SimilarArgs, cli_args: &RepertoireArgs) -> Result<()> {
    let corpus = Corpus::load_csv(&args.csv)?;

    let query = match (&args.id, &args.query) {
        (Some(id), _) if !id.trim().is_empty() => SimilarityQuery::Id(id.trim().to_string()),
        (_, Some(text)) if !text.trim().is_empty() => SimilarityQuery::Text(text.clone()),
        _ => {
            return Err(RepertoireError::input("provide --id or --query"));
        }
    };

    if cli_args.verbosity() > 1 {
        println!("Searching {} records", corpus.len());
    }

    let hits = find_similar(&corpus, &query, args.top_n)?;
    print_json(&hits, cli_args.pretty)
}

fn write_report(report: &crate::metrics::ClassificationReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

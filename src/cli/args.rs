//! Command line argument parsing for the repertoire CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::classifier::Algorithm;

/// Repertoire - genre classification and similarity search for song lists
#[derive(Parser, Debug, Clone)]
#[command(name = "repertoire")]
#[command(about = "Genre classification and similarity search for song repertoires")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct RepertoireArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RepertoireArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a genre classifier from a labeled CSV
    Train(TrainArgs),

    /// Predict a genre with a trained model
    Predict(PredictArgs),

    /// Find similar records in a CSV corpus
    Similar(SimilarArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the training CSV
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Classifier type
    #[arg(long, value_enum, default_value = "svm")]
    pub algorithm: AlgorithmChoice,

    /// Fraction of rows held out for testing
    #[arg(long, default_value = "0.2")]
    pub test_size: f64,

    /// Seed for the train/test split
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Output path for the model artifact
    #[arg(long, default_value = "models/model.json")]
    pub model_out: PathBuf,

    /// Output path for the JSON classification report
    #[arg(long, default_value = "outputs/metrics.json")]
    pub report_out: PathBuf,

    /// Output path for the confusion-matrix image
    #[arg(long, default_value = "outputs/confusion_matrix.png")]
    pub matrix_out: PathBuf,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Path to the trained model artifact
    #[arg(long, default_value = "models/model.json")]
    pub model: PathBuf,

    /// Song title
    #[arg(long, default_value = "")]
    pub title: String,

    /// Artist name
    #[arg(long, default_value = "")]
    pub artist: String,

    /// Free-form memo
    #[arg(long, default_value = "")]
    pub memo: String,

    /// Free text query (takes precedence over title/artist/memo)
    #[arg(long, default_value = "")]
    pub text: String,

    /// Number of ranked genres to return
    #[arg(long, default_value = "3")]
    pub top_k: usize,
}

impl PredictArgs {
    /// Combine the inputs into one query text, free text first.
    pub fn input_text(&self) -> String {
        let text = self.text.trim();
        if !text.is_empty() {
            return text.to_string();
        }

        format!("{} {} {}", self.title, self.artist, self.memo)
            .trim()
            .to_string()
    }
}

/// Arguments for similarity search
#[derive(Parser, Debug, Clone)]
pub struct SimilarArgs {
    /// Path to the corpus CSV
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Record id to use as the query
    #[arg(long)]
    pub id: Option<String>,

    /// Free text query
    #[arg(long)]
    pub query: Option<String>,

    /// Number of results to return
    #[arg(long, default_value = "10")]
    pub top_n: usize,
}

/// Classifier choices exposed on the CLI
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum AlgorithmChoice {
    /// Linear-margin SVM (default)
    Svm,
    /// Logistic regression
    Logreg,
    /// Multinomial naive Bayes
    Nb,
}

impl From<AlgorithmChoice> for Algorithm {
    fn from(choice: AlgorithmChoice) -> Self {
        match choice {
            AlgorithmChoice::Svm => Algorithm::Svm,
            AlgorithmChoice::Logreg => Algorithm::Logreg,
            AlgorithmChoice::Nb => Algorithm::Nb,
        }
    }
}

//! Command-line interface and the interactive prediction loop.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::sync::mpsc;

use crate::config::{ExperimentConfig, Solver};
use crate::error::{LogitError, Result};
use crate::export::RunSummary;
use crate::pipeline::run_experiment;
use crate::predict::{Prediction, Predictor};
use crate::report;

/// Entering this value ends the interactive loop.
pub const SENTINEL: f64 = -1.0;

const PROMPT: &str = "Hours studied (-1 to quit): ";
const FAREWELL: &str = "Interrupted. Goodbye!";

#[derive(Debug, Parser)]
#[command(name = "study-logit")]
#[command(about = "Predict pass/fail from hours studied with logistic regression")]
#[command(version)]
pub struct Cli {
    /// JSON configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of synthetic observations
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Seed for both data generation and the split
    #[arg(long)]
    pub seed: Option<u64>,

    /// Share of observations held out for evaluation
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Iteration budget of the optimizer
    #[arg(long)]
    pub max_iter: Option<usize>,

    #[arg(long, value_enum)]
    pub solver: Option<Solver>,

    /// Step size for gradient descent
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Mini-batch size for gradient descent; full batch when omitted
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Also write a JSON summary of the run to FILE
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Example input for the report (repeatable)
    #[arg(long = "example", value_name = "HOURS", allow_negative_numbers = true)]
    pub examples: Vec<f64>,

    /// Print the report and exit without prompting
    #[arg(long)]
    pub no_interactive: bool,
}

impl Cli {
    /// Configuration file (or defaults) with command-line overrides applied.
    pub fn experiment_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_json_file(path)?,
            None => ExperimentConfig::default(),
        };
        if let Some(n) = self.samples {
            config.data.n_samples = n;
        }
        if let Some(seed) = self.seed {
            config.data.seed = seed;
            config.split.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            config.split.test_fraction = fraction;
        }
        if let Some(max_iter) = self.max_iter {
            config.training.max_iter = max_iter;
        }
        if let Some(solver) = self.solver {
            config.training.solver = solver;
        }
        if let Some(rate) = self.learning_rate {
            config.training.learning_rate = rate;
        }
        if let Some(size) = self.batch_size {
            config.training.batch_size = Some(size);
        }
        if !self.examples.is_empty() {
            config.prediction.examples = self.examples.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parses one line of user input as a finite number of hours.
pub fn parse_hours(input: &str) -> Result<f64> {
    let input = input.trim();
    let hours: f64 = input.parse().map_err(|source| LogitError::Parse {
        input: input.to_string(),
        source,
    })?;
    if !hours.is_finite() {
        return Err(LogitError::InvalidInput(format!(
            "{} is not a finite number of hours",
            input
        )));
    }
    Ok(hours)
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineOutcome {
    Exit,
    Predicted(Prediction),
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Sentinel,
    EndOfInput,
    Interrupted,
}

/// State of an interactive session.
#[derive(Debug)]
pub struct Session {
    predictor: Predictor,
    predictions: usize,
}

impl Session {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor,
            predictions: 0,
        }
    }

    /// Number of predictions served so far.
    pub fn predictions(&self) -> usize {
        self.predictions
    }

    pub fn handle_line(&mut self, line: &str) -> LineOutcome {
        let hours = match parse_hours(line) {
            Ok(hours) => hours,
            Err(e) => return LineOutcome::Invalid(e.to_string()),
        };
        if hours == SENTINEL {
            return LineOutcome::Exit;
        }
        self.predictions += 1;
        LineOutcome::Predicted(self.predictor.predict(hours))
    }
}

/// Runs the prompt loop until the sentinel, end of input or `interrupt` resolves.
pub async fn drive<W, F>(
    session: &mut Session,
    lines: &mut mpsc::Receiver<String>,
    interrupt: F,
    out: &mut W,
) -> io::Result<LoopExit>
where
    W: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(interrupt);
    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        tokio::select! {
            biased;
            _ = &mut interrupt => {
                writeln!(out)?;
                writeln!(out, "{}", FAREWELL)?;
                return Ok(LoopExit::Interrupted);
            }
            line = lines.recv() => {
                let Some(line) = line else {
                    writeln!(out)?;
                    return Ok(LoopExit::EndOfInput);
                };
                match session.handle_line(&line) {
                    LineOutcome::Exit => {
                        writeln!(out, "Goodbye!")?;
                        return Ok(LoopExit::Sentinel);
                    }
                    LineOutcome::Predicted(prediction) => {
                        report::write_prediction(out, &prediction)?;
                        writeln!(out)?;
                    }
                    LineOutcome::Invalid(message) => {
                        writeln!(out, "Error: {}. Enter a number, or -1 to quit.", message)?;
                    }
                }
            }
        }
    }
}

/// Forwards stdin lines to a channel from a detached blocking thread.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read stdin");
                    break;
                }
            }
        }
    });
    rx
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "could not install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli
        .experiment_config()
        .context("failed to assemble configuration")?;
    let experiment = run_experiment(&config).context("experiment failed")?;
    let predictor = experiment.predictor(&config);

    let mut out = io::stdout();
    report::write_experiment(&mut out, &experiment, &config, &predictor)
        .context("failed to write report")?;

    if let Some(path) = &cli.json {
        RunSummary::new(&experiment, &config, &predictor)
            .save(path)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    if cli.no_interactive {
        return Ok(());
    }

    writeln!(out)?;
    writeln!(out, "Interactive mode: enter hours studied to get a prediction.")?;
    let mut session = Session::new(predictor);
    let mut lines = spawn_stdin_reader();
    let exit = drive(&mut session, &mut lines, ctrl_c(), &mut out).await?;
    tracing::info!(?exit, predictions = session.predictions(), "interactive session ended");
    Ok(())
}

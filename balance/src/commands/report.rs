//! Balance sweep over many seeded runs.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use simulator::{RunConfig, run_balance_report};

use super::OutputFormat;
use crate::OPTIMAL_THREAD_COUNT;

/// Simulate `runs` independent runs and print the aggregate report
#[derive(Parser, Debug)]
pub struct Report {
    /// Number of runs to simulate
    #[arg(short = 'n', long, default_value_t = 1000)]
    runs: u64,

    /// Run configuration (TOML, snake_case or camelCase keys)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base seed; run `i` uses `seed + i`. Random when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of acts per run
    #[arg(long)]
    acts: Option<u32>,

    /// Hallway floors per act, the boss not included
    #[arg(long)]
    floors: Option<u32>,

    /// Ascension level (0-10)
    #[arg(short, long)]
    ascension: Option<i64>,

    /// Worker threads, defaults to the number of logical cores
    #[arg(short, long)]
    workers: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Report {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read run config {}", path.display()))?;
                toml::from_str::<RunConfig>(&raw)
                    .with_context(|| format!("invalid run config {}", path.display()))?
            }
            None => RunConfig::default(),
        };
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(acts) = self.acts {
            config.acts = acts;
        }
        if let Some(floors) = self.floors {
            config.floors = floors;
        }
        if let Some(ascension) = self.ascension {
            config.ascension = ascension;
        }
        if config.acts == 0 {
            anyhow::bail!("a run needs at least one act");
        }
        Ok(config)
    }

    pub fn execute(self) -> Result<()> {
        let config = self.run_config()?;
        let workers = self.workers.unwrap_or(*OPTIMAL_THREAD_COUNT);
        tracing::info!(runs = self.runs, workers, ?config, "starting balance report");

        let report = run_balance_report(self.runs, &config, workers);
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => print!("{report}"),
        }
        Ok(())
    }
}

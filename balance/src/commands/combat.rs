use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use simulator::SimulationTemplate;

use super::OutputFormat;

/// Play one combat template and print the outcome
#[derive(Parser, Debug)]
pub struct Combat {
    /// Combat template (TOML)
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Seed override
    #[arg(short, long)]
    seed: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Combat {
    pub fn execute(self) -> Result<()> {
        let raw = std::fs::read_to_string(&self.template)
            .with_context(|| format!("failed to read template {}", self.template.display()))?;
        let mut template = toml::from_str::<SimulationTemplate>(&raw)
            .with_context(|| format!("invalid template {}", self.template.display()))?;
        template.source = Some(self.template.display().to_string());
        if self.seed.is_some() {
            template.seed = self.seed;
        }

        let result = template.run()?;
        match self.format {
            OutputFormat::Text => print!("{result}"),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "outcome": result.short_str(),
                    "record": result.inner_ref(),
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
        }
        Ok(())
    }
}

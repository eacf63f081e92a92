mod combat;
mod report;

pub use combat::Combat;
pub use report::Report;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human readable summary
    Text,
    /// Pretty-printed JSON
    Json,
}

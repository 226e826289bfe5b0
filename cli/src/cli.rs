//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for llm-council
#[derive(Parser, Debug)]
#[command(name = "llm-council")]
#[command(version, about = "LLM Council - a council of models deliberates on your question")]
#[command(long_about = r#"
llm-council convenes several LLMs over OpenRouter to deliberate on a question.

The deliberation has three stages:
1. First Opinions: every councilor answers the question in parallel
2. Cross Review: each councilor ranks the others' anonymized answers
3. Synthesis: the chairman merges answers and reviews into one verdict

Requires OPENROUTER_API_KEY in the environment. The final verdict is
printed to stdout as JSON; progress and logs go to stderr.

Configuration is loaded from (in priority order):
1. COUNCIL_* environment variables
2. --config <path>      Explicit config file
3. ./council.toml       Project-level config
4. ~/.config/llm-council/config.toml   Global config

Example:
  llm-council "What's the best way to handle errors in Rust?"
  llm-council --fast "Summarize the tradeoffs of microservices"
"#)]
pub struct Cli {
    /// The question to put before the council (words are joined by spaces)
    #[arg(value_name = "QUESTION")]
    pub question: Vec<String>,

    /// Skip the cross-review stage (cheaper and faster, less thorough)
    #[arg(long)]
    pub fast: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Fix the anonymization seed for reproducible review orderings
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

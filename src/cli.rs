//! CLI argument parsing for the deliverables generator.
//!
//! The CLI stays thin: it collects inputs and output preferences, and the
//! pipeline owns every decision about validity and fallbacks.
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "compass",
    version,
    about = "Generate structured marketing deliverables from a business prompt",
    after_help = "Commands:\n  generate <PROMPT>       Run one generation and print the deliverables\n  session                 Read prompts from stdin, one generation per line\n  check [--raw <PATH>]    Validate raw model output offline\n  bundles                 List bundle presets\n\nEnvironment:\n  GEMINI_API_KEY          API credential (a missing key yields a fallback draft)\n  COMPASS_GEMINI_ENDPOINT Endpoint override\n  COMPASS_CONFIG          Config file path override\n  COMPASS_LOG             Log filter (default: warn)\n\nExamples:\n  compass generate \"Launch a meal-prep service\" --bundle landing_email\n  compass generate \"Sell handmade mugs\" --bundle ads_pack --json\n  compass check --raw response.txt --show-raw",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    Generate(GenerateArgs),
    Session(SessionArgs),
    Check(CheckArgs),
    /// List bundle presets and their instructions
    Bundles,
}

/// Inputs shared by every generation.
#[derive(Args, Debug, Clone)]
pub struct RequestArgs {
    /// Business type for context
    #[arg(long, value_name = "TYPE", default_value = "general")]
    pub business_type: String,

    /// Bundle preset (landing_email, ads_pack, offer_pricing, outreach_pack, custom)
    #[arg(long, value_name = "BUNDLE", default_value = "custom")]
    pub bundle: String,

    /// Project title for context
    #[arg(long, value_name = "TITLE", default_value = "Compass Generation")]
    pub project_title: String,

    /// JSON config file (defaults to <config dir>/compass/config.json)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Output preferences shared by commands that print a report.
#[derive(Args, Debug, Clone, Copy)]
pub struct OutputArgs {
    /// Include the raw model output
    #[arg(long)]
    pub show_raw: bool,

    /// Emit machine-readable JSON output
    #[arg(long)]
    pub json: bool,
}

/// Generate command inputs for a single run.
#[derive(Parser, Debug)]
#[command(about = "Generate a deliverables package from a prompt")]
pub struct GenerateArgs {
    /// Describe what you want generated
    #[arg(value_name = "PROMPT")]
    pub prompt: String,

    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Session command inputs for a limited run of generations.
#[derive(Parser, Debug)]
#[command(about = "Read prompts from stdin and generate until the free limit is reached")]
pub struct SessionArgs {
    /// Free generations for this session (defaults to config free_limit, else 3)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    #[command(flatten)]
    pub request: RequestArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Check command inputs for offline validation.
#[derive(Parser, Debug)]
#[command(about = "Run extraction and validation on raw model output")]
pub struct CheckArgs {
    /// File holding raw model text (reads stdin when omitted)
    #[arg(long, value_name = "PATH")]
    pub raw: Option<PathBuf>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        RootArgs::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let args = RootArgs::parse_from(["compass", "generate", "Launch a bakery"]);
        let Command::Generate(args) = args.command else {
            panic!("expected generate");
        };
        assert_eq!(args.prompt, "Launch a bakery");
        assert_eq!(args.request.business_type, "general");
        assert_eq!(args.request.bundle, "custom");
        assert_eq!(args.request.project_title, "Compass Generation");
        assert!(!args.output.json);
    }

    #[test]
    fn test_session_rejects_zero_limit() {
        assert!(RootArgs::try_parse_from(["compass", "session", "--limit", "0"]).is_err());
    }
}

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufRead, Read, Write};
use tracing_subscriber::EnvFilter;

mod bundle;
mod cli;
mod config;
mod deliverables;
mod extract;
mod gateway;
mod pipeline;
mod prompt;
mod render;

use bundle::Bundle;
use cli::{CheckArgs, Command, GenerateArgs, OutputArgs, RequestArgs, RootArgs, SessionArgs};
use gateway::Gateway;
use pipeline::{check_raw_text, run_generation, GenerationReport, UsageCounter};
use prompt::GenerationRequest;

const LOG_ENV: &str = "COMPASS_LOG";

fn main() -> Result<()> {
    init_tracing();
    let args = RootArgs::parse();

    match args.command {
        Command::Generate(args) => cmd_generate(args),
        Command::Session(args) => cmd_session(args),
        Command::Check(args) => cmd_check(args),
        Command::Bundles => cmd_bundles(),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn cmd_generate(args: GenerateArgs) -> Result<()> {
    let request = build_request(&args.prompt, &args.request)?;
    let settings = config::load_settings(args.request.config.as_deref())?;
    let gateway = Gateway::from_settings(&settings);
    let report = run_generation(&gateway, &request);
    write_report(&mut io::stdout().lock(), &report, args.output)
}

fn cmd_session(args: SessionArgs) -> Result<()> {
    let settings = config::load_settings(args.request.config.as_deref())?;
    let gateway = Gateway::from_settings(&settings);
    let mut counter = UsageCounter::new(args.limit.unwrap_or(settings.free_limit));
    let mut stdout = io::stdout().lock();

    for line in io::stdin().lock().lines() {
        let line = line.context("read prompt from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        eprintln!(
            "Free generations left: {} / {}",
            counter.remaining(),
            counter.limit()
        );
        let request = build_request(&line, &args.request)?;
        let report = run_generation(&gateway, &request);
        counter = counter.consumed();
        write_report(&mut stdout, &report, args.output)?;
        if counter.is_exhausted() {
            eprintln!("Free limit reached.");
            break;
        }
    }
    Ok(())
}

fn cmd_check(args: CheckArgs) -> Result<()> {
    let raw = match &args.raw {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?
        }
        None => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .context("read raw output from stdin")?;
            raw
        }
    };
    let report = check_raw_text(&raw);
    write_report(&mut io::stdout().lock(), &report, args.output)
}

fn cmd_bundles() -> Result<()> {
    let mut stdout = io::stdout().lock();
    for bundle in Bundle::ALL {
        writeln!(stdout, "{:<14} {}", bundle.tag(), bundle.instructions())
            .context("write bundle list")?;
    }
    Ok(())
}

fn build_request(prompt: &str, args: &RequestArgs) -> Result<GenerationRequest> {
    GenerationRequest::new(prompt, &args.business_type, &args.bundle, &args.project_title)
}

fn write_report(out: &mut impl Write, report: &GenerationReport, output: OutputArgs) -> Result<()> {
    let text = if output.json {
        let mut json = render::render_json(report, output.show_raw)?;
        json.push('\n');
        json
    } else {
        render::render_text(report, output.show_raw)
    };
    out.write_all(text.as_bytes()).context("write report")?;
    out.flush().context("flush report")
}

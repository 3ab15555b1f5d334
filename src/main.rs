//! webstep - natural-language browser automation
//!
//! Main entry point for the CLI application.

use clap::Parser;
use serde_json::Value;
use webstep::{Agent, Config, RunReport};

/// webstep - turn a request into browser actions and run them
#[derive(Parser, Debug)]
#[command(name = "webstep")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Natural-language request to plan and execute
    #[arg(long, short = 'p', conflicts_with = "plan")]
    prompt: Option<String>,

    /// Path to a JSON file containing a raw step array to execute directly
    #[arg(long, conflicts_with = "prompt")]
    plan: Option<std::path::PathBuf>,

    /// Planner model override
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Disable per-site selector heuristics
    #[arg(long)]
    no_heuristics: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Pretty-print the JSON report
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.planner.model = model.clone();
    }

    if args.headed {
        config.browser.headed = true;
    }

    if args.no_heuristics {
        config.run.site_heuristics = false;
    }

    if args.debug {
        config.run.debug = true;
    }

    let agent = Agent::with_config(config);

    let report = match (&args.prompt, &args.plan) {
        (Some(prompt), None) => agent.run_prompt(prompt).await?,
        (None, Some(path)) => {
            let content = std::fs::read_to_string(path)?;
            let raw: Vec<Value> = serde_json::from_str(&content)?;
            agent.run_plan(&raw).await?
        }
        _ => {
            anyhow::bail!("provide exactly one of --prompt or --plan");
        }
    };

    print_report(&report, args.pretty)?;

    if !report.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

/// Print the run report as JSON
fn print_report(report: &RunReport, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    println!("{}", json);
    Ok(())
}

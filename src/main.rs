//! testpilot: natural-language browser tests from the command line.
//!
//! Wires the collaborators together: the parser turns an instruction into a
//! scenario, the runner executes it against a Chrome tab, the reporter keeps
//! score and writes the JSON report at exit.

use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use action_executor::{ActionExecutor, ExecutorConfig};
use page_driver::{ChromeDriver, LaunchProfile, PageDriver, WaitMode};
use prompt_parser::{OpenAiParser, ParserSettings, ScenarioParser};
use run_report::{JsonReporter, ScenarioReport};
use scenario_flow::{RunnerConfig, ScenarioRunner};

const BUILD_DATE: &str = env!("BUILD_DATE");
const GIT_HASH: &str = env!("GIT_HASH");

#[derive(Parser, Debug)]
#[command(
    name = "testpilot",
    version,
    about = "Run browser tests described in plain language"
)]
struct Cli {
    /// Page to open before the first scenario.
    #[arg(long)]
    base_url: Option<String>,

    /// Where to write the JSON report.
    #[arg(long, default_value = "testpilot-report.json")]
    report: PathBuf,

    /// Run with a visible browser window.
    #[arg(long)]
    headed: bool,

    /// Run a single instruction and exit instead of the interactive loop.
    #[arg(long)]
    prompt: Option<String>,

    /// Chat-completions endpoint override.
    #[arg(long)]
    endpoint: Option<String>,

    /// Model override.
    #[arg(long)]
    model: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    info!(build = BUILD_DATE, commit = GIT_HASH, "testpilot starting");

    let api_key = std::env::var("OPENAI_API_KEY")
        .context("OPENAI_API_KEY is not set; put it in the environment or a .env file")?;
    let mut settings = ParserSettings::new(api_key);
    if let Some(endpoint) = &cli.endpoint {
        settings = settings.with_endpoint(endpoint);
    }
    if let Some(model) = &cli.model {
        settings = settings.with_model(model);
    }
    let parser = OpenAiParser::new(settings)?;

    let profile = LaunchProfile {
        headless: !cli.headed,
        ..Default::default()
    };
    let driver = task::spawn_blocking(move || ChromeDriver::launch(&profile))
        .await
        .context("browser launch task failed")??;
    let driver: Arc<dyn PageDriver> = Arc::new(driver);

    if let Some(base_url) = &cli.base_url {
        if let Err(err) = driver
            .navigate(base_url, WaitMode::NetworkIdle, Duration::from_secs(30))
            .await
        {
            warn!(url = %base_url, error = %err, "could not open the base url, continuing");
        }
    }

    let executor = Arc::new(ActionExecutor::new(driver, ExecutorConfig::default()));
    let runner = ScenarioRunner::new(executor, RunnerConfig::default());
    let mut reporter = JsonReporter::new(&cli.report);

    match &cli.prompt {
        Some(instruction) => {
            run_instruction(&parser, &runner, &mut reporter, instruction).await;
        }
        None => interactive_loop(&parser, &runner, &mut reporter).await?,
    }

    reporter.flush()?;
    let summary = reporter.summary();
    println!(
        "{} run, {} passed, {} failed; report at {}",
        summary.run,
        summary.passed,
        summary.failed,
        reporter.path().display()
    );
    Ok(())
}

async fn interactive_loop(
    parser: &OpenAiParser,
    runner: &ScenarioRunner,
    reporter: &mut JsonReporter,
) -> Result<()> {
    println!("Describe a test in plain language; 'quit' to finish.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let instruction = line.trim();
        if instruction.is_empty() {
            continue;
        }
        if matches!(instruction, "quit" | "exit") {
            break;
        }

        run_instruction(parser, runner, reporter, instruction).await;
    }
    Ok(())
}

async fn run_instruction(
    parser: &OpenAiParser,
    runner: &ScenarioRunner,
    reporter: &mut JsonReporter,
    instruction: &str,
) {
    let scenario = match parser.parse(instruction).await {
        Ok(scenario) => scenario,
        Err(err) => {
            warn!(error = %err, "could not turn the instruction into a scenario");
            println!("could not parse the instruction: {err}");
            return;
        }
    };

    println!(
        "running '{}' ({} actions)",
        scenario.name,
        scenario.actions.len()
    );
    let result = runner.run(&scenario).await;

    let verdict = if result.passed() { "PASS" } else { "FAIL" };
    println!("{verdict}  {}", scenario.name);
    if let Some(error) = &result.error {
        println!("      {error}");
    }

    reporter.record(ScenarioReport::from_result(&result, &scenario.description));
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn report_path_has_a_default() {
        let cli = Cli::parse_from(["testpilot", "--prompt", "click login"]);
        assert_eq!(cli.report, PathBuf::from("testpilot-report.json"));
        assert!(!cli.headed);
    }
}

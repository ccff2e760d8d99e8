//! Agent commands: stdin payload in, one JSON object out.

use ampere_core::{
    read_payload, Agent, AnalysisAgent, BillParserAgent, Config, ConfigError, FootprintAgent,
    FootprintMode, LlmProvider, LlmProviderFactory, OpenWeatherClient, Outcome, OutputWriter,
    PredictionAgent, RecommendationAgent, WeatherSource,
};
use std::io;
use std::process::ExitCode;
use std::sync::Arc;

use super::types::Provider;

/// Which agent a command runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AgentKind {
    Footprint,
    Co2,
    Recommend,
    ParseBill,
    Predict,
    Analyze,
}

/// Flags shared by every agent command.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub provider: Option<Provider>,
    pub model: Option<String>,
    pub strict: bool,
    pub pretty: bool,
}

/// Run one agent over stdin and write its outcome to stdout.
///
/// Every failure, including a broken config or a missing credential, still
/// produces exactly one JSON object on stdout.
pub async fn execute(
    kind: AgentKind,
    options: &RunOptions,
    config: Result<Config, ConfigError>,
) -> ExitCode {
    let outcome = match run(kind, options, config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("{e}");
            Outcome::Failure(e.to_string())
        }
    };

    let success = outcome.is_success();
    let mut writer = OutputWriter::new(io::stdout().lock(), options.pretty);
    if let Err(e) = writer.write(outcome) {
        tracing::error!("Failed to write result: {e}");
        return ExitCode::FAILURE;
    }

    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

async fn run(
    kind: AgentKind,
    options: &RunOptions,
    config: Result<Config, ConfigError>,
) -> anyhow::Result<Outcome> {
    // Input problems are reported before configuration problems.
    let payload = read_payload(io::stdin().lock())?;
    let config = config?;

    let provider_name = options
        .provider
        .map(|p| p.to_string())
        .unwrap_or_else(|| config.llm.provider.clone());
    let provider: Arc<dyn LlmProvider> = Arc::from(LlmProviderFactory::create(
        &provider_name,
        &config.llm,
        options.model.as_deref(),
    )?);
    tracing::debug!(provider = %provider_name, ?kind, "Agent ready");

    let agent = build_agent(kind, provider, &config);
    let outcome = agent.run(&payload).await;
    Ok(if options.strict {
        agent.validate(outcome)
    } else {
        outcome
    })
}

fn build_agent(kind: AgentKind, provider: Arc<dyn LlmProvider>, config: &Config) -> Box<dyn Agent> {
    let weather = || -> Arc<dyn WeatherSource> {
        let client = OpenWeatherClient::from_config(&config.weather);
        if !client.has_credential() {
            tracing::debug!("No weather API key configured, predictions use seasonal patterns only");
        }
        Arc::new(client)
    };

    match kind {
        AgentKind::Footprint => Box::new(FootprintAgent::new(
            provider,
            &config.agent,
            FootprintMode::Savings,
        )),
        AgentKind::Co2 => Box::new(FootprintAgent::new(
            provider,
            &config.agent,
            FootprintMode::Impact,
        )),
        AgentKind::Recommend => Box::new(RecommendationAgent::new(provider, &config.agent)),
        AgentKind::ParseBill => Box::new(BillParserAgent::new(provider, &config.agent)),
        AgentKind::Predict => Box::new(PredictionAgent::new(provider, &config.agent, weather())),
        AgentKind::Analyze => Box::new(AnalysisAgent::new(provider, &config.agent, weather())),
    }
}

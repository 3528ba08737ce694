//! MedAgent REPL
//!
//! Headless line-oriented surface for the MedAgent dispatch core. Reads
//! one utterance per line from stdin, runs the classify/dispatch cycle,
//! and prints transcript entries as they are appended.
//!
//! # Usage
//!
//! ```bash
//! # Requires a Gemini API key
//! GEMINI_API_KEY=... medagent-repl
//!
//! # With verbose logging
//! GEMINI_API_KEY=... RUST_LOG=debug medagent-repl
//! ```
//!
//! # Environment Variables
//!
//! - `GEMINI_API_KEY` (or `API_KEY`): classifier API key (required)
//! - `MEDAGENT_MODEL`: classification model (default: gemini-2.5-flash)
//! - `MEDAGENT_BASE_URL`: classifier API base URL
//! - `MEDAGENT_HANDLER_LATENCY_MS`: simulated specialist latency
//! - `MEDAGENT_HANDOFF_MS`: hand-off pause before invocation
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;

use medagent_core::{
    CoreConfig, CoreMessage, Dispatcher, GeminiClassifier, SimulatedSpecialists, Speaker,
    SubmitOutcome,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medagent_repl=info".parse()?)
                .add_directive("medagent_core=info".parse()?),
        )
        .with_target(true)
        .init();

    let config = CoreConfig::from_env();
    let classifier = GeminiClassifier::from_config(&config)
        .context("GEMINI_API_KEY (or API_KEY) is not set")?;
    let specialists =
        SimulatedSpecialists::new(config.handler_latency).with_jitter(config.handler_latency / 4);

    let (tx, mut rx) = mpsc::channel::<CoreMessage>(100);
    let dispatcher = Dispatcher::new(classifier, specialists, config, tx);
    let session = dispatcher.new_session();

    info!(session_id = %session.lock().await.id.0, "Session started");

    // Print core messages as they arrive
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            match msg {
                CoreMessage::EntryAppended { entry } => match entry.speaker {
                    Speaker::User => {}
                    Speaker::Handler => {
                        let name = entry
                            .responding_agent
                            .map_or("?", |agent| agent.display_name());
                        println!("\n[{name}]\n{}\n", entry.text);
                    }
                },
                CoreMessage::PhaseChanged { phase } => {
                    eprintln!("... {}", phase.description());
                }
                CoreMessage::AgentActivated { .. } | CoreMessage::Notify { .. } => {}
            }
        }
    });

    // Print the welcome entry seeded into the session
    if let Some(entry) = session.lock().await.last_entry() {
        let name = entry
            .responding_agent
            .map_or("?", |agent| agent.display_name());
        println!("\n[{name}]\n{}\n", entry.text);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match dispatcher.submit(&session, &line).await {
            SubmitOutcome::Completed { .. } | SubmitOutcome::Recovered => {}
            SubmitOutcome::RejectedWhileBusy => {
                info!("Submission ignored: a request is already in flight");
            }
            SubmitOutcome::EmptyUtterance => {}
        }
    }

    info!("stdin closed, shutting down");
    Ok(())
}

use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result};
use pitchcoach::Config;
use pitchcoach::engine::Evaluator;
use pitchcoach::feedback::{FeedbackReport, render_text};
use pitchcoach::session::SessionManager;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Evaluate { file, text, json } => {
            let pitch = read_pitch(file.as_deref(), text).await?;
            let sessions = session_manager(&config)?;
            let session_id = sessions.create_session()?;

            let cancel = cancel_on_ctrl_c();
            let report = sessions
                .submit_pitch_with_cancel(&session_id, &pitch, &cancel)
                .await?;
            print_report(&report, json)
        }
        Commands::Session { json } => {
            let sessions = session_manager(&config)?;
            super::session_loop::run(&sessions, json).await
        }
        Commands::Gateway { port, host } => {
            let host = host.unwrap_or_else(|| config.gateway.host.clone());
            let port = port.unwrap_or(config.gateway.port);
            pitchcoach::gateway::run_gateway(&host, port, config).await
        }
        Commands::Rubric { json } => {
            let rubric = config.build_rubric()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rubric)?);
            } else {
                for dimension in &rubric {
                    println!(
                        "{:<12} weight {:.2}  {}",
                        dimension.label, dimension.weight, dimension.description
                    );
                }
            }
            Ok(())
        }
    }
}

fn session_manager(config: &Config) -> Result<SessionManager> {
    let evaluator = Evaluator::from_config(config)?;
    Ok(SessionManager::new(Arc::new(evaluator)))
}

async fn read_pitch(file: Option<&Path>, text: Option<String>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read pitch from {}", path.display()));
    }
    let mut pitch = String::new();
    tokio::io::stdin()
        .read_to_string(&mut pitch)
        .await
        .context("Failed to read pitch from stdin")?;
    Ok(pitch)
}

/// Token cancelled by the first Ctrl-C.
pub(super) fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let watcher = cancel.clone();
    tokio::spawn(async move {
        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                if signal.is_ok() {
                    eprintln!("\nCancelling...");
                    watcher.cancel();
                }
            }
            () = watcher.cancelled() => {}
        }
    });
    cancel
}

pub(super) fn print_report(report: &FeedbackReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

use super::dispatch::{cancel_on_ctrl_c, print_report};
use anyhow::Result;
use pitchcoach::error::PitchError;
use pitchcoach::session::SessionManager;
use tokio::io::{AsyncBufReadExt, BufReader};

const SEPARATOR: &str = "---";

/// Interactive revision loop over stdin. Each revision ends with a line
/// containing only `---` (or EOF); Ctrl-C cancels the running evaluation.
pub async fn run(sessions: &SessionManager, json: bool) -> Result<()> {
    let session_id = sessions.create_session()?;
    eprintln!("Session {session_id} started.");
    eprintln!("Paste your pitch, then a line with only {SEPARATOR} to evaluate it. Ctrl-D to finish.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffer = String::new();

    loop {
        let line = lines.next_line().await?;
        let at_eof = line.is_none();
        match line {
            Some(line) if line.trim() != SEPARATOR => {
                buffer.push_str(&line);
                buffer.push('\n');
                continue;
            }
            _ => {}
        }

        if !buffer.trim().is_empty() {
            let cancel = cancel_on_ctrl_c();
            let result = sessions
                .submit_pitch_with_cancel(&session_id, &buffer, &cancel)
                .await;
            // Stops the Ctrl-C watcher for this revision.
            cancel.cancel();
            match result {
                Ok(report) => print_report(&report, json)?,
                Err(PitchError::Cancelled) => {
                    eprintln!("Evaluation cancelled; nothing was recorded.");
                    break;
                }
                Err(e) if e.is_input_error() => eprintln!("Rejected: {e}"),
                Err(e) => return Err(e.into()),
            }
            buffer.clear();
        }

        if at_eof {
            break;
        }
        eprintln!("\nRevise and submit again, or Ctrl-D to finish.");
    }

    let revisions = sessions.revisions(&session_id)?.len();
    sessions.end_session(&session_id)?;
    eprintln!("Session ended after {revisions} revision(s).");
    Ok(())
}

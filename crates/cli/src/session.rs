use std::future::Future;
use std::io::{self, Write};

use autostream_agent::{DialogueController, ReplySink};
use autostream_core::ConversationState;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

pub const BANNER: &str = "🚀 AutoStream AI Agent (Gemini 2.5 Flash) — type 'exit' to quit";
pub const PROMPT: &str = "User: ";

const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    Quit,
    EndOfInput,
    Interrupted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub end: SessionEnd,
    pub turns: usize,
    pub captures: usize,
}

/// Writes each utterance on its own line as soon as it is produced.
struct LineSink<'a, W: Write> {
    out: &'a mut W,
    failure: Option<io::Error>,
}

impl<W: Write> ReplySink for LineSink<'_, W> {
    fn send(&mut self, utterance: &str) {
        if self.failure.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.out, "{utterance}").and_then(|()| self.out.flush()) {
            self.failure = Some(error);
        }
    }
}

pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    EXIT_WORDS.iter().any(|word| line.eq_ignore_ascii_case(word))
}

/// Runs one terminal conversation until `exit`/`quit`, end of input, or
/// `shutdown` resolving.
pub async fn run_session<R, W, S>(
    controller: &DialogueController,
    history_capacity: usize,
    input: R,
    output: &mut W,
    shutdown: S,
) -> io::Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: Future<Output = ()>,
{
    let mut state = ConversationState::new(history_capacity);
    let mut summary = SessionSummary { end: SessionEnd::EndOfInput, turns: 0, captures: 0 };
    let mut lines = input.lines();
    tokio::pin!(shutdown);

    info!(
        event_name = "system.session.started",
        correlation_id = %state.session_id(),
        fallback_available = controller.fallback_available(),
        "chat session started"
    );
    writeln!(output, "{BANNER}")?;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let next = tokio::select! {
            line = lines.next_line() => line?,
            () = &mut shutdown => {
                summary.end = SessionEnd::Interrupted;
                break;
            }
        };
        let Some(line) = next else {
            summary.end = SessionEnd::EndOfInput;
            break;
        };

        if is_exit_command(&line) {
            summary.end = SessionEnd::Quit;
            break;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut sink = LineSink { out: &mut *output, failure: None };
        let report = controller.handle_turn(&mut state, &line, &mut sink).await;
        if let Some(error) = sink.failure {
            return Err(error);
        }

        summary.turns += 1;
        if report.captured {
            summary.captures += 1;
        }
    }

    match summary.end {
        SessionEnd::Quit => writeln!(output, "Bye.")?,
        SessionEnd::EndOfInput | SessionEnd::Interrupted => writeln!(output, "\nBye.")?,
    }
    output.flush()?;

    info!(
        event_name = "system.session.ended",
        correlation_id = %state.session_id(),
        end = ?summary.end,
        turns = summary.turns,
        captures = summary.captures,
        "chat session ended"
    );
    Ok(summary)
}

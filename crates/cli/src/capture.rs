use std::io::{self, Write};

use autostream_agent::LeadCapture;
use autostream_core::CompletedLead;
use tracing::warn;

/// Prints the captured lead to stdout, in line with the conversation.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleLeadCapture;

pub fn capture_notice(lead: &CompletedLead) -> String {
    format!("\n✅ Lead captured successfully: {}, {}, {}\n", lead.name, lead.email, lead.platform)
}

impl LeadCapture for ConsoleLeadCapture {
    fn name(&self) -> &'static str {
        "console_lead_capture"
    }

    fn capture(&self, lead: &CompletedLead) {
        let mut stdout = io::stdout().lock();
        let written = writeln!(stdout, "{}", capture_notice(lead)).and_then(|()| stdout.flush());
        if let Err(error) = written {
            warn!(event_name = "lead.capture_output_failed", error = %error, "could not print captured lead");
        }
    }
}

// src/cli/render.rs — Text rendering for outcomes, settings and history
//
// Pure functions: everything returns a String so the REPL decides where it
// goes (responses to stdout, everything else to stderr).

use std::fmt::Write;

use crate::core::controller::GenerationOutcome;
use crate::core::generation::{GenerationConfig, SafetyPolicy};
use crate::core::session::Exchange;
use crate::util::one_line_preview;

const PREVIEW_LEN: usize = 60;

/// Which history entries to show in full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expand {
    None,
    /// 1-based chronological index, as shown in the entry title.
    One(usize),
    All,
}

pub fn quota_message(detail: &str) -> String {
    format!(
        "[quota exceeded] You've hit the free tier limit. Please:\n  \
         1. Wait until tomorrow for daily limits to reset\n  \
         2. Upgrade to a paid plan at https://ai.google.com\n\n\
         Details: {detail}"
    )
}

pub fn error_message(detail: &str) -> String {
    format!("[error] {detail}")
}

pub fn discovery_warning(detail: &str) -> String {
    format!("[warn] Could not fetch available models: {detail}")
}

/// Status text for a failed or skipped submission. `None` on success.
pub fn outcome_message(outcome: &GenerationOutcome) -> Option<String> {
    match outcome {
        GenerationOutcome::Success(_) => None,
        GenerationOutcome::QuotaExceeded(detail) => Some(quota_message(detail)),
        GenerationOutcome::ProviderError(detail) => Some(error_message(detail)),
        GenerationOutcome::EmptyPrompt => None,
        GenerationOutcome::CredentialMissing => {
            Some("Enter an API key first (/key).".to_string())
        }
    }
}

pub fn settings_view(model: Option<&str>, config: &GenerationConfig, safety: &SafetyPolicy) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "  Model:             {}", model.unwrap_or("(none)"));
    let _ = writeln!(out, "  Temperature:       {:.2}   (0.0-1.0)", config.temperature());
    let _ = writeln!(out, "  Top-p:             {:.2}   (0.0-1.0)", config.top_p());
    let _ = writeln!(out, "  Top-k:             {}   (0-100)", config.top_k());
    let _ = writeln!(out, "  Max output tokens: {}   (10-2048)", config.max_output_tokens());
    let _ = writeln!(out, "  Safety:");
    for s in safety.settings() {
        let _ = writeln!(
            out,
            "    {:<18} {:?} ({})",
            s.category.label(),
            s.threshold,
            s.threshold.level()
        );
    }
    out
}

/// Render history most recent first. Entry titles keep their chronological
/// number, so "Prompt 1" is always the first submission.
pub fn render_history(history: &[Exchange], expand: Expand) -> String {
    if history.is_empty() {
        return "  No prompts in this session yet.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Past prompts and responses ({}):", history.len());

    for (idx, exchange) in history.iter().enumerate().rev() {
        let number = idx + 1;
        let open = match expand {
            Expand::All => true,
            Expand::One(n) => n == number,
            Expand::None => false,
        };

        if open {
            let _ = writeln!(
                out,
                "v Prompt {number}  [{}]  {}",
                exchange.model(),
                exchange.recorded_at().format("%H:%M:%S")
            );
            let _ = writeln!(out, "  Prompt:");
            let _ = writeln!(out, "{}", exchange.prompt());
            let _ = writeln!(out, "  Response:");
            let _ = writeln!(out, "{}", exchange.response());
        } else {
            let _ = writeln!(
                out,
                "> Prompt {number}  [{}]  {}",
                exchange.model(),
                one_line_preview(exchange.prompt(), PREVIEW_LEN)
            );
        }
    }
    out
}

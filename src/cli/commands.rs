// src/cli/commands.rs — Slash command parsing and setting updates

use super::render::Expand;
use crate::core::generation::GenerationConfig;

/// A sampling control adjustable from the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Temperature,
    TopP,
    TopK,
    MaxTokens,
}

impl Setting {
    fn label(&self) -> &'static str {
        match self {
            Setting::Temperature => "Temperature",
            Setting::TopP => "Top-p",
            Setting::TopK => "Top-k",
            Setting::MaxTokens => "Max output tokens",
        }
    }

    fn usage(&self) -> &'static str {
        match self {
            Setting::Temperature => "/temperature <0.0-1.0>",
            Setting::TopP => "/top-p <0.0-1.0>",
            Setting::TopK => "/top-k <0-100>",
            Setting::MaxTokens => "/max-tokens <10-2048>",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SlashCommand {
    Help,
    Quit,
    /// Re-enter the API key.
    Key,
    Models,
    /// Switch model; `None` opens the picker.
    Model(Option<String>),
    Settings,
    Set(Setting, String),
    History(Expand),
    Unknown(String),
    /// Recognised command with an unusable argument.
    Invalid(String),
}

/// Parse a line starting with `/`. Anything else, including `//...`, is a
/// prompt.
pub fn parse(input: &str) -> Option<SlashCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') || trimmed.starts_with("//") {
        return None;
    }

    let (cmd, arg) = match trimmed.split_once(char::is_whitespace) {
        Some((c, a)) => (c, a.trim()),
        None => (trimmed, ""),
    };

    let command = match cmd {
        "/help" | "/?" => SlashCommand::Help,
        "/quit" | "/exit" => SlashCommand::Quit,
        "/key" => SlashCommand::Key,
        "/models" => SlashCommand::Models,
        "/model" if arg.is_empty() => SlashCommand::Model(None),
        "/model" => SlashCommand::Model(Some(arg.to_string())),
        "/settings" | "/status" => SlashCommand::Settings,
        "/temperature" | "/temp" => SlashCommand::Set(Setting::Temperature, arg.to_string()),
        "/top-p" | "/top_p" => SlashCommand::Set(Setting::TopP, arg.to_string()),
        "/top-k" | "/top_k" => SlashCommand::Set(Setting::TopK, arg.to_string()),
        "/max-tokens" | "/max_tokens" => SlashCommand::Set(Setting::MaxTokens, arg.to_string()),
        "/history" => match arg {
            "" => SlashCommand::History(Expand::None),
            "all" => SlashCommand::History(Expand::All),
            n => match n.parse::<usize>() {
                Ok(i) if i > 0 => SlashCommand::History(Expand::One(i)),
                _ => SlashCommand::Invalid(format!("Usage: /history [N|all], got '{n}'")),
            },
        },
        other => SlashCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// The text to submit for a non-command line. A leading `//` escapes a
/// prompt that itself starts with `/`.
pub fn prompt_text(input: &str) -> &str {
    match input.strip_prefix("//") {
        Some(_) => &input[1..],
        None => input,
    }
}

/// Apply a setting change and describe the stored value.
///
/// Values outside the control's range are clamped, never rejected. Only
/// unparseable input is an error.
pub fn apply_setting(
    config: &mut GenerationConfig,
    setting: Setting,
    arg: &str,
) -> Result<String, String> {
    if arg.is_empty() {
        return Err(format!("Usage: {}", setting.usage()));
    }

    let stored = match setting {
        Setting::Temperature | Setting::TopP => {
            let v: f32 = arg
                .parse()
                .map_err(|_| format!("Invalid number: {arg}"))?;
            let stored = if setting == Setting::Temperature {
                config.set_temperature(v)
            } else {
                config.set_top_p(v)
            };
            format!("{stored:.2}")
        }
        Setting::TopK | Setting::MaxTokens => {
            // Negative input is below every lower bound; clamp via 0.
            let v: i64 = arg
                .parse()
                .map_err(|_| format!("Invalid number: {arg}"))?;
            let v = v.clamp(0, u32::MAX as i64) as u32;
            let stored = if setting == Setting::TopK {
                config.set_top_k(v)
            } else {
                config.set_max_output_tokens(v)
            };
            stored.to_string()
        }
    };

    Ok(format!("{} set to {}", setting.label(), stored))
}

pub fn help_text() -> &'static str {
    "Type a prompt and press Enter to generate. End a line with \\ to continue on the next line.\n\
     Slash commands:\n  \
     /model [name]        Pick a model (list picker without a name)\n  \
     /models              List available models\n  \
     /temperature <f>     Set temperature (0.0-1.0)\n  \
     /top-p <f>           Set top-p (0.0-1.0)\n  \
     /top-k <n>           Set top-k (0-100)\n  \
     /max-tokens <n>      Set max output tokens (10-2048)\n  \
     /settings            Show model, sampling settings and safety policy\n  \
     /history [N|all]     Show past prompts; expand entry N or all\n  \
     /key                 Enter a different API key\n  \
     /help                Show this help\n  \
     /quit, /exit         End session\n\
     Start a line with // to send a prompt that begins with /."
}

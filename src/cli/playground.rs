// src/cli/playground.rs — Interactive prompt REPL

use anyhow::Result;
use inquire::{Password, PasswordDisplayMode, Select};

use super::commands::{self, SlashCommand};
use super::progress::with_spinner;
use super::render::{self, Expand};
use crate::core::controller::{GenerationOutcome, PromptSession};

pub struct PlaygroundOptions {
    pub spinner: bool,
}

/// Run the REPL until the user quits, stdin closes, or the credential prompt
/// is cancelled.
pub async fn run_playground(controller: &mut PromptSession, opts: PlaygroundOptions) -> Result<()> {
    eprintln!(
        "promptlab v{} | Gemini prompt playground | /help for commands\n",
        env!("CARGO_PKG_VERSION"),
    );

    if !unlock(controller, &opts).await {
        return Ok(());
    }

    while let Some(input) = read_prompt() {
        if let Some(command) = commands::parse(&input) {
            match handle_slash_command(command, controller, &opts).await {
                Flow::Continue => continue,
                Flow::Quit => break,
            }
        }

        // Blank lines are ignored without a round trip
        if input.trim().is_empty() {
            continue;
        }

        let prompt = commands::prompt_text(&input);
        let outcome = with_spinner(opts.spinner, "Generating...", controller.submit(prompt)).await;

        match &outcome {
            GenerationOutcome::Success(exchange) => {
                println!("{}\n", exchange.response());
                eprint!("{}", render::render_history(controller.history(), Expand::None));
            }
            other => {
                if let Some(message) = render::outcome_message(other) {
                    eprintln!("{message}");
                }
            }
        }
    }

    eprintln!(
        "\nSession total: {} prompt(s)",
        controller.history().len()
    );
    Ok(())
}

enum Flow {
    Continue,
    Quit,
}

/// Keep asking for a key until one is entered. Returns false if the user
/// cancels. Nothing else is offered while locked.
async fn unlock(controller: &mut PromptSession, opts: &PlaygroundOptions) -> bool {
    loop {
        let Some(key) = prompt_credential() else {
            eprintln!("  No API key entered. Exiting.");
            return false;
        };
        match controller.bind_credential(&key) {
            Ok(()) => break,
            Err(e) => eprintln!("  {e}. An API key is required to continue."),
        }
    }

    discover_and_pick(controller, opts).await;
    true
}

fn prompt_credential() -> Option<String> {
    Password::new("Enter your Gemini API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .ok()
}

async fn discover_and_pick(controller: &mut PromptSession, opts: &PlaygroundOptions) {
    let discovery = match with_spinner(opts.spinner, "Fetching models...", controller.discover_models()).await {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", render::error_message(&e.to_string()));
            return;
        }
    };

    if let Some(ref warning) = discovery.warning {
        eprintln!("{}", render::discovery_warning(warning));
    }

    if discovery.models.len() > 1 {
        pick_model(controller);
    } else {
        eprintln!("  Model: {}", discovery.selected);
    }
}

/// Select list over the discovered models, cursor on the current selection.
/// Cancelling keeps the current model.
fn pick_model(controller: &mut PromptSession) {
    let models = controller.session().models().to_vec();
    let cursor = controller
        .session()
        .selected_model()
        .and_then(|s| models.iter().position(|m| m == s))
        .unwrap_or(0);

    if let Ok(choice) = Select::new("Select model", models)
        .with_starting_cursor(cursor)
        .prompt()
    {
        if let Err(e) = controller.select_model(&choice) {
            eprintln!("  {e}");
        }
    }
    if let Some(model) = controller.session().selected_model() {
        eprintln!("  Model: {model}");
    }
}

async fn handle_slash_command(
    command: SlashCommand,
    controller: &mut PromptSession,
    opts: &PlaygroundOptions,
) -> Flow {
    match command {
        SlashCommand::Quit => return Flow::Quit,

        SlashCommand::Help => eprintln!("{}", commands::help_text()),

        SlashCommand::Key => {
            match prompt_credential() {
                Some(key) => match controller.bind_credential(&key) {
                    Ok(()) => discover_and_pick(controller, opts).await,
                    Err(e) => eprintln!("  {e}. Keeping the current key."),
                },
                None => eprintln!("  Cancelled. Keeping the current key."),
            }
        }

        SlashCommand::Models => {
            let selected = controller.session().selected_model();
            eprintln!("  Available models:");
            for m in controller.session().models() {
                let marker = if Some(m.as_str()) == selected { " *" } else { "" };
                eprintln!("    {m}{marker}");
            }
        }

        SlashCommand::Model(None) => pick_model(controller),

        SlashCommand::Model(Some(name)) => match controller.select_model(&name) {
            Ok(()) => eprintln!("  Model switched to {name}"),
            Err(e) => eprintln!("  {e}"),
        },

        SlashCommand::Settings => eprint!(
            "{}",
            render::settings_view(
                controller.session().selected_model(),
                controller.generation(),
                controller.safety(),
            )
        ),

        SlashCommand::Set(setting, arg) => {
            match commands::apply_setting(controller.generation_mut(), setting, &arg) {
                Ok(msg) | Err(msg) => eprintln!("  {msg}"),
            }
        }

        SlashCommand::History(expand) => {
            eprint!("{}", render::render_history(controller.history(), expand));
        }

        SlashCommand::Invalid(msg) => eprintln!("  {msg}"),

        SlashCommand::Unknown(cmd) => {
            eprintln!("Unknown command: {cmd}. Type /help for commands.");
        }
    }
    Flow::Continue
}

/// Read one prompt from stdin. A trailing `\` joins the next line, so
/// multi-line prompts can be typed. Returns `None` on EOF.
fn read_prompt() -> Option<String> {
    use std::io::{self, BufRead, Write};

    let stdin = io::stdin();
    let mut prompt = String::new();
    let mut first = true;

    loop {
        eprint!("{}", if first { "> " } else { ". " });
        io::stderr().flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) if first => return None,
            Ok(0) | Err(_) => return Some(prompt),
            Ok(_) => {}
        }

        let line = line.trim_end_matches(['\n', '\r']);
        match line.strip_suffix('\\') {
            Some(head) => {
                prompt.push_str(head);
                prompt.push('\n');
                first = false;
            }
            None => {
                prompt.push_str(line);
                return Some(prompt);
            }
        }
    }
}

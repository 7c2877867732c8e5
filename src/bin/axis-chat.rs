//! Terminal front end for the Axis AI chat widget.
//!
//! # Usage
//!
//! ```bash
//! # Chat with the built-in Axis AI persona
//! GEMINI_API_KEY=... axis-chat
//!
//! # Load a persona and start with the window closed
//! axis-chat --persona persona.yaml --closed
//!
//! # Wait at most 20 seconds for each reply
//! axis-chat --timeout 20
//! ```
//!
//! Type `/help` while chatting for the list of commands.  Ctrl+C while a
//! reply is pending closes the window; the reply still arrives and shows up
//! when the window is reopened.

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use axis_chat::{
    ChatArgs, ChatConfig, ChatWidget, Gemini, GeminiService, PlainTextRenderer, Renderer,
    WidgetCommand, help_text, parse_command,
};

const TYPING_FRAME: Duration = Duration::from_millis(400);

/// Main entry point for the axis-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let (args, _) = ChatArgs::from_command_line_relaxed("axis-chat [OPTIONS]");
    let config = ChatConfig::from_args(args)?;

    let client = Gemini::with_options(None, config.base_url.clone(), None)?;
    let service = GeminiService::new(client, config.model.clone())
        .with_generation_config(config.generation_config())
        .with_verify_model(config.verify_model);
    let mut widget = ChatWidget::connect(service, config.widget_config()).await?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;
    let name = config.persona.name.clone();

    // Flag for interrupt handling while a reply is pending
    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!("{} (model: {})", name, config.model);
    println!("Type /help for commands, /quit to exit\n");
    if let Some(err) = widget.unavailable_reason() {
        renderer.print_error(&format!(
            "Chat is unavailable ({err}). Use /reconnect to try again."
        ));
    }
    if widget.is_visible() {
        renderer.print_transcript(widget.transcript(), &name);
    }

    loop {
        interrupted.store(false, Ordering::Relaxed);

        let prompt = if widget.is_visible() { "You: " } else { "[closed] " };
        let line = match rl.readline(prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let _ = rl.add_history_entry(line.as_str());

        if let Some(cmd) = parse_command(&line) {
            match cmd {
                WidgetCommand::Quit => {
                    println!("Goodbye!");
                    break;
                }
                WidgetCommand::Open => {
                    if !widget.is_visible() {
                        widget.toggle_visibility();
                        renderer.print_transcript(widget.transcript(), &name);
                    }
                }
                WidgetCommand::Close => {
                    if widget.is_visible() {
                        widget.toggle_visibility();
                        renderer.print_info("Chat closed. Type /open to reopen.");
                    }
                }
                WidgetCommand::Toggle => {
                    widget.toggle_visibility();
                    if widget.is_visible() {
                        renderer.print_transcript(widget.transcript(), &name);
                    } else {
                        renderer.print_info("Chat closed. Type /open to reopen.");
                    }
                }
                WidgetCommand::Transcript => {
                    renderer.print_transcript(widget.transcript(), &name);
                }
                WidgetCommand::Stats => {
                    print_stats(&widget);
                }
                WidgetCommand::Reconnect => match widget.reconnect().await {
                    Ok(()) => renderer.print_info("Connected."),
                    Err(err) => renderer.print_error(&format!("Still unavailable: {err}")),
                },
                WidgetCommand::Help => {
                    for line in help_text().lines() {
                        println!("    {}", line);
                    }
                }
                WidgetCommand::Invalid(message) => {
                    renderer.print_error(&message);
                }
            }
            continue;
        }

        if !widget.is_visible() {
            renderer.print_info("The chat window is closed. Type /open to chat.");
            continue;
        }

        widget.set_input(line);
        let exchange = match widget.submit_input() {
            Ok(exchange) => exchange,
            Err(err) => {
                renderer.print_error(&err.to_string());
                continue;
            }
        };

        let mut resolve = pin!(exchange.resolve());
        let mut ticks = tokio::time::interval(TYPING_FRAME);
        let mut frame = 0;
        let completion = loop {
            tokio::select! {
                completion = &mut resolve => break completion,
                _ = ticks.tick() => {
                    if interrupted.swap(false, Ordering::Relaxed) && widget.is_visible() {
                        widget.toggle_visibility();
                        renderer.clear_typing();
                        renderer.print_info("\nChat closed; the reply will be kept. Type /open to see it.");
                    }
                    if widget.is_visible() {
                        renderer.print_typing(&name, frame);
                        frame += 1;
                    }
                }
            }
        };

        let visible = widget.is_visible();
        match widget.complete(completion) {
            Ok(turn) if visible => renderer.print_turn(turn, &name),
            Ok(_) => {}
            Err(err) => renderer.print_error(&err.to_string()),
        }
    }

    Ok(())
}

fn print_stats<S: axis_chat::ConversationService>(widget: &ChatWidget<S>) {
    let stats = widget.stats();
    println!("    Widget Statistics:");
    println!("      Turns: {}", stats.turn_count);
    println!("      User turns: {}", stats.user_turns);
    println!("      Agent turns: {}", stats.agent_turns);
    println!("      Apologies: {}", stats.apologies);
    println!(
        "      Window: {}",
        if stats.visible { "open" } else { "closed" }
    );
    println!(
        "      Session: {}",
        if stats.available {
            "connected"
        } else {
            "unavailable"
        }
    );
}

//! `textadv`: a terminal frontend for `textadv-engine` (spec.md's `cli`
//! crate). Reads lines from stdin, drives one [`TurnLoop`] per process,
//! and renders narration through a crossterm-styled [`TerminalSink`].
//! Carries no game content beyond the tiny smoke-test world in
//! [`demo_world`], used for manual end-to-end verification.

mod demo_world;
mod sink;
mod world_file;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser as _;
use textadv_engine::{verbs, ActionPipeline, Parser as GrammarParser, StepOutcome, TextSink, TurnLoop};
use tracing_subscriber::EnvFilter;

use sink::TerminalSink;

#[derive(Debug, clap::Parser)]
#[command(name = "textadv", about = "A terminal frontend for textadv-engine")]
struct Args {
    /// Path to a TOML world file. Without one, a tiny built-in
    /// smoke-test world (a lobby, a hall, a ball, a box) is used.
    #[arg(long)]
    world: Option<PathBuf>,

    /// Disables heading styling, for terminals or pipes that don't
    /// want ANSI escapes.
    #[arg(long)]
    no_color: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let (world, config) = world_file::load(args.world.as_deref())?;
    let player = world.player.clone();

    let mut pipeline = ActionPipeline::new();
    let mut parser = GrammarParser::new();
    verbs::install_all(&mut pipeline, &mut parser);

    let mut turn_loop = TurnLoop::new(world, pipeline, parser, config, player);
    let mut sink = TerminalSink::new(!args.no_color);

    sink.print(&textadv_engine::description::describe_room(turn_loop.world(), turn_loop.player()));
    sink.paragraph_break();

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut awaiting_choice = false;
    loop {
        write!(stdout, "{}", if awaiting_choice { "#> " } else { "> " })?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if matches!(line, "quit" | "q") {
            break;
        }

        let outcome = if awaiting_choice {
            match line.parse::<usize>() {
                Ok(n) if n >= 1 => turn_loop.resolve(n - 1),
                _ => {
                    sink.print("Please answer with the number of your choice.");
                    sink.paragraph_break();
                    continue;
                }
            }
        } else {
            turn_loop.step(line)
        };

        awaiting_choice = turn_loop.is_awaiting_choice();
        match outcome {
            StepOutcome::Narrated(text) => {
                sink.print(&text);
                sink.paragraph_break();
            }
            StepOutcome::Disambiguate { prompt, choices } => {
                sink.print(&prompt);
                sink.paragraph_break();
                for (index, choice) in choices.iter().enumerate() {
                    sink.print(&format!("  {}. {choice}\n", index + 1));
                }
                sink.paragraph_break();
            }
            StepOutcome::SessionOver => {
                sink.print("The story has ended.");
                sink.paragraph_break();
                break;
            }
        }
    }

    Ok(())
}

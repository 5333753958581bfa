use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;
use tokio::runtime::Runtime;

use cw_core::spread::{find_spread, shipped_spreads};
use cw_reading::session::{Event, NarrativeStatus, Phase, SessionState};
use cw_reading::{ReadingConfig, ReadingRuntime};

/// A parsed line of REPL input.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Quit,
    Help,
    Status,
    Save,
    Events(Vec<Event>),
    Nothing,
    Unknown(String),
}

pub fn run(
    dir: Option<&Path>,
    question: Option<&str>,
    spread: Option<&str>,
    seed: Option<u64>,
    reversal: f64,
) -> Result<(), String> {
    let store = super::open_store(dir)?;
    let mut config = ReadingConfig::default().with_reversal_probability(reversal);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let _guard = rt.enter();
    let mut session = ReadingRuntime::offline(config, store);
    tracing::info!(entries = session.journal().len(), "reading started");

    println!("  {} Cosmic Whisper", "Welcome to".bold());
    println!("  Type 'help' for commands, 'quit' to exit.\n");

    if let Some(question) = question {
        step(&rt, &mut session, vec![ask(question)]);
    } else {
        announce(session.state());
    }
    if let Some(id) = spread {
        let spread = find_spread(id).map_err(|e| e.to_string())?;
        step(&rt, &mut session, vec![Event::ChooseSpread { spread }]);
    }

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break, // EOF
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        match parse_command(session.state(), line.trim()) {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Status => print_status(&session),
            Command::Save => {
                if session.save().is_applied() {
                    let id = session
                        .journal()
                        .entries()
                        .first()
                        .map(|e| e.id.clone())
                        .unwrap_or_default();
                    println!("  {} ({id})\n", "Saved to journal".green());
                }
            }
            Command::Events(events) => step(&rt, &mut session, events),
            Command::Nothing => {}
            Command::Unknown(input) => {
                let hint = format!("Not understood here: \"{input}\". Type 'help'.");
                println!("{}\n", hint.yellow());
            }
        }
    }

    println!("  The stars fade.");
    Ok(())
}

/// Dispatch events in order, streaming collaborator output as it arrives.
fn step(rt: &Runtime, session: &mut ReadingRuntime, events: Vec<Event>) {
    for event in events {
        let before = session.state().clone();
        if !session.dispatch(event).is_applied() {
            continue;
        }
        report(&before, session.state());

        if session.state().is_awaiting_collaborator() {
            let waiting = session.state().clone();
            rt.block_on(session.settle(|e| {
                if let Event::NarrativeChunk { text, .. } = e {
                    print!("{text}");
                    io::stdout().flush().ok();
                }
            }));
            if waiting.phase() == Phase::Reading {
                finish_reading(session.state());
            } else {
                report(&waiting, session.state());
            }
        }
    }
}

/// Print what changed between two states of the same session.
fn report(before: &SessionState, after: &SessionState) {
    if after.generation() != before.generation() {
        println!("  {}\n", "A new reading begins.".bold());
        announce(after);
        return;
    }

    if after.phase() == Phase::Selecting && after.selection().len() > before.selection().len() {
        println!(
            "  Selected {}/{}",
            after.selection().len(),
            after.card_count()
        );
    }

    let positions = after.positioned_cards();
    for pc in positions
        .iter()
        .take(after.revealed())
        .skip(before.revealed())
    {
        let card = if pc.card.is_reversed {
            pc.card.to_string().red()
        } else {
            pc.card.to_string().green()
        };
        println!("  {}: {card}", pc.position_name.cyan());
        println!("    {}", pc.card.meaning().dimmed());
    }

    if after.phase() != before.phase() {
        announce(after);
    }
}

fn finish_reading(state: &SessionState) {
    if state.narrative() == NarrativeStatus::Failed {
        println!("{}", state.interpretation().red());
    }
    println!();
    println!("  'note <text>' to reflect, 'save' to keep this reading, 'new' to start over.\n");
}

fn announce(state: &SessionState) {
    match state.phase() {
        Phase::Welcome => println!("  What question do you bring to the cards?"),
        Phase::Analyzing => println!("  Listening to the stars..."),
        Phase::SpreadSelection => {
            println!("  Keywords: {}", state.keywords());
            for (i, spread) in shipped_spreads().iter().enumerate() {
                println!(
                    "  {}. {} ({} cards): {}",
                    i + 1,
                    spread.name.bold(),
                    spread.card_count,
                    spread.description
                );
            }
            println!("  Choose a spread by number or id.");
        }
        Phase::Shuffling => println!("  The deck is shuffling. Press Enter (or 'stop') to stop."),
        Phase::Cutting => println!("  Press Enter (or 'cut') to cut the deck."),
        Phase::Selecting => println!(
            "  Choose {} of {} face-down cards (1-{}, or 'auto').",
            state.card_count(),
            state.deck_slots(),
            state.deck_slots()
        ),
        Phase::Revealing => {
            println!("  Press Enter (or 'reveal') to turn the next card; 'all' turns the rest.")
        }
        Phase::Reading => println!("\n  {}\n", "Interpretation".bold()),
    }
}

fn print_help() {
    println!("  Commands:");
    println!("    <text>         ask a question (at the start)");
    println!("    <n> | <id>     choose a spread");
    println!("    stop, cut      stop the shuffle, cut the deck (or just press Enter)");
    println!("    <n> [<n>...]   pick face-down cards; 'auto' picks for you");
    println!("    reveal, all    turn the next card, or every remaining card");
    println!("    note <text>    write a reflection on the reading");
    println!("    save           save the reading to the journal");
    println!("    new, reset     start over");
    println!("    status         show where the reading stands");
    println!("    quit           leave\n");
}

fn print_status(session: &ReadingRuntime) {
    let state = session.state();
    println!("  Phase: {}", state.phase());
    if !state.question().is_empty() {
        println!("  Question: {}", state.question());
    }
    if !state.keywords().is_empty() {
        println!("  Keywords: {}", state.keywords());
    }
    if let Some(spread) = state.spread() {
        println!("  Spread: {}", spread.name);
        println!(
            "  Selected: {}/{}",
            state.selection().len(),
            spread.card_count
        );
        println!("  Revealed: {}/{}", state.revealed(), spread.card_count);
    }
    if state.has_saved() {
        println!("  Saved: yes");
    }
    let deck = session.deck();
    println!(
        "  Deck: {} cards, {:.0}% reversed, {} draws",
        deck.len(),
        deck.reversal_probability() * 100.0,
        deck.draws_performed()
    );
    println!();
}

fn ask(question: &str) -> Event {
    Event::SubmitQuestion {
        question: question.to_string(),
    }
}

/// Interpret one line of input in the context of the current phase.
///
/// Before a question is asked, anything but quit or help is the question.
fn parse_command(state: &SessionState, input: &str) -> Command {
    let lower = input.to_lowercase();
    match lower.as_str() {
        "quit" | "q" | "exit" => return Command::Quit,
        "help" | "?" => return Command::Help,
        _ => {}
    }
    if state.phase() == Phase::Welcome {
        if input.is_empty() {
            return Command::Nothing;
        }
        return Command::Events(vec![ask(input)]);
    }

    match lower.as_str() {
        "status" => return Command::Status,
        "save" => return Command::Save,
        "new" | "reset" => return Command::Events(vec![Event::Reset]),
        _ => {}
    }
    if let Some(text) = input.strip_prefix("note ") {
        let text = text.trim().to_string();
        return Command::Events(vec![Event::EditNote { text }]);
    }

    let enter_advances = matches!(
        state.phase(),
        Phase::Shuffling | Phase::Cutting | Phase::Revealing
    );
    let events = match (state.phase(), lower.as_str()) {
        (_, "") if !enter_advances => return Command::Nothing,
        (Phase::SpreadSelection, choice) => match parse_spread(choice) {
            Some(spread) => vec![Event::ChooseSpread { spread }],
            None => return Command::Unknown(input.to_string()),
        },
        (Phase::Shuffling, "" | "stop") => vec![Event::StopShuffling],
        (Phase::Cutting, "" | "cut") => vec![Event::CutDeck],
        (Phase::Selecting, "auto") => (0..state.deck_slots())
            .filter(|slot| !state.selection().contains(slot))
            .take(state.card_count().saturating_sub(state.selection().len()))
            .map(|slot| Event::SelectSlot { slot })
            .collect(),
        (Phase::Selecting, picks) => match parse_numbers(picks) {
            Some(slots) => slots
                .into_iter()
                .map(|slot| Event::SelectSlot { slot })
                .collect(),
            None => return Command::Unknown(input.to_string()),
        },
        (Phase::Revealing, "" | "reveal") => {
            let index = state.revealed();
            vec![Event::RevealCard { index }]
        }
        (Phase::Revealing, "all") => (state.revealed()..state.drawn().len())
            .map(|index| Event::RevealCard { index })
            .collect(),
        (Phase::Revealing, pick) => match parse_numbers(pick).as_deref() {
            Some([index]) => vec![Event::RevealCard { index: *index }],
            _ => return Command::Unknown(input.to_string()),
        },
        _ => return Command::Unknown(input.to_string()),
    };
    Command::Events(events)
}

/// A spread by 1-based number or id.
fn parse_spread(choice: &str) -> Option<cw_core::SpreadDefinition> {
    if let Ok(n) = choice.parse::<usize>() {
        let index = n.checked_sub(1)?;
        return shipped_spreads().into_iter().nth(index);
    }
    find_spread(choice).ok()
}

/// 1-based numbers separated by spaces or commas, as 0-based indices.
fn parse_numbers(input: &str) -> Option<Vec<usize>> {
    input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().ok()?.checked_sub(1))
        .collect()
}

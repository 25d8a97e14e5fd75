//! Line-oriented front end: renders quiz events and turns stdin lines into actions.

use std::time::Duration;

use flagquiz_core::model::{OptionKey, SessionEpoch};
use services::{QuizEvent, QuizService, RoundState};
use storage::AssetResolver;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{Instant, sleep};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    /// Zero-based slot index.
    Guess(usize),
    Restart,
    SetOption(OptionKey, String),
    Regions,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        let line = line.trim();
        if let Ok(number) = line.parse::<usize>() {
            return match number.checked_sub(1) {
                Some(slot) => Self::Guess(slot),
                None => Self::Unknown(line.to_owned()),
            };
        }

        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        match (command, rest.trim()) {
            (":restart", _) => Self::Restart,
            (":choices", value) if !value.is_empty() => {
                Self::SetOption(OptionKey::NumberOfChoices, value.to_owned())
            }
            (":region", value) if !value.is_empty() => {
                Self::SetOption(OptionKey::Region, value.to_owned())
            }
            (":regions", _) => Self::Regions,
            (":help" | "?", _) => Self::Help,
            (":quit" | ":q", _) => Self::Quit,
            _ => Self::Unknown(line.to_owned()),
        }
    }
}

fn print_help() {
    println!("Type the number of your answer, or one of:");
    println!("  :choices <2|4|6|8>   change the number of choices (restarts the quiz)");
    println!("  :region <name|All>   quiz on one region only (restarts the quiz)");
    println!("  :regions             list available regions");
    println!("  :restart             start a new quiz");
    println!("  :quit                exit");
}

fn print_choices(round: &RoundState) {
    for (i, slot) in round.slots().iter().enumerate() {
        if slot.is_enabled() {
            println!("  {}) {}", i + 1, slot.label());
        } else {
            println!("  {}) ----", i + 1);
        }
    }
}

/// Print `events`; returns the advance the caller must schedule, if any.
async fn render(
    quiz: &QuizService,
    assets: &dyn AssetResolver,
    events: &[QuizEvent],
) -> Option<(SessionEpoch, Duration)> {
    let mut scheduled = None;
    for event in events {
        match event {
            QuizEvent::SessionReset { epoch, reason } => {
                log::debug!("session {epoch} reset: {reason:?}");
                println!();
                println!("Starting a new quiz ({} region).", quiz.settings().region());
            }
            QuizEvent::ChoicesUpdated { visible, rows } => {
                log::debug!("showing {visible} choices in {rows} rows");
            }
            QuizEvent::RoundStarted {
                asset_id,
                question_number,
                total,
                ..
            } => {
                println!();
                println!("Question {question_number} of {total}");
                match quiz.prompt_asset(assets).await {
                    Some(asset) => println!("[flag {asset_id}, {} bytes]", asset.bytes.len()),
                    None => println!("[flag {asset_id} unavailable]"),
                }
                if let Some(session) = quiz.session() {
                    print_choices(session.round());
                }
            }
            QuizEvent::GuessFeedback { correct, label, .. } => {
                if *correct {
                    println!("{label}!");
                } else {
                    println!("Incorrect!");
                    if let Some(session) = quiz.session() {
                        print_choices(session.round());
                    }
                }
            }
            QuizEvent::AdvanceScheduled { epoch, delay } => scheduled = Some((*epoch, *delay)),
            QuizEvent::SessionComplete {
                total_guesses,
                correct_guesses,
                score,
            } => {
                println!();
                println!(
                    "{correct_guesses} flags in {total_guesses} guesses: score {score:.2}"
                );
                println!("Type :restart to play again.");
            }
        }
    }
    scheduled
}

/// Run the quiz until stdin closes or the player quits.
///
/// The advance timer lives here. A reset does not cancel it; when it fires for an
/// old epoch the service discards it.
///
/// # Errors
///
/// Returns stdin failures and quiz errors that are not recoverable by the player.
pub async fn play(
    mut quiz: QuizService,
    assets: &dyn AssetResolver,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut pending: Option<SessionEpoch> = None;
    let timer = sleep(Duration::ZERO);
    tokio::pin!(timer);

    let events = quiz.start()?;
    render(&quiz, assets, &events).await;
    print_help();

    loop {
        tokio::select! {
            () = &mut timer, if pending.is_some() => {
                if let Some(epoch) = pending.take() {
                    let events = quiz.advance(epoch)?;
                    render(&quiz, assets, &events).await;
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let result = match Input::parse(&line) {
                    Input::Guess(slot) => quiz.guess(slot),
                    Input::Restart => quiz.restart(),
                    Input::SetOption(key, value) => quiz.change_option(key, &value),
                    Input::Regions => {
                        println!("Regions: All, {}", quiz.catalog().categories().join(", "));
                        continue;
                    }
                    Input::Help => {
                        print_help();
                        continue;
                    }
                    Input::Quit => break,
                    Input::Unknown(raw) => {
                        println!("Not understood: {raw:?} (type :help)");
                        continue;
                    }
                };

                match result {
                    Ok(events) => {
                        if let Some((epoch, delay)) = render(&quiz, assets, &events).await {
                            pending = Some(epoch);
                            timer.as_mut().reset(Instant::now() + delay);
                        }
                    }
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_one_based_guesses() {
        assert_eq!(Input::parse("1"), Input::Guess(0));
        assert_eq!(Input::parse(" 8 "), Input::Guess(7));
        assert_eq!(Input::parse("0"), Input::Unknown("0".into()));
    }

    #[test]
    fn option_commands_carry_raw_values() {
        assert_eq!(
            Input::parse(":choices 6"),
            Input::SetOption(OptionKey::NumberOfChoices, "6".into())
        );
        assert_eq!(
            Input::parse(":region North America"),
            Input::SetOption(OptionKey::Region, "North America".into())
        );
        assert_eq!(Input::parse(":region"), Input::Unknown(":region".into()));
    }

    #[test]
    fn control_commands() {
        assert_eq!(Input::parse(":restart"), Input::Restart);
        assert_eq!(Input::parse(":regions"), Input::Regions);
        assert_eq!(Input::parse(":q"), Input::Quit);
        assert_eq!(Input::parse("?"), Input::Help);
    }
}

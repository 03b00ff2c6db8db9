use std::io;

use practice_core::{Cue, FeedbackColor};
use services::{
    Completion, Delivery, InFlight, PracticeLoopService, PracticeSession, SessionError,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use ui::{AnswerHighlight, QuestionScreenVm, map_history, map_question_screen};

const HISTORY_ROWS: usize = 10;
const HELP: &str = "פקודות: 1-4 בחירה, c בדיקה, n שאלה הבאה, e הסבר, h היסטוריה, q יציאה";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Select(usize),
    Check,
    Next,
    Explain,
    History,
    Dismiss,
    Quit,
}

impl Command {
    fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "" => Some(Self::Dismiss),
            "c" => Some(Self::Check),
            "n" => Some(Self::Next),
            "e" => Some(Self::Explain),
            "h" => Some(Self::History),
            "q" => Some(Self::Quit),
            digit => match digit.parse::<usize>() {
                Ok(slot @ 1..=4) => Some(Self::Select(slot - 1)),
                _ => None,
            },
        }
    }
}

/// Drive a mounted session from stdin until the learner quits or the session expires.
///
/// At most one request is in flight. Input is still read while it runs, so the
/// learner can select, toggle, or ask for the next question in the meantime.
pub async fn run(service: &PracticeLoopService, mut session: PracticeSession) -> io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut in_flight: Option<InFlight> = None;
    let mut redraw = true;

    loop {
        if play_cues(&mut session) {
            return Ok(());
        }
        if redraw {
            println!("{}", render(&map_question_screen(&session)));
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;
        }

        tokio::select! {
            completion = wait(&mut in_flight) => {
                in_flight = None;
                redraw = service.complete(&mut session, completion) == Delivery::Applied;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    return Ok(());
                };
                redraw = true;
                let Some(command) = Command::parse(&line) else {
                    println!("{HELP}");
                    continue;
                };
                if command == Command::Quit {
                    return Ok(());
                }
                match apply(service, &mut session, command) {
                    Ok(Some(request)) => in_flight = Some(request),
                    // The session already queued an alert for this one.
                    Ok(None) | Err(SessionError::NoSelection) => {}
                    Err(err) => println!("{err}"),
                }
            }
        }
    }
}

async fn wait(in_flight: &mut Option<InFlight>) -> Completion {
    match in_flight {
        Some(request) => request.await,
        None => std::future::pending().await,
    }
}

/// Run one command. Returns the request it started, if any.
fn apply(
    service: &PracticeLoopService,
    session: &mut PracticeSession,
    command: Command,
) -> Result<Option<InFlight>, SessionError> {
    match command {
        Command::Select(index) => {
            if !session.select(index) {
                println!("לא ניתן לבחור תשובה כעת.");
            }
        }
        Command::Check => return service.start_check(session).map(Some),
        Command::Next => {
            session.dismiss_modal();
            return service.start_load(session).map(Some);
        }
        Command::Explain => {
            session.toggle_explanation();
        }
        Command::History => print_history(session),
        Command::Dismiss => session.dismiss_modal(),
        Command::Quit => {}
    }
    Ok(None)
}

/// Print pending cues. Returns `true` once the session has handed over to login.
fn play_cues(session: &mut PracticeSession) -> bool {
    let mut signed_out = false;
    for cue in session.drain_cues() {
        match cue {
            Cue::Celebrate => println!("*** כל הכבוד! ***"),
            Cue::SuccessPulse => println!("✓"),
            Cue::FailureHaptic => println!("✗"),
            Cue::Alert(message) => println!("! {message}"),
            Cue::RedirectToLogin => {
                println!("פג תוקף ההתחברות. יש להתחבר מחדש.");
                signed_out = true;
            }
        }
    }
    signed_out
}

fn print_history(session: &PracticeSession) {
    let history = map_history(session.history(), HISTORY_ROWS);
    println!("היסטוריה ({})", history.summary_label);
    if history.hidden_count > 0 {
        println!("  ... {} קודמות", history.hidden_count);
    }
    for row in &history.rows {
        println!(
            "  {} {} {}  [{}]",
            row.mark, row.question, row.answer, row.time_label
        );
    }
}

fn color_tag(color: FeedbackColor) -> &'static str {
    match color {
        FeedbackColor::Neutral => "",
        FeedbackColor::Success => "[+] ",
        FeedbackColor::Failure => "[-] ",
    }
}

fn render(vm: &QuestionScreenVm) -> String {
    let mut out = Vec::new();
    match &vm.level_label {
        Some(level) => out.push(format!("== {} ({level}) ==", vm.title)),
        None => out.push(format!("== {} ==", vm.title)),
    }
    if let Some(label) = vm.status.label() {
        out.push(label.to_string());
    }
    if let Some(text) = &vm.question_text {
        out.push(text.clone());
    }
    for button in &vm.answers {
        let marker = match button.highlight {
            AnswerHighlight::None => ' ',
            AnswerHighlight::Selected => '*',
            AnswerHighlight::Correct => '✓',
            AnswerHighlight::Incorrect => '✗',
        };
        out.push(format!("  {}{} {}", button.index + 1, marker, button.label));
    }
    if vm.checking {
        out.push("בודק...".to_string());
    }
    if let Some(notice) = &vm.notice {
        out.push(format!("! {notice}"));
    }
    if let Some(modal) = &vm.modal {
        let line = format!("{}{}", color_tag(modal.color), modal.message);
        let border = "=".repeat(line.chars().count() + 4);
        out.push(border.clone());
        out.push(format!("| {line} |"));
        out.push(border);
    } else if let Some(feedback) = &vm.feedback {
        out.push(format!("{}{}", color_tag(feedback.color), feedback.message));
    }
    if let Some(explanation) = &vm.explanation {
        if explanation.open {
            out.extend(explanation.lines.iter().cloned());
        } else {
            out.push("(e להצגת הסבר)".to_string());
        }
    }
    let mut actions = Vec::new();
    if vm.check_enabled {
        actions.push("c בדיקה");
    }
    if vm.next_enabled {
        actions.push("n שאלה הבאה");
    }
    actions.push("q יציאה");
    out.push(actions.join(" | "));
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("1"), Some(Command::Select(0)));
        assert_eq!(Command::parse(" 4 "), Some(Command::Select(3)));
        assert_eq!(Command::parse("5"), None);
        assert_eq!(Command::parse("0"), None);
        assert_eq!(Command::parse("c"), Some(Command::Check));
        assert_eq!(Command::parse("n"), Some(Command::Next));
        assert_eq!(Command::parse(""), Some(Command::Dismiss));
        assert_eq!(Command::parse("x"), None);
    }
}

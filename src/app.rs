//! Text-mode quiz host.
//! Drives a learning session over line-based input and output, writing every
//! rating through the store as it is given.

use crate::database::VocabularyStore;
use crate::error::Result;
use crate::models::{DirectionSetting, LearningSession, LearningStats, VocabularyOverview};
use chrono::{DateTime, Utc};
use rand::Rng;
use std::io::{BufRead, Write};

const QUALITY_LABELS: [&str; 6] = [
    "blackout",
    "wrong, but familiar",
    "wrong, but easy to recall",
    "correct with difficulty",
    "correct after hesitation",
    "perfect",
];

/// What happened across a quiz and any retry rounds.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct QuizSummary {
    pub rounds: usize,
    pub reviewed: usize,
    pub correct: usize,
    pub aborted: bool,
}

enum Input {
    Line(String),
    Quit,
}

fn read_input<R: BufRead>(input: &mut R) -> Result<Input> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        Ok(Input::Quit)
    } else {
        Ok(Input::Line(line.to_string()))
    }
}

/// Runs `session` to completion, offering to retry missed entries after each
/// round. `q` or end of input aborts; ratings already given stay saved.
pub fn run_quiz<S, R, W, G>(
    mut session: LearningSession,
    store: &mut S,
    input: &mut R,
    output: &mut W,
    direction: DirectionSetting,
    now: DateTime<Utc>,
    rng: &mut G,
) -> Result<QuizSummary>
where
    S: VocabularyStore + ?Sized,
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let mut summary = QuizSummary::default();

    if session.is_completed() {
        writeln!(output, "Nothing to study.")?;
        return Ok(summary);
    }

    loop {
        summary.rounds += 1;

        while let Some(card) = session.current_card() {
            writeln!(output, "\n{}", session.phase_message())?;
            writeln!(output, "  {}", card.prompt())?;
            write!(output, "[Enter] show answer, [q] quit > ")?;
            output.flush()?;

            if let Input::Quit = read_input(input)? {
                return finish_aborted(session, summary, output);
            }
            session.reveal_answer()?;

            let card = session
                .current_card()
                .map(|c| (c.answer().to_string(), c.card.notes.clone()));
            if let Some((answer, notes)) = card {
                writeln!(output, "  = {answer}")?;
                if let Some(notes) = notes.filter(|n| !n.is_empty()) {
                    writeln!(output, "    ({notes})")?;
                }
            }

            loop {
                write!(output, "Rate 0-5, [q] quit > ")?;
                output.flush()?;
                let line = match read_input(input)? {
                    Input::Quit => return finish_aborted(session, summary, output),
                    Input::Line(line) => line,
                };
                match line.parse::<u8>() {
                    Ok(quality) if usize::from(quality) < QUALITY_LABELS.len() => {
                        let result = session.rate(quality, now, store)?;
                        writeln!(
                            output,
                            "  {} - next review in {} day(s)",
                            QUALITY_LABELS[usize::from(quality)],
                            result.card.sm2.interval
                        )?;
                        break;
                    }
                    _ => writeln!(output, "Please enter a number from 0 to 5.")?,
                }
            }
        }

        summary.reviewed += session.results().len();
        summary.correct += session.correct_count();
        writeln!(
            output,
            "\n{} ({:.0}%), best streak {}",
            session.phase_message(),
            session.accuracy() * 100.0,
            session.max_streak()
        )?;

        let Some(retry) = session.retry_missed(direction, rng) else {
            return Ok(summary);
        };
        write!(output, "Retry {} missed? [y/N] > ", retry.total_count())?;
        output.flush()?;
        match read_input(input)? {
            Input::Line(answer) if answer.eq_ignore_ascii_case("y") => session = retry,
            _ => return Ok(summary),
        }
    }
}

fn finish_aborted<W: Write>(
    session: LearningSession,
    mut summary: QuizSummary,
    output: &mut W,
) -> Result<QuizSummary> {
    let results = session.abort();
    summary.reviewed += results.len();
    summary.correct += results.iter().filter(|r| r.is_correct()).count();
    summary.aborted = true;
    writeln!(output, "\nQuiz stopped. {} rating(s) saved.", results.len())?;
    Ok(summary)
}

pub fn write_stats<W: Write>(
    output: &mut W,
    stats: &LearningStats,
    overview: &VocabularyOverview,
    now: DateTime<Utc>,
) -> Result<()> {
    writeln!(output, "As of {}", now.format("%Y-%m-%d"))?;
    writeln!(output, "  total     {}", stats.total)?;
    writeln!(output, "  new       {}", stats.new)?;
    writeln!(output, "  learning  {}", stats.learning)?;
    writeln!(output, "  review    {}", stats.review)?;
    writeln!(output, "  mastered  {}", stats.mastered)?;
    writeln!(output, "  due       {}", stats.due)?;
    writeln!(output, "  overdue   {}", stats.overdue)?;
    writeln!(
        output,
        "  learned {} / to review {} / not yet learned {}",
        overview.learned, overview.to_review, overview.available
    )?;
    Ok(())
}

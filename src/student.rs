//! Student workflow: a randomized ten-question quiz with a banded verdict.

use std::io::{BufRead, Write};

use crossterm::style::Color;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use crate::console::{is_choice, Console};
use crate::data::Storage;
use crate::models::Question;
use crate::QuizError;

/// Questions asked per attempt; also the minimum bank size.
pub const QUESTIONS_PER_QUIZ: usize = 10;

const START_KEY: &str = "s";

/// Qualitative score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Excellent,
    Good,
    VeryPoor,
    Failed,
}

impl Band {
    pub fn from_score(score: usize) -> Self {
        match score {
            8.. => Band::Excellent,
            5..=7 => Band::Good,
            3..=4 => Band::VeryPoor,
            _ => Band::Failed,
        }
    }

    pub fn verdict(self, score: usize, total: usize) -> String {
        let lead = match self {
            Band::Excellent => "Excellent!",
            Band::Good => "Good.",
            Band::VeryPoor => "Very poor!",
            Band::Failed => "Very sorry you are failed.",
        };
        format!("{} You have got {} out of {}", lead, score, total)
    }

    fn color(self) -> Color {
        match self {
            Band::Excellent => Color::Green,
            Band::Good => Color::Cyan,
            Band::VeryPoor => Color::Yellow,
            Band::Failed => Color::Red,
        }
    }
}

/// The result of one finished attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    pub score: usize,
    pub total: usize,
    pub band: Band,
}

/// The questions drawn for one attempt and the answers given so far.
pub struct QuizRound {
    questions: Vec<Question>,
    answers: Vec<Option<i64>>,
}

impl QuizRound {
    pub fn new(questions: Vec<Question>) -> Self {
        let answers = vec![None; questions.len()];
        Self { questions, answers }
    }

    /// Shuffles the whole bank and keeps the first [`QUESTIONS_PER_QUIZ`].
    ///
    /// Returns `None` when the bank is too small for a full quiz.
    pub fn draw<G: Rng + ?Sized>(mut bank: Vec<Question>, rng: &mut G) -> Option<Self> {
        if bank.len() < QUESTIONS_PER_QUIZ {
            return None;
        }

        bank.shuffle(rng);
        bank.truncate(QUESTIONS_PER_QUIZ);
        Some(Self::new(bank))
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[cfg(test)]
    fn answers(&self) -> &[Option<i64>] {
        &self.answers
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn record_answer(&mut self, index: usize, answer: i64) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = Some(answer);
        }
    }

    pub fn calculate_score(&self) -> usize {
        self.answers
            .iter()
            .zip(self.questions.iter())
            .filter(|(answer, question)| answer.is_some_and(|a| question.is_correct(a)))
            .count()
    }

    pub fn finish(&self) -> Attempt {
        let score = self.calculate_score();
        Attempt {
            score,
            total: self.total_questions(),
            band: Band::from_score(score),
        }
    }
}

/// Greets the student and runs attempts until they stop restarting.
pub fn run_student<R, W, G>(
    console: &mut Console<R, W>,
    storage: &Storage,
    rng: &mut G,
    username: &str,
) -> Result<Vec<Attempt>, QuizError>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    console.say(format!(
        "Welcome {} to the quiz! We will throw you {} questions.",
        username, QUESTIONS_PER_QUIZ
    ))?;
    console.say(
        "Each MCQ mark is 1 and no negative marking. Are you ready? Press 's' to start.",
    )?;

    let mut attempts = Vec::new();
    if !wants_to_start(console)? {
        return Ok(attempts);
    }

    loop {
        let bank = storage.questions()?;
        let Some(mut round) = QuizRound::draw(bank, rng) else {
            console.say("Not enough questions in the question bank.")?;
            break;
        };

        let attempt = ask_round(console, &mut round)?;
        info!(username, score = attempt.score, "quiz attempt finished");
        attempts.push(attempt);

        console.say("Would you like to start again? Press 's' for start or 'q' for quit")?;
        if !wants_to_start(console)? {
            break;
        }
    }

    Ok(attempts)
}

fn wants_to_start<R: BufRead, W: Write>(console: &mut Console<R, W>) -> Result<bool, QuizError> {
    Ok(console
        .read_line_or_eof()?
        .is_some_and(|reply| is_choice(&reply, START_KEY)))
}

fn ask_round<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    round: &mut QuizRound,
) -> Result<Attempt, QuizError> {
    for index in 0..round.total_questions() {
        let question = &round.questions()[index];
        console.say(format!("[Question {}] {}", index + 1, question.text))?;
        for (number, option) in question.options().iter().enumerate() {
            console.say(format!("{}. {}", number + 1, option))?;
        }

        let answer = console.prompt_number("Your answer: ", None)?;
        round.record_answer(index, answer);
    }

    let attempt = round.finish();
    console.say(format!("\nYour Score: {}/{}", attempt.score, attempt.total))?;
    console.say_styled(
        &attempt.band.verdict(attempt.score, attempt.total),
        attempt.band.color(),
    )?;

    Ok(attempt)
}

//! Admin workflow: append questions to the bank until the user types `q`.

use std::io::{BufRead, Write};

use tracing::{info, warn};

use crate::console::{is_choice, Console};
use crate::data::Storage;
use crate::models::{Question, OPTION_COUNT};
use crate::QuizError;

const QUIT_KEY: &str = "q";

/// Runs the admin loop and returns how many questions were saved.
pub fn run_admin<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    storage: &Storage,
) -> Result<usize, QuizError> {
    console.say("Welcome admin! Please create new questions in the question bank.")?;

    let mut saved = 0;
    loop {
        let Some(text) = console.prompt_or_eof("Input your question (or 'q' to quit): ")? else {
            break;
        };
        if is_choice(&text, QUIT_KEY) {
            break;
        }

        let question = collect_question(console, text)?;
        match storage.add_question(question) {
            Ok(bank_size) => {
                saved += 1;
                info!(bank_size, "question added to the bank");
                console.say("Saved successfully!")?;
            }
            Err(err) => {
                warn!(error = %err, "question dropped");
                console.say(format!("Error saving question: {}", err))?;
            }
        }
    }

    Ok(saved)
}

fn collect_question<R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    text: String,
) -> Result<Question, QuizError> {
    let mut options: [String; OPTION_COUNT] = Default::default();
    for (index, option) in options.iter_mut().enumerate() {
        *option = console.prompt(&format!("Input option {}: ", index + 1))?;
    }

    let answer_key = console.prompt_number(
        "What is the answer key (1-4)? ",
        Some(1..=OPTION_COUNT as i64),
    )?;

    Ok(Question::new(text, options, answer_key))
}

//! # quiz-manager
//!
//! A console quiz application: admins append multiple-choice questions to a
//! JSON question bank, students take a randomized ten-question quiz.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use quiz_manager::{QuizApp, QuizError, Storage};
//!
//! fn main() -> Result<(), QuizError> {
//!     // users.json and quiz.json in the working directory
//!     let app = QuizApp::new(Storage::default());
//!
//!     // Log in and run the admin or student workflow on stdin/stdout
//!     app.run()?;
//!
//!     Ok(())
//! }
//! ```

pub mod admin;
pub mod auth;
pub mod console;
pub mod data;
pub mod models;
pub mod session;
pub mod student;

use std::io::{self, BufRead, Write};

use crossterm::tty::IsTty;
use rand::Rng;
use thiserror::Error;

pub use console::{Console, InputPolicy};
pub use data::{LoadError, SaveError, Storage};
pub use models::{Question, Role, User};
pub use session::Outcome;
pub use student::{Attempt, Band};

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// A data file exists but could not be read or parsed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Reading from or writing to the console failed.
    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended while a prompt was waiting for a reply.
    #[error("input ended while waiting for a reply")]
    InputClosed,

    /// A numeric prompt received something else (strict input policy only).
    #[error("expected a number, got {input:?}")]
    InvalidNumber { input: String },
}

/// Per-session settings that are not file locations.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub input_policy: InputPolicy,
    /// Colour the verdict when stdout is a terminal.
    pub color: bool,
}

/// A configured quiz program, ready to run one session.
pub struct QuizApp {
    storage: Storage,
    options: SessionOptions,
}

impl QuizApp {
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            options: SessionOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SessionOptions) -> Self {
        self.options = options;
        self
    }

    /// Runs one session on stdin/stdout with an unseeded RNG.
    pub fn run(&self) -> Result<Outcome, QuizError> {
        let stdout = io::stdout();
        let color = self.options.color && stdout.is_tty();
        let stdin = io::stdin();
        self.run_with(stdin.lock(), stdout.lock(), &mut rand::thread_rng(), color)
    }

    /// Runs one session on the given streams.
    pub fn run_with<R, W, G>(
        &self,
        input: R,
        output: W,
        rng: &mut G,
        color: bool,
    ) -> Result<Outcome, QuizError>
    where
        R: BufRead,
        W: Write,
        G: Rng + ?Sized,
    {
        let mut console = Console::new(input, output)
            .with_policy(self.options.input_policy)
            .with_color(color);
        session::run_session(&mut console, &self.storage, rng)
    }
}

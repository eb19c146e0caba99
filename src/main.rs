use std::io;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use quiz_manager::data::{DEFAULT_QUESTIONS_PATH, DEFAULT_USERS_PATH};
use quiz_manager::{InputPolicy, QuizApp, SessionOptions, Storage};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file holding the user credentials
    #[arg(short, long, default_value = DEFAULT_USERS_PATH)]
    users: PathBuf,

    /// JSON file holding the question bank
    #[arg(short, long, default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// Abort on a non-numeric answer instead of asking again
    #[arg(long)]
    strict: bool,

    /// Never colour the score verdict
    #[arg(long)]
    no_color: bool,
}

fn init_tracing() {
    let filter_layer = EnvFilter::try_from_env("QUIZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = fmt::layer().with_writer(io::stderr).with_target(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}

fn main() {
    init_tracing();
    let args = Args::parse();

    let options = SessionOptions {
        input_policy: if args.strict {
            InputPolicy::Abort
        } else {
            InputPolicy::Reprompt
        },
        color: !args.no_color,
    };
    let app = QuizApp::new(Storage::new(args.users, args.questions)).with_options(options);

    if let Err(e) = app.run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

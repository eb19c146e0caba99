//! JSON persistence for the user list and the question bank.

mod loader;
mod store;

pub use loader::{load_questions, load_users, LoadError};
pub use store::{save_question, SaveError, Storage, DEFAULT_QUESTIONS_PATH, DEFAULT_USERS_PATH};

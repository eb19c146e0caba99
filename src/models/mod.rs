mod question;
mod user;

pub use question::{Question, OPTION_COUNT};
pub use user::{Role, User};

//! Login and role dispatch.

use std::io::{BufRead, Write};

use rand::Rng;
use tracing::{info, warn};

use crate::admin::run_admin;
use crate::auth::authenticate;
use crate::console::Console;
use crate::data::Storage;
use crate::models::Role;
use crate::student::{run_student, Attempt};
use crate::QuizError;

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No user matched the entered credentials.
    InvalidCredentials,
    /// An admin finished adding questions.
    Admin { saved: usize },
    /// A student finished; one entry per completed attempt.
    Student { attempts: Vec<Attempt> },
}

/// Prompts for credentials, then hands off to the workflow for the user's role.
pub fn run_session<R, W, G>(
    console: &mut Console<R, W>,
    storage: &Storage,
    rng: &mut G,
) -> Result<Outcome, QuizError>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let username = console.prompt("Enter your username: ")?;
    let password = console.prompt("Enter password: ")?;

    let users = storage.users()?;
    let Some(user) = authenticate(&username, &password, &users) else {
        warn!(username = %username, "login rejected");
        console.say("Invalid credentials!")?;
        return Ok(Outcome::InvalidCredentials);
    };
    info!(username = %user.username, role = ?user.role, "logged in");

    let outcome = match user.role {
        Role::Admin => Outcome::Admin {
            saved: run_admin(console, storage)?,
        },
        Role::Student => Outcome::Student {
            attempts: run_student(console, storage, rng, &user.username)?,
        },
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::LoadError;
    use crate::models::Question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const USERS: &str = r#"[
        {"username": "admin", "password": "root", "role": "admin"},
        {"username": "u", "password": "p", "role": "student"}
    ]"#;

    fn storage(dir: &TempDir) -> Storage {
        let storage = Storage::new(dir.path().join("users.json"), dir.path().join("quiz.json"));
        fs::write(storage.users_path(), USERS).unwrap();
        storage
    }

    fn run(storage: &Storage, script: &str) -> (Result<Outcome, QuizError>, String) {
        let mut console = Console::new(Cursor::new(script.as_bytes().to_vec()), Vec::new());
        let mut rng = StdRng::seed_from_u64(11);
        let result = run_session(&mut console, storage, &mut rng);
        let output = String::from_utf8(console.into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn test_invalid_credentials() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let (result, output) = run(&storage, "u\nwrong\n");
        assert_eq!(result.unwrap(), Outcome::InvalidCredentials);
        assert!(output.ends_with("Invalid credentials!\n"));
    }

    #[test]
    fn test_missing_users_file_rejects_everyone() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("users.json"), dir.path().join("quiz.json"));

        let (result, _) = run(&storage, "admin\nroot\n");
        assert_eq!(result.unwrap(), Outcome::InvalidCredentials);
    }

    #[test]
    fn test_corrupt_users_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        fs::write(storage.users_path(), "[{\"username\": 1}]").unwrap();

        let (result, output) = run(&storage, "u\np\n");
        assert!(matches!(
            result,
            Err(QuizError::Load(LoadError::Parse { .. }))
        ));
        assert!(!output.contains("Invalid credentials!"));
    }

    #[test]
    fn test_admin_dispatch() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let (result, output) = run(&storage, "admin\nroot\nWhy?\na\nb\nc\nd\n1\nq\n");
        assert_eq!(result.unwrap(), Outcome::Admin { saved: 1 });
        assert!(output.contains("Welcome admin!"));

        let bank: Vec<Question> =
            serde_json::from_str(&fs::read_to_string(storage.questions_path()).unwrap()).unwrap();
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_student_dispatch() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let (result, output) = run(&storage, "u\np\ns\n");
        assert_eq!(result.unwrap(), Outcome::Student { attempts: vec![] });
        assert!(output.contains("Welcome u to the quiz!"));
        assert!(output.contains("Not enough questions in the question bank."));
    }

    #[test]
    fn test_input_closed_before_password() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let (result, _) = run(&storage, "u\n");
        assert!(matches!(result, Err(QuizError::InputClosed)));
    }
}

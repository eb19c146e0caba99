use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

use super::loader::{load_questions, load_users, LoadError};
use crate::models::{Question, User};

pub const DEFAULT_USERS_PATH: &str = "users.json";
pub const DEFAULT_QUESTIONS_PATH: &str = "quiz.json";

/// Why a question could not be appended to the bank.
#[derive(Debug, Error)]
pub enum SaveError {
    /// The existing bank is unreadable, so rewriting it would lose data.
    #[error("refusing to overwrite the question bank: {0}")]
    Load(#[from] LoadError),

    #[error("failed to encode questions: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Appends `question` to the bank at `path` and returns the new bank size.
///
/// The whole bank is rewritten. A missing file is treated as an empty bank;
/// any other load failure aborts the save and leaves the file untouched.
pub fn save_question<P: AsRef<Path>>(path: P, question: Question) -> Result<usize, SaveError> {
    let path = path.as_ref();
    let mut questions = match load_questions(path) {
        Ok(questions) => questions,
        Err(LoadError::NotFound { .. }) => Vec::new(),
        Err(err) => return Err(err.into()),
    };

    questions.push(question);
    write_json_atomic(path, &questions)?;
    debug!(path = %path.display(), count = questions.len(), "saved question bank");

    Ok(questions.len())
}

/// Writes pretty JSON to a temp file next to `path`, then renames it into place.
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), SaveError> {
    let write_error = |source: io::Error| SaveError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    {
        let mut writer = BufWriter::new(&mut file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.flush().map_err(write_error)?;
    }
    match fs::metadata(path) {
        Ok(existing) => file
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(write_error)?,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            set_new_file_mode(file.as_file()).map_err(write_error)?
        }
        Err(err) => return Err(write_error(err)),
    }
    file.as_file().sync_all().map_err(write_error)?;
    file.persist(path).map_err(|err| write_error(err.error))?;

    Ok(())
}

/// Temp files are created owner-only; a new bank is readable by everyone.
#[cfg(unix)]
fn set_new_file_mode(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_mode(_file: &fs::File) -> io::Result<()> {
    Ok(())
}

/// Locations of the two data files, passed explicitly to every workflow.
#[derive(Debug, Clone)]
pub struct Storage {
    users_path: PathBuf,
    questions_path: PathBuf,
}

impl Storage {
    pub fn new(users_path: impl Into<PathBuf>, questions_path: impl Into<PathBuf>) -> Self {
        Self {
            users_path: users_path.into(),
            questions_path: questions_path.into(),
        }
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn questions_path(&self) -> &Path {
        &self.questions_path
    }

    /// Loads all users. A missing users file yields no users.
    pub fn users(&self) -> Result<Vec<User>, LoadError> {
        or_empty(load_users(&self.users_path))
    }

    /// Loads the question bank. A missing bank file yields no questions.
    pub fn questions(&self) -> Result<Vec<Question>, LoadError> {
        or_empty(load_questions(&self.questions_path))
    }

    pub fn add_question(&self, question: Question) -> Result<usize, SaveError> {
        save_question(&self.questions_path, question)
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::new(DEFAULT_USERS_PATH, DEFAULT_QUESTIONS_PATH)
    }
}

fn or_empty<T>(result: Result<Vec<T>, LoadError>) -> Result<Vec<T>, LoadError> {
    match result {
        Err(err) if err.is_not_found() => {
            warn!("{}, treating it as empty", err);
            Ok(Vec::new())
        }
        Err(err) => {
            debug!(error = %err, "record file unusable");
            Err(err)
        }
        ok => ok,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn question(n: i64) -> Question {
        Question::new(
            format!("Question {}", n),
            ["a".into(), "b".into(), "c".into(), "d".into()],
            n % 4 + 1,
        )
    }

    #[test]
    fn test_save_creates_missing_bank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quiz.json");

        assert_eq!(save_question(&path, question(1)).unwrap(), 1);
        assert_eq!(load_questions(&path).unwrap(), vec![question(1)]);
    }

    #[test]
    fn test_save_is_append_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quiz.json");
        let original: Vec<Question> = (0..3).map(question).collect();
        fs::write(&path, serde_json::to_string(&original).unwrap()).unwrap();

        for n in 3..8 {
            save_question(&path, question(n)).unwrap();
        }

        let questions = load_questions(&path).unwrap();
        assert_eq!(questions.len(), original.len() + 5);
        assert_eq!(&questions[..3], &original[..]);
        assert_eq!(questions[7], question(7));
    }

    #[test]
    fn test_save_writes_pretty_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quiz.json");
        save_question(&path, question(1)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\n  {\n    \"question\": \"Question 1\""));
    }

    #[cfg(unix)]
    fn mode_of(path: &Path) -> u32 {
        use std::os::unix::fs::PermissionsExt;
        fs::metadata(path).unwrap().permissions().mode() & 0o777
    }

    #[cfg(unix)]
    #[test]
    fn test_save_keeps_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quiz.json");
        for mode in [0o644, 0o640] {
            fs::write(&path, "[]").unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();

            save_question(&path, question(1)).unwrap();
            assert_eq!(mode_of(&path), mode);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_new_bank_is_world_readable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quiz.json");

        save_question(&path, question(1)).unwrap();
        assert_eq!(mode_of(&path), 0o644);
    }

    #[test]
    fn test_save_refuses_to_clobber_corrupt_bank() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quiz.json");
        fs::write(&path, "not json").unwrap();

        let err = save_question(&path, question(1)).unwrap_err();
        assert!(matches!(err, SaveError::Load(LoadError::Parse { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "not json");
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("quiz.json");

        let err = save_question(&path, question(1)).unwrap_err();
        assert!(matches!(err, SaveError::Write { .. }));
    }

    #[test]
    fn test_storage_treats_missing_files_as_empty() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path().join("users.json"), dir.path().join("quiz.json"));

        assert!(storage.users().unwrap().is_empty());
        assert!(storage.questions().unwrap().is_empty());
    }

    #[test]
    fn test_storage_surfaces_corrupt_files() {
        let dir = TempDir::new().unwrap();
        let users_path = dir.path().join("users.json");
        fs::write(&users_path, "[{]").unwrap();
        let storage = Storage::new(&users_path, dir.path().join("quiz.json"));

        assert!(matches!(storage.users(), Err(LoadError::Parse { .. })));
    }

    #[test]
    fn test_default_paths() {
        let storage = Storage::default();
        assert_eq!(storage.users_path(), Path::new("users.json"));
        assert_eq!(storage.questions_path(), Path::new("quiz.json"));
    }
}

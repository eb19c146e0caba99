use serde::{Deserialize, Serialize};

/// Number of options every question carries.
pub const OPTION_COUNT: usize = 4;

/// A multiple-choice question as stored in the question bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    pub text: String,
    pub option1: String,
    pub option2: String,
    pub option3: String,
    pub option4: String,
    /// 1-based index of the correct option.
    #[serde(rename = "answerkey")]
    pub answer_key: i64,
}

impl Question {
    pub fn new(text: impl Into<String>, options: [String; OPTION_COUNT], answer_key: i64) -> Self {
        let [option1, option2, option3, option4] = options;
        Self {
            text: text.into(),
            option1,
            option2,
            option3,
            option4,
            answer_key,
        }
    }

    pub fn options(&self) -> [&str; OPTION_COUNT] {
        [&self.option1, &self.option2, &self.option3, &self.option4]
    }

    pub fn is_correct(&self, answer: i64) -> bool {
        answer == self.answer_key
    }
}

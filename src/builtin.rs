use crate::{QuestionBank, QuestionError};

const BUILTIN_SOURCE: &str = "data/questions.json";
const BUILTIN_JSON: &str = include_str!("../data/questions.json");

/// Question bank compiled into the binary.
pub fn builtin_bank() -> Result<QuestionBank, QuestionError> {
    QuestionBank::from_json(BUILTIN_SOURCE, BUILTIN_JSON)
}

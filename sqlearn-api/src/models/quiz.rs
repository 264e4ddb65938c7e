use serde::{Deserialize, Serialize};
use sqlearn_common::utils::non_blank;
use sqlearn_common::ApiError;
use sqlearn_db::models::question::Question as QuestionData;
use sqlearn_db::models::quiz::{Quiz as QuizData, MAX_DIFFICULTY, MIN_DIFFICULTY};

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i32,
    pub title: String,
    pub difficulty_level: i32,
    pub module_id: i32,
    pub questions: Vec<Question>,
}

impl Quiz {
    /// Builds the view; answers are only included for instructors.
    pub fn new(quiz: &QuizData, questions: &[QuestionData], with_answers: bool) -> Self {
        Quiz {
            id: quiz.id,
            title: quiz.title.clone(),
            difficulty_level: quiz.difficulty,
            module_id: quiz.module_id,
            questions: questions
                .iter()
                .map(|q| Question {
                    id: q.id,
                    text: q.text.clone(),
                    correct_answer: if with_answers {
                        Some(q.correct_answer.clone())
                    } else {
                        None
                    },
                })
                .collect(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInput {
    pub text: String,
    pub correct_answer: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuizInput {
    pub instructor_id: i32,
    pub module_id: i32,
    pub title: String,
    #[serde(default)]
    pub difficulty_level: Option<i32>,
    pub questions: Vec<QuestionInput>,
    /// Present when the request replaces an existing quiz.
    #[serde(default)]
    pub quiz_id: Option<i32>,
}

#[derive(Debug)]
pub struct ValidQuiz {
    pub instructor_id: i32,
    pub module_id: i32,
    pub title: String,
    pub difficulty: i32,
    /// (text, correct answer) pairs.
    pub questions: Vec<(String, String)>,
    pub quiz_id: Option<i32>,
}

impl QuizInput {
    pub fn validate(self) -> Result<ValidQuiz, ApiError> {
        let title = non_blank(&self.title)
            .ok_or_else(|| ApiError::validation("quiz title is required"))?
            .to_string();
        let difficulty = self.difficulty_level.unwrap_or(MIN_DIFFICULTY);
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&difficulty) {
            return Err(ApiError::validation(format!(
                "difficultyLevel must be between {} and {}",
                MIN_DIFFICULTY, MAX_DIFFICULTY
            )));
        }
        if self.questions.is_empty() {
            return Err(ApiError::validation("a quiz needs at least one question"));
        }
        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(idx, q)| {
                match (non_blank(&q.text), non_blank(&q.correct_answer)) {
                    (Some(text), Some(_)) => Ok((text.to_string(), q.correct_answer.clone())),
                    _ => Err(ApiError::validation(format!(
                        "question {} needs text and correctAnswer",
                        idx + 1
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ValidQuiz {
            instructor_id: self.instructor_id,
            module_id: self.module_id,
            title,
            difficulty,
            questions,
            quiz_id: self.quiz_id,
        })
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QuizSaved {
    pub success: bool,
    pub quiz_id: i32,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ModuleQuery {
    pub module_id: i32,
}

/// `moduleId` in the student quiz listing: a module id or `"all"`.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "RawSelector")]
pub enum ModuleSelector {
    All,
    One(i32),
}

/// Wire form of [`ModuleSelector`].
#[derive(Deserialize)]
#[serde(untagged)]
pub enum RawSelector {
    Id(i32),
    Keyword(String),
}

impl TryFrom<RawSelector> for ModuleSelector {
    type Error = String;

    fn try_from(raw: RawSelector) -> Result<Self, Self::Error> {
        match raw {
            RawSelector::Id(id) => Ok(ModuleSelector::One(id)),
            RawSelector::Keyword(word) if word.trim().eq_ignore_ascii_case("all") => {
                Ok(ModuleSelector::All)
            }
            RawSelector::Keyword(word) => word
                .trim()
                .parse()
                .map(ModuleSelector::One)
                .map_err(|_| format!("moduleId must be a number or \"all\", got {:?}", word)),
        }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct StudentQuizQuery {
    pub module_id: ModuleSelector,
}

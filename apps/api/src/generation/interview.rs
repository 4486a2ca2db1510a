//! Interview-prep output validation — the only feature with a structural
//! check on what the model returns.

use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::llm_client::strip_json_fences;

/// One practice question with its suggested answer strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewQa {
    pub question: String,
    pub answer: String,
}

/// Parses model output as an ordered, non-empty list of Q/A pairs.
/// Anything else is a `Validation` error: the caller may retry by issuing
/// a new request, and no quota is consumed for the failed one.
pub fn parse_interview_questions(raw: &str) -> Result<Vec<InterviewQa>, GenerationError> {
    let cleaned = strip_json_fences(raw);
    let questions: Vec<InterviewQa> = serde_json::from_str(cleaned).map_err(|e| {
        GenerationError::Validation(format!("interview output is not a question list: {e}"))
    })?;

    if questions.is_empty() {
        return Err(GenerationError::Validation(
            "interview output contained no questions".to_string(),
        ));
    }

    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_list_parses_in_order() {
        let raw = r#"[
            {"question": "Why this role?", "answer": "Tie it to the mission."},
            {"question": "Biggest failure?", "answer": "Use the STAR format."}
        ]"#;
        let questions = parse_interview_questions(raw).unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question, "Why this role?");
        assert_eq!(questions[1].answer, "Use the STAR format.");
    }

    #[test]
    fn test_fenced_output_is_accepted() {
        let raw = "```json\n[{\"question\": \"Q\", \"answer\": \"A\"}]\n```";
        assert_eq!(parse_interview_questions(raw).unwrap().len(), 1);
    }

    #[test]
    fn test_prose_is_rejected() {
        let err = parse_interview_questions("Here are some great questions!").unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }

    #[test]
    fn test_empty_list_is_rejected() {
        let err = parse_interview_questions("[]").unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }

    #[test]
    fn test_object_instead_of_list_is_rejected() {
        let err = parse_interview_questions(r#"{"question": "Q", "answer": "A"}"#).unwrap_err();
        assert!(matches!(err, GenerationError::Validation(_)));
    }
}

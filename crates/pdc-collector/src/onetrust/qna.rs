//! Question/answer extraction
//!
//! Walks the section/question/response structure of an export document.
//! Sections whose name contains "FAQ" (case-insensitive) are skipped;
//! every response string per question is collected, and a question with
//! no responses still yields a record with an empty list.

use serde::Serialize;
use serde_json::Value;

/// One section/question/responses triple from an export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QnaRecord {
    pub assessment_id: String,
    pub section: String,
    pub question: String,
    pub responses: Vec<String>,
}

/// Extract all Q&A records from an export document
pub fn extract_qna(assessment_id: &str, export: &Value) -> Vec<QnaRecord> {
    let mut records = Vec::new();

    let sections = match export.get("sections").and_then(Value::as_array) {
        Some(sections) => sections,
        None => return records,
    };

    for section in sections {
        let section_name = section_name(section);
        if is_faq_section(&section_name) {
            continue;
        }

        let questions = match section.get("questions").and_then(Value::as_array) {
            Some(questions) => questions,
            None => continue,
        };

        for question in questions {
            records.push(QnaRecord {
                assessment_id: assessment_id.to_string(),
                section: section_name.clone(),
                question: question_text(question),
                responses: question_responses(question),
            });
        }
    }

    records
}

fn is_faq_section(name: &str) -> bool {
    name.to_lowercase().contains("faq")
}

/// Section name lives under `header.name`; older exports carry a plain
/// `name` key
fn section_name(section: &Value) -> String {
    section
        .get("header")
        .and_then(|h| h.get("name"))
        .or_else(|| section.get("name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Question text lives under `question.content`; fall back to a plain
/// string `question` or `content`
fn question_text(question: &Value) -> String {
    question
        .get("question")
        .map(|q| match q {
            Value::String(s) => s.clone(),
            _ => q
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
        .or_else(|| {
            question
                .get("content")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_default()
}

/// Every response string of a question, across all questionResponses
/// entries
fn question_responses(question: &Value) -> Vec<String> {
    question
        .get("questionResponses")
        .and_then(Value::as_array)
        .map(|groups| {
            groups
                .iter()
                .filter_map(|group| group.get("responses").and_then(Value::as_array))
                .flatten()
                .filter_map(|entry| match entry {
                    Value::String(s) => Some(s.clone()),
                    _ => entry
                        .get("response")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_export() -> Value {
        json!({
            "sections": [
                {
                    "header": {"name": "Data Collection"},
                    "questions": [
                        {
                            "question": {"content": "What data is collected?"},
                            "questionResponses": [
                                {"responses": [
                                    {"response": "Names"},
                                    {"response": "Email addresses"}
                                ]}
                            ]
                        },
                        {
                            "question": {"content": "Is data shared with third parties?"},
                            "questionResponses": []
                        }
                    ]
                },
                {
                    "header": {"name": "Vendor FAQ"},
                    "questions": [
                        {
                            "question": {"content": "How do I fill this in?"},
                            "questionResponses": [
                                {"responses": [{"response": "See the guide"}]}
                            ]
                        }
                    ]
                }
            ]
        })
    }

    #[test]
    fn test_extracts_all_responses_per_question() {
        let records = extract_qna("a1", &sample_export());
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].section, "Data Collection");
        assert_eq!(records[0].question, "What data is collected?");
        assert_eq!(records[0].responses, vec!["Names", "Email addresses"]);
    }

    #[test]
    fn test_question_without_responses_yields_empty_list() {
        let records = extract_qna("a1", &sample_export());
        assert_eq!(records[1].question, "Is data shared with third parties?");
        assert!(records[1].responses.is_empty());
    }

    #[test]
    fn test_faq_sections_are_excluded() {
        let records = extract_qna("a1", &sample_export());
        assert!(records.iter().all(|r| r.section == "Data Collection"));
    }

    #[test]
    fn test_faq_match_is_case_insensitive() {
        let export = json!({
            "sections": [
                {"header": {"name": "General faq"}, "questions": [
                    {"question": {"content": "q"}, "questionResponses": []}
                ]},
                {"header": {"name": "Frequently Asked Questions (FAQ)"}, "questions": [
                    {"question": {"content": "q"}, "questionResponses": []}
                ]}
            ]
        });
        assert!(extract_qna("a1", &export).is_empty());
    }

    #[test]
    fn test_missing_sections_key() {
        assert!(extract_qna("a1", &json!({})).is_empty());
    }

    #[test]
    fn test_plain_string_fallbacks() {
        let export = json!({
            "sections": [
                {"name": "Overview", "questions": [
                    {
                        "question": "Purpose of processing?",
                        "questionResponses": [
                            {"responses": ["Analytics", "Billing"]}
                        ]
                    }
                ]}
            ]
        });

        let records = extract_qna("a1", &export);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].section, "Overview");
        assert_eq!(records[0].question, "Purpose of processing?");
        assert_eq!(records[0].responses, vec!["Analytics", "Billing"]);
    }
}

//! Assessment detail flattening
//!
//! Projects the nested per-assessment export document into a flat
//! record. Pure and order-independent; every absent field maps to the
//! `"n/a"` sentinel, never a missing key and never an error.

use serde::Serialize;
use serde_json::Value;

/// Sentinel for fields absent from the export document
pub const NA: &str = "n/a";

/// Flattened projection of one assessment export document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetail {
    pub assessment_id: String,
    pub name: String,
    pub template_name: String,
    pub org_group: String,
    pub created_by: String,
    pub respondents: String,
    pub approval_chain: String,
    pub status: String,
    pub result: String,
    pub risk_score: String,
}

/// Flatten an export document into an [`AssessmentDetail`]
pub fn flatten_export(export: &Value) -> AssessmentDetail {
    AssessmentDetail {
        assessment_id: scalar_field(export, "assessmentId"),
        name: scalar_field(export, "name"),
        template_name: named_field(export, "template"),
        org_group: named_field(export, "orgGroup"),
        created_by: named_field(export, "createdBy"),
        respondents: joined_names(export.get("respondents")),
        approval_chain: approval_chain(export.get("approvers")),
        status: scalar_field(export, "status"),
        result: scalar_field(export, "result"),
        risk_score: scalar_field(export, "riskScore"),
    }
}

/// Scalar rendering of a JSON value: strings verbatim, numbers and bools
/// via Display
fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Name of an entity that may be a plain string or a `{"name": ...}`
/// object
fn name_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => value.get("name").and_then(scalar),
        _ => None,
    }
}

fn scalar_field(export: &Value, key: &str) -> String {
    export
        .get(key)
        .and_then(scalar)
        .unwrap_or_else(|| NA.to_string())
}

fn named_field(export: &Value, key: &str) -> String {
    export
        .get(key)
        .and_then(name_of)
        .unwrap_or_else(|| NA.to_string())
}

fn joined_names(value: Option<&Value>) -> String {
    let names: Vec<String> = value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(name_of).collect())
        .unwrap_or_default();

    if names.is_empty() {
        NA.to_string()
    } else {
        names.join(", ")
    }
}

/// Approver names in document order; entries may be plain names or
/// `{"approver": {"name": ...}}` wrappers
fn approval_chain(value: Option<&Value>) -> String {
    let names: Vec<String> = value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| name_of(item).or_else(|| item.get("approver").and_then(name_of)))
                .collect()
        })
        .unwrap_or_default();

    if names.is_empty() {
        NA.to_string()
    } else {
        names.join(", ")
    }
}

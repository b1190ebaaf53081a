//! Request payload validation for todo create/update.
//!
//! Payloads are read as raw JSON objects so that a missing key and an explicit
//! `null` stay distinguishable, and so every violated constraint is reported
//! instead of stopping at the first deserialization failure.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use super::model::{Category, Pos, Priority, Status};

pub const NAME_MIN_CHARS: usize = 1;
pub const NAME_MAX_CHARS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorCode {
    InvalidType,
    TooSmall,
    TooBig,
    InvalidEnumValue,
    InvalidDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: String,
    pub message: String,
    pub code: FieldErrorCode,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>, code: FieldErrorCode) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
        }
    }
}

pub type FieldErrors = Vec<FieldError>;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTodoRequest {
    pub name: String,
    pub priority: Priority,
    pub deadline: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub assignees: Option<Vec<String>>,
    pub pos: Option<Pos>,
}

/// Outer `Option` is key presence; inner `Option` on nullable fields is the
/// explicit `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateTodoRequest {
    pub name: Option<String>,
    pub priority: Option<Priority>,
    pub deadline: Option<Option<DateTime<Utc>>>,
    pub description: Option<Option<String>>,
    pub status: Option<Status>,
    pub category: Option<Category>,
    pub assignees: Option<Vec<String>>,
    pub pos: Option<Option<Pos>>,
}

impl CreateTodoRequest {
    pub fn from_json(payload: &Value) -> Result<Self, FieldErrors> {
        let mut reader = PayloadReader::new(payload)?;

        let name = reader.required("name", parse_name);
        let priority = reader.required("priority", parse_choice::<Priority>);
        let deadline = reader.nullable("deadline", parse_deadline).flatten();
        let description = reader.nullable("description", parse_text).flatten();
        let status = reader.optional("status", parse_choice::<Status>);
        let category = reader.optional("category", parse_choice::<Category>);
        let assignees = reader.optional("assignees", parse_assignees);
        let pos = reader.nullable("pos", parse_pos).flatten();

        let errors = reader.into_errors();
        match (name, priority) {
            (Some(name), Some(priority)) if errors.is_empty() => Ok(Self {
                name,
                priority,
                deadline,
                description,
                status,
                category,
                assignees,
                pos,
            }),
            _ => Err(errors),
        }
    }
}

impl UpdateTodoRequest {
    pub fn from_json(payload: &Value) -> Result<Self, FieldErrors> {
        let mut reader = PayloadReader::new(payload)?;

        let request = Self {
            name: reader.optional("name", parse_name),
            priority: reader.optional("priority", parse_choice::<Priority>),
            deadline: reader.nullable("deadline", parse_deadline),
            description: reader.nullable("description", parse_text),
            status: reader.optional("status", parse_choice::<Status>),
            category: reader.optional("category", parse_choice::<Category>),
            assignees: reader.optional("assignees", parse_assignees),
            pos: reader.nullable("pos", parse_pos),
        };

        let errors = reader.into_errors();
        if errors.is_empty() {
            Ok(request)
        } else {
            Err(errors)
        }
    }
}

type Parser<T> = fn(&str, &Value) -> Result<T, FieldErrors>;

struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    errors: FieldErrors,
}

impl<'a> PayloadReader<'a> {
    fn new(payload: &'a Value) -> Result<Self, FieldErrors> {
        let object = payload.as_object().ok_or_else(|| {
            vec![FieldError::new(
                "",
                format!("Expected object, received {}", type_name(payload)),
                FieldErrorCode::InvalidType,
            )]
        })?;
        Ok(Self {
            object,
            errors: Vec::new(),
        })
    }

    fn required<T>(&mut self, key: &str, parse: Parser<T>) -> Option<T> {
        match self.object.get(key) {
            None => {
                self.errors
                    .push(FieldError::new(key, "Required", FieldErrorCode::InvalidType));
                None
            }
            Some(Value::Null) => {
                self.reject_null(key);
                None
            }
            Some(value) => self.run(key, value, parse),
        }
    }

    fn optional<T>(&mut self, key: &str, parse: Parser<T>) -> Option<T> {
        match self.object.get(key) {
            None => None,
            Some(Value::Null) => {
                self.reject_null(key);
                None
            }
            Some(value) => self.run(key, value, parse),
        }
    }

    fn nullable<T>(&mut self, key: &str, parse: Parser<T>) -> Option<Option<T>> {
        match self.object.get(key) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(value) => self.run(key, value, parse).map(Some),
        }
    }

    fn run<T>(&mut self, key: &str, value: &Value, parse: Parser<T>) -> Option<T> {
        match parse(key, value) {
            Ok(parsed) => Some(parsed),
            Err(mut errors) => {
                self.errors.append(&mut errors);
                None
            }
        }
    }

    fn reject_null(&mut self, key: &str) {
        self.errors.push(FieldError::new(
            key,
            "Expected a value, received null",
            FieldErrorCode::InvalidType,
        ));
    }

    fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Closed string enums accepted in payloads and query filters.
pub(crate) trait Choice: Sized + Copy {
    const EXPECTED: &'static str;

    fn parse(value: &str) -> Option<Self>;
}

impl Choice for Priority {
    const EXPECTED: &'static str = "'High' | 'Medium' | 'Low'";

    fn parse(value: &str) -> Option<Self> {
        Priority::try_from(value).ok()
    }
}

impl Choice for Status {
    const EXPECTED: &'static str = "'todo' | 'doing' | 'done'";

    fn parse(value: &str) -> Option<Self> {
        Status::try_from(value).ok()
    }
}

impl Choice for Category {
    const EXPECTED: &'static str = "'personal' | 'work' | 'other'";

    fn parse(value: &str) -> Option<Self> {
        Category::try_from(value).ok()
    }
}

pub(crate) fn parse_choice_str<T: Choice>(path: &str, raw: &str) -> Result<T, FieldErrors> {
    T::parse(raw).ok_or_else(|| {
        vec![FieldError::new(
            path,
            format!("Invalid enum value. Expected {}, received '{raw}'", T::EXPECTED),
            FieldErrorCode::InvalidEnumValue,
        )]
    })
}

fn parse_choice<T: Choice>(path: &str, value: &Value) -> Result<T, FieldErrors> {
    let raw = expect_str(path, value)?;
    parse_choice_str(path, raw)
}

fn parse_name(path: &str, value: &Value) -> Result<String, FieldErrors> {
    let name = expect_str(path, value)?;
    let chars = name.chars().count();
    if chars < NAME_MIN_CHARS {
        return Err(vec![FieldError::new(
            path,
            format!("Name must contain at least {NAME_MIN_CHARS} character(s)"),
            FieldErrorCode::TooSmall,
        )]);
    }
    if chars > NAME_MAX_CHARS {
        return Err(vec![FieldError::new(
            path,
            format!("Name must contain at most {NAME_MAX_CHARS} character(s)"),
            FieldErrorCode::TooBig,
        )]);
    }
    Ok(name.to_string())
}

fn parse_text(path: &str, value: &Value) -> Result<String, FieldErrors> {
    expect_str(path, value).map(str::to_string)
}

fn parse_deadline(path: &str, value: &Value) -> Result<DateTime<Utc>, FieldErrors> {
    let raw = expect_str(path, value)?;
    parse_timestamp(raw).ok_or_else(|| {
        vec![FieldError::new(
            path,
            format!("Invalid date/time '{raw}'"),
            FieldErrorCode::InvalidDate,
        )]
    })
}

/// Accepts RFC 3339, a naive date-time (UTC), or a bare date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
}

fn parse_assignees(path: &str, value: &Value) -> Result<Vec<String>, FieldErrors> {
    let Value::Array(entries) = value else {
        return Err(vec![invalid_type(path, "array", value)]);
    };

    let mut names = Vec::with_capacity(entries.len());
    let mut errors = Vec::new();
    for (index, entry) in entries.iter().enumerate() {
        match entry {
            Value::String(name) => names.push(name.clone()),
            other => errors.push(invalid_type(&format!("{path}.{index}"), "string", other)),
        }
    }

    if errors.is_empty() {
        Ok(names)
    } else {
        Err(errors)
    }
}

fn parse_pos(path: &str, value: &Value) -> Result<Pos, FieldErrors> {
    let Value::Object(fields) = value else {
        return Err(vec![invalid_type(path, "object", value)]);
    };

    let mut errors = Vec::new();
    let mut coordinate = |axis: &str| {
        let axis_path = format!("{path}.{axis}");
        match fields.get(axis) {
            Some(Value::Number(number)) => number.as_f64(),
            None => {
                errors.push(FieldError::new(
                    axis_path,
                    "Required",
                    FieldErrorCode::InvalidType,
                ));
                None
            }
            Some(other) => {
                errors.push(invalid_type(&axis_path, "number", other));
                None
            }
        }
    };

    let x = coordinate("x");
    let y = coordinate("y");
    let z = coordinate("z");

    match (x, y, z) {
        (Some(x), Some(y), Some(z)) if errors.is_empty() => Ok(Pos { x, y, z }),
        _ => Err(errors),
    }
}

fn expect_str<'v>(path: &str, value: &'v Value) -> Result<&'v str, FieldErrors> {
    value
        .as_str()
        .ok_or_else(|| vec![invalid_type(path, "string", value)])
}

fn invalid_type(path: &str, expected: &str, received: &Value) -> FieldError {
    FieldError::new(
        path,
        format!("Expected {expected}, received {}", type_name(received)),
        FieldErrorCode::InvalidType,
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{CreateTodoRequest, FieldErrorCode, UpdateTodoRequest, parse_timestamp};
    use crate::todos::model::{Category, Pos, Priority, Status};

    fn paths(errors: &[super::FieldError]) -> Vec<&str> {
        errors.iter().map(|err| err.path.as_str()).collect()
    }

    #[test]
    fn create_accepts_minimal_payload() {
        let request = CreateTodoRequest::from_json(&json!({ "name": "Buy milk", "priority": "High" }))
            .expect("payload should validate");

        assert_eq!(request.name, "Buy milk");
        assert_eq!(request.priority, Priority::High);
        assert_eq!(request.deadline, None);
        assert_eq!(request.status, None);
        assert_eq!(request.assignees, None);
    }

    #[test]
    fn create_accepts_full_payload() {
        let request = CreateTodoRequest::from_json(&json!({
            "name": "Survey site",
            "priority": "Low",
            "deadline": "2025-03-01T12:30:00+09:00",
            "description": "bring the drone",
            "status": "in-progress",
            "category": "work",
            "assignees": ["Aki", "Ren"],
            "pos": { "x": 1.5, "y": 0, "z": -2 }
        }))
        .expect("payload should validate");

        assert_eq!(
            request.deadline,
            Some(Utc.with_ymd_and_hms(2025, 3, 1, 3, 30, 0).unwrap())
        );
        assert_eq!(request.status, Some(Status::Doing));
        assert_eq!(request.category, Some(Category::Work));
        assert_eq!(request.assignees, Some(vec!["Aki".to_string(), "Ren".to_string()]));
        assert_eq!(request.pos, Some(Pos { x: 1.5, y: 0.0, z: -2.0 }));
    }

    #[test]
    fn name_of_exactly_32_chars_is_accepted() {
        let name = "a".repeat(32);
        let request = CreateTodoRequest::from_json(&json!({ "name": name, "priority": "Medium" }))
            .expect("32 characters should be accepted");
        assert_eq!(request.name.chars().count(), 32);
    }

    #[test]
    fn name_of_33_chars_is_rejected() {
        let errors = CreateTodoRequest::from_json(&json!({
            "name": "a".repeat(33),
            "priority": "Medium"
        }))
        .expect_err("33 characters should be rejected");

        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].path, "name");
        assert_eq!(errors[0].code, FieldErrorCode::TooBig);
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let name = "あ".repeat(32);
        assert!(CreateTodoRequest::from_json(&json!({ "name": name, "priority": "Low" })).is_ok());
    }

    #[test]
    fn empty_name_is_too_small() {
        let errors = CreateTodoRequest::from_json(&json!({ "name": "", "priority": "Low" }))
            .expect_err("empty name should be rejected");
        assert_eq!(errors[0].code, FieldErrorCode::TooSmall);
    }

    #[test]
    fn unknown_priority_is_rejected() {
        let errors = CreateTodoRequest::from_json(&json!({ "name": "x", "priority": "Urgent" }))
            .expect_err("priority outside the enum should be rejected");

        assert_eq!(paths(&errors), vec!["priority"]);
        assert_eq!(errors[0].code, FieldErrorCode::InvalidEnumValue);
    }

    #[test]
    fn reports_every_violation_not_just_the_first() {
        let errors = CreateTodoRequest::from_json(&json!({
            "priority": 3,
            "deadline": "next tuesday",
            "status": "blocked",
            "assignees": ["ok", 7, null],
            "pos": { "x": "1", "z": 0 }
        }))
        .expect_err("payload should be rejected");

        assert_eq!(
            paths(&errors),
            vec![
                "name",
                "priority",
                "deadline",
                "status",
                "assignees.1",
                "assignees.2",
                "pos.x",
                "pos.y",
            ]
        );
        assert_eq!(errors[0].message, "Required");
        assert_eq!(errors[2].code, FieldErrorCode::InvalidDate);
    }

    #[test]
    fn create_allows_omitted_or_null_deadline() {
        let omitted = CreateTodoRequest::from_json(&json!({ "name": "a", "priority": "Low" }))
            .expect("omitted deadline should validate");
        let null = CreateTodoRequest::from_json(&json!({
            "name": "a",
            "priority": "Low",
            "deadline": null
        }))
        .expect("null deadline should validate");

        assert_eq!(omitted.deadline, None);
        assert_eq!(null.deadline, None);
    }

    #[test]
    fn client_supplied_owner_and_id_are_ignored() {
        let request = CreateTodoRequest::from_json(&json!({
            "name": "a",
            "priority": "Low",
            "ownerId": "someone-else",
            "id": "00000000-0000-0000-0000-000000000000"
        }));
        assert!(request.is_ok());
    }

    #[test]
    fn non_object_payload_is_rejected() {
        let errors = CreateTodoRequest::from_json(&json!(["name"]))
            .expect_err("array payload should be rejected");
        assert_eq!(paths(&errors), vec![""]);
        assert_eq!(errors[0].code, FieldErrorCode::InvalidType);
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let cleared = UpdateTodoRequest::from_json(&json!({ "deadline": null }))
            .expect("null deadline should validate");
        let untouched = UpdateTodoRequest::from_json(&json!({ "name": "renamed" }))
            .expect("payload should validate");

        assert_eq!(cleared.deadline, Some(None));
        assert_eq!(untouched.deadline, None);
        assert_eq!(untouched.name.as_deref(), Some("renamed"));
    }

    #[test]
    fn update_rejects_null_for_non_nullable_fields() {
        let errors = UpdateTodoRequest::from_json(&json!({
            "name": null,
            "priority": null,
            "status": null,
            "category": null,
            "assignees": null
        }))
        .expect_err("null non-nullable fields should be rejected");

        assert_eq!(
            paths(&errors),
            vec!["name", "priority", "status", "category", "assignees"]
        );
    }

    #[test]
    fn update_accepts_empty_payload() {
        let request = UpdateTodoRequest::from_json(&json!({})).expect("empty payload validates");
        assert_eq!(request, UpdateTodoRequest::default());
    }

    #[test]
    fn update_keeps_empty_values_as_present() {
        let request = UpdateTodoRequest::from_json(&json!({
            "description": "",
            "assignees": [],
            "pos": { "x": 0, "y": 0, "z": 0 }
        }))
        .expect("payload should validate");

        assert_eq!(request.description, Some(Some(String::new())));
        assert_eq!(request.assignees, Some(Vec::new()));
        assert_eq!(request.pos, Some(Some(Pos { x: 0.0, y: 0.0, z: 0.0 })));
        assert_ne!(request, UpdateTodoRequest::default());
    }

    #[test]
    fn timestamps_accept_rfc3339_naive_and_date_forms() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2025-01-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-01T00:00:00"), Some(expected));
        assert_eq!(parse_timestamp("2025-01-01"), Some(expected));
        assert_eq!(parse_timestamp("2025-13-01"), None);
        assert_eq!(parse_timestamp("01/02/2025"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}

//! Todo item model and input validation.

use serde_json::{json, Value};

use crate::http::response::{ApiError, ApiResult, FieldErrors};

/// Maximum title length, in characters.
pub const TITLE_MAX_LEN: usize = 256;

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";
const NOT_BOOLEAN: &str = "Must be a valid boolean.";
const NOT_INTEGER: &str = "A valid integer is required.";

/// A stored todo item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub id: u64,
    pub title: String,
    pub completed: bool,
    pub order: Option<i64>,
}

impl TodoItem {
    /// JSON representation including the item's absolute `url`.
    pub fn to_representation(&self, url: String) -> Value {
        json!({
            "id": self.id,
            "url": url,
            "title": self.title,
            "completed": self.completed,
            "order": self.order,
        })
    }

    /// Apply validated changes in place.
    pub fn apply(&mut self, changes: &TodoChanges) {
        if let Some(title) = &changes.title {
            self.title = title.clone();
        }
        if let Some(completed) = changes.completed {
            self.completed = completed;
        }
        if let Some(order) = changes.order {
            self.order = order;
        }
    }
}

/// Fields for a new item, with defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub completed: bool,
    pub order: Option<i64>,
}

/// Validated request fields. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub completed: Option<bool>,
    pub order: Option<Option<i64>>,
}

impl TodoChanges {
    /// Validate a full representation: `title` is required.
    pub fn full(data: &Value) -> ApiResult<Self> {
        validate(data, false)
    }

    /// Validate a partial representation: every field is optional.
    pub fn partial(data: &Value) -> ApiResult<Self> {
        validate(data, true)
    }

    pub fn into_new(self) -> NewTodo {
        NewTodo {
            title: self.title.unwrap_or_default(),
            completed: self.completed.unwrap_or(false),
            order: self.order.flatten(),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "NoneType",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn validate(data: &Value, partial: bool) -> ApiResult<TodoChanges> {
    let Some(object) = data.as_object() else {
        return Err(ApiError::field(
            "non_field_errors",
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                type_name(data)
            ),
        ));
    };

    let mut errors = FieldErrors::new();
    let mut changes = TodoChanges::default();

    match object.get("title") {
        None if !partial => push(&mut errors, "title", REQUIRED),
        None => {}
        Some(value) => match parse_title(value) {
            Ok(title) => changes.title = Some(title),
            Err(message) => push(&mut errors, "title", message),
        },
    }

    if let Some(value) = object.get("completed") {
        match parse_bool(value) {
            Ok(completed) => changes.completed = Some(completed),
            Err(message) => push(&mut errors, "completed", message),
        }
    }

    if let Some(value) = object.get("order") {
        match parse_order(value) {
            Ok(order) => changes.order = Some(order),
            Err(message) => push(&mut errors, "order", message),
        }
    }

    if errors.is_empty() {
        Ok(changes)
    } else {
        Err(ApiError::Validation(errors))
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.into());
}

fn parse_title(value: &Value) -> Result<String, String> {
    let raw = match value {
        Value::Null => return Err(NOT_NULL.into()),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_STRING.into()),
    };

    let title = raw.trim();
    if title.is_empty() {
        return Err(NOT_BLANK.into());
    }
    if title.chars().count() > TITLE_MAX_LEN {
        return Err(format!(
            "Ensure this field has no more than {TITLE_MAX_LEN} characters."
        ));
    }
    Ok(title.to_string())
}

fn parse_bool(value: &Value) -> Result<bool, &'static str> {
    match value {
        Value::Null => Err(NOT_NULL),
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(NOT_BOOLEAN),
        },
        Value::String(s) => match s.as_str() {
            "true" | "True" | "TRUE" | "t" | "T" | "yes" | "Yes" | "YES" | "y" | "Y" | "on"
            | "On" | "ON" | "1" => Ok(true),
            "false" | "False" | "FALSE" | "f" | "F" | "no" | "No" | "NO" | "n" | "N" | "off"
            | "Off" | "OFF" | "0" => Ok(false),
            _ => Err(NOT_BOOLEAN),
        },
        _ => Err(NOT_BOOLEAN),
    }
}

fn parse_order(value: &Value) -> Result<Option<i64>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(i))
            } else {
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(Some(f as i64)),
                    _ => Err(NOT_INTEGER),
                }
            }
        }
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => strip_zero_fraction(s)
            .parse::<i64>()
            .map(Some)
            .map_err(|_| NOT_INTEGER),
        _ => Err(NOT_INTEGER),
    }
}

/// `"7.0"`, `"7."` and `"7.00 "` all read as `"7"`.
fn strip_zero_fraction(s: &str) -> &str {
    let s = s.trim();
    match s.rsplit_once('.') {
        Some((whole, fraction)) if fraction.bytes().all(|b| b == b'0') => whole,
        _ => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_errors(result: ApiResult<TodoChanges>) -> FieldErrors {
        match result {
            Err(ApiError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_full_requires_title() {
        let errors = field_errors(TodoChanges::full(&json!({ "completed": true })));
        assert_eq!(errors["title"], vec![REQUIRED.to_string()]);
    }

    #[test]
    fn test_partial_accepts_empty_object() {
        assert_eq!(TodoChanges::partial(&json!({})).unwrap(), TodoChanges::default());
    }

    #[test]
    fn test_title_is_trimmed_and_checked() {
        let changes = TodoChanges::full(&json!({ "title": "  walk the dog  " })).unwrap();
        assert_eq!(changes.title.as_deref(), Some("walk the dog"));

        let errors = field_errors(TodoChanges::full(&json!({ "title": "   " })));
        assert_eq!(errors["title"], vec![NOT_BLANK.to_string()]);

        let errors = field_errors(TodoChanges::full(&json!({ "title": null })));
        assert_eq!(errors["title"], vec![NOT_NULL.to_string()]);

        let errors = field_errors(TodoChanges::full(&json!({ "title": ["x"] })));
        assert_eq!(errors["title"], vec![NOT_STRING.to_string()]);

        let changes = TodoChanges::full(&json!({ "title": 42 })).unwrap();
        assert_eq!(changes.title.as_deref(), Some("42"));
    }

    #[test]
    fn test_title_length_limit() {
        let ok = "x".repeat(TITLE_MAX_LEN);
        assert!(TodoChanges::full(&json!({ "title": ok })).is_ok());

        let long = "x".repeat(TITLE_MAX_LEN + 1);
        let errors = field_errors(TodoChanges::full(&json!({ "title": long })));
        assert_eq!(
            errors["title"],
            vec!["Ensure this field has no more than 256 characters.".to_string()]
        );
    }

    #[test]
    fn test_completed_coercion() {
        for (input, expected) in [
            (json!(true), true),
            (json!("false"), false),
            (json!("yes"), true),
            (json!(0), false),
            (json!("1"), true),
        ] {
            let changes = TodoChanges::partial(&json!({ "completed": input })).unwrap();
            assert_eq!(changes.completed, Some(expected));
        }

        let errors = field_errors(TodoChanges::partial(&json!({ "completed": "maybe" })));
        assert_eq!(errors["completed"], vec![NOT_BOOLEAN.to_string()]);
    }

    #[test]
    fn test_order_coercion() {
        let changes = TodoChanges::partial(&json!({ "order": 3 })).unwrap();
        assert_eq!(changes.order, Some(Some(3)));

        let changes = TodoChanges::partial(&json!({ "order": "7" })).unwrap();
        assert_eq!(changes.order, Some(Some(7)));

        let changes = TodoChanges::partial(&json!({ "order": null })).unwrap();
        assert_eq!(changes.order, Some(None));

        let changes = TodoChanges::partial(&json!({ "order": 2.0 })).unwrap();
        assert_eq!(changes.order, Some(Some(2)));

        for input in ["7.0", "7.", " 7.00 "] {
            let changes = TodoChanges::partial(&json!({ "order": input })).unwrap();
            assert_eq!(changes.order, Some(Some(7)), "{input}");
        }

        let errors = field_errors(TodoChanges::partial(&json!({ "order": "7.5" })));
        assert_eq!(errors["order"], vec![NOT_INTEGER.to_string()]);

        let errors = field_errors(TodoChanges::partial(&json!({ "order": 2.5 })));
        assert_eq!(errors["order"], vec![NOT_INTEGER.to_string()]);
    }

    #[test]
    fn test_errors_are_collected_per_field() {
        let errors = field_errors(TodoChanges::full(&json!({
            "completed": "maybe",
            "order": "first",
        })));
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("title"));
        assert!(errors.contains_key("completed"));
        assert!(errors.contains_key("order"));
    }

    #[test]
    fn test_non_object_body() {
        let errors = field_errors(TodoChanges::full(&json!([1, 2])));
        assert_eq!(
            errors["non_field_errors"],
            vec!["Invalid data. Expected a dictionary, but got list.".to_string()]
        );
    }

    #[test]
    fn test_read_only_and_unknown_fields_ignored() {
        let changes =
            TodoChanges::full(&json!({ "title": "a", "id": 99, "url": "x", "colour": "red" }))
                .unwrap();
        assert_eq!(
            changes,
            TodoChanges {
                title: Some("a".into()),
                ..TodoChanges::default()
            }
        );
    }

    #[test]
    fn test_apply_and_representation() {
        let mut item = TodoItem {
            id: 1,
            title: "a".into(),
            completed: false,
            order: Some(1),
        };
        item.apply(&TodoChanges {
            completed: Some(true),
            order: Some(None),
            ..TodoChanges::default()
        });
        assert_eq!(
            item.to_representation("http://testserver/todos/1".into()),
            json!({
                "id": 1,
                "url": "http://testserver/todos/1",
                "title": "a",
                "completed": true,
                "order": null,
            })
        );
    }
}

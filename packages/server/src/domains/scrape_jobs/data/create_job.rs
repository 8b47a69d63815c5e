//! Create-job request body and its validation.
//!
//! The body is taken as loose JSON so that a missing or mistyped field is
//! reported per field (422) instead of failing deserialization outright.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;
use uuid::Uuid;

use crate::domains::scrape_jobs::models::ScrapeTask;

/// Request body for `POST /api/jobs`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateJobRequest {
    #[serde(default, alias = "jobs")]
    pub tasks: Option<Value>,
}

/// Response body for `POST /api/jobs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateJobResponse {
    pub id: Uuid,
}

/// Field-keyed validation messages, e.g. `tasks.0.url`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    first: String,
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        let message = message.into();
        if self.first.is_empty() {
            self.first = message.clone();
        }
        self.errors.entry(field.into()).or_default().push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Messages recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// Summary line: the first message, plus how many more there are.
    pub fn message(&self) -> String {
        match self.len() {
            0 => "The given data was invalid.".to_string(),
            1 => self.first.clone(),
            2 => format!("{} (and 1 more error)", self.first),
            n => format!("{} (and {} more errors)", self.first, n - 1),
        }
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ValidationErrors {}

impl CreateJobRequest {
    /// Check the body and turn it into tasks.
    ///
    /// Every problem is collected, not just the first one.
    pub fn validate(&self) -> Result<Vec<ScrapeTask>, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let entries = match &self.tasks {
            None | Some(Value::Null) => {
                errors.add("tasks", "The tasks field is required.");
                return Err(errors);
            }
            Some(Value::Array(entries)) if entries.is_empty() => {
                errors.add("tasks", "The tasks field is required.");
                return Err(errors);
            }
            Some(Value::Array(entries)) => entries,
            Some(_) => {
                errors.add("tasks", "The tasks field must be an array.");
                return Err(errors);
            }
        };

        let mut tasks = Vec::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            let Some(entry) = entry.as_object() else {
                errors.add(
                    format!("tasks.{i}"),
                    format!("The tasks.{i} field must be an object."),
                );
                continue;
            };

            let url = validate_url(i, entry.get("url"), &mut errors);
            let selector = validate_selector(
                i,
                entry.get("selectors").and_then(|s| s.get("selector")),
                &mut errors,
            );

            if let (Some(url), Some(selector)) = (url, selector) {
                tasks.push(ScrapeTask::new(url, selector));
            }
        }

        if errors.is_empty() {
            Ok(tasks)
        } else {
            Err(errors)
        }
    }
}

fn validate_url(i: usize, value: Option<&Value>, errors: &mut ValidationErrors) -> Option<String> {
    let field = format!("tasks.{i}.url");

    let raw = match value {
        None | Some(Value::Null) => {
            errors.add(&field, format!("The {field} field is required."));
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(&field, format!("The {field} field is required."));
            return None;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            errors.add(&field, format!("The {field} field must be a valid URL."));
            return None;
        }
    };

    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            Some(raw.to_string())
        }
        _ => {
            errors.add(&field, format!("The {field} field must be a valid URL."));
            None
        }
    }
}

fn validate_selector(
    i: usize,
    value: Option<&Value>,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let field = format!("tasks.{i}.selectors.selector");

    match value {
        None | Some(Value::Null) => {
            errors.add(&field, format!("The {field} field is required."));
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(&field, format!("The {field} field is required."));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add(&field, format!("The {field} field must be a string."));
            None
        }
    }
}

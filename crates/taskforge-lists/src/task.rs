//! Task and note records.

use std::cmp::Ordering;

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Context given to tasks created without one.
pub const DEFAULT_CONTEXT: &str = "default";

/// Priority given to tasks created without one.
pub const DEFAULT_PRIORITY: f64 = 1.0;

/// Returns a new hex-encoded v4 uuid.
fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the current local time truncated to whole seconds.
///
/// Stored dates carry no sub-second part, so fresh records compare equal to
/// what is read back from disk.
pub fn now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// Serde helpers for dates stored as `%Y-%m-%d %H:%M:%S` text.
pub mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};
    use taskforge_ql::DATE_FORMAT;

    pub fn serialize<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let text = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
    }

    /// The same format for optional dates, with `null` for `None`.
    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDateTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(date) => super::serialize(date, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|text| {
                    NaiveDateTime::parse_from_str(&text, DATE_FORMAT).map_err(serde::de::Error::custom)
                })
                .transpose()
        }
    }
}

/// A comment on a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Hex uuid.
    #[serde(default = "new_id")]
    pub id: String,

    pub body: String,

    #[serde(with = "date_format", default = "now")]
    pub created_date: NaiveDateTime,
}

impl Note {
    /// Creates a note timestamped now.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            body: body.into(),
            created_date: now(),
        }
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

/// A task in a task list.
///
/// Tasks are identified by `id` alone; two tasks with the same id are equal
/// even if other fields differ.
///
/// # Example
///
/// ```
/// use taskforge_lists::Task;
///
/// let task = Task::new("take out the trash").with_priority(2.0);
/// assert_eq!(task.context, "default");
/// assert!(!task.is_completed());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Hex uuid.
    #[serde(default = "new_id")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub body: String,

    #[serde(default = "default_context")]
    pub context: String,

    /// Higher values are worked on first.
    #[serde(default = "default_priority")]
    pub priority: f64,

    #[serde(with = "date_format", default = "now")]
    pub created_date: NaiveDateTime,

    /// Set once the task is done.
    #[serde(with = "date_format::option", default)]
    pub completed_date: Option<NaiveDateTime>,

    #[serde(default)]
    pub notes: Vec<Note>,
}

fn default_context() -> String {
    DEFAULT_CONTEXT.to_string()
}

fn default_priority() -> f64 {
    DEFAULT_PRIORITY
}

impl Task {
    /// Creates an open task with default context and priority.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            title: title.into(),
            body: String::new(),
            context: default_context(),
            priority: DEFAULT_PRIORITY,
            created_date: now(),
            completed_date: None,
            notes: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_created_date(mut self, created_date: NaiveDateTime) -> Self {
        self.created_date = created_date;
        self
    }

    pub fn with_completed_date(mut self, completed_date: NaiveDateTime) -> Self {
        self.completed_date = Some(completed_date);
        self
    }

    /// Marks the task done now. Completing twice keeps the first date.
    pub fn complete(&mut self) {
        if self.completed_date.is_none() {
            self.completed_date = Some(now());
        }
    }

    pub fn is_completed(&self) -> bool {
        self.completed_date.is_some()
    }

    /// Work order: higher priority first, then older first.
    pub fn work_order(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| self.created_date.cmp(&other.created_date))
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

//! Parsing for the `tasks_checklist` project column.
//!
//! The column is opaque free text that clients have historically written in
//! three forms: a JSON task array, bullet-point plain text, and JSON wrapped
//! in literal marker tokens carrying client-held completion state. One parse
//! function tries the forms in a fixed priority order, and that order is the
//! contract:
//!
//! 1. `___LOCAL_STORAGE_DATA___` ... `___END_LOCAL_STORAGE___` markers →
//!    [`Checklist::EmbeddedOverride`]
//! 2. JSON array → [`Checklist::Structured`]
//! 3. Lines starting with `- ` or `* ` → [`Checklist::Bulleted`]
//! 4. Anything else → [`Checklist::Raw`]

use serde::{Deserialize, Serialize};

pub const LOCAL_STORAGE_START: &str = "___LOCAL_STORAGE_DATA___";
pub const LOCAL_STORAGE_END: &str = "___END_LOCAL_STORAGE___";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistTask {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub phase_order: i32,
    #[serde(default)]
    pub task_order: i32,
    #[serde(default)]
    pub completed: bool,
}

#[derive(Debug, Clone)]
pub enum Checklist {
    /// Marker-delimited client-state payload. The embedded tasks are
    /// authoritative for completion counting; `raw` keeps the full column
    /// text for callers that need the surrounding content.
    EmbeddedOverride {
        tasks: Vec<ChecklistTask>,
        raw: String,
    },
    /// The column held a plain JSON task array.
    Structured(Vec<ChecklistTask>),
    /// Tasks recovered from `- ` / `* ` bullet lines.
    Bulleted(Vec<ChecklistTask>),
    /// Unrecognized text, carried through untouched.
    Raw(String),
}

impl Checklist {
    pub fn parse(text: &str) -> Checklist {
        if let Some(tasks) = parse_embedded(text) {
            return Checklist::EmbeddedOverride {
                tasks,
                raw: text.to_string(),
            };
        }

        if let Ok(tasks) = serde_json::from_str::<Vec<ChecklistTask>>(text) {
            return Checklist::Structured(tasks);
        }

        let bullets = parse_bullets(text);
        if !bullets.is_empty() {
            return Checklist::Bulleted(bullets);
        }

        Checklist::Raw(text.to_string())
    }

    /// Tasks to merge with the persisted task table.
    pub fn tasks(&self) -> &[ChecklistTask] {
        match self {
            Checklist::EmbeddedOverride { tasks, .. } => tasks,
            Checklist::Structured(tasks) => tasks,
            Checklist::Bulleted(tasks) => tasks,
            Checklist::Raw(_) => &[],
        }
    }

    /// The override list that, when non-empty, replaces status counting
    /// entirely (client-held state wins over persisted rows).
    pub fn override_tasks(&self) -> Option<&[ChecklistTask]> {
        match self {
            Checklist::EmbeddedOverride { tasks, .. } if !tasks.is_empty() => Some(tasks),
            _ => None,
        }
    }
}

fn parse_embedded(text: &str) -> Option<Vec<ChecklistTask>> {
    let start = text.find(LOCAL_STORAGE_START)? + LOCAL_STORAGE_START.len();
    let end = start + text[start..].find(LOCAL_STORAGE_END)?;
    serde_json::from_str(text[start..end].trim()).ok()
}

fn parse_bullets(text: &str) -> Vec<ChecklistTask> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let trimmed = line.trim();
            let title = trimmed
                .strip_prefix("- ")
                .or_else(|| trimmed.strip_prefix("* "))?
                .trim();
            if title.is_empty() {
                return None;
            }
            Some(ChecklistTask {
                id: Some(format!("text_task_{i}")),
                title: title.to_string(),
                phase: "Tasks".to_string(),
                phase_order: 1,
                task_order: i as i32,
                completed: false,
                ..Default::default()
            })
        })
        .collect()
}

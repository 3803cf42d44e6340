//! Import review: the processed import document and the people directory
//! searched when adding teachers.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::errors::AppError;
use crate::form::FormDraft;
use crate::models::teacher;

/// Label shown for a draft that names no examiner.
pub const UNKNOWN_EXAMINER: &str = "Unknown examiner";

/// Claim drafts extracted from one semester's spreadsheet, one per teacher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportDocument {
    pub semester_name: String,
    pub exam_year: i32,
    #[serde(default)]
    pub teachers_data: Vec<FormDraft>,
}

impl ImportDocument {
    pub fn parse(json: &str) -> Result<Self, AppError> {
        let doc: ImportDocument = serde_json::from_str(json)
            .map_err(|e| AppError::Validation(format!("Import document is not valid: {e}")))?;
        if doc.semester_name.trim().is_empty() {
            return Err(AppError::Validation("Import document has no semester".to_string()));
        }
        Ok(doc)
    }

    /// One review card per draft, carrying the draft so that opening a card
    /// needs no server-side copy of the document.
    pub fn cards(&self) -> Result<Vec<ReviewCard>, AppError> {
        self.teachers_data
            .iter()
            .enumerate()
            .map(|(index, draft)| {
                let draft_json = serde_json::to_string(draft)
                    .map_err(|e| AppError::Validation(format!("Cannot encode draft {index}: {e}")))?;
                Ok(ReviewCard {
                    index,
                    title: draft
                        .teacher_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .unwrap_or(UNKNOWN_EXAMINER)
                        .to_string(),
                    teacher_id: draft.teacher_id.clone().unwrap_or_default(),
                    draft_json,
                })
            })
            .collect()
    }
}

/// One teacher of an import document as listed on the review page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCard {
    pub index: usize,
    pub title: String,
    pub teacher_id: String,
    pub draft_json: String,
}

/// A staff member found in the people directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub designation: String,
    /// Set after lookup: true when no teacher record has this code yet.
    #[serde(default)]
    pub is_new: bool,
}

/// Source of staff records searched by name.
pub trait PeopleDirectory: Send + Sync {
    fn search(&self, query: &str) -> Vec<Person>;
}

/// A people directory backed by a JSON array of [`Person`] records.
#[derive(Debug, Clone, Default)]
pub struct RosterDirectory {
    people: Vec<Person>,
}

impl RosterDirectory {
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    /// Load a roster file. A missing file is an empty roster.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("People roster {} not found, search will be empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(AppError::Io(e)),
        };
        let people: Vec<Person> = serde_json::from_str(&json).map_err(|e| {
            AppError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("people roster {} is malformed: {e}", path.display()),
            ))
        })?;
        log::info!("Loaded {} people from {}", people.len(), path.display());
        Ok(Self::new(people))
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}

impl PeopleDirectory for RosterDirectory {
    /// Case-insensitive substring match on the name. A blank query matches nobody.
    fn search(&self, query: &str) -> Vec<Person> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.people
            .iter()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Mark each candidate as new or already known, given the known teacher ids.
pub fn tag_known(mut people: Vec<Person>, is_known: impl Fn(&str) -> bool) -> Vec<Person> {
    for p in &mut people {
        p.is_new = !is_known(&p.code);
    }
    people
}

/// Search the directory and tag results against the teacher table.
pub async fn search_people(
    pool: &PgPool,
    directory: &dyn PeopleDirectory,
    query: &str,
) -> Result<Vec<Person>, AppError> {
    let found = directory.search(query);
    if found.is_empty() {
        return Ok(found);
    }
    let known: Vec<String> = teacher::find_all(pool)
        .await?
        .into_iter()
        .map(|t| t.id)
        .collect();
    Ok(tag_known(found, |code| known.iter().any(|k| k == code)))
}

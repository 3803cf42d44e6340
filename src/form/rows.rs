use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Why a single field update was rejected. A rejected update never mutates the row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    RowOutOfRange { index: usize, len: usize },
    UnknownField(String),
    UnknownSection(String),
    InvalidValue { field: String, value: String },
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::RowOutOfRange { index, len } => {
                write!(f, "Row {index} does not exist (section has {len} rows)")
            }
            FieldError::UnknownField(name) => write!(f, "Unknown field '{name}'"),
            FieldError::UnknownSection(name) => write!(f, "Unknown section '{name}'"),
            FieldError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for {field}")
            }
        }
    }
}

impl std::error::Error for FieldError {}

/// One row of a claim section.
///
/// `Default` is the zeroed row a section appends on "add row": numbers are 0,
/// text is empty and enum fields sit at their first variant.
pub trait ClaimRow: Default + Clone + fmt::Debug + Serialize + DeserializeOwned {
    /// Field names accepted by [`ClaimRow::set_field`], in display order.
    const FIELDS: &'static [&'static str];

    /// Whether the row carries enough data to be submitted.
    fn is_complete(&self) -> bool;

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError>;
}

/// Text fields are stored trimmed whether they arrive by form post or by JSON,
/// so completeness checks never see whitespace-only values.
fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw.trim().to_string())
}

fn parse_count(field: &str, value: &str) -> Result<i32, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    match trimmed.parse::<i32>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(FieldError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_choice<T: FromStr>(field: &str, value: &str) -> Result<T, FieldError> {
    value.trim().parse::<T>().map_err(|_| FieldError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        /// The first listed variant is the default.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            $(#[serde(rename = $label)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ();

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or(())
            }
        }
    };
}

choice_enum! {
    /// Full or half question paper.
    PaperSection {
        Full => "Full",
        Half => "Half",
    }
}

choice_enum! {
    ScriptType {
        Final => "Final",
        Incourse => "Incourse",
        Assignment => "Assignment",
        Presentation => "Presentation",
        Practical => "Practical",
    }
}

choice_enum! {
    /// Remuneration types that are not tied to a course.
    OtherKind {
        ExamCommitteeHonorium => "Exam Committee Honorium",
        Stencil => "Stencil",
        QuestionSetter => "Question Setter",
        QuestionPreparationAndPrinting => "Question Preparation and Printing",
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionPreparation {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub section_type: PaperSection,
}

impl ClaimRow for QuestionPreparation {
    const FIELDS: &'static [&'static str] = &["course_code", "section_type"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "section_type" => self.section_type = parse_choice(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionModeration {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub question_count: i32,
    #[serde(default)]
    pub team_member_count: i32,
}

impl ClaimRow for QuestionModeration {
    const FIELDS: &'static [&'static str] = &["course_code", "question_count", "team_member_count"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "question_count" => self.question_count = parse_count(field, value)?,
            "team_member_count" => self.team_member_count = parse_count(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptEvaluation {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub script_type: ScriptType,
    #[serde(default)]
    pub script_count: i32,
}

impl ClaimRow for ScriptEvaluation {
    const FIELDS: &'static [&'static str] = &["course_code", "script_type", "script_count"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "script_type" => self.script_type = parse_choice(field, value)?,
            "script_count" => self.script_count = parse_count(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PracticalExam {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub student_count: i32,
    #[serde(default)]
    pub day_count: i32,
}

impl ClaimRow for PracticalExam {
    const FIELDS: &'static [&'static str] = &["course_code", "student_count", "day_count"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "student_count" => self.student_count = parse_count(field, value)?,
            "day_count" => self.day_count = parse_count(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VivaExam {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub student_count: i32,
}

impl ClaimRow for VivaExam {
    const FIELDS: &'static [&'static str] = &["course_code", "student_count"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "student_count" => self.student_count = parse_count(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tabulation {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub student_count: i32,
}

impl ClaimRow for Tabulation {
    const FIELDS: &'static [&'static str] = &["course_code", "student_count"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "student_count" => self.student_count = parse_count(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnswerSheetReview {
    #[serde(default, deserialize_with = "trimmed")]
    pub course_code: String,
    #[serde(default)]
    pub answer_sheet_count: i32,
}

impl ClaimRow for AnswerSheetReview {
    const FIELDS: &'static [&'static str] = &["course_code", "answer_sheet_count"];

    fn is_complete(&self) -> bool {
        !self.course_code.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "course_code" => self.course_code = value.trim().to_string(),
            "answer_sheet_count" => self.answer_sheet_count = parse_count(field, value)?,
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OtherRemuneration {
    #[serde(default)]
    pub remuneration_type: OtherKind,
    #[serde(default, deserialize_with = "trimmed")]
    pub details: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_count: Option<i32>,
}

impl ClaimRow for OtherRemuneration {
    const FIELDS: &'static [&'static str] = &["remuneration_type", "details", "page_count"];

    /// The type always holds a value, so completeness rests on the free-text details.
    fn is_complete(&self) -> bool {
        !self.details.trim().is_empty()
    }

    fn set_field(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "remuneration_type" => self.remuneration_type = parse_choice(field, value)?,
            "details" => self.details = value.trim().to_string(),
            "page_count" => {
                self.page_count = match parse_count(field, value)? {
                    0 => None,
                    n => Some(n),
                }
            }
            _ => return Err(FieldError::UnknownField(field.to_string())),
        }
        Ok(())
    }
}

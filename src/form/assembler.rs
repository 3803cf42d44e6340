use std::fmt;

use crate::models::remuneration::RemunerationSubmission;
use super::state::FormState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyError {
    MissingTeacher,
    MissingSemester,
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyError::MissingTeacher => write!(f, "Please select a teacher"),
            AssemblyError::MissingSemester => write!(f, "Please select a semester and exam year"),
        }
    }
}

impl std::error::Error for AssemblyError {}

/// Package the form into a submission, keeping only complete rows.
/// The teacher is checked before the semester.
pub fn assemble(state: &FormState) -> Result<RemunerationSubmission, AssemblyError> {
    let teacher = state.teacher().ok_or(AssemblyError::MissingTeacher)?;
    let semester = state.semester().ok_or(AssemblyError::MissingSemester)?;

    Ok(RemunerationSubmission {
        teacher_id: teacher.id.clone(),
        exam_semester_id: semester.id,
        details: state.complete_details(),
    })
}

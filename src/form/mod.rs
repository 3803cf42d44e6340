//! The claim form: row types, repeatable sections, the form aggregate and
//! the assembler that turns it into a submission.

pub mod assembler;
pub mod rows;
pub mod section;
pub mod state;

pub use assembler::{AssemblyError, assemble};
pub use section::{MAX_ROWS, Section};
pub use state::{FormDraft, FormState, PostOutcome, SectionKind, SemesterRequest};

use actix_session::Session;
use actix_web::{web, HttpResponse};
use chrono::Datelike;
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{require_role, require_teacher, set_flash};
use crate::errors::{AppError, render};
use crate::form::{FormDraft, FormState, MAX_ROWS, SectionKind, SemesterRequest, assemble};
use crate::models::remuneration::{self, rates};
use crate::models::user::Role;
use crate::models::{course, semester, teacher};
use crate::store::{Entry, EntryStore};
use crate::templates_structs::{FormMode, PageContext, RemunerationFormTemplate};
use super::dashboard::parse_id;

/// The button that submitted the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    Refresh,
    Add(SectionKind),
    Remove(SectionKind, usize),
    Submit,
}

impl FormAction {
    /// `refresh`, `submit`, `add:<section>` or `remove:<section>:<index>`.
    pub fn parse(value: &str) -> Option<FormAction> {
        let mut parts = value.trim().split(':');
        match (parts.next()?, parts.next(), parts.next(), parts.next()) {
            ("refresh", None, None, None) | ("", None, None, None) => Some(FormAction::Refresh),
            ("submit", None, None, None) => Some(FormAction::Submit),
            ("add", Some(section), None, None) => SectionKind::from_key(section).map(FormAction::Add),
            ("remove", Some(section), Some(index), None) => {
                let kind = SectionKind::from_key(section)?;
                let index = index.parse().ok()?;
                Some(FormAction::Remove(kind, index))
            }
            _ => None,
        }
    }
}

/// The current year and the four before it, newest first.
pub fn recent_years() -> Vec<i32> {
    let current = chrono::Local::now().year();
    (0..5).map(|i| current - i).collect()
}

#[derive(Deserialize)]
pub struct TeacherQuery {
    #[serde(default)]
    pub teacher_id: Option<String>,
}

#[derive(Deserialize)]
pub struct OwnSemesterQuery {
    #[serde(default)]
    pub semester_id: Option<String>,
}

/// Resolve (or create) the semester the form asked for. Validation failures
/// become inline messages.
async fn resolve_semester(
    pool: &PgPool,
    state: &mut FormState,
    request: Option<SemesterRequest>,
    errors: &mut Vec<String>,
) -> Result<(), AppError> {
    let Some(request) = request else {
        return Ok(());
    };
    match semester::get_or_create(pool, &request.semester_name, request.exam_year).await {
        Ok(found) => {
            state.apply_semester(request.token, found);
        }
        Err(AppError::Validation(msg)) => errors.push(msg),
        Err(e) => return Err(e),
    }
    Ok(())
}

async fn show_form(
    pool: &PgPool,
    ctx: PageContext,
    mode: FormMode,
    draft: FormDraft,
) -> Result<HttpResponse, AppError> {
    let mut state = FormState::hydrate(draft);
    let teachers = teacher::find_all(pool).await?;
    let request = state.apply_master_data(&teachers);

    let mut errors = Vec::new();
    resolve_semester(pool, &mut state, request, &mut errors).await?;
    if !state.teacher_id().is_empty() && state.teacher().is_none() {
        errors.push(format!("Teacher {} is not in the directory", state.teacher_id()));
    }

    let courses = course::find_all(pool).await?;
    let total = rates::total(&state.complete_details());
    let mut tmpl = RemunerationFormTemplate::new(ctx, mode, state, courses, recent_years());
    tmpl.errors = errors;
    tmpl.total = total;
    render(tmpl)
}

/// Apply a posted form, perform its action and re-render or redirect.
async fn handle_post(
    pool: &PgPool,
    session: &Session,
    mode: FormMode,
    fields: Vec<(String, String)>,
    locked_teacher: Option<&str>,
) -> Result<HttpResponse, AppError> {
    let token = fields
        .iter()
        .find(|(k, _)| k == "csrf_token")
        .map(|(_, v)| v.as_str())
        .unwrap_or("");
    csrf::validate_csrf(session, token)?;

    let action_value = fields
        .iter()
        .find(|(k, _)| k == "action")
        .map(|(_, v)| v.as_str())
        .unwrap_or("refresh");
    let action = FormAction::parse(action_value)
        .ok_or_else(|| AppError::Validation(format!("Unknown form action '{action_value}'")))?;

    let mut state = FormState::new();
    let teachers = teacher::find_all(pool).await?;
    state.apply_master_data(&teachers);

    let outcome = state.apply_post(&fields);
    if let Some(id) = locked_teacher {
        state.set_teacher(id);
    }
    let mut errors: Vec<String> = outcome.errors.iter().map(|e| e.to_string()).collect();
    resolve_semester(pool, &mut state, outcome.semester_request, &mut errors).await?;

    match action {
        FormAction::Refresh => {}
        FormAction::Add(kind) => {
            if !state.add_row(kind) {
                errors.push(format!("A section holds at most {MAX_ROWS} rows"));
            }
        }
        FormAction::Remove(kind, index) => {
            state.remove_row(kind, index);
        }
        FormAction::Submit if !errors.is_empty() => {
            errors.push("Fix the errors above before submitting".to_string());
        }
        FormAction::Submit => match assemble(&state) {
            Err(e) => errors.push(e.to_string()),
            Ok(submission) => match remuneration::submit(pool, &submission).await {
                Ok(rows) => {
                    set_flash(
                        session,
                        format!("Remuneration submitted ({rows} claim line(s))"),
                    );
                    return Ok(HttpResponse::SeeOther()
                        .insert_header(("Location", mode.done_url()))
                        .finish());
                }
                Err(AppError::Validation(msg)) => errors.push(msg),
                Err(e) => return Err(e),
            },
        },
    }

    let ctx = PageContext::build(session, mode.action_url())?;
    let courses = course::find_all(pool).await?;
    let total = rates::total(&state.complete_details());
    let mut tmpl = RemunerationFormTemplate::new(ctx, mode, state, courses, recent_years());
    tmpl.errors = errors;
    tmpl.total = total;
    render(tmpl)
}

/// GET /remuneration-form: prefilled from the entry store when `teacher_id`
/// names a pending entry.
pub async fn admin_form(
    pool: web::Data<PgPool>,
    store: web::Data<EntryStore>,
    session: Session,
    query: web::Query<TeacherQuery>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, "/remuneration-form")?;

    let teacher_id = query
        .teacher_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());
    let draft = match teacher_id {
        Some(id) => match store.get(id) {
            Some(entry) => {
                log::info!("Opening form for {id} from a pending entry");
                Entry::into_draft(entry)
            }
            None => FormDraft {
                teacher_id: Some(id.to_string()),
                ..FormDraft::default()
            },
        },
        None => FormDraft::default(),
    };

    show_form(&pool, ctx, FormMode::Admin, draft).await
}

/// POST /remuneration-form
pub async fn admin_submit(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    handle_post(&pool, &session, FormMode::Admin, form.into_inner(), None).await
}

/// GET /teacher-remuneration-form: optionally reopens a semester's claims.
pub async fn teacher_form(
    pool: web::Data<PgPool>,
    session: Session,
    query: web::Query<OwnSemesterQuery>,
) -> Result<HttpResponse, AppError> {
    let (_, teacher_id) = require_teacher(&session)?;
    let ctx = PageContext::build(&session, "/teacher-remuneration-form")?;

    let mut draft = match parse_id(query.semester_id.as_deref())? {
        Some(semester_id) => {
            let found = semester::find_by_id(&pool, semester_id)
                .await?
                .ok_or(AppError::NotFound)?;
            let details = remuneration::find_for_teacher(&pool, &teacher_id, semester_id).await?;
            let mut draft = FormDraft::from(details);
            draft.semester_name = Some(found.semester_name);
            draft.exam_year = Some(found.year);
            draft
        }
        None => FormDraft::default(),
    };
    draft.teacher_id = Some(teacher_id);

    show_form(&pool, ctx, FormMode::Teacher, draft).await
}

/// POST /teacher-remuneration-form: the teacher field is always the caller.
pub async fn teacher_submit(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    let (_, teacher_id) = require_teacher(&session)?;
    handle_post(&pool, &session, FormMode::Teacher, form.into_inner(), Some(&teacher_id)).await
}

use actix_session::Session;
use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::auth::csrf;
use crate::auth::session::{require_role, set_flash};
use crate::errors::{AppError, render};
use crate::form::FormDraft;
use crate::import::{self, ImportDocument, PeopleDirectory};
use crate::models::teacher::{self, Teacher, TeacherForm};
use crate::models::user::Role;
use crate::store::EntryStore;
use crate::templates_structs::{ExcelImportTemplate, ImportTemplate, PageContext};
use super::form_handlers::recent_years;

#[derive(Deserialize)]
pub struct SearchForm {
    pub csrf_token: String,
    #[serde(default)]
    pub query: String,
}

#[derive(Deserialize)]
pub struct UploadForm {
    pub csrf_token: String,
    #[serde(default)]
    pub semester_name: String,
    #[serde(default)]
    pub exam_year: String,
    #[serde(default)]
    pub document: String,
}

#[derive(Deserialize)]
pub struct OpenForm {
    pub csrf_token: String,
    pub semester_name: String,
    pub exam_year: i32,
    pub draft: String,
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

/// GET /import
pub async fn people_page(session: Session) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, "/import")?;
    render(ImportTemplate {
        ctx,
        query: String::new(),
        searched: false,
        results: Vec::new(),
    })
}

/// POST /import/search
pub async fn people_search(
    pool: web::Data<PgPool>,
    directory: web::Data<dyn PeopleDirectory>,
    session: Session,
    form: web::Form<SearchForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let ctx = PageContext::build(&session, "/import")?;

    let query = form.query.trim().to_string();
    let results = import::search_people(&pool, directory.get_ref(), &query).await?;
    log::debug!("People search '{query}' matched {}", results.len());

    render(ImportTemplate {
        ctx,
        searched: !query.is_empty(),
        query,
        results,
    })
}

/// POST /import/save: create the teacher record for a search result.
pub async fn people_save(
    pool: web::Data<PgPool>,
    session: Session,
    form: web::Form<TeacherForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let new_teacher = Teacher::from(form.into_inner());
    match teacher::create(&pool, &new_teacher).await {
        Ok(created) => set_flash(&session, format!("Teacher {} imported", created.name)),
        Err(AppError::Conflict(msg)) | Err(AppError::Validation(msg)) => set_flash(&session, msg),
        Err(e) => return Err(e),
    }
    Ok(redirect("/import"))
}

/// GET /excel-import
pub async fn upload_page(session: Session) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    let ctx = PageContext::build(&session, "/excel-import")?;
    render(ExcelImportTemplate::upload(ctx, recent_years()))
}

/// POST /excel-import: parse an import document and list its teachers.
/// A semester or year chosen on the page overrides the document's own.
pub async fn upload_submit(
    session: Session,
    form: web::Form<UploadForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let ctx = PageContext::build(&session, "/excel-import")?;
    let mut page = ExcelImportTemplate::upload(ctx, recent_years());

    let form = form.into_inner();
    page.semester_name = form.semester_name.trim().to_string();
    page.exam_year = form.exam_year.trim().parse().unwrap_or(0);

    if form.document.trim().is_empty() {
        page.error = Some("Please choose the semester, year and import document".to_string());
        return render(page);
    }

    let mut document = match ImportDocument::parse(&form.document) {
        Ok(doc) => doc,
        Err(AppError::Validation(msg)) => {
            page.error = Some(msg);
            return render(page);
        }
        Err(e) => return Err(e),
    };
    if !page.semester_name.is_empty() {
        document.semester_name = page.semester_name.clone();
    }
    if page.exam_year > 0 {
        document.exam_year = page.exam_year;
    }

    page.semester_name = document.semester_name.clone();
    page.exam_year = document.exam_year;
    page.cards = document.cards()?;
    if page.cards.is_empty() {
        page.error = Some("The import document lists no teachers".to_string());
    }
    log::info!(
        "Import document for {} {} lists {} teacher(s)",
        document.semester_name,
        document.exam_year,
        page.cards.len()
    );
    render(page)
}

/// POST /excel-import/open: store the draft and continue in the form.
pub async fn open_entry(
    store: web::Data<EntryStore>,
    session: Session,
    form: web::Form<OpenForm>,
) -> Result<HttpResponse, AppError> {
    require_role(&session, Role::Admin)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let draft: FormDraft = serde_json::from_str(&form.draft)
        .map_err(|e| AppError::Validation(format!("Draft is not valid: {e}")))?;
    let Some(teacher_id) = draft
        .teacher_id
        .clone()
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    else {
        set_flash(&session, "This examiner has no teacher id; add the teacher first");
        return Ok(redirect("/excel-import"));
    };

    store.put(&teacher_id, draft, form.semester_name.trim(), form.exam_year)?;
    let query = serde_urlencoded::to_string([("teacher_id", teacher_id.as_str())])
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(redirect(&format!("/remuneration-form?{query}")))
}

//! Profile persistence: create, list, fetch, partial update, delete.

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::profile::{
    Activity, Education, Experience, Link, ProfileRow, ProfileSummaryRow, Project, Volunteering,
};
use crate::profiles::validation::{
    normalize_skills, validate_email, validate_profile_name, DUPLICATE_PROFILE_NAME,
};
use crate::storage::PdfStore;

/// Optional resume material shared by create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDetails {
    pub full_name: Option<String>,
    pub title: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub links: Option<Vec<Link>>,
    pub education: Option<Vec<Education>>,
    pub experiences: Option<Vec<Experience>>,
    pub projects: Option<Vec<Project>>,
    pub activities: Option<Vec<Activity>>,
    pub volunteering: Option<Vec<Volunteering>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProfileRequest {
    pub profile_name: String,
    pub email: String,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

impl CreateProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_profile_name(&self.profile_name)?;
        validate_email(self.email.trim())
    }
}

/// Absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub profile_name: Option<String>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub details: ProfileDetails,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.profile_name {
            validate_profile_name(name)?;
        }
        if let Some(email) = &self.email {
            validate_email(email.trim())?;
        }
        Ok(())
    }
}

/// Inserts a new profile. Names are unique across all profiles.
pub async fn create_profile(
    pool: &PgPool,
    request: CreateProfileRequest,
) -> Result<ProfileRow, AppError> {
    request.validate()?;

    let profile_name = request.profile_name.trim().to_string();
    if profile_name_taken(pool, &profile_name, None).await? {
        return Err(AppError::Validation(DUPLICATE_PROFILE_NAME.to_string()));
    }

    let d = request.details;
    let profile = sqlx::query_as::<_, ProfileRow>(
        r#"
        INSERT INTO profiles
            (profile_name, email, full_name, title, phone, location, summary,
             skills, links, education, experiences, projects, activities, volunteering)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        RETURNING *
        "#,
    )
    .bind(&profile_name)
    .bind(request.email.trim())
    .bind(d.full_name)
    .bind(d.title)
    .bind(d.phone)
    .bind(d.location)
    .bind(d.summary)
    .bind(normalize_skills(d.skills.unwrap_or_default()))
    .bind(Json(d.links.unwrap_or_default()))
    .bind(Json(d.education.unwrap_or_default()))
    .bind(Json(d.experiences.unwrap_or_default()))
    .bind(Json(d.projects.unwrap_or_default()))
    .bind(Json(d.activities.unwrap_or_default()))
    .bind(Json(d.volunteering.unwrap_or_default()))
    .fetch_one(pool)
    .await
    .map_err(map_unique_violation)?;

    info!("Created profile {} ({})", profile.id, profile.profile_name);
    Ok(profile)
}

pub async fn list_profiles(pool: &PgPool) -> Result<Vec<ProfileSummaryRow>, AppError> {
    Ok(sqlx::query_as::<_, ProfileSummaryRow>(
        "SELECT id, profile_name, created_at, updated_at FROM profiles ORDER BY id",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn find_profile(pool: &PgPool, id: i32) -> Result<Option<ProfileRow>, sqlx::Error> {
    sqlx::query_as::<_, ProfileRow>("SELECT * FROM profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn get_profile(pool: &PgPool, id: i32) -> Result<ProfileRow, AppError> {
    find_profile(pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))
}

/// Applies a partial update and bumps `updated_at`.
pub async fn update_profile(
    pool: &PgPool,
    id: i32,
    request: UpdateProfileRequest,
) -> Result<ProfileRow, AppError> {
    request.validate()?;

    let profile_name = request.profile_name.map(|n| n.trim().to_string());
    if let Some(name) = &profile_name {
        if profile_name_taken(pool, name, Some(id)).await? {
            return Err(AppError::Validation(DUPLICATE_PROFILE_NAME.to_string()));
        }
    }

    let d = request.details;
    let updated = sqlx::query_as::<_, ProfileRow>(
        r#"
        UPDATE profiles SET
            profile_name = COALESCE($2, profile_name),
            email        = COALESCE($3, email),
            full_name    = COALESCE($4, full_name),
            title        = COALESCE($5, title),
            phone        = COALESCE($6, phone),
            location     = COALESCE($7, location),
            summary      = COALESCE($8, summary),
            skills       = COALESCE($9, skills),
            links        = COALESCE($10, links),
            education    = COALESCE($11, education),
            experiences  = COALESCE($12, experiences),
            projects     = COALESCE($13, projects),
            activities   = COALESCE($14, activities),
            volunteering = COALESCE($15, volunteering),
            updated_at   = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(profile_name)
    .bind(request.email.map(|e| e.trim().to_string()))
    .bind(d.full_name)
    .bind(d.title)
    .bind(d.phone)
    .bind(d.location)
    .bind(d.summary)
    .bind(d.skills.map(normalize_skills))
    .bind(d.links.map(Json))
    .bind(d.education.map(Json))
    .bind(d.experiences.map(Json))
    .bind(d.projects.map(Json))
    .bind(d.activities.map(Json))
    .bind(d.volunteering.map(Json))
    .fetch_optional(pool)
    .await
    .map_err(map_unique_violation)?
    .ok_or_else(|| AppError::NotFound(format!("Profile {id} not found")))?;

    info!("Updated profile {id}");
    Ok(updated)
}

/// Deletes a profile together with its CVs. PDF files are unlinked first;
/// a file that cannot be removed is logged and skipped.
pub async fn delete_profile(
    pool: &PgPool,
    store: &PdfStore,
    id: i32,
) -> Result<ProfileRow, AppError> {
    let profile = get_profile(pool, id).await?;

    let pdf_paths: Vec<String> =
        sqlx::query_scalar("SELECT pdf_path FROM cvs WHERE profile_id = $1")
            .bind(id)
            .fetch_all(pool)
            .await?;

    let removed = remove_pdf_files(store, &pdf_paths).await;

    sqlx::query("DELETE FROM profiles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    info!(
        "Deleted profile {id} and {} generated CV(s) ({removed} files removed)",
        pdf_paths.len()
    );
    Ok(profile)
}

/// Unlinks every path, logging failures. Returns how many files were removed.
async fn remove_pdf_files(store: &PdfStore, paths: &[String]) -> usize {
    let mut removed = 0;
    for path in paths {
        match store.remove(path).await {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => error!("Failed to delete PDF file {path}: {e}"),
        }
    }
    removed
}

async fn profile_name_taken(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM profiles WHERE profile_name = $1 AND ($2::INT IS NULL OR id <> $2))",
    )
    .bind(name)
    .bind(exclude_id)
    .fetch_one(pool)
    .await
}

/// A concurrent insert can still trip the UNIQUE constraint after the pre-check.
fn map_unique_violation(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation(DUPLICATE_PROFILE_NAME.to_string())
        }
        _ => AppError::Database(e),
    }
}

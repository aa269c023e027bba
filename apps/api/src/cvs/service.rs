use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::cv::{CvRow, CvWithProfile, CvWithProfileRow};
use crate::profiles::service::get_profile;
use crate::storage::PdfStore;

const CV_WITH_PROFILE_SELECT: &str = r#"
    SELECT c.id, c.profile_id, c.job_description, c.pdf_path, c.cv_data, c.created_at,
           p.email AS profile_email, p.full_name AS profile_full_name
    FROM cvs c
    JOIN profiles p ON p.id = c.profile_id
"#;

/// All CVs, newest first, with their owner's contact details.
pub async fn list_cvs(pool: &PgPool) -> Result<Vec<CvWithProfile>, AppError> {
    let rows = sqlx::query_as::<_, CvWithProfileRow>(&format!(
        "{CV_WITH_PROFILE_SELECT} ORDER BY c.created_at DESC, c.id DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(CvWithProfile::from).collect())
}

pub async fn get_cv(pool: &PgPool, id: i32) -> Result<CvWithProfile, AppError> {
    sqlx::query_as::<_, CvWithProfileRow>(&format!("{CV_WITH_PROFILE_SELECT} WHERE c.id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(CvWithProfile::from)
        .ok_or_else(|| AppError::NotFound(format!("CV {id} not found")))
}

/// CVs generated from one profile, newest first. 404 if the profile does not exist.
pub async fn list_cvs_for_profile(pool: &PgPool, profile_id: i32) -> Result<Vec<CvRow>, AppError> {
    get_profile(pool, profile_id).await?;

    Ok(sqlx::query_as::<_, CvRow>(
        "SELECT * FROM cvs WHERE profile_id = $1 ORDER BY created_at DESC, id DESC",
    )
    .bind(profile_id)
    .fetch_all(pool)
    .await?)
}

async fn find_cv_row(pool: &PgPool, id: i32) -> Result<CvRow, AppError> {
    sqlx::query_as::<_, CvRow>("SELECT * FROM cvs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("CV {id} not found")))
}

/// Loads the stored PDF for a CV. 404 if the record or its file is gone.
pub async fn read_cv_pdf(
    pool: &PgPool,
    store: &PdfStore,
    id: i32,
) -> Result<(CvRow, Vec<u8>), AppError> {
    let cv = find_cv_row(pool, id).await?;
    let bytes = load_pdf(store, &cv).await?;
    Ok((cv, bytes))
}

async fn load_pdf(store: &PdfStore, cv: &CvRow) -> Result<Vec<u8>, AppError> {
    store
        .read(&cv.pdf_path)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("PDF for CV {} not found", cv.id)))
}

/// Deletes the PDF file (if still present) and then the record.
pub async fn delete_cv(pool: &PgPool, store: &PdfStore, id: i32) -> Result<CvRow, AppError> {
    let cv = find_cv_row(pool, id).await?;

    let removed = store.remove(&cv.pdf_path).await?;

    sqlx::query("DELETE FROM cvs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    info!("Deleted CV {id} (file removed: {removed})");
    Ok(cv)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;
    use crate::cvs::generator::store_cv;
    use crate::db::test_support::{insert_test_profile, test_pool};

    fn cv_row(pdf_path: &str) -> CvRow {
        CvRow {
            id: 9,
            profile_id: 1,
            job_description: "Rust role".to_string(),
            pdf_path: pdf_path.to_string(),
            cv_data: json!({}),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_load_pdf_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = PdfStore::new(dir.path());

        let err = load_pdf(&store, &cv_row("uploads/cvs/cv_1_1.pdf"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(msg) if msg == "PDF for CV 9 not found"));
    }

    #[tokio::test]
    async fn test_load_pdf_returns_stored_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = PdfStore::new(dir.path());
        let relative = store.save(1, b"%PDF-1.3 cv").await.unwrap();

        let bytes = load_pdf(&store, &cv_row(&relative)).await.unwrap();
        assert_eq!(bytes, b"%PDF-1.3 cv");
    }

    #[tokio::test]
    async fn test_profile_cvs_newest_first() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let store = PdfStore::new(dir.path());
        let profile = insert_test_profile(&pool).await;

        let older = store_cv(&pool, &store, profile.id, "first", &json!({}), b"%PDF")
            .await
            .unwrap();
        let newer = store_cv(&pool, &store, profile.id, "second", &json!({}), b"%PDF")
            .await
            .unwrap();

        let cvs = list_cvs_for_profile(&pool, profile.id).await.unwrap();
        let ids: Vec<i32> = cvs.iter().map(|cv| cv.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);

        let err = list_cvs_for_profile(&pool, -1).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_pdf_read_after_file_loss_is_not_found() {
        let Some(pool) = test_pool().await else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let store = PdfStore::new(dir.path());
        let profile = insert_test_profile(&pool).await;
        let cv = store_cv(&pool, &store, profile.id, "Rust role", &json!({}), b"%PDF")
            .await
            .unwrap();

        let (_, bytes) = read_cv_pdf(&pool, &store, cv.id).await.unwrap();
        assert_eq!(bytes, b"%PDF");

        std::fs::remove_file(store.resolve(&cv.pdf_path)).unwrap();
        let err = read_cv_pdf(&pool, &store, cv.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let deleted = delete_cv(&pool, &store, cv.id).await.unwrap();
        assert_eq!(deleted.id, cv.id);
        assert!(matches!(
            get_cv(&pool, cv.id).await,
            Err(AppError::NotFound(_))
        ));
    }
}

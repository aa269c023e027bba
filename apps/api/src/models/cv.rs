use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;

/// A generated CV: the job it was tailored to, where its PDF lives, and the
/// structured data the PDF was rendered from.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CvRow {
    pub id: i32,
    pub profile_id: i32,
    pub job_description: String,
    /// Relative to the storage root, e.g. `uploads/cvs/cv_3_1700000000000.pdf`.
    pub pdf_path: String,
    pub cv_data: Value,
    pub created_at: DateTime<Utc>,
}

/// `cvs` joined with the owning profile's contact columns.
#[derive(Debug, Clone, FromRow)]
pub struct CvWithProfileRow {
    pub id: i32,
    pub profile_id: i32,
    pub job_description: String,
    pub pdf_path: String,
    pub cv_data: Value,
    pub created_at: DateTime<Utc>,
    pub profile_email: String,
    pub profile_full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRef {
    pub id: i32,
    pub email: String,
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvWithProfile {
    #[serde(flatten)]
    pub cv: CvRow,
    pub profile: ProfileRef,
}

impl From<CvWithProfileRow> for CvWithProfile {
    fn from(row: CvWithProfileRow) -> Self {
        CvWithProfile {
            profile: ProfileRef {
                id: row.profile_id,
                email: row.profile_email,
                full_name: row.profile_full_name,
            },
            cv: CvRow {
                id: row.id,
                profile_id: row.profile_id,
                job_description: row.job_description,
                pdf_path: row.pdf_path,
                cv_data: row.cv_data,
                created_at: row.created_at,
            },
        }
    }
}

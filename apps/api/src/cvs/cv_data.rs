//! Structured CV returned by the model, and the parsing that turns raw model
//! output into it.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::llm_client::strip_json_fences;
use crate::models::profile::{Link, ProfileRow};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvData {
    #[serde(deserialize_with = "null_as_default")]
    pub full_name: String,
    pub title: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub contact: CvContact,
    pub summary: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub experiences: Vec<CvExperience>,
    #[serde(deserialize_with = "null_as_default")]
    pub education: Vec<CvEducation>,
    #[serde(deserialize_with = "null_as_default")]
    pub projects: Vec<CvProject>,
    #[serde(deserialize_with = "null_as_default")]
    pub activities: Vec<CvActivity>,
    #[serde(deserialize_with = "null_as_default")]
    pub volunteering: Vec<CvVolunteering>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvContact {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvExperience {
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub position: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvEducation {
    #[serde(deserialize_with = "null_as_default")]
    pub institution: String,
    #[serde(deserialize_with = "null_as_default")]
    pub degree: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvProject {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvActivity {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CvVolunteering {
    #[serde(deserialize_with = "null_as_default")]
    pub organization: String,
    pub role: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
}

/// Treats an explicit `null` like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Cleans and parses raw model output.
///
/// Returns the parsed JSON exactly as the model produced it (persisted as
/// `cv_data`) alongside its typed form (rendered into the PDF).
pub fn parse_cv_response(raw: &str) -> Result<(Value, CvData), AppError> {
    let cleaned = strip_json_fences(raw);
    if cleaned.is_empty() {
        return Err(AppError::Llm("model returned no CV data".to_string()));
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| AppError::Llm(format!("model returned invalid JSON: {e}")))?;

    if !value.is_object() {
        return Err(AppError::Llm(
            "model returned JSON that is not an object".to_string(),
        ));
    }

    let data = CvData::deserialize(&value)
        .map_err(|e| AppError::Llm(format!("model returned an unexpected CV shape: {e}")))?;

    Ok((value, data))
}

impl CvData {
    /// Fills identity and contact fields the model left blank from the profile.
    pub fn fill_from_profile(&mut self, profile: &ProfileRow) {
        if self.full_name.trim().is_empty() {
            self.full_name = profile
                .full_name
                .clone()
                .unwrap_or_else(|| profile.profile_name.clone());
        }
        fill_blank(&mut self.title, &profile.title);
        fill_blank(&mut self.contact.email, &Some(profile.email.clone()));
        fill_blank(&mut self.contact.phone, &profile.phone);
        fill_blank(&mut self.contact.location, &profile.location);
        if self.contact.links.is_empty() {
            self.contact.links = profile.links.0.clone();
        }
    }
}

fn fill_blank(slot: &mut Option<String>, fallback: &Option<String>) {
    let blank = slot.as_deref().map_or(true, |s| s.trim().is_empty());
    if blank {
        if let Some(value) = fallback.as_deref().filter(|v| !v.trim().is_empty()) {
            *slot = Some(value.to_string());
        }
    }
}

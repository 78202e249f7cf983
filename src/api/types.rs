use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::applicant::Applicant;

// Response of POST /resources/auth/login
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AuthResponse {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub payload: String,
}

// GET /resources/applicants/{id} answers with a page even for a single id
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ApplicantList {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub list: ApplicantPage,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicantPage {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub items: Vec<Applicant>,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub total_items: u64,
}

/// The service sends `null` for fields it has no value for. Reads that as the
/// field's default instead of failing the whole response.
pub(crate) fn deserialize_null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Writes every field of `update` over `target`, descending into nested
/// objects. Fields missing from `update` (or null there) keep their old value.
pub fn merge_json(target: &mut Value, update: Value) {
    match (target, update) {
        (Value::Object(target), Value::Object(update)) => {
            for (key, value) in update {
                if value.is_null() {
                    continue;
                }
                match target.get_mut(&key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, update) => {
            if !update.is_null() {
                *target = update;
            }
        }
    }
}

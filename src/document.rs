use serde::{Deserialize, Serialize};

use crate::api::types::deserialize_null_as_default;
use crate::tags::{IdDocSubType, IdDocType};

/// Describes the file sent along with it in a document upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetaData {
    pub id_doc_type: IdDocType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_doc_sub_type: Option<IdDocSubType>,
    #[serde(default, deserialize_with = "deserialize_null_as_default")]
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, rename = "dob", skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
}

impl DocumentMetaData {
    pub fn new(id_doc_type: IdDocType, country: impl Into<String>) -> Self {
        DocumentMetaData {
            id_doc_type,
            id_doc_sub_type: None,
            country: country.into(),
            first_name: None,
            last_name: None,
            middle_name: None,
            issued_date: None,
            valid_until: None,
            number: None,
            date_of_birth: None,
            place_of_birth: None,
        }
    }

    pub fn with_sub_type(mut self, sub_type: IdDocSubType) -> Self {
        self.id_doc_sub_type = Some(sub_type);
        self
    }
}

use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use spdlog::prelude::*;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::api::client::{ApiClient, ClientError};
use crate::api::types::{ApplicantList, merge_json};
use crate::applicant::Applicant;
use crate::document::DocumentMetaData;
use crate::review::{ApplicantCompleteRequest, ApplicantStatus};

/// Applicants API
impl ApiClient {
    /// Creates an applicant. Fields the service sends back (id, timestamps,
    /// review) are written into `applicant`; fields it leaves out keep the
    /// value they had.
    ///
    /// Performs POST /resources/applicants
    pub async fn create_applicant(&self, applicant: &mut Applicant) -> Result<(), ClientError> {
        let url = self.url(&["resources", "applicants"]);
        let body = self.post(url, &*applicant).await?;

        let mut merged = serde_json::to_value(&*applicant)?;
        merge_json(&mut merged, serde_json::from_str(&body)?);
        *applicant = serde_json::from_value(merged)?;

        info!(
            logger: self.logger(),
            "Created applicant {} for {}",
            applicant.id.as_deref().unwrap_or("?"),
            applicant.external_user_id
        );

        Ok(())
    }

    /// Uploads one document and only checks that the service accepted it.
    /// `content` stays owned by the caller.
    ///
    /// Performs POST /resources/applicants/{id}/info/idDoc
    pub async fn add_document<R>(
        &self,
        id: &str,
        metadata: &DocumentMetaData,
        content: &mut R,
    ) -> Result<(), ClientError>
    where
        R: AsyncRead + Unpin,
    {
        self.upload_document(id, metadata, content).await?;
        Ok(())
    }

    /// Same as [`ApiClient::add_document`] but decodes the service's answer.
    pub async fn add_document_with_response<T, R>(
        &self,
        id: &str,
        metadata: &DocumentMetaData,
        content: &mut R,
    ) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        R: AsyncRead + Unpin,
    {
        let body = self.upload_document(id, metadata, content).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn upload_document<R>(
        &self,
        id: &str,
        metadata: &DocumentMetaData,
        content: &mut R,
    ) -> Result<String, ClientError>
    where
        R: AsyncRead + Unpin,
    {
        let mut file = Vec::new();
        content.read_to_end(&mut file).await?;
        debug!(
            logger: self.logger(),
            "Uploading {} ({} bytes) for applicant {}",
            metadata.id_doc_type,
            file.len(),
            id
        );

        let form = Form::new()
            .part(
                "metadata",
                Part::text(serde_json::to_string(metadata)?).mime_str("application/json")?,
            )
            .part("content", Part::bytes(file).file_name("content"));

        let url = self.url(&["resources", "applicants", id, "info", "idDoc"]);
        self.post_multipart(url, form).await
    }

    /// Fetches an applicant by id.
    ///
    /// Performs GET /resources/applicants/{id}
    pub async fn get_applicant(&self, id: &str) -> Result<Applicant, ClientError> {
        let url = self.url(&["resources", "applicants", id]);
        let list: ApplicantList = self.get(url).await?;

        list.list
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::NotFound(id.to_string()))
    }

    /// Performs GET /resources/applicants/{id}/status
    pub async fn get_applicant_status(&self, id: &str) -> Result<ApplicantStatus, ClientError> {
        let url = self.url(&["resources", "applicants", id, "status"]);
        self.get(url).await
    }

    /// Forces a review outcome. Only the sandbox honours this.
    ///
    /// Performs POST /resources/applicants/{id}/status/testCompleted
    pub async fn applicant_complete(
        &self,
        id: &str,
        request: &ApplicantCompleteRequest,
    ) -> Result<(), ClientError> {
        let url = self.url(&["resources", "applicants", id, "status", "testCompleted"]);
        self.post(url, request).await?;

        Ok(())
    }
}

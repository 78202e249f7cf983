//! Client for the Sumsub identity verification (KYC/AML) API.
//!
//! [`ApiClient::connect`] logs in once; every other method maps one endpoint:
//! creating applicants, uploading their documents, reading applicants and
//! review status, and forcing a review outcome in the sandbox.

pub mod api;
pub mod applicant;
pub mod config;
pub mod document;
pub mod review;
pub mod tags;

pub use api::{ApiClient, ApiError, AuthError, ClientError};
pub use applicant::{Address, Applicant, ApplicantDoc, ApplicantInfo, ApplicantRequiredIdDocs};
pub use config::{API_URL, ClientConfig, TEST_API_URL, TOKEN_LIFETIME_HOURS};
pub use document::DocumentMetaData;
pub use review::{ApplicantCompleteRequest, ApplicantStatus, Review, ReviewResult};
pub use tags::{IdDocSetType, IdDocSubType, IdDocType, ReviewAnswer, ReviewRejectType, ReviewStatus};

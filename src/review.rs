use serde::{Deserialize, Serialize};

use crate::api::types::deserialize_null_as_default;
use crate::tags::{ReviewAnswer, ReviewRejectType, ReviewStatus};

/// Review summary embedded in an [`Applicant`](crate::Applicant).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Review {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_result: Option<ReviewResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status: Option<ReviewStatus>,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub notification_failure_cnt: u32,
}

/// Point-in-time verification state of an applicant, fetched fresh on every call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApplicantStatus {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub inspection_id: String,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub applicant_id: String,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub job_id: String,

    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub create_date: String,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub start_date: String,

    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub review_result: ReviewResult,

    pub review_status: Option<ReviewStatus>,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub notification_failure_cnt: u32,
}

impl ApplicantStatus {
    /// The service has finished reviewing, whether or not the verdict was delivered.
    pub fn is_completed(&self) -> bool {
        matches!(
            self.review_status,
            Some(ReviewStatus::Completed)
                | Some(ReviewStatus::CompletedSent)
                | Some(ReviewStatus::CompletedSentFailure)
        )
    }

    /// Returns the moderation comment together with the verdict, so callers
    /// get the rejection reason on failure too.
    pub fn is_pass(&self) -> (&str, bool) {
        (
            &self.review_result.moderation_comment,
            self.review_result.review_answer == Some(ReviewAnswer::Green),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewResult {
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub moderation_comment: String,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub client_comment: String,
    pub review_answer: Option<ReviewAnswer>,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub reject_labels: Vec<String>,
    pub review_reject_type: Option<ReviewRejectType>,
    #[serde(deserialize_with = "deserialize_null_as_default")]
    pub custom_touch: bool,
}

/// Body of the sandbox-only `testCompleted` call that forces a review outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantCompleteRequest {
    pub review_answer: ReviewAnswer,
    pub reject_labels: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_reject_type: Option<ReviewRejectType>,
}

impl ApplicantCompleteRequest {
    pub fn green() -> Self {
        ApplicantCompleteRequest {
            review_answer: ReviewAnswer::Green,
            reject_labels: Vec::new(),
            review_reject_type: None,
        }
    }

    pub fn red(reject_labels: Vec<String>, reject_type: ReviewRejectType) -> Self {
        ApplicantCompleteRequest {
            review_answer: ReviewAnswer::Red,
            reject_labels,
            review_reject_type: Some(reject_type),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn status_with(review_status: &str) -> ApplicantStatus {
        serde_json::from_value(json!({ "reviewStatus": review_status })).unwrap()
    }

    fn status_with_answer(answer: &str, comment: &str) -> ApplicantStatus {
        serde_json::from_value(json!({
            "reviewStatus": "completed",
            "reviewResult": { "reviewAnswer": answer, "moderationComment": comment }
        }))
        .unwrap()
    }

    #[test]
    fn test_is_completed_for_terminal_statuses() {
        for status in ["completed", "completedSent", "completedSentFailure"] {
            assert!(status_with(status).is_completed(), "{status}");
        }
    }

    #[test]
    fn test_is_not_completed_for_other_statuses() {
        for status in ["init", "pending", "queued", "onHold", "COMPLETED", ""] {
            assert!(!status_with(status).is_completed(), "{status}");
        }

        assert!(!ApplicantStatus::default().is_completed());
    }

    #[test]
    fn test_is_pass_only_for_green() {
        // Given
        let green = status_with_answer("GREEN", "");
        let red = status_with_answer("RED", "Document is expired");
        let unknown = status_with_answer("YELLOW", "manual check");

        // Then
        assert_eq!(green.is_pass(), ("", true));
        assert_eq!(red.is_pass(), ("Document is expired", false));
        assert_eq!(unknown.is_pass(), ("manual check", false));
        assert_eq!(ApplicantStatus::default().is_pass(), ("", false));
    }

    #[test]
    fn test_is_pass_keeps_comment_unmodified() {
        let comment = "  Selfie does not match.\nPlease retry  ";
        let status = status_with_answer("GREEN", comment);

        assert_eq!(status.is_pass(), (comment, true));
    }

    #[test]
    fn test_review_result_tolerates_null_labels() {
        let result: ReviewResult = serde_json::from_value(json!({
            "reviewAnswer": "RED",
            "rejectLabels": null,
            "reviewRejectType": "RETRY"
        }))
        .unwrap();

        assert!(result.reject_labels.is_empty());
        assert_eq!(result.review_reject_type, Some(ReviewRejectType::Retry));
    }

    #[test]
    fn test_status_without_review_result() {
        let status: ApplicantStatus = serde_json::from_value(json!({
            "applicantId": "5b594ade0a975a36c9349e66",
            "reviewStatus": "pending",
            "reviewResult": null
        }))
        .unwrap();

        assert_eq!(status.review_result, ReviewResult::default());
        assert_eq!(status.is_pass(), ("", false));
    }

    #[test]
    fn test_status_with_every_field_null() {
        // Given
        let body = json!({
            "id": null,
            "inspectionId": null,
            "applicantId": null,
            "jobId": null,
            "createDate": null,
            "startDate": null,
            "reviewResult": {
                "moderationComment": null,
                "clientComment": null,
                "reviewAnswer": null,
                "rejectLabels": null,
                "reviewRejectType": null,
                "customTouch": null
            },
            "reviewStatus": null,
            "notificationFailureCnt": null
        });

        // When
        let status: ApplicantStatus = serde_json::from_value(body).unwrap();

        // Then
        assert_eq!(status, ApplicantStatus::default());
        assert!(!status.is_completed());
        assert_eq!(status.is_pass(), ("", false));
    }

    #[test]
    fn test_null_fields_keep_their_neighbours() {
        let status: ApplicantStatus = serde_json::from_value(json!({
            "applicantId": "5b594ade0a975a36c9349e66",
            "reviewStatus": "completed",
            "startDate": null,
            "reviewResult": { "reviewAnswer": "RED", "moderationComment": null }
        }))
        .unwrap();

        assert_eq!(status.applicant_id, "5b594ade0a975a36c9349e66");
        assert!(status.start_date.is_empty());
        assert!(status.is_completed());
        assert_eq!(status.is_pass(), ("", false));
    }

    #[test]
    fn test_embedded_review_with_nulls() {
        let review: Review = serde_json::from_value(json!({
            "createDate": null,
            "reviewResult": null,
            "reviewStatus": "pending",
            "notificationFailureCnt": null
        }))
        .unwrap();

        assert_eq!(review.notification_failure_cnt, 0);
        assert_eq!(review.review_status, Some(ReviewStatus::Pending));
    }

    #[test]
    fn test_complete_request_payload() {
        let green = serde_json::to_value(ApplicantCompleteRequest::green()).unwrap();
        let red = serde_json::to_value(ApplicantCompleteRequest::red(
            vec!["FORGERY".to_string()],
            ReviewRejectType::Final,
        ))
        .unwrap();

        assert_eq!(green, json!({ "reviewAnswer": "GREEN", "rejectLabels": [] }));
        assert_eq!(
            red,
            json!({
                "reviewAnswer": "RED",
                "rejectLabels": ["FORGERY"],
                "reviewRejectType": "FINAL"
            })
        );
    }
}

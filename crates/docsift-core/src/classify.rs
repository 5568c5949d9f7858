//! Maps generative-call failures onto a fully populated [`AnalysisResult`].

use docsift_llm::{FailureKind, LlmError};

use crate::analysis::AnalysisResult;

const PROCESSING_ERROR: &str = "Not available due to processing error.";

/// Placeholder analysis describing `err`, with the failure message in the
/// `error` field.
#[must_use]
pub fn to_result(err: &LlmError) -> AnalysisResult {
    match err.kind() {
        FailureKind::MissingKey => {
            let message = err.to_string();
            AnalysisResult {
                summary: message.clone(),
                key_points: vec!["Analysis failed due to API key error".into()],
                detailed_analysis:
                    "The operation could not be completed due to an invalid API key.".into(),
                document_comparison: PROCESSING_ERROR.into(),
                recommendations: "Please provide a valid Gemini API key and try again.".into(),
                error: Some(message),
            }
        }
        FailureKind::Auth => AnalysisResult {
            summary: "Invalid API key".into(),
            key_points: vec!["Analysis failed due to authentication error".into()],
            detailed_analysis: "The API key provided was invalid or has expired.".into(),
            document_comparison: "Not available due to API key error.".into(),
            recommendations: "Please check your API key and try again.".into(),
            error: Some("Invalid API key. Please check your Gemini API key and try again.".into()),
        },
        FailureKind::Quota => AnalysisResult {
            summary: "API quota exceeded".into(),
            key_points: vec!["Analysis failed due to quota limitations".into()],
            detailed_analysis: "Your API quota has been exceeded for the current period.".into(),
            document_comparison: "Not available due to quota limits.".into(),
            recommendations: "Please try again later or upgrade your API plan.".into(),
            error: Some(
                "API quota exceeded. Please try again later or check your API usage limits."
                    .into(),
            ),
        },
        FailureKind::EmptyResponse => AnalysisResult {
            summary: "The AI model was unable to generate a summary.".into(),
            key_points: vec!["No key points could be extracted".into()],
            detailed_analysis: "Analysis failed.".into(),
            document_comparison: "No document comparison available.".into(),
            recommendations: "No recommendations available.".into(),
            error: Some("The AI model was unable to generate a response.".into()),
        },
        FailureKind::Transport => {
            let message = err.to_string();
            AnalysisResult {
                summary: format!("Error analyzing document: {message}"),
                key_points: vec!["Analysis failed due to an error".into()],
                detailed_analysis: "The AI analysis encountered a problem.".into(),
                document_comparison: PROCESSING_ERROR.into(),
                recommendations: PROCESSING_ERROR.into(),
                error: Some(format!("Failed to analyze text: {message}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fully_populated(result: &AnalysisResult) {
        assert!(!result.summary.is_empty());
        assert!(!result.key_points.is_empty());
        assert!(!result.detailed_analysis.is_empty());
        assert!(!result.document_comparison.is_empty());
        assert!(!result.recommendations.is_empty());
        assert!(result.error.is_some());
    }

    #[test]
    fn quota_message_maps_to_quota_placeholder() {
        let result = to_result(&LlmError::Other("429 Quota Exceeded for model".into()));
        assert!(result.summary.starts_with("API quota exceeded"));
        assert_eq!(
            result.key_points,
            ["Analysis failed due to quota limitations"]
        );
        assert_fully_populated(&result);
    }

    #[test]
    fn invalid_key_maps_to_auth_placeholder() {
        let result = to_result(&LlmError::Other("Invalid API key provided".into()));
        assert_eq!(result.summary, "Invalid API key");
        assert_eq!(
            result.key_points,
            ["Analysis failed due to authentication error"]
        );
        assert!(result.detailed_analysis.contains("invalid or has expired"));
        assert!(result.document_comparison.starts_with("Not available"));
        assert_fully_populated(&result);
    }

    #[test]
    fn missing_key_placeholder() {
        let result = to_result(&LlmError::MissingApiKey);
        assert_eq!(result.summary, "No API key provided");
        assert_eq!(result.error.as_deref(), Some("No API key provided"));
        assert_eq!(result.key_points, ["Analysis failed due to API key error"]);
        assert!(result.recommendations.starts_with("Please provide a valid"));
        assert_fully_populated(&result);
    }

    #[test]
    fn empty_response_placeholder() {
        let result = to_result(&LlmError::EmptyResponse { provider: "gemini" });
        assert_eq!(
            result.summary,
            "The AI model was unable to generate a summary."
        );
        assert_eq!(result.key_points, ["No key points could be extracted"]);
        assert_eq!(result.detailed_analysis, "Analysis failed.");
        assert_eq!(
            result.document_comparison,
            "No document comparison available."
        );
        assert_eq!(result.recommendations, "No recommendations available.");
        assert_fully_populated(&result);
    }

    #[test]
    fn other_failures_carry_the_message() {
        let result = to_result(&LlmError::Other("connection refused".into()));
        assert_eq!(
            result.summary,
            "Error analyzing document: connection refused"
        );
        assert_eq!(
            result.error.as_deref(),
            Some("Failed to analyze text: connection refused")
        );
        assert_eq!(result.key_points, ["Analysis failed due to an error"]);
        assert_eq!(result.recommendations, PROCESSING_ERROR);
        assert_fully_populated(&result);
    }
}

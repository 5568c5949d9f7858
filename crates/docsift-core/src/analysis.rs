use docsift_document::FileInfo;
use serde::Serialize;

/// The five-section analysis every pipeline outcome is reported in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub key_points: Vec<String>,
    pub detailed_analysis: String,
    pub document_comparison: String,
    pub recommendations: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Analysis plus the per-file summaries, as returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub file_info: Vec<FileInfo>,
}

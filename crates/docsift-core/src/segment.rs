//! Splits a free-text model reply into the five analysis sections.
//!
//! The reply is scanned line by line with a single "current section" state.
//! A line that names a section header switches the state and is dropped;
//! other lines are appended to the current section. Lines before the first
//! header are discarded.

use crate::analysis::AnalysisResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    KeyPoints,
    DetailedAnalysis,
    DocumentComparison,
    Recommendations,
}

struct Header {
    phrase: &'static str,
    label: &'static str,
    section: Section,
}

/// Checked in order; the first match wins.
const HEADERS: [Header; 5] = [
    Header {
        phrase: "SUMMARY",
        label: "SUMMARY:",
        section: Section::Summary,
    },
    Header {
        phrase: "KEY POINTS",
        label: "KEY POINTS:",
        section: Section::KeyPoints,
    },
    Header {
        phrase: "DETAILED ANALYSIS",
        label: "DETAILED ANALYSIS:",
        section: Section::DetailedAnalysis,
    },
    Header {
        phrase: "DOCUMENT COMPARISON",
        label: "DOCUMENT COMPARISON:",
        section: Section::DocumentComparison,
    },
    Header {
        phrase: "RECOMMENDATIONS",
        label: "RECOMMENDATIONS:",
        section: Section::Recommendations,
    },
];

const BULLETS: [char; 2] = ['-', '•'];

/// Section header named by `line`, if any.
///
/// A line is a header when it contains the colon-terminated label anywhere,
/// or when its trimmed form starts with the bare phrase.
#[must_use]
pub fn match_header(line: &str) -> Option<Section> {
    let trimmed = line.trim();
    HEADERS
        .iter()
        .find(|h| line.contains(h.label) || trimmed.starts_with(h.phrase))
        .map(|h| h.section)
}

#[derive(Default)]
struct Segmenter {
    current: Option<Section>,
    summary: String,
    key_points: Vec<String>,
    detailed_analysis: String,
    document_comparison: String,
    recommendations: String,
}

impl Segmenter {
    fn feed(&mut self, line: &str) {
        if let Some(section) = match_header(line) {
            self.current = Some(section);
            return;
        }
        let Some(section) = self.current else {
            return;
        };
        let buf = match section {
            Section::KeyPoints => {
                if let Some(point) = line.trim().strip_prefix(BULLETS) {
                    self.key_points.push(point.trim().to_owned());
                }
                return;
            }
            Section::Summary => &mut self.summary,
            Section::DetailedAnalysis => &mut self.detailed_analysis,
            Section::DocumentComparison => &mut self.document_comparison,
            Section::Recommendations => &mut self.recommendations,
        };
        buf.push_str(line);
        buf.push('\n');
    }

    fn finish(self) -> AnalysisResult {
        AnalysisResult {
            summary: self.summary.trim().to_owned(),
            key_points: self.key_points,
            detailed_analysis: self.detailed_analysis.trim().to_owned(),
            document_comparison: self.document_comparison.trim().to_owned(),
            recommendations: self.recommendations.trim().to_owned(),
            error: None,
        }
    }
}

/// Parse a raw model reply. Never fails: a reply without any header yields
/// empty sections.
#[must_use]
pub fn segment(raw: &str) -> AnalysisResult {
    let mut segmenter = Segmenter::default();
    for line in raw.lines() {
        segmenter.feed(line);
    }
    segmenter.finish()
}

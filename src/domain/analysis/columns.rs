//! Column classifier - resolves which columns hold the uid and the opinion.
//!
//! Resolution order for each role:
//! 1. the configured column name (case-insensitive, exact),
//! 2. the first header containing a role keyword,
//! 3. the first remaining column of the matching kind.

use serde::{Deserialize, Serialize};

use super::dataset::ColumnKind;

const UID_KEYWORDS: &[&str] = &["uid", "id"];

const OPINION_KEYWORDS: &[&str] = &[
    "opinion", "comment", "text", "feedback", "review", "의견", "코멘트", "평가내용", "내용", "서술",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColumnResolutionError {
    #[error("dataset has no columns")]
    NoColumns,

    #[error("no opinion column found among: {}", .headers.join(", "))]
    OpinionUnresolved { headers: Vec<String> },
}

/// How a column was picked; useful for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedBy {
    Configured,
    Keyword,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRoles {
    pub uid: usize,
    pub uid_resolved_by: ResolvedBy,
    pub opinion: usize,
    pub opinion_resolved_by: ResolvedBy,
}

impl ColumnRoles {
    /// True when the column carries neither the uid nor the opinion.
    pub fn is_data_column(&self, column: usize) -> bool {
        column != self.uid && column != self.opinion
    }
}

/// Resolves the uid and opinion columns of a dataset.
///
/// `kinds` is aligned with `headers`; a configured name that is not present
/// falls through to keyword detection.
pub fn resolve_columns(
    headers: &[String],
    kinds: &[ColumnKind],
    uid_column: Option<&str>,
    opinion_column: Option<&str>,
) -> Result<ColumnRoles, ColumnResolutionError> {
    if headers.is_empty() {
        return Err(ColumnResolutionError::NoColumns);
    }

    let normalized: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();

    let (uid, uid_resolved_by) = find_configured(&normalized, uid_column, None)
        .map(|idx| (idx, ResolvedBy::Configured))
        .or_else(|| find_keyword(&normalized, UID_KEYWORDS, None).map(|idx| (idx, ResolvedBy::Keyword)))
        .unwrap_or((0, ResolvedBy::Fallback));

    let (opinion, opinion_resolved_by) = find_configured(&normalized, opinion_column, Some(uid))
        .map(|idx| (idx, ResolvedBy::Configured))
        .or_else(|| {
            find_keyword(&normalized, OPINION_KEYWORDS, Some(uid)).map(|idx| (idx, ResolvedBy::Keyword))
        })
        .or_else(|| {
            (0..headers.len())
                .find(|idx| *idx != uid && kinds.get(*idx) == Some(&ColumnKind::Text))
                .map(|idx| (idx, ResolvedBy::Fallback))
        })
        .ok_or_else(|| ColumnResolutionError::OpinionUnresolved {
            headers: headers.to_vec(),
        })?;

    Ok(ColumnRoles {
        uid,
        uid_resolved_by,
        opinion,
        opinion_resolved_by,
    })
}

fn find_configured(headers: &[String], name: Option<&str>, exclude: Option<usize>) -> Option<usize> {
    let wanted = name.map(|n| n.trim().to_lowercase()).filter(|n| !n.is_empty())?;
    headers
        .iter()
        .enumerate()
        .find(|(idx, header)| Some(*idx) != exclude && **header == wanted)
        .map(|(idx, _)| idx)
}

fn find_keyword(headers: &[String], keywords: &[&str], exclude: Option<usize>) -> Option<usize> {
    headers
        .iter()
        .enumerate()
        .find(|(idx, header)| {
            Some(*idx) != exclude && keywords.iter().any(|keyword| header.contains(keyword))
        })
        .map(|(idx, _)| idx)
}

//! OK grade bands shared by the text-only and hybrid scores.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bounds of every band above the lowest, in descending order.
pub const GRADE_BREAKPOINTS: [f64; 7] = [95.0, 90.0, 85.0, 80.0, 75.0, 70.0, 60.0];

/// Eight ordinal grade bands, declared from lowest to highest so that the
/// derived ordering matches score ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OkGrade {
    D,
    C,
    B,
    BPlus,
    A,
    OneStar,
    TwoStar,
    ThreeStar,
}

impl OkGrade {
    /// All grades from highest to lowest, aligned with [`GRADE_BREAKPOINTS`].
    pub const DESCENDING: [OkGrade; 8] = [
        OkGrade::ThreeStar,
        OkGrade::TwoStar,
        OkGrade::OneStar,
        OkGrade::A,
        OkGrade::BPlus,
        OkGrade::B,
        OkGrade::C,
        OkGrade::D,
    ];

    /// Maps a 0-100 score to its band.
    pub fn from_score(score: f64) -> Self {
        GRADE_BREAKPOINTS
            .iter()
            .position(|floor| score >= *floor)
            .map(|idx| Self::DESCENDING[idx])
            .unwrap_or(OkGrade::D)
    }

    /// Display symbol used in reports, e.g. "OK★★".
    pub fn symbol(&self) -> &'static str {
        match self {
            OkGrade::ThreeStar => "OK★★★",
            OkGrade::TwoStar => "OK★★",
            OkGrade::OneStar => "OK★",
            OkGrade::A => "OK A",
            OkGrade::BPlus => "OK B+",
            OkGrade::B => "OK B",
            OkGrade::C => "OK C",
            OkGrade::D => "OK D",
        }
    }

    /// Equivalent letter grade.
    pub fn letter(&self) -> &'static str {
        match self {
            OkGrade::ThreeStar => "S",
            OkGrade::TwoStar => "A+",
            OkGrade::OneStar => "A",
            OkGrade::A => "B+",
            OkGrade::BPlus => "B",
            OkGrade::B => "C",
            OkGrade::C => "D",
            OkGrade::D => "F",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OkGrade::ThreeStar => "탁월 - 조직 내 최고 수준의 역량",
            OkGrade::TwoStar => "매우 우수 - 전 영역에서 강점이 뚜렷함",
            OkGrade::OneStar => "우수 - 기대 수준을 꾸준히 상회함",
            OkGrade::A => "양호 - 기대 수준을 충족하며 강점이 있음",
            OkGrade::BPlus => "보통 이상 - 기대 수준을 대체로 충족함",
            OkGrade::B => "보통 - 일부 영역에서 보완이 필요함",
            OkGrade::C => "미흡 - 여러 영역에서 개선이 필요함",
            OkGrade::D => "부족 - 집중적인 개선 지원이 필요함",
        }
    }

    pub fn percentile_label(&self) -> &'static str {
        match self {
            OkGrade::ThreeStar => "Top 1%",
            OkGrade::TwoStar => "Top 5%",
            OkGrade::OneStar => "Top 10%",
            OkGrade::A => "Top 20%",
            OkGrade::BPlus => "Top 30%",
            OkGrade::B => "Top 40%",
            OkGrade::C => "Top 60%",
            OkGrade::D => "Bottom 40%",
        }
    }
}

impl fmt::Display for OkGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

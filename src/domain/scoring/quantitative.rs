//! Quantitative field extraction - classifies arbitrary columns and
//! normalizes their values onto a 0-100 scale.

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Value used for blank, missing, or unparseable input.
pub const FALLBACK_VALUE: f64 = 50.0;

/// Column category, in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Score,
    Grade,
    Rate,
    Count,
}

impl FieldCategory {
    /// Categories in the order column names are matched against them.
    pub const PRIORITY: [FieldCategory; 4] = [
        FieldCategory::Score,
        FieldCategory::Grade,
        FieldCategory::Rate,
        FieldCategory::Count,
    ];

    /// Fusion weight of a field in this category.
    pub fn weight(&self) -> f64 {
        match self {
            FieldCategory::Grade => 0.4,
            FieldCategory::Score => 0.3,
            FieldCategory::Rate => 0.2,
            FieldCategory::Count => 0.1,
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            FieldCategory::Score => &["score", "rating", "점수", "평점"],
            FieldCategory::Grade => &["grade", "level", "등급", "레벨", "평가"],
            FieldCategory::Rate => &["rate", "percent", "ratio", "%", "율", "률"],
            FieldCategory::Count => &["count", "occurrence", "횟수", "건수", "개수"],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldCategory::Score => "score",
            FieldCategory::Grade => "grade",
            FieldCategory::Rate => "rate",
            FieldCategory::Count => "count",
        }
    }
}

impl fmt::Display for FieldCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized quantitative value taken from a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantitativeSignal {
    pub column: String,
    pub category: FieldCategory,
    pub raw: Option<String>,
    /// Always within [0, 100].
    pub value: f64,
}

/// Classifies a column by name. The first matching category in
/// [`FieldCategory::PRIORITY`] wins.
pub fn classify_column(name: &str) -> Option<FieldCategory> {
    let lowered = name.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }
    FieldCategory::PRIORITY
        .into_iter()
        .find(|category| category.keywords().iter().any(|k| lowered.contains(k)))
}

/// Normalizes a raw cell value according to its category.
pub fn normalize(category: FieldCategory, raw: Option<&str>) -> f64 {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return FALLBACK_VALUE;
    };

    let value = match category {
        FieldCategory::Grade => normalize_grade(raw),
        FieldCategory::Score => normalize_score(raw),
        FieldCategory::Rate => normalize_rate(raw),
        FieldCategory::Count => normalize_count(raw),
    };
    value.clamp(0.0, 100.0)
}

pub struct QuantitativeFieldExtractor;

impl QuantitativeFieldExtractor {
    /// Extracts a signal for every classifiable column, in input order.
    pub fn extract<'a, I>(cells: I) -> Vec<QuantitativeSignal>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        cells
            .into_iter()
            .filter_map(|(column, raw)| {
                classify_column(column).map(|category| QuantitativeSignal {
                    column: column.to_string(),
                    category,
                    raw: raw.map(str::to_string),
                    value: normalize(category, raw),
                })
            })
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Category rules
// ════════════════════════════════════════════════════════════════════════════════

static GRADE_TABLE: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    let entries: &[(&str, f64)] = &[
        // letter grades
        ("S", 100.0), ("A+", 95.0), ("A", 90.0), ("A-", 85.0),
        ("B+", 85.0), ("B", 80.0), ("B-", 75.0),
        ("C+", 75.0), ("C", 70.0), ("C-", 65.0),
        ("D+", 65.0), ("D", 60.0), ("D-", 55.0),
        ("E", 40.0), ("F", 20.0),
        // numeric grades, 1 is best
        ("1등급", 100.0), ("2등급", 80.0), ("3등급", 60.0), ("4등급", 40.0), ("5등급", 20.0),
        // qualitative grades
        ("탁월", 100.0), ("최우수", 95.0), ("매우우수", 95.0), ("우수", 90.0),
        ("양호", 75.0), ("보통", 60.0), ("미흡", 45.0), ("부족", 40.0),
        ("매우미흡", 30.0), ("불량", 20.0),
        // percentile bands
        ("상위1%", 100.0), ("상위5%", 95.0), ("상위10%", 90.0), ("상위20%", 80.0),
        ("상위30%", 70.0), ("상위50%", 60.0), ("하위50%", 50.0), ("하위30%", 40.0),
        ("하위20%", 30.0), ("하위10%", 20.0),
        ("TOP1%", 100.0), ("TOP5%", 95.0), ("TOP10%", 90.0), ("TOP20%", 80.0),
        ("TOP30%", 70.0), ("TOP50%", 60.0),
        // organization tiers
        ("OK★★★", 95.0), ("OK★★", 90.0), ("OK★", 85.0), ("OKA", 80.0),
        ("OKB+", 75.0), ("OKB", 70.0), ("OKC", 60.0), ("OKD", 40.0),
    ];
    entries.iter().copied().collect()
});

/// Substring fallbacks for free-form grade text; longer phrases first.
const GRADE_KEYWORDS: &[(&str, f64)] = &[
    ("매우우수", 95.0),
    ("매우미흡", 30.0),
    ("탁월", 100.0),
    ("우수", 90.0),
    ("양호", 75.0),
    ("보통", 60.0),
    ("미흡", 45.0),
    ("excellent", 90.0),
    ("good", 75.0),
    ("average", 60.0),
    ("poor", 45.0),
];

fn grade_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

fn normalize_grade(raw: &str) -> f64 {
    if let Some(value) = GRADE_TABLE.get(grade_key(raw).as_str()) {
        return *value;
    }
    if let Some(number) = parse_leading_number(raw) {
        return rescale_by_range(number, false);
    }
    let lowered = raw.to_lowercase();
    GRADE_KEYWORDS
        .iter()
        .find(|(keyword, _)| lowered.contains(keyword))
        .map(|(_, value)| *value)
        .unwrap_or(FALLBACK_VALUE)
}

fn normalize_score(raw: &str) -> f64 {
    parse_leading_number(raw)
        .map(|number| rescale_by_range(number, true))
        .unwrap_or(FALLBACK_VALUE)
}

fn normalize_rate(raw: &str) -> f64 {
    let explicit_percent = raw.contains('%');
    match parse_leading_number(&raw.replace('%', "")) {
        Some(number) if !explicit_percent && (0.0..=1.0).contains(&number) => number * 100.0,
        Some(number) => number.clamp(0.0, 100.0),
        None => FALLBACK_VALUE,
    }
}

fn normalize_count(raw: &str) -> f64 {
    match parse_leading_number(raw) {
        Some(n) if n <= 0.0 => 30.0,
        Some(n) if n <= 2.0 => 50.0,
        Some(n) if n <= 5.0 => 70.0,
        Some(n) if n <= 10.0 => 85.0,
        Some(_) => 95.0,
        None => FALLBACK_VALUE,
    }
}

/// Rescales a number by the range it appears to come from.
///
/// `[0,1]` is treated as a fraction only when `allow_fraction` is set;
/// `≤5` as a 1-5 scale, `≤10` as a 10-point scale, `≤100` as-is.
fn rescale_by_range(value: f64, allow_fraction: bool) -> f64 {
    if value < 0.0 {
        0.0
    } else if allow_fraction && value <= 1.0 {
        value * 100.0
    } else if value <= 5.0 {
        ((value - 1.0) * 25.0).max(0.0)
    } else if value <= 10.0 {
        value * 10.0
    } else {
        value.min(100.0)
    }
}

/// Parses the leading number of a cell, ignoring thousands separators and any
/// trailing unit text ("85점", "3회", "4.5 / 5").
fn parse_leading_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    let mut token = String::new();
    let mut seen_dot = false;

    for (idx, c) in cleaned.chars().enumerate() {
        match c {
            '-' | '+' if idx == 0 => token.push(c),
            '0'..='9' => token.push(c),
            '.' if !seen_dot => {
                seen_dot = true;
                token.push(c);
            }
            _ => break,
        }
    }

    if !token.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse::<f64>().ok().filter(|n| n.is_finite())
}

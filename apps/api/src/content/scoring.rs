//! SEO score: deterministic length checks on the generated meta fields and H1.
//!
//! The accepted ranges (30–60 title, 120–160 description) are wider than the
//! 50–60 / 140–160 targets the prompt asks for.
//!
//! Lengths are Unicode scalar values, so an emoji counts once (a UTF-16
//! `.length` would count it twice).

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

pub const TITLE_RANGE: RangeInclusive<usize> = 30..=60;
pub const DESCRIPTION_RANGE: RangeInclusive<usize> = 120..=160;
pub const H1_MAX: usize = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoChecks {
    pub title_ok: bool,
    pub desc_ok: bool,
    pub h1_ok: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScore {
    pub title_length: usize,
    pub description_length: usize,
    pub checks: SeoChecks,
}

/// The heading the score assumes the page carries: `"<service> in <city>"`.
pub fn synthesized_h1(service: &str, city: &str) -> String {
    format!("{service} in {city}")
}

/// Lengths are counted in characters, not bytes.
pub fn score(meta_title: &str, meta_description: &str, h1: &str) -> SeoScore {
    let title_length = meta_title.chars().count();
    let description_length = meta_description.chars().count();
    let h1_length = h1.chars().count();

    SeoScore {
        title_length,
        description_length,
        checks: SeoChecks {
            title_ok: TITLE_RANGE.contains(&title_length),
            desc_ok: DESCRIPTION_RANGE.contains(&description_length),
            h1_ok: h1_length > 0 && h1_length <= H1_MAX,
        },
    }
}

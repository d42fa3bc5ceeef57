//! Turning model text into a [`CareerAnalysis`].

use wp_core::entities::CareerAnalysis;

use crate::error::AiError;

/// Minimum number of career paths a usable analysis must carry.
pub const MIN_CAREER_PATHS: usize = 3;

/// Strip a surrounding markdown code fence (with optional language tag).
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        let body = rest.find('\n').map_or(rest, |nl| &rest[nl + 1..]);
        if let Some(content) = body.trim_end().strip_suffix("```") {
            return content.trim();
        }
    }
    trimmed
}

/// The outermost `{ ... }` span of `text`, if any.
fn outer_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse and validate model output.
///
/// Accepts fenced or bare JSON, and JSON surrounded by prose. Career paths
/// are re-ranked by match score.
///
/// # Errors
///
/// [`AiError::Parse`] if no analysis object can be decoded, the summary or
/// dominant trait is empty, or fewer than [`MIN_CAREER_PATHS`] careers are
/// present.
pub fn parse_analysis(text: &str) -> Result<CareerAnalysis, AiError> {
    let body = strip_code_fences(text);
    let mut analysis: CareerAnalysis = match serde_json::from_str(body) {
        Ok(a) => a,
        Err(first) => {
            let object = outer_object(body)
                .ok_or_else(|| AiError::Parse(format!("no JSON object in response: {first}")))?;
            serde_json::from_str(object)
                .map_err(|e| AiError::Parse(format!("invalid analysis JSON: {e}")))?
        }
    };

    if analysis.summary.trim().is_empty() {
        return Err(AiError::Parse("analysis summary is empty".into()));
    }
    if analysis.riasec_profile.dominant_trait.trim().is_empty() {
        return Err(AiError::Parse("dominant trait is empty".into()));
    }
    if analysis.career_paths.len() < MIN_CAREER_PATHS {
        return Err(AiError::Parse(format!(
            "expected at least {MIN_CAREER_PATHS} career paths, got {}",
            analysis.career_paths.len()
        )));
    }

    analysis
        .career_paths
        .sort_by(|a, b| b.match_score.cmp(&a.match_score));
    for path in &mut analysis.career_paths {
        path.match_score = path.match_score.min(100);
    }
    Ok(analysis)
}

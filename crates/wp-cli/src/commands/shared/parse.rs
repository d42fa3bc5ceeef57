use std::io::Read as _;

use anyhow::Context;
use serde::de::DeserializeOwned;
use wp_core::entities::ResponseSubmission;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse `QUESTION_ID=ANSWER:SCORE`. The score is split at the last colon so
/// answers may contain colons.
pub fn parse_answer(raw: &str) -> anyhow::Result<ResponseSubmission> {
    let (question_id, rest) = raw
        .split_once('=')
        .with_context(|| format!("invalid answer '{raw}': expected QUESTION_ID=ANSWER:SCORE"))?;
    let (answer, score) = rest
        .rsplit_once(':')
        .with_context(|| format!("invalid answer '{raw}': missing ':SCORE'"))?;
    let score: f64 = score
        .trim()
        .parse()
        .with_context(|| format!("invalid answer '{raw}': score '{score}' is not a number"))?;
    Ok(ResponseSubmission {
        question_id: question_id.trim().to_string(),
        answer: answer.trim().to_string(),
        score,
    })
}

/// Read a JSON array of submissions from a file, or stdin for `-`.
pub fn read_answers_file(path: &str) -> anyhow::Result<Vec<ResponseSubmission>> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read answers from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path).with_context(|| format!("failed to read answers file {path}"))?
    };
    serde_json::from_str(&raw).with_context(|| format!("answers file {path} is not a JSON array of answers"))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wp_core::enums::Category;

    use super::*;

    #[test]
    fn parses_snake_case_enum() {
        let category: Category = parse_enum("aptitude", "category").expect("category should parse");
        assert_eq!(category, Category::Aptitude);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<Category>("hobbies", "category").expect_err("should fail");
        assert!(err.to_string().contains("invalid category 'hobbies'"));
    }

    #[test]
    fn parses_answer_triplet() {
        let parsed = parse_answer("qst-int01=strongly_agree:100").unwrap();
        assert_eq!(parsed.question_id, "qst-int01");
        assert_eq!(parsed.answer, "strongly_agree");
        assert!((parsed.score - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn answer_may_contain_colons() {
        let parsed = parse_answer("qst-apt03=10:30 am:75").unwrap();
        assert_eq!(parsed.answer, "10:30 am");
        assert!((parsed.score - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_malformed_answers() {
        assert!(parse_answer("qst-int01").is_err());
        assert!(parse_answer("qst-int01=agree").is_err());
        assert!(parse_answer("qst-int01=agree:lots").is_err());
    }

    #[test]
    fn reads_answers_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            r#"[{"questionId": "qst-int01", "answer": "agree", "score": 75}]"#,
        )
        .unwrap();
        let answers = read_answers_file(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].question_id, "qst-int01");
    }
}

use crate::models::{Letter, Question};
use regex::Regex;

lazy_static::lazy_static! {
    // Fixed response template: a "Question:" line, the four option lines in
    // order, then somewhere below a "Correct Answer:" line. The greedy skip
    // means the last "Correct Answer:" occurrence wins if several appear.
    static ref QUESTION_PATTERN: Regex = Regex::new(
        r"(?s)Question:\s*(.*?)\nA\)\s*(.*?)\nB\)\s*(.*?)\nC\)\s*(.*?)\nD\)\s*(.*?)\n.*Correct Answer:\s*([ABCD])"
    )
    .unwrap();
}

/// Parse the raw model output into a structured question.
///
/// Format-strict: any deviation from the template (missing option label,
/// different casing of "Correct Answer") rejects the whole response. There
/// is no partial or repair parse.
pub fn parse_question(raw: &str) -> Option<Question> {
    let caps = QUESTION_PATTERN.captures(raw)?;
    let group = |i: usize| caps.get(i).map(|m| m.as_str().trim().to_string());
    let correct = caps.get(6)?.as_str().parse::<Letter>().ok()?;

    Some(Question {
        text: group(1)?,
        options: [group(2)?, group(3)?, group(4)?, group(5)?],
        correct,
        raw_response: raw.to_string(),
    })
}

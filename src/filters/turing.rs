use tracing::debug;

use crate::domain::{FieldValue, FormSubmission};

pub const INCORRECT_ANSWER: &str = "Incorrect answer";

#[derive(Debug, Clone, Copy, Default)]
pub struct TuringTestFilter;

impl TuringTestFilter {
    pub fn evaluate<S, I, K, V>(submission: &mut S, answers: I) -> bool
    where
        S: FormSubmission + ?Sized,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut is_spam = false;
        for (name, expected) in answers {
            let name = name.as_ref();
            let correct = match submission.field_value(name) {
                Some(value) => answer_matches(value, expected.as_ref()),
                None => {
                    debug!(target: "turing", field = name, "challenge field not present; skipping");
                    continue;
                }
            };
            if !correct {
                debug!(target: "turing", field = name, "incorrect challenge answer");
                submission.attach_field_error(name, INCORRECT_ANSWER);
                is_spam = true;
            }
        }
        is_spam
    }
}

fn answer_matches(value: &FieldValue, expected: &str) -> bool {
    let expected = expected.trim().to_lowercase();
    match value {
        FieldValue::Scalar(submitted) => submitted.trim().to_lowercase() == expected,
        FieldValue::Multi(values) => match values.as_slice() {
            [only] => only.trim().to_lowercase() == expected,
            _ => false,
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::Submission;

    fn answers(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn padded_correct_answer_passes() {
        let mut submission = Submission::new();
        submission.insert("captcha", "  7 ");
        assert!(!TuringTestFilter::evaluate(&mut submission, &answers(&[("captcha", "7")])));
        assert!(submission.field("captcha").unwrap().errors.is_empty());
    }

    #[test]
    fn wrong_answer_is_spam_and_annotated() {
        let mut submission = Submission::new();
        submission.insert("captcha", "eight");
        assert!(TuringTestFilter::evaluate(&mut submission, &answers(&[("captcha", "7")])));
        assert_eq!(
            submission.field("captcha").unwrap().errors,
            vec![INCORRECT_ANSWER.to_string()]
        );
    }

    #[test]
    fn comparison_ignores_case() {
        let mut submission = Submission::new();
        submission.insert("color", "BLUE");
        assert!(!TuringTestFilter::evaluate(&mut submission, &answers(&[("color", "blue")])));
    }

    #[test]
    fn missing_challenge_field_is_not_a_failure() {
        let mut submission = Submission::new();
        submission.insert("name", "Ann");
        assert!(!TuringTestFilter::evaluate(&mut submission, &answers(&[("captcha", "7")])));
        assert_eq!(submission.error_count(), 0);
    }

    #[test]
    fn every_wrong_answer_is_annotated() {
        let mut submission = Submission::new();
        submission.insert("q1", "wrong");
        submission.insert("q2", "right");
        submission.insert("q3", "also wrong");
        let config = answers(&[("q1", "a"), ("q2", "right"), ("q3", "c")]);
        assert!(TuringTestFilter::evaluate(&mut submission, &config));
        assert_eq!(submission.field("q1").unwrap().errors.len(), 1);
        assert!(submission.field("q2").unwrap().errors.is_empty());
        assert_eq!(submission.field("q3").unwrap().errors.len(), 1);
    }

    #[test]
    fn multi_value_answer_needs_exactly_one_matching_value() {
        let mut single = Submission::new();
        single.insert("pick", vec!["Seven"]);
        assert!(!TuringTestFilter::evaluate(&mut single, &answers(&[("pick", "seven")])));

        let mut several = Submission::new();
        several.insert("pick", vec!["seven", "eight"]);
        assert!(TuringTestFilter::evaluate(&mut several, &answers(&[("pick", "seven")])));
    }
}

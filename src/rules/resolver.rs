use crate::domain::{FormSubmission, RawParams};

pub struct FieldResolver<'a, S: ?Sized> {
    fields: &'a S,
    raw: &'a RawParams,
}

impl<'a, S> FieldResolver<'a, S>
where
    S: FormSubmission + ?Sized,
{
    pub fn new(fields: &'a S, raw: &'a RawParams) -> Self {
        Self { fields, raw }
    }

    /// An empty selector yields every raw value. A named selector prefers the
    /// raw parameter of that name, then the declared field, and yields nothing
    /// when neither exists. Values come back trimmed.
    pub fn resolve(&self, selector: &str) -> Vec<String> {
        if selector.is_empty() {
            return self.raw.flatten().map(trimmed).collect();
        }
        match self.raw.get(selector).or_else(|| self.fields.field_value(selector)) {
            Some(value) => value.values().map(trimmed).collect(),
            None => Vec::new(),
        }
    }

    pub fn raw(&self) -> &'a RawParams {
        self.raw
    }
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Submission;

    fn submission() -> Submission {
        let mut submission = Submission::new();
        submission.insert("email", " x@example.com ");
        submission.insert_field("country", "CA");
        submission.insert_raw("country", "US");
        submission.insert_field("declared_only", vec!["a", " b "]);
        submission.insert_raw("tampered", "injected");
        submission
    }

    #[test]
    fn empty_selector_flattens_raw_parameters() {
        let submission = submission();
        let resolver = FieldResolver::new(&submission, submission.raw_params());
        assert_eq!(
            resolver.resolve(""),
            vec!["x@example.com", "US", "injected"]
        );
    }

    #[test]
    fn raw_parameter_takes_precedence_over_declared_field() {
        let submission = submission();
        let resolver = FieldResolver::new(&submission, submission.raw_params());
        assert_eq!(resolver.resolve("country"), vec!["US"]);
        assert_eq!(resolver.resolve("tampered"), vec!["injected"]);
    }

    #[test]
    fn falls_back_to_declared_multi_value_field() {
        let submission = submission();
        let resolver = FieldResolver::new(&submission, submission.raw_params());
        assert_eq!(resolver.resolve("declared_only"), vec!["a", "b"]);
    }

    #[test]
    fn unknown_selector_resolves_to_nothing() {
        let submission = submission();
        let resolver = FieldResolver::new(&submission, submission.raw_params());
        assert!(resolver.resolve("missing").is_empty());
    }
}

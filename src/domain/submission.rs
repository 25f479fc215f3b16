use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    Multi(Vec<String>),
}

impl FieldValue {
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            FieldValue::Scalar(value) => std::slice::from_ref(value),
            FieldValue::Multi(values) => values,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multi(values)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(values: Vec<&str>) -> Self {
        FieldValue::Multi(values.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawParams {
    entries: Vec<(String, FieldValue)>,
}

impl RawParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn flatten(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flat_map(|(_, value)| value.values())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawParams
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RawParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

impl<'de> Deserialize<'de> for RawParams {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = RawParams;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to a string or list of strings")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut params = RawParams::new();
                while let Some((name, value)) = map.next_entry::<String, FieldValue>()? {
                    params.insert(name, value);
                }
                Ok(params)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: FieldValue,
    pub errors: Vec<String>,
}

impl FormField {
    pub fn new(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            errors: Vec::new(),
        }
    }
}

pub trait FormSubmission {
    fn field_value(&self, name: &str) -> Option<&FieldValue>;

    fn raw_params(&self) -> &RawParams;

    fn attach_field_error(&mut self, name: &str, message: &str);

    fn add_error(&mut self, message: &str);

    fn error_count(&self) -> usize;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    fields: Vec<FormField>,
    raw: RawParams,
    errors: Vec<String>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a submission whose raw parameters mirror the declared fields,
    /// as a plain form POST would.
    pub fn from_post(fields: RawParams) -> Self {
        let mut submission = Self::new();
        for (name, value) in fields.iter() {
            submission.insert(name, value.clone());
        }
        submission
    }

    pub fn with_raw(fields: RawParams, raw: RawParams) -> Self {
        let mut submission = Self::new();
        for (name, value) in fields.iter() {
            submission.insert_field(name, value.clone());
        }
        submission.raw = raw;
        submission
    }

    pub fn insert(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        self.raw.insert(name, value.clone());
        self.insert_field(name, value);
    }

    pub fn insert_field(&mut self, name: &str, value: impl Into<FieldValue>) {
        let value = value.into();
        match self.fields.iter_mut().find(|field| field.name == name) {
            Some(field) => field.value = value,
            None => self.fields.push(FormField::new(name, value)),
        }
    }

    pub fn insert_raw(&mut self, name: &str, value: impl Into<FieldValue>) {
        self.raw.insert(name, value);
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl FormSubmission for Submission {
    fn field_value(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|field| &field.value)
    }

    fn raw_params(&self) -> &RawParams {
        &self.raw
    }

    fn attach_field_error(&mut self, name: &str, message: &str) {
        if let Some(field) = self.fields.iter_mut().find(|field| field.name == name) {
            field.errors.push(message.to_string());
        }
    }

    fn add_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn error_count(&self) -> usize {
        self.errors.len() + self.fields.iter().map(|field| field.errors.len()).sum::<usize>()
    }
}

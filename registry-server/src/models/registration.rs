//! Registration entity and the inbound form it is validated from

use std::fmt;

use serde::de::{self, Deserializer, SeqAccess, Unexpected, Visitor};
use serde::{Deserialize, Serialize};

use super::validation::ValidationError;

/// Column order used by every INSERT into `registrations`.
pub const COLUMNS: [&str; 9] = [
    "name",
    "email",
    "age",
    "nationality",
    "student_id",
    "school",
    "degree",
    "year_of_admission",
    "languages",
];

/// Raw submission as posted by the client.
///
/// Every field is optional at this stage; `validate` decides what is
/// required. Values are read leniently so that HTML forms and JSON
/// clients produce the same thing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationForm {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nationality: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub student_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year_of_admission: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub languages: Option<String>,
}

impl RegistrationForm {
    /// Check the required fields and produce a `Registration`.
    ///
    /// `name`, `email` and `student_id` must be present and non-empty.
    /// Optional fields that arrived as empty strings become `None`.
    pub fn validate(self) -> Result<Registration, ValidationError> {
        let mut missing = Vec::new();
        let name = required(self.name, "name", &mut missing);
        let email = required(self.email, "email", &mut missing);
        let student_id = required(self.student_id, "student_id", &mut missing);

        let (Some(name), Some(email), Some(student_id)) = (name, email, student_id) else {
            return Err(ValidationError::MissingRequired { fields: missing });
        };

        Ok(Registration {
            name,
            email,
            age: optional(self.age),
            nationality: optional(self.nationality),
            student_id,
            school: optional(self.school),
            degree: optional(self.degree),
            year_of_admission: optional(self.year_of_admission),
            languages: optional(self.languages),
        })
    }
}

fn required(
    value: Option<String>,
    field: &'static str,
    missing: &mut Vec<&'static str>,
) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(v),
        _ => {
            missing.push(field);
            None
        }
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A validated registration, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub age: Option<String>,
    pub nationality: Option<String>,
    pub student_id: String,
    pub school: Option<String>,
    pub degree: Option<String>,
    pub year_of_admission: Option<String>,
    pub languages: Option<String>,
}

impl Registration {
    /// Registration with only the required fields set.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        student_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            age: None,
            nationality: None,
            student_id: student_id.into(),
            school: None,
            degree: None,
            year_of_admission: None,
            languages: None,
        }
    }

    /// Value of a column by name, in the shape it is bound to SQL.
    ///
    /// Returns `None` both for unknown columns and for absent optional values.
    pub fn column(&self, column: &str) -> Option<&str> {
        match column {
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "age" => self.age.as_deref(),
            "nationality" => self.nationality.as_deref(),
            "student_id" => Some(&self.student_id),
            "school" => self.school.as_deref(),
            "degree" => self.degree.as_deref(),
            "year_of_admission" => self.year_of_admission.as_deref(),
            "languages" => self.languages.as_deref(),
            _ => None,
        }
    }
}

/// Accept strings, numbers, booleans, null, or a list of scalars.
///
/// Lists are joined with `,` so multi-select inputs land in one column.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientText)
}

struct LenientText;

impl<'de> Visitor<'de> for LenientText {
    type Value = Option<String>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string, number, boolean, or a list of those")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Some(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(Some(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Some(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(LenientText)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut parts = Vec::new();
        while let Some(item) = seq.next_element::<serde_json::Value>()? {
            match item {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => parts.push(s),
                serde_json::Value::Number(n) => parts.push(n.to_string()),
                serde_json::Value::Bool(b) => parts.push(b.to_string()),
                _ => {
                    return Err(de::Error::invalid_type(
                        Unexpected::Other("nested value"),
                        &self,
                    ))
                }
            }
        }
        Ok(Some(parts.join(",")))
    }
}

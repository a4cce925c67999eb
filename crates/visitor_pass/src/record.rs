//! Visitor record shared by the draft, the in-flight payload and the
//! submitted snapshot.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Identifies one input of the registration form.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Field {
    FirstName,
    MiddleName,
    LastName,
    Address,
    Purpose,
}

impl Field {
    /// Form order.
    pub const ALL: [Field; 5] = [
        Field::FirstName,
        Field::MiddleName,
        Field::LastName,
        Field::Address,
        Field::Purpose,
    ];

    /// Name fields only accept letters and whitespace and are word-capitalised.
    pub fn is_name(self) -> bool {
        matches!(self, Field::FirstName | Field::MiddleName | Field::LastName)
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::MiddleName)
    }

    /// Placeholder / label shown next to the input.
    pub fn label(self) -> &'static str {
        match self {
            Field::FirstName => "First Name",
            Field::MiddleName => "Middle Name (Optional)",
            Field::LastName => "Last Name",
            Field::Address => "Address",
            Field::Purpose => "Purpose",
        }
    }
}

/// The five form values. Serialises to the endpoint's camelCase JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorRecord {
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub address: String,
    pub purpose: String,
}

impl VisitorRecord {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::MiddleName => &self.middle_name,
            Field::LastName => &self.last_name,
            Field::Address => &self.address,
            Field::Purpose => &self.purpose,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::MiddleName => &mut self.middle_name,
            Field::LastName => &mut self.last_name,
            Field::Address => &mut self.address,
            Field::Purpose => &mut self.purpose,
        };
        *slot = value.into();
    }

    /// True when every field is the empty string.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }

    /// Build a new record by transforming each field.
    pub fn map(&self, mut f: impl FnMut(Field, &str) -> String) -> Self {
        let mut out = Self::default();
        for field in Field::ALL {
            out.set(field, f(field, self.get(field)));
        }
        out
    }

    /// "First Middle Last", skipping an empty middle name.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .filter(|part| !part.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn all_matches_declaration_order() {
        let iterated: Vec<Field> = Field::iter().collect();
        assert_eq!(iterated, Field::ALL.to_vec());
    }

    #[test]
    fn serialises_with_endpoint_field_names() {
        let record = VisitorRecord {
            first_name: "Ana".into(),
            middle_name: String::new(),
            last_name: "Cruz".into(),
            address: "Lapasan, Cagayan de Oro".into(),
            purpose: "Enrollment".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "firstName": "Ana",
                "middleName": "",
                "lastName": "Cruz",
                "address": "Lapasan, Cagayan de Oro",
                "purpose": "Enrollment",
            })
        );
    }

    #[test]
    fn full_name_skips_empty_middle() {
        let mut record = VisitorRecord {
            first_name: "Ana".into(),
            last_name: "Cruz".into(),
            ..Default::default()
        };
        assert_eq!(record.full_name(), "Ana Cruz");

        record.set(Field::MiddleName, "Maria");
        assert_eq!(record.full_name(), "Ana Maria Cruz");
    }

    #[test]
    fn field_display_uses_wire_names() {
        assert_eq!(Field::FirstName.to_string(), "firstName");
        assert_eq!(Field::Purpose.to_string(), "purpose");
    }
}

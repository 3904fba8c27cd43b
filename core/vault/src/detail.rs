//! Typed records parsed from decrypted detail payloads.
//!
//! Detail JSON is an open object; these records pull out the shapes every
//! client understands. Parsing is lenient throughout: missing or
//! wrongly-typed keys fall back to zero values, unknown codes fall back to
//! an explicit variant, and missing sub-arrays are empty, not errors.

use serde_json::Value;

use opvault_common::DataMap;

/// Decrypted item detail.
#[derive(Debug, Clone, Default)]
pub struct ItemDetail {
    pub notes_plain: String,
    pub fields: Vec<Field>,
    pub sections: Vec<Section>,
}

impl ItemDetail {
    pub(crate) fn from_map(map: &DataMap) -> Self {
        Self {
            notes_plain: map.get_str("notesPlain").to_string(),
            fields: map.get_map_list("fields").iter().map(Field::from_map).collect(),
            sections: map
                .get_map_list("sections")
                .iter()
                .map(Section::from_map)
                .collect(),
        }
    }
}

/// A saved web-form field.
#[derive(Debug, Clone, Default)]
pub struct Field {
    pub kind: FieldKind,
    pub name: String,
    pub value: String,
    pub designation: Designation,
}

impl Field {
    fn from_map(map: &DataMap) -> Self {
        Self {
            kind: FieldKind::from_code(map.get_str("type")),
            name: map.get_str("name").to_string(),
            value: map.get_str("value").to_string(),
            designation: Designation::from_code(map.get_str("designation")),
        }
    }
}

/// Web-form field type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldKind {
    Password,
    Text,
    Email,
    Number,
    Radio,
    Telephone,
    Checkbox,
    Url,
    #[default]
    Unknown,
}

impl FieldKind {
    /// Map a form-field type code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "P" => Self::Password,
            "T" => Self::Text,
            "E" => Self::Email,
            "N" => Self::Number,
            "R" => Self::Radio,
            "TEL" => Self::Telephone,
            "C" => Self::Checkbox,
            "U" => Self::Url,
            _ => Self::Unknown,
        }
    }
}

/// What a login field stands for when filling a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Designation {
    /// No designation (the empty code).
    #[default]
    None,
    Username,
    Password,
}

impl Designation {
    /// Map a designation code; anything unrecognized counts as none.
    pub fn from_code(code: &str) -> Self {
        match code {
            "username" => Self::Username,
            "password" => Self::Password,
            _ => Self::None,
        }
    }
}

/// A named group of section fields.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub name: String,
    pub title: String,
    pub fields: Vec<SectionField>,
}

impl Section {
    fn from_map(map: &DataMap) -> Self {
        Self {
            name: map.get_str("name").to_string(),
            title: map.get_str("title").to_string(),
            fields: map
                .get_map_list("fields")
                .iter()
                .map(SectionField::from_map)
                .collect(),
        }
    }
}

/// A field within a section.
///
/// The value shape depends on the kind: addresses are objects, dates are
/// numbers, most of the rest are strings. The raw JSON value is kept and
/// the common views are offered as accessors.
#[derive(Debug, Clone, Default)]
pub struct SectionField {
    pub kind: SectionFieldKind,
    pub name: String,
    pub title: String,
    pub value: Value,
}

impl SectionField {
    fn from_map(map: &DataMap) -> Self {
        Self {
            kind: SectionFieldKind::from_code(map.get_str("k")),
            name: map.get_str("n").to_string(),
            title: map.get_str("t").to_string(),
            value: map.get("v").cloned().unwrap_or(Value::Null),
        }
    }

    /// String view of the value, or `""`.
    pub fn value_str(&self) -> &str {
        self.value.as_str().unwrap_or("")
    }

    /// Integer view of the value, or `0`.
    pub fn value_i64(&self) -> i64 {
        match &self.value {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or(0),
            _ => 0,
        }
    }
}

/// Section field kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionFieldKind {
    Concealed,
    Address,
    Date,
    MonthYear,
    String,
    Url,
    CcType,
    Phone,
    Gender,
    Email,
    Menu,
    #[default]
    Unknown,
}

impl SectionFieldKind {
    /// Map a section-field kind code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "concealed" => Self::Concealed,
            "address" => Self::Address,
            "date" => Self::Date,
            "monthYear" => Self::MonthYear,
            "string" => Self::String,
            "URL" => Self::Url,
            "cctype" => Self::CcType,
            "phone" => Self::Phone,
            "gender" => Self::Gender,
            "email" => Self::Email,
            "menu" => Self::Menu,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn detail_from(value: Value) -> ItemDetail {
        let Value::Object(map) = value else {
            unreachable!()
        };
        ItemDetail::from_map(&DataMap::from(map))
    }

    #[test]
    fn test_login_fields_parse() {
        let detail = detail_from(json!({
            "fields": [
                {"type": "T", "name": "username", "value": "alice", "designation": "username"},
                {"type": "P", "name": "password", "value": "hunter2", "designation": "password"},
            ],
        }));

        assert_eq!(detail.fields.len(), 2);
        assert!(detail.sections.is_empty());
        assert!(detail.notes_plain.is_empty());

        let username = &detail.fields[0];
        assert_eq!(username.kind, FieldKind::Text);
        assert_eq!(username.name, "username");
        assert_eq!(username.value, "alice");
        assert_eq!(username.designation, Designation::Username);

        let password = &detail.fields[1];
        assert_eq!(password.kind, FieldKind::Password);
        assert_eq!(password.value, "hunter2");
        assert_eq!(password.designation, Designation::Password);
    }

    #[test]
    fn test_missing_arrays_are_empty() {
        let detail = detail_from(json!({"notesPlain": "remember the milk"}));
        assert_eq!(detail.notes_plain, "remember the milk");
        assert!(detail.fields.is_empty());
        assert!(detail.sections.is_empty());
    }

    #[test]
    fn test_sections_parse_with_mixed_value_shapes() {
        let detail = detail_from(json!({
            "sections": [
                {
                    "name": "address",
                    "title": "Address",
                    "fields": [
                        {"k": "address", "n": "address", "t": "address", "v": {"city": "Berlin"}},
                        {"k": "date", "n": "birthdate", "t": "birth date", "v": 1373753414},
                        {"k": "string", "n": "firstname", "t": "first name", "v": "Alice"},
                    ],
                },
                {"name": "linked items", "title": "Related Items"},
            ],
        }));

        assert_eq!(detail.sections.len(), 2);
        let fields = &detail.sections[0].fields;
        assert_eq!(fields.len(), 3);

        assert_eq!(fields[0].kind, SectionFieldKind::Address);
        assert_eq!(fields[0].value_str(), "");
        assert_eq!(fields[0].value["city"], "Berlin");

        assert_eq!(fields[1].kind, SectionFieldKind::Date);
        assert_eq!(fields[1].value_i64(), 1373753414);

        assert_eq!(fields[2].kind, SectionFieldKind::String);
        assert_eq!(fields[2].value_str(), "Alice");

        assert!(detail.sections[1].fields.is_empty());
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        assert_eq!(FieldKind::from_code("X"), FieldKind::Unknown);
        assert_eq!(FieldKind::from_code(""), FieldKind::Unknown);
        assert_eq!(Designation::from_code(""), Designation::None);
        assert_eq!(Designation::from_code("other"), Designation::None);
        assert_eq!(SectionFieldKind::from_code("url"), SectionFieldKind::Unknown);
        assert_eq!(SectionFieldKind::from_code("URL"), SectionFieldKind::Url);
    }

    #[test]
    fn test_field_rows_with_wrong_types_fall_back() {
        let detail = detail_from(json!({
            "fields": [
                {"type": 7, "name": 1, "value": null, "designation": []},
            ],
        }));
        let field = &detail.fields[0];
        assert_eq!(field.kind, FieldKind::Unknown);
        assert!(field.name.is_empty());
        assert!(field.value.is_empty());
        assert_eq!(field.designation, Designation::None);
    }
}

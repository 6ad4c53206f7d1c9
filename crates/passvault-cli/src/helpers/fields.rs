//! Parsing of `--field` arguments.
//!
//! Accepted forms:
//! - `name=value`
//! - `name:kind=value` where kind is one of the field kinds (`hidden`, `email`, ...)
//! - `name=-` reads the value from a hidden prompt

use std::str::FromStr;

use passvault_core::{Field, FieldKind, RecordKind};

use super::input::prompt_secret_value;

/// A parsed `--field` argument before the kind has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub kind: Option<FieldKind>,
    pub value: String,
}

impl FieldSpec {
    /// Resolve the field kind: explicit kind, then the record kind's
    /// template, then plain text.
    pub fn into_field(self, record_kind: RecordKind) -> Field {
        let kind = self.kind.unwrap_or_else(|| {
            record_kind
                .default_fields()
                .into_iter()
                .find(|f| f.name == self.name)
                .map(|f| f.kind)
                .unwrap_or_default()
        });
        Field::new(self.name, self.value, kind)
    }
}

pub fn parse_field_spec(raw: &str) -> anyhow::Result<FieldSpec> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Invalid field \"{}\" (expected name=value)", raw))?;

    let (name, kind) = match key.split_once(':') {
        Some((name, kind)) => {
            let kind = FieldKind::from_str(kind.trim())?;
            (name.trim(), Some(kind))
        }
        None => (key.trim(), None),
    };
    if name.is_empty() {
        return Err(anyhow::anyhow!("Field name cannot be empty: \"{}\"", raw));
    }

    let value = if value == "-" {
        prompt_secret_value(name)?
    } else {
        value.to_string()
    };

    Ok(FieldSpec {
        name: name.to_string(),
        kind,
        value,
    })
}

/// Parse every `--field` argument and resolve kinds against `record_kind`.
pub fn parse_field_specs(raw: &[String], record_kind: RecordKind) -> anyhow::Result<Vec<Field>> {
    raw.iter()
        .map(|spec| parse_field_spec(spec).map(|s| s.into_field(record_kind)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_spec() {
        let spec = parse_field_spec("login=alice").unwrap();
        assert_eq!(spec.name, "login");
        assert_eq!(spec.kind, None);
        assert_eq!(spec.value, "alice");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let spec = parse_field_spec("token=a=b=c").unwrap();
        assert_eq!(spec.value, "a=b=c");
    }

    #[test]
    fn test_explicit_kind() {
        let spec = parse_field_spec("recovery:hidden=abc").unwrap();
        assert_eq!(spec.kind, Some(FieldKind::Hidden));
        let field = spec.into_field(RecordKind::Credential);
        assert!(field.kind.is_masked());
    }

    #[test]
    fn test_template_kind_applies() {
        let field = parse_field_spec("password=sesame")
            .unwrap()
            .into_field(RecordKind::Credential);
        assert_eq!(field.kind, FieldKind::Hidden);

        let field = parse_field_spec("pet=rex")
            .unwrap()
            .into_field(RecordKind::Credential);
        assert_eq!(field.kind, FieldKind::Text);
    }

    #[test]
    fn test_invalid_specs() {
        assert!(parse_field_spec("no-equals").is_err());
        assert!(parse_field_spec("=value").is_err());
        assert!(parse_field_spec("x:bogus=1").is_err());
    }
}

//! Core data types for the vault.
//!
//! A [`Vault`] is an insertion-ordered list of [`Record`]s. Each record has
//! an immutable identity, a closed [`RecordKind`], and an ordered list of
//! uniquely named [`Field`]s.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroize;

use crate::error::{Result, VaultError};

/// Kind of a record. Each kind carries a default field template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Free text only, no fields
    Note,
    /// Login, password and site
    Credential,
    /// Payment card
    Card,
    /// Personal identity details
    Identity,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Note,
        RecordKind::Credential,
        RecordKind::Card,
        RecordKind::Identity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Note => "note",
            RecordKind::Credential => "credential",
            RecordKind::Card => "card",
            RecordKind::Identity => "identity",
        }
    }

    /// Whether records of this kind may carry fields.
    pub fn has_fields(&self) -> bool {
        !matches!(self, RecordKind::Note)
    }

    /// Field template for a freshly created record of this kind (all values empty).
    pub fn default_fields(&self) -> Vec<Field> {
        let template: &[(&str, FieldKind)] = match self {
            RecordKind::Note => &[],
            RecordKind::Credential => &[
                ("login", FieldKind::Text),
                ("password", FieldKind::Hidden),
                ("url", FieldKind::Link),
            ],
            RecordKind::Card => &[
                ("number", FieldKind::CardNumber),
                ("holder", FieldKind::Text),
                ("expires", FieldKind::Date),
                ("pin", FieldKind::Pin),
            ],
            RecordKind::Identity => &[
                ("full_name", FieldKind::Text),
                ("email", FieldKind::Email),
                ("phone", FieldKind::Text),
            ],
        };
        template
            .iter()
            .map(|(name, kind)| Field::new(*name, "", *kind))
            .collect()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        RecordKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| {
                VaultError::InvalidInput(format!(
                    "Unknown record kind: {} (expected note, credential, card or identity)",
                    value
                ))
            })
    }
}

/// Type of a field value; doubles as the masked/plain display hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Hidden,
    Email,
    Link,
    Pin,
    CardNumber,
    Date,
}

impl FieldKind {
    /// Masked fields should not be shown unless the user asks for them.
    pub fn is_masked(&self) -> bool {
        matches!(
            self,
            FieldKind::Hidden | FieldKind::Pin | FieldKind::CardNumber
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Hidden => "hidden",
            FieldKind::Email => "email",
            FieldKind::Link => "link",
            FieldKind::Pin => "pin",
            FieldKind::CardNumber => "card_number",
            FieldKind::Date => "date",
        }
    }
}

impl FromStr for FieldKind {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(FieldKind::Text),
            "hidden" | "password" => Ok(FieldKind::Hidden),
            "email" => Ok(FieldKind::Email),
            "link" | "url" => Ok(FieldKind::Link),
            "pin" => Ok(FieldKind::Pin),
            "card_number" => Ok(FieldKind::CardNumber),
            "date" => Ok(FieldKind::Date),
            other => Err(VaultError::InvalidInput(format!(
                "Unknown field kind: {}",
                other
            ))),
        }
    }
}

/// A named value inside a record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub kind: FieldKind,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind,
        }
    }

    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, FieldKind::Text)
    }

    pub fn hidden(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, value, FieldKind::Hidden)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: &dyn fmt::Debug = if self.kind.is_masked() {
            &"[REDACTED]"
        } else {
            &self.value
        };
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("value", value)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Zeroize for Field {
    fn zeroize(&mut self) {
        self.name.zeroize();
        self.value.zeroize();
    }
}

/// A vault record.
///
/// The identity is fixed at creation; everything else changes only through
/// [`RecordUpdate`] so validation runs on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: Uuid,
    kind: RecordKind,
    name: String,
    #[serde(default)]
    fields: Vec<Field>,
    #[serde(default)]
    note: String,
    #[serde(default)]
    favorite: bool,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Record {
    /// Build and validate a new record with a fresh identity.
    pub fn create(new: NewRecord) -> Result<Self> {
        let now = Utc::now();
        let fields = new
            .fields
            .unwrap_or_else(|| new.kind.default_fields());
        let record = Self {
            id: Uuid::new_v4(),
            kind: new.kind,
            name: new.name,
            fields,
            note: new.note,
            favorite: new.favorite,
            created_at: now,
            modified_at: now,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn note(&self) -> &str {
        &self.note
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Check record invariants.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(VaultError::Validation(format!(
                "Record {} has an empty name",
                self.id
            )));
        }

        if !self.kind.has_fields() && !self.fields.is_empty() {
            return Err(VaultError::Validation(format!(
                "Record {} is a note and cannot have fields",
                self.id
            )));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(VaultError::Validation(format!(
                    "Record {} has a field with an empty name",
                    self.id
                )));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(VaultError::Validation(format!(
                    "Duplicate field name in record {}: {}",
                    self.id, field.name
                )));
            }
        }

        if self.modified_at < self.created_at {
            return Err(VaultError::Validation(format!(
                "Record {} was modified before it was created",
                self.id
            )));
        }

        Ok(())
    }

    /// Apply `update` to a copy of this record and return it validated.
    pub(crate) fn updated(&self, update: &RecordUpdate) -> Result<Self> {
        let mut next = self.clone();
        if let Some(name) = &update.name {
            next.name = name.clone();
        }
        if let Some(note) = &update.note {
            next.note = note.clone();
        }
        if let Some(favorite) = update.favorite {
            next.favorite = favorite;
        }
        if let Some(fields) = &update.replace_fields {
            next.fields = fields.clone();
        }
        for name in &update.remove_fields {
            let before = next.fields.len();
            next.fields.retain(|field| &field.name != name);
            if next.fields.len() == before {
                return Err(VaultError::Validation(format!(
                    "Record {} has no field named {}",
                    self.id, name
                )));
            }
        }
        for field in &update.set_fields {
            match next.fields.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => *existing = field.clone(),
                None => next.fields.push(field.clone()),
            }
        }
        next.modified_at = Utc::now().max(self.created_at);
        next.validate()?;
        Ok(next)
    }
}

impl Zeroize for Record {
    fn zeroize(&mut self) {
        self.name.zeroize();
        self.note.zeroize();
        for field in self.fields.iter_mut() {
            field.zeroize();
        }
        self.fields.clear();
    }
}

/// Builder for creating new records.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub kind: RecordKind,
    pub name: String,
    /// `None` means "use the kind's default field template".
    pub fields: Option<Vec<Field>>,
    pub note: String,
    pub favorite: bool,
}

impl NewRecord {
    pub fn new(kind: RecordKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            fields: None,
            note: String::new(),
            favorite: false,
        }
    }

    /// Set a field, starting from the kind's template on first use.
    pub fn with_field(mut self, field: Field) -> Self {
        let kind = self.kind;
        let fields = self.fields.get_or_insert_with(|| kind.default_fields());
        match fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => fields.push(field),
        }
        self
    }

    /// Replace the whole field list.
    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = Some(fields);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = favorite;
        self
    }
}

/// Changeset applied by `VaultStore::update_record`.
///
/// Order of application: name/note/favorite, `replace_fields`,
/// `remove_fields`, then `set_fields` (upsert by name).
#[derive(Debug, Clone, Default)]
pub struct RecordUpdate {
    pub name: Option<String>,
    pub note: Option<String>,
    pub favorite: Option<bool>,
    pub replace_fields: Option<Vec<Field>>,
    pub remove_fields: Vec<String>,
    pub set_fields: Vec<Field>,
}

impl RecordUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn replace_fields(mut self, fields: Vec<Field>) -> Self {
        self.replace_fields = Some(fields);
        self
    }

    pub fn remove_field(mut self, name: impl Into<String>) -> Self {
        self.remove_fields.push(name.into());
        self
    }

    pub fn set_field(mut self, field: Field) -> Self {
        self.set_fields.push(field);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.note.is_none()
            && self.favorite.is_none()
            && self.replace_fields.is_none()
            && self.remove_fields.is_empty()
            && self.set_fields.is_empty()
    }
}

/// Filter for querying records.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Filter by record kind
    pub kind: Option<RecordKind>,

    /// Filter by favorite flag
    pub favorite: Option<bool>,

    /// Case-insensitive substring match on name, note and unmasked field values
    pub text: Option<String>,
}

impl RecordFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: RecordKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn favorite(mut self, favorite: bool) -> Self {
        self.favorite = Some(favorite);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn matches(&self, record: &Record) -> bool {
        if self.kind.is_some_and(|kind| kind != record.kind) {
            return false;
        }
        if self.favorite.is_some_and(|favorite| favorite != record.favorite) {
            return false;
        }
        match &self.text {
            None => true,
            Some(text) => {
                let needle = text.to_lowercase();
                record.name.to_lowercase().contains(&needle)
                    || record.note.to_lowercase().contains(&needle)
                    || record.fields.iter().any(|field| {
                        !field.kind.is_masked() && field.value.to_lowercase().contains(&needle)
                    })
            }
        }
    }
}

/// The decrypted collection of records for one container.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    records: Vec<Record>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a vault from records, enforcing every invariant.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let vault = Self { records };
        vault.validate()?;
        Ok(vault)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &Uuid) -> Option<&Record> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub(crate) fn position(&self, id: &Uuid) -> Option<usize> {
        self.records.iter().position(|record| &record.id == id)
    }

    pub(crate) fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub(crate) fn replace_at(&mut self, index: usize, record: Record) {
        self.records[index] = record;
    }

    pub(crate) fn remove_at(&mut self, index: usize) -> Record {
        self.records.remove(index)
    }

    /// Check every record and identity uniqueness.
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.records.len());
        for record in &self.records {
            if !ids.insert(record.id) {
                return Err(VaultError::Validation(format!(
                    "Duplicate record id: {}",
                    record.id
                )));
            }
            record.validate()?;
        }
        Ok(())
    }
}

impl Zeroize for Vault {
    fn zeroize(&mut self) {
        for record in self.records.iter_mut() {
            record.zeroize();
        }
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_uses_kind_template() {
        let record = Record::create(NewRecord::new(RecordKind::Credential, "Mail")).unwrap();

        let names: Vec<&str> = record.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["login", "password", "url"]);
        assert!(record.field("password").unwrap().kind.is_masked());
        assert_eq!(record.created_at(), record.modified_at());
    }

    #[test]
    fn test_with_field_fills_template_slot() {
        let record = Record::create(
            NewRecord::new(RecordKind::Credential, "Mail")
                .with_field(Field::hidden("password", "hunter22"))
                .with_field(Field::text("recovery", "abc")),
        )
        .unwrap();

        assert_eq!(record.fields().len(), 4);
        assert_eq!(record.field("password").unwrap().value, "hunter22");
        assert_eq!(record.fields()[3].name, "recovery");
    }

    #[test]
    fn test_duplicate_field_names_rejected() {
        let result = Record::create(
            NewRecord::new(RecordKind::Credential, "Mail")
                .with_fields(vec![Field::text("login", "a"), Field::text("login", "b")]),
        );
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_note_cannot_have_fields() {
        let result = Record::create(
            NewRecord::new(RecordKind::Note, "Wifi").with_fields(vec![Field::text("ssid", "x")]),
        );
        assert!(matches!(result, Err(VaultError::Validation(_))));

        let note = Record::create(NewRecord::new(RecordKind::Note, "Wifi").with_note("pw: x"))
            .unwrap();
        assert!(note.fields().is_empty());
        assert_eq!(note.note(), "pw: x");
    }

    #[test]
    fn test_blank_name_rejected() {
        let result = Record::create(NewRecord::new(RecordKind::Card, "   "));
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_update_keeps_identity_and_bumps_modified() {
        let record = Record::create(NewRecord::new(RecordKind::Credential, "Mail")).unwrap();
        let updated = record
            .updated(
                &RecordUpdate::new()
                    .name("Work mail")
                    .favorite(true)
                    .set_field(Field::text("login", "me@example.com"))
                    .remove_field("url"),
            )
            .unwrap();

        assert_eq!(updated.id(), record.id());
        assert_eq!(updated.created_at(), record.created_at());
        assert!(updated.modified_at() >= record.modified_at());
        assert_eq!(updated.name(), "Work mail");
        assert!(updated.is_favorite());
        assert_eq!(updated.field("login").unwrap().value, "me@example.com");
        assert!(updated.field("url").is_none());
    }

    #[test]
    fn test_update_removing_missing_field_fails() {
        let record = Record::create(NewRecord::new(RecordKind::Card, "Visa")).unwrap();
        let result = record.updated(&RecordUpdate::new().remove_field("cvv"));
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_filter_matches() {
        let mail = Record::create(
            NewRecord::new(RecordKind::Credential, "Mail")
                .with_field(Field::text("login", "Alice@Example.com"))
                .with_field(Field::hidden("password", "sesame")),
        )
        .unwrap();

        assert!(RecordFilter::new().matches(&mail));
        assert!(RecordFilter::new().kind(RecordKind::Credential).matches(&mail));
        assert!(!RecordFilter::new().kind(RecordKind::Note).matches(&mail));
        assert!(!RecordFilter::new().favorite(true).matches(&mail));
        assert!(RecordFilter::new().text("alice@").matches(&mail));
        assert!(RecordFilter::new().text("MAIL").matches(&mail));
        // masked values are not searchable
        assert!(!RecordFilter::new().text("sesame").matches(&mail));
    }

    #[test]
    fn test_filter_literal_text_is_case_insensitive() {
        let mail = Record::create(
            NewRecord::new(RecordKind::Credential, "Mail")
                .with_field(Field::text("login", "alice@example.com")),
        )
        .unwrap();

        let filter = RecordFilter {
            text: Some("ALICE".into()),
            ..RecordFilter::default()
        };
        assert!(filter.matches(&mail));
    }

    #[test]
    fn test_vault_rejects_duplicate_ids() {
        let record = Record::create(NewRecord::new(RecordKind::Note, "a")).unwrap();
        let result = Vault::from_records(vec![record.clone(), record]);
        assert!(matches!(result, Err(VaultError::Validation(_))));
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Card".parse::<RecordKind>().unwrap(), RecordKind::Card);
        assert!("wallet".parse::<RecordKind>().is_err());
        assert_eq!("url".parse::<FieldKind>().unwrap(), FieldKind::Link);
    }

    #[test]
    fn test_field_debug_redacts_masked_values() {
        let hidden = format!("{:?}", Field::hidden("password", "sesame"));
        assert!(!hidden.contains("sesame"));
        assert!(hidden.contains("REDACTED"));

        let plain = format!("{:?}", Field::text("login", "alice"));
        assert!(plain.contains("alice"));
    }

    #[test]
    fn test_vault_zeroize_clears_records() {
        let record = Record::create(NewRecord::new(RecordKind::Note, "a")).unwrap();
        let mut vault = Vault::from_records(vec![record]).unwrap();
        vault.zeroize();
        assert!(vault.is_empty());
    }
}

/// Recipe request payloads
///
/// Field presence is explicit: every field is an `Option`, and a missing
/// field means "not provided". For nested collections this is what
/// separates "leave tags alone" (`tags` absent) from "remove all tags"
/// (`tags: []`). JSON `null` is treated the same as absent.
///
/// Owner-like fields (`user`, `user_id`) are not part of the payload and are
/// silently dropped during deserialization; the owner always comes from the
/// authenticated identity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::recipe::{NewRecipe, RecipeChanges};

/// Longest accepted title, link, tag or ingredient name
pub const MAX_NAME_LENGTH: usize = 255;

/// `NUMERIC(5, 2)`: at most 3 digits before the point
const PRICE_MAX_INTEGER_DIGITS: u32 = 3;
const PRICE_DECIMAL_PLACES: u32 = 2;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";
pub const NUL_CHARACTER: &str = "Null characters are not allowed.";

/// Postgres text columns cannot store U+0000
pub fn contains_nul(value: &str) -> bool {
    value.contains('\0')
}

/// A field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Path of the offending field, e.g. `title` or `tags[1].name`
    pub field: String,

    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// How a payload is going to be applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// POST: title, time_minutes and price are required
    Create,

    /// PUT: same required fields as create; the rest stay optional
    Replace,

    /// PATCH: everything optional
    Patch,
}

impl WriteMode {
    fn requires_core_fields(self) -> bool {
        matches!(self, WriteMode::Create | WriteMode::Replace)
    }
}

/// A nested `{name}` record for tags or ingredients
///
/// `name` is optional at the type level so that a missing name surfaces as a
/// field error rather than a body parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    pub name: Option<String>,
}

impl NameRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

/// Body of a recipe create, full update or partial update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct RecipePayload {
    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub title: Option<String>,

    #[validate(range(min = 0, message = "Ensure this value is greater than or equal to 0."))]
    pub time_minutes: Option<i32>,

    pub price: Option<Decimal>,

    #[validate(length(max = 255, message = "Ensure this field has no more than 255 characters."))]
    pub link: Option<String>,

    pub description: Option<String>,

    pub tags: Option<Vec<NameRecord>>,

    pub ingredients: Option<Vec<NameRecord>>,
}

/// A payload that passed validation, split into scalar changes and nested
/// collections
///
/// Nested collections hold trimmed names. `None` means "not provided".
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    pub changes: RecipeChanges,
    pub tags: Option<Vec<String>>,
    pub ingredients: Option<Vec<String>>,
}

impl ValidatedPayload {
    /// Turns the changes into a full insert, if the core fields are present
    ///
    /// Always `Some` for payloads validated in [`WriteMode::Create`].
    pub fn new_recipe(&self) -> Option<NewRecipe> {
        Some(NewRecipe {
            title: self.changes.title.clone()?,
            time_minutes: self.changes.time_minutes?,
            price: self.changes.price?,
            link: self.changes.link.clone().unwrap_or_default(),
            description: self.changes.description.clone().unwrap_or_default(),
        })
    }
}

impl RecipePayload {
    /// Validates every field, scalar and nested, before anything is written
    ///
    /// All problems are reported at once, sorted by field path.
    pub fn validate_for(self, mode: WriteMode) -> Result<ValidatedPayload, Vec<FieldError>> {
        let mut errors: Vec<FieldError> = Vec::new();

        if let Err(e) = self.validate() {
            for (field, field_errors) in e.field_errors() {
                for error in field_errors.iter() {
                    errors.push(FieldError::new(
                        field.to_string(),
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Invalid value.".to_string()),
                    ));
                }
            }
        }

        if mode.requires_core_fields() {
            if self.title.is_none() {
                errors.push(FieldError::new("title", REQUIRED));
            }
            if self.time_minutes.is_none() {
                errors.push(FieldError::new("time_minutes", REQUIRED));
            }
            if self.price.is_none() {
                errors.push(FieldError::new("price", REQUIRED));
            }
        }

        let title = self.title.as_deref().map(str::trim);
        if title == Some("") {
            errors.push(FieldError::new("title", BLANK));
        }

        for (field, value) in [
            ("title", &self.title),
            ("link", &self.link),
            ("description", &self.description),
        ] {
            if value.as_deref().is_some_and(contains_nul) {
                errors.push(FieldError::new(field, NUL_CHARACTER));
            }
        }

        if let Some(price) = &self.price {
            if let Err(message) = check_price(price) {
                errors.push(FieldError::new("price", message));
            }
        }

        let tags = self
            .tags
            .as_deref()
            .map(|records| collect_names("tags", records, &mut errors));
        let ingredients = self
            .ingredients
            .as_deref()
            .map(|records| collect_names("ingredients", records, &mut errors));

        if !errors.is_empty() {
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            return Err(errors);
        }

        Ok(ValidatedPayload {
            changes: RecipeChanges {
                title: title.map(str::to_string),
                time_minutes: self.time_minutes,
                price: self.price.map(|p| p.round_dp(PRICE_DECIMAL_PLACES)),
                link: self.link.map(|l| l.trim().to_string()),
                description: self.description,
            },
            tags,
            ingredients,
        })
    }
}

/// Checks a price against `NUMERIC(5, 2)` and the non-negative rule
fn check_price(price: &Decimal) -> Result<(), String> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err("Ensure this value is greater than or equal to 0.".to_string());
    }

    if price.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(format!(
            "Ensure that there are no more than {} decimal places.",
            PRICE_DECIMAL_PLACES
        ));
    }

    if price.trunc().abs() >= Decimal::from(10u32.pow(PRICE_MAX_INTEGER_DIGITS)) {
        return Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            PRICE_MAX_INTEGER_DIGITS
        ));
    }

    Ok(())
}

/// Validates nested records, returning their trimmed names in input order
fn collect_names(field: &str, records: &[NameRecord], errors: &mut Vec<FieldError>) -> Vec<String> {
    let mut names = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        let path = format!("{}[{}].name", field, index);

        match record.name.as_deref().map(str::trim) {
            None => errors.push(FieldError::new(path, REQUIRED)),
            Some("") => errors.push(FieldError::new(path, BLANK)),
            Some(name) if contains_nul(name) => errors.push(FieldError::new(path, NUL_CHARACTER)),
            Some(name) if name.chars().count() > MAX_NAME_LENGTH => errors.push(FieldError::new(
                path,
                "Ensure this field has no more than 255 characters.",
            )),
            Some(name) => names.push(name.to_string()),
        }
    }

    names
}

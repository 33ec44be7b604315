//! Calendar fields and the rules that derive one field from others.
//!
//! A [`DerivationRegistry`] is an ordered list of [`FieldDerivation`]s plus
//! an arena of [`FieldDefinition`]s keyed by [`DateField`]. Looking up a
//! field picks the first derivation whose required fields are all present
//! and whose prohibited fields are all absent, feeds it the required values
//! in declared order, and checks the answer against the field's range.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    str::FromStr,
    sync::Arc,
};

use serde::{Deserialize, Serialize};

use crate::{
    boundary::Boundary,
    compare::{Comparator, Nullable, Outcome},
    error::{Error, Result},
    prelude::*,
};

/// A named calendar quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DateField {
    /// Numeric value of the era (0 before year 1, 1 from year 1).
    Era,
    /// 1-based year counted within its era.
    YearOfEra,
    /// Continuous year in the calendar's own frame.
    Year,
    /// Continuous January-start proleptic Gregorian year.
    CanonicalYear,
    /// 1 for a leap year, 0 otherwise.
    LeapYear,
    MonthOfYear,
    DayOfMonth,
    DayOfYear,
    /// Days since 2000-01-01.
    EpochDay,
}

impl DateField {
    pub const ALL: [Self; 9] = [
        Self::Era,
        Self::YearOfEra,
        Self::Year,
        Self::CanonicalYear,
        Self::LeapYear,
        Self::MonthOfYear,
        Self::DayOfMonth,
        Self::DayOfYear,
        Self::EpochDay,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Era => "Era",
            Self::YearOfEra => "YearOfEra",
            Self::Year => "Year",
            Self::CanonicalYear => "CanonicalYear",
            Self::LeapYear => "LeapYear",
            Self::MonthOfYear => "MonthOfYear",
            Self::DayOfMonth => "DayOfMonth",
            Self::DayOfYear => "DayOfYear",
            Self::EpochDay => "EpochDay",
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| Error::type_error(format!("unknown date field {s:?}")))
    }
}

/// A partially specified date: field name to integer value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFieldMap(BTreeMap<DateField, i64>);

impl DateFieldMap {
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value of `field` if it is set.
    pub fn get(&self, field: DateField) -> Option<i64> {
        self.0.get(&field).copied()
    }

    pub fn has(&self, field: DateField) -> bool {
        self.0.contains_key(&field)
    }

    /// A copy with `field` set to `value`.
    #[must_use]
    pub fn with(&self, field: DateField, value: i64) -> Self {
        let mut fields = self.0.clone();
        fields.insert(field, value);
        Self(fields)
    }

    /// A copy without `field`.
    #[must_use]
    pub fn without(&self, field: DateField) -> Self {
        let mut fields = self.0.clone();
        fields.remove(&field);
        Self(fields)
    }

    pub fn fields(&self) -> impl Iterator<Item = DateField> + '_ {
        self.0.keys().copied()
    }
}

impl FromIterator<(DateField, i64)> for DateFieldMap {
    fn from_iter<I: IntoIterator<Item = (DateField, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[(DateField, i64); N]> for DateFieldMap {
    fn from(fields: [(DateField, i64); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl fmt::Display for DateFieldMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (field, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {value}")?;
        }
        f.write_str("}")
    }
}

/// Result of looking a field up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldLookup {
    Found(i64),
    /// A derivation applied but produced no valid value.
    Invalid,
    /// No derivation applies to the given fields.
    NotFound,
}

impl FieldLookup {
    pub const fn value(self) -> Option<i64> {
        match self {
            Self::Found(value) => Some(value),
            Self::Invalid | Self::NotFound => None,
        }
    }

    pub const fn is_found(self) -> bool {
        matches!(self, Self::Found(_))
    }
}

impl Nullable for FieldLookup {
    fn is_null(&self) -> bool {
        matches!(self, Self::Invalid)
    }

    fn is_undefined(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// True if every one of `fields` is set.
pub fn has_every_field(map: &DateFieldMap, fields: &[DateField]) -> bool {
    fields.iter().all(|field| map.has(*field))
}

/// True if at least one of `fields` is set.
pub fn has_some_field(map: &DateFieldMap, fields: &[DateField]) -> bool {
    fields.iter().any(|field| map.has(*field))
}

/// First of `fields` that is set, with its value.
pub fn get_some_field(map: &DateFieldMap, fields: &[DateField]) -> Option<(DateField, i64)> {
    fields.iter().find_map(|field| map.get(*field).map(|value| (*field, value)))
}

/// First group of `groups` whose fields are all set: its index and values.
///
/// Used to choose between alternative descriptions of the same quantity,
/// e.g. `[Year]`, `[CanonicalYear]` or `[Era, YearOfEra]`.
pub fn get_some_fields(map: &DateFieldMap, groups: &[&[DateField]]) -> Option<(usize, Vec<i64>)> {
    groups.iter().enumerate().find_map(|(index, group)| {
        group
            .iter()
            .map(|field| map.get(*field))
            .collect::<Option<Vec<_>>>()
            .map(|values| (index, values))
    })
}

type DeriveFn = dyn Fn(&[i64]) -> Option<i64> + Send + Sync;

/// A rule computing one field from an ordered list of other fields.
#[derive(Clone)]
pub struct FieldDerivation {
    field:      DateField,
    required:   Vec<DateField>,
    prohibited: Vec<DateField>,
    arity:      usize,
    derive:     Arc<DeriveFn>,
}

impl fmt::Debug for FieldDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDerivation")
            .field("field", &self.field)
            .field("required", &self.required)
            .field("prohibited", &self.prohibited)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl FieldDerivation {
    /// A derivation taking `arity` values, in the order of `required`.
    pub fn new<F>(field: DateField, required: &[DateField], arity: usize, derive: F) -> Self
    where
        F: Fn(&[i64]) -> Option<i64> + Send + Sync + 'static,
    {
        Self {
            field,
            required: required.to_vec(),
            prohibited: Vec::new(),
            arity,
            derive: Arc::new(derive),
        }
    }

    pub fn unary<F>(field: DateField, required: DateField, derive: F) -> Self
    where
        F: Fn(i64) -> Option<i64> + Send + Sync + 'static,
    {
        Self::new(field, &[required], 1, move |values| match values {
            [a] => derive(*a),
            _ => None,
        })
    }

    pub fn binary<F>(field: DateField, required: [DateField; 2], derive: F) -> Self
    where
        F: Fn(i64, i64) -> Option<i64> + Send + Sync + 'static,
    {
        Self::new(field, &required, 2, move |values| match values {
            [a, b] => derive(*a, *b),
            _ => None,
        })
    }

    pub fn ternary<F>(field: DateField, required: [DateField; 3], derive: F) -> Self
    where
        F: Fn(i64, i64, i64) -> Option<i64> + Send + Sync + 'static,
    {
        Self::new(field, &required, 3, move |values| match values {
            [a, b, c] => derive(*a, *b, *c),
            _ => None,
        })
    }

    /// Refuses to apply when any of `fields` is present.
    #[must_use]
    pub fn prohibiting(mut self, fields: &[DateField]) -> Self {
        self.prohibited.extend_from_slice(fields);
        self
    }

    pub const fn field(&self) -> DateField {
        self.field
    }

    pub fn required(&self) -> &[DateField] {
        &self.required
    }

    pub fn prohibited(&self) -> &[DateField] {
        &self.prohibited
    }

    pub const fn arity(&self) -> usize {
        self.arity
    }

    /// Required fields are distinct, exclude the derived field and every
    /// prohibited field, and match the declared arity.
    pub fn is_valid(&self) -> bool {
        let required: BTreeSet<_> = self.required.iter().collect();
        required.len() == self.required.len()
            && self.arity == self.required.len()
            && !required.contains(&self.field)
            && self.prohibited.iter().all(|field| !required.contains(field))
    }

    /// All required fields present and all prohibited fields absent.
    pub fn applies_to(&self, map: &DateFieldMap) -> bool {
        has_every_field(map, &self.required) && !has_some_field(map, &self.prohibited)
    }

    /// Invokes the rule. `Ok(None)` means the inputs do not describe a
    /// valid value.
    ///
    /// # Errors
    /// `Error::Arity` when `values` does not match the declared arity.
    pub fn derive(&self, values: &[i64]) -> Result<Option<i64>> {
        if values.len() != self.arity {
            return Err(Error::Arity {
                field:    self.field,
                expected: self.arity,
                actual:   values.len(),
            });
        }
        Ok((self.derive)(values))
    }

    /// Invokes the rule with the required fields taken from `map`.
    ///
    /// # Errors
    /// `Error::MissingField` if a required field is absent,
    /// `Error::Arity` as for [`FieldDerivation::derive`].
    pub fn derive_from(&self, map: &DateFieldMap) -> Result<Option<i64>> {
        let values = self
            .required
            .iter()
            .map(|field| map.get(*field).ok_or(Error::MissingField(*field)))
            .collect::<Result<Vec<_>>>()?;
        self.derive(&values)
    }
}

/// Static description of a field: its valid range and the field it lives in.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefinition {
    pub field:  DateField,
    pub range:  Boundary<i64>,
    pub parent: Option<DateField>,
}

impl FieldDefinition {
    pub fn new(field: DateField, range: Boundary<i64>, parent: Option<DateField>) -> Self {
        Self {
            field,
            range: range.recomparatored(Some(&Comparator::natural())),
            parent,
        }
    }

    pub fn accepts(&self, value: i64) -> Outcome<bool> {
        self.range.within_bounds(&value, None)
    }
}

/// Ordered derivations and the field definitions they are checked against.
#[derive(Debug, Clone, Default)]
pub struct DerivationRegistry {
    derivations: Vec<FieldDerivation>,
    definitions: BTreeMap<DateField, FieldDefinition>,
}

impl DerivationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry over a built-in rule set.
    pub(crate) fn trusted(
        definitions: impl IntoIterator<Item = FieldDefinition>,
        derivations: Vec<FieldDerivation>,
    ) -> Self {
        debug_assert!(derivations.iter().all(FieldDerivation::is_valid));
        Self {
            derivations,
            definitions: definitions.into_iter().map(|d| (d.field, d)).collect(),
        }
    }

    /// Appends a derivation; earlier registrations take priority.
    ///
    /// # Errors
    /// `Error::Arity` if the arity does not match the required fields,
    /// `Error::Type` for any other malformed derivation.
    pub fn register(mut self, derivation: FieldDerivation) -> Result<Self> {
        if derivation.arity != derivation.required.len() {
            return Err(Error::Arity {
                field:    derivation.field,
                expected: derivation.required.len(),
                actual:   derivation.arity,
            });
        }
        if !derivation.is_valid() {
            return Err(Error::type_error(format!("invalid derivation {derivation:?}")));
        }
        self.derivations.push(derivation);
        Ok(self)
    }

    /// Records the definition of a field, replacing any earlier one.
    #[must_use]
    pub fn define(mut self, definition: FieldDefinition) -> Self {
        self.definitions.insert(definition.field, definition);
        self
    }

    pub fn definition(&self, field: DateField) -> Option<&FieldDefinition> {
        self.definitions.get(&field)
    }

    /// The field `field` lives in, then that field's parent, and so on.
    pub fn ancestors(&self, field: DateField) -> Vec<DateField> {
        let mut chain = Vec::new();
        let mut current = self.definition(field).and_then(|d| d.parent);
        while let Some(parent) = current {
            if chain.contains(&parent) || parent == field {
                break;
            }
            chain.push(parent);
            current = self.definition(parent).and_then(|d| d.parent);
        }
        chain
    }

    pub fn derivations(&self) -> &[FieldDerivation] {
        &self.derivations
    }

    pub fn derivations_for(&self, field: DateField) -> impl Iterator<Item = &FieldDerivation> {
        self.derivations.iter().filter(move |d| d.field == field)
    }

    /// The first derivation of `field` applicable to `map`.
    pub fn select(&self, field: DateField, map: &DateFieldMap) -> Option<&FieldDerivation> {
        self.derivations_for(field).find(|derivation| {
            let applies = derivation.applies_to(map);
            log::trace!("derivation of {field} from {:?}: applies = {applies}", derivation.required);
            applies
        })
    }

    /// Whether `value` lies in the defined range of `field`. Fields without
    /// a definition accept everything.
    pub fn accepts(&self, field: DateField, value: i64) -> bool {
        self.definition(field)
            .is_none_or(|definition| definition.accepts(value) == Outcome::Defined(true))
    }

    /// Looks up `field`, deriving it when it is not set.
    ///
    /// # Errors
    /// Only for a malformed derivation; see [`FieldDerivation::derive_from`].
    pub fn get_field_value(&self, field: DateField, map: &DateFieldMap) -> Result<FieldLookup> {
        if let Some(value) = map.get(field) {
            return Ok(if self.accepts(field, value) {
                FieldLookup::Found(value)
            } else {
                FieldLookup::Invalid
            });
        }
        let Some(derivation) = self.select(field, map) else {
            return Ok(FieldLookup::NotFound);
        };
        if let Some(input) = derivation
            .required
            .iter()
            .find(|input| map.get(**input).is_some_and(|value| !self.accepts(**input, value)))
        {
            log::debug!("{field} cannot be derived from an out-of-range {input}");
            return Ok(FieldLookup::Invalid);
        }
        log::debug!("deriving {field} from {:?}", derivation.required);
        Ok(match derivation.derive_from(map)? {
            Some(value) if self.accepts(field, value) => FieldLookup::Found(value),
            _ => FieldLookup::Invalid,
        })
    }
}

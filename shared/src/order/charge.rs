//! Charge rules (taxes, packaging, service fees)

use crate::util::parse_float;
use serde::{Deserialize, Serialize};

/// How a charge value is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChargeType {
    /// Value is a bare percent (5 means 5%)
    #[default]
    Percentage,
    /// Value is a money amount
    Fixed,
}

/// Raw charge value as stored: either a number or a string such as `"5%"`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChargeValue {
    Number(f64),
    Text(String),
}

impl Default for ChargeValue {
    fn default() -> Self {
        ChargeValue::Number(0.0)
    }
}

impl ChargeValue {
    /// Numeric value; non-numeric input coerces to 0
    pub fn numeric(&self) -> f64 {
        match self {
            ChargeValue::Number(n) if n.is_finite() => *n,
            ChargeValue::Number(_) => 0.0,
            ChargeValue::Text(s) => parse_float(s).unwrap_or(0.0),
        }
    }

    /// Percent value with any `%` sign stripped before parsing
    pub fn percentage(&self) -> f64 {
        match self {
            ChargeValue::Number(_) => self.numeric(),
            ChargeValue::Text(s) => parse_float(s.replace('%', "").trim()).unwrap_or(0.0),
        }
    }

    pub fn has_percent_sign(&self) -> bool {
        matches!(self, ChargeValue::Text(s) if s.contains('%'))
    }
}

impl From<f64> for ChargeValue {
    fn from(value: f64) -> Self {
        ChargeValue::Number(value)
    }
}

impl From<&str> for ChargeValue {
    fn from(value: &str) -> Self {
        ChargeValue::Text(value.to_string())
    }
}

/// A named, typed charge
///
/// Identity for consolidation is `(name, type)`; the name comparison is
/// case-sensitive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub value: ChargeValue,
    #[serde(rename = "type", default)]
    pub charge_type: ChargeType,
    #[serde(default)]
    pub inclusive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_tax_hashtag: Option<String>,
}

impl ChargeRule {
    pub fn percentage(name: impl Into<String>, percent: f64, inclusive: bool) -> Self {
        Self {
            id: None,
            name: name.into(),
            value: ChargeValue::Number(percent),
            charge_type: ChargeType::Percentage,
            inclusive,
            bulk_tax_hashtag: None,
        }
    }

    pub fn fixed(name: impl Into<String>, amount: f64, inclusive: bool) -> Self {
        Self {
            id: None,
            name: name.into(),
            value: ChargeValue::Number(amount),
            charge_type: ChargeType::Fixed,
            inclusive,
            bulk_tax_hashtag: None,
        }
    }

    /// Same charge for consolidation purposes
    pub fn same_charge(&self, other: &ChargeRule) -> bool {
        self.name == other.name && self.charge_type == other.charge_type
    }

    /// Whether the pricing engine treats this as a percent of the subtotal
    pub fn is_percentage(&self) -> bool {
        self.charge_type == ChargeType::Percentage || self.value.has_percent_sign()
    }

    /// Percent used by the pricing engine
    ///
    /// Typed percentage rules read the value as is (`"%18"` is 0); only
    /// rules that are percentages by their `%` sign get the sign stripped.
    pub fn percent_value(&self) -> f64 {
        match self.charge_type {
            ChargeType::Percentage => self.value.numeric(),
            ChargeType::Fixed => self.value.percentage(),
        }
    }
}

/// Anything that contributes charge rules to a consolidation pass
pub trait ChargeSource {
    /// Charge rules of the underlying product
    fn charges(&self) -> &[ChargeRule];

    /// Bulk tax update hashtag inherited from the product, if any
    fn bulk_tax_hashtag(&self) -> Option<&str>;
}

/// Charges unique by `(name, type)`, ready for pricing and persistence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsolidatedCharges {
    pub charges: Vec<ChargeRule>,
    /// Hashtag shared by every contributing item, stamped on every rule
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_tax_hashtag: Option<String>,
}

impl ConsolidatedCharges {
    pub fn as_slice(&self) -> &[ChargeRule] {
        &self.charges
    }

    pub fn into_vec(self) -> Vec<ChargeRule> {
        self.charges
    }

    pub fn is_empty(&self) -> bool {
        self.charges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.charges.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChargeRule> {
        self.charges.iter()
    }

    /// First hashtag carried by any rule
    pub fn first_hashtag(&self) -> Option<&str> {
        self.charges
            .iter()
            .find_map(|c| c.bulk_tax_hashtag.as_deref())
            .filter(|tag| !tag.is_empty())
    }
}

//! Customer Model

use serde::{Deserialize, Serialize};

/// Customer entity (`Customers` collection)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Customer {
    pub fn to_ref(&self) -> CustomerRef {
        CustomerRef {
            id: self.id.clone(),
            name: self.name.clone(),
            phone: self.phone.clone(),
        }
    }

    /// Case-insensitive match on name, or prefix match on phone
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.trim();
        if needle.is_empty() {
            return true;
        }
        if self.name.to_lowercase().contains(&needle.to_lowercase()) {
            return true;
        }
        self.phone
            .as_deref()
            .is_some_and(|phone| phone.starts_with(needle))
    }
}

/// Customer fields frozen onto an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> Customer {
        Customer {
            id: "c1".to_string(),
            name: "Asha Verma".to_string(),
            phone: Some("9876543210".to_string()),
            email: None,
        }
    }

    #[test]
    fn test_matches_name_case_insensitive() {
        assert!(customer().matches("asha"));
        assert!(customer().matches("VERMA"));
        assert!(!customer().matches("ravi"));
    }

    #[test]
    fn test_matches_phone_prefix() {
        assert!(customer().matches("98765"));
        assert!(!customer().matches("43210"));
    }

    #[test]
    fn test_blank_matches_everything() {
        assert!(customer().matches("   "));
    }
}

use crate::error::{PickupError, Result};
use serde::{Deserialize, Serialize};

/// A roster entry. `name` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
}

impl Person {
    /// Validate and normalize a new roster entry.
    ///
    /// The name is trimmed and must be non-empty. A phone, when given, may
    /// only hold digits, spaces and `+ - ( ) .`.
    pub fn new(name: &str, phone: Option<&str>, email: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PickupError::InvalidInput("name is required".to_string()));
        }
        let phone = phone.map(str::trim).unwrap_or_default();
        if !phone.chars().all(is_phone_char) {
            return Err(PickupError::InvalidInput(format!(
                "phone '{phone}' may only contain digits, spaces and + - ( ) ."
            )));
        }
        if !phone.is_empty() && !phone.chars().any(|c| c.is_ascii_digit()) {
            return Err(PickupError::InvalidInput(format!(
                "phone '{phone}' has no digits"
            )));
        }
        let email = email.map(str::trim).unwrap_or_default();
        if !email.is_empty() && !email.contains('@') {
            return Err(PickupError::InvalidInput(format!(
                "email '{email}' is not an address"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
        })
    }
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')' | '.')
}

//! Customer types

use crate::{CustomerId, Purchase, ValidationError};
use serde::{Deserialize, Serialize};

/// A stored customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "endereco")]
    pub address: Option<String>,
}

/// Customer listing entry with its purchases nested under `compras`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerWithPurchases {
    #[serde(flatten)]
    pub customer: Customer,
    #[serde(rename = "compras")]
    pub purchases: Vec<Purchase>,
}

/// Body of customer create and update requests
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
    #[serde(default, rename = "nome")]
    pub name: Option<String>,
    #[serde(default, rename = "endereco")]
    pub address: Option<String>,
}

/// A customer payload that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct NewCustomer {
    pub name: String,
    pub address: Option<String>,
}

impl CustomerInput {
    /// The name must be present and non-empty; the address is optional.
    pub fn validate(self) -> Result<NewCustomer, ValidationError> {
        match self.name {
            Some(name) if !name.is_empty() => Ok(NewCustomer {
                name,
                address: self.address,
            }),
            _ => Err(ValidationError::MissingName),
        }
    }
}

impl NewCustomer {
    pub fn into_customer(self, id: CustomerId) -> Customer {
        Customer {
            id,
            name: self.name,
            address: self.address,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_requires_name() {
        let input: CustomerInput = serde_json::from_value(json!({ "endereco": "Rua A" })).unwrap();
        assert_eq!(input.validate(), Err(ValidationError::MissingName));

        let input: CustomerInput = serde_json::from_value(json!({ "nome": "" })).unwrap();
        assert_eq!(input.validate(), Err(ValidationError::MissingName));

        let input: CustomerInput = serde_json::from_value(json!({ "nome": null })).unwrap();
        assert_eq!(input.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn test_validate_keeps_optional_address() {
        let input: CustomerInput = serde_json::from_value(json!({ "nome": "Ana" })).unwrap();
        let customer = input.validate().unwrap();
        assert_eq!(customer.name, "Ana");
        assert_eq!(customer.address, None);
    }

    #[test]
    fn test_listing_flattens_customer_fields() {
        let entry = CustomerWithPurchases {
            customer: Customer {
                id: 1,
                name: "Ana".to_string(),
                address: Some("Rua A".to_string()),
            },
            purchases: vec![],
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({ "id": 1, "nome": "Ana", "endereco": "Rua A", "compras": [] })
        );
    }
}

//! Purchase types

use crate::{CustomerId, PurchaseId, ValidationError};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A stored purchase, always owned by one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: PurchaseId,
    #[serde(rename = "cliente_id")]
    pub customer_id: CustomerId,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "valor_compra")]
    pub purchase_value: f64,
    #[serde(rename = "valor_venda")]
    pub sale_value: f64,
    #[serde(rename = "pago")]
    pub paid: bool,
    /// Local ISO-8601 timestamp set once at creation
    #[serde(rename = "data")]
    pub created_at: String,
}

/// Body of `POST /compras`.
///
/// Amounts and the customer id are kept as raw JSON so that numeric strings
/// are accepted and anything else is reported as an invalid value rather
/// than a malformed body. A field sent as `null` is present (`Some(Null)`),
/// only a missing key is `None`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePurchaseInput {
    #[serde(default, rename = "cliente_id", deserialize_with = "present")]
    pub customer_id: Option<Value>,
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
    #[serde(default, rename = "valor_compra", deserialize_with = "present")]
    pub purchase_value: Option<Value>,
    #[serde(default, rename = "valor_venda", deserialize_with = "present")]
    pub sale_value: Option<Value>,
}

/// Body of `PUT /compras/{id}`; all three fields are required.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePurchaseInput {
    #[serde(default, rename = "descricao")]
    pub description: Option<String>,
    #[serde(default, rename = "valor_compra", deserialize_with = "present")]
    pub purchase_value: Option<Value>,
    #[serde(default, rename = "valor_venda", deserialize_with = "present")]
    pub sale_value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewPurchase {
    pub customer_id: CustomerId,
    pub description: String,
    pub purchase_value: f64,
    pub sale_value: f64,
}

/// Replacement values for an existing purchase. Payment status, owner and
/// creation time are never part of an update.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseChanges {
    pub description: String,
    pub purchase_value: f64,
    pub sale_value: f64,
}

impl CreatePurchaseInput {
    /// `valor_venda` falls back to `valor_compra` only when the key is
    /// missing; an explicit `null` is an invalid value.
    pub fn validate(self) -> Result<NewPurchase, ValidationError> {
        let (Some(customer_id), Some(description), Some(purchase_value)) =
            (self.customer_id, self.description, self.purchase_value)
        else {
            return Err(ValidationError::MissingFields);
        };

        let purchase_value = parse_amount("valor_compra", &purchase_value)?;
        let sale_value = match self.sale_value {
            Some(sale_value) => parse_amount("valor_venda", &sale_value)?,
            None => purchase_value,
        };
        ensure_positive(purchase_value, sale_value)?;

        Ok(NewPurchase {
            customer_id: parse_customer_id(&customer_id)?,
            description,
            purchase_value,
            sale_value,
        })
    }
}

impl UpdatePurchaseInput {
    pub fn validate(self) -> Result<PurchaseChanges, ValidationError> {
        let (Some(description), Some(purchase_value), Some(sale_value)) =
            (self.description, self.purchase_value, self.sale_value)
        else {
            return Err(ValidationError::MissingFields);
        };

        let purchase_value = parse_amount("valor_compra", &purchase_value)?;
        let sale_value = parse_amount("valor_venda", &sale_value)?;
        ensure_positive(purchase_value, sale_value)?;

        Ok(PurchaseChanges {
            description,
            purchase_value,
            sale_value,
        })
    }
}

impl NewPurchase {
    /// New purchases always start unpaid.
    pub fn into_purchase(self, id: PurchaseId, created_at: String) -> Purchase {
        Purchase {
            id,
            customer_id: self.customer_id,
            description: self.description,
            purchase_value: self.purchase_value,
            sale_value: self.sale_value,
            paid: false,
            created_at,
        }
    }
}

/// Keeps an explicit `null` as `Some(Value::Null)`; `#[serde(default)]`
/// supplies `None` for a missing key.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn parse_amount(field: &str, value: &Value) -> Result<f64, ValidationError> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(|| ValidationError::InvalidValue(format!("{} não é um número: {}", field, value)))?;

    if !amount.is_finite() {
        return Err(ValidationError::InvalidValue(format!(
            "{} não é um número finito",
            field
        )));
    }
    Ok(amount)
}

fn ensure_positive(purchase_value: f64, sale_value: f64) -> Result<(), ValidationError> {
    if purchase_value <= 0.0 || sale_value <= 0.0 {
        return Err(ValidationError::NonPositiveValue);
    }
    Ok(())
}

/// An id that is not an integer cannot match any customer row.
fn parse_customer_id(value: &Value) -> Result<CustomerId, ValidationError> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or(ValidationError::UnknownCustomer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn create_input(body: Value) -> CreatePurchaseInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_sale_value_defaults_to_purchase_value() {
        let purchase = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": 20.0
        }))
        .validate()
        .unwrap();

        assert_eq!(purchase.customer_id, 1);
        assert_eq!(purchase.purchase_value, 20.0);
        assert_eq!(purchase.sale_value, 20.0);
    }

    #[test]
    fn test_create_requires_fields() {
        let err = create_input(json!({ "cliente_id": 1, "valor_compra": 20.0 }))
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingFields);
    }

    #[test]
    fn test_rejects_non_positive_values() {
        let err = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": -5
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveValue);

        let err = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": 10,
            "valor_venda": 0
        }))
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveValue);
    }

    #[test]
    fn test_accepts_numeric_strings() {
        let purchase = create_input(json!({
            "cliente_id": "3",
            "descricao": "Caneta",
            "valor_compra": "2.50",
            "valor_venda": "4"
        }))
        .validate()
        .unwrap();

        assert_eq!(purchase.customer_id, 3);
        assert_eq!(purchase.purchase_value, 2.5);
        assert_eq!(purchase.sale_value, 4.0);
    }

    #[test]
    fn test_rejects_unparseable_amounts() {
        let err = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": "vinte"
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue(_)));

        let err = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": "NaN"
        }))
        .validate()
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue(_)));
    }

    #[test]
    fn test_non_integer_customer_id_is_unknown_customer() {
        for customer_id in [json!(1.5), json!("abc"), json!(null)] {
            let err = create_input(json!({
                "cliente_id": customer_id,
                "descricao": "Livro",
                "valor_compra": 20
            }))
            .validate()
            .unwrap_err();
            assert_eq!(err, ValidationError::UnknownCustomer);
        }
    }

    #[test]
    fn test_null_sale_value_is_invalid() {
        let input = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": 20.0,
            "valor_venda": null
        }));
        assert_eq!(input.sale_value, Some(Value::Null));

        let err = input.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue(_)));
    }

    #[test]
    fn test_missing_sale_value_is_absent() {
        let input = create_input(json!({
            "cliente_id": 1,
            "descricao": "Livro",
            "valor_compra": 20.0
        }));
        assert_eq!(input.sale_value, None);
    }

    #[test]
    fn test_update_requires_sale_value() {
        let input: UpdatePurchaseInput = serde_json::from_value(json!({
            "descricao": "Livro",
            "valor_compra": 20
        }))
        .unwrap();
        assert_eq!(input.validate().unwrap_err(), ValidationError::MissingFields);
    }

    #[test]
    fn test_purchase_wire_names() {
        let purchase = NewPurchase {
            customer_id: 1,
            description: "Livro".to_string(),
            purchase_value: 20.0,
            sale_value: 25.0,
        }
        .into_purchase(7, "2024-01-01T10:00:00.000000".to_string());

        assert_eq!(
            serde_json::to_value(&purchase).unwrap(),
            json!({
                "id": 7,
                "cliente_id": 1,
                "descricao": "Livro",
                "valor_compra": 20.0,
                "valor_venda": 25.0,
                "pago": false,
                "data": "2024-01-01T10:00:00.000000"
            })
        );
    }
}

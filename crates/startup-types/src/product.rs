//! Product types

use crate::validate::{positive, required_text, Validate, ValidationError};
use crate::PricingModel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PRODUCT_NAME_MAX: usize = 255;
pub const TARGET_AUDIENCE_MAX: usize = 255;

/// A product owned by exactly one company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub company_id: i64,
    pub name: String,
    pub description: String,
    pub target_audience: String,
    /// Newline separated feature list
    pub key_features: String,
    pub pricing_model: PricingModel,
    pub created_at: DateTime<Utc>,
}

/// Mutable product fields.
///
/// Used as the update payload and as the nested product shape in datasets,
/// where the owning company is implied by nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub target_audience: String,
    pub key_features: String,
    pub pricing_model: PricingModel,
}

impl Validate for ProductInput {
    fn validate(&self) -> Result<(), ValidationError> {
        required_text("name", &self.name, Some(PRODUCT_NAME_MAX))?;
        required_text("description", &self.description, None)?;
        required_text("target_audience", &self.target_audience, Some(TARGET_AUDIENCE_MAX))?;
        required_text("key_features", &self.key_features, None)?;
        Ok(())
    }
}

/// Product creation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub company_id: i64,
    #[serde(flatten)]
    pub product: ProductInput,
}

impl Validate for NewProduct {
    fn validate(&self) -> Result<(), ValidationError> {
        positive("company_id", self.company_id)?;
        self.product.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_product_from_flat_json() {
        let json = serde_json::json!({
            "company_id": 3,
            "name": "PayFlow",
            "description": "Invoice automation.",
            "target_audience": "Freelancers",
            "key_features": "• Recurring invoices\n• Reminders",
            "pricing_model": "Freemium"
        });
        let product: NewProduct = serde_json::from_value(json).unwrap();
        assert_eq!(product.company_id, 3);
        assert_eq!(product.product.pricing_model, PricingModel::Freemium);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_company_id_must_be_positive() {
        let product = NewProduct {
            company_id: 0,
            product: ProductInput {
                name: "PayFlow".to_string(),
                description: "Invoice automation.".to_string(),
                target_audience: "Freelancers".to_string(),
                key_features: "• Reminders".to_string(),
                pricing_model: PricingModel::Free,
            },
        };
        assert!(matches!(
            product.validate(),
            Err(ValidationError::NotPositive {
                field: "company_id",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_key_features_rejected() {
        let product = ProductInput {
            name: "PayFlow".to_string(),
            description: "Invoice automation.".to_string(),
            target_audience: "Freelancers".to_string(),
            key_features: String::new(),
            pricing_model: PricingModel::Subscription,
        };
        assert_eq!(
            product.validate(),
            Err(ValidationError::Empty {
                field: "key_features"
            })
        );
    }

    #[test]
    fn test_unknown_pricing_model_fails_to_parse() {
        let json = serde_json::json!({
            "name": "PayFlow",
            "description": "Invoice automation.",
            "target_audience": "Freelancers",
            "key_features": "• Reminders",
            "pricing_model": "PayPerUse"
        });
        assert!(serde_json::from_value::<ProductInput>(json).is_err());
    }
}

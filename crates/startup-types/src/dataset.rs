//! Generated dataset format
//!
//! The generation step writes `{"companies": [...]}` where each company
//! carries its products inline. Records are kept as raw JSON until they are
//! loaded so that one malformed record is reported on its own instead of
//! failing the whole file.

use crate::validate::{Validate, ValidationError};
use crate::{CompanyInput, ProductInput};
use serde::{Deserialize, Serialize};

/// One company record with its nested products
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    #[serde(flatten)]
    pub company: CompanyInput,
    #[serde(default)]
    pub products: Vec<ProductInput>,
}

impl Validate for CompanyRecord {
    fn validate(&self) -> Result<(), ValidationError> {
        self.company.validate()?;
        for (i, product) in self.products.iter().enumerate() {
            product
                .validate()
                .map_err(|e| ValidationError::InvalidProduct {
                    index: i,
                    name: product.name.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(())
    }
}

/// Whole dataset file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub companies: Vec<serde_json::Value>,
}

impl Dataset {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }

    /// Parse and validate the record at `index`.
    pub fn record(&self, index: usize) -> Option<Result<CompanyRecord, ValidationError>> {
        self.companies.get(index).map(|raw| parse_record(index, raw))
    }

    /// Parse and validate each record lazily, in file order.
    pub fn records(&self) -> impl Iterator<Item = Result<CompanyRecord, ValidationError>> + '_ {
        self.companies
            .iter()
            .enumerate()
            .map(|(index, raw)| parse_record(index, raw))
    }
}

impl From<Vec<CompanyRecord>> for Dataset {
    fn from(records: Vec<CompanyRecord>) -> Self {
        let companies = records
            .iter()
            .filter_map(|r| serde_json::to_value(r).ok())
            .collect();
        Self { companies }
    }
}

fn parse_record(index: usize, raw: &serde_json::Value) -> Result<CompanyRecord, ValidationError> {
    let name = raw
        .get("name")
        .and_then(|n| n.as_str())
        .map(|n| n.to_string());

    let invalid = |reason: String| ValidationError::InvalidRecord {
        index,
        name: name.clone(),
        reason,
    };

    let record: CompanyRecord =
        serde_json::from_value(raw.clone()).map_err(|e| invalid(e.to_string()))?;
    record.validate().map_err(|e| invalid(e.to_string()))?;

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Industry, PricingModel};

    const SAMPLE: &str = r#"{
      "companies": [
        {
          "name": "LedgerLoop",
          "tagline": "Reconciliation that runs itself",
          "description": "Automated bookkeeping.",
          "industry": "FinTech",
          "founded_year": 2019,
          "employee_count": 42,
          "headquarters": "Austin, USA",
          "website_url": "www.ledgerloop.io",
          "products": [
            {
              "name": "Loop Books",
              "description": "Ledger sync.",
              "target_audience": "Small business owners",
              "key_features": "• Bank feeds\n• Auto-matching",
              "pricing_model": "Subscription"
            }
          ]
        },
        {
          "name": "Cartwise",
          "tagline": "Checkout without friction",
          "description": "One-click checkout.",
          "industry": "E-commerce",
          "founded_year": 2022,
          "employee_count": 9,
          "headquarters": "Lisbon, Portugal"
        }
      ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(dataset.len(), 2);

        let records: Vec<_> = dataset.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records[0].company.industry, Industry::FinTech);
        assert_eq!(records[0].products.len(), 1);
        assert_eq!(records[0].products[0].pricing_model, PricingModel::Subscription);
        assert_eq!(records[1].company.industry, Industry::ECommerce);
        assert!(records[1].products.is_empty());
        assert_eq!(records[1].company.website_url, None);
    }

    #[test]
    fn test_missing_field_reports_record() {
        let dataset = Dataset {
            companies: vec![serde_json::json!({
                "name": "Halfbaked",
                "industry": "SaaS"
            })],
        };
        let err = dataset.record(0).unwrap().unwrap_err();
        match err {
            ValidationError::InvalidRecord { index, name, reason } => {
                assert_eq!(index, 0);
                assert_eq!(name.as_deref(), Some("Halfbaked"));
                assert!(reason.contains("missing field"), "{}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(dataset.record(1).is_none());
    }

    #[test]
    fn test_invalid_product_reports_company_record() {
        let mut raw: serde_json::Value = serde_json::from_str(SAMPLE).unwrap();
        raw["companies"][0]["products"][0]["name"] = serde_json::json!("");
        let dataset: Dataset = serde_json::from_value(raw).unwrap();

        let err = dataset.record(0).unwrap().unwrap_err();
        assert!(err.to_string().starts_with("record 0 ('LedgerLoop')"), "{}", err);
        assert!(err.to_string().contains("name must not be empty"), "{}", err);
        assert!(dataset.record(1).unwrap().is_ok());
    }

    #[test]
    fn test_envelope() {
        assert!(Dataset::from_json("not json").is_err());
        assert!(Dataset::from_json(r#"{"companies": {}}"#).is_err());
        assert!(Dataset::from_json("{}").is_err());
        assert!(Dataset::from_json(r#"{"items": []}"#).is_err());
        assert!(Dataset::from_json(r#"{"companies": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_from_records() {
        let dataset = Dataset::from_json(SAMPLE).unwrap();
        let records: Vec<_> = dataset.records().collect::<Result<_, _>>().unwrap();
        let rebuilt = Dataset::from(records.clone());
        let reparsed: Vec<_> = rebuilt.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(reparsed, records);
    }
}

//! Company types

use crate::validate::{in_range, max_chars, positive, required_text, Validate, ValidationError};
use crate::{Industry, Product};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const COMPANY_NAME_MAX: usize = 255;
pub const TAGLINE_MAX: usize = 100;
pub const HEADQUARTERS_MAX: usize = 255;
pub const WEBSITE_URL_MAX: usize = 255;
pub const FOUNDED_YEAR_MIN: i32 = 2015;
pub const FOUNDED_YEAR_MAX: i32 = 2024;

/// A startup company as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub industry: Industry,
    pub founded_year: i32,
    pub employee_count: i64,
    pub headquarters: String,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Company with its products embedded, returned by the single-company lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyWithProducts {
    #[serde(flatten)]
    pub company: Company,
    pub products: Vec<Product>,
}

/// Mutable company fields, used for both create and full-replace update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyInput {
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub industry: Industry,
    pub founded_year: i32,
    pub employee_count: i64,
    pub headquarters: String,
    #[serde(default)]
    pub website_url: Option<String>,
}

impl Validate for CompanyInput {
    fn validate(&self) -> Result<(), ValidationError> {
        required_text("name", &self.name, Some(COMPANY_NAME_MAX))?;
        required_text("tagline", &self.tagline, Some(TAGLINE_MAX))?;
        required_text("description", &self.description, None)?;
        in_range(
            "founded_year",
            self.founded_year.into(),
            FOUNDED_YEAR_MIN.into(),
            FOUNDED_YEAR_MAX.into(),
        )?;
        positive("employee_count", self.employee_count)?;
        required_text("headquarters", &self.headquarters, Some(HEADQUARTERS_MAX))?;
        if let Some(url) = &self.website_url {
            max_chars("website_url", url, Some(WEBSITE_URL_MAX))?;
        }
        Ok(())
    }
}

//! Startup Types - Pure type definitions for the startup catalog
//!
//! This crate contains only data types and field validation with no async
//! runtime or storage dependencies, so the server, the loader and any client
//! can share them.

pub mod company;
pub mod dataset;
pub mod page;
pub mod product;
pub mod validate;

pub use company::*;
pub use dataset::*;
pub use page::*;
pub use product::*;
pub use validate::{Validate, ValidationError};

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Industry a company operates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Industry {
    FinTech,
    HealthTech,
    EdTech,
    #[serde(rename = "E-commerce")]
    ECommerce,
    SaaS,
}

impl Industry {
    pub const ALL: [Industry; 5] = [
        Industry::FinTech,
        Industry::HealthTech,
        Industry::EdTech,
        Industry::ECommerce,
        Industry::SaaS,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Industry::FinTech => "FinTech",
            Industry::HealthTech => "HealthTech",
            Industry::EdTech => "EdTech",
            Industry::ECommerce => "E-commerce",
            Industry::SaaS => "SaaS",
        }
    }
}

impl std::fmt::Display for Industry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Industry::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_choice("industry", s, &Industry::ALL))
    }
}

/// How a product is sold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingModel {
    Free,
    Freemium,
    Subscription,
    Enterprise,
}

impl PricingModel {
    pub const ALL: [PricingModel; 4] = [
        PricingModel::Free,
        PricingModel::Freemium,
        PricingModel::Subscription,
        PricingModel::Enterprise,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PricingModel::Free => "Free",
            PricingModel::Freemium => "Freemium",
            PricingModel::Subscription => "Subscription",
            PricingModel::Enterprise => "Enterprise",
        }
    }
}

impl std::fmt::Display for PricingModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PricingModel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PricingModel::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ValidationError::invalid_choice("pricing_model", s, &PricingModel::ALL))
    }
}

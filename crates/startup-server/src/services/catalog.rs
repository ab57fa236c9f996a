//! Company and product CRUD service

use crate::error::{Result, ServiceError};
use crate::storage::Database;
use startup_types::{
    Company, CompanyInput, CompanyWithProducts, NewProduct, Page, PageRequest, Product,
    ProductInput, Validate,
};
use std::sync::Arc;
use tracing::{debug, info};

pub struct CatalogService {
    db: Arc<Database>,
}

impl CatalogService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub async fn list_companies(&self, request: PageRequest) -> Result<Page<Company>> {
        debug!(
            "Listing companies: page={}, page_size={}",
            request.page, request.page_size
        );

        let total = self.db.count_companies().await?;
        let items = self
            .db
            .list_companies(request.offset(), request.limit())
            .await?;

        Ok(Page::new(items, total, request))
    }

    pub async fn get_company(&self, id: i64) -> Result<CompanyWithProducts> {
        let company = self
            .db
            .get_company(id)
            .await?
            .ok_or_else(|| ServiceError::company_not_found(id))?;
        let products = self.db.list_products_by_company(id).await?;

        Ok(CompanyWithProducts { company, products })
    }

    pub async fn create_company(&self, input: CompanyInput) -> Result<Company> {
        input.validate()?;

        if self.db.find_company_by_name(&input.name).await?.is_some() {
            return Err(ServiceError::company_exists(&input.name));
        }

        let company = self.db.create_company(&input).await.map_err(|e| {
            // Lost a race with another insert of the same name
            match ServiceError::from(e) {
                ServiceError::Conflict(_) => ServiceError::company_exists(&input.name),
                other => other,
            }
        })?;
        info!("Created company {} ({})", company.id, company.name);

        Ok(company)
    }

    pub async fn update_company(&self, id: i64, input: CompanyInput) -> Result<Company> {
        input.validate()?;

        if self.db.get_company(id).await?.is_none() {
            return Err(ServiceError::company_not_found(id));
        }

        // Renaming to another casing of the current name is fine
        if let Some(existing) = self.db.find_company_by_name(&input.name).await? {
            if existing.id != id {
                return Err(ServiceError::company_exists(&input.name));
            }
        }

        let company = self
            .db
            .update_company(id, &input)
            .await?
            .ok_or_else(|| ServiceError::company_not_found(id))?;
        info!("Updated company {} ({})", company.id, company.name);

        Ok(company)
    }

    pub async fn delete_company(&self, id: i64) -> Result<()> {
        if !self.db.delete_company(id).await? {
            return Err(ServiceError::company_not_found(id));
        }
        info!("Deleted company {} and its products", id);

        Ok(())
    }

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.db.list_products().await?)
    }

    pub async fn get_product(&self, id: i64) -> Result<Product> {
        self.db
            .get_product(id)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))
    }

    pub async fn create_product(&self, input: NewProduct) -> Result<Product> {
        input.validate()?;

        if self.db.get_company(input.company_id).await?.is_none() {
            return Err(ServiceError::unknown_company(input.company_id));
        }

        // The foreign key still guards against a concurrent company delete
        let product = self.db.create_product(&input).await.map_err(|e| {
            match ServiceError::from(e) {
                ServiceError::UnknownCompany(_) => ServiceError::unknown_company(input.company_id),
                other => other,
            }
        })?;
        info!(
            "Created product {} ({}) for company {}",
            product.id, product.name, product.company_id
        );

        Ok(product)
    }

    pub async fn update_product(&self, id: i64, input: ProductInput) -> Result<Product> {
        input.validate()?;

        let product = self
            .db
            .update_product(id, &input)
            .await?
            .ok_or_else(|| ServiceError::product_not_found(id))?;
        info!("Updated product {} ({})", product.id, product.name);

        Ok(product)
    }

    pub async fn delete_product(&self, id: i64) -> Result<()> {
        if !self.db.delete_product(id).await? {
            return Err(ServiceError::product_not_found(id));
        }
        info!("Deleted product {}", id);

        Ok(())
    }
}

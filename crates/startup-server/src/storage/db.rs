//! SQLite database layer (embedded, single file)

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqlitePoolOptions};
use sqlx::SqlitePool;
use startup_types::{Company, CompanyInput, CompanyRecord, NewProduct, Product, ProductInput};
use std::sync::Arc;

const COMPANY_COLUMNS: &str = "id, name, tagline, description, industry, founded_year, \
     employee_count, headquarters, website_url, created_at";

const PRODUCT_COLUMNS: &str = "id, company_id, name, description, target_audience, \
     key_features, pricing_model, created_at";

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        // Create parent directory if needed
        if let Some(parent) = std::path::Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        tracing::info!("SQLite connection established, running migrations...");

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        tracing::info!("Database initialization complete");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        // Names compare case-insensitively everywhere, including the constraint
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS companies (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL COLLATE NOCASE UNIQUE,
                tagline TEXT NOT NULL,
                description TEXT NOT NULL,
                industry TEXT NOT NULL,
                founded_year INTEGER NOT NULL,
                employee_count INTEGER NOT NULL,
                headquarters TEXT NOT NULL,
                website_url TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_companies_industry ON companies (industry)")
            .execute(pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS products (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                company_id INTEGER NOT NULL REFERENCES companies (id) ON DELETE CASCADE,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                target_audience TEXT NOT NULL,
                key_features TEXT NOT NULL,
                pricing_model TEXT NOT NULL,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_products_company_id ON products (company_id)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Cheap round trip used by the health check
    pub async fn ping(&self) -> sqlx::Result<()> {
        sqlx::query("SELECT 1").execute(&*self.pool).await?;
        Ok(())
    }

    /// Wait for checked-out connections and close the pool. Later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    // Company operations
    pub async fn find_company_by_name(&self, name: &str) -> sqlx::Result<Option<Company>> {
        let mut conn = self.pool.acquire().await?;
        find_company_by_name(&mut *conn, name).await
    }

    pub async fn count_companies(&self) -> sqlx::Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM companies")
            .fetch_one(&*self.pool)
            .await?;

        Ok(count)
    }

    pub async fn list_companies(&self, offset: i64, limit: i64) -> sqlx::Result<Vec<Company>> {
        let rows: Vec<CompanyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM companies ORDER BY id LIMIT ?1 OFFSET ?2",
            COMPANY_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(Company::try_from).collect()
    }

    pub async fn get_company(&self, id: i64) -> sqlx::Result<Option<Company>> {
        let row: Option<CompanyRow> = sqlx::query_as(&format!(
            "SELECT {} FROM companies WHERE id = ?1",
            COMPANY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(Company::try_from).transpose()
    }

    pub async fn create_company(&self, company: &CompanyInput) -> sqlx::Result<Company> {
        let mut conn = self.pool.acquire().await?;
        insert_company(&mut *conn, company).await
    }

    /// Insert a company and its products atomically.
    pub async fn create_company_with_products(
        &self,
        record: &CompanyRecord,
    ) -> sqlx::Result<(Company, Vec<Product>)> {
        let mut tx = self.pool.begin().await?;

        let company = insert_company(&mut *tx, &record.company).await?;
        let mut products = Vec::with_capacity(record.products.len());
        for product in &record.products {
            products.push(insert_product(&mut *tx, company.id, product).await?);
        }

        tx.commit().await?;

        Ok((company, products))
    }

    /// Replace every mutable column. Returns `None` when the id is absent.
    pub async fn update_company(
        &self,
        id: i64,
        company: &CompanyInput,
    ) -> sqlx::Result<Option<Company>> {
        let row: Option<CompanyRow> = sqlx::query_as(&format!(
            r#"
            UPDATE companies
            SET name = ?1, tagline = ?2, description = ?3, industry = ?4, founded_year = ?5,
                employee_count = ?6, headquarters = ?7, website_url = ?8
            WHERE id = ?9
            RETURNING {}
            "#,
            COMPANY_COLUMNS
        ))
        .bind(&company.name)
        .bind(&company.tagline)
        .bind(&company.description)
        .bind(company.industry.as_str())
        .bind(company.founded_year)
        .bind(company.employee_count)
        .bind(&company.headquarters)
        .bind(&company.website_url)
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(Company::try_from).transpose()
    }

    /// Delete a company; its products go with it through the foreign key.
    pub async fn delete_company(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // Product operations
    pub async fn list_products(&self) -> sqlx::Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    pub async fn list_products_by_company(&self, company_id: i64) -> sqlx::Result<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE company_id = ?1 ORDER BY id",
            PRODUCT_COLUMNS
        ))
        .bind(company_id)
        .fetch_all(&*self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    pub async fn get_product(&self, id: i64) -> sqlx::Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {} FROM products WHERE id = ?1",
            PRODUCT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    pub async fn create_product(&self, product: &NewProduct) -> sqlx::Result<Product> {
        let mut conn = self.pool.acquire().await?;
        insert_product(&mut *conn, product.company_id, &product.product).await
    }

    /// Replace every mutable column; the owning company never changes here.
    pub async fn update_product(
        &self,
        id: i64,
        product: &ProductInput,
    ) -> sqlx::Result<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r#"
            UPDATE products
            SET name = ?1, description = ?2, target_audience = ?3, key_features = ?4,
                pricing_model = ?5
            WHERE id = ?6
            RETURNING {}
            "#,
            PRODUCT_COLUMNS
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.target_audience)
        .bind(&product.key_features)
        .bind(product.pricing_model.as_str())
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    pub async fn delete_product(&self, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&*self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// True when the error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True when the error is a FOREIGN KEY constraint violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

async fn find_company_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> sqlx::Result<Option<Company>> {
    // The column collation makes this comparison case-insensitive
    let row: Option<CompanyRow> = sqlx::query_as(&format!(
        "SELECT {} FROM companies WHERE name = ?1 LIMIT 1",
        COMPANY_COLUMNS
    ))
    .bind(name)
    .fetch_optional(&mut *conn)
    .await?;

    row.map(Company::try_from).transpose()
}

async fn insert_company(
    conn: &mut SqliteConnection,
    company: &CompanyInput,
) -> sqlx::Result<Company> {
    let row: CompanyRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO companies (name, tagline, description, industry, founded_year,
                               employee_count, headquarters, website_url, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        RETURNING {}
        "#,
        COMPANY_COLUMNS
    ))
    .bind(&company.name)
    .bind(&company.tagline)
    .bind(&company.description)
    .bind(company.industry.as_str())
    .bind(company.founded_year)
    .bind(company.employee_count)
    .bind(&company.headquarters)
    .bind(&company.website_url)
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Company::try_from(row)
}

async fn insert_product(
    conn: &mut SqliteConnection,
    company_id: i64,
    product: &ProductInput,
) -> sqlx::Result<Product> {
    let row: ProductRow = sqlx::query_as(&format!(
        r#"
        INSERT INTO products (company_id, name, description, target_audience, key_features,
                              pricing_model, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        RETURNING {}
        "#,
        PRODUCT_COLUMNS
    ))
    .bind(company_id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(&product.target_audience)
    .bind(&product.key_features)
    .bind(product.pricing_model.as_str())
    .bind(Utc::now())
    .fetch_one(&mut *conn)
    .await?;

    Product::try_from(row)
}

// Helper structs for sqlx query_as
#[derive(sqlx::FromRow)]
struct CompanyRow {
    id: i64,
    name: String,
    tagline: String,
    description: String,
    industry: String,
    founded_year: i32,
    employee_count: i64,
    headquarters: String,
    website_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<CompanyRow> for Company {
    type Error = sqlx::Error;

    fn try_from(r: CompanyRow) -> Result<Self, Self::Error> {
        Ok(Company {
            id: r.id,
            industry: r
                .industry
                .parse()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            name: r.name,
            tagline: r.tagline,
            description: r.description,
            founded_year: r.founded_year,
            employee_count: r.employee_count,
            headquarters: r.headquarters,
            website_url: r.website_url,
            created_at: r.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    company_id: i64,
    name: String,
    description: String,
    target_audience: String,
    key_features: String,
    pricing_model: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = sqlx::Error;

    fn try_from(r: ProductRow) -> Result<Self, Self::Error> {
        Ok(Product {
            id: r.id,
            company_id: r.company_id,
            pricing_model: r
                .pricing_model
                .parse()
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?,
            name: r.name,
            description: r.description,
            target_audience: r.target_audience,
            key_features: r.key_features,
            created_at: r.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use startup_types::{Industry, PricingModel};

    async fn open() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        let db = Database::new(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    fn company(name: &str) -> CompanyInput {
        CompanyInput {
            name: name.to_string(),
            tagline: "Tagline".to_string(),
            description: "Description".to_string(),
            industry: Industry::SaaS,
            founded_year: 2020,
            employee_count: 10,
            headquarters: "Oslo, Norway".to_string(),
            website_url: None,
        }
    }

    fn product(name: &str) -> ProductInput {
        ProductInput {
            name: name.to_string(),
            description: "Description".to_string(),
            target_audience: "Teams".to_string(),
            key_features: "• One\n• Two".to_string(),
            pricing_model: PricingModel::Freemium,
        }
    }

    #[tokio::test]
    async fn test_company_round_trip() {
        let (_dir, db) = open().await;

        let created = db.create_company(&company("Northwind")).await.unwrap();
        assert!(created.id > 0);
        assert_eq!(created.industry, Industry::SaaS);

        let fetched = db.get_company(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert!(db.get_company(created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_name_lookup_ignores_case() {
        let (_dir, db) = open().await;
        db.create_company(&company("Acme")).await.unwrap();

        let found = db.find_company_by_name("ACME").await.unwrap();
        assert_eq!(found.map(|c| c.name), Some("Acme".to_string()));
        assert!(db.find_company_by_name("Acme Labs").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unique_constraint_ignores_case() {
        let (_dir, db) = open().await;
        db.create_company(&company("Acme")).await.unwrap();

        let err = db.create_company(&company("acme")).await.unwrap_err();
        assert!(is_unique_violation(&err), "{:?}", err);
    }

    #[tokio::test]
    async fn test_product_requires_company() {
        let (_dir, db) = open().await;

        let err = db
            .create_product(&NewProduct {
                company_id: 42,
                product: product("Orphan"),
            })
            .await
            .unwrap_err();
        assert!(is_foreign_key_violation(&err), "{:?}", err);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_products() {
        let (_dir, db) = open().await;

        let record = CompanyRecord {
            company: company("Doomed"),
            products: vec![product("A"), product("B")],
        };
        let (doomed, products) = db.create_company_with_products(&record).await.unwrap();
        assert_eq!(products.len(), 2);
        assert!(products.iter().all(|p| p.company_id == doomed.id));

        let survivor = CompanyRecord {
            company: company("Survivor"),
            products: vec![product("C")],
        };
        let (survivor, _) = db.create_company_with_products(&survivor).await.unwrap();

        assert!(db.delete_company(doomed.id).await.unwrap());
        assert!(!db.delete_company(doomed.id).await.unwrap());

        let remaining = db.list_products().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].company_id, survivor.id);
        assert!(db.get_product(products[0].id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_record_leaves_nothing_behind() {
        let (_dir, db) = open().await;
        db.create_company(&company("Taken")).await.unwrap();

        // Same name in a different case trips the constraint inside the transaction
        let record = CompanyRecord {
            company: company("TAKEN"),
            products: vec![product("A")],
        };
        assert!(db.create_company_with_products(&record).await.is_err());
        assert_eq!(db.count_companies().await.unwrap(), 1);
        assert!(db.list_products().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_orders_by_id() {
        let (_dir, db) = open().await;
        for name in ["Gamma", "Alpha", "Beta"] {
            db.create_company(&company(name)).await.unwrap();
        }

        let names: Vec<_> = db
            .list_companies(1, 5)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(db.count_companies().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let (_dir, db) = open().await;
        assert!(db.update_company(9, &company("Ghost")).await.unwrap().is_none());
        assert!(db.update_product(9, &product("Ghost")).await.unwrap().is_none());
        assert!(!db.delete_product(9).await.unwrap());
    }
}

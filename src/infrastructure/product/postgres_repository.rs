//! PostgreSQL product repository and unit of work

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgConnection, PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

use crate::domain::pagination::Pagination;
use crate::domain::product::{
    Product, ProductId, ProductImage, ProductImageId, ProductOwner, ProductRepository,
    ProductUnitOfWork,
};
use crate::domain::user::UserId;
use crate::domain::DomainError;
use crate::infrastructure::storage::map_sqlx_error;

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.title, p.slug, p.price, p.stock, p.description, p.sizes, p.gender,
           p.tags, p.created_at, p.updated_at,
           u.id AS owner_id, u.email AS owner_email, u.full_name AS owner_full_name
    FROM products p
    LEFT JOIN users u ON u.id = p.user_id
"#;

/// PostgreSQL implementation of ProductRepository
#[derive(Debug, Clone)]
pub struct PostgresProductRepository {
    pool: PgPool,
}

impl PostgresProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach images to already-mapped product rows
    async fn hydrate(&self, rows: Vec<PgRow>) -> Result<Vec<Product>, DomainError> {
        let ids: Vec<Uuid> = rows.iter().map(|row| row.get("id")).collect();
        let mut images = load_images(&self.pool, &ids).await?;

        rows.iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                row_to_product(row, images.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn fetch_one(&self, row: Option<PgRow>) -> Result<Option<Product>, DomainError> {
        match row {
            Some(row) => Ok(self.hydrate(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to get product", e))?;

        self.fetch_one(row).await
    }

    async fn find_by_title_or_slug(
        &self,
        title: &str,
        slug: &str,
    ) -> Result<Option<Product>, DomainError> {
        let row = sqlx::query(&format!(
            "{} WHERE UPPER(p.title) = $1 OR p.slug = $2 ORDER BY p.created_at, p.id LIMIT 1",
            PRODUCT_SELECT
        ))
        .bind(title)
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to find product", e))?;

        self.fetch_one(row).await
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Product>, DomainError> {
        let rows = sqlx::query(&format!(
            "{} ORDER BY p.created_at, p.id LIMIT $1 OFFSET $2",
            PRODUCT_SELECT
        ))
        .bind(i64::from(page.limit))
        .bind(i64::from(page.offset))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list products", e))?;

        self.hydrate(rows).await
    }

    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        sqlx::query(
            r#"
            INSERT INTO products (id, title, slug, price, stock, description, sizes, gender,
                                  tags, user_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.title())
        .bind(product.slug())
        .bind(product.price())
        .bind(product.stock())
        .bind(product.description())
        .bind(product.sizes())
        .bind(product.gender().as_str())
        .bind(product.tags())
        .bind(owner_id(&product))
        .bind(product.created_at())
        .bind(product.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to create product", e))?;

        insert_images(&mut tx, product.id(), product.images()).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit product", e))?;

        Ok(product)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete product", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete products", e))?;

        Ok(result.rows_affected())
    }

    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to begin transaction", e))?;

        Ok(Box::new(PostgresProductUnitOfWork { tx }))
    }
}

/// Unit of work backed by a single database transaction.
///
/// sqlx rolls the transaction back if this is dropped uncommitted.
pub struct PostgresProductUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ProductUnitOfWork for PostgresProductUnitOfWork {
    async fn delete_images(&mut self, id: &ProductId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM product_images WHERE product_id = $1")
            .bind(id.as_uuid())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete product images", e))?;

        Ok(())
    }

    async fn save_product(&mut self, product: &Product) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = $2, slug = $3, price = $4, stock = $5, description = $6,
                sizes = $7, gender = $8, tags = $9, user_id = $10, updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(product.id().as_uuid())
        .bind(product.title())
        .bind(product.slug())
        .bind(product.price())
        .bind(product.stock())
        .bind(product.description())
        .bind(product.sizes())
        .bind(product.gender().as_str())
        .bind(product.tags())
        .bind(owner_id(product))
        .bind(product.updated_at())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to save product", e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Product with id '{}' not found",
                product.id()
            )));
        }

        Ok(())
    }

    async fn insert_images(
        &mut self,
        id: &ProductId,
        images: &[ProductImage],
    ) -> Result<(), DomainError> {
        insert_images(&mut self.tx, id, images).await
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit transaction", e))
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| map_sqlx_error("Failed to roll back transaction", e))
    }
}

async fn insert_images(
    conn: &mut PgConnection,
    id: &ProductId,
    images: &[ProductImage],
) -> Result<(), DomainError> {
    for (position, image) in images.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_images (id, url, position, product_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(image.id.as_uuid())
        .bind(&image.url)
        .bind(position as i32)
        .bind(id.as_uuid())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx_error("Failed to insert product image", e))?;
    }

    Ok(())
}

async fn load_images(
    pool: &PgPool,
    product_ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<ProductImage>>, DomainError> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = sqlx::query(
        "SELECT id, url, product_id FROM product_images WHERE product_id = ANY($1) ORDER BY position",
    )
    .bind(product_ids)
    .fetch_all(pool)
    .await
    .map_err(|e| map_sqlx_error("Failed to load product images", e))?;

    let mut images: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();

    for row in rows {
        let id: Uuid = row.get("id");
        images
            .entry(row.get("product_id"))
            .or_default()
            .push(ProductImage {
                id: ProductImageId::from(id),
                url: row.get("url"),
            });
    }

    Ok(images)
}

fn owner_id(product: &Product) -> Option<Uuid> {
    product.owner().map(|owner| *owner.id.as_uuid())
}

fn row_to_product(row: &PgRow, images: Vec<ProductImage>) -> Result<Product, DomainError> {
    let id: Uuid = row.get("id");
    let gender: String = row.get("gender");
    let owner_id: Option<Uuid> = row.get("owner_id");

    let owner = owner_id.map(|owner_id| ProductOwner {
        id: UserId::from(owner_id),
        email: row.get("owner_email"),
        full_name: row.get("owner_full_name"),
    });

    let gender = gender
        .parse()
        .map_err(|_| DomainError::storage(format!("Unknown gender '{}' in database", gender)))?;

    Ok(Product::restore(
        ProductId::from(id),
        row.get("title"),
        row.get("slug"),
        row.get("price"),
        row.get("stock"),
        row.get("description"),
        row.get("sizes"),
        gender,
        row.get("tags"),
        images,
        owner,
        row.get("created_at"),
        row.get("updated_at"),
    ))
}

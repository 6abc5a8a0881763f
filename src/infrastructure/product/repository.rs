//! In-memory product repository and unit of work

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::pagination::Pagination;
use crate::domain::product::{
    Product, ProductId, ProductImage, ProductRepository, ProductUnitOfWork,
};
use crate::domain::DomainError;

/// Products in insertion order
type ProductStore = Arc<RwLock<Vec<Product>>>;

/// In-memory implementation of ProductRepository.
///
/// Enforces the same title and slug uniqueness as the database schema and
/// reports violations with the same detail format.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    products: ProductStore,
    fail_on_save: Arc<AtomicBool>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `save_product` fail with a storage error
    pub fn set_fail_on_save(&self, fail: bool) {
        self.fail_on_save.store(fail, Ordering::SeqCst);
    }
}

/// Oldest first; ties keep insertion order
fn sorted(products: &[Product]) -> Vec<&Product> {
    let mut all: Vec<&Product> = products.iter().collect();
    all.sort_by_key(|p| p.created_at());
    all
}

fn position(products: &[Product], id: &ProductId) -> Option<usize> {
    products.iter().position(|p| p.id() == id)
}

/// Unique constraint check mirroring `products.title` and `products.slug`
fn check_unique(products: &[Product], candidate: &Product) -> Result<(), DomainError> {
    for other in products.iter().filter(|p| p.id() != candidate.id()) {
        if other.title() == candidate.title() {
            return Err(DomainError::conflict(format!(
                "Key (title)=({}) already exists.",
                candidate.title()
            )));
        }

        if other.slug() == candidate.slug() {
            return Err(DomainError::conflict(format!(
                "Key (slug)=({}) already exists.",
                candidate.slug()
            )));
        }
    }

    Ok(())
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn get(&self, id: &ProductId) -> Result<Option<Product>, DomainError> {
        let products = self.products.read().await;
        Ok(products.iter().find(|p| p.id() == id).cloned())
    }

    async fn find_by_title_or_slug(
        &self,
        title: &str,
        slug: &str,
    ) -> Result<Option<Product>, DomainError> {
        let products = self.products.read().await;

        Ok(sorted(&products)
            .into_iter()
            .find(|p| p.title().to_uppercase() == title || p.slug() == slug)
            .cloned())
    }

    async fn list(&self, page: Pagination) -> Result<Vec<Product>, DomainError> {
        let products = self.products.read().await;

        Ok(sorted(&products)
            .into_iter()
            .skip(page.offset as usize)
            .take(page.limit as usize)
            .cloned()
            .collect())
    }

    async fn create(&self, product: Product) -> Result<Product, DomainError> {
        let mut products = self.products.write().await;

        check_unique(&products, &product)?;
        products.push(product.clone());

        Ok(product)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, DomainError> {
        let mut products = self.products.write().await;

        match position(&products, id) {
            Some(index) => {
                products.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_all(&self) -> Result<u64, DomainError> {
        let mut products = self.products.write().await;
        let removed = products.len() as u64;
        products.clear();
        Ok(removed)
    }

    async fn begin(&self) -> Result<Box<dyn ProductUnitOfWork>, DomainError> {
        Ok(Box::new(InMemoryProductUnitOfWork {
            products: Arc::clone(&self.products),
            fail_on_save: self.fail_on_save.load(Ordering::SeqCst),
            staged: Vec::new(),
        }))
    }
}

#[derive(Debug)]
enum StagedChange {
    DeleteImages(ProductId),
    SaveProduct(Product),
    InsertImages(ProductId, Vec<ProductImage>),
}

/// Stages changes and applies them under one write lock on commit
#[derive(Debug)]
pub struct InMemoryProductUnitOfWork {
    products: ProductStore,
    fail_on_save: bool,
    staged: Vec<StagedChange>,
}

fn missing(id: &ProductId) -> DomainError {
    DomainError::not_found(format!("Product with id '{}' not found", id))
}

#[async_trait]
impl ProductUnitOfWork for InMemoryProductUnitOfWork {
    async fn delete_images(&mut self, id: &ProductId) -> Result<(), DomainError> {
        self.staged.push(StagedChange::DeleteImages(*id));
        Ok(())
    }

    async fn save_product(&mut self, product: &Product) -> Result<(), DomainError> {
        if self.fail_on_save {
            return Err(DomainError::storage("simulated save failure"));
        }

        let products = self.products.read().await;

        if position(&products, product.id()).is_none() {
            return Err(missing(product.id()));
        }

        check_unique(&products, product)?;
        self.staged.push(StagedChange::SaveProduct(product.clone()));

        Ok(())
    }

    async fn insert_images(
        &mut self,
        id: &ProductId,
        images: &[ProductImage],
    ) -> Result<(), DomainError> {
        self.staged
            .push(StagedChange::InsertImages(*id, images.to_vec()));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), DomainError> {
        let Self {
            products, staged, ..
        } = *self;

        let mut products = products.write().await;
        let mut working = products.clone();

        for change in staged {
            match change {
                StagedChange::DeleteImages(id) => {
                    let index = position(&working, &id).ok_or_else(|| missing(&id))?;
                    working[index].replace_images(Vec::new());
                }
                StagedChange::SaveProduct(mut saved) => {
                    let index = position(&working, saved.id()).ok_or_else(|| missing(saved.id()))?;

                    saved.replace_images(working[index].images().to_vec());
                    check_unique(&working, &saved)?;
                    working[index] = saved;
                }
                StagedChange::InsertImages(id, images) => {
                    let index = position(&working, &id).ok_or_else(|| missing(&id))?;
                    let mut all = working[index].images().to_vec();
                    all.extend(images);
                    working[index].replace_images(all);
                }
            }
        }

        *products = working;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{Gender, ProductDraft};

    fn product(title: &str) -> Product {
        Product::create(
            ProductDraft {
                title: title.to_string(),
                slug: None,
                price: None,
                stock: None,
                description: None,
                sizes: vec![],
                gender: Gender::Unisex,
                tags: vec![],
                images: vec!["a.jpg".to_string()],
            },
            None,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_slug() {
        let repo = InMemoryProductRepository::new();
        repo.create(product("Test Shirt")).await.unwrap();

        let result = repo.create(product("test   shirt")).await;
        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(message, "Key (slug)=(test-shirt) already exists.");
            }
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_find_by_title_or_slug() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product("Test Shirt")).await.unwrap();

        let by_title = repo
            .find_by_title_or_slug("TEST SHIRT", "test shirt")
            .await
            .unwrap();
        let by_slug = repo
            .find_by_title_or_slug("TEST-SHIRT", "test-shirt")
            .await
            .unwrap();

        assert_eq!(by_title.unwrap().id(), created.id());
        assert_eq!(by_slug.unwrap().id(), created.id());
        assert!(repo
            .find_by_title_or_slug("NOPE", "nope")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_pages_in_creation_order() {
        let repo = InMemoryProductRepository::new();
        for title in ["One", "Two", "Three"] {
            repo.create(product(title)).await.unwrap();
        }

        let page = repo
            .list(Pagination {
                limit: 2,
                offset: 1,
            })
            .await
            .unwrap();

        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title(), "Two");
        assert_eq!(page[1].title(), "Three");
    }

    #[tokio::test]
    async fn test_staged_changes_invisible_until_commit() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product("Test Shirt")).await.unwrap();
        let id = *created.id();

        let mut uow = repo.begin().await.unwrap();
        uow.delete_images(&id).await.unwrap();
        uow.insert_images(&id, &ProductImage::from_urls(&["c.jpg"]))
            .await
            .unwrap();

        let before = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(before.images()[0].url, "a.jpg");

        uow.commit().await.unwrap();

        let after = repo.get(&id).await.unwrap().unwrap();
        assert_eq!(after.images().len(), 1);
        assert_eq!(after.images()[0].url, "c.jpg");
    }

    #[tokio::test]
    async fn test_rollback_discards_staged_changes() {
        let repo = InMemoryProductRepository::new();
        let created = repo.create(product("Test Shirt")).await.unwrap();
        let id = *created.id();

        let mut uow = repo.begin().await.unwrap();
        uow.delete_images(&id).await.unwrap();
        uow.rollback().await.unwrap();

        assert_eq!(repo.get(&id).await.unwrap().unwrap().images().len(), 1);
    }

    #[tokio::test]
    async fn test_save_missing_product_is_not_found() {
        let repo = InMemoryProductRepository::new();
        let mut uow = repo.begin().await.unwrap();

        let result = uow.save_product(&product("Ghost")).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }
}

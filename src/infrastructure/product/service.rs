//! Product service: catalog CRUD, lookup resolution and the transactional
//! update of a product with its image set

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::domain::pagination::Pagination;
use crate::domain::product::{
    LookupTerm, PlainProduct, Product, ProductDraft, ProductId, ProductImage, ProductOwner,
    ProductPatch, ProductRepository, ProductUnitOfWork,
};
use crate::domain::user::User;
use crate::domain::DomainError;
use crate::infrastructure::observability::record_product_mutation;

/// Message returned to clients in place of unexpected storage failures
pub const UNEXPECTED_ERROR_MESSAGE: &str = "Unexpected error, check server logs";

#[derive(Debug)]
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Create a product owned by `owner`, images included
    pub async fn create(
        &self,
        draft: ProductDraft,
        owner: &User,
    ) -> Result<PlainProduct, DomainError> {
        let product = Product::create(draft, Some(ProductOwner::from(owner)))?;

        let result = self
            .repository
            .create(product)
            .await
            .map(|product| product.to_plain())
            .map_err(handle_db_error);

        record_product_mutation("create", result.is_ok());
        result
    }

    pub async fn find_all(&self, page: Pagination) -> Result<Vec<PlainProduct>, DomainError> {
        let products = self.repository.list(page).await.map_err(handle_db_error)?;

        Ok(products.iter().map(Product::to_plain).collect())
    }

    /// Resolve a term that is either a product id or a title/slug
    pub async fn find_one(&self, term: &str) -> Result<Product, DomainError> {
        let found = match LookupTerm::parse(term) {
            LookupTerm::Id(id) => self.repository.get(&id).await,
            LookupTerm::TitleOrSlug { title, slug } => {
                self.repository.find_by_title_or_slug(&title, &slug).await
            }
        }
        .map_err(handle_db_error)?;

        found.ok_or_else(|| DomainError::not_found(format!("Product with term '{}' not found", term)))
    }

    pub async fn find_one_plain(&self, term: &str) -> Result<PlainProduct, DomainError> {
        Ok(self.find_one(term).await?.to_plain())
    }

    /// Apply a patch atomically.
    ///
    /// When the patch carries images the stored set is replaced. The acting
    /// user becomes the owner on every successful update. Nothing is visible
    /// to readers unless every step succeeds.
    pub async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
        actor: &User,
    ) -> Result<PlainProduct, DomainError> {
        let result = self.update_in_transaction(id, &patch, actor).await;
        record_product_mutation("update", result.is_ok());
        result?;

        self.find_one_plain(&id.to_string()).await
    }

    async fn update_in_transaction(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
        actor: &User,
    ) -> Result<(), DomainError> {
        let mut product = self
            .repository
            .get(id)
            .await
            .map_err(handle_db_error)?
            .ok_or_else(|| DomainError::not_found(format!("Product with id '{}' not found", id)))?;

        product.apply_patch(patch)?;
        product.set_owner(ProductOwner::from(actor));

        let images = patch.images.as_deref().map(ProductImage::from_urls);

        let mut uow = self.repository.begin().await.map_err(handle_db_error)?;

        match write_update(uow.as_mut(), &product, images.as_deref()).await {
            Ok(()) => {
                uow.commit().await.map_err(handle_db_error)?;
                debug!(product_id = %id, "Product updated");
                Ok(())
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    warn!(product_id = %id, error = %rollback_err, "Rollback failed");
                }

                Err(handle_db_error(e))
            }
        }
    }

    pub async fn remove(&self, id: &ProductId) -> Result<(), DomainError> {
        let deleted = self.repository.delete(id).await.map_err(handle_db_error);
        record_product_mutation("delete", matches!(deleted, Ok(true)));

        if !deleted? {
            return Err(DomainError::not_found(format!(
                "Product with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    /// Remove every product; images go with them
    pub async fn delete_all(&self) -> Result<u64, DomainError> {
        self.repository.delete_all().await.map_err(handle_db_error)
    }
}

async fn write_update(
    uow: &mut dyn ProductUnitOfWork,
    product: &Product,
    images: Option<&[ProductImage]>,
) -> Result<(), DomainError> {
    if images.is_some() {
        uow.delete_images(product.id()).await?;
    }

    uow.save_product(product).await?;

    if let Some(images) = images {
        uow.insert_images(product.id(), images).await?;
    }

    Ok(())
}

/// Pass client-facing errors through; log anything else and hide its detail
fn handle_db_error(error: DomainError) -> DomainError {
    if error.is_client_facing() {
        return error;
    }

    error!(error = %error, "Unexpected storage error");
    DomainError::internal(UNEXPECTED_ERROR_MESSAGE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{Gender, MockProductRepository};
    use crate::domain::user::Role;
    use crate::infrastructure::product::InMemoryProductRepository;

    fn draft(title: &str, images: &[&str]) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            slug: None,
            price: Some(10.0),
            stock: None,
            description: None,
            sizes: vec!["M".to_string()],
            gender: Gender::Men,
            tags: vec![],
            images: images.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn setup() -> (ProductService<InMemoryProductRepository>, Arc<InMemoryProductRepository>) {
        let repo = Arc::new(InMemoryProductRepository::new());
        (ProductService::new(Arc::clone(&repo)), repo)
    }

    fn creator() -> User {
        User::new("test1@google.com", "Test One", "hash")
    }

    fn admin() -> User {
        User::new("admin@google.com", "Admin", "hash").with_roles(vec![Role::Admin])
    }

    #[tokio::test]
    async fn test_lookup_by_id_title_and_slug() {
        let (service, _) = setup();
        let created = service
            .create(draft("Test Shirt", &["a.jpg"]), &creator())
            .await
            .unwrap();

        for term in [
            created.id.to_string(),
            "test shirt".to_string(),
            "TEST SHIRT".to_string(),
            "Test-Shirt".to_string(),
            "test-shirt".to_string(),
        ] {
            let found = service.find_one(&term).await.unwrap();
            assert_eq!(*found.id(), created.id, "term {}", term);
        }
    }

    #[tokio::test]
    async fn test_lookup_unknown_term() {
        let (service, _) = setup();

        let result = service.find_one("nothing-here").await;
        match result {
            Err(DomainError::NotFound { message }) => {
                assert_eq!(message, "Product with term 'nothing-here' not found");
            }
            other => panic!("expected not found, got {:?}", other),
        }

        let unknown_id = ProductId::generate().to_string();
        assert!(matches!(
            service.find_one(&unknown_id).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_create_then_update_images_and_owner() {
        let (service, _) = setup();
        let created = service
            .create(draft("Test Shirt", &["a.jpg", "b.jpg"]), &creator())
            .await
            .unwrap();

        let plain = service.find_one_plain("test-shirt").await.unwrap();
        assert_eq!(plain.images, vec!["a.jpg", "b.jpg"]);

        let updater = admin();
        let updated = service
            .update(
                &created.id,
                ProductPatch {
                    images: Some(vec!["c.jpg".to_string()]),
                    ..Default::default()
                },
                &updater,
            )
            .await
            .unwrap();

        assert_eq!(updated.images, vec!["c.jpg"]);
        assert_eq!(updated.owner.unwrap().id, *updater.id());
    }

    #[tokio::test]
    async fn test_update_without_images_keeps_them() {
        let (service, repo) = setup();
        let created = service
            .create(draft("Test Shirt", &["a.jpg", "b.jpg"]), &creator())
            .await
            .unwrap();
        let before = repo.get(&created.id).await.unwrap().unwrap();

        let updated = service
            .update(
                &created.id,
                ProductPatch {
                    stock: Some(5),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();

        assert_eq!(updated.stock, 5);
        let after = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(after.images(), before.images());
    }

    #[tokio::test]
    async fn test_update_replaces_image_ids() {
        let (service, repo) = setup();
        let created = service
            .create(draft("Test Shirt", &["a.jpg"]), &creator())
            .await
            .unwrap();
        let old_id = repo.get(&created.id).await.unwrap().unwrap().images()[0].id;

        service
            .update(
                &created.id,
                ProductPatch {
                    images: Some(vec!["a.jpg".to_string()]),
                    ..Default::default()
                },
                &admin(),
            )
            .await
            .unwrap();

        let after = repo.get(&created.id).await.unwrap().unwrap();
        assert_eq!(after.images().len(), 1);
        assert_ne!(after.images()[0].id, old_id);
    }

    #[tokio::test]
    async fn test_conflicting_title_leaves_product_unchanged() {
        let (service, repo) = setup();
        service
            .create(draft("Other Shirt", &[]), &creator())
            .await
            .unwrap();
        let target = service
            .create(draft("Test Shirt", &["a.jpg"]), &creator())
            .await
            .unwrap();
        let before = repo.get(&target.id).await.unwrap().unwrap();

        let result = service
            .update(
                &target.id,
                ProductPatch {
                    title: Some("Other Shirt".to_string()),
                    images: Some(vec!["z.jpg".to_string()]),
                    ..Default::default()
                },
                &admin(),
            )
            .await;

        match result {
            Err(DomainError::Conflict { message }) => {
                assert_eq!(message, "Key (title)=(Other Shirt) already exists.");
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let after = repo.get(&target.id).await.unwrap().unwrap();
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_storage_failure_rolls_back_and_hides_detail() {
        let (service, repo) = setup();
        let target = service
            .create(draft("Test Shirt", &["a.jpg"]), &creator())
            .await
            .unwrap();
        let before = repo.get(&target.id).await.unwrap().unwrap();

        repo.set_fail_on_save(true);
        let result = service
            .update(
                &target.id,
                ProductPatch {
                    images: Some(vec![]),
                    ..Default::default()
                },
                &admin(),
            )
            .await;

        match result {
            Err(DomainError::Internal { message }) => {
                assert_eq!(message, UNEXPECTED_ERROR_MESSAGE);
            }
            other => panic!("expected internal error, got {:?}", other),
        }
        assert_eq!(repo.get(&target.id).await.unwrap().unwrap(), before);
    }

    #[tokio::test]
    async fn test_update_unknown_product() {
        let (service, _) = setup();

        let result = service
            .update(&ProductId::generate(), ProductPatch::default(), &admin())
            .await;

        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_find_all_paginates() {
        let (service, _) = setup();
        for title in ["One", "Two", "Three"] {
            service.create(draft(title, &[]), &creator()).await.unwrap();
        }

        let all = service.find_all(Pagination::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let page = service
            .find_all(Pagination::new(Some(1), Some(2)).unwrap())
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].title, "Three");
    }

    #[tokio::test]
    async fn test_remove() {
        let (service, _) = setup();
        let created = service
            .create(draft("Test Shirt", &["a.jpg"]), &creator())
            .await
            .unwrap();

        service.remove(&created.id).await.unwrap();

        assert!(matches!(
            service.remove(&created.id).await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(service.find_one("test-shirt").await.is_err());
    }

    #[tokio::test]
    async fn test_unexpected_repository_error_is_masked() {
        let mut repo = MockProductRepository::new();
        repo.expect_list()
            .returning(|_| Err(DomainError::storage("relation \"products\" does not exist")));

        let service = ProductService::new(Arc::new(repo));
        let result = service.find_all(Pagination::default()).await;

        match result {
            Err(DomainError::Internal { message }) => {
                assert_eq!(message, UNEXPECTED_ERROR_MESSAGE);
            }
            other => panic!("expected internal error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_conflict_from_repository_passes_through() {
        let mut repo = MockProductRepository::new();
        repo.expect_create()
            .returning(|_| Err(DomainError::conflict("Key (slug)=(x) already exists.")));

        let service = ProductService::new(Arc::new(repo));
        let result = service.create(draft("X", &[]), &creator()).await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}

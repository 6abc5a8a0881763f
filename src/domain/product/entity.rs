//! Product entity, its images and the plain view

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::slug::slugify;
use crate::domain::user::{User, UserId};
use crate::domain::DomainError;

/// Product identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an identifier, rejecting anything that is not a UUID
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::try_parse(value)
            .map(Self)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid product id", value)))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product image identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductImageId(Uuid);

impl ProductImageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for ProductImageId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Image attached to a product. Lives and dies with its product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: ProductImageId,
    pub url: String,
}

impl ProductImage {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: ProductImageId::generate(),
            url: url.into(),
        }
    }

    /// Build a fresh image set from a list of URLs, keeping order
    pub fn from_urls<S: AsRef<str>>(urls: &[S]) -> Vec<Self> {
        urls.iter().map(|url| Self::new(url.as_ref())).collect()
    }
}

/// Target audience of a product
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Men,
    Women,
    Kid,
    Unisex,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Men => "men",
            Self::Women => "women",
            Self::Kid => "kid",
            Self::Unisex => "unisex",
        }
    }
}

impl FromStr for Gender {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "men" => Ok(Self::Men),
            "women" => Ok(Self::Women),
            "kid" => Ok(Self::Kid),
            "unisex" => Ok(Self::Unisex),
            other => Err(DomainError::validation(format!(
                "Gender must be one of men, women, kid, unisex (got '{}')",
                other
            ))),
        }
    }
}

/// Display summary of the user a product is attributed to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOwner {
    pub id: UserId,
    pub email: String,
    pub full_name: String,
}

impl From<&User> for ProductOwner {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id(),
            email: user.email().to_string(),
            full_name: user.full_name().to_string(),
        }
    }
}

/// Fields accepted when creating a product
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub title: String,
    pub slug: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub images: Vec<String>,
}

/// Partial update; `None` leaves the stored value untouched
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub price: Option<f64>,
    pub stock: Option<i32>,
    pub description: Option<String>,
    pub sizes: Option<Vec<String>>,
    pub gender: Option<Gender>,
    pub tags: Option<Vec<String>>,
    /// When present the image set is fully replaced
    pub images: Option<Vec<String>>,
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    title: String,
    slug: String,
    price: f64,
    stock: i32,
    description: Option<String>,
    sizes: Vec<String>,
    gender: Gender,
    tags: Vec<String>,
    images: Vec<ProductImage>,
    owner: Option<ProductOwner>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from a validated draft, attributed to `owner`
    pub fn create(draft: ProductDraft, owner: Option<ProductOwner>) -> Result<Self, DomainError> {
        let title = validate_title(&draft.title)?;
        let slug = derive_slug(draft.slug.as_deref(), &title)?;
        let price = validate_price(draft.price.unwrap_or(0.0))?;
        let stock = validate_stock(draft.stock.unwrap_or(0))?;
        let now = Utc::now();

        Ok(Self {
            id: ProductId::generate(),
            title,
            slug,
            price,
            stock,
            description: draft.description,
            sizes: draft.sizes,
            gender: draft.gender,
            tags: draft.tags,
            images: ProductImage::from_urls(&draft.images),
            owner,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a product from persisted state
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: ProductId,
        title: String,
        slug: String,
        price: f64,
        stock: i32,
        description: Option<String>,
        sizes: Vec<String>,
        gender: Gender,
        tags: Vec<String>,
        images: Vec<ProductImage>,
        owner: Option<ProductOwner>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            slug,
            price,
            stock,
            description,
            sizes,
            gender,
            tags,
            images,
            owner,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ProductId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn stock(&self) -> i32 {
        self.stock
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn images(&self) -> &[ProductImage] {
        &self.images
    }

    pub fn owner(&self) -> Option<&ProductOwner> {
        self.owner.as_ref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Merge the scalar fields of a patch onto this product.
    ///
    /// Images are not touched here; replacing them is part of the
    /// transactional update.
    pub fn apply_patch(&mut self, patch: &ProductPatch) -> Result<(), DomainError> {
        if let Some(title) = &patch.title {
            self.title = validate_title(title)?;
        }

        match (&patch.slug, &patch.title) {
            (Some(slug), _) => self.slug = derive_slug(Some(slug), &self.title)?,
            (None, Some(_)) => self.slug = derive_slug(None, &self.title)?,
            (None, None) => {}
        }

        if let Some(price) = patch.price {
            self.price = validate_price(price)?;
        }

        if let Some(stock) = patch.stock {
            self.stock = validate_stock(stock)?;
        }

        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }

        if let Some(sizes) = &patch.sizes {
            self.sizes = sizes.clone();
        }

        if let Some(gender) = patch.gender {
            self.gender = gender;
        }

        if let Some(tags) = &patch.tags {
            self.tags = tags.clone();
        }

        self.touch();
        Ok(())
    }

    pub fn replace_images(&mut self, images: Vec<ProductImage>) {
        self.images = images;
        self.touch();
    }

    pub fn set_owner(&mut self, owner: ProductOwner) {
        self.owner = Some(owner);
        self.touch();
    }

    /// Flatten into the plain view (image URLs only)
    pub fn to_plain(&self) -> PlainProduct {
        PlainProduct {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            price: self.price,
            stock: self.stock,
            description: self.description.clone(),
            sizes: self.sizes.clone(),
            gender: self.gender,
            tags: self.tags.clone(),
            images: self.images.iter().map(|image| image.url.clone()).collect(),
            owner: self.owner.clone(),
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Product with images flattened to their URLs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlainProduct {
    pub id: ProductId,
    pub title: String,
    pub slug: String,
    pub price: f64,
    pub stock: i32,
    pub description: Option<String>,
    pub sizes: Vec<String>,
    pub gender: Gender,
    pub tags: Vec<String>,
    pub images: Vec<String>,
    pub owner: Option<ProductOwner>,
}

fn validate_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();

    if title.is_empty() {
        return Err(DomainError::validation("Title cannot be empty"));
    }

    Ok(title.to_string())
}

fn derive_slug(explicit: Option<&str>, title: &str) -> Result<String, DomainError> {
    let slug = slugify(explicit.unwrap_or(title));

    if slug.is_empty() {
        return Err(DomainError::validation("Slug cannot be empty"));
    }

    Ok(slug)
}

fn validate_price(price: f64) -> Result<f64, DomainError> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("Price must be a non-negative number"));
    }

    Ok(price)
}

fn validate_stock(stock: i32) -> Result<i32, DomainError> {
    if stock < 0 {
        return Err(DomainError::validation("Stock cannot be negative"));
    }

    Ok(stock)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(title: &str) -> ProductDraft {
        ProductDraft {
            title: title.to_string(),
            slug: None,
            price: Some(10.0),
            stock: None,
            description: None,
            sizes: vec!["M".to_string(), "L".to_string()],
            gender: Gender::Men,
            tags: vec![],
            images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
        }
    }

    #[test]
    fn test_create_derives_slug_and_defaults() {
        let product = Product::create(draft("Test Shirt"), None).unwrap();

        assert_eq!(product.slug(), "test-shirt");
        assert_eq!(product.stock(), 0);
        assert_eq!(product.price(), 10.0);
        assert_eq!(product.images().len(), 2);
        assert!(product.owner().is_none());
    }

    #[test]
    fn test_create_normalizes_explicit_slug() {
        let mut d = draft("Test Shirt");
        d.slug = Some("My Custom Slug".to_string());

        let product = Product::create(d, None).unwrap();
        assert_eq!(product.slug(), "my-custom-slug");
    }

    #[test]
    fn test_create_rejects_invalid_fields() {
        assert!(Product::create(draft("   "), None).is_err());

        let mut d = draft("Shirt");
        d.price = Some(-1.0);
        assert!(Product::create(d, None).is_err());

        let mut d = draft("Shirt");
        d.stock = Some(-3);
        assert!(Product::create(d, None).is_err());
    }

    #[test]
    fn test_patch_leaves_absent_fields() {
        let mut product = Product::create(draft("Test Shirt"), None).unwrap();

        product
            .apply_patch(&ProductPatch {
                stock: Some(7),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(product.stock(), 7);
        assert_eq!(product.title(), "Test Shirt");
        assert_eq!(product.slug(), "test-shirt");
        assert_eq!(product.images().len(), 2);
    }

    #[test]
    fn test_patch_title_rederives_slug() {
        let mut product = Product::create(draft("Test Shirt"), None).unwrap();

        product
            .apply_patch(&ProductPatch {
                title: Some("Men's Hoodie".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(product.slug(), "mens-hoodie");
    }

    #[test]
    fn test_patch_explicit_slug_wins() {
        let mut product = Product::create(draft("Test Shirt"), None).unwrap();

        product
            .apply_patch(&ProductPatch {
                title: Some("Other".to_string()),
                slug: Some("Kept Slug".to_string()),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(product.title(), "Other");
        assert_eq!(product.slug(), "kept-slug");
    }

    #[test]
    fn test_plain_view_flattens_images() {
        let product = Product::create(draft("Test Shirt"), None).unwrap();
        let plain = product.to_plain();

        assert_eq!(plain.images, vec!["a.jpg", "b.jpg"]);
        assert_eq!(plain.id, *product.id());
    }

    #[test]
    fn test_plain_view_wire_keys_are_camel_case() {
        let owner = User::new("test1@google.com", "Test One", "hash");
        let product = Product::create(draft("Test Shirt"), Some(ProductOwner::from(&owner))).unwrap();

        let json = serde_json::to_value(product.to_plain()).unwrap();

        assert_eq!(json["owner"]["fullName"], "Test One");
        assert!(json["owner"].get("full_name").is_none());
        assert_eq!(json["gender"], "men");
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("kid".parse::<Gender>().unwrap(), Gender::Kid);
        assert!("other".parse::<Gender>().is_err());
    }
}

//! Development fixture data

use crate::domain::product::{Gender, ProductDraft};
use crate::domain::user::Role;
use crate::infrastructure::user::RegisterUserRequest;

/// Fixture users in insertion order; the first one owns every seeded product
pub fn users() -> Vec<(RegisterUserRequest, Vec<Role>)> {
    vec![
        (
            RegisterUserRequest {
                email: "test1@google.com".to_string(),
                full_name: "Test One".to_string(),
                password: "Abc123".to_string(),
            },
            vec![Role::Admin, Role::User],
        ),
        (
            RegisterUserRequest {
                email: "test2@google.com".to_string(),
                full_name: "Test Two".to_string(),
                password: "Abc123".to_string(),
            },
            vec![Role::User, Role::SuperUser],
        ),
    ]
}

struct Fixture {
    title: &'static str,
    price: f64,
    stock: i32,
    description: &'static str,
    sizes: &'static [&'static str],
    gender: Gender,
    tags: &'static [&'static str],
    images: &'static [&'static str],
}

const PRODUCTS: &[Fixture] = &[
    Fixture {
        title: "Men's Chill Crew Neck Sweatshirt",
        price: 75.0,
        stock: 7,
        description: "Introducing the Tesla Chill Collection. The Men's Chill Crew Neck Sweatshirt has a premium, heavyweight exterior and soft fleece interior for comfort in any season.",
        sizes: &["XS", "S", "M", "L", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["sweatshirt"],
        images: &["1740176-00-A_0_2000.jpg", "1740176-00-A_1.jpg"],
    },
    Fixture {
        title: "Men's Quilted Shirt Jacket",
        price: 200.0,
        stock: 5,
        description: "The Men's Quilted Shirt Jacket features a uniquely fit, quilted design for warmth and mobility in cold weather seasons.",
        sizes: &["XS", "S", "M", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["jacket"],
        images: &["1740507-00-A_0_2000.jpg", "1740507-00-A_1.jpg"],
    },
    Fixture {
        title: "Men's Raven Lightweight Zip Up Bomber Jacket",
        price: 130.0,
        stock: 10,
        description: "Introducing the Tesla Raven Collection. The Men's Raven Lightweight Zip Up Bomber has a premium, modern silhouette made from a sustainable bamboo cotton blend.",
        sizes: &["S", "M", "L", "XL", "XXL"],
        gender: Gender::Men,
        tags: &["shirt"],
        images: &["1740250-00-A_0_2000.jpg", "1740250-00-A_1.jpg"],
    },
    Fixture {
        title: "Women's Chill Half Zip Cropped Hoodie",
        price: 130.0,
        stock: 10,
        description: "Introducing the Tesla Chill Collection. The Women's Chill Half Zip Cropped Hoodie has a premium, soft fleece exterior and cropped silhouette for comfort in everyday lifestyle.",
        sizes: &["XS", "S", "M", "XXL"],
        gender: Gender::Women,
        tags: &["hoodie"],
        images: &["1740535-00-A_0_2000.jpg", "1740535-00-A_1.jpg"],
    },
    Fixture {
        title: "Kids Cybertruck Long Sleeve Tee",
        price: 30.0,
        stock: 10,
        description: "Designed to fit your little one, the Kids Cybertruck Long Sleeve Tee features a graffiti-style illustration of our Cybertruck wireframe on the front.",
        sizes: &["XS", "S", "M"],
        gender: Gender::Kid,
        tags: &["shirt"],
        images: &["1742693-00-A_0_2000.jpg", "1742693-00-A_1.jpg"],
    },
    Fixture {
        title: "Solar Roof Tee",
        price: 45.0,
        stock: 0,
        description: "Inspired by our full integrated home energy system, the Tesla Solar Roof Tee advocates for clean, sustainable energy wherever you go.",
        sizes: &["XS", "S", "M", "L", "XL"],
        gender: Gender::Unisex,
        tags: &["shirt"],
        images: &["1703767-00-A_0_2000.jpg", "1703767-00-A_1.jpg"],
    },
];

/// Fixture products; creation order between them is not significant
pub fn products() -> Vec<ProductDraft> {
    PRODUCTS
        .iter()
        .map(|fixture| ProductDraft {
            title: fixture.title.to_string(),
            slug: None,
            price: Some(fixture.price),
            stock: Some(fixture.stock),
            description: Some(fixture.description.to_string()),
            sizes: to_strings(fixture.sizes),
            gender: fixture.gender,
            tags: to_strings(fixture.tags),
            images: to_strings(fixture.images),
        })
        .collect()
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::slugify;
    use crate::domain::user::validate_password;
    use std::collections::HashSet;

    #[test]
    fn test_fixture_slugs_are_unique() {
        let slugs: HashSet<String> = products().iter().map(|p| slugify(&p.title)).collect();
        assert_eq!(slugs.len(), PRODUCTS.len());
    }

    #[test]
    fn test_fixture_passwords_meet_policy() {
        for (user, _) in users() {
            assert!(validate_password(&user.password).is_ok(), "{}", user.email);
        }
    }
}

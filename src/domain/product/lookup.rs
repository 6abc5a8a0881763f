//! Lookup term classification
//!
//! A free-form search term is either a product identifier or a title/slug.

use uuid::{Uuid, Variant};

use super::entity::ProductId;

/// Length of the canonical hyphenated UUID form (`8-4-4-4-12`)
const HYPHENATED_UUID_LEN: usize = 36;

/// What a lookup term resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupTerm {
    /// Exact identifier match
    Id(ProductId),
    /// Case-insensitive title match or lowercased slug match
    TitleOrSlug {
        /// Term uppercased, compared against `UPPER(title)`
        title: String,
        /// Term lowercased, compared against `slug`
        slug: String,
    },
}

impl LookupTerm {
    pub fn parse(term: &str) -> Self {
        if term.len() == HYPHENATED_UUID_LEN {
            if let Some(id) = Uuid::try_parse(term).ok().filter(is_standard_uuid) {
                return Self::Id(ProductId::from(id));
            }
        }

        Self::TitleOrSlug {
            title: term.to_uppercase(),
            slug: term.to_lowercase(),
        }
    }
}

/// Nil, or an RFC 4122 variant with version 1 to 5
fn is_standard_uuid(id: &Uuid) -> bool {
    id.is_nil() || (matches!(id.get_version_num(), 1..=5) && id.get_variant() == Variant::RFC4122)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_term() {
        let id = Uuid::new_v4();
        assert_eq!(
            LookupTerm::parse(&id.to_string()),
            LookupTerm::Id(ProductId::from(id))
        );
    }

    #[test]
    fn test_uppercase_uuid_term() {
        let id = Uuid::new_v4();
        let term = id.to_string().to_uppercase();
        assert_eq!(LookupTerm::parse(&term), LookupTerm::Id(ProductId::from(id)));
    }

    #[test]
    fn test_non_canonical_uuid_forms_are_titles() {
        let id = Uuid::new_v4();
        let simple = id.simple().to_string();

        assert!(matches!(
            LookupTerm::parse(&simple),
            LookupTerm::TitleOrSlug { .. }
        ));
    }

    #[test]
    fn test_non_standard_uuids_are_titles() {
        // no version nibble
        let unversioned = "00000000-0000-0000-0000-00000000000a";
        assert_eq!(
            LookupTerm::parse(unversioned),
            LookupTerm::TitleOrSlug {
                title: unversioned.to_uppercase(),
                slug: unversioned.to_string(),
            }
        );

        // version 4 but Microsoft variant
        let wrong_variant = "6f1c2a3b-4d5e-4f60-c718-293a4b5c6d7e";
        assert!(matches!(
            LookupTerm::parse(wrong_variant),
            LookupTerm::TitleOrSlug { .. }
        ));
    }

    #[test]
    fn test_nil_and_v1_uuids_are_ids() {
        assert!(matches!(
            LookupTerm::parse("00000000-0000-0000-0000-000000000000"),
            LookupTerm::Id(_)
        ));
        assert!(matches!(
            LookupTerm::parse("c232ab00-9414-11ec-b3c8-9f6bdeced846"),
            LookupTerm::Id(_)
        ));
    }

    #[test]
    fn test_title_or_slug_term() {
        assert_eq!(
            LookupTerm::parse("Test-Shirt"),
            LookupTerm::TitleOrSlug {
                title: "TEST-SHIRT".to_string(),
                slug: "test-shirt".to_string(),
            }
        );
    }

    #[test]
    fn test_thirty_six_chars_but_not_uuid() {
        let term = "x".repeat(36);
        assert!(matches!(
            LookupTerm::parse(&term),
            LookupTerm::TitleOrSlug { .. }
        ));
    }
}

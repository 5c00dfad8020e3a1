//! Which attributes to collect for which kind of directory object.
//!
//! A [`Catalog`] is an explicit value handed to the projection layer. Use
//! [`Catalog::active_directory`] for the built-in Active Directory layout or
//! build (or, with the `serde` feature, deserialize) your own:
//!
//! ```rust
//! # #[cfg(feature = "serde")]
//! # {
//! use adsnap::{Catalog, SemanticType};
//!
//! let catalog: Catalog = serde_json::from_str(r#"[
//!     {
//!         "name": "users",
//!         "object_class": "user",
//!         "attributes": [
//!             { "name": "sAMAccountName", "semantic_type": "string" },
//!             { "name": "objectSid", "semantic_type": "binary_sid" }
//!         ]
//!     }
//! ]"#).unwrap();
//! let users = catalog.get("users").unwrap();
//! assert_eq!(users.attributes[1].semantic_type, SemanticType::BinarySid);
//! # }
//! ```

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ProjectionError;

/// How the raw values of an attribute are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SemanticType {
    /// First value, as UTF-8 text.
    String,
    /// Every value, as an array of UTF-8 texts.
    MultiValuedString,
    /// First value, as a binary SID.
    BinarySid,
    /// First value, as the decimal text of a FILETIME.
    Filetime,
    /// First value, as the decimal text of an integer.
    EnumeratedInteger,
    /// First value, as a self-relative security descriptor.
    BinarySecurityDescriptor,
}

/// One attribute to collect.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AttributeSpec {
    /// LDAP attribute name, also the key in the output.
    pub name: String,
    pub semantic_type: SemanticType,
}

impl AttributeSpec {
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>>(name: N, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
        }
    }
}

/// A named group of directory objects sharing an `objectClass`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Category {
    /// Key of the category in the output document.
    pub name: String,
    pub object_class: String,
    /// Attributes in output order.
    pub attributes: Vec<AttributeSpec>,
}

impl Category {
    #[inline]
    #[must_use]
    pub fn new<N: Into<String>, C: Into<String>>(
        name: N,
        object_class: C,
        attributes: Vec<AttributeSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            object_class: object_class.into(),
            attributes,
        }
    }

    /// The LDAP search filter selecting this category, `(objectClass=…)`.
    #[inline]
    #[must_use]
    pub fn filter(&self) -> String {
        format!("(objectClass={})", self.object_class)
    }

    /// Attribute names to request from the directory.
    #[inline]
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|spec| spec.name.as_str())
    }
}

/// Ordered set of uniquely named categories.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "Vec<Category>", into = "Vec<Category>")
)]
pub struct Catalog {
    categories: Vec<Category>,
}

impl Catalog {
    /// # Errors
    /// [`ProjectionError::DuplicateCategory`] if two categories share a name.
    #[inline]
    pub fn new(categories: Vec<Category>) -> Result<Self, ProjectionError> {
        for (index, category) in categories.iter().enumerate() {
            if categories
                .iter()
                .skip(index + 1)
                .any(|other| other.name == category.name)
            {
                return Err(ProjectionError::DuplicateCategory(category.name.clone()));
            }
        }
        Ok(Self { categories })
    }

    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.name == name)
    }

    /// Categories in declaration order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Users, groups, organizational units and computers of an Active
    /// Directory domain.
    #[must_use]
    pub fn active_directory() -> Self {
        use SemanticType::{
            BinarySecurityDescriptor, BinarySid, EnumeratedInteger, Filetime, MultiValuedString,
            String as Text,
        };

        fn specs(attributes: &[(&str, SemanticType)]) -> Vec<AttributeSpec> {
            attributes
                .iter()
                .map(|&(name, semantic_type)| AttributeSpec::new(name.to_owned(), semantic_type))
                .collect()
        }

        let users = Category::new(
            "users",
            "user",
            specs(&[
                ("sAMAccountName", Text),
                ("displayName", Text),
                ("userPrincipalName", Text),
                ("distinguishedName", Text),
                ("description", Text),
                ("objectSid", BinarySid),
                ("userAccountControl", EnumeratedInteger),
                ("adminCount", EnumeratedInteger),
                ("servicePrincipalName", MultiValuedString),
                ("memberOf", MultiValuedString),
                ("pwdLastSet", Filetime),
                ("lastLogonTimestamp", Filetime),
                ("accountExpires", Filetime),
                ("nTSecurityDescriptor", BinarySecurityDescriptor),
            ]),
        );
        let groups = Category::new(
            "groups",
            "group",
            specs(&[
                ("sAMAccountName", Text),
                ("distinguishedName", Text),
                ("description", Text),
                ("objectSid", BinarySid),
                ("groupType", EnumeratedInteger),
                ("adminCount", EnumeratedInteger),
                ("member", MultiValuedString),
                ("memberOf", MultiValuedString),
                ("nTSecurityDescriptor", BinarySecurityDescriptor),
            ]),
        );
        let organizational_units = Category::new(
            "organizational_units",
            "organizationalUnit",
            specs(&[
                ("name", Text),
                ("distinguishedName", Text),
                ("description", Text),
                ("gPLink", Text),
                ("nTSecurityDescriptor", BinarySecurityDescriptor),
            ]),
        );
        let computers = Category::new(
            "computers",
            "computer",
            specs(&[
                ("sAMAccountName", Text),
                ("dNSHostName", Text),
                ("distinguishedName", Text),
                ("operatingSystem", Text),
                ("objectSid", BinarySid),
                ("userAccountControl", EnumeratedInteger),
                ("servicePrincipalName", MultiValuedString),
                ("lastLogonTimestamp", Filetime),
                ("pwdLastSet", Filetime),
                ("nTSecurityDescriptor", BinarySecurityDescriptor),
            ]),
        );

        Self {
            categories: alloc::vec![users, groups, organizational_units, computers],
        }
    }
}

impl TryFrom<Vec<Category>> for Catalog {
    type Error = ProjectionError;

    #[inline]
    fn try_from(value: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Catalog> for Vec<Category> {
    #[inline]
    fn from(value: Catalog) -> Self {
        value.categories
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Category;
    type IntoIter = core::slice::Iter<'a, Category>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, reason = "Unwrap is not an issue in test")]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn built_in_catalog_is_ordered_and_unique() {
        let catalog = Catalog::active_directory();
        let names: Vec<_> = catalog.iter().map(|category| category.name.as_str()).collect();
        assert_eq!(names, ["users", "groups", "organizational_units", "computers"]);
        assert_eq!(Catalog::new(catalog.clone().into()), Ok(catalog));
    }

    #[test]
    fn every_category_collects_its_descriptor() {
        for category in &Catalog::active_directory() {
            assert!(
                category.attributes.iter().any(|spec| {
                    spec.semantic_type == SemanticType::BinarySecurityDescriptor
                }),
                "{} has no security descriptor",
                category.name
            );
        }
    }

    #[test]
    fn filter_and_attribute_names() {
        let catalog = Catalog::active_directory();
        let ous = catalog.get("organizational_units").unwrap();
        assert_eq!(ous.filter(), "(objectClass=organizationalUnit)");
        assert_eq!(
            ous.attribute_names().collect::<Vec<_>>(),
            ["name", "distinguishedName", "description", "gPLink", "nTSecurityDescriptor"]
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let category = Category::new("users", "user", vec![]);
        assert_eq!(
            Catalog::new(vec![category.clone(), category]),
            Err(ProjectionError::DuplicateCategory("users".into()))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserializes_snake_case_tags() {
        let catalog: Catalog = serde_json::from_str(
            r#"[{"name": "ous", "object_class": "organizationalUnit", "attributes": [
                {"name": "gPLink", "semantic_type": "string"},
                {"name": "nTSecurityDescriptor", "semantic_type": "binary_security_descriptor"},
                {"name": "whenChanged", "semantic_type": "filetime"},
                {"name": "managedObjects", "semantic_type": "multi_valued_string"},
                {"name": "systemFlags", "semantic_type": "enumerated_integer"}
            ]}]"#,
        )
        .unwrap();
        let types: Vec<_> = catalog.get("ous").unwrap().attributes.iter().map(|spec| spec.semantic_type).collect();
        assert_eq!(
            types,
            [
                SemanticType::String,
                SemanticType::BinarySecurityDescriptor,
                SemanticType::Filetime,
                SemanticType::MultiValuedString,
                SemanticType::EnumeratedInteger,
            ]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_rejects_duplicates() {
        let error = serde_json::from_str::<Catalog>(
            r#"[{"name": "a", "object_class": "user", "attributes": []},
                {"name": "a", "object_class": "group", "attributes": []}]"#,
        )
        .unwrap_err();
        assert!(
            error.to_string().starts_with("category `a` is declared twice"),
            "unexpected error {error}"
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_back_to_the_same_shape() {
        let catalog = Catalog::active_directory();
        let text = serde_json::to_string(&catalog).unwrap();
        assert_eq!(serde_json::from_str::<Catalog>(&text).unwrap(), catalog);
        assert!(text.contains(r#""semantic_type":"binary_sid""#), "snake_case tags expected");
    }
}

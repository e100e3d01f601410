//! Domain entities for the Selections domain
//!
//! A `SelectionSet` holds the user's chosen attribute tags. Every tag set keeps
//! insertion order and never contains the same tag twice. An empty set is a
//! valid input and means "let the generator pick".

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::catalog::Catalog;

/// Maximum number of tags accepted per category
pub const MAX_TAGS_PER_CATEGORY: usize = 32;

/// Maximum length of a single tag
pub const MAX_TAG_LEN: usize = 80;

/// The four attribute categories a user picks from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TagCategory {
    Inspirations,
    ProductTypes,
    ColorSchemes,
    DesignConcepts,
}

impl std::fmt::Display for TagCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inspirations => write!(f, "inspirations"),
            Self::ProductTypes => write!(f, "productTypes"),
            Self::ColorSchemes => write!(f, "colorSchemes"),
            Self::DesignConcepts => write!(f, "designConcepts"),
        }
    }
}

/// Product family a product type belongs to; selects the mockup prompt table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Mug,
    GiftBox,
    #[default]
    Other,
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mug => write!(f, "mug"),
            Self::GiftBox => write!(f, "gift_box"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Overall visual style of a design
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignStyle {
    #[default]
    MinimalistVector,
    DetailedIllustration,
    TypographyArt,
    QuirkyHumorous,
    LineArt,
}

impl std::fmt::Display for DesignStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MinimalistVector => write!(f, "minimalist_vector"),
            Self::DetailedIllustration => write!(f, "detailed_illustration"),
            Self::TypographyArt => write!(f, "typography_art"),
            Self::QuirkyHumorous => write!(f, "quirky_humorous"),
            Self::LineArt => write!(f, "line_art"),
        }
    }
}

/// A selected product type with its category fixed at selection time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductTypeTag {
    pub name: String,
    pub category: ProductCategory,
}

impl ProductTypeTag {
    /// Tag for a product type name, categorised through the option catalog.
    /// Names outside the catalog fall into `ProductCategory::Other`.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self {
            name: name.to_string(),
            category: Catalog::standard().product_category_for(name),
        }
    }
}

/// Wire form of a product type: a bare name or an explicit `{name, category}`
#[derive(Deserialize)]
#[serde(untagged)]
enum ProductTypeInput {
    Name(String),
    Tagged {
        name: String,
        category: Option<ProductCategory>,
    },
}

impl From<ProductTypeInput> for ProductTypeTag {
    fn from(input: ProductTypeInput) -> Self {
        match input {
            ProductTypeInput::Name(name) => ProductTypeTag::from_name(&name),
            ProductTypeInput::Tagged {
                name,
                category: Some(category),
            } => ProductTypeTag {
                name: name.trim().to_string(),
                category,
            },
            ProductTypeInput::Tagged {
                name,
                category: None,
            } => ProductTypeTag::from_name(&name),
        }
    }
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct SelectionSetInput {
    inspirations: Vec<String>,
    product_types: Vec<ProductTypeInput>,
    color_schemes: Vec<String>,
    design_concepts: Vec<String>,
}

impl From<SelectionSetInput> for SelectionSet {
    fn from(input: SelectionSetInput) -> Self {
        let mut set = SelectionSet::default();
        for tag in input.inspirations {
            set.insert(TagCategory::Inspirations, &tag);
        }
        for product in input.product_types {
            set.insert_product_type(product.into());
        }
        for tag in input.color_schemes {
            set.insert(TagCategory::ColorSchemes, &tag);
        }
        for tag in input.design_concepts {
            set.insert(TagCategory::DesignConcepts, &tag);
        }
        set
    }
}

/// The user's chosen design attribute tags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", from = "SelectionSetInput")]
pub struct SelectionSet {
    #[validate(custom(function = "validate_tags"))]
    inspirations: Vec<String>,
    #[validate(custom(function = "validate_product_types"))]
    product_types: Vec<ProductTypeTag>,
    #[validate(custom(function = "validate_tags"))]
    color_schemes: Vec<String>,
    #[validate(custom(function = "validate_tags"))]
    design_concepts: Vec<String>,
}

fn validate_tag_list<'a>(tags: impl ExactSizeIterator<Item = &'a str>) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS_PER_CATEGORY {
        return Err(ValidationError::new("too_many_tags"));
    }
    for tag in tags {
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(ValidationError::new("tag_too_long"));
        }
    }
    Ok(())
}

fn validate_tags(tags: &Vec<String>) -> Result<(), ValidationError> {
    validate_tag_list(tags.iter().map(String::as_str))
}

fn validate_product_types(tags: &Vec<ProductTypeTag>) -> Result<(), ValidationError> {
    validate_tag_list(tags.iter().map(|t| t.name.as_str()))
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inspirations(&self) -> &[String] {
        &self.inspirations
    }

    pub fn product_types(&self) -> &[ProductTypeTag] {
        &self.product_types
    }

    pub fn product_type_names(&self) -> Vec<&str> {
        self.product_types.iter().map(|p| p.name.as_str()).collect()
    }

    pub fn color_schemes(&self) -> &[String] {
        &self.color_schemes
    }

    pub fn design_concepts(&self) -> &[String] {
        &self.design_concepts
    }

    /// Tags of one category, by name
    pub fn tags(&self, category: TagCategory) -> Vec<&str> {
        match category {
            TagCategory::Inspirations => self.inspirations.iter().map(String::as_str).collect(),
            TagCategory::ProductTypes => self.product_type_names(),
            TagCategory::ColorSchemes => self.color_schemes.iter().map(String::as_str).collect(),
            TagCategory::DesignConcepts => {
                self.design_concepts.iter().map(String::as_str).collect()
            }
        }
    }

    /// True when no category has any tag (auto/best-effort generation)
    pub fn is_empty(&self) -> bool {
        self.inspirations.is_empty()
            && self.product_types.is_empty()
            && self.color_schemes.is_empty()
            && self.design_concepts.is_empty()
    }

    pub fn contains(&self, category: TagCategory, tag: &str) -> bool {
        let tag = tag.trim();
        self.tags(category).contains(&tag)
    }

    /// Add a tag; returns false when it was blank or already present
    pub fn insert(&mut self, category: TagCategory, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(category, tag) {
            return false;
        }
        match category {
            TagCategory::Inspirations => self.inspirations.push(tag.to_string()),
            TagCategory::ProductTypes => self.product_types.push(ProductTypeTag::from_name(tag)),
            TagCategory::ColorSchemes => self.color_schemes.push(tag.to_string()),
            TagCategory::DesignConcepts => self.design_concepts.push(tag.to_string()),
        }
        true
    }

    /// Add an explicitly categorised product type
    pub fn insert_product_type(&mut self, tag: ProductTypeTag) -> bool {
        if tag.name.is_empty() || self.contains(TagCategory::ProductTypes, &tag.name) {
            return false;
        }
        self.product_types.push(tag);
        true
    }

    /// Remove a tag; returns false when it was not present
    pub fn remove(&mut self, category: TagCategory, tag: &str) -> bool {
        let tag = tag.trim();
        let before = self.tags(category).len();
        match category {
            TagCategory::Inspirations => self.inspirations.retain(|t| t != tag),
            TagCategory::ProductTypes => self.product_types.retain(|t| t.name != tag),
            TagCategory::ColorSchemes => self.color_schemes.retain(|t| t != tag),
            TagCategory::DesignConcepts => self.design_concepts.retain(|t| t != tag),
        }
        self.tags(category).len() != before
    }

    /// Flip a tag on or off; returns whether it is selected afterwards
    pub fn toggle(&mut self, category: TagCategory, tag: &str) -> bool {
        if self.remove(category, tag) {
            false
        } else {
            self.insert(category, tag)
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Builder-style insert, convenient for fixtures and callers
    pub fn with(mut self, category: TagCategory, tag: &str) -> Self {
        self.insert(category, tag);
        self
    }

    /// Category of the first selected product type; `Other` when none is picked
    pub fn product_category(&self) -> ProductCategory {
        self.product_types
            .first()
            .map(|p| p.category)
            .unwrap_or_default()
    }

    /// Style of the first selected design concept; unknown concepts use the default
    pub fn design_style(&self) -> DesignStyle {
        self.design_concepts
            .first()
            .and_then(|concept| Catalog::standard().design_style_for(concept))
            .unwrap_or_default()
    }
}

//! Option catalog offered to the user
//!
//! The catalog is the only place where free-text names are matched; every
//! product type option carries its `ProductCategory` and every design concept
//! its `DesignStyle`, so downstream code works with enums only.

use serde::Serialize;
use std::sync::LazyLock;

use super::entities::{DesignStyle, ProductCategory};

static STANDARD_CATALOG: LazyLock<Catalog> = LazyLock::new(Catalog::build_standard);

#[derive(Debug, Clone, Serialize)]
pub struct InspirationOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProductTypeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: ProductCategory,
}

/// Product type options grouped for display
#[derive(Debug, Clone, Serialize)]
pub struct ProductShelf {
    pub shelf: &'static str,
    pub items: Vec<ProductTypeOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColorSchemeOption {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: [&'static str; 3],
}

#[derive(Debug, Clone, Serialize)]
pub struct DesignConceptOption {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub style: DesignStyle,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub inspirations: Vec<InspirationOption>,
    pub product_types: Vec<ProductShelf>,
    pub color_schemes: Vec<ColorSchemeOption>,
    pub design_concepts: Vec<DesignConceptOption>,
}

impl Catalog {
    /// The built-in catalog
    pub fn standard() -> &'static Catalog {
        &STANDARD_CATALOG
    }

    /// Category of a product type by option name or id (case-insensitive)
    pub fn product_category_for(&self, name: &str) -> ProductCategory {
        let name = name.trim();
        self.product_types
            .iter()
            .flat_map(|shelf| shelf.items.iter())
            .find(|option| option.name.eq_ignore_ascii_case(name) || option.id == name)
            .map(|option| option.category)
            .unwrap_or(ProductCategory::Other)
    }

    /// Style of a design concept by option name or id (case-insensitive)
    pub fn design_style_for(&self, name: &str) -> Option<DesignStyle> {
        let name = name.trim();
        self.design_concepts
            .iter()
            .find(|option| option.name.eq_ignore_ascii_case(name) || option.id == name)
            .map(|option| option.style)
    }

    fn build_standard() -> Catalog {
        let inspiration = |id, name, description| InspirationOption {
            id,
            name,
            description,
        };
        let product = |id, name, description, category| ProductTypeOption {
            id,
            name,
            description,
            category,
        };
        let other = ProductCategory::Other;

        Catalog {
            inspirations: vec![
                inspiration("diwali", "Diwali", "Festival of Lights"),
                inspiration("holi", "Holi", "Festival of Colors"),
                inspiration("christmas", "Christmas", "Holiday Spirit"),
                inspiration("rangoli", "Rangoli", "Colorful floor art"),
                inspiration("mandala", "Mandala", "Sacred geometry"),
                inspiration("lotus", "Lotus", "Sacred flower"),
                inspiration("peacock", "Peacock", "Majestic bird"),
                inspiration("henna", "Henna/Mehndi", "Body art patterns"),
                inspiration("ganesh", "Ganesh", "Lord of beginnings"),
                inspiration("sanskrit", "Sanskrit", "Ancient mantras"),
                inspiration("nature", "Nature", "Natural elements"),
                inspiration("geometric", "Geometric", "Modern patterns"),
                inspiration("floral", "Floral", "Botanical beauty"),
                inspiration("celestial", "Celestial", "Stars & Moon"),
            ],
            product_types: vec![
                ProductShelf {
                    shelf: "Decor",
                    items: vec![
                        product("ornament", "Ornament", "Tree decorations", other),
                        product("wreath", "Wreath", "Door decorations", other),
                        product("wall-art", "Wall Art", "Framed pieces", other),
                        product("poster", "Poster", "Prints & posters", other),
                        product("candle", "Candle Holder", "Light fixtures", other),
                    ],
                },
                ProductShelf {
                    shelf: "Kitchenware",
                    items: vec![product("mug", "Mug", "Coffee & tea", ProductCategory::Mug)],
                },
                ProductShelf {
                    shelf: "Apparel",
                    items: vec![product("tshirt", "T-Shirt", "Clothing", other)],
                },
                ProductShelf {
                    shelf: "Home",
                    items: vec![product("pillow", "Throw Pillow", "Cushions", other)],
                },
                ProductShelf {
                    shelf: "Accessories",
                    items: vec![
                        product("tote", "Tote Bag", "Bags", other),
                        product("sticker", "Sticker", "Vinyl stickers", other),
                        product("phone", "Phone Case", "Device covers", other),
                    ],
                },
                ProductShelf {
                    shelf: "Stationery",
                    items: vec![
                        product("notebook", "Notebook", "Journals", other),
                        product("card", "Greeting Card", "Holiday cards", other),
                    ],
                },
                ProductShelf {
                    shelf: "Packaging",
                    items: vec![product(
                        "gift-box",
                        "Gift Box",
                        "Wrapped presents",
                        ProductCategory::GiftBox,
                    )],
                },
            ],
            color_schemes: vec![
                ColorSchemeOption {
                    id: "warm-sunset",
                    name: "Warm Sunset",
                    colors: ["#FF6B35", "#F7931E", "#FDC830"],
                },
                ColorSchemeOption {
                    id: "cool-ocean",
                    name: "Cool Ocean",
                    colors: ["#0077BE", "#00B4D8", "#90E0EF"],
                },
                ColorSchemeOption {
                    id: "royal-purple",
                    name: "Royal Purple",
                    colors: ["#6A0572", "#AB83A1", "#E5D4E8"],
                },
                ColorSchemeOption {
                    id: "forest-green",
                    name: "Forest Green",
                    colors: ["#2D6A4F", "#52B788", "#95D5B2"],
                },
                ColorSchemeOption {
                    id: "festive-red",
                    name: "Festive Red",
                    colors: ["#C1121F", "#FF6B6B", "#FFE5EC"],
                },
                ColorSchemeOption {
                    id: "elegant-gold",
                    name: "Elegant Gold",
                    colors: ["#C9A227", "#FFD700", "#FFF8DC"],
                },
                ColorSchemeOption {
                    id: "pastel-dream",
                    name: "Pastel Dream",
                    colors: ["#FFB3BA", "#BAFFC9", "#BAE1FF"],
                },
                ColorSchemeOption {
                    id: "monochrome",
                    name: "Monochrome",
                    colors: ["#1A1A1A", "#757575", "#E0E0E0"],
                },
            ],
            design_concepts: vec![
                DesignConceptOption {
                    id: "minimalist-vector",
                    name: "Minimalist Vector",
                    description: "Clean silhouettes and bold shapes",
                    style: DesignStyle::MinimalistVector,
                },
                DesignConceptOption {
                    id: "detailed-illustration",
                    name: "Detailed Illustration",
                    description: "Rich textures and depth",
                    style: DesignStyle::DetailedIllustration,
                },
                DesignConceptOption {
                    id: "typography-art",
                    name: "Typography Art",
                    description: "Lettering as the main element",
                    style: DesignStyle::TypographyArt,
                },
                DesignConceptOption {
                    id: "quirky-humorous",
                    name: "Quirky & Fun",
                    description: "Playful characters and concepts",
                    style: DesignStyle::QuirkyHumorous,
                },
                DesignConceptOption {
                    id: "line-art",
                    name: "Simple Line Art",
                    description: "Clean confident lines",
                    style: DesignStyle::LineArt,
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_category_lookup() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.product_category_for("Mug"), ProductCategory::Mug);
        assert_eq!(catalog.product_category_for("mug"), ProductCategory::Mug);
        assert_eq!(
            catalog.product_category_for("gift-box"),
            ProductCategory::GiftBox
        );
        assert_eq!(
            catalog.product_category_for("Tote Bag"),
            ProductCategory::Other
        );
        assert_eq!(
            catalog.product_category_for("Mug Warmer"),
            ProductCategory::Other
        );
    }

    #[test]
    fn test_design_style_lookup() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.design_style_for("Quirky & Fun"),
            Some(DesignStyle::QuirkyHumorous)
        );
        assert_eq!(
            catalog.design_style_for("line-art"),
            Some(DesignStyle::LineArt)
        );
        assert_eq!(catalog.design_style_for("Baroque"), None);
    }

    #[test]
    fn test_option_ids_are_unique() {
        let catalog = Catalog::standard();
        let mut ids: Vec<&str> = catalog
            .product_types
            .iter()
            .flat_map(|shelf| shelf.items.iter().map(|o| o.id))
            .collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_catalog_serializes_for_clients() {
        let value = serde_json::to_value(Catalog::standard()).unwrap();
        assert_eq!(value["designConcepts"].as_array().unwrap().len(), 5);
        assert_eq!(value["colorSchemes"][4]["name"], "Festive Red");
        assert_eq!(value["productTypes"][1]["items"][0]["category"], "mug");
    }
}

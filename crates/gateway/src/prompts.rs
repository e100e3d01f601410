//! Prompt construction for the three generation operations
//!
//! Prompt wording is presentation content. What callers rely on is the shape:
//! three design variations, ten mockup prompts per product table, and one
//! listing prompt that asks for JSON.

use printloom_common::ArtifactUrl;
use printloom_selections::{DesignStyle, ProductCategory, SelectionSet};
use serde::Serialize;

/// Number of design variations requested per run
pub const DESIGN_VARIATION_COUNT: usize = 3;

/// Number of mockup prompts per product table
pub const MOCKUP_PROMPT_COUNT: usize = 10;

/// Composition hints appended per design variation index
const VARIATION_HINTS: [&str; DESIGN_VARIATION_COUNT] = [
    "",
    "\n\nVARIATION: use a different layout than a centered view, such as a diagonal composition, off-center placement, or an unusual viewpoint.",
    "\n\nVARIATION: shift the color emphasis or scale of the elements, for example a bold size contrast or an unexpected color distribution.",
];

const PRINT_REQUIREMENTS: &str = "\nRequirements:\n\
- Fully transparent background, PNG output\n\
- High resolution, print-on-demand ready\n\
- Centered, commercially appealing composition\n\
- Marketplace-quality finish";

/// Which generation operation a request belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Design,
    Mockup,
    Listing,
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Design => write!(f, "design"),
            Self::Mockup => write!(f, "mockup"),
            Self::Listing => write!(f, "listing"),
        }
    }
}

/// A fully built generation request; immutable once issued
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub kind: RequestKind,
    pub prompt: String,
    pub variation_index: Option<usize>,
    pub prompt_index: Option<usize>,
    pub source_artifact: Option<ArtifactUrl>,
}

impl GenerationRequest {
    pub fn design(selection: &SelectionSet, variation_index: usize) -> Self {
        Self {
            kind: RequestKind::Design,
            prompt: design_prompt(selection, variation_index),
            variation_index: Some(variation_index),
            prompt_index: None,
            source_artifact: None,
        }
    }

    pub fn mockup(selection: &SelectionSet, source: &ArtifactUrl, prompt_index: usize) -> Self {
        let table = PromptTable::for_category(selection.product_category());
        Self {
            kind: RequestKind::Mockup,
            prompt: table.prompt(prompt_index).to_string(),
            variation_index: None,
            prompt_index: Some(prompt_index),
            source_artifact: Some(source.clone()),
        }
    }

    pub fn listing(selection: &SelectionSet) -> Self {
        Self {
            kind: RequestKind::Listing,
            prompt: listing_prompt(selection),
            variation_index: None,
            prompt_index: None,
            source_artifact: None,
        }
    }
}

fn joined_or(tags: &[&str], fallback: &str) -> String {
    if tags.is_empty() {
        fallback.to_string()
    } else {
        tags.join(", ")
    }
}

fn owned_refs(tags: &[String]) -> Vec<&str> {
    tags.iter().map(String::as_str).collect()
}

/// Style description and the (theme, color) fallbacks used for empty selections
fn style_brief(style: DesignStyle) -> (&'static str, &'static str, &'static str) {
    match style {
        DesignStyle::MinimalistVector => (
            "a minimalist vector design: simple bold shapes, one to three flat colors, crisp edges suitable for vinyl cutting, clean geometric lines",
            "modern and elegant",
            "bold and simple",
        ),
        DesignStyle::DetailedIllustration => (
            "a highly detailed illustration: rich textures, saturated professionally graded colors, fine line work and layered depth",
            "festive and detailed",
            "vibrant and rich",
        ),
        DesignStyle::TypographyArt => (
            "a typography-led design: decorative hand-lettering as the main element with only small supporting accents",
            "festive and cheerful",
            "bold and eye-catching",
        ),
        DesignStyle::QuirkyHumorous => (
            "a quirky, humorous design: playful stylized characters and clever visual ideas with a professional finish",
            "fun and festive",
            "vibrant and playful",
        ),
        DesignStyle::LineArt => (
            "a clean line art design: smooth confident lines, outline only or one to two color fills, elegant and minimal",
            "elegant and simple",
            "minimal and refined",
        ),
    }
}

/// Design prompt for a selection and variation index
pub fn design_prompt(selection: &SelectionSet, variation_index: usize) -> String {
    let (brief, theme_fallback, color_fallback) = style_brief(selection.design_style());
    let products = joined_or(&selection.product_type_names(), "various products");
    let theme = joined_or(&owned_refs(selection.inspirations()), theme_fallback);
    let colors = joined_or(&owned_refs(selection.color_schemes()), color_fallback);
    let hint = VARIATION_HINTS
        .get(variation_index)
        .copied()
        .unwrap_or_default();

    format!(
        "Create {brief}.{PRINT_REQUIREMENTS}\n- Suitable for {products}\n\nTheme: {theme}\nColors: {colors}{hint}"
    )
}

/// Listing prompt asking for a JSON document
pub fn listing_prompt(selection: &SelectionSet) -> String {
    format!(
        "You write product listings for an online handmade marketplace. Write an SEO-friendly listing for a product with these design elements:\n\n\
Inspirations: {}\nProduct Types: {}\nColor Schemes: {}\nDesign Styles: {}\n\n\
Include a catchy title (50-60 characters), a description of 150-200 words, 5-7 key features, search tags, and a recommended price range.\n\
Respond with JSON using the keys: title, description, features (array), tags (array), priceRange",
        joined_or(&owned_refs(selection.inspirations()), "None"),
        joined_or(&selection.product_type_names(), "None"),
        joined_or(&owned_refs(selection.color_schemes()), "None"),
        joined_or(&owned_refs(selection.design_concepts()), "None"),
    )
}

/// Ten mockup scenes for one product family
#[derive(Debug)]
pub struct PromptTable {
    pub name: &'static str,
    pub prompts: [&'static str; MOCKUP_PROMPT_COUNT],
}

impl PromptTable {
    /// Table for a product category; anything that is not a gift box uses the mug table
    pub fn for_category(category: ProductCategory) -> &'static PromptTable {
        match category {
            ProductCategory::GiftBox => &GIFT_BOX_TABLE,
            ProductCategory::Mug | ProductCategory::Other => &MUG_TABLE,
        }
    }

    /// Prompt at `index`; out-of-range indices use the first prompt
    pub fn prompt(&self, index: usize) -> &'static str {
        self.prompts.get(index).copied().unwrap_or(self.prompts[0])
    }
}

static MUG_TABLE: PromptTable = PromptTable {
    name: "mug",
    prompts: [
        "Photorealistic studio shot of an 11oz white ceramic mug with the design wrapped around it, straight-on front view, transparent background, sharp focus, soft shadows",
        "Photorealistic cozy holiday scene: the printed mug filled with hot cocoa on a rustic wooden table beside cookies and cinnamon sticks, warm fairy-light bokeh",
        "Photorealistic close framing of hands holding the printed mug on a soft blanket near a fireplace, steam rising, golden-hour light",
        "Photorealistic side profile of the printed mug showing the wrap following the curve, on a saucer with a spoon, plain white table, studio light",
        "Macro close-up of the design printed on the ceramic surface, showing texture, color vibrancy, and subtle glaze reflections",
        "Photorealistic back view of the printed mug on a knitted coaster with a blurred decorated tree behind it, natural daylight",
        "Overhead flat lay of the printed mug surrounded by pine branches, ornaments, and ribbon, minimal seasonal styling",
        "Photorealistic desk scene: the printed mug next to a laptop and notebook, morning steam, window light with snow outside",
        "Photorealistic clean product shot of the printed mug from an alternate angle, soft shadows, isolated white background",
        "Photorealistic breakfast table with the printed mug, croissants, and fresh flowers in morning sunlight",
    ],
};

static GIFT_BOX_TABLE: PromptTable = PromptTable {
    name: "gift_box",
    prompts: [
        "Photorealistic front view of a closed gift box wrapped in paper printed with the design, large gold satin bow, isolated white background",
        "Photorealistic holiday living room: the design-wrapped gift box under a lit tree on a plush rug with scattered ornaments",
        "Photorealistic partly opened gift box showing the design inside and out, ribbon half untied, tissue paper, marble table with pinecones",
        "Photorealistic three-quarter view of the design gift box stacked with smaller presents on a wooden tray, soft shadows",
        "Macro close-up of the printed wrapping paper texture with the gold ribbon and a gift tag, shallow depth of field",
        "Overhead flat lay of three design gift boxes in different sizes with ribbons, holly, and bells",
        "Photorealistic mantel scene: the design gift box beside stockings and candles with a warm fire glow",
        "Photorealistic styled tray with the design gift box, a matching mug, cookies, and evergreen sprigs, ready to gift",
        "Photorealistic clean e-commerce shot of the design gift box from an alternate angle with gold ribbon, white background",
        "Photorealistic festive dinner table with the design gift box as the centerpiece among candles and pine garland",
    ],
};

//! Locale facts the core needs: which language codes the wizard offers and the
//! business-sector labels offered for each of them. Display strings live outside
//! the core.

/// Language used when a code has no catalog of its own.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Codes offered on the language step, in display order.
pub const SUPPORTED_LANGUAGES: [&str; 4] = ["en", "fr", "es", "ar"];

const SECTORS_EN: [&str; 8] = [
    "Grocery",
    "Store",
    "Café",
    "Restaurant",
    "Beauty Salon",
    "Pharmacy",
    "Bakery",
    "Other",
];

const SECTORS_FR: [&str; 8] = [
    "Épicier",
    "Magasin",
    "Café",
    "Restaurant",
    "Salon de beauté",
    "Pharmacie",
    "Boulangerie",
    "Autre",
];

const SECTORS_ES: [&str; 8] = [
    "Tienda",
    "Supermercado",
    "Café",
    "Restaurante",
    "Salón de belleza",
    "Farmacia",
    "Panadería",
    "Otro",
];

const SECTORS_AR: [&str; 8] = [
    "بقالة",
    "متجر",
    "مقهى",
    "مطعم",
    "صالون تجميل",
    "صيدلية",
    "مخبز",
    "أخرى",
];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.contains(&code)
}

/// Sector labels for `language`, falling back to the English list.
pub fn sectors_for(language: &str) -> &'static [&'static str] {
    match language {
        "fr" => &SECTORS_FR,
        "es" => &SECTORS_ES,
        "ar" => &SECTORS_AR,
        _ => &SECTORS_EN,
    }
}

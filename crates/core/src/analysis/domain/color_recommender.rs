use crate::analysis::domain::undertone::Undertone;

/// Palette for labels that name no known undertone.
pub const FALLBACK_PALETTE: &str = "Any color!";

/// Clothing palette suited to an undertone.
pub fn recommend(undertone: Undertone) -> &'static str {
    match undertone {
        Undertone::Cool => "Blues, Purples, Emerald Green",
        Undertone::Warm => "Earthy Tones, Coral, Gold",
        Undertone::Neutral => "Jewel Tones, Mauve, Charcoal",
    }
}

/// Palette for a free-text undertone label, falling back for unknown ones.
pub fn recommend_for_label(label: &str) -> &'static str {
    label
        .parse::<Undertone>()
        .map(recommend)
        .unwrap_or(FALLBACK_PALETTE)
}

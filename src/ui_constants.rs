// UI constants gathered here instead of scattering magic numbers across the
// codebase.

/// Default number of photo columns in the feed grid
pub const DEFAULT_PHOTOS_PER_ROW: u32 = 3;

/// Upper bound for the photos-per-row control
pub const MAX_PHOTOS_PER_ROW: u32 = 6;

/// Gap between cards in the grid
pub const CARD_GAP: f32 = 16.0;

/// Narrowest card the grid will lay out before stacking into one column
pub const MIN_CARD_WIDTH: f32 = 180.0;

/// Debounce delay for the author search box in milliseconds
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// UI spacing constants
pub mod spacing {
    /// Small spacing (4px)
    pub const SMALL: f32 = 4.0;

    /// Medium spacing (8px)
    pub const MEDIUM: f32 = 8.0;

    /// Extra large spacing (24px)
    pub const XLARGE: f32 = 24.0;
}

/// Card-specific layout constants
pub mod card {
    /// Inner margin of the card frame (symmetric)
    pub const INNER_MARGIN: f32 = 8.0;

    /// Border radius of card corners
    pub const ROUNDING: f32 = 8.0;

    /// Space between the photo and the caption
    pub const POST_PHOTO_GAP: f32 = 12.0;

    /// Meta plaque rounding
    pub const META_ROUNDING: f32 = 6.0;

    /// Meta plaque inner margin (horizontal)
    pub const META_MARGIN_H: f32 = 8.0;

    /// Meta plaque inner margin (vertical)
    pub const META_MARGIN_V: f32 = 6.0;
}

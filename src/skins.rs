//! Cosmetic skin catalog
//!
//! Skins are purely cosmetic apart from their collision radius, which tracks
//! the sprite size. The "default" skin is free and always owned.

/// A purchasable cosmetic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skin {
    pub id: &'static str,
    /// Price in fish
    pub price: i64,
    /// Sprite scale factor
    pub scale: f32,
    /// Player collision radius when wearing this skin
    pub radius: f32,
}

/// Every skin in the game, in menu order
pub const SKINS: &[Skin] = &[
    Skin {
        id: "default",
        price: 0,
        scale: 3.0,
        radius: 36.0,
    },
    Skin {
        id: "otto",
        price: 500,
        scale: 2.5,
        radius: 30.0,
    },
];

/// The skin everyone owns
pub const DEFAULT_SKIN: &str = "default";

pub fn by_id(id: &str) -> Option<&'static Skin> {
    SKINS.iter().find(|s| s.id == id)
}

/// Resolve a stored selection, falling back to the default for unknown ids
pub fn resolve(id: &str) -> &'static Skin {
    by_id(id).unwrap_or(&SKINS[0])
}

pub fn index_of(id: &str) -> usize {
    SKINS.iter().position(|s| s.id == id).unwrap_or(0)
}

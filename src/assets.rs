//! Asset readiness gate
//!
//! An external loader reports each asset as loaded or failed. The game
//! leaves `Loading` once every asset has reported; a failed sprite only
//! means the renderer falls back to primitive shapes.

/// Assets the loader reports on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Asset {
    Bat,
    Batsman,
    /// Sprite for the second selectable batsman
    AltBatsman,
    Ball,
    Grass,
}

impl Asset {
    pub const ALL: [Asset; 5] = [
        Asset::Bat,
        Asset::Batsman,
        Asset::AltBatsman,
        Asset::Ball,
        Asset::Grass,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Per-asset load results; `None` means not reported yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssetStatus {
    results: [Option<bool>; 5],
}

impl AssetStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every asset reported as loaded
    pub fn all_loaded() -> Self {
        Self {
            results: [Some(true); 5],
        }
    }

    /// Record a load result
    pub fn mark(&mut self, asset: Asset, ok: bool) {
        if !ok {
            log::warn!("Asset {asset:?} failed to load, using fallback drawing");
        }
        self.results[asset.index()] = Some(ok);
    }

    pub fn get(&self, asset: Asset) -> Option<bool> {
        self.results[asset.index()]
    }

    /// Gate is open: every asset reported, successfully or not
    pub fn is_settled(&self) -> bool {
        self.results.iter().all(Option::is_some)
    }

    /// Everything loaded successfully
    pub fn is_complete(&self) -> bool {
        self.results.iter().all(|r| *r == Some(true))
    }

    /// Bat sprite available; selects the larger bat hitbox
    pub fn bat_sprite_ready(&self) -> bool {
        self.get(Asset::Bat) == Some(true)
    }
}

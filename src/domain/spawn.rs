use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Advisory target lifetime shown to the presentation layer; the engine never
/// retires an expired spawn itself.
pub const DEFAULT_TTL_MS: u32 = 2500;

/// One transient circular target a player can hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Spawn {
    pub spawn_id: String,
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub ttl_ms: u32,
}

/// Play-surface geometry used to keep targets fully on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnBounds {
    pub width: f64,
    pub height: f64,
    pub r_min: f64,
    pub r_max: f64,
    // Extra gap between the circle edge and the surface edge.
    pub padding: f64,
    pub ttl_ms: u32,
}

impl Default for SpawnBounds {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1920.0,
            r_min: 50.0,
            r_max: 100.0,
            padding: 16.0,
            ttl_ms: DEFAULT_TTL_MS,
        }
    }
}

impl SpawnBounds {
    /// True when every field is finite and the largest target plus padding
    /// fits the surface on both axes, so uniform placement is well defined.
    pub fn fits_targets(&self) -> bool {
        let margin = self.r_max + self.padding;
        [self.width, self.height, self.r_min, self.r_max, self.padding]
            .iter()
            .all(|v| v.is_finite())
            && self.r_min > 0.0
            && self.r_max >= self.r_min
            && self.padding >= 0.0
            && self.width >= 2.0 * margin
            && self.height >= 2.0 * margin
    }
}

/// Draws the next target uniformly inside the bounds. Pure over the injected
/// random source; no spawn depends on prior spawns.
pub fn generate_spawn<R: Rng + ?Sized>(bounds: &SpawnBounds, rng: &mut R) -> Spawn {
    let r = rng.random_range(bounds.r_min..=bounds.r_max);
    // Clamp to the half-extents so a cramped axis degenerates to centering
    // instead of an empty sampling range.
    let margin_x = (r + bounds.padding).min(bounds.width / 2.0);
    let margin_y = (r + bounds.padding).min(bounds.height / 2.0);
    let cx = rng.random_range(margin_x..=(bounds.width - margin_x));
    let cy = rng.random_range(margin_y..=(bounds.height - margin_y));

    Spawn {
        spawn_id: Uuid::new_v4().to_string(),
        cx,
        cy,
        r,
        ttl_ms: bounds.ttl_ms,
    }
}

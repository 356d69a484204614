use std::env;

use crate::domain::event::DEFAULT_MAX_ROUNDS;
use crate::domain::spawn::SpawnBounds;
use crate::use_cases::coordinator::GameSettings;

// Runtime/server constants (not gameplay tuning).

pub fn http_port() -> u16 {
    env::var("DUEL_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3003)
}

pub fn max_rounds() -> u32 {
    env::var("DUEL_MAX_ROUNDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_ROUNDS)
}

// Play-surface geometry; defaults match the reference portrait surface.
pub fn spawn_bounds() -> SpawnBounds {
    let defaults = SpawnBounds::default();
    let bounds = SpawnBounds {
        width: env_f64("DUEL_SURFACE_WIDTH", defaults.width),
        height: env_f64("DUEL_SURFACE_HEIGHT", defaults.height),
        ..defaults
    };
    validated(bounds, defaults)
}

// A surface too small for the largest target (or a non-finite one, since
// `f64::parse` accepts "NaN" and "inf") cannot place targets; fall back to
// the defaults rather than degrade placement.
fn validated(bounds: SpawnBounds, defaults: SpawnBounds) -> SpawnBounds {
    if bounds.fits_targets() {
        return bounds;
    }
    tracing::warn!(
        width = bounds.width,
        height = bounds.height,
        "configured surface cannot fit targets; using defaults"
    );
    defaults
}

pub fn game_settings() -> GameSettings {
    GameSettings {
        max_rounds: max_rounds(),
        bounds: spawn_bounds(),
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

//! Property keys written or cleaned up on host items
//!
//! Keys are case-sensitive: the host keeps `WSJF` and `wsjf` as distinct
//! properties.

/// Canonical derived score
pub const SCORE: &str = "WSJF";

/// Legacy lowercase score key; only ever removed, never written
pub const LEGACY_SCORE: &str = "wsjf";

/// Host-recognized block background color (coarse three-band hint)
pub const BACKGROUND_COLOR: &str = "background-color";

/// Fine-grained tier marker
pub const COLOR_LEVEL: &str = "color-level";

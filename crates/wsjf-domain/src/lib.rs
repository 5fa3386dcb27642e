//! WSJF Domain Layer
//!
//! Core model and pure logic for Weighted Shortest Job First prioritization of
//! outline items ("blocks") that live in an external note-taking host.
//!
//! ## Key Concepts
//!
//! - **Item**: An externally owned outline node with content and properties
//! - **FactorSet**: The four numeric inputs resolved from an item's properties
//! - **Score**: `(business value + time criticality + risk reduction) / job size`,
//!   rounded to two decimal places
//! - **Tier**: Fine-grained classification of a score against the configured
//!   scale maximum
//! - **ColorBand**: Coarse three-band background color by absolute score
//!
//! ## Architecture
//!
//! - Pure business logic only; no I/O
//! - Scales and thresholds are data, not constants baked into the engine
//! - Trait definitions for every interaction with the host application

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod band;
pub mod error;
pub mod factor;
pub mod item;
pub mod keys;
pub mod migration;
pub mod scale;
pub mod score;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use band::{BandPolicy, ColorBand};
pub use error::DomainError;
pub use factor::{Factor, FactorSet};
pub use item::{Item, ItemId, Page, Properties, PropertyValue};
pub use scale::{FactorScale, FactorScales, ScaleOption};
pub use score::{compute_score, Score};
pub use tier::{Tier, TierPolicy};

//! # sct-score: Transparency Scoring
//!
//! Turns a product's current supplier and document counts into a single
//! 0–100 transparency score and a 0–100 supplier completion rate.
//!
//! ## Weighting
//!
//! | Component | Points |
//! |-----------|--------|
//! | Presence | 20 if the product has any supplier |
//! | Response coverage | 40 × responded-or-verified / total suppliers |
//! | Document volume | min(documents × 5, 25) |
//! | Verified documents | min(verified documents × 3, 15) |
//!
//! The sum is rounded and capped at 100. The scorer is a pure function of
//! its input and keeps no state between calls.

pub mod scorer;

pub use scorer::{ScoreBreakdown, ScoreInputs, TransparencyScore, TransparencyScorer};

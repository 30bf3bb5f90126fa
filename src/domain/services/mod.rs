//! Domain services - Pure game rules with no I/O

mod damage;
pub mod narrative;
mod success_curve;
mod tier_classifier;

pub use damage::DamageCalculator;
pub use success_curve::SuccessCurve;
pub use tier_classifier::TierClassifier;

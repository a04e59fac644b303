//! Ethics and constraint checks on recommended actions.

pub mod gate;
pub mod model;

pub use gate::{ConstraintEthicsGate, EthicsGate};
pub use model::{
    DecisionExplanation, ExplanationFactor, REST_AND_RECOVER, StateSnapshot, VALIDATION_EXPLANATION,
    ValidationResult,
};

//! State record for data-driven flows.
//!
//! The graph engine is generic over its state type and never inspects it; flows built from
//! stored definitions use [`FlowState`], an explicit record with typed recognized keys
//! (`input`, `sentiment`, `analysis_result`, `final_response`) and an open map for anything else.
//!
//! # Example
//!
//! ```rust
//! use heddle::FlowState;
//!
//! let state = FlowState::new("I love this");
//! assert_eq!(state.require_input().unwrap(), "I love this");
//! assert!(state.require_str("sentiment").is_err());
//! ```

mod flow_state;

pub use flow_state::{keys, FlowState, StateError};
pub(crate) use flow_state::value_as_text;

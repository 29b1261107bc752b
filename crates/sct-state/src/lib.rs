//! # sct-state: Disclosure State Machines
//!
//! Implements the two coupled lifecycles of the disclosure flow as runtime
//! state machines over the `sct-core` records.
//!
//! ## State Machines
//!
//! - **Response** (`response.rs`): `Pending → Submitted` (terminal), gated by
//!   the response's access token and the survey's required questions.
//!
//! - **Supplier** (`supplier.rs`): `Pending → Responded → Verified`. A
//!   successful submission moves a linked supplier to `Responded`; an
//!   operator confirms `Verified`.
//!
//! ## Design
//!
//! Transitions here are pure: they validate and mutate an in-memory record
//! and return a transition record. Making the response and supplier changes
//! atomic is the repository's job (`sct-disclosure`), which applies both
//! results under a single compare-and-swap.

pub mod response;
pub mod supplier;

pub use response::{ResponseError, ResponseStateMachine, ResponseTransitionRecord};
pub use supplier::{SupplierError, SupplierLifecycle, SupplierTransitionRecord};

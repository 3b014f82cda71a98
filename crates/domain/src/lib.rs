//! `pessoas-domain` — user/person records served by the API.
//!
//! These are transfer-shaped records populated by the data layer; they carry
//! no behavior beyond serde mapping.

pub mod profile;

pub use profile::{ProfileRole, UserProfile};

//! Wire models for the fleet backend
//!
//! Field names follow the backend's JSON contract (Portuguese identifiers);
//! the Rust side uses descriptive names via `#[serde(rename)]`. Payload
//! fields the statistics layer depends on are `Option` so partial records
//! null-coalesce instead of failing deserialization.

mod alert;
mod history;
mod maintenance;
mod route;
mod truck;

pub use alert::*;
pub use history::*;
pub use maintenance::*;
pub use route::*;
pub use truck::*;

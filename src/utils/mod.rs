//! Shared helpers.

pub mod color;
pub mod exec;
pub mod html;
mod plural;

pub use plural::plural_count;

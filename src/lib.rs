pub mod capability;
pub mod error;
pub mod font;
pub mod icon_gen;
pub mod manifest;

pub use error::{IconError, Result};

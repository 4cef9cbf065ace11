//! Format implementations
//!
//! The textile front-end and the back-ends built on the generator walk.

pub mod icons;
pub mod json;
pub mod text;
pub mod textile;
pub mod treeviz;

pub use json::JsonFormat;
pub use text::TextFormat;
pub use textile::TextileFormat;
pub use treeviz::{TreevizFormat, TreevizOptions};

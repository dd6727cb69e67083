//! Request handlers.

pub mod health;
pub mod images;
pub mod result;
pub mod workflow;

pub use health::*;
pub use images::*;
pub use result::*;
pub use workflow::*;

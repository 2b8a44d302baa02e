// Core pipeline components
pub mod argument_converter;
pub mod cancellation;
pub mod pagination;

pub use argument_converter::*;
pub use cancellation::*;
pub use pagination::*;

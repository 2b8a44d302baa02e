// CLI interface components
pub mod cli_args;
pub mod cli_runner;
pub mod json_highlighter;
pub mod output_formatter;

pub use cli_args::*;
pub use cli_runner::*;
pub use json_highlighter::*;
pub use output_formatter::*;

//! Output formatting for CLI

pub mod printer;

pub use printer::{print_header, print_json, print_key_value, print_success, print_warning};

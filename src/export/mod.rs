pub mod json;

pub use json::{JsonStore, export_json_to_path, import_json};

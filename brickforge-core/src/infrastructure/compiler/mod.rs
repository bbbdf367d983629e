pub mod jinja;
pub mod templates;

pub use jinja::JinjaRenderer;

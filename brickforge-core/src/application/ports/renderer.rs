use crate::error::ForgeError;

/// Renders one named template against a JSON context.
pub trait TemplateEngine: Send + Sync {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String, ForgeError>;
}

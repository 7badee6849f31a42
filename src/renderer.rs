//! Template rendering engines used by the `template` handler.
use minijinja::{AutoEscape, Environment, UndefinedBehavior};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders `template` with the given data.
    ///
    /// # Arguments
    /// * `name` - Name of the template, shown in error messages
    /// * `template` - Template source to render
    /// * `context` - Data the template is executed against
    ///
    /// # Returns
    /// * `Result<String, String>` - Rendered text, or the engine's error message
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String, String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer that fails on undefined variables.
    ///
    /// Output is never escaped, whatever the template's file extension.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_auto_escape_callback(|_| AutoEscape::None);
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, name: &str, template: &str, context: &serde_json::Value) -> Result<String, String> {
        let mut env = self.env.clone();
        env.add_template_owned(name.to_string(), template.to_string())
            .map_err(|e| e.to_string())?;

        let tmpl = env.get_template(name).map_err(|e| e.to_string())?;

        tmpl.render(context).map_err(|e| e.to_string())
    }
}

//! Tool specifications and model-family variants

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Model family a tool spec is written for
///
/// `Generic` is the fallback: lookups for any other family fall back to it
/// when no family-specific spec is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ModelFamily {
    #[default]
    Generic,
    Anthropic,
    OpenAi,
    Gemini,
    NextGen,
}

impl ModelFamily {
    pub const ALL: [ModelFamily; 5] = [
        ModelFamily::Generic,
        ModelFamily::Anthropic,
        ModelFamily::OpenAi,
        ModelFamily::Gemini,
        ModelFamily::NextGen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelFamily::Generic => "generic",
            ModelFamily::Anthropic => "anthropic",
            ModelFamily::OpenAi => "openai",
            ModelFamily::Gemini => "gemini",
            ModelFamily::NextGen => "next_gen",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "generic" => Ok(ModelFamily::Generic),
            "anthropic" => Ok(ModelFamily::Anthropic),
            "openai" => Ok(ModelFamily::OpenAi),
            "gemini" => Ok(ModelFamily::Gemini),
            "next_gen" => Ok(ModelFamily::NextGen),
            other => Err(format!("Unknown model family: {}", other)),
        }
    }
}

/// Predicate deciding whether a parameter is offered given a prompt context
pub type ContextPredicate = Arc<dyn Fn(&serde_json::Map<String, Value>) -> bool + Send + Sync>;

/// A single parameter of a tool spec (Value Object)
#[derive(Clone)]
pub struct ToolParameter {
    pub name: String,
    pub required: bool,
    /// Description shown in tool schemas and parameter lists
    pub instruction: String,
    /// Placeholder text for the pseudo-XML usage block
    pub usage: String,
    /// When set, the parameter is only offered if the predicate accepts
    /// the prompt context
    pub context_requirements: Option<ContextPredicate>,
}

impl ToolParameter {
    pub fn new(
        name: impl Into<String>,
        required: bool,
        instruction: impl Into<String>,
        usage: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            required,
            instruction: instruction.into(),
            usage: usage.into(),
            context_requirements: None,
        }
    }

    pub fn with_context_requirements(mut self, predicate: ContextPredicate) -> Self {
        self.context_requirements = Some(predicate);
        self
    }

    /// Whether the parameter applies under the given prompt context
    pub fn applies_to(&self, context: &serde_json::Map<String, Value>) -> bool {
        match &self.context_requirements {
            Some(predicate) => predicate(context),
            None => true,
        }
    }
}

impl fmt::Debug for ToolParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolParameter")
            .field("name", &self.name)
            .field("required", &self.required)
            .field("instruction", &self.instruction)
            .field("usage", &self.usage)
            .field(
                "context_requirements",
                &self.context_requirements.as_ref().map(|_| "<predicate>"),
            )
            .finish()
    }
}

/// Specification of a tool for one model family (Entity)
#[derive(Debug, Clone)]
pub struct ToolSpec {
    /// Stable identifier used for registry lookups and tool calls
    pub id: String,
    /// Human-readable name
    pub name: String,
    pub variant: ModelFamily,
    /// Description of what the tool does and when to use it
    pub instructions: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolSpec {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            variant: ModelFamily::Generic,
            instructions: String::new(),
            parameters: Vec::new(),
        }
    }

    pub fn with_variant(mut self, variant: ModelFamily) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn required_parameters(&self) -> impl Iterator<Item = &ToolParameter> {
        self.parameters.iter().filter(|p| p.required)
    }

    /// Render the spec for a plain-text prompt: description, parameter
    /// list, and a pseudo-XML usage block.
    ///
    /// Parameters whose context requirements reject the given context are
    /// omitted entirely.
    pub fn format_for_prompt(&self, context: &serde_json::Map<String, Value>) -> String {
        let mut out = format!("## {}\n", self.id);
        out.push_str(&self.instructions);
        out.push('\n');

        let offered: Vec<&ToolParameter> = self
            .parameters
            .iter()
            .filter(|p| p.applies_to(context))
            .collect();

        if !offered.is_empty() {
            out.push_str("Parameters:\n");
            for param in &offered {
                let requirement = if param.required { "required" } else { "optional" };
                out.push_str(&format!(
                    "- {} ({}): {}\n",
                    param.name, requirement, param.instruction
                ));
            }
        }

        out.push_str("Usage:\n");
        out.push_str(&format!("<{}>\n", self.id));
        for param in &offered {
            out.push_str(&format!(
                "<{name}>{usage}</{name}>\n",
                name = param.name,
                usage = param.usage
            ));
        }
        out.push_str(&format!("</{}>", self.id));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_file_spec() -> ToolSpec {
        ToolSpec::new("read_file", "Read File")
            .with_instructions("Read the contents of a file at the given path.")
            .with_parameter(ToolParameter::new(
                "path",
                true,
                "Path of the file to read",
                "path/to/file",
            ))
    }

    #[test]
    fn test_model_family_round_trip() {
        for family in ModelFamily::ALL {
            assert_eq!(family.as_str().parse::<ModelFamily>().unwrap(), family);
        }
        assert!("claude".parse::<ModelFamily>().is_err());
    }

    #[test]
    fn test_spec_defaults_to_generic() {
        assert_eq!(read_file_spec().variant, ModelFamily::Generic);
    }

    #[test]
    fn test_format_for_prompt_usage_block() {
        let rendered = read_file_spec().format_for_prompt(&serde_json::Map::new());
        assert!(rendered.starts_with("## read_file\n"));
        assert!(rendered.contains("- path (required): Path of the file to read"));
        assert!(rendered.contains("<read_file>\n<path>path/to/file</path>\n</read_file>"));
    }

    #[test]
    fn test_context_requirements_filter_parameters() {
        let spec = ToolSpec::new("execute_command", "Execute Command")
            .with_instructions("Run a shell command.")
            .with_parameter(ToolParameter::new("command", true, "The command", "cmd"))
            .with_parameter(
                ToolParameter::new("timeout", false, "Timeout in seconds", "120")
                    .with_context_requirements(Arc::new(|ctx| {
                        ctx.get("supports_timeout")
                            .and_then(|v| v.as_bool())
                            .unwrap_or(false)
                    })),
            );

        let bare = spec.format_for_prompt(&serde_json::Map::new());
        assert!(!bare.contains("timeout"));

        let mut ctx = serde_json::Map::new();
        ctx.insert("supports_timeout".into(), true.into());
        let full = spec.format_for_prompt(&ctx);
        assert!(full.contains("- timeout (optional): Timeout in seconds"));
    }
}

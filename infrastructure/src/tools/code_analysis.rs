//! Source code definition listing tool

use std::path::PathBuf;

use async_trait::async_trait;
use regex::Regex;

use crate::tools::resolve_path;
use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const LIST_CODE_DEFINITION_NAMES: &str = "list_code_definition_names";

pub fn list_code_definition_names_spec() -> ToolSpec {
    ToolSpec::new(LIST_CODE_DEFINITION_NAMES, "List Code Definition Names")
        .with_instructions(
            "List top-level definition names (functions, types, classes) in \
the source files of a directory. Useful for getting an overview of a \
codebase before reading individual files.",
        )
        .with_parameter(ToolParameter::new(
            "path",
            true,
            "Directory whose source files should be scanned",
            "src",
        ))
}

/// (extensions, definition pattern with the name in capture group 1)
fn patterns() -> Vec<(&'static [&'static str], Regex)> {
    vec![
        (
            &["rs"][..],
            Regex::new(r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:async\s+)?(?:fn|struct|enum|trait|mod)\s+(\w+)").unwrap(),
        ),
        (
            &["py"][..],
            Regex::new(r"^\s*(?:async\s+)?(?:def|class)\s+(\w+)").unwrap(),
        ),
        (
            &["js", "ts", "jsx", "tsx"][..],
            Regex::new(r"^\s*(?:export\s+)?(?:function|class)\s+(\w+)").unwrap(),
        ),
        (
            &["go"][..],
            Regex::new(r"^func\s+(?:\([^)]*\)\s+)?(\w+)|^type\s+(\w+)").unwrap(),
        ),
    ]
}

pub struct ListCodeDefinitionNamesHandler {
    cwd: PathBuf,
}

impl ListCodeDefinitionNamesHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for ListCodeDefinitionNamesHandler {
    fn tool_id(&self) -> &str {
        LIST_CODE_DEFINITION_NAMES
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = match params.require_str("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let root = resolve_path(&self.cwd, &path);
        if !root.is_dir() {
            return ToolResult::err(format!("Not a directory: {}", path));
        }

        let patterns = patterns();
        let Ok(entries) = std::fs::read_dir(&root) else {
            return ToolResult::err(format!("Failed to read directory: {}", path));
        };
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        files.sort();

        let mut sections: Vec<String> = Vec::new();
        for file in files {
            let ext = file
                .extension()
                .map(|e| e.to_string_lossy().into_owned())
                .unwrap_or_default();
            let Some((_, regex)) = patterns.iter().find(|(exts, _)| exts.contains(&ext.as_str()))
            else {
                continue;
            };
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            let names: Vec<&str> = content
                .lines()
                .filter_map(|line| {
                    regex.captures(line).and_then(|caps| {
                        caps.iter().skip(1).flatten().next().map(|m| m.as_str())
                    })
                })
                .collect();
            if !names.is_empty() {
                let file_name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                sections.push(format!("{}:\n  {}", file_name, names.join("\n  ")));
            }
        }

        if sections.is_empty() {
            ToolResult::ok("No source code definitions found.")
        } else {
            ToolResult::ok(sections.join("\n\n"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_lists_rust_definitions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("lib.rs"),
            "pub fn alpha() {}\nstruct Beta;\nenum Gamma {}\n  let x = 1;",
        )
        .unwrap();
        let handler = ListCodeDefinitionNamesHandler::new(dir.path());
        let result = handler.execute(&ToolParams::new().with("path", ".")).await;
        assert!(result.is_success());
        assert!(result.output.contains("lib.rs:"));
        assert!(result.output.contains("alpha"));
        assert!(result.output.contains("Beta"));
        assert!(result.output.contains("Gamma"));
    }

    #[tokio::test]
    async fn test_lists_python_definitions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.py"), "class Runner:\n    def run(self): pass").unwrap();
        let handler = ListCodeDefinitionNamesHandler::new(dir.path());
        let result = handler.execute(&ToolParams::new().with("path", ".")).await;
        assert!(result.output.contains("Runner"));
        assert!(result.output.contains("run"));
    }

    #[tokio::test]
    async fn test_no_definitions() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "just text").unwrap();
        let handler = ListCodeDefinitionNamesHandler::new(dir.path());
        let result = handler.execute(&ToolParams::new().with("path", ".")).await;
        assert_eq!(result.output, "No source code definitions found.");
    }
}

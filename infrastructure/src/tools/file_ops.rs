//! File reading and writing tools

use std::path::PathBuf;

use async_trait::async_trait;

use crate::tools::resolve_path;
use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const READ_FILE: &str = "read_file";
pub const WRITE_TO_FILE: &str = "write_to_file";
pub const REPLACE_IN_FILE: &str = "replace_in_file";

pub fn read_file_spec() -> ToolSpec {
    ToolSpec::new(READ_FILE, "Read File")
        .with_instructions(
            "Read the contents of a file at the given path. Use this to examine \
existing files before modifying them. Only text files can be read.",
        )
        .with_parameter(ToolParameter::new(
            "path",
            true,
            "Path of the file to read, relative to the working directory",
            "path/to/file",
        ))
}

pub fn write_to_file_spec() -> ToolSpec {
    ToolSpec::new(WRITE_TO_FILE, "Write To File")
        .with_instructions(
            "Write content to a file, replacing it entirely if it exists and \
creating it (including parent directories) if it does not.",
        )
        .with_parameter(ToolParameter::new(
            "path",
            true,
            "Path of the file to write, relative to the working directory",
            "path/to/file",
        ))
        .with_parameter(ToolParameter::new(
            "content",
            true,
            "The complete content to write to the file",
            "file content here",
        ))
}

pub fn replace_in_file_spec() -> ToolSpec {
    ToolSpec::new(REPLACE_IN_FILE, "Replace In File")
        .with_instructions(
            "Edit a file by applying SEARCH/REPLACE blocks. Each block replaces \
the first exact occurrence of the search text. The diff format is:\n\
------- SEARCH\n<text to find>\n=======\n<replacement text>\n+++++++ REPLACE",
        )
        .with_parameter(ToolParameter::new(
            "path",
            true,
            "Path of the file to edit, relative to the working directory",
            "path/to/file",
        ))
        .with_parameter(ToolParameter::new(
            "diff",
            true,
            "One or more SEARCH/REPLACE blocks",
            "------- SEARCH\nold\n=======\nnew\n+++++++ REPLACE",
        ))
}

pub struct ReadFileHandler {
    cwd: PathBuf,
}

impl ReadFileHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for ReadFileHandler {
    fn tool_id(&self) -> &str {
        READ_FILE
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = match params.require_str("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let full = resolve_path(&self.cwd, &path);
        match tokio::fs::read_to_string(&full).await {
            Ok(content) => ToolResult::ok(content),
            Err(e) => ToolResult::err(format!("Failed to read file {}: {}", path, e)),
        }
    }
}

pub struct WriteToFileHandler {
    cwd: PathBuf,
}

impl WriteToFileHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for WriteToFileHandler {
    fn tool_id(&self) -> &str {
        WRITE_TO_FILE
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = match params.require_str("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let content = match params.require_str("content") {
            Ok(content) => content,
            Err(e) => return ToolResult::err(e),
        };
        let full = resolve_path(&self.cwd, &path);
        if let Some(parent) = full.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return ToolResult::err(format!("Failed to create directories for {}: {}", path, e));
            }
        }
        let existed = full.exists();
        match tokio::fs::write(&full, content).await {
            Ok(()) => {
                if existed {
                    ToolResult::ok(format!("Updated file: {}", path))
                } else {
                    ToolResult::ok(format!("Created file: {}", path))
                }
            }
            Err(e) => ToolResult::err(format!("Failed to write file {}: {}", path, e)),
        }
    }
}

pub struct ReplaceInFileHandler {
    cwd: PathBuf,
}

impl ReplaceInFileHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for ReplaceInFileHandler {
    fn tool_id(&self) -> &str {
        REPLACE_IN_FILE
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = match params.require_str("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let diff = match params.require_str("diff") {
            Ok(diff) => diff,
            Err(e) => return ToolResult::err(e),
        };
        let blocks = match parse_diff_blocks(&diff) {
            Ok(blocks) if !blocks.is_empty() => blocks,
            Ok(_) => return ToolResult::err("No SEARCH/REPLACE blocks found in diff".to_string()),
            Err(e) => return ToolResult::err(e),
        };

        let full = resolve_path(&self.cwd, &path);
        let mut content = match tokio::fs::read_to_string(&full).await {
            Ok(content) => content,
            Err(e) => return ToolResult::err(format!("Failed to read file {}: {}", path, e)),
        };

        // All blocks are applied in memory first so a failed match leaves
        // the file untouched.
        for (i, (search, replace)) in blocks.iter().enumerate() {
            match content.find(search.as_str()) {
                Some(idx) => {
                    content.replace_range(idx..idx + search.len(), replace);
                }
                None => {
                    return ToolResult::err(format!(
                        "Search text of block {} not found in {}",
                        i + 1,
                        path
                    ));
                }
            }
        }

        match tokio::fs::write(&full, content).await {
            Ok(()) => ToolResult::ok(format!("Updated file: {}", path)),
            Err(e) => ToolResult::err(format!("Failed to write file {}: {}", path, e)),
        }
    }
}

/// Parse `------- SEARCH` / `=======` / `+++++++ REPLACE` blocks
fn parse_diff_blocks(diff: &str) -> Result<Vec<(String, String)>, String> {
    enum Section {
        Outside,
        Search,
        Replace,
    }

    let mut blocks = Vec::new();
    let mut section = Section::Outside;
    let mut search: Vec<&str> = Vec::new();
    let mut replace: Vec<&str> = Vec::new();

    for line in diff.lines() {
        let trimmed = line.trim_end();
        if trimmed.starts_with("-------") && trimmed.contains("SEARCH") {
            if !matches!(section, Section::Outside) {
                return Err("Malformed diff: nested SEARCH marker".to_string());
            }
            section = Section::Search;
        } else if trimmed == "=======" {
            match section {
                Section::Search => section = Section::Replace,
                _ => return Err("Malformed diff: ======= outside a SEARCH block".to_string()),
            }
        } else if trimmed.starts_with("+++++++") && trimmed.contains("REPLACE") {
            match section {
                Section::Replace => {
                    blocks.push((search.join("\n"), replace.join("\n")));
                    search.clear();
                    replace.clear();
                    section = Section::Outside;
                }
                _ => return Err("Malformed diff: REPLACE marker without a SEARCH block".to_string()),
            }
        } else {
            match section {
                Section::Search => search.push(line),
                Section::Replace => replace.push(line),
                Section::Outside => {}
            }
        }
    }

    if !matches!(section, Section::Outside) {
        return Err("Malformed diff: unterminated SEARCH/REPLACE block".to_string());
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let writer = WriteToFileHandler::new(dir.path());
        let reader = ReadFileHandler::new(dir.path());

        let result = writer
            .execute(
                &ToolParams::new()
                    .with("path", "sub/notes.txt")
                    .with("content", "hello\nworld"),
            )
            .await;
        assert!(result.is_success());
        assert_eq!(result.output, "Created file: sub/notes.txt");

        let result = reader
            .execute(&ToolParams::new().with("path", "sub/notes.txt"))
            .await;
        assert_eq!(result.output, "hello\nworld");
    }

    #[tokio::test]
    async fn test_overwrite_reports_updated() {
        let dir = TempDir::new().unwrap();
        let writer = WriteToFileHandler::new(dir.path());
        let params = ToolParams::new().with("path", "a.txt").with("content", "x");
        writer.execute(&params).await;
        let result = writer.execute(&params).await;
        assert_eq!(result.output, "Updated file: a.txt");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_failure() {
        let dir = TempDir::new().unwrap();
        let reader = ReadFileHandler::new(dir.path());
        let result = reader
            .execute(&ToolParams::new().with("path", "nope.txt"))
            .await;
        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap().contains("nope.txt"));
    }

    #[tokio::test]
    async fn test_missing_required_param() {
        let dir = TempDir::new().unwrap();
        let writer = WriteToFileHandler::new(dir.path());
        let result = writer.execute(&ToolParams::new().with("path", "a.txt")).await;
        assert_eq!(
            result.error.as_deref().unwrap(),
            "Missing required parameter: content"
        );
    }

    #[tokio::test]
    async fn test_replace_in_file() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("code.rs"), "fn old() {}\nfn keep() {}").unwrap();
        let handler = ReplaceInFileHandler::new(dir.path());
        let diff = "------- SEARCH\nfn old() {}\n=======\nfn new() {}\n+++++++ REPLACE";
        let result = handler
            .execute(&ToolParams::new().with("path", "code.rs").with("diff", diff))
            .await;
        assert!(result.is_success());
        let content = std::fs::read_to_string(dir.path().join("code.rs")).unwrap();
        assert_eq!(content, "fn new() {}\nfn keep() {}");
    }

    #[tokio::test]
    async fn test_replace_no_match_leaves_file_untouched() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), "original").unwrap();
        let handler = ReplaceInFileHandler::new(dir.path());
        let diff = "------- SEARCH\nmissing\n=======\nnew\n+++++++ REPLACE";
        let result = handler
            .execute(&ToolParams::new().with("path", "a.txt").with("diff", diff))
            .await;
        assert!(!result.is_success());
        let content = std::fs::read_to_string(dir.path().join("a.txt")).unwrap();
        assert_eq!(content, "original");
    }

    #[test]
    fn test_parse_multiple_blocks() {
        let diff = "------- SEARCH\na\n=======\nb\n+++++++ REPLACE\n------- SEARCH\nc\n=======\nd\n+++++++ REPLACE";
        let blocks = parse_diff_blocks(diff).unwrap();
        assert_eq!(blocks, vec![("a".into(), "b".into()), ("c".into(), "d".into())]);
    }

    #[test]
    fn test_parse_unterminated_block_errors() {
        assert!(parse_diff_blocks("------- SEARCH\na\n=======\nb").is_err());
    }
}

//! Directory listing and content search tools

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use regex::Regex;

use crate::tools::resolve_path;
use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const LIST_FILES: &str = "list_files";
pub const SEARCH_FILES: &str = "search_files";

const MAX_LISTED: usize = 500;
const MAX_MATCHES: usize = 100;

/// Directories never worth descending into
const IGNORED_DIRS: [&str; 4] = [".git", "node_modules", "target", "__pycache__"];

pub fn list_files_spec() -> ToolSpec {
    ToolSpec::new(LIST_FILES, "List Files")
        .with_instructions(
            "List files and directories at a path. Directories carry a trailing \
slash. Use recursive listing to explore a whole tree at once.",
        )
        .with_parameter(ToolParameter::new(
            "path",
            false,
            "Directory to list (defaults to the working directory)",
            ".",
        ))
        .with_parameter(ToolParameter::new(
            "recursive",
            false,
            "Set to true to list the whole tree",
            "false",
        ))
}

pub fn search_files_spec() -> ToolSpec {
    ToolSpec::new(SEARCH_FILES, "Search Files")
        .with_instructions(
            "Search file contents under a path with a regular expression. \
Matches are reported as path:line: text. Use the file pattern to limit \
the search to certain file names.",
        )
        .with_parameter(ToolParameter::new(
            "path",
            true,
            "Directory to search under",
            ".",
        ))
        .with_parameter(ToolParameter::new(
            "regex",
            true,
            "Regular expression to match against each line",
            "fn main",
        ))
        .with_parameter(ToolParameter::new(
            "file_pattern",
            false,
            "Glob pattern filtering file names, e.g. *.rs",
            "*.rs",
        ))
}

fn is_ignored(name: &str) -> bool {
    IGNORED_DIRS.contains(&name) || (name.starts_with('.') && name.len() > 1)
}

fn collect_entries(root: &Path, recursive: bool, out: &mut Vec<(PathBuf, bool)>) {
    let Ok(entries) = std::fs::read_dir(root) else {
        return;
    };
    let mut entries: Vec<_> = entries.flatten().collect();
    entries.sort_by_key(|e| e.path());
    for entry in entries {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if is_ignored(&name) {
            continue;
        }
        let is_dir = path.is_dir();
        out.push((path.clone(), is_dir));
        if out.len() >= MAX_LISTED {
            return;
        }
        if recursive && is_dir {
            collect_entries(&path, true, out);
        }
    }
}

pub struct ListFilesHandler {
    cwd: PathBuf,
}

impl ListFilesHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for ListFilesHandler {
    fn tool_id(&self) -> &str {
        LIST_FILES
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = params.get_str("path").unwrap_or_else(|| ".".to_string());
        let recursive = params.get_bool("recursive").unwrap_or(false);
        let root = resolve_path(&self.cwd, &path);
        if !root.is_dir() {
            return ToolResult::err(format!("Not a directory: {}", path));
        }

        let mut entries = Vec::new();
        collect_entries(&root, recursive, &mut entries);

        if entries.is_empty() {
            return ToolResult::ok("Directory is empty.");
        }
        let mut lines: Vec<String> = entries
            .iter()
            .map(|(p, is_dir)| {
                let rel = p.strip_prefix(&root).unwrap_or(p).display();
                if *is_dir {
                    format!("{}/", rel)
                } else {
                    rel.to_string()
                }
            })
            .collect();
        if entries.len() >= MAX_LISTED {
            lines.push(format!("(listing truncated at {} entries)", MAX_LISTED));
        }
        ToolResult::ok(lines.join("\n"))
    }
}

pub struct SearchFilesHandler {
    cwd: PathBuf,
}

impl SearchFilesHandler {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }
}

#[async_trait]
impl ToolHandler for SearchFilesHandler {
    fn tool_id(&self) -> &str {
        SEARCH_FILES
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = match params.require_str("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let pattern = match params.require_str("regex") {
            Ok(pattern) => pattern,
            Err(e) => return ToolResult::err(e),
        };
        let regex = match Regex::new(&pattern) {
            Ok(regex) => regex,
            Err(e) => return ToolResult::err(format!("Invalid regex: {}", e)),
        };
        let file_pattern = params.get_str("file_pattern").unwrap_or_else(|| "*".to_string());
        let file_glob = match glob::Pattern::new(&file_pattern) {
            Ok(glob) => glob,
            Err(e) => return ToolResult::err(format!("Invalid file pattern: {}", e)),
        };

        let root = resolve_path(&self.cwd, &path);
        if !root.is_dir() {
            return ToolResult::err(format!("Not a directory: {}", path));
        }

        let mut entries = Vec::new();
        collect_entries(&root, true, &mut entries);

        let mut matches: Vec<String> = Vec::new();
        for (file, is_dir) in entries {
            if is_dir || matches.len() >= MAX_MATCHES {
                continue;
            }
            let name = file.file_name().map(|n| n.to_string_lossy().into_owned());
            if !name.map(|n| file_glob.matches(&n)).unwrap_or(false) {
                continue;
            }
            let Ok(content) = std::fs::read_to_string(&file) else {
                continue;
            };
            let rel = file.strip_prefix(&root).unwrap_or(&file).display().to_string();
            for (lineno, line) in content.lines().enumerate() {
                if regex.is_match(line) {
                    matches.push(format!("{}:{}: {}", rel, lineno + 1, line.trim_end()));
                    if matches.len() >= MAX_MATCHES {
                        break;
                    }
                }
            }
        }

        if matches.is_empty() {
            ToolResult::ok(format!("No matches found for pattern: {}", pattern))
        } else {
            let mut out = matches.join("\n");
            if matches.len() >= MAX_MATCHES {
                out.push_str(&format!("\n(results truncated at {} matches)", MAX_MATCHES));
            }
            ToolResult::ok(out)
        }
    }
}

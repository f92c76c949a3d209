//! Image analysis tool

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::tools::resolve_path;
use alfredo_application::VisionModel;
use alfredo_domain::{ToolHandler, ToolParameter, ToolParams, ToolResult, ToolSpec};

pub const ANALYZE_IMAGE: &str = "analyze_image";

const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

const DEFAULT_PROMPT: &str = "Describe this image in detail.";

pub fn analyze_image_spec() -> ToolSpec {
    ToolSpec::new(ANALYZE_IMAGE, "Analyze Image")
        .with_instructions(
            "Analyze an image file with a vision model and return a textual \
description. Supported formats: jpg, jpeg, png, gif, webp, bmp.",
        )
        .with_parameter(ToolParameter::new(
            "path",
            true,
            "Path of the image file to analyze",
            "images/screenshot.png",
        ))
        .with_parameter(ToolParameter::new(
            "prompt",
            false,
            "What to look for in the image (defaults to a general description)",
            "What error is shown in this screenshot?",
        ))
}

pub struct AnalyzeImageHandler {
    cwd: PathBuf,
    vision: Option<Arc<dyn VisionModel>>,
}

impl AnalyzeImageHandler {
    pub fn new(cwd: impl Into<PathBuf>, vision: Option<Arc<dyn VisionModel>>) -> Self {
        Self {
            cwd: cwd.into(),
            vision,
        }
    }
}

fn mime_for_extension(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

#[async_trait]
impl ToolHandler for AnalyzeImageHandler {
    fn tool_id(&self) -> &str {
        ANALYZE_IMAGE
    }

    async fn execute(&self, params: &ToolParams) -> ToolResult {
        let path = match params.require_str("path") {
            Ok(path) => path,
            Err(e) => return ToolResult::err(e),
        };
        let Some(vision) = &self.vision else {
            return ToolResult::err("Vision model is not configured".to_string());
        };

        let full = resolve_path(&self.cwd, &path);
        if !full.is_file() {
            return ToolResult::err(format!("Image file not found: {}", path));
        }
        let ext = full
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return ToolResult::err(format!(
                "Unsupported image format '{}'. Supported: {}",
                ext,
                SUPPORTED_EXTENSIONS.join(", ")
            ));
        }

        let bytes = match tokio::fs::read(&full).await {
            Ok(bytes) => bytes,
            Err(e) => return ToolResult::err(format!("Failed to read image {}: {}", path, e)),
        };
        let encoded = STANDARD.encode(&bytes);
        let prompt = params
            .get_str("prompt")
            .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

        match vision
            .describe_image(mime_for_extension(&ext), &encoded, &prompt)
            .await
        {
            Ok(description) => ToolResult::ok(description),
            Err(e) => ToolResult::err(format!("Image analysis failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alfredo_application::ports::chat_model::ModelError;
    use tempfile::TempDir;

    struct StubVision;

    #[async_trait]
    impl VisionModel for StubVision {
        async fn describe_image(
            &self,
            mime_type: &str,
            base64_data: &str,
            _prompt: &str,
        ) -> Result<String, ModelError> {
            Ok(format!("{} ({} b64 chars)", mime_type, base64_data.len()))
        }
    }

    #[tokio::test]
    async fn test_unconfigured_vision_is_failure() {
        let dir = TempDir::new().unwrap();
        let handler = AnalyzeImageHandler::new(dir.path(), None);
        let result = handler
            .execute(&ToolParams::new().with("path", "a.png"))
            .await;
        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap().contains("not configured"));
    }

    #[tokio::test]
    async fn test_rejects_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("doc.pdf"), b"%PDF").unwrap();
        let handler = AnalyzeImageHandler::new(dir.path(), Some(Arc::new(StubVision)));
        let result = handler
            .execute(&ToolParams::new().with("path", "doc.pdf"))
            .await;
        assert!(!result.is_success());
        assert!(result.error.as_deref().unwrap().contains("Unsupported image format"));
    }

    #[tokio::test]
    async fn test_describes_image() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("pixel.png"), [0x89, 0x50, 0x4E, 0x47]).unwrap();
        let handler = AnalyzeImageHandler::new(dir.path(), Some(Arc::new(StubVision)));
        let result = handler
            .execute(&ToolParams::new().with("path", "pixel.png"))
            .await;
        assert!(result.is_success());
        assert!(result.output.starts_with("image/png"));
    }
}

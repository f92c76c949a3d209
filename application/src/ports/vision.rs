//! Vision-model port

use async_trait::async_trait;

use crate::ports::chat_model::ModelError;

/// Gateway to a vision-capable model (Port)
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Describe a base64-encoded image according to the prompt
    async fn describe_image(
        &self,
        mime_type: &str,
        base64_data: &str,
        prompt: &str,
    ) -> Result<String, ModelError>;
}

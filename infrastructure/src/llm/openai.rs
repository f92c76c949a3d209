//! OpenAI-compatible chat-completions gateway

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use alfredo_application::{ChatModel, ChatRequest, ModelError, VisionModel};
use alfredo_domain::{Message, ToolCallRequest, ToolParams};

/// Chat gateway speaking the OpenAI chat-completions wire format.
///
/// Works against any compatible endpoint (OpenAI, local inference
/// servers, proxies) by pointing `base_url` at its `/v1` root.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChatModel {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn send(&self, body: ApiRequest) -> Result<ApiResponse, ModelError> {
        let url = format!("{}/chat/completions", self.base_url);
        debug!(url = %url, model = %self.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ModelError::Timeout(30)
                } else {
                    ModelError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::RequestFailed(format!(
                "status {}: {}",
                status, body
            )));
        }

        response
            .json::<ApiResponse>()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: ChatRequest<'_>) -> Result<Message, ModelError> {
        let mut messages: Vec<ApiMessage> = Vec::with_capacity(request.messages.len() + 1);
        if let Some(system) = request.system {
            messages.push(ApiMessage::system(system));
        }
        for message in request.messages {
            messages.push(ApiMessage::from_domain(message));
        }

        let tools: Vec<Value> = request.tools.iter().map(wrap_function_tool).collect();
        let body = ApiRequest {
            model: self.model.clone(),
            messages,
            tools: if tools.is_empty() { None } else { Some(tools) },
            tool_choice: if request.tools.is_empty() {
                None
            } else {
                Some("auto".to_string())
            },
        };

        let response = self.send(body).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no choices in response".to_string()))?;

        let content = choice.message.content.unwrap_or_default();
        let tool_calls: Vec<ToolCallRequest> = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| {
                ToolCallRequest::new(
                    call.id,
                    call.function.name,
                    ToolParams::from_json_str(&call.function.arguments),
                )
            })
            .collect();

        info!(
            model = %self.model,
            tool_calls = tool_calls.len(),
            "Chat completion received"
        );
        Ok(Message::ai_with_calls(content, tool_calls))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl VisionModel for OpenAiChatModel {
    async fn describe_image(
        &self,
        mime_type: &str,
        base64_data: &str,
        prompt: &str,
    ) -> Result<String, ModelError> {
        let content = serde_json::json!([
            {"type": "text", "text": prompt},
            {
                "type": "image_url",
                "image_url": {"url": format!("data:{};base64,{}", mime_type, base64_data)}
            }
        ]);
        let body = ApiRequest {
            model: self.model.clone(),
            messages: vec![ApiMessage {
                role: "user".to_string(),
                content: Some(content),
                tool_calls: None,
                tool_call_id: None,
            }],
            tools: None,
            tool_choice: None,
        };

        let response = self.send(body).await?;
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::InvalidResponse("no choices in response".to_string()))?;
        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Neutral `{name, description, input_schema}` to an OpenAI function tool
fn wrap_function_tool(schema: &Value) -> Value {
    serde_json::json!({
        "type": "function",
        "function": {
            "name": schema.get("name").cloned().unwrap_or_default(),
            "description": schema.get("description").cloned().unwrap_or_default(),
            "parameters": schema.get("input_schema").cloned().unwrap_or_default(),
        }
    })
}

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
}

#[derive(Debug, Serialize)]
struct ApiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<ApiToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl ApiMessage {
    fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(Value::String(content.to_string())),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    fn from_domain(message: &Message) -> Self {
        match message {
            Message::System { content } => Self::system(content),
            Message::Human { content } => Self {
                role: "user".to_string(),
                content: Some(Value::String(content.clone())),
                tool_calls: None,
                tool_call_id: None,
            },
            Message::Ai {
                content,
                tool_calls,
            } => Self {
                role: "assistant".to_string(),
                content: if content.is_empty() && !tool_calls.is_empty() {
                    None
                } else {
                    Some(Value::String(content.clone()))
                },
                tool_calls: if tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        tool_calls
                            .iter()
                            .map(|call| ApiToolCall {
                                id: call.id.clone(),
                                kind: "function".to_string(),
                                function: ApiFunctionCall {
                                    name: call.name.clone(),
                                    arguments: serde_json::to_string(call.args.as_map())
                                        .unwrap_or_else(|_| "{}".to_string()),
                                },
                            })
                            .collect(),
                    )
                },
                tool_call_id: None,
            },
            Message::Tool {
                content, call_id, ..
            } => Self {
                role: "tool".to_string(),
                content: Some(Value::String(content.clone())),
                tool_calls: None,
                tool_call_id: Some(call_id.clone()),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ApiResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ApiToolCall>>,
}

//! 图片生成客户端 - 基础设施层
//!
//! 持有唯一的网络客户端资源，只暴露"生成"和"下载"两种能力
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 调用 OpenAI 兼容的生成网关
//! - 支持自定义 API 端点和模型（如 Gemini 图片模型）
//! - 使用 `reqwest` 下载生成的图片

use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestMessageContentPartImage,
        ChatCompletionRequestMessageContentPartText, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, ChatCompletionRequestUserMessageContent,
        ChatCompletionRequestUserMessageContentPart, CreateChatCompletionRequestArgs, ImageDetail,
        ImageUrl,
    },
    Client,
};
use std::path::Path;
use tracing::{debug, warn};

use crate::config::Config;

/// 图片生成客户端
///
/// 职责：
/// - 持有生成网关客户端与下载客户端
/// - 暴露 generate() / download() 能力
/// - 不认识 SceneRequest / AngleSpec
/// - 不处理业务流程
#[derive(Clone)]
pub struct ImageClient {
    client: Client<OpenAIConfig>,
    http: reqwest::Client,
    model_name: String,
}

impl ImageClient {
    /// 创建新的图片生成客户端
    pub fn new(config: &Config) -> Self {
        // 配置生成网关客户端（OpenAI 兼容的服务）
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.gen_api_key)
            .with_api_base(&config.gen_api_base_url);

        let client = Client::with_config(openai_config);

        Self {
            client,
            http: reqwest::Client::new(),
            model_name: config.gen_model_name.clone(),
        }
    }

    /// 获取模型名称
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// 调用生成接口，返回模型的原始文本响应
    ///
    /// 图片模型通过聊天接口返回内容，生成的图片以 URL 形式
    /// 出现在响应文本中，由上层服务负责提取。
    ///
    /// # 参数
    /// - `user_message`: 用户消息内容（提示词）
    /// - `system_message`: 系统消息（可选）
    /// - `imgs`: 产品参考图 URL 列表（可选），会追加到用户消息中
    ///
    /// # 返回
    /// 返回模型的响应内容（字符串）
    pub async fn generate(
        &self,
        user_message: &str,
        system_message: Option<&str>,
        imgs: Option<&[String]>,
    ) -> Result<String> {
        debug!("调用生成 API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", user_message.len());
        if let Some(img_urls) = imgs {
            debug!("包含 {} 张参考图", img_urls.len());
        }

        // 构建消息列表
        let mut messages = Vec::new();

        // 添加系统消息（如果提供）
        if let Some(sys_msg) = system_message {
            let system_msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(sys_msg)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(system_msg));
        }

        // 构建用户消息内容（支持参考图）
        let user_msg = if let Some(img_urls) = imgs {
            if !img_urls.is_empty() {
                // 使用 Vision API：构建包含文本和参考图的内容
                let mut content_parts: Vec<ChatCompletionRequestUserMessageContentPart> =
                    Vec::new();

                // 添加文本部分
                content_parts.push(ChatCompletionRequestUserMessageContentPart::Text(
                    ChatCompletionRequestMessageContentPartText {
                        text: user_message.to_string(),
                    },
                ));

                // 添加参考图部分
                for url in img_urls.iter() {
                    content_parts.push(ChatCompletionRequestUserMessageContentPart::ImageUrl(
                        ChatCompletionRequestMessageContentPartImage {
                            image_url: ImageUrl {
                                url: url.clone(),
                                detail: Some(ImageDetail::Auto),
                            },
                        },
                    ));
                }

                debug!("使用 Vision API，包含 {} 张参考图", img_urls.len());

                // 构建包含多部分内容的用户消息
                ChatCompletionRequestUserMessageArgs::default()
                    .content(ChatCompletionRequestUserMessageContent::Array(
                        content_parts,
                    ))
                    .build()?
            } else {
                // 没有参考图，只有文本
                ChatCompletionRequestUserMessageArgs::default()
                    .content(user_message)
                    .build()?
            }
        } else {
            // 没有参考图参数，只有文本
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_message)
                .build()?
        };

        messages.push(ChatCompletionRequestMessage::User(user_msg));

        // 构建请求
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(messages)
            .max_tokens(1024u32)
            .build()?;

        // 调用 API
        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("生成 API 调用失败: {}", e);
            anyhow::anyhow!("生成 API 调用失败: {}", e)
        })?;

        debug!("生成 API 调用成功");

        // 提取响应内容
        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| anyhow::anyhow!("生成 API 返回内容为空"))?;

        Ok(content.trim().to_string())
    }

    /// 下载图片到本地
    ///
    /// # 参数
    /// - `url`: 图片 URL
    /// - `dest`: 目标文件路径（父目录会自动创建）
    pub async fn download(&self, url: &str, dest: &Path) -> Result<()> {
        debug!("下载图片: {} -> {}", url, dest.display());

        let response = self.http.get(url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(dest, &bytes).await?;

        debug!("下载完成: {} 字节", bytes.len());

        Ok(())
    }
}

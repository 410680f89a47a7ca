//! 图片生成服务 - 业务能力层
//!
//! 只负责"生成一张场景图"能力，不关心流程
//!
//! ## 技术栈
//! - 通过基础设施层的 `ImageClient` 调用生成网关
//! - 使用 `regex` 从响应文本中提取图片 URL
//! - 带有限次重试与单次调用超时

use anyhow::Result;
use regex::Regex;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::ImageClient;

/// 图片生成服务
///
/// 职责：
/// - 调用生成接口并从响应中提取图片 URL
/// - 只处理单张图片的生成
/// - 不出现 Vec<AngleSpec>
/// - 不出现 scene_index / angle_index
/// - 不关心流程顺序
pub struct ImageService {
    max_retries: usize,
    timeout_secs: u64,
}

impl ImageService {
    /// 创建新的图片生成服务
    pub fn new(config: &Config) -> Self {
        Self {
            max_retries: 3,
            timeout_secs: config.job_timeout_secs,
        }
    }

    /// 生成一张场景图并返回图片 URL
    ///
    /// 单次调用超过超时时间、调用失败或响应中没有图片链接时，
    /// 会进行有限次重试；全部失败后返回错误。
    ///
    /// # 参数
    /// - `client`: 图片生成客户端
    /// - `user_message`: 提示词
    /// - `system_message`: 系统消息（可选）
    /// - `imgs`: 产品参考图 URL 列表（可选）
    ///
    /// # 返回
    /// 返回生成图片的 URL
    pub async fn generate_image(
        &self,
        client: &ImageClient,
        user_message: &str,
        system_message: Option<&str>,
        imgs: Option<&[String]>,
    ) -> Result<String> {
        let mut last_error = String::new();

        for attempt in 0..self.max_retries {
            let call = client.generate(user_message, system_message, imgs);

            match timeout(Duration::from_secs(self.timeout_secs), call).await {
                // 超时
                Err(_) => {
                    last_error = format!("生成超时 ({}秒)", self.timeout_secs);
                    warn!(
                        "生成超时 (尝试 {}/{}), 超时: {}秒",
                        attempt + 1,
                        self.max_retries,
                        self.timeout_secs
                    );
                }
                // 调用失败
                Ok(Err(e)) => {
                    last_error = e.to_string();
                    warn!(
                        "生成调用失败 (尝试 {}/{}): {}",
                        attempt + 1,
                        self.max_retries,
                        e
                    );
                    sleep(Duration::from_secs(2)).await; // 避免请求过快
                }
                // 调用成功，尝试提取图片 URL
                Ok(Ok(content)) => match self.extract_image_url(&content) {
                    Some(url) => {
                        debug!("提取到图片 URL: {}", url);
                        return Ok(url);
                    }
                    None => {
                        last_error = format!("响应中未找到图片链接: {}", content);
                        warn!(
                            "响应中未找到图片链接 (尝试 {}/{})",
                            attempt + 1,
                            self.max_retries
                        );
                    }
                },
            }
        }

        anyhow::bail!(
            "生成失败，已重试 {} 次，最后错误: {}",
            self.max_retries,
            last_error
        )
    }

    /// 从模型响应中提取图片 URL
    ///
    /// 优先匹配 Markdown 图片语法，其次匹配裸 URL。
    fn extract_image_url(&self, content: &str) -> Option<String> {
        // Markdown 图片语法: ![...](url)
        if let Ok(re) = Regex::new(r"!\[[^\]]*\]\((https?://[^\s)]+)\)") {
            if let Some(caps) = re.captures(content) {
                return Some(caps[1].to_string());
            }
        }

        // 裸 URL
        if let Ok(re) = Regex::new(r#"https?://[^\s"'<>)\]]+"#) {
            if let Some(m) = re.find(content) {
                return Some(m.as_str().to_string());
            }
        }

        None
    }
}

//! 角度处理流程 - 流程层
//!
//! 核心职责：定义"一个角度"的完整处理流程
//!
//! 流程顺序：
//! 1. 构建提示词 → 2. 调用生成 → 3. 下载图片 → 4. 写入清单

use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

use crate::config::Config;
use crate::infrastructure::ImageClient;
use crate::models::scene::{AngleSpec, SceneRequest};
use crate::services::{ImageService, ManifestWriter, PromptService};
use crate::utils::logging::truncate_text;
use crate::workflow::angle_ctx::AngleCtx;

/// 角度处理流程
///
/// - 编排完整的单角度处理流程
/// - 决定何时构建提示词、何时生成、何时落盘
/// - 不持有任何网络资源（client 由调用方传入）
/// - 只依赖业务能力（services）
pub struct AngleFlow {
    prompt_service: PromptService,
    image_service: ImageService,
    manifest_writer: ManifestWriter,
    output_folder: String,
    verbose_logging: bool,
}

impl AngleFlow {
    /// 创建新的角度处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            prompt_service: PromptService::new(),
            image_service: ImageService::new(config),
            manifest_writer: ManifestWriter::new(config),
            output_folder: config.output_folder.clone(),
            verbose_logging: config.verbose_logging,
        }
    }

    /// 处理单个角度，返回生成图片的 URL
    ///
    /// 任何一步失败都会向上返回错误，由任务池记录为该角度的终态。
    pub async fn run(
        &self,
        client: &ImageClient,
        scene: &SceneRequest,
        angle: &AngleSpec,
        ctx: &AngleCtx,
    ) -> Result<String> {
        // ========== 步骤 1: 构建提示词 ==========
        let (user_message, system_message) = self.prompt_service.build(scene, angle);

        if self.verbose_logging {
            info!(
                "[场景 {}] 提示词预览: {}",
                ctx.scene_index,
                truncate_text(&user_message, 80)
            );
        }

        info!(
            "[场景 {}] 🎨 正在生成角度 {} ({})...",
            ctx.scene_index,
            ctx.angle_index,
            angle.display_label()
        );

        // ========== 步骤 2: 调用生成 ==========
        let url = self
            .image_service
            .generate_image(
                client,
                &user_message,
                Some(&system_message),
                scene.product_imgs.as_deref(),
            )
            .await?;

        info!(
            "[场景 {}] ✓ 角度 {} 生成成功: {}",
            ctx.scene_index,
            ctx.angle_index,
            truncate_text(&url, 80)
        );

        // ========== 步骤 3: 下载图片 ==========
        let dest = self.build_output_path(scene, angle);
        client.download(&url, &dest).await?;

        info!(
            "[场景 {}] 💾 已保存: {}",
            ctx.scene_index,
            dest.display()
        );

        // ========== 步骤 4: 写入清单 ==========
        self.manifest_writer
            .write_entry(
                &scene.product_name,
                &angle.id,
                &url,
                &dest.to_string_lossy(),
            )
            .await?;

        Ok(url)
    }

    /// 构建输出文件路径: {output_folder}/{产品名}_{角度ID}.png
    fn build_output_path(&self, scene: &SceneRequest, angle: &AngleSpec) -> PathBuf {
        let file_name = format!(
            "{}_{}.png",
            sanitize_file_name(&scene.product_name),
            sanitize_file_name(&angle.id)
        );
        PathBuf::from(&self.output_folder).join(file_name)
    }
}

/// 将任意字符串转成安全的文件名片段
///
/// 字母、数字、横线、下划线与非 ASCII 字符（如中文）原样保留，
/// 其余字符替换为下划线。
fn sanitize_file_name(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

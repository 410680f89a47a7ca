//! 批量场景处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量场景请求的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、创建图片生成客户端、准备输出目录
//! 2. **批量加载**：扫描并加载所有待处理的场景请求（`Vec<SceneRequest>`）
//! 3. **并发控制**：场景内的角度通过固定并发任务池生成
//! 4. **顺序处理**：场景之间按顺序处理，一个场景结束后再开始下一个
//! 5. **资源管理**：唯一持有 ImageClient，确保生命周期正确
//! 6. **全局统计**：汇总所有场景的生成结果
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个场景的细节
//! - **资源所有者**：唯一持有 ImageClient 的模块
//! - **向下委托**：委托 scene_processor 处理单个场景

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::ImageClient;
use crate::models::scene::SceneRequest;
use crate::runner::scene_processor;
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    client: ImageClient,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        logging::log_startup(&config);

        // 创建图片生成客户端
        let client = ImageClient::new(&config);

        // 确保输出目录存在
        tokio::fs::create_dir_all(&config.output_folder).await?;

        Ok(Self { config, client })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 加载所有待处理的场景请求
        let all_scenes = self.load_scenes().await?;

        if all_scenes.is_empty() {
            warn!("⚠️ 没有找到待处理的场景请求文件，程序结束");
            return Ok(());
        }

        let total_scenes = all_scenes.len();
        logging::log_scenes_loaded(total_scenes, self.config.max_concurrent_jobs);

        // 处理所有场景
        let stats = self.process_all_scenes(all_scenes).await?;

        // 输出最终统计
        logging::print_final_stats(
            stats.generated,
            stats.failed,
            stats.scenes,
            &self.config.output_log_file,
        );

        Ok(())
    }

    /// 加载场景请求
    async fn load_scenes(&self) -> Result<Vec<SceneRequest>> {
        info!("\n📁 正在扫描待处理的场景请求...");
        crate::models::load_all_toml_files(&self.config.scene_folder).await
    }

    /// 处理所有场景
    async fn process_all_scenes(&self, all_scenes: Vec<SceneRequest>) -> Result<ProcessingStats> {
        let total_scenes = all_scenes.len();
        let mut stats = ProcessingStats::default();

        for (idx, scene) in all_scenes.into_iter().enumerate() {
            let scene_index = idx + 1;
            logging::log_scene_banner(scene_index, total_scenes);

            match scene_processor::process_scene(&self.client, scene, scene_index, &self.config)
                .await
            {
                Ok(scene_stats) => {
                    stats.scenes += 1;
                    stats.generated += scene_stats.generated;
                    stats.failed += scene_stats.failed;
                }
                Err(e) => {
                    error!("[场景 {}] ❌ 处理过程中发生错误: {}", scene_index, e);
                    stats.scenes += 1;
                }
            }
        }

        Ok(stats)
    }
}

/// 处理统计
#[derive(Debug, Default)]
struct ProcessingStats {
    scenes: usize,
    generated: usize,
    failed: usize,
}

//! 单个场景处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个场景请求的所有角度，是场景级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **请求校验**：产品名称、角度列表、角度 ID 唯一性
//! 2. **任务组装**：把角度列表变成任务 key 并交给任务池
//! 3. **失败重试**：批次结算后逐个重试失败的角度（可配置）
//! 4. **失败记录**：把仍然失败的角度写入失败记录文件
//! 5. **文件清理**：全部成功后删除已处理的 TOML 文件
//! 6. **统计输出**：记录成功/失败数量

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::ImageClient;
use crate::models::job::JobState;
use crate::models::scene::{AngleSpec, SceneRequest};
use crate::runner::pool::{run_pool, run_single};
use crate::services::ManifestWriter;
use crate::workflow::{AngleCtx, AngleFlow};

/// 角度处理统计
#[derive(Debug, Default)]
pub struct SceneStats {
    pub generated: usize,
    pub failed: usize,
}

/// 处理单个场景请求
///
/// # 参数
/// - `client`: 图片生成客户端
/// - `scene`: 场景请求数据
/// - `scene_index`: 场景索引（用于日志）
/// - `config`: 配置
///
/// # 返回
/// 返回本场景的生成统计
pub async fn process_scene(
    client: &ImageClient,
    scene: SceneRequest,
    scene_index: usize,
    config: &Config,
) -> Result<SceneStats> {
    scene
        .validate()
        .with_context(|| format!("场景请求不合法: {}", scene.product_name))?;

    log_scene_start(scene_index, &scene);

    // 创建流程对象（只创建一次，所有角度复用）
    let flow = Arc::new(AngleFlow::new(config));
    let scene = Arc::new(scene);

    // 角度查找表：key → (角度索引, 角度描述)
    let angles: Arc<HashMap<String, (usize, AngleSpec)>> = Arc::new(
        scene
            .angles
            .iter()
            .enumerate()
            .map(|(idx, angle)| (angle.id.clone(), (idx + 1, angle.clone())))
            .collect(),
    );

    let keys = scene.angle_keys();

    // ========== 把所有角度交给任务池并发生成 ==========
    let process = {
        let flow = flow.clone();
        let client = client.clone();
        let scene = scene.clone();
        let angles = angles.clone();
        move |key: String| {
            generate_one(
                flow.clone(),
                client.clone(),
                scene.clone(),
                angles.clone(),
                scene_index,
                key,
            )
        }
    };

    let on_progress = move |done: usize, total: usize| {
        info!("[场景 {}] 📈 生成进度: {}/{}", scene_index, done, total);
    };

    let mut report = run_pool(keys, config.max_concurrent_jobs, process, on_progress).await?;

    // ========== 逐个重试失败的角度 ==========
    // 重试是独立的单任务操作，不会影响已结算批次的计数
    if config.retry_failed && report.failed() > 0 {
        info!(
            "[场景 {}] 🔁 批次结束，重试 {} 个失败的角度...",
            scene_index,
            report.failed()
        );

        for i in 0..report.jobs.len() {
            if !report.jobs[i].is_error() {
                continue;
            }
            let key = report.jobs[i].key.clone();
            info!("[场景 {}] 🔁 重试角度: {}", scene_index, key);

            let job = run_single(key, |k| {
                generate_one(
                    flow.clone(),
                    client.clone(),
                    scene.clone(),
                    angles.clone(),
                    scene_index,
                    k,
                )
            })
            .await;

            match &job.state {
                JobState::Done(_) => {
                    info!("[场景 {}] ✓ 重试成功: {}", scene_index, job.key)
                }
                JobState::Error(e) => {
                    warn!("[场景 {}] ⚠️ 重试仍然失败: {} ({})", scene_index, job.key, e)
                }
                JobState::Pending => {}
            }
            report.jobs[i] = job;
        }
    }

    // ========== 记录仍然失败的角度 ==========
    let manifest_writer = ManifestWriter::new(config);
    for job in report.failed_jobs() {
        warn!(
            "[场景 {}] ⚠️ 角度 {} 最终失败: {}",
            scene_index,
            job.key,
            job.error().unwrap_or_default()
        );
        manifest_writer
            .write_failed(&scene.product_name, &job.key, job.error().unwrap_or_default())
            .await?;
    }

    let stats = SceneStats {
        generated: report.succeeded(),
        failed: report.failed(),
    };

    // 全部成功才清理请求文件，否则保留以便重新运行
    if stats.failed == 0 {
        cleanup_file(scene.file_path.as_deref(), scene_index)?;
    } else if let Some(file_path) = scene.file_path.as_deref() {
        info!(
            "[场景 {}] 📄 存在失败角度，保留请求文件: {}",
            scene_index, file_path
        );
    }

    log_scene_complete(scene_index, &stats, scene.angles.len());

    Ok(stats)
}

/// 处理单个角度：查找角度描述并委托给 AngleFlow
async fn generate_one(
    flow: Arc<AngleFlow>,
    client: ImageClient,
    scene: Arc<SceneRequest>,
    angles: Arc<HashMap<String, (usize, AngleSpec)>>,
    scene_index: usize,
    key: String,
) -> Result<String> {
    let (angle_index, angle) = angles
        .get(&key)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("未知角度: {}", key))?;

    let ctx = AngleCtx::new(scene.product_name.clone(), scene_index, angle_index, key);

    flow.run(&client, &scene, &angle, &ctx).await
}

/// 清理已处理的文件
fn cleanup_file(file_path: Option<&str>, scene_index: usize) -> Result<()> {
    info!("[场景 {}] 🗑️ 清理已处理的文件...", scene_index);

    if let Some(file_path) = file_path {
        if Path::new(file_path).exists() {
            fs::remove_file(file_path).with_context(|| format!("无法删除文件: {}", file_path))?;
            info!(
                "[场景 {}] ✓ 文件已删除: {}",
                scene_index,
                Path::new(file_path)
                    .file_name()
                    .unwrap_or_default()
                    .to_string_lossy()
            );
        } else {
            warn!("[场景 {}] ⚠️ 文件不存在: {}", scene_index, file_path);
        }
    } else {
        warn!("[场景 {}] ⚠️ 文件路径未设置", scene_index);
    }

    Ok(())
}

// ========== 日志辅助函数 ==========

fn log_scene_start(scene_index: usize, scene: &SceneRequest) {
    info!("[场景 {}] 开始处理", scene_index);
    info!("[场景 {}] 产品: {}", scene_index, scene.product_name);
    if let Some(style) = &scene.style {
        info!("[场景 {}] 风格: {}", scene_index, style);
    }
    info!("[场景 {}] 角度总数: {}", scene_index, scene.angles.len());
}

fn log_scene_complete(scene_index: usize, stats: &SceneStats, total: usize) {
    info!(
        "[场景 {}] 角度统计: 成功 {}, 失败 {}, 总计 {}",
        scene_index, stats.generated, stats.failed, total
    );
    info!("\n[场景 {}] ✅ 场景处理完成\n", scene_index);
}

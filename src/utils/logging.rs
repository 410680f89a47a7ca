/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing 日志
///
/// 日志级别可通过 RUST_LOG 环境变量覆盖，默认 info。
/// 重复调用是安全的（测试中会多次初始化）。
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
///
/// # 返回
/// 返回是否成功初始化
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n场景生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 批量场景图生成模式");
    info!("📊 最大并发数: {}", config.max_concurrent_jobs);
    info!("🤖 生成模型: {}", config.gen_model_name);
    info!("{}", "=".repeat(60));
}

/// 记录场景加载信息
///
/// # 参数
/// - `total`: 场景总数
/// - `max_concurrent`: 最大并发数
pub fn log_scenes_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的场景请求", total);
    info!("📋 每个场景内的角度将以并发 {} 的方式生成", max_concurrent);
    info!("💡 场景之间按顺序处理\n");
}

/// 记录场景开始信息
///
/// # 参数
/// - `scene_index`: 场景编号
/// - `total`: 场景总数
pub fn log_scene_banner(scene_index: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 个场景", scene_index, total);
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `generated`: 成功生成的图片数量
/// - `failed`: 失败的角度数量
/// - `scenes`: 处理的场景数量
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(generated: usize, failed: usize, scenes: usize, log_file_path: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📦 场景数: {}", scenes);
    info!("✅ 生成成功: {}", generated);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path);
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

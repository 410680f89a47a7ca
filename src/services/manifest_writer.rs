//! 清单写入服务 - 业务能力层
//!
//! 只负责"写结果清单 / 失败记录"能力，不关心流程

use anyhow::Result;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::config::Config;

/// 清单写入服务
///
/// 职责：
/// - 将成功结果追加到清单文件（JSON Lines，一行一条）
/// - 将失败的角度追加到失败记录文件
/// - 只处理单个角度的记录
/// - 不出现 Vec<AngleSpec>
/// - 不关心流程顺序
pub struct ManifestWriter {
    manifest_path: String,
    failed_path: String,
}

impl ManifestWriter {
    /// 创建新的清单写入服务
    pub fn new(config: &Config) -> Self {
        Self {
            manifest_path: config.manifest_file.clone(),
            failed_path: config.failed_file.clone(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_paths(manifest_path: impl Into<String>, failed_path: impl Into<String>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            failed_path: failed_path.into(),
        }
    }

    /// 追加一条成功记录
    ///
    /// # 参数
    /// - `product_name`: 产品名称
    /// - `angle_id`: 角度 ID
    /// - `url`: 生成图片的 URL
    /// - `local_path`: 本地保存路径
    pub async fn write_entry(
        &self,
        product_name: &str,
        angle_id: &str,
        url: &str,
        local_path: &str,
    ) -> Result<()> {
        debug!(
            "写入清单: 产品 {} | 角度 {} | {}",
            product_name, angle_id, local_path
        );

        let entry = serde_json::json!({
            "product": product_name,
            "angle": angle_id,
            "url": url,
            "path": local_path,
            "time": chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.manifest_path)?;

        file.write_all(format!("{}\n", entry).as_bytes())?;

        Ok(())
    }

    /// 追加一条失败记录
    ///
    /// # 参数
    /// - `product_name`: 产品名称
    /// - `angle_id`: 角度 ID
    /// - `reason`: 失败原因
    pub async fn write_failed(
        &self,
        product_name: &str,
        angle_id: &str,
        reason: &str,
    ) -> Result<()> {
        debug!(
            "写入失败记录: 产品 {} | 角度 {} | 原因: {}",
            product_name, angle_id, reason
        );

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.failed_path)?;

        let msg = format!("产品 {} | 角度 {} | 原因: {}\n", product_name, angle_id, reason);

        file.write_all(msg.as_bytes())?;

        Ok(())
    }
}

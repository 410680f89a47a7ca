use crate::error::{AppError, BusinessError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 单个角度的描述
///
/// TOML 中既可以写成预设 ID 字符串（`angles = ["front-studio"]`），
/// 也可以写成完整的表（`[[angles]]` + `id` / `label` / `hint`）。
#[derive(Debug, Clone, Serialize)]
pub struct AngleSpec {
    /// 角度 ID（任务 key，场景内唯一）
    pub id: String,
    /// 显示名称（可选，默认取预设名称或 ID）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// 自定义提示词片段（可选，覆盖预设片段）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl AngleSpec {
    /// 仅用预设 ID 构建角度
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            hint: None,
        }
    }

    /// 获取显示名称：自定义名称 > 预设名称 > ID
    pub fn display_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }
        match crate::models::angle::AnglePreset::from_id(&self.id) {
            Some(preset) => preset.label().to_string(),
            None => self.id.clone(),
        }
    }
}

// Helper to deserialize an angle as either a bare id string or a full table
impl<'de> Deserialize<'de> for AngleSpec {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{MapAccess, Visitor};
        use std::fmt;

        #[derive(Deserialize)]
        struct AngleTable {
            id: String,
            #[serde(default)]
            label: Option<String>,
            #[serde(default)]
            hint: Option<String>,
        }

        struct AngleVisitor;

        impl<'de> Visitor<'de> for AngleVisitor {
            type Value = AngleSpec;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an angle id string or an angle table")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(AngleSpec::from_id(value))
            }

            fn visit_map<M>(self, map: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let table =
                    AngleTable::deserialize(serde::de::value::MapAccessDeserializer::new(map))?;
                Ok(AngleSpec {
                    id: table.id,
                    label: table.label,
                    hint: table.hint,
                })
            }
        }

        deserializer.deserialize_any(AngleVisitor)
    }
}

/// 场景请求
///
/// 一个 TOML 文件对应一个产品的一批角度，
/// 是批量生成的基本单位。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneRequest {
    /// 产品名称
    pub product_name: String,
    /// 产品描述（用于提示词）
    #[serde(default)]
    pub description: String,
    /// 整体风格（可选）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// 产品参考图 URL 列表（可选，作为生成的图片输入）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_imgs: Option<Vec<String>>,
    /// 角度列表
    pub angles: Vec<AngleSpec>,
    #[serde(skip_serializing, skip_deserializing)]
    pub file_path: Option<String>,
}

impl SceneRequest {
    /// 校验场景请求
    ///
    /// 规则：
    /// - 产品名称不能为空
    /// - 角度列表不能为空
    /// - 角度 ID 在场景内必须唯一（ID 是任务 key，也是输出文件名）
    pub fn validate(&self) -> Result<(), AppError> {
        if self.product_name.trim().is_empty() {
            return Err(AppError::Business(BusinessError::EmptyProductName));
        }
        if self.angles.is_empty() {
            return Err(AppError::Business(BusinessError::EmptyAngleList));
        }

        let mut seen = HashSet::with_capacity(self.angles.len());
        for angle in &self.angles {
            if !seen.insert(angle.id.as_str()) {
                return Err(AppError::Business(BusinessError::DuplicateAngleId {
                    id: angle.id.clone(),
                }));
            }
        }

        Ok(())
    }

    /// 角度任务 key 列表（顺序与 TOML 中一致）
    pub fn angle_keys(&self) -> Vec<String> {
        self.angles.iter().map(|a| a.id.clone()).collect()
    }

    /// 设置来源文件路径
    pub fn with_file_path(mut self, file_path: String) -> Self {
        self.file_path = Some(file_path);
        self
    }
}

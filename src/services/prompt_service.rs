//! 提示词服务 - 业务能力层
//!
//! 只负责"构建生成提示词"能力，不关心流程

use crate::models::angle::AnglePreset;
use crate::models::scene::{AngleSpec, SceneRequest};
use crate::models::style::Style;

/// 提示词服务
///
/// 职责：
/// - 将产品信息、风格与角度组合成完整的生成提示词
/// - 只处理单个角度
/// - 不出现 Vec<AngleSpec>
/// - 不关心流程顺序
pub struct PromptService;

impl PromptService {
    /// 创建新的提示词服务
    pub fn new() -> Self {
        Self
    }

    /// 构建单个角度的生成提示词
    ///
    /// # 参数
    /// - `scene`: 场景请求（产品信息、风格、参考图）
    /// - `angle`: 当前角度
    ///
    /// # 返回
    /// 返回 (user_message, system_message)
    pub fn build(&self, scene: &SceneRequest, angle: &AngleSpec) -> (String, String) {
        // 构建系统消息
        let system_message = "你是一个专业的电商产品场景图生成助手，擅长根据产品信息和\
                             镜头描述生成高质量的商品展示图。\
                             生成完成后，在回复中给出生成图片的链接。"
            .to_string();

        // 风格片段（可选）
        let style_fragment = scene
            .style
            .as_deref()
            .and_then(Style::find)
            .map(|s| s.fragment().to_string())
            .unwrap_or_else(|| scene.style.clone().unwrap_or_default());

        // 角度片段：自定义提示词 > 预设片段 > 角度 ID 本身
        let angle_fragment = self.angle_fragment(angle);

        // 参考图说明
        let img_info = match scene.product_imgs.as_deref() {
            Some(imgs) if !imgs.is_empty() => format!(
                "已附带 {} 张产品参考图，生成的场景图必须保持产品外观与参考图一致。",
                imgs.len()
            ),
            _ => "没有产品参考图，请根据产品名称和描述生成。".to_string(),
        };

        // 构建用户消息
        let user_message = format!(
            r#"请为下面的产品生成一张电商场景展示图。

【重要说明】
- 场景图用于电商详情页，必须突出产品本身
- 不要在图片中添加任何文字或水印
- {}

产品名称：{}
产品描述：{}
整体风格：{}

镜头与场景要求：
{}

生成完成后只返回图片链接，不要返回任何其他内容。"#,
            img_info,
            scene.product_name,
            if scene.description.is_empty() {
                "（无）"
            } else {
                scene.description.as_str()
            },
            if style_fragment.is_empty() {
                "（默认）"
            } else {
                style_fragment.as_str()
            },
            angle_fragment
        );

        (user_message, system_message)
    }

    /// 获取角度的提示词片段
    fn angle_fragment(&self, angle: &AngleSpec) -> String {
        if let Some(hint) = &angle.hint {
            return hint.clone();
        }
        match AnglePreset::from_id(&angle.id) {
            Some(preset) => preset.hint().to_string(),
            None => format!("镜头角度：{}", angle.display_label()),
        }
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> SceneRequest {
        SceneRequest {
            product_name: "便携咖啡杯".to_string(),
            description: "316 不锈钢内胆，双层隔热".to_string(),
            style: Some("极简".to_string()),
            product_imgs: Some(vec!["https://img.dsboard.io/p/cup.png".to_string()]),
            angles: vec![AngleSpec::from_id("front-studio")],
            file_path: None,
        }
    }

    #[test]
    fn test_build_contains_product_and_angle() {
        let service = PromptService::new();
        let scene = sample_scene();

        let (user_message, system_message) = service.build(&scene, &scene.angles[0]);

        assert!(user_message.contains("便携咖啡杯"));
        assert!(user_message.contains("316 不锈钢内胆"));
        // 预设角度应展开成完整的镜头描述
        assert!(user_message.contains("摄影棚"));
        // 风格片段应被解析并展开
        assert!(user_message.contains("极简风格"));
        assert!(!system_message.is_empty());
    }

    #[test]
    fn test_custom_hint_overrides_preset() {
        let service = PromptService::new();
        let mut scene = sample_scene();
        scene.angles[0].hint = Some("放在木质书桌上，旁边有一本打开的书".to_string());

        let (user_message, _) = service.build(&scene, &scene.angles[0]);

        assert!(user_message.contains("木质书桌"));
        assert!(!user_message.contains("摄影棚"));
    }

    #[test]
    fn test_unknown_preset_uses_label() {
        let service = PromptService::new();
        let mut scene = sample_scene();
        scene.angles = vec![AngleSpec::from_id("my-own-angle")];

        let (user_message, _) = service.build(&scene, &scene.angles[0]);

        assert!(user_message.contains("my-own-angle"));
    }

    #[test]
    fn test_reference_image_note() {
        let service = PromptService::new();
        let mut scene = sample_scene();

        let (with_imgs, _) = service.build(&scene, &scene.angles[0].clone());
        assert!(with_imgs.contains("1 张产品参考图"));

        scene.product_imgs = None;
        let (without_imgs, _) = service.build(&scene, &scene.angles[0]);
        assert!(without_imgs.contains("没有产品参考图"));
    }
}

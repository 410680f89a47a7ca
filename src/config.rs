/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// 同时生成的图片数量
    pub max_concurrent_jobs: usize,
    /// 场景请求文件存放目录
    pub scene_folder: String,
    /// 生成图片输出目录
    pub output_folder: String,
    /// 生成结果清单文件（JSON Lines）
    pub manifest_file: String,
    /// 失败记录文件
    pub failed_file: String,
    /// 批次结束后是否逐个重试失败的角度
    pub retry_failed: bool,
    /// 单次生成调用的超时时间（秒）
    pub job_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    // --- 图片生成 API 配置 ---
    pub gen_api_key: String,
    pub gen_api_base_url: String,
    pub gen_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 3,
            scene_folder: "scene_requests".to_string(),
            output_folder: "output_images".to_string(),
            manifest_file: "manifest.jsonl".to_string(),
            failed_file: "failed.txt".to_string(),
            retry_failed: true,
            job_timeout_secs: 120,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            gen_api_key: "dev-local-key".to_string(),
            gen_api_base_url: "http://ai-gateway.dsboard.local/v1".to_string(),
            gen_model_name: "gemini-2.5-flash-image".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            max_concurrent_jobs: std::env::var("MAX_CONCURRENT_JOBS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_jobs),
            scene_folder: std::env::var("SCENE_FOLDER").unwrap_or(default.scene_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            manifest_file: std::env::var("MANIFEST_FILE").unwrap_or(default.manifest_file),
            failed_file: std::env::var("FAILED_FILE").unwrap_or(default.failed_file),
            retry_failed: std::env::var("RETRY_FAILED").ok().and_then(|v| v.parse().ok()).unwrap_or(default.retry_failed),
            job_timeout_secs: std::env::var("JOB_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.job_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            gen_api_key: std::env::var("GEN_API_KEY").unwrap_or(default.gen_api_key),
            gen_api_base_url: std::env::var("GEN_API_BASE_URL").unwrap_or(default.gen_api_base_url),
            gen_model_name: std::env::var("GEN_MODEL_NAME").unwrap_or(default.gen_model_name),
        }
    }
}

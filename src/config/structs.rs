use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// 存储后端类型
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackendKind {
    #[default]
    File,
    Memory,
}

impl StorageBackendKind {
    /// 所有可用后端名称，用于错误提示
    pub fn available() -> Vec<&'static str> {
        Self::iter().map(<&'static str>::from).collect()
    }
}

/// 应用配置（从 TOML 加载，启动时使用）
///
/// 包含：
/// - server: HTTP 监听地址与对外链接前缀
/// - storage: 链接表的持久化位置
/// - links: 短码生成与海报模板
/// - suggester: 元数据生成服务
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub links: LinksConfig,
    #[serde(default)]
    pub suggester: SuggesterConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：RL，分隔符：__
    /// 示例：RL__SERVER__PORT=9999
    pub fn load(path: Option<&str>) -> Self {
        use config::{Config, Environment, File};

        let path = path.unwrap_or("config.toml");

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::with_name(path).required(false))
            // 2. 从环境变量覆盖，前缀 RL，分隔符 __
            .add_source(
                Environment::with_prefix("RL")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<AppConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        };

        config.suggester.apply_env_api_key();
        config
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// 生成分享链接时使用的前缀，例如 `https://reel.example/`
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 后端名称：file / memory
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// 链接表所在的存储槽位名
    #[serde(default = "default_slot")]
    pub slot: String,
}

/// 短链接生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_code_length")]
    pub code_length: usize,
    #[serde(default = "default_code_charset")]
    pub code_charset: String,
    #[serde(default = "default_max_code_attempts")]
    pub max_code_attempts: usize,
    /// `{seed}` 会被替换为随机种子
    #[serde(default = "default_poster_template")]
    pub poster_template: String,
}

/// 元数据生成服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggesterConfig {
    /// 为空时使用静态回退值，不发起网络请求
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl StorageConfig {
    /// 解析后端名称，未知名称返回 `StoragePluginNotFound`
    pub fn backend_kind(&self) -> crate::errors::Result<StorageBackendKind> {
        self.backend.trim().parse().map_err(|_| {
            crate::errors::ReelinkError::storage_plugin_not_found(format!(
                "Unknown storage backend '{}'. Available: {}",
                self.backend,
                StorageBackendKind::available().join(", ")
            ))
        })
    }
}

impl SuggesterConfig {
    /// 配置文件未给出 key 时，兼容 GEMINI_API_KEY / API_KEY
    fn apply_env_api_key(&mut self) {
        if !self.api_key.is_empty() {
            return;
        }
        if let Some(key) = ["GEMINI_API_KEY", "API_KEY"]
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.is_empty()))
        {
            self.api_key = key;
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_base_url() -> String {
    "http://127.0.0.1:8080/".to_string()
}

fn default_storage_backend() -> String {
    StorageBackendKind::default().to_string()
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_slot() -> String {
    "netflix_links".to_string()
}

fn default_code_length() -> usize {
    6
}

fn default_code_charset() -> String {
    "abcdefghijklmnopqrstuvwxyz0123456789".to_string()
}

fn default_max_code_attempts() -> usize {
    16
}

fn default_poster_template() -> String {
    "https://picsum.photos/seed/{seed}/600/900".to_string()
}

fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            base_url: default_base_url(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            data_dir: default_data_dir(),
            slot: default_slot(),
        }
    }
}

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            code_length: default_code_length(),
            code_charset: default_code_charset(),
            max_code_attempts: default_max_code_attempts(),
            poster_template: default_poster_template(),
        }
    }
}

impl Default for SuggesterConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

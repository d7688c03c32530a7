use std::fmt;

#[derive(Debug, Clone)]
pub enum ReelinkError {
    Validation(String),
    AliasConflict(String),
    CodeSpaceExhausted(String),
    StorageRead(String),
    StorageWrite(String),
    Serialization(String),
    StoragePluginNotFound(String),
    Suggester(String),
    Config(String),
    NotFound(String),
}

impl ReelinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ReelinkError::Validation(_) => "E001",
            ReelinkError::AliasConflict(_) => "E002",
            ReelinkError::CodeSpaceExhausted(_) => "E003",
            ReelinkError::StorageRead(_) => "E004",
            ReelinkError::StorageWrite(_) => "E005",
            ReelinkError::Serialization(_) => "E006",
            ReelinkError::StoragePluginNotFound(_) => "E007",
            ReelinkError::Suggester(_) => "E008",
            ReelinkError::Config(_) => "E009",
            ReelinkError::NotFound(_) => "E010",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ReelinkError::Validation(_) => "Validation Error",
            ReelinkError::AliasConflict(_) => "Alias Conflict",
            ReelinkError::CodeSpaceExhausted(_) => "Code Space Exhausted",
            ReelinkError::StorageRead(_) => "Storage Read Error",
            ReelinkError::StorageWrite(_) => "Storage Write Error",
            ReelinkError::Serialization(_) => "Serialization Error",
            ReelinkError::StoragePluginNotFound(_) => "Storage Plugin Not Found",
            ReelinkError::Suggester(_) => "Metadata Suggester Error",
            ReelinkError::Config(_) => "Configuration Error",
            ReelinkError::NotFound(_) => "Resource Not Found",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ReelinkError::Validation(msg)
            | ReelinkError::AliasConflict(msg)
            | ReelinkError::CodeSpaceExhausted(msg)
            | ReelinkError::StorageRead(msg)
            | ReelinkError::StorageWrite(msg)
            | ReelinkError::Serialization(msg)
            | ReelinkError::StoragePluginNotFound(msg)
            | ReelinkError::Suggester(msg)
            | ReelinkError::Config(msg)
            | ReelinkError::NotFound(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for ReelinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ReelinkError {}

// 便捷的构造函数
impl ReelinkError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        ReelinkError::Validation(msg.into())
    }

    pub fn alias_conflict<T: Into<String>>(msg: T) -> Self {
        ReelinkError::AliasConflict(msg.into())
    }

    pub fn code_space_exhausted<T: Into<String>>(msg: T) -> Self {
        ReelinkError::CodeSpaceExhausted(msg.into())
    }

    pub fn storage_read<T: Into<String>>(msg: T) -> Self {
        ReelinkError::StorageRead(msg.into())
    }

    pub fn storage_write<T: Into<String>>(msg: T) -> Self {
        ReelinkError::StorageWrite(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ReelinkError::Serialization(msg.into())
    }

    pub fn storage_plugin_not_found<T: Into<String>>(msg: T) -> Self {
        ReelinkError::StoragePluginNotFound(msg.into())
    }

    pub fn suggester<T: Into<String>>(msg: T) -> Self {
        ReelinkError::Suggester(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        ReelinkError::Config(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        ReelinkError::NotFound(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<std::io::Error> for ReelinkError {
    fn from(err: std::io::Error) -> Self {
        ReelinkError::StorageWrite(err.to_string())
    }
}

impl From<serde_json::Error> for ReelinkError {
    fn from(err: serde_json::Error) -> Self {
        ReelinkError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReelinkError>;

//! 目标 URL 校验
//!
//! 只接受 http(s)，拒绝可在浏览器中执行脚本的协议

use url::Url;

use crate::errors::ReelinkError;

#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::MissingHost => write!(f, "URL has no host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

impl From<UrlValidationError> for ReelinkError {
    fn from(err: UrlValidationError) -> Self {
        ReelinkError::validation(err.to_string())
    }
}

const DANGEROUS_PROTOCOLS: &[&str] = &[
    "javascript:",
    "data:",
    "file:",
    "vbscript:",
    "about:",
    "blob:",
];

/// 没有协议头的输入，例如 `example.com/a` 或 `localhost:8080`
fn is_scheme_less(url: &str) -> bool {
    let head = url.split(['/', '?', '#']).next().unwrap_or(url);
    match head.split_once(':') {
        None => true,
        // host:port
        Some((host, port)) => {
            !host.is_empty() && !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

/// 校验 URL，返回去掉首尾空白后的结果
///
/// 没有协议头的输入补上 `https://`。
pub fn validate_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_ascii_lowercase();

    if let Some(proto) = DANGEROUS_PROTOCOLS
        .iter()
        .find(|proto| url_lower.starts_with(**proto))
    {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    let url = if is_scheme_less(url) {
        format!("https://{}", url)
    } else if url_lower.starts_with("http://") || url_lower.starts_with("https://") {
        url.to_string()
    } else {
        let scheme = url_lower.split(':').next().unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(format!("{}:", scheme)));
    };

    let parsed = Url::parse(&url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

pub mod url_validator;

use std::iter;

use crate::errors::{ReelinkError, Result};

/// 别名最大长度
pub const MAX_ALIAS_LENGTH: usize = 64;

/// 短码生成器
///
/// 保证输出长度固定、字符全部来自给定字符集。
/// 是否与已有短码冲突由调用方检查。
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    length: usize,
    charset: Vec<u8>,
}

impl CodeGenerator {
    pub fn new(length: usize, charset: &str) -> Result<Self> {
        if length == 0 {
            return Err(ReelinkError::config("Short code length must be at least 1"));
        }
        if charset.is_empty() || !charset.is_ascii() {
            return Err(ReelinkError::config(
                "Short code charset must be a non-empty ASCII string",
            ));
        }

        let mut bytes = charset.as_bytes().to_vec();
        bytes.sort_unstable();
        bytes.dedup();
        if bytes.iter().any(|b| !is_alias_byte(*b)) {
            return Err(ReelinkError::config(format!(
                "Short code charset '{}' contains characters outside [A-Za-z0-9_.-]",
                charset
            )));
        }

        Ok(Self {
            length,
            charset: bytes,
        })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn generate(&self) -> String {
        iter::repeat_with(|| self.charset[rand::random_range(0..self.charset.len())] as char)
            .take(self.length)
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            length: 6,
            charset: b"0123456789abcdefghijklmnopqrstuvwxyz".to_vec(),
        }
    }
}

#[inline]
fn is_alias_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.')
}

/// 校验别名：1..=64 个 `[A-Za-z0-9_.-]` 字符
pub fn is_valid_alias(alias: &str) -> bool {
    !alias.is_empty() && alias.len() <= MAX_ALIAS_LENGTH && alias.bytes().all(is_alias_byte)
}

/// 规范化路由键
///
/// 去掉首尾空白和一个结尾的 `/`，若仍包含路径分隔符则只保留最后一段。
/// 托管环境有时会把整段子路径塞进 `c` 参数里。
pub fn normalize_route_key(raw: &str) -> &str {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// 生成分享链接：`<base>?c=<key>`
pub fn build_share_url(base: &str, key: &str) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}c={}", base, separator, urlencoding::encode(key))
}

/// 截断到指定字符数（按 char 计，不会切断多字节字符）
pub fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generator_respects_length_and_charset() {
        let generator = CodeGenerator::new(8, "abc").unwrap();
        for _ in 0..100 {
            let code = generator.generate();
            assert_eq!(code.len(), 8);
            assert!(code.chars().all(|c| "abc".contains(c)));
        }
    }

    #[test]
    fn test_generator_rejects_bad_settings() {
        assert!(CodeGenerator::new(0, "abc").is_err());
        assert!(CodeGenerator::new(6, "").is_err());
        assert!(CodeGenerator::new(6, "ab/").is_err());
        assert!(CodeGenerator::new(6, "äb").is_err());
    }

    #[test]
    fn test_default_generator_spreads() {
        let generator = CodeGenerator::default();
        let codes: HashSet<String> = (0..200).map(|_| generator.generate()).collect();
        // 36^6 的空间里 200 次抽样几乎不可能大量重复
        assert!(codes.len() > 190);
    }

    #[test]
    fn test_normalize_route_key() {
        assert_eq!(normalize_route_key("abc123"), "abc123");
        assert_eq!(normalize_route_key("abc123/"), "abc123");
        assert_eq!(normalize_route_key("app/sub/abc123"), "abc123");
        assert_eq!(normalize_route_key("app/sub/abc123/"), "abc123");
        assert_eq!(normalize_route_key("  pipoca-play "), "pipoca-play");
        assert_eq!(normalize_route_key("/"), "");
        assert_eq!(normalize_route_key(""), "");
    }

    #[test]
    fn test_is_valid_alias() {
        assert!(is_valid_alias("pipoca-play"));
        assert!(is_valid_alias("link_vip.2"));
        assert!(!is_valid_alias(""));
        assert!(!is_valid_alias("with space"));
        assert!(!is_valid_alias("a/b"));
        assert!(!is_valid_alias(&"x".repeat(MAX_ALIAS_LENGTH + 1)));
    }

    #[test]
    fn test_build_share_url() {
        assert_eq!(
            build_share_url("https://reel.example/", "abc123"),
            "https://reel.example/?c=abc123"
        );
        assert_eq!(
            build_share_url("https://reel.example/app?lang=pt", "link vip"),
            "https://reel.example/app?lang=pt&c=link%20vip"
        );
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Lançamento", 4), "Lanç");
        assert_eq!(truncate_chars("curto", 25), "curto");
    }
}

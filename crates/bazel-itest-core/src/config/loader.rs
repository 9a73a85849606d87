//! 统一环境变量加载逻辑
//!
//! 空值与布尔解析规则集中在这里，业务代码只调用这些辅助函数。

use std::env;

/// 读取环境变量，未设置或为空时使用默认值
pub fn env_or<F>(key: &str, default: F) -> String
where
    F: FnOnce() -> String,
{
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(default)
}

/// 读取环境变量，返回 Option（空值视为未设置）
pub fn env_optional(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|s| {
            let s = s.trim().to_string();
            if s.is_empty() {
                None
            } else {
                Some(s)
            }
        })
}

/// 解析布尔型环境变量：1/true/yes 为 true，0/false/no/off 为 false
pub fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key).ok().as_deref() {
        Some(s) => parse_bool(s),
        None => default,
    }
}

/// 存在且非空即为 true（`VERBOSE_LOGS` 的语义：任何值都算开启）
pub fn env_flag(key: &str) -> bool {
    env::var_os(key).is_some_and(|v| !v.is_empty())
}

fn parse_bool(s: &str) -> bool {
    !matches!(
        s.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

//! IP 地址处理工具
//!
//! 提供：
//! - IP 字面量格式校验（拒绝 CIDR 后缀与空串）
//! - X-Forwarded-For 解析（取第一个地址，去掉端口）
//! - 私有地址检测

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;

pub const FORWARDED_FOR_HEADER: &str = "x-forwarded-for";

/// Dotted-quad IPv4 or colon-hex IPv6 literal, nothing else.
pub fn is_valid_ip_literal(candidate: &str) -> bool {
    !candidate.is_empty() && candidate.parse::<IpAddr>().is_ok()
}

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            // - fc00::/7 (ULA, RFC 4193)
            // - fe80::/10 (Link-local)
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// 清洗 X-Forwarded-For 的值
///
/// Takes the first entry of a comma separated list and strips a port suffix
/// (`1.2.3.4:8080`, `[2001:db8::1]:443`) or bare brackets. Entries without a
/// port are returned verbatim so the caller can echo what the client sent.
pub fn clean_forwarded_ip(raw: &str) -> Option<String> {
    let first = raw.split(',').next()?.trim();
    if first.is_empty() {
        return None;
    }

    if let Ok(socket_addr) = first.parse::<SocketAddr>() {
        return Some(socket_addr.ip().to_string());
    }

    if let Some(inner) = first.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return Some(inner.to_string());
    }

    Some(first.to_string())
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get(FORWARDED_FOR_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(clean_forwarded_ip)
}

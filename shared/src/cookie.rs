//! Cookie 读写工具
//!
//! 边缘网关从 `Cookie` 请求头读取令牌，前端会话把令牌镜像写入同名 cookie。

use std::borrow::Cow;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// 令牌 cookie 名称
pub const TOKEN_COOKIE: &str = "token";

/// cookie 值中不能原样出现的字符
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'%')
    .add(b',')
    .add(b';')
    .add(b'\\');

/// 从 `Cookie` 头中读取指定名称的值并解码
///
/// 空值视为不存在；同名 cookie 取第一个非空值。
pub fn find<'a>(header: &'a str, name: &str) -> Option<Cow<'a, str>> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
        .find(|value| !value.is_empty())
        .map(|value| percent_decode_str(value).decode_utf8_lossy())
}

/// 写入 cookie 的字符串（用于 `document.cookie`）
pub fn set(name: &str, value: &str) -> String {
    format!(
        "{}={}; Path=/; SameSite=Lax",
        name,
        utf8_percent_encode(value, COOKIE_VALUE)
    )
}

/// 清除 cookie 的字符串
pub fn clear(name: &str) -> String {
    format!("{}=; Path=/; Max-Age=0; SameSite=Lax", name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_token_among_others() {
        let header = "theme=dark; token=abc.def; lang=pt-BR";
        assert_eq!(find(header, TOKEN_COOKIE).as_deref(), Some("abc.def"));
        assert_eq!(find(header, "lang").as_deref(), Some("pt-BR"));
    }

    #[test]
    fn test_find_missing_or_empty() {
        assert_eq!(find("theme=dark", TOKEN_COOKIE), None);
        assert_eq!(find("token=; theme=dark", TOKEN_COOKIE), None);
        assert_eq!(find("", TOKEN_COOKIE), None);
    }

    #[test]
    fn test_find_does_not_match_name_suffix() {
        assert_eq!(find("csrftoken=xyz", TOKEN_COOKIE), None);
    }

    #[test]
    fn test_find_keeps_equals_in_value() {
        assert_eq!(find("token=a=b==", TOKEN_COOKIE).as_deref(), Some("a=b=="));
    }

    #[test]
    fn test_set_and_clear_strings() {
        assert_eq!(set("token", "abc"), "token=abc; Path=/; SameSite=Lax");
        assert!(clear("token").contains("Max-Age=0"));
    }

    #[test]
    fn test_separator_in_token_survives_round_trip() {
        let written = set(TOKEN_COOKIE, "a;b c%d");
        assert_eq!(written, "token=a%3Bb%20c%25d; Path=/; SameSite=Lax");

        // 浏览器回传时只带 name=value 部分
        let header = written.split("; Path").next().unwrap_or_default();
        assert_eq!(find(header, TOKEN_COOKIE).as_deref(), Some("a;b c%d"));
    }

    #[test]
    fn test_empty_duplicate_is_skipped() {
        assert_eq!(
            find("token=; token=abc", TOKEN_COOKIE).as_deref(),
            Some("abc")
        );
        assert_eq!(find("token=; token=", TOKEN_COOKIE), None);
    }

    #[test]
    fn test_jwt_characters_are_not_encoded() {
        let jwt = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiIxIn0.sig-_x";
        assert_eq!(set(TOKEN_COOKIE, jwt), format!("token={}; Path=/; SameSite=Lax", jwt));
    }
}

//! document.cookie 封装模块
//!
//! 令牌镜像到请求 cookie 后，边缘网关才能在页面加载前看到它。

use clinica_shared::cookie::{self, TOKEN_COOKIE};
use wasm_bindgen::JsCast;

use crate::session::CookieJar;

/// 浏览器 cookie 存储
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookie;

impl DocumentCookie {
    fn document() -> Option<web_sys::HtmlDocument> {
        web_sys::window()?.document()?.dyn_into().ok()
    }

    fn raw() -> Option<String> {
        Self::document()?.cookie().ok()
    }

    fn write(value: &str) {
        if let Some(doc) = Self::document() {
            let _ = doc.set_cookie(value);
        }
    }
}

impl CookieJar for DocumentCookie {
    fn token(&self) -> Option<String> {
        let raw = Self::raw()?;
        cookie::find(&raw, TOKEN_COOKIE).map(|token| token.into_owned())
    }

    fn set_token(&self, token: &str) {
        Self::write(&cookie::set(TOKEN_COOKIE, token));
    }

    fn clear_token(&self) {
        Self::write(&cookie::clear(TOKEN_COOKIE));
    }
}

//! 激活码弹窗上下文
//!
//! 由拥有该弹窗的子树创建并向下传递；子树卸载时随之销毁，不做持久化。
//! 在作用域之外访问属于接线错误，必须立即失败。

use std::fmt;

use leptos::prelude::*;

/// 激活弹窗开关
#[derive(Debug, Clone, Copy)]
pub struct ActivationModal {
    open: RwSignal<bool>,
}

impl ActivationModal {
    fn new() -> Self {
        Self {
            open: RwSignal::new(false),
        }
    }

    pub fn open(&self) {
        self.open.set(true);
    }

    pub fn close(&self) {
        self.open.set(false);
    }

    /// 响应式读取
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn is_open_untracked(&self) -> bool {
        self.open.get_untracked()
    }
}

/// 在 ActivationModal 作用域之外访问
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivationScopeError;

impl fmt::Display for ActivationScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ActivationModal accessed outside of its provider scope")
    }
}

impl std::error::Error for ActivationScopeError {}

/// 在当前子树中创建弹窗开关
pub fn provide_activation_modal() -> ActivationModal {
    let modal = ActivationModal::new();
    provide_context(modal);
    modal
}

pub fn try_use_activation_modal() -> Result<ActivationModal, ActivationScopeError> {
    use_context::<ActivationModal>().ok_or(ActivationScopeError)
}

/// # Panics
/// 在 [`provide_activation_modal`] 的作用域之外调用时 panic。
pub fn use_activation_modal() -> ActivationModal {
    match try_use_activation_modal() {
        Ok(modal) => modal,
        Err(e) => panic!("{}", e),
    }
}

//! 授权决策服务
//!
//! 边缘网关与页面内守卫共用这里的决策函数，两层的判断因此不会各自漂移。
//! 所有函数都是纯函数：输入路径与凭据，输出放行或重定向目标。

use std::fmt;

use crate::role::{Resolution, Role};
use crate::route::{RouteClass, RouteTable};

/// 重定向目标（与页面路由的约定）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Redirect {
    Login,
    AdminLogin,
    Dashboard,
    Plans,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::AdminLogin => "/admin/login",
            Self::Dashboard => "/dashboard/insights",
            Self::Plans => "/planos",
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// 单次导航的决策
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Proceed,
    Redirect(Redirect),
}

impl GateDecision {
    pub fn redirect_target(&self) -> Option<Redirect> {
        match self {
            Self::Proceed => None,
            Self::Redirect(target) => Some(*target),
        }
    }
}

/// **请求网关**：公开路径无条件放行；受保护路径只检查令牌是否存在且非空。
///
/// 令牌必须来自请求携带的 cookie，不校验签名或过期时间，也不解析角色。
pub fn request_gate(table: &RouteTable, path: &str, token: Option<&str>) -> GateDecision {
    if table.classify(path) == RouteClass::Public {
        return GateDecision::Proceed;
    }
    match token {
        Some(t) if !t.is_empty() => GateDecision::Proceed,
        _ => GateDecision::Redirect(Redirect::Login),
    }
}

/// 登录/注册页守卫：已认证用户离开表单页，进入控制面板
pub fn public_only(table: &RouteTable, path: &str, authenticated: bool) -> GateDecision {
    if authenticated && table.is_auth_form(path) {
        GateDecision::Redirect(Redirect::Dashboard)
    } else {
        GateDecision::Proceed
    }
}

/// 认证状态变化后对当前页面的判定
///
/// 与边缘网关读取同一个令牌：无令牌时按请求网关判断，有令牌时只把用户从表单页送走。
pub fn auth_redirect(table: &RouteTable, path: &str, token: Option<&str>) -> GateDecision {
    match request_gate(table, path, token) {
        GateDecision::Proceed => {
            let has_token = token.is_some_and(|t| !t.is_empty());
            public_only(table, path, has_token)
        }
        denied => denied,
    }
}

/// 管理员页守卫的状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardState {
    #[default]
    Checking,
    Allowed,
    RedirectingToDashboard,
    RedirectingToAdminLogin,
}

impl GuardState {
    /// 由角色解析结果推进状态
    ///
    /// 只有 `Checking` 会迁移；终态在同一页面生命周期内保持不变。
    pub fn advance(self, resolution: &Resolution) -> Self {
        if self != Self::Checking {
            return self;
        }
        if resolution.is_corrupt_admin() {
            return Self::RedirectingToAdminLogin;
        }
        match resolution.role {
            role if role.is_elevated() => Self::Allowed,
            Role::Clinic => Self::RedirectingToDashboard,
            _ => Self::RedirectingToAdminLogin,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Checking)
    }

    pub fn redirect_target(&self) -> Option<Redirect> {
        match self {
            Self::RedirectingToDashboard => Some(Redirect::Dashboard),
            Self::RedirectingToAdminLogin => Some(Redirect::AdminLogin),
            Self::Checking | Self::Allowed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::{CredentialSnapshot, resolve};

    fn resolution_for(token: Option<&str>, admin: Option<&str>, user: Option<&str>) -> Resolution {
        resolve(&CredentialSnapshot {
            token: token.map(String::from),
            admin_auth: admin.map(String::from),
            user: user.map(String::from),
        })
    }

    #[test]
    fn test_public_paths_always_proceed() {
        let table = RouteTable::default();
        for token in [None, Some(""), Some("abc")] {
            assert_eq!(request_gate(&table, "/planos", token), GateDecision::Proceed);
            assert_eq!(request_gate(&table, "/", token), GateDecision::Proceed);
        }
    }

    #[test]
    fn test_protected_path_without_token_redirects_to_login() {
        let table = RouteTable::default();
        let decision = request_gate(&table, "/dashboard/configuracoes", None);
        assert_eq!(decision, GateDecision::Redirect(Redirect::Login));
        assert_eq!(decision.redirect_target().map(|r| r.path()), Some("/login"));
    }

    #[test]
    fn test_protected_path_with_empty_token_redirects() {
        let table = RouteTable::default();
        assert_eq!(
            request_gate(&table, "/dashboard/insights", Some("")),
            GateDecision::Redirect(Redirect::Login)
        );
    }

    #[test]
    fn test_protected_path_with_any_token_proceeds() {
        let table = RouteTable::default();
        assert_eq!(
            request_gate(&table, "/dashboard/insights", Some("not-even-a-jwt")),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_public_only_redirects_authenticated_users() {
        let table = RouteTable::default();
        assert_eq!(
            public_only(&table, "/login", true),
            GateDecision::Redirect(Redirect::Dashboard)
        );
        assert_eq!(public_only(&table, "/login", false), GateDecision::Proceed);
        assert_eq!(public_only(&table, "/planos", true), GateDecision::Proceed);
    }

    fn elevated_access(resolution: &Resolution) -> GuardState {
        GuardState::Checking.advance(resolution)
    }

    #[test]
    fn test_auth_redirect_follows_token() {
        let table = RouteTable::default();
        assert_eq!(
            auth_redirect(&table, "/login", Some("tok")),
            GateDecision::Redirect(Redirect::Dashboard)
        );
        assert_eq!(auth_redirect(&table, "/login", None), GateDecision::Proceed);
        assert_eq!(auth_redirect(&table, "/login", Some("")), GateDecision::Proceed);
        assert_eq!(
            auth_redirect(&table, "/dashboard/insights", None),
            GateDecision::Redirect(Redirect::Login)
        );
        assert_eq!(
            auth_redirect(&table, "/dashboard/insights", Some("tok")),
            GateDecision::Proceed
        );
        assert_eq!(auth_redirect(&table, "/planos", Some("tok")), GateDecision::Proceed);
    }

    #[test]
    fn test_guard_redirect_targets_are_reachable_without_token() {
        let table = RouteTable::default();

        // 管理员守卫只在没有管理员凭据时送往管理员登录页，此时可能也没有令牌
        let none = resolution_for(None, None, None);
        let corrupt = resolution_for(None, Some("{broken"), None);
        for resolution in [none, corrupt] {
            let target = elevated_access(&resolution)
                .redirect_target()
                .expect("redirect for non-admin");
            assert_eq!(target, Redirect::AdminLogin);
            assert_eq!(request_gate(&table, target.path(), None), GateDecision::Proceed);
        }

        // 请求网关自身的拒绝目标
        let target = request_gate(&table, "/admin", None)
            .redirect_target()
            .expect("protected path");
        assert_eq!(request_gate(&table, target.path(), None), GateDecision::Proceed);

        // 注册后的落地页
        assert_eq!(
            request_gate(&table, Redirect::Plans.path(), None),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_token_holders_reach_dashboard_redirects() {
        let table = RouteTable::default();
        let clinic = resolution_for(Some("t"), None, Some("{}"));
        let target = elevated_access(&clinic).redirect_target().expect("clinic redirect");
        assert_eq!(request_gate(&table, target.path(), Some("t")), GateDecision::Proceed);

        let target = public_only(&table, "/login", true)
            .redirect_target()
            .expect("public-only redirect");
        assert_eq!(request_gate(&table, target.path(), Some("t")), GateDecision::Proceed);
    }

    #[test]
    fn test_admin_login_is_not_an_auth_form() {
        let table = RouteTable::default();
        assert_eq!(
            auth_redirect(&table, "/admin/login", Some("tok")),
            GateDecision::Proceed
        );
    }

    #[test]
    fn test_elevated_access_by_role() {
        let clinic = resolution_for(Some("t"), None, None);
        let none = resolution_for(None, None, None);
        let admin = resolution_for(None, Some(r#"{"role":"admin"}"#), None);
        let super_admin = resolution_for(None, Some(r#"{"role":"super_admin"}"#), None);

        assert_eq!(
            elevated_access(&clinic).redirect_target(),
            Some(Redirect::Dashboard)
        );
        assert_eq!(
            elevated_access(&none).redirect_target(),
            Some(Redirect::AdminLogin)
        );
        assert_eq!(elevated_access(&admin), GuardState::Allowed);
        assert_eq!(elevated_access(&super_admin), GuardState::Allowed);
    }

    #[test]
    fn test_corrupt_admin_goes_to_admin_login_even_with_token() {
        let corrupt = resolution_for(Some("t"), Some("{broken"), Some("{}"));
        assert_eq!(elevated_access(&corrupt), GuardState::RedirectingToAdminLogin);
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        let admin = resolution_for(None, Some(r#"{"role":"admin"}"#), None);
        let none = resolution_for(None, None, None);

        let state = GuardState::RedirectingToDashboard.advance(&admin);
        assert_eq!(state, GuardState::RedirectingToDashboard);
        let state = GuardState::Allowed.advance(&none);
        assert_eq!(state, GuardState::Allowed);
        assert!(state.is_terminal());
        assert!(!GuardState::Checking.is_terminal());
    }
}

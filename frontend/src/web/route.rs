//! 路由定义模块 - 领域模型
//!
//! 纯粹的页面映射，不依赖于 DOM 或 web_sys。访问控制由 `clinica_shared::decision` 决定。

use std::fmt::Display;

/// 控制面板分区
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DashboardSection {
    #[default]
    Insights,
    Patients,
    Appointments,
    Budgets,
    Settings,
}

impl DashboardSection {
    pub const ALL: [DashboardSection; 5] = [
        Self::Insights,
        Self::Patients,
        Self::Appointments,
        Self::Budgets,
        Self::Settings,
    ];

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "" | "insights" => Some(Self::Insights),
            "pacientes" => Some(Self::Patients),
            "agendamentos" => Some(Self::Appointments),
            "orcamentos" => Some(Self::Budgets),
            "configuracoes" => Some(Self::Settings),
            _ => None,
        }
    }

    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Insights => "/dashboard/insights",
            Self::Patients => "/dashboard/pacientes",
            Self::Appointments => "/dashboard/agendamentos",
            Self::Budgets => "/dashboard/orcamentos",
            Self::Settings => "/dashboard/configuracoes",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Insights => "Insights",
            Self::Patients => "Pacientes",
            Self::Appointments => "Agendamentos",
            Self::Budgets => "Orçamentos",
            Self::Settings => "Configurações",
        }
    }
}

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Login,
    Register,
    Plans,
    PlanPayment,
    ChoosePlan,
    AdminLogin,
    Admin,
    Dashboard(DashboardSection),
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举（忽略查询串与末尾斜杠）
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        if let Some(rest) = path.strip_prefix("/dashboard") {
            let segment = rest.strip_prefix('/').unwrap_or(rest);
            if rest.is_empty() || rest.starts_with('/') {
                return DashboardSection::from_segment(segment)
                    .map(Self::Dashboard)
                    .unwrap_or(Self::NotFound);
            }
        }

        match path {
            "/" | "/home" => Self::Home,
            "/login" => Self::Login,
            "/registro" => Self::Register,
            "/planos" => Self::Plans,
            "/planos/pagamento" => Self::PlanPayment,
            "/escolher-plano" => Self::ChoosePlan,
            "/admin/login" => Self::AdminLogin,
            "/admin" => Self::Admin,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/registro",
            Self::Plans => "/planos",
            Self::PlanPayment => "/planos/pagamento",
            Self::ChoosePlan => "/escolher-plano",
            Self::AdminLogin => "/admin/login",
            Self::Admin => "/admin",
            Self::Dashboard(section) => section.to_path(),
            Self::NotFound => "/404",
        }
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_sections() {
        assert_eq!(
            AppRoute::from_path("/dashboard"),
            AppRoute::Dashboard(DashboardSection::Insights)
        );
        assert_eq!(
            AppRoute::from_path("/dashboard/configuracoes"),
            AppRoute::Dashboard(DashboardSection::Settings)
        );
        assert_eq!(AppRoute::from_path("/dashboard/unknown"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/dashboardx"), AppRoute::NotFound);
    }

    #[test]
    fn test_paths_round_trip() {
        for route in [
            AppRoute::Login,
            AppRoute::Register,
            AppRoute::PlanPayment,
            AppRoute::ChoosePlan,
            AppRoute::AdminLogin,
            AppRoute::Admin,
            AppRoute::Dashboard(DashboardSection::Budgets),
        ] {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
    }

    #[test]
    fn test_query_and_trailing_slash_are_ignored() {
        assert_eq!(AppRoute::from_path("/login/?next=/admin"), AppRoute::Login);
        assert_eq!(AppRoute::from_path("/"), AppRoute::Home);
        assert_eq!(AppRoute::from_path("/home"), AppRoute::Home);
    }
}

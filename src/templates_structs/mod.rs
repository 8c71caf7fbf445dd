// Template context structures for Askama templates, organized by area.

use actix_session::Session;

use crate::auth::csrf;
use crate::auth::session::{SessionManager, take_flash};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::nav_item::{self, NavItem};
use crate::models::user::{Role, UserProfile};

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.user.full_name`, `ctx.nav`, etc.
pub struct PageContext {
    pub user: UserProfile,
    pub avatar_initial: String,
    pub flash: Option<String>,
    pub nav: Vec<NavItem>,
    pub app_name: String,
    pub csrf_token: String,
}

impl PageContext {
    pub fn build(session: &Session, config: &AppConfig, current_path: &str) -> Result<Self, AppError> {
        let user = SessionManager::new(session).profile()?;
        let flash = take_flash(session);
        let nav = nav_item::find_navigation(user.role, current_path);
        let csrf_token = csrf::get_or_create_token(session);
        Ok(Self {
            avatar_initial: user.initial(),
            user,
            flash,
            nav,
            app_name: config.app_name.clone(),
            csrf_token,
        })
    }

    pub fn role_label(&self) -> &'static str {
        self.user.role.label()
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }
}

mod admin;
mod booking;
mod common;
mod dashboard;
mod examination;
mod payment;
mod treatment;

pub use self::admin::{AdminBookingsTemplate, AdminUsersTemplate};
pub use self::booking::{
    BookingFormTemplate, BookingRow, DoctorAppointmentsTemplate, PatientBookingsTemplate, RescheduleTemplate,
};
pub use self::common::{AccountTemplate, LoginTemplate, RegisterTemplate};
pub use self::dashboard::{AdminDashboardTemplate, DoctorDashboardTemplate, PatientDashboardTemplate};
pub use self::examination::{ExaminationFormTemplate, PatientExaminationsTemplate};
pub use self::payment::PaymentResultTemplate;
pub use self::treatment::{
    DoctorPlanDetailTemplate, DoctorPlansTemplate, PatientOption, PatientTreatmentsTemplate, PlanCard,
    PlanFormTemplate, StatusOption,
};

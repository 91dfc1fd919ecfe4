pub mod about_tab;
pub mod attendance_tab;
pub mod login_tab;
pub mod logout_tab;
pub mod records_tab;
pub mod register_tab;
pub mod settings_tab;
pub mod students_tab;
pub mod subjects_tab;

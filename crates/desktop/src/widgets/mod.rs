pub mod camera_feed;
pub mod folder_row;
pub mod form_field;
pub mod primary_button;
pub mod table;

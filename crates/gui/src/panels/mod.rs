pub mod console;
pub mod draft_form;
pub mod map_view;

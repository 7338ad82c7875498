pub mod chat_area;
pub mod event_panel;
pub mod input_bar;
pub mod page_bar;

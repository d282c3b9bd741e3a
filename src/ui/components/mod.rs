pub mod pass_summary;
pub mod progress_bar;
pub mod question_card;
pub mod score_panel;
pub mod tag_menu;

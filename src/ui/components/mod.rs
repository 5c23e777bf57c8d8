pub mod menu;
pub mod progress_bar;
pub mod quiz_card;
pub mod results_card;

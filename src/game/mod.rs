// Game modes: title screen, mission, and the menus stacked over them

pub mod controls_menu;
pub mod gameplay;
pub mod main_menu;
pub mod menu;
pub mod options_menu;
pub mod pause_menu;
pub mod post_mission;

// Engine modules: input, modes, frame driver

pub mod app;
pub mod game_loop;
pub mod input;
pub mod mode;

pub mod audio;
pub mod clock;
pub mod config;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
pub mod ui;

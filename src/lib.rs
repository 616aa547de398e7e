// Library surface for headless/integration tests and reuse.
// Terminal setup and the CLI stay in main.rs.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod cursor;
pub mod error;
pub mod keyboard;
pub mod keymap;
pub mod layout;
pub mod logging;
pub mod runtime;
pub mod scroll;
pub mod sound;
pub mod text_buffer;
pub mod ui;
pub mod wpm;

pub use app::App;
pub use error::AppError;

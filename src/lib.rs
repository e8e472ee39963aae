pub mod browser;
pub mod config;
pub mod delay;
pub mod extract;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod retry;
pub mod target;
pub mod util;

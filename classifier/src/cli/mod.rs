pub mod app;
pub mod commands;
pub mod dispatch;
pub mod namespace;
pub mod plugin;
pub mod registry;

pub use dispatch::Dispatcher;
pub use namespace::GlobalOptions;

pub mod console_session;

pub use console_session::ConsoleSession;

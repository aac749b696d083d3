pub mod backend;
pub mod session;

pub use backend::PseudocodeBackend;
pub use session::CompletionSession;

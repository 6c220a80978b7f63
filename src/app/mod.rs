mod root;
mod session;

pub use root::App;
pub use session::{Session, SessionSettings};

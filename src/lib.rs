pub mod components;
pub use components::*;
mod error;
pub use error::*;
pub mod host;
pub use host::*;
pub mod logging;
mod slot;
pub use slot::*;
mod subscriber;
pub use subscriber::*;

mod healthcheck;
mod helpers;
mod message;
mod recipients;
mod send;

pub use healthcheck::*;
pub use message::*;
pub use recipients::*;
pub use send::*;

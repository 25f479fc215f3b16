mod client;
pub mod protocol;

pub use client::AkismetClient;
pub use protocol::RequestContext;

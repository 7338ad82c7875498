pub mod client;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::DmClient;
pub use transport::DmTransport;

//! Network side of Pact command signing.
//!
//! ## Architecture
//!
//! - **Transport**: trait for the server's send/local/poll/listen endpoints
//! - **HttpTransport**: `reqwest` implementation of `Transport`
//! - **WalletBridge**: delegated signing through the local wallet daemon

pub mod error;
pub mod message;
pub mod transport;
pub mod wallet;

pub use error::{WireError, WireResult};
pub use message::{PollEntry, SendResponse, SigningRequest};
pub use transport::{HttpTransport, Transport};
pub use wallet::{SigningRequestBuilder, WalletBridge};

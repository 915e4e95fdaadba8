//! Test doubles for exercising request chains without a network.
//!
//! - [`MockTransport`] - scripted [`Transport`](crate::Transport) that records requests

mod mock_transport;

pub use mock_transport::MockTransport;

//! HTTP exchange and response classification.

mod classifier;
mod exchanger;
mod transport;

pub use classifier::{DispatchOutcome, ResponseClassifier};
pub use exchanger::HttpExchanger;
pub use transport::{HttpRequest, RawResponse, ReqwestTransport, Transport, TransportError};

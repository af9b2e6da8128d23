pub mod brokerage;
pub mod openinsider;

pub use brokerage::BrokerageConnector;
pub use openinsider::InsiderListingConnector;

use std::future::Future;

use crate::errors::FetchError;

/// Uniform contract over the external sources. A connector knows how to
/// pull one batch of raw records; it knows nothing about persistence.
/// Returning an empty batch is a valid outcome, not an error.
pub trait Connector {
    type Record;

    fn fetch(&self) -> impl Future<Output = Result<Vec<Self::Record>, FetchError>> + Send;
}

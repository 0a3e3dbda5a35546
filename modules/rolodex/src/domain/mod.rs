pub mod error;
pub mod model;
pub mod service;
pub mod vcard;

pub use error::DomainError;
pub use service::Service;

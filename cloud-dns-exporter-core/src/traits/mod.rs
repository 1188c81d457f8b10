//! Seams between the orchestrator and its environment

mod cert_checker;
mod id_generator;
mod provider_factory;

pub use cert_checker::CertChecker;
pub use id_generator::{IdGenerator, UuidGenerator};
pub use provider_factory::{DefaultProviderFactory, ProviderFactory};

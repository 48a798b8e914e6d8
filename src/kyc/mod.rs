//! KYC onboarding: document creation and signing-status polling

mod model;
mod poller;
mod service;

pub use model::*;
pub use poller::{KycPoller, DEFAULT_POLL_INTERVAL};
pub use service::{KycApi, KycEndpoints, RestKycApi};

#[path = "../crates/sdk-types/src/lib.rs"]
pub mod types;
#[path = "../crates/core/src/lib.rs"]
pub mod core;
#[path = "../crates/streaming-sse/src/lib.rs"]
pub mod streaming_sse;
#[path = "../crates/transports/reqwest/src/lib.rs"]
pub mod transport_reqwest;

#[path = "../crates/providers/sarvam/src/lib.rs"]
pub mod provider_sarvam;

pub mod transports {
    pub use crate::transport_reqwest as reqwest;
}

pub mod providers {
    pub use crate::provider_sarvam as sarvam;
}

pub use crate::provider_sarvam::{create_sarvam, create_sarvam_with_transport};

pub(crate) use crate::core as ai_sdk_core;
pub(crate) use crate::streaming_sse as ai_sdk_streaming_sse;
pub(crate) use crate::transport_reqwest as reqwest_transport;
pub(crate) use crate::types as ai_sdk_types;

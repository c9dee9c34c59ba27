//! Errors reported when starting the capture loop.

use crate::capture::CaptureError;
use crate::testbed::LoopState;

/// Errors returned by [`Testbed::start_video`](crate::testbed::Testbed::start_video).
///
/// All of them leave the testbed in the state it was in before the call.
#[derive(Debug, thiserror::Error)]
pub enum TestbedError {
    #[error("no capture devices available")]
    NoDevices,

    #[error("capture device {device} failed to start: {source}")]
    DeviceStartFailed {
        device: String,
        #[source]
        source: CaptureError,
    },

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error("capture loop cannot start from the {0} state")]
    InvalidState(LoopState),
}

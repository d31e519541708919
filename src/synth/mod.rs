// Purpose: hand a composite voice to the audio thread and steer it from the
// interaction thread without locks

pub mod message;
#[cfg(feature = "rtrb")]
pub mod shared;

pub use message::{MessageReceiver, VoiceMessage, VoiceStatus};
#[cfg(feature = "rtrb")]
pub use shared::{HandleError, SharedVoice, VoiceHandle};

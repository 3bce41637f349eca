//! Voice note capture.
//!
//! Recording works in the UI but transcription has no backend yet; the
//! placeholder transcript tells the user so.

use serde::{Deserialize, Serialize};

/// Text shown in place of a real transcription.
pub const COMING_SOON: &str =
    "ভয়েস নোট ট্রান্সক্রিপশন শীঘ্রই আসছে। আপাতত নোটটি সংরক্ষণ করা হয়েছে।";

/// A transcription result for a recorded note.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transcript {
    pub text: String,
    /// False until a real backend produces the text
    pub from_model: bool,
}

/// Transcribe a recorded voice note.
pub fn transcribe_note(_audio: &[u8]) -> Transcript {
    Transcript {
        text: COMING_SOON.to_string(),
        from_model: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_transcript() {
        let transcript = transcribe_note(&[0u8; 16]);
        assert_eq!(transcript.text, COMING_SOON);
        assert!(!transcript.from_model);
    }
}

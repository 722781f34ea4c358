//! Dispatch error taxonomy.
//!
//! Only unparsable text is an error; a message that parses but matches
//! no known shape is a legal no-op logged at diagnostic level, never a
//! failure of the dispatch loop.

/// Errors from dispatching one inbound channel message.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The message text was not valid JSON. Policy: log and drop.
    #[error("malformed message: {0}")]
    MalformedMessage(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_message_wraps_serde_error() {
        let err = serde_json::from_str::<serde_json::Value>("{nope").unwrap_err();
        let dispatch: DispatchError = err.into();
        assert!(dispatch.to_string().starts_with("malformed message:"));
    }
}

use serde::Deserialize;

use crate::domain::AppError;

#[derive(Debug, Deserialize)]
struct ThreadDumpEnvelope {
    #[serde(default, alias = "threadDump")]
    state: Option<String>,
}

/// Convert a JSON-wrapped thread dump into the text body written to disk.
///
/// Line endings are normalized to `\n` and the body always ends with a newline.
pub fn unmarshal_thread_dump(bytes: &[u8]) -> Result<String, AppError> {
    let envelope: ThreadDumpEnvelope =
        serde_json::from_slice(bytes).map_err(|e| AppError::parse("thread dump", e))?;
    let raw = envelope
        .state
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::parse("thread dump", "response contains no thread dump"))?;

    let mut body = raw.replace("\r\n", "\n").replace('\t', "    ");
    if !body.ends_with('\n') {
        body.push('\n');
    }
    Ok(body)
}

/// File name for iteration `iteration` (1-based) of node `node_id`.
pub fn thread_dump_file_name(node_id: i32, iteration: u32) -> String {
    format!("thread-dump-node-{node_id}-{iteration}.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_state_field() {
        let body = br#"{"state":"\"main\" prio=5\r\n\tat java.lang.Thread.run"}"#;
        let dump = unmarshal_thread_dump(body).unwrap();
        assert_eq!(dump, "\"main\" prio=5\n    at java.lang.Thread.run\n");
    }

    #[test]
    fn accepts_thread_dump_alias() {
        let dump = unmarshal_thread_dump(br#"{"threadDump":"x\n"}"#).unwrap();
        assert_eq!(dump, "x\n");
    }

    #[test]
    fn empty_dump_is_an_error() {
        assert!(unmarshal_thread_dump(br#"{"state":"  "}"#).is_err());
        assert!(unmarshal_thread_dump(b"not json").is_err());
    }

    #[test]
    fn file_names() {
        assert_eq!(thread_dump_file_name(3, 2), "thread-dump-node-3-2.log");
    }
}

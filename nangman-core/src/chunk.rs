use thiserror::Error;

/// Default ceiling per part. Leaves headroom under Telegram's 4096-character limit.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("max message length must be greater than zero")]
    ZeroLimit,
}

/// Length in the unit the chunker counts (Unicode scalar values).
pub fn message_len(text: &str) -> usize {
    text.chars().count()
}

/// Splits `text` into ordered parts of at most `max_len` characters, breaking only at `\n`.
///
/// The newline at each split point is dropped. Blank lines that land on a split point
/// belong to the boundary and are dropped too, so no part is ever empty or made only of
/// newlines. For text without blank lines `parts.join("\n") == text`.
/// A single line longer than `max_len` is not split further and becomes an oversized part.
/// Text made only of newlines and longer than `max_len` yields no parts.
pub fn split_message(text: &str, max_len: usize) -> Result<Vec<String>, ChunkError> {
    if max_len == 0 {
        return Err(ChunkError::ZeroLimit);
    }
    if message_len(text) <= max_len {
        return Ok(vec![text.to_string()]);
    }

    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut open = false;

    for line in text.split('\n') {
        let line_len = message_len(line);
        if !open {
            if line.is_empty() && !parts.is_empty() {
                continue;
            }
            current.push_str(line);
            current_len = line_len;
            open = true;
            continue;
        }

        if current_len + 1 + line_len <= max_len {
            current.push('\n');
            current.push_str(line);
            current_len += 1 + line_len;
            continue;
        }

        close_part(&mut parts, &mut current);
        current_len = 0;
        open = !line.is_empty();
        if open {
            current.push_str(line);
            current_len = line_len;
        }
    }
    if open {
        close_part(&mut parts, &mut current);
    }

    Ok(parts)
}

fn close_part(parts: &mut Vec<String>, current: &mut String) {
    let part = std::mem::take(current);
    if !part.chars().all(|c| c == '\n') {
        parts.push(part);
    }
}

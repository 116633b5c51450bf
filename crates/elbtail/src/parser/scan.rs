use super::model::ParseError;

/// Outcome of one scanner step over a byte window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<'a> {
    /// A complete token. `advance` bytes of the window were consumed,
    /// including the terminating delimiter.
    Token { advance: usize, token: &'a [u8] },
    /// No unquoted delimiter before the end of the window. `advance` is the
    /// offset (past any leading spaces) at which scanning should resume once
    /// more bytes are available.
    Partial { advance: usize },
}

/// Scan the next space-delimited word out of `data`, treating everything
/// between quotation marks as part of one word.
///
/// Works like a split function over a growing buffer: `at_eof` marks the
/// window as final, in which case a trailing unterminated word is returned
/// as-is (no quote trimming). The format cannot escape a literal `"` inside
/// a quoted field; that is a property of the wire format, not of this
/// scanner.
///
/// The error arm is part of the declared contract for callers, but the
/// current grammar never produces it.
pub fn scan(data: &[u8], at_eof: bool) -> Result<Scan<'_>, ParseError> {
    // Skip leading spaces. Only ' ' delimits fields in this format; tabs
    // and other whitespace are ordinary token bytes.
    let mut start = 0;
    while start < data.len() && data[start] == b' ' {
        start += 1;
    }

    // Scan until an unquoted space marks the end of the word.
    let mut open = false;
    let mut trim = false;
    for (i, &b) in data.iter().enumerate().skip(start) {
        if b == b'"' {
            trim = true;
            open = !open;
        }
        if b == b' ' && !open {
            // A closed quote pair strips exactly one byte at each end of
            // the word, however many quotes were seen in between. `trim`
            // implies at least two quote bytes before `i`, so the slice
            // bounds hold.
            let token = if trim {
                &data[start + 1..i - 1]
            } else {
                &data[start..i]
            };
            return Ok(Scan::Token {
                advance: i + 1,
                token,
            });
        }
    }

    // Final window: whatever is left is the last, unterminated word.
    if at_eof && data.len() > start {
        return Ok(Scan::Token {
            advance: data.len(),
            token: &data[start..],
        });
    }

    // Request more data.
    Ok(Scan::Partial { advance: start })
}

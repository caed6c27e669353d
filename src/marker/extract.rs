//! Abbreviation span extraction.
//!
//! Finds the longest syntactically plausible abbreviation around a column on
//! a single line: look ahead over closing brackets and quotes the cursor may
//! sit inside of, then scan backward collecting abbreviation characters,
//! balancing brackets and skipping quoted attribute strings. Whether the
//! span actually parses is the expansion engine's call; this pass only has
//! to be cheap and not overshoot.

/// An abbreviation candidate found on a line. `start`/`end` are char columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    pub abbreviation: String,
    pub start: usize,
    pub end: usize,
}

/// Characters that may appear anywhere in an abbreviation.
fn is_abbreviation_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '#' | '.' | '*' | ':' | '$' | '-' | '_' | '!' | '@' | '%' | '^' | '+' | '>' | '/')
}

/// Operators that join elements but cannot begin an abbreviation.
fn is_leading_operator(c: char) -> bool {
    matches!(c, '+' | '>' | '^' | '*' | '/' | '%' | ':' | '-')
}

/// Extract an abbreviation candidate ending at (or spilling just past)
/// `column`. Returns `None` when nothing plausible is there.
pub fn extract_abbreviation(line: &str, column: usize) -> Option<Extracted> {
    let chars: Vec<char> = line.chars().collect();
    let col = column.min(chars.len());

    // The cursor may sit just inside a bracketed attribute or quoted value;
    // take the trailing closers with us.
    let mut end = col;
    while end < chars.len() && matches!(chars[end], ']' | '}' | '"' | '\'') {
        end += 1;
    }

    let mut pos = end;
    // Closing brackets awaiting their opener during the backward scan
    let mut pending: Vec<(char, usize)> = Vec::new();

    while pos > 0 {
        let c = chars[pos - 1];
        let in_braces = pending.iter().any(|(b, _)| matches!(b, ']' | '}'));
        if c == '"' || c == '\'' {
            // Quoted strings only occur inside attribute/text braces
            if !in_braces {
                break;
            }
            match find_matching_quote(&chars, pos - 1, c) {
                Some(open) => {
                    pos = open;
                    continue;
                }
                None => break,
            }
        }
        match c {
            ')' | ']' | '}' => pending.push((c, pos - 1)),
            '(' | '[' | '{' => {
                let expected = match c {
                    '(' => ')',
                    '[' => ']',
                    _ => '}',
                };
                match pending.last() {
                    Some((closer, _)) if *closer == expected => {
                        pending.pop();
                    }
                    // An opener with no closer in the span ends it
                    _ => break,
                }
            }
            _ => {
                // Attribute and text braces admit arbitrary content
                if !is_abbreviation_char(c) && !in_braces {
                    break;
                }
            }
        }
        pos -= 1;
    }

    // A closer whose opener never turned up bounds the span on the left
    if let Some(&(_, idx)) = pending.iter().max_by_key(|(_, idx)| *idx) {
        pos = idx + 1;
    }

    let mut start = pos;
    while start < end && is_leading_operator(chars[start]) {
        start += 1;
    }

    if start >= end {
        return None;
    }

    Some(Extracted {
        abbreviation: chars[start..end].iter().collect(),
        start,
        end,
    })
}

/// Scan left from a closing quote at `close` for the matching opening quote.
fn find_matching_quote(chars: &[char], close: usize, quote: char) -> Option<usize> {
    (0..close).rev().find(|&i| chars[i] == quote)
}

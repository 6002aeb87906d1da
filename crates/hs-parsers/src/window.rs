//! Time-period resolution — human tokens to bounded lookback windows.

use std::time::Duration;

/// Default lookback when the token is absent or unparseable.
const DEFAULT_WINDOW: Duration = Duration::from_secs(3600);

/// A resolved lookback window.
///
/// `token` is always re-derivable to `duration` and is what gets handed to
/// `log show --last`; when a cap rewrites the window, the token is
/// regenerated so the subprocess never sees the oversized request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub duration: Duration,
    pub token: String,
}

impl TimeWindow {
    /// Resolve a `<integer><m|h|d>` token into a window, clamped to `cap`.
    ///
    /// Pure function, no I/O. Tokens outside the grammar (including zero
    /// values) degrade to the 1 hour default rather than erroring — an
    /// unparseable period is treated as "the caller didn't say", not as a
    /// rejected request.
    pub fn resolve(token: Option<&str>, cap: Option<Duration>) -> Self {
        let duration = token.and_then(parse_token).unwrap_or(DEFAULT_WINDOW);

        match cap {
            Some(cap) if duration > cap => Self {
                duration: cap,
                token: canonical_token(cap),
            },
            _ => Self {
                duration,
                // Token text is preserved verbatim when it parsed; degraded
                // tokens are replaced by the canonical default.
                token: match token.filter(|t| parse_token(t).is_some()) {
                    Some(t) => t.to_string(),
                    None => canonical_token(duration),
                },
            },
        }
    }
}

fn parse_token(token: &str) -> Option<Duration> {
    let token = token.trim();
    let unit = token.chars().last().filter(char::is_ascii)?;
    let value: u64 = token[..token.len() - 1].parse().ok()?;
    if value == 0 {
        return None;
    }
    let secs = match unit {
        'm' => value.checked_mul(60)?,
        'h' => value.checked_mul(3600)?,
        'd' => value.checked_mul(86_400)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

fn canonical_token(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs % 86_400 == 0 {
        format!("{}d", secs / 86_400)
    } else if secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}m", secs.div_ceil(60))
    }
}

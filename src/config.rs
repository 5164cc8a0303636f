use std::env;

use super::Charset;

/// As of Rust 1.73.0: https://github.com/rust-lang/rust/blob/1.73.0/library/std/src/sys_common/io.rs#L3
const DEFAULT_BUF_SIZE: usize = if cfg!(target_os = "espidf") {
    512
} else {
    8 * 1024
};

/// The smallest input buffer accepted; large enough to hold any multi-byte sequence.
const MIN_BUF_SIZE: usize = 16;

/// What the decoder does when it encounters a malformed byte sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MalformedAction {
    /// Substitute the replacement character (U+FFFD) and continue.
    #[default]
    Replace,
    /// Report [`Error::Malformed`](crate::Error::Malformed) once the characters decoded before
    /// the malformed sequence have been read.
    Report,
}

/// What happens to the buffered state of the old engine on
/// [`set_encoding`](crate::SwitchableDecoder::set_encoding).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CarryOver {
    /// Drop both the undecoded bytes and the decoded-but-unread characters. The switch is taken to
    /// happen at a clean character boundary chosen by the caller, so subsequent reads start with
    /// whatever the source yields next.
    #[default]
    Discard,
    /// Keep the decoded-but-unread characters (decoded with the old encoding) and hand the
    /// undecoded bytes to the new engine, which decodes them with the new encoding. A multi-byte
    /// sequence that the old codec had partially consumed is still lost.
    Retain,
}

/// Tuning knobs of a [`SwitchableDecoder`](crate::SwitchableDecoder).
///
/// # Examples
///
/// ```rust
/// use encoding_rs_switch::{CarryOver, Config, MalformedAction};
///
/// let config = Config::default()
///     .buffer_capacity(4096)
///     .malformed(MalformedAction::Report)
///     .carry_over(CarryOver::Retain);
/// assert_eq!(config.get_buffer_capacity(), 4096);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    buffer_capacity: usize,
    malformed: MalformedAction,
    carry_over: CarryOver,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_BUF_SIZE,
            malformed: MalformedAction::default(),
            carry_over: CarryOver::default(),
        }
    }
}

impl Config {
    /// Sets the capacity of the input byte buffer, clamped to at least 16 bytes.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity.max(MIN_BUF_SIZE);
        self
    }

    /// Sets the action taken on malformed input.
    pub fn malformed(mut self, action: MalformedAction) -> Self {
        self.malformed = action;
        self
    }

    /// Sets the policy applied to buffered state when the encoding is switched.
    pub fn carry_over(mut self, policy: CarryOver) -> Self {
        self.carry_over = policy;
        self
    }

    /// Returns the capacity of the input byte buffer.
    pub fn get_buffer_capacity(&self) -> usize {
        self.buffer_capacity
    }

    /// Returns the action taken on malformed input.
    pub fn get_malformed(&self) -> MalformedAction {
        self.malformed
    }

    /// Returns the policy applied to buffered state when the encoding is switched.
    pub fn get_carry_over(&self) -> CarryOver {
        self.carry_over
    }
}

/// Returns the platform default charset.
///
/// The codeset of the locale is taken from the first non-empty variable among `LC_ALL`,
/// `LC_CTYPE` and `LANG` (e.g. `EUC-JP` in `ja_JP.EUC-JP@cjknarrow`). UTF-8 is returned when no
/// locale is set, the locale has no codeset (as in `C` or `POSIX`), or the codeset is unknown.
pub fn default_charset() -> Charset {
    ["LC_ALL", "LC_CTYPE", "LANG"]
        .into_iter()
        .filter_map(|key| env::var(key).ok())
        .find(|value| !value.is_empty())
        .and_then(|locale| codeset_charset(&locale))
        .unwrap_or_else(|| encoding_rs::UTF_8.into())
}

fn codeset_charset(locale: &str) -> Option<Charset> {
    let (_, codeset) = locale.split_once('.')?;
    let codeset = codeset.split_once('@').map_or(codeset, |(c, _)| c);
    Charset::for_label(codeset)
}

//! A character reader over encoding_rs whose encoding can be switched mid-stream
//!
//! This crate provides [`SwitchableDecoder`], which decodes a byte source into characters and lets
//! the caller replace the encoding at any point, after some bytes have already been decoded. It is
//! meant for formats that declare their own encoding somewhere inside the data, such as resource
//! scripts with `#pragma code_page`, XML declarations or HTML `<meta charset>`: start with a
//! reasonable guess, read up to the declaration, and switch.
//!
//! ```rust
//! use encoding_rs_switch::{CarryOver, Config, SwitchableDecoder};
//!
//! let src: &[u8] = b"#pragma code_page(932)\n\x93\xfa\x96\x7b\x8c\xea";
//! let config = Config::default().carry_over(CarryOver::Retain);
//! let mut decoder = SwitchableDecoder::with_config(src, "windows-1252", config)?;
//!
//! let mut line = String::new();
//! while let Some(c) = decoder.read_char()? {
//!     line.push(c);
//!     if c == '\n' {
//!         break;
//!     }
//! }
//! assert_eq!(line, "#pragma code_page(932)\n");
//!
//! decoder.set_encoding("Shift_JIS")?;
//! let mut rest = String::new();
//! decoder.read_to_string(&mut rest)?;
//! assert_eq!(rest, "日本語");
//! # Ok::<(), encoding_rs_switch::Error>(())
//! ```
//!
//! Choosing *which* encoding to switch to is up to the caller; this crate only resolves encoding
//! labels through [`Charset::for_label`] and applies the result. The decoder reads bytes ahead
//! from its source but decodes only as many as each read needs. What happens to the bytes read
//! ahead at the moment of a switch is set by [`CarryOver`]: the default, [`CarryOver::Discard`],
//! drops them and expects the caller to switch at a point where the source has nothing buffered,
//! while [`CarryOver::Retain`], as above, decodes them with the new encoding.
//!
//! ```rust
//! use encoding_rs_switch::SwitchableDecoder;
//!
//! let src: &[u8] = &[0x41, 0x42, 0xE4, 0xB8, 0x80];
//! let mut decoder = SwitchableDecoder::new(src, "ISO-8859-1")?;
//! let mut buf = ['\0'; 8];
//! assert_eq!(decoder.read_into(&mut buf, 0, 8)?, Some(5));
//! assert_eq!(buf[..5], ['A', 'B', '\u{E4}', '\u{B8}', '\u{80}']);
//! assert_eq!(decoder.read_into(&mut buf, 0, 8)?, None);
//!
//! decoder.close()?;
//! assert_eq!(decoder.encoding_name(), None);
//! # Ok::<(), encoding_rs_switch::Error>(())
//! ```
//!
//! The crate logs encoding switches through the [`log`] facade at the `debug` level.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod charset;
mod config;
mod decoder;
mod error;
mod source;

mod buffer;
mod engine;

pub use charset::{Charset, EncodingSpec};
pub use config::{default_charset, CarryOver, Config, MalformedAction};
pub use decoder::{Chars, SwitchableDecoder};
pub use error::{Error, MalformedError, Result};
pub use source::{ByteSource, ReadSource};

#[cfg(test)]
mod tests;

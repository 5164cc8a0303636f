
use std::collections::VecDeque;

use super::{default_charset, CarryOver, Config, Error, SwitchableDecoder};

#[test]
fn ex_readme_examples() -> Result<(), Error> {
    let src: &[u8] = &[0x41, 0x42, 0xE4, 0xB8, 0x80];

    let mut decoder = SwitchableDecoder::new(src, "UTF-8")?;
    let mut dst = String::new();
    decoder.read_to_string(&mut dst)?;
    assert_eq!(dst, "AB\u{4E00}");

    let mut decoder = SwitchableDecoder::new(src, "UTF-8")?;
    decoder.set_encoding("latin1")?;
    assert_eq!(decoder.encoding_name(), Some("ISO-8859-1"));
    let chars = decoder.chars().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(chars, ['A', 'B', '\u{E4}', '\u{B8}', '\u{80}']);

    Ok(())
}

#[test]
fn default_encoding_follows_platform() {
    let decoder = SwitchableDecoder::new(&b""[..], None::<&str>).unwrap();
    assert_eq!(decoder.encoding_name(), Some(default_charset().name()));

    let decoder = SwitchableDecoder::with_default_encoding(&b""[..]);
    assert_eq!(decoder.charset(), Some(default_charset()));
}

#[test]
fn exhausted_source_yields_end_of_stream() {
    let mut decoder = SwitchableDecoder::new(&b""[..], "UTF-8").unwrap();
    assert_eq!(decoder.read_char().unwrap(), None);
    assert_eq!(decoder.read_char().unwrap(), None);
    assert_eq!(decoder.read_into(&mut ['\0'; 4], 0, 4).unwrap(), None);
    assert!(!decoder.is_ready().unwrap());

    let mut decoder = SwitchableDecoder::new(&b"z"[..], "UTF-8").unwrap();
    assert!(decoder.is_ready().unwrap());
    assert_eq!(decoder.read_char().unwrap(), Some('z'));
    assert_eq!(decoder.read_char().unwrap(), None);
}

#[test]
fn closed_decoder_rejects_everything() {
    let mut decoder = SwitchableDecoder::new(&b"abc"[..], "UTF-8").unwrap();
    assert_eq!(decoder.read_char().unwrap(), Some('a'));
    decoder.close().unwrap();
    decoder.close().unwrap();

    assert!(decoder.is_closed());
    assert_eq!(decoder.encoding_name(), None);
    assert_eq!(decoder.charset(), None);
    assert!(decoder.source_ref().is_none());
    assert!(matches!(decoder.read_char(), Err(Error::Closed)));
    assert!(matches!(
        decoder.read_into(&mut ['\0'; 4], 0, 4),
        Err(Error::Closed)
    ));
    assert!(matches!(
        decoder.read_to_string(&mut String::new()),
        Err(Error::Closed)
    ));
    assert!(matches!(decoder.skip(1), Err(Error::Closed)));
    assert!(matches!(decoder.is_ready(), Err(Error::Closed)));
    assert!(matches!(decoder.set_encoding("UTF-8"), Err(Error::Closed)));
    let mut chars = decoder.chars();
    assert!(matches!(chars.next(), Some(Err(Error::Closed))));
    assert!(chars.next().is_none());
}

#[test]
fn unsupported_encoding_keeps_previous_engine() {
    assert!(matches!(
        SwitchableDecoder::new(&b""[..], "not-a-real-encoding"),
        Err(Error::UnsupportedEncoding(_))
    ));
    assert!(matches!(
        SwitchableDecoder::new(&b""[..], ""),
        Err(Error::InvalidArgument(_))
    ));

    let mut decoder = SwitchableDecoder::new(&b"\x93\xfa\x96\x7b"[..], "Shift_JIS").unwrap();
    assert_eq!(decoder.read_char().unwrap(), Some('日'));
    assert!(matches!(
        decoder.set_encoding("not-a-real-encoding"),
        Err(Error::UnsupportedEncoding(l)) if l == "not-a-real-encoding"
    ));
    assert!(matches!(
        decoder.set_encoding(" "),
        Err(Error::InvalidArgument(_))
    ));
    assert_eq!(decoder.encoding_name(), Some("Shift_JIS"));
    assert_eq!(decoder.read_char().unwrap(), Some('本'));
}

#[test]
fn switch_between_writes_to_source() -> Result<(), Error> {
    let mut decoder = SwitchableDecoder::new(VecDeque::<u8>::new(), "EUC-JP")?;
    let mut dst = String::new();

    decoder.source_mut().unwrap().extend([0xc6, 0xfc, 0xcb, 0xdc]);
    assert!(decoder.is_ready()?);
    decoder.read_to_string(&mut dst)?;
    assert!(!decoder.is_ready()?);

    decoder.set_encoding(encoding_rs::UTF_16LE)?;
    decoder.source_mut().unwrap().extend([0x9e, 0x8a, 0x9e, 0x8a]);
    decoder.read_to_string(&mut dst)?;

    decoder.set_encoding("ISO-8859-1")?;
    decoder.source_mut().unwrap().extend([0xe9]);
    decoder.read_to_string(&mut dst)?;

    assert_eq!(dst, "日本語語\u{E9}");
    Ok(())
}

#[test]
fn preconfigured_decoder_keeps_residual_state() -> Result<(), Error> {
    let mut engine = encoding_rs::UTF_8.new_decoder_without_bom_handling();
    let mut prefix = String::with_capacity(16);
    let (_, read, _) = engine.decode_to_string(&[b'x', 0xe6, 0x97], &mut prefix, false);
    assert_eq!((read, prefix.as_str()), (3, "x"));

    // the engine still holds the first two bytes of U+65E5
    let mut decoder = SwitchableDecoder::new(&[0xa5, b'!'][..], engine)?;
    assert_eq!(decoder.read_char()?, Some('日'));
    assert_eq!(decoder.read_char()?, Some('!'));
    assert_eq!(decoder.read_char()?, None);
    Ok(())
}

#[test]
fn discard_drops_bytes_read_ahead() -> Result<(), Error> {
    let src: &[u8] = b"ab\xe9\xe9";
    let mut decoder = SwitchableDecoder::new(src, "windows-1252")?;
    assert_eq!(decoder.read_char()?, Some('a'));
    assert!(decoder.is_ready()?);

    decoder.set_encoding("UTF-8")?;
    assert!(!decoder.is_ready()?);
    assert_eq!(decoder.read_char()?, None);
    Ok(())
}

#[test]
fn retain_after_multi_char_reads_keeps_every_byte() -> Result<(), Error> {
    let src: &[u8] = b"A\xe4\xb8\x80\xe4\xb8\x80";
    let config = Config::default().carry_over(CarryOver::Retain);

    let mut decoder = SwitchableDecoder::with_config(src, "UTF-8", config)?;
    let mut buf = ['\0'; 2];
    assert_eq!(decoder.read_into(&mut buf, 0, 2)?, Some(2));
    assert_eq!(buf, ['A', '\u{4E00}']);
    decoder.set_encoding("latin1")?;
    let mut rest = String::new();
    decoder.read_to_string(&mut rest)?;
    assert_eq!(rest, "\u{E4}\u{B8}\u{80}");

    let mut decoder = SwitchableDecoder::with_config(src, "UTF-8", config)?;
    assert_eq!(decoder.skip(2)?, 2);
    decoder.set_encoding("latin1")?;
    let mut rest = String::new();
    decoder.read_to_string(&mut rest)?;
    assert_eq!(rest, "\u{E4}\u{B8}\u{80}");
    Ok(())
}

//! Compares the throughput of SwitchableDecoder in normal use cases.

#![feature(test)]

extern crate test;

use encoding_rs::SHIFT_JIS as Enc;
use encoding_rs_switch::*;

const TEXT: &str = include_str!("../src/tests/text_ja.txt");

#[bench]
fn decoder_read_to_string(b: &mut test::Bencher) {
    let src = test::black_box(encoded(TEXT));
    b.iter(|| {
        let mut decoder = SwitchableDecoder::new(&src[..], Enc).unwrap();
        let mut dst = String::new();
        decoder.read_to_string(&mut dst).unwrap();

        assert_eq!(dst, TEXT);
    });
}

#[bench]
fn decoder_read_into(b: &mut test::Bencher) {
    let src = test::black_box(encoded(TEXT));
    b.iter(|| {
        let mut decoder = SwitchableDecoder::new(&src[..], Enc).unwrap();
        let mut buf = ['\0'; 256];
        let mut count = 0;
        while let Some(n) = decoder.read_into(&mut buf, 0, 256).unwrap() {
            count += n;
        }

        assert_eq!(count, TEXT.chars().count());
    });
}

/// Reads character by character, the pattern of a caller scanning for an in-band declaration.
#[bench]
fn decoder_read_char(b: &mut test::Bencher) {
    let src = test::black_box(encoded(TEXT));
    b.iter(|| {
        let mut decoder = SwitchableDecoder::new(&src[..], Enc).unwrap();
        let mut dst = String::new();
        while let Some(c) = decoder.read_char().unwrap() {
            dst.push(c);
        }

        assert_eq!(dst, TEXT);
    });
}

#[bench]
fn decoder_report_malformed(b: &mut test::Bencher) {
    let src = test::black_box(encoded(TEXT));
    b.iter(|| {
        let config = Config::default().malformed(MalformedAction::Report);
        let mut decoder = SwitchableDecoder::with_config(&src[..], Enc, config).unwrap();
        let mut dst = String::new();
        decoder.read_to_string(&mut dst).unwrap();

        assert_eq!(dst, TEXT);
    });
}

#[bench]
fn raw_decoder(b: &mut test::Bencher) {
    let src = test::black_box(encoded(TEXT));
    b.iter(|| {
        let mut decoder = Enc.new_decoder_without_bom_handling();
        let mut dst = String::with_capacity(decoder.max_utf8_buffer_length(src.len()).unwrap());
        let (result, _, _) = decoder.decode_to_string(&src, &mut dst, true);
        assert!(matches!(result, encoding_rs::CoderResult::InputEmpty));

        assert_eq!(dst, TEXT);
    });
}

fn encoded(src: &str) -> Vec<u8> {
    let (bytes, _, unmappable) = Enc.encode(src);
    assert!(!unmappable);
    bytes.into_owned()
}

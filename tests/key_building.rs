//! Integration tests for multi-segment key construction, asserting on the
//! exact raw calls the builder hands the engine.

mod common;

use chrono::NaiveDate;

use colbind::engine::{key_grbit, seek_grbit, Cursor};
use colbind::keys::KeyBuilder;

use common::{FakeEngine, RawCall};

const CURSOR: Cursor = Cursor(3);

#[test]
fn scalar_segment_appends_fixed_width_bytes() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_i32(0x0403_0201, key_grbit::NEW_KEY).unwrap();

    assert_eq!(
        engine.calls(),
        vec![RawCall::AppendKeySegment {
            cursor: CURSOR,
            data: vec![0x01, 0x02, 0x03, 0x04],
            grbit: key_grbit::NEW_KEY,
        }]
    );
}

#[test]
fn multi_segment_key_appends_in_caller_order() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_i64(-1, key_grbit::NEW_KEY).unwrap();
    key.append_bool(true, key_grbit::NONE).unwrap();
    key.append_u8(0x7f, key_grbit::NONE).unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0],
        RawCall::AppendKeySegment {
            cursor: CURSOR,
            data: vec![0xff; 8],
            grbit: key_grbit::NEW_KEY,
        }
    );
    assert_eq!(
        calls[1],
        RawCall::AppendKeySegment {
            cursor: CURSOR,
            data: vec![0x01],
            grbit: key_grbit::NONE,
        }
    );
    assert_eq!(
        calls[2],
        RawCall::AppendKeySegment {
            cursor: CURSOR,
            data: vec![0x7f],
            grbit: key_grbit::NONE,
        }
    );
}

#[test]
fn new_key_flag_is_never_added_implicitly() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_i32(1, key_grbit::NONE).unwrap();

    match &engine.calls()[0] {
        RawCall::AppendKeySegment { grbit, .. } => {
            assert_eq!(grbit & key_grbit::NEW_KEY, 0);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn guid_segment_appends_all_sixteen_bytes() {
    let engine = FakeEngine::new();
    let guid = [0xabu8; 16];
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_guid(guid, key_grbit::NEW_KEY).unwrap();

    match &engine.calls()[0] {
        RawCall::AppendKeySegment { data, .. } => assert_eq!(data, &guid.to_vec()),
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn date_time_segment_appends_the_day_count_double() {
    let engine = FakeEngine::new();
    let value = NaiveDate::from_ymd_opt(1900, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_date_time(value, key_grbit::NEW_KEY).unwrap();

    match &engine.calls()[0] {
        RawCall::AppendKeySegment { data, .. } => {
            assert_eq!(data, &2.5f64.to_le_bytes().to_vec());
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn string_segment_encodes_with_the_requested_code_page() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_string(
        Some("ab"),
        colbind::column::text::code_page::UNICODE,
        key_grbit::NEW_KEY,
    )
    .unwrap();
    key.append_string(
        Some("ab"),
        colbind::column::text::code_page::ASCII,
        key_grbit::NONE,
    )
    .unwrap();

    let calls = engine.calls();
    match &calls[0] {
        RawCall::AppendKeySegment { data, .. } => {
            assert_eq!(data, &vec![0x61, 0x00, 0x62, 0x00]);
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &calls[1] {
        RawCall::AppendKeySegment { data, .. } => assert_eq!(data, b"ab"),
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn null_and_empty_string_segments_are_different_engine_calls() {
    let engine = FakeEngine::new();
    let cp = colbind::column::text::code_page::UNICODE;
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_string(None, cp, key_grbit::NEW_KEY).unwrap();
    key.append_string(Some(""), cp, key_grbit::NONE).unwrap();

    let calls = engine.calls();
    assert_eq!(
        calls[0],
        RawCall::AppendKeySegment {
            cursor: CURSOR,
            data: vec![],
            grbit: key_grbit::NEW_KEY | key_grbit::NULL_SEGMENT,
        }
    );
    assert_eq!(
        calls[1],
        RawCall::AppendKeySegment {
            cursor: CURSOR,
            data: vec![],
            grbit: key_grbit::ZERO_LENGTH,
        }
    );
}

#[test]
fn null_and_empty_byte_segments_are_different_engine_calls() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_bytes(None, key_grbit::NEW_KEY).unwrap();
    key.append_bytes(Some(&[]), key_grbit::NONE).unwrap();
    key.append_bytes(Some(&[0xaa, 0xbb]), key_grbit::NONE).unwrap();

    let calls = engine.calls();
    match &calls[0] {
        RawCall::AppendKeySegment { data, grbit, .. } => {
            assert!(data.is_empty());
            assert_eq!(*grbit, key_grbit::NEW_KEY | key_grbit::NULL_SEGMENT);
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &calls[1] {
        RawCall::AppendKeySegment { data, grbit, .. } => {
            assert!(data.is_empty());
            assert_eq!(*grbit, key_grbit::ZERO_LENGTH);
        }
        other => panic!("unexpected call {other:?}"),
    }
    match &calls[2] {
        RawCall::AppendKeySegment { data, grbit, .. } => {
            assert_eq!(data, &vec![0xaa, 0xbb]);
            assert_eq!(*grbit, key_grbit::NONE);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn explicit_null_segment_carries_the_null_flag() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_null(key_grbit::NEW_KEY).unwrap();

    match &engine.calls()[0] {
        RawCall::AppendKeySegment { data, grbit, .. } => {
            assert!(data.is_empty());
            assert_eq!(*grbit, key_grbit::NEW_KEY | key_grbit::NULL_SEGMENT);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn partial_remainder_flag_passes_through_untouched() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_i16(9, key_grbit::NEW_KEY | key_grbit::PARTIAL_REMAINDER)
        .unwrap();

    match &engine.calls()[0] {
        RawCall::AppendKeySegment { grbit, .. } => {
            assert_eq!(*grbit, key_grbit::NEW_KEY | key_grbit::PARTIAL_REMAINDER);
        }
        other => panic!("unexpected call {other:?}"),
    }
}

#[test]
fn unsupported_code_page_fails_before_any_engine_call() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    assert!(key.append_string(Some("x"), 65001, key_grbit::NEW_KEY).is_err());
    // the code page is checked even when there is nothing to encode
    assert!(key.append_string(None, 1201, key_grbit::NEW_KEY).is_err());

    assert_eq!(engine.call_count(), 0);
}

#[test]
fn seek_consumes_the_builder_and_issues_the_raw_seek() {
    let engine = FakeEngine::new();
    let mut key = KeyBuilder::new(&engine, CURSOR);

    key.append_i32(42, key_grbit::NEW_KEY).unwrap();
    key.seek(seek_grbit::GE).unwrap();

    let calls = engine.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(
        calls[1],
        RawCall::Seek {
            cursor: CURSOR,
            grbit: seek_grbit::GE,
        }
    );
}

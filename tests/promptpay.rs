use rust_decimal::Decimal;
use smartbudget::promptpay::{
    compute_crc16, decode, encode, parse_fields, IdKind, InitiationMethod, InitiationPolicy,
    PromptPayEncoder, PromptPayError, TAG_AMOUNT, TAG_MERCHANT_ACCOUNT,
};

const STATIC_MOBILE: &str =
    "00020101021129370016A0000006770101110113006681234567853037645802TH6304823E";
const MOBILE_100_BAHT: &str =
    "00020101021129370016A0000006770101110113006681234567853037645406100.005802TH63045169";

/// Walks every field, descending into the merchant account field, and checks
/// that declared lengths match the values.
fn assert_lengths_consistent(payload: &str) {
    let fields = parse_fields(payload).unwrap();
    let rebuilt: String = fields
        .iter()
        .map(|f| format!("{}{:02}{}", f.tag, f.value.len(), f.value))
        .collect();
    assert_eq!(rebuilt, payload);

    let merchant = fields
        .iter()
        .find(|f| f.tag == TAG_MERCHANT_ACCOUNT)
        .unwrap();
    let inner: String = parse_fields(merchant.value)
        .unwrap()
        .iter()
        .map(|f| format!("{}{:02}{}", f.tag, f.value.len(), f.value))
        .collect();
    assert_eq!(inner, merchant.value);
}

#[test]
fn test_known_vectors() {
    assert_eq!(encode("0812345678", Decimal::ZERO).unwrap(), STATIC_MOBILE);
    assert_eq!(encode("0812345678", Decimal::from(100)).unwrap(), MOBILE_100_BAHT);
    assert_eq!(
        encode("1234567890123", Decimal::ZERO).unwrap(),
        "00020101021129370016A0000006770101110113123456789012353037645802TH6304B5B9"
    );
    assert_eq!(
        encode("123456789012345", Decimal::ZERO).unwrap(),
        "00020101021129390016A000000677010111011512345678901234553037645802TH63046279"
    );
}

#[test]
fn test_mobile_number_transform() {
    let payload = encode("0812345678", Decimal::ZERO).unwrap();
    assert!(payload.contains("66812345678"));
    assert!(!payload.contains("0812345678"));
}

#[test]
fn test_national_id_passthrough() {
    let payload = encode("1234567890123", Decimal::ZERO).unwrap();
    assert!(payload.contains("01131234567890123"));
}

#[test]
fn test_amount_field_omission() {
    let without = encode("0812345678", Decimal::ZERO).unwrap();
    assert!(parse_fields(&without)
        .unwrap()
        .iter()
        .all(|f| f.tag != TAG_AMOUNT));

    let with = encode("0812345678", Decimal::from(100)).unwrap();
    assert!(with.contains("5406100.00"));
}

#[test]
fn test_float_amount_matches_decimal() {
    let encoder = PromptPayEncoder::default();
    assert_eq!(encoder.encode_f64("0812345678", 100.0).unwrap(), MOBILE_100_BAHT);
    assert_eq!(
        encoder.encode_f64("0812345678", 0.0).unwrap(),
        STATIC_MOBILE
    );
}

#[test]
fn test_empty_identifier_fails() {
    for identifier in ["", "   ", "--", "abc"] {
        assert!(matches!(
            encode(identifier, Decimal::ZERO),
            Err(PromptPayError::InvalidIdentifier(_))
        ));
    }
}

#[test]
fn test_lengths_consistent_for_all_identifier_lengths() {
    for len in 1..=99 {
        let identifier = "7".repeat(len);
        match encode(&identifier, Decimal::new(4250, 2)) {
            Ok(payload) => {
                assert!(payload.is_ascii());
                assert_lengths_consistent(&payload);
            }
            Err(err) => {
                assert!(len > 75, "length {len} failed: {err}");
                assert!(matches!(err, PromptPayError::InvalidIdentifier(_)));
            }
        }
    }
}

#[test]
fn test_crc_covers_everything_before_it() {
    let payload = encode("0891112222", Decimal::new(5075, 2)).unwrap();
    let (body, crc) = payload.split_at(payload.len() - 4);
    assert!(body.ends_with("6304"));
    assert_eq!(crc, compute_crc16(body));
    assert_eq!(compute_crc16(body), compute_crc16(body));
}

#[test]
fn test_decode_reverses_encode() {
    let encoder = PromptPayEncoder::new(InitiationPolicy::DynamicWhenAmount);
    let payload = encoder.encode("089-111-2222", Decimal::new(5075, 2)).unwrap();

    let decoded = decode(&payload).unwrap();
    assert_eq!(decoded.recovered_identifier, "0891112222");
    assert_eq!(decoded.id_kind, IdKind::MobileNumber);
    assert_eq!(decoded.initiation, InitiationMethod::Dynamic);
    assert_eq!(decoded.amount, Some(Decimal::new(5075, 2)));
}

#[test]
fn test_static_policy_keeps_11_with_amount() {
    let payload = encode("0812345678", Decimal::from(100)).unwrap();
    assert_eq!(decode(&payload).unwrap().initiation, InitiationMethod::Static);
}

#[test]
fn test_single_character_change_is_detected() {
    let mut bytes = MOBILE_100_BAHT.as_bytes().to_vec();
    bytes[60] = b'9';
    let tampered = String::from_utf8(bytes).unwrap();
    assert_ne!(tampered, MOBILE_100_BAHT);
    assert!(matches!(
        decode(&tampered),
        Err(PromptPayError::ChecksumMismatch { .. })
    ));
}

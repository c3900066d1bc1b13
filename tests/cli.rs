use std::path::Path;
use std::process::{Command, Output};

fn smartbudget(args: &[&str], cache: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_smartbudget"))
        .args(args)
        .env("PROMPTPAY_CACHE_PATH", cache)
        .env("LOG_LEVEL", "ERROR")
        .env_remove("PROMPTPAY_ID")
        .env_remove("PROMPTPAY_INITIATION")
        .output()
        .expect("Failed to run smartbudget")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

#[test]
fn test_qr_remembers_identifier() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("promptpay_id");

    let first = smartbudget(&["qr", "081-234-5678", "--amount", "100"], &cache);
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert_eq!(
        stdout(&first),
        "00020101021129370016A0000006770101110113006681234567853037645406100.005802TH63045169"
    );

    let second = smartbudget(&["qr"], &cache);
    assert!(second.status.success());
    assert_eq!(
        stdout(&second),
        "00020101021129370016A0000006770101110113006681234567853037645802TH6304823E"
    );
}

#[test]
fn test_qr_without_digits_prints_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("promptpay_id");

    let output = smartbudget(&["qr", "   "], &cache);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot generate payment code"));
    assert!(!cache.exists());
}

#[test]
fn test_decode_rejects_bad_checksum() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("promptpay_id");

    let ok = smartbudget(
        &[
            "decode",
            "00020101021129370016A0000006770101110113006681234567853037645802TH6304823E",
        ],
        &cache,
    );
    assert!(ok.status.success());
    assert!(stdout(&ok).contains("0812345678"));

    let bad = smartbudget(
        &[
            "decode",
            "00020101021129370016A0000006770101110113006681234567853037645802TH63040000",
        ],
        &cache,
    );
    assert!(!bad.status.success());
    assert!(String::from_utf8_lossy(&bad.stderr).contains("checksum mismatch"));
}

#[test]
fn test_statement_with_payment_code() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("promptpay_id");
    let budget = dir.path().join("budget.json");
    std::fs::write(
        &budget,
        r#"{
            "salary": 20000,
            "expenses": [
                { "id": "0d5b3c1e-6f38-4a51-9d0b-2b4c1f1c8a01", "category": "HOUSING",
                  "amount": 60, "description": "Rent share", "date": "2024-05-01" },
                { "id": "0d5b3c1e-6f38-4a51-9d0b-2b4c1f1c8a02", "category": "อาหารและเครื่องดื่ม",
                  "amount": 40, "description": "Dinner", "date": "2024-05-02" }
            ]
        }"#,
    )
    .unwrap();

    let output = smartbudget(
        &[
            "statement",
            budget.to_str().unwrap(),
            "--promptpay",
            "0812345678",
        ],
        &cache,
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = stdout(&output);
    assert!(text.contains("● Rent share"));
    assert!(text.contains("○ Dinner"));
    assert!(text.contains("฿19,900.00"));
    assert!(text.contains("5406100.00"));
}

#[test]
fn test_calc() {
    let dir = tempfile::tempdir().unwrap();
    let output = smartbudget(&["calc", "1500", "x", "3", "-", "200"], &dir.path().join("id"));
    assert!(output.status.success());
    assert_eq!(stdout(&output), "4300");
}

#[test]
fn test_statement_rejects_out_of_range_totals() {
    let dir = tempfile::tempdir().unwrap();
    let cache = dir.path().join("promptpay_id");
    let budget = dir.path().join("budget.json");
    std::fs::write(
        &budget,
        r#"{
            "salary": 0,
            "expenses": [
                { "id": "a1", "category": "FOOD", "amount": "50000000000000000000000000000",
                  "description": "one", "date": "2024-05-01" },
                { "id": "a2", "category": "FOOD", "amount": "50000000000000000000000000000",
                  "description": "two", "date": "2024-05-02" }
            ]
        }"#,
    )
    .unwrap();

    let output = smartbudget(&["statement", budget.to_str().unwrap()], &cache);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("budget totals are out of range"));
}

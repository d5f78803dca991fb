use super::*;
use crate::store::MemoryStore;

fn register_input(name: &str, email: &str, password: &str) -> RegisterInput {
    RegisterInput { name: name.into(), email: email.into(), password: password.into() }
}

fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput { email: email.into(), password: password.into() }
}

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email("  Ada@Example.COM "), Some("ada@example.com".into()));
}

#[test]
fn normalize_email_rejects_malformed() {
    for bad in ["", "no-at-sign", "@example.com", "ada@", "a@b@c"] {
        assert_eq!(normalize_email(bad), None, "{bad:?} should be rejected");
    }
}

// =============================================================================
// password hashing
// =============================================================================

#[test]
fn hash_is_argon2id_phc_string() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2id$"), "{hash}");
    let parsed = PasswordHash::new(&hash).unwrap();
    assert_eq!(parsed.algorithm.as_str(), "argon2id");
    assert!(parsed.salt.is_some());
    assert!(!hash.contains("hunter2"));
}

#[test]
fn same_password_gets_different_salts() {
    assert_ne!(hash_password("hunter2").unwrap(), hash_password("hunter2").unwrap());
}

#[test]
fn verify_accepts_right_and_rejects_wrong() {
    let hash = hash_password("correct horse").unwrap();
    assert!(verify_password("correct horse", &hash));
    assert!(!verify_password("correct horse ", &hash));
    assert!(!verify_password("", &hash));
}

#[test]
fn verify_rejects_malformed_hashes() {
    assert!(!verify_password("x", ""));
    assert!(!verify_password("x", "no-separator"));
    assert!(!verify_password("x", "00$00"));
    assert!(!verify_password("x", "$argon2id$v=19$garbage"));
}

#[tokio::test]
async fn stored_hash_is_phc_not_plaintext() {
    let store = MemoryStore::new();
    register(&store, register_input("Ada", "ada@example.com", "pw")).await.unwrap();
    let stored = store.find_user("ada@example.com").await.unwrap().unwrap();
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert!(verify_password("pw", &stored.password_hash));
}

// =============================================================================
// register / login
// =============================================================================

#[tokio::test]
async fn login_fails_before_registration_and_succeeds_after() {
    let store = MemoryStore::new();
    let before = login(&store, login_input("ada@example.com", "pw")).await;
    assert!(matches!(before, Err(AuthError::UnknownUser)));

    register(&store, register_input("Ada", "Ada@Example.com", "pw")).await.unwrap();

    let user = login(&store, login_input("ada@example.com", "pw")).await.unwrap();
    assert_eq!(user.name, "Ada");
    assert_eq!(user.email, "ada@example.com");
    assert_eq!(user.theme, Theme::Light);

    let json = serde_json::to_value(&user).unwrap();
    assert!(json.get("password").is_none());
    assert!(json.get("passwordHash").is_none());
}

#[tokio::test]
async fn wrong_password_is_distinct_from_unknown_user() {
    let store = MemoryStore::new();
    register(&store, register_input("Ada", "ada@example.com", "pw")).await.unwrap();
    let result = login(&store, login_input("ada@example.com", "nope")).await;
    assert!(matches!(result, Err(AuthError::WrongPassword)));
}

#[tokio::test]
async fn duplicate_registration_is_rejected_case_insensitively() {
    let store = MemoryStore::new();
    register(&store, register_input("Ada", "ada@example.com", "pw")).await.unwrap();
    let again = register(&store, register_input("Imposter", "ADA@example.com", "other")).await;
    assert!(matches!(again, Err(AuthError::EmailTaken)));
    // original credentials still work
    assert!(login(&store, login_input("ada@example.com", "pw")).await.is_ok());
}

#[tokio::test]
async fn register_validates_fields() {
    let store = MemoryStore::new();
    assert!(matches!(
        register(&store, register_input("  ", "a@b.c", "pw")).await,
        Err(AuthError::Invalid(_))
    ));
    assert!(matches!(
        register(&store, register_input("Ada", "not-an-email", "pw")).await,
        Err(AuthError::Invalid(_))
    ));
    assert!(matches!(
        register(&store, register_input("Ada", "a@b.c", "")).await,
        Err(AuthError::Invalid(_))
    ));
    assert!(store.find_user("a@b.c").await.unwrap().is_none());
}

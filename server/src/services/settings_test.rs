use super::*;
use crate::services::auth::{self, LoginInput, RegisterInput};
use crate::store::MemoryStore;

fn theme_input(email: &str, theme: &str) -> ThemeInput {
    ThemeInput { user_email: email.into(), theme: theme.into() }
}

#[tokio::test]
async fn theme_persists_for_login() {
    let store = MemoryStore::new();
    let register = RegisterInput { name: "Ada".into(), email: "ada@example.com".into(), password: "pw".into() };
    auth::register(&store, register).await.unwrap();

    assert_eq!(set_theme(&store, theme_input("Ada@example.com", "dark")).await.unwrap(), Theme::Dark);

    let login = LoginInput { email: "ada@example.com".into(), password: "pw".into() };
    assert_eq!(auth::login(&store, login).await.unwrap().theme, Theme::Dark);
}

#[tokio::test]
async fn unknown_theme_is_invalid() {
    let store = MemoryStore::new();
    for bad in ["", "Dark", "solarized"] {
        assert!(matches!(set_theme(&store, theme_input("ada@example.com", bad)).await, Err(SettingsError::Invalid(_))));
    }
}

#[tokio::test]
async fn unknown_user_is_a_quiet_no_op() {
    let store = MemoryStore::new();
    assert_eq!(set_theme(&store, theme_input("ghost@example.com", "light")).await.unwrap(), Theme::Light);
}

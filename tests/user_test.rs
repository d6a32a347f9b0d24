use shine_store::auth::user::{User, UserRole};

#[test]
fn test_user_creation_defaults_to_user_role() {
    let user = User::new(
        "Ana".to_string(),
        "ana@x.com".to_string(),
        "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
    );
    assert_eq!(user.name, "Ana");
    assert_eq!(user.email, "ana@x.com");
    assert_eq!(user.role, UserRole::User);
}

#[test]
fn test_profile_omits_password_hash() {
    let user = User::new(
        "Ana".to_string(),
        "ana@x.com".to_string(),
        "$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA".to_string(),
    );
    let profile = serde_json::to_value(user.profile()).unwrap();

    assert_eq!(profile["name"], "Ana");
    assert_eq!(profile["role"], "user");
    assert!(!profile.to_string().contains("argon2"));
}

#[test]
fn test_role_serialization() {
    assert_eq!(serde_json::to_value(UserRole::User).unwrap(), "user");
    assert_eq!(serde_json::to_value(UserRole::Admin).unwrap(), "admin");
    assert_eq!(
        serde_json::from_value::<UserRole>(serde_json::json!("admin")).unwrap(),
        UserRole::Admin
    );
    assert!(serde_json::from_value::<UserRole>(serde_json::json!("owner")).is_err());
}

#[test]
fn test_stored_record_uses_password_field() {
    let user = User::new("Ana".to_string(), "ana@x.com".to_string(), "hash".to_string());
    let record = serde_json::to_value(&user).unwrap();
    assert_eq!(record["password"], "hash");
    assert_eq!(record["role"], "user");
}

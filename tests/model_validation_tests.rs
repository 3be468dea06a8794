use cip_portal::{
    models::{USER_IMAGE_PLACEHOLDER, User},
    schema::to_persisted_map,
};

const TRANSIENT_JSON_KEYS: [&str; 5] = [
    "confirmPassword",
    "uid",
    "message",
    "userImage",
    "userFullName",
];

#[test]
fn user_image_defaults_to_a_single_space() {
    let user = User::default();

    assert_eq!(user.user_image.as_deref(), Some(" "));
    assert_eq!(USER_IMAGE_PLACEHOLDER, " ");
}

#[test]
fn deserializing_without_user_image_keeps_the_placeholder() {
    let user: User = serde_json::from_str(r#"{"name":"Ada"}"#).unwrap();

    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(user.user_image.as_deref(), Some(" "));
    assert_eq!(user.id, 0);
}

#[test]
fn json_uses_camel_case_field_names() {
    let user = User {
        last_name: Some("Lovelace".to_string()),
        phone_number: Some("555".to_string()),
        user_full_name: Some("Ada Lovelace".to_string()),
        ..User::default()
    };

    let json = serde_json::to_value(&user).unwrap();

    assert_eq!(json["lastName"], "Lovelace");
    assert_eq!(json["phoneNumber"], "555");
    assert_eq!(json["userFullName"], "Ada Lovelace");
    assert!(json.get("last_name").is_none());
}

#[test]
fn persistence_serialization_never_emits_transient_fields() {
    // Only persisted fields set.
    let user = User {
        id: 3,
        name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        phone_number: Some("555-0100".to_string()),
        email_address: Some("grace@example.com".to_string()),
        user_type: Some("Admin".to_string()),
        password: Some("cobol".to_string()),
        ..User::default()
    };

    let map = to_persisted_map(&user);
    let serialized = serde_json::to_string(&map).unwrap();

    assert_eq!(map.len(), 7);
    for key in TRANSIENT_JSON_KEYS {
        assert!(!serialized.contains(key), "{key} serialized for persistence");
    }
    for column in ["ConfirmPassword", "Uid", "Message", "UserImage", "UserFullName"] {
        assert!(!map.contains_key(column));
    }
    assert_eq!(map["EmailAddress"], "grace@example.com");
}

#[test]
fn redacted_clears_credentials_only() {
    let user = User {
        name: Some("Ada".to_string()),
        password: Some("pw".to_string()),
        confirm_password: Some("pw".to_string()),
        ..User::default()
    }
    .redacted();

    assert_eq!(user.password, None);
    assert_eq!(user.confirm_password, None);
    assert_eq!(user.name.as_deref(), Some("Ada"));
    assert_eq!(user.user_image.as_deref(), Some(" "));
}

#[test]
fn password_and_confirmation_are_not_cross_checked() {
    // Mismatched confirmation is carried as-is; no validation ties the two fields.
    let user: User =
        serde_json::from_str(r#"{"password":"a","confirmPassword":"b"}"#).unwrap();

    assert_eq!(user.password.as_deref(), Some("a"));
    assert_eq!(user.confirm_password.as_deref(), Some("b"));
}

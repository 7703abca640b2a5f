mod support;

use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use silhouette::entities::{addresses as address_rows, phones as phone_rows, profiles};
use silhouette::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use silhouette::repos::addresses::{self, NewAddress};
use silhouette::repos::phones::{self, NewPhone};
use silhouette::repos::profiles::{self as profile_repo, NewProfile, ProfileChanges};
use silhouette::repos::xref;
use support::test_state::test_db;
use support::test_crypto;
use tokio_util::sync::CancellationToken;

fn new_address(line_1: &str) -> NewAddress {
    NewAddress {
        address_line_1: line_1.to_string(),
        address_line_2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        zip: "62701".to_string(),
        country: "US".to_string(),
        is_current: false,
    }
}

fn new_phone(number: &str) -> NewPhone {
    NewPhone {
        country_code: Some("1".to_string()),
        phone_number: number.to_string(),
        extension: None,
        phone_type: "mobile".to_string(),
        is_current: false,
    }
}

/// Flips one base64 character inside the nonce so the value still decodes
/// but no longer authenticates.
fn corrupt(ciphertext: &str) -> String {
    let mut chars: Vec<char> = ciphertext.chars().collect();
    chars[10] = if chars[10] == 'A' { 'B' } else { 'A' };
    chars.into_iter().collect()
}

async fn profile_for(
    conn: &sea_orm::DatabaseConnection,
    crypto: &silhouette::RecordCrypto,
    username: &str,
) -> profile_repo::Profile {
    profile_repo::create_profile(
        conn,
        crypto,
        &CancellationToken::new(),
        NewProfile {
            username: username.to_string(),
            nickname: None,
            dark_mode: false,
        },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn stores_username_sealed_and_indexed() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();

    let created = profile_repo::create_profile(
        &conn,
        &crypto,
        &cancel,
        NewProfile {
            username: "alice@example.com".to_string(),
            nickname: Some("Alice".to_string()),
            dark_mode: true,
        },
    )
    .await
    .unwrap();

    let stored = profiles::Entity::find_by_id(created.id.clone())
        .one(&conn)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(stored.username, "alice@example.com");
    assert_eq!(
        stored.user_index,
        crypto.blind_index("alice@example.com").unwrap()
    );

    let fetched = profile_repo::get_profile(&conn, &crypto, &cancel, "alice@example.com")
        .await
        .unwrap();
    assert_eq!(fetched.username, "alice@example.com");
    assert_eq!(fetched.nickname.as_deref(), Some("Alice"));
    assert!(profile_repo::profile_exists(&conn, &crypto, "alice@example.com")
        .await
        .unwrap());
    assert!(!profile_repo::profile_exists(&conn, &crypto, "bob@example.com")
        .await
        .unwrap());
}

#[tokio::test]
async fn complete_profile_collapses_joined_rows() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();

    let profile = profile_repo::create_profile(
        &conn,
        &crypto,
        &cancel,
        NewProfile {
            username: "carol@example.com".to_string(),
            nickname: None,
            dark_mode: false,
        },
    )
    .await
    .unwrap();

    for line in ["1 Main St", "2 Elm St"] {
        let address = addresses::create_address(&conn, &crypto, &cancel, new_address(line))
            .await
            .unwrap();
        xref::link_address(&conn, &profile.id, &address.id).await.unwrap();
    }
    for number in ["5550001", "5550002", "5550003"] {
        let phone = phones::create_phone(&conn, &crypto, &cancel, new_phone(number))
            .await
            .unwrap();
        xref::link_phone(&conn, &profile.id, &phone.id).await.unwrap();
    }

    let complete = profile_repo::get_complete_profile(&conn, &crypto, &cancel, "carol@example.com")
        .await
        .unwrap();
    assert_eq!(complete.profile.username, "carol@example.com");
    assert_eq!(complete.addresses.len(), 2);
    assert_eq!(complete.phones.len(), 3);

    let mut lines: Vec<_> = complete
        .addresses
        .iter()
        .map(|a| a.address_line_1.as_str())
        .collect();
    lines.sort_unstable();
    assert_eq!(lines, ["1 Main St", "2 Elm St"]);
    assert!(complete.phones.iter().all(|p| p.phone_type == "mobile"));
}

#[tokio::test]
async fn complete_profile_without_children_has_empty_lists() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();

    profile_repo::create_profile(
        &conn,
        &crypto,
        &cancel,
        NewProfile {
            username: "dave@example.com".to_string(),
            nickname: None,
            dark_mode: true,
        },
    )
    .await
    .unwrap();

    let complete = profile_repo::get_complete_profile(&conn, &crypto, &cancel, "dave@example.com")
        .await
        .unwrap();
    assert!(complete.addresses.is_empty());
    assert!(complete.phones.is_empty());
}

#[tokio::test]
async fn missing_profile_is_not_found() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();

    let err = profile_repo::get_complete_profile(&conn, &crypto, &cancel, "nobody@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Profile, _)));
}

#[tokio::test]
async fn update_then_delete() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();

    let profile = profile_repo::create_profile(
        &conn,
        &crypto,
        &cancel,
        NewProfile {
            username: "erin@example.com".to_string(),
            nickname: Some("Erin".to_string()),
            dark_mode: true,
        },
    )
    .await
    .unwrap();

    let updated = profile_repo::update_profile(
        &conn,
        &crypto,
        &cancel,
        &profile.id,
        ProfileChanges {
            nickname: Some(None),
            dark_mode: Some(false),
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.nickname, None);
    assert!(!updated.dark_mode);
    assert_eq!(updated.username, "erin@example.com");

    profile_repo::delete_profile(&conn, &profile.id).await.unwrap();
    assert!(!profile_repo::profile_exists(&conn, &crypto, "erin@example.com")
        .await
        .unwrap());

    let err = profile_repo::delete_profile(&conn, &profile.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Profile, _)));
}

#[tokio::test]
async fn unlinking_a_profile_keeps_the_linked_records() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();
    let profile = profile_for(&conn, &crypto, "frank@example.com").await;

    let mut address_slugs = Vec::new();
    for line in ["1 Main St", "2 Elm St"] {
        let address = addresses::create_address(&conn, &crypto, &cancel, new_address(line))
            .await
            .unwrap();
        xref::link_address(&conn, &profile.id, &address.id).await.unwrap();
        address_slugs.push(address.slug);
    }
    let mut phone_slugs = Vec::new();
    for number in ["5550001", "5550002", "5550003"] {
        let phone = phones::create_phone(&conn, &crypto, &cancel, new_phone(number))
            .await
            .unwrap();
        xref::link_phone(&conn, &profile.id, &phone.id).await.unwrap();
        phone_slugs.push(phone.slug);
    }

    assert_eq!(xref::unlink_profile_addresses(&conn, &profile.id).await.unwrap(), 2);
    assert_eq!(xref::unlink_profile_phones(&conn, &profile.id).await.unwrap(), 3);
    assert_eq!(xref::unlink_profile_phones(&conn, &profile.id).await.unwrap(), 0);

    let complete = profile_repo::get_complete_profile(&conn, &crypto, &cancel, "frank@example.com")
        .await
        .unwrap();
    assert!(complete.addresses.is_empty());
    assert!(complete.phones.is_empty());

    assert_eq!(address_rows::Entity::find().all(&conn).await.unwrap().len(), 2);
    assert_eq!(phone_rows::Entity::find().all(&conn).await.unwrap().len(), 3);
    for slug in &address_slugs {
        addresses::get_address(&conn, &crypto, &cancel, slug, None)
            .await
            .unwrap();
        let err =
            addresses::get_address(&conn, &crypto, &cancel, slug, Some("frank@example.com"))
                .await
                .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(NotFoundKind::Address, _)));
    }
    for slug in &phone_slugs {
        let phone = phones::get_phone(&conn, &crypto, &cancel, slug, None)
            .await
            .unwrap();
        assert_eq!(phone.phone_type, "mobile");
    }
}

#[tokio::test]
async fn one_bad_phone_field_fails_the_whole_read() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();
    let profile = profile_for(&conn, &crypto, "grace@example.com").await;

    let phone = phones::create_phone(&conn, &crypto, &cancel, new_phone("5550199"))
        .await
        .unwrap();
    xref::link_phone(&conn, &profile.id, &phone.id).await.unwrap();
    let address = addresses::create_address(&conn, &crypto, &cancel, new_address("9 Oak St"))
        .await
        .unwrap();
    xref::link_address(&conn, &profile.id, &address.id).await.unwrap();

    let row = phone_rows::Entity::find_by_id(phone.id.clone())
        .one(&conn)
        .await
        .unwrap()
        .unwrap();
    let mut tampered: phone_rows::ActiveModel = row.clone().into();
    tampered.phone_number = Set("***not base64***".to_string());
    tampered.phone_type = Set(corrupt(&row.phone_type));
    tampered.update(&conn).await.unwrap();

    let err = phones::get_phone(&conn, &crypto, &cancel, &phone.slug, None)
        .await
        .unwrap_err();
    let DomainError::Infra(InfraErrorKind::Crypto, detail) = &err else {
        panic!("expected a crypto failure, got {err:?}");
    };
    assert!(detail.contains("phone_number"));
    assert!(detail.contains("phone_type"));
    assert!(!detail.contains("country_code"));
    assert!(!detail.contains("5550199"));
    assert!(!detail.contains("mobile"));

    let err = profile_repo::get_complete_profile(&conn, &crypto, &cancel, "grace@example.com")
        .await
        .unwrap_err();
    let DomainError::Infra(InfraErrorKind::Crypto, complete_detail) = &err else {
        panic!("expected a crypto failure, got {err:?}");
    };
    assert!(complete_detail.contains("phone_number"));
    assert!(complete_detail.contains("phone_type"));
    assert!(!complete_detail.contains("5550199"));
}

#[tokio::test]
async fn one_bad_address_field_fails_the_whole_read() {
    let conn = test_db().await;
    let crypto = test_crypto();
    let cancel = CancellationToken::new();
    let profile = profile_for(&conn, &crypto, "heidi@example.com").await;

    let address = addresses::create_address(&conn, &crypto, &cancel, new_address("7 Pine St"))
        .await
        .unwrap();
    xref::link_address(&conn, &profile.id, &address.id).await.unwrap();

    let row = address_rows::Entity::find_by_id(address.id.clone())
        .one(&conn)
        .await
        .unwrap()
        .unwrap();
    let mut tampered: address_rows::ActiveModel = row.clone().into();
    tampered.city = Set(corrupt(&row.city));
    tampered.update(&conn).await.unwrap();

    let err = addresses::get_address(
        &conn,
        &crypto,
        &cancel,
        &address.slug,
        Some("heidi@example.com"),
    )
    .await
    .unwrap_err();
    let DomainError::Infra(InfraErrorKind::Crypto, detail) = &err else {
        panic!("expected a crypto failure, got {err:?}");
    };
    assert!(detail.contains("city"));
    assert!(!detail.contains("address_line_1"));
    assert!(!detail.contains("Springfield"));

    let err = profile_repo::get_complete_profile(&conn, &crypto, &cancel, "heidi@example.com")
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Infra(InfraErrorKind::Crypto, _)));
}

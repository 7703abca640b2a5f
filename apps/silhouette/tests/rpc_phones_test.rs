mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::json;
use silhouette::protocol::messages::{PhoneResponse, ProfileResponse};
use silhouette::protocol::methods;
use silhouette_test_support::problem_details::assert_problem_details_from_service_response;
use silhouette_test_support::unique_helpers::unique_username;
use support::rpc::{as_service, as_user, as_user_with_scopes};
use support::{build_test_state, create_test_app};

async fn seed_profile<S>(app: &S, username: &str)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<actix_web::body::BoxBody>,
        Error = actix_web::Error,
    >,
{
    let req = as_service(methods::CREATE_PROFILE, &json!({"username": username})).to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn owner_creates_reads_and_updates_phone() {
    let app = create_test_app(build_test_state().await).await;
    let username = unique_username("alice");
    seed_profile(&app, &username).await;

    let req = as_user(
        methods::CREATE_PHONE,
        &json!({
            "username": username,
            "country_code": "+1",
            "phone_number": "(555) 123-4567",
            "phone_type": "PHONE_TYPE_MOBILE",
            "is_current": true
        }),
        &username,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: PhoneResponse = test::read_body_json(resp).await;
    assert_eq!(created.phone_number, "5551234567");
    assert_eq!(created.country_code.as_deref(), Some("1"));
    assert_eq!(created.phone_type, "mobile");
    assert!(created.is_current);

    let req = as_user(
        methods::GET_PHONE,
        &json!({"username": username, "slug": created.slug}),
        &username,
    )
    .to_request();
    let fetched: PhoneResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched.slug, created.slug);
    assert_eq!(fetched.phone_number, created.phone_number);
    assert_eq!(fetched.country_code, created.country_code);
    assert_eq!(fetched.extension, None);

    let req = as_user(
        methods::UPDATE_PHONE,
        &json!({
            "username": username,
            "slug": created.slug,
            "country_code": "1",
            "phone_number": "5551234567",
            "extension": "42",
            "phone_type": "work",
            "is_current": false
        }),
        &username,
    )
    .to_request();
    let updated: PhoneResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated.slug, created.slug);
    assert_eq!(updated.extension.as_deref(), Some("42"));
    assert_eq!(updated.phone_type, "work");
    assert!(!updated.is_current);

    let req = as_user(methods::GET_PROFILE, &json!({"username": username}), &username).to_request();
    let profile: ProfileResponse = test::call_and_read_body_json(&app, req).await;
    assert_eq!(profile.phones.len(), 1);
    assert_eq!(profile.phones[0].slug, created.slug);
}

#[actix_web::test]
async fn delete_requires_ownership_or_scope() {
    let app = create_test_app(build_test_state().await).await;
    let alice = unique_username("alice");
    let bob = unique_username("bob");
    let admin = unique_username("admin");
    seed_profile(&app, &alice).await;

    let phone_body = |number: &str| {
        json!({"username": alice, "phone_number": number, "phone_type": "home"})
    };
    let first: PhoneResponse = test::call_and_read_body_json(
        &app,
        as_user(methods::CREATE_PHONE, &phone_body("5550001"), &alice).to_request(),
    )
    .await;
    let second: PhoneResponse = test::call_and_read_body_json(
        &app,
        as_user(methods::CREATE_PHONE, &phone_body("5550002"), &alice).to_request(),
    )
    .await;

    // Self-access only covers your own records.
    let req = as_user(
        methods::DELETE_PHONE,
        &json!({"username": alice, "slug": first.slug}),
        &bob,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "PERMISSION_DENIED",
        StatusCode::FORBIDDEN,
        None,
    )
    .await;

    // A scope holder may act on anyone's records.
    let req = as_user_with_scopes(
        methods::DELETE_PHONE,
        &json!({"username": alice, "slug": first.slug}),
        &admin,
        &["w:silhouette:phone:*"],
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = as_user(
        methods::DELETE_PHONE,
        &json!({"username": alice, "slug": second.slug}),
        &alice,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = as_user(
        methods::GET_PHONE,
        &json!({"username": alice, "slug": first.slug}),
        &alice,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "PHONE_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn phone_is_invisible_under_another_owner() {
    let app = create_test_app(build_test_state().await).await;
    let alice = unique_username("alice");
    let bob = unique_username("bob");
    seed_profile(&app, &alice).await;
    seed_profile(&app, &bob).await;

    let req = as_user(
        methods::CREATE_PHONE,
        &json!({"username": alice, "phone_number": "5550009", "phone_type": "other"}),
        &alice,
    )
    .to_request();
    let phone: PhoneResponse = test::call_and_read_body_json(&app, req).await;

    // Bob names himself as owner, so the gate admits him, but the slug
    // belongs to Alice.
    let req = as_user(
        methods::GET_PHONE,
        &json!({"username": bob, "slug": phone.slug}),
        &bob,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn invalid_phone_fields_are_rejected() {
    let app = create_test_app(build_test_state().await).await;
    let alice = unique_username("alice");
    seed_profile(&app, &alice).await;

    let req = as_user(
        methods::CREATE_PHONE,
        &json!({"username": alice, "phone_number": "12", "phone_type": "mobile"}),
        &alice,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(resp, "INVALID_PHONE", StatusCode::BAD_REQUEST, None)
        .await;

    let req = as_user(
        methods::GET_PHONE,
        &json!({"username": alice, "slug": "not-a-uuid"}),
        &alice,
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(resp, "INVALID_SLUG", StatusCode::BAD_REQUEST, None)
        .await;
}

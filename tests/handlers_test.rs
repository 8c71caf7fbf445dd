//! HTTP round trips through the full route table.
//!
//! Each test builds the app in-process with `actix_web::test` and points it at
//! a `wiremock` backend. Covers the auth guard, the login flow and its
//! throttle, role scopes, record ownership, CSRF rejection, and backend 401
//! handling.

mod common;

use actix_web::cookie::{Cookie, Key};
use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ivfcare::auth::rate_limit::LoginThrottle;
use ivfcare::routes;
use common::*;

fn location<B>(resp: &ServiceResponse<B>) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response().cookies().find(|c| c.name() == "id").map(|c| c.into_owned())
}

async fn body_string<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("body is not UTF-8")
}

macro_rules! portal {
    ($server:expr) => {
        test::init_service(
            App::new()
                .wrap(routes::session_middleware(&config_for($server), Key::generate()))
                .app_data(web::Data::new(api_for($server)))
                .app_data(web::Data::new(config_for($server)))
                .app_data(web::Data::new(LoginThrottle::default()))
                .configure(routes::configure)
                .default_service(web::to(routes::not_found)),
        )
        .await
    };
}

/// Load the login page, then post credentials. Evaluates to the POST response.
macro_rules! log_in {
    ($app:expr, $email:expr, $password:expr) => {{
        let page = test::call_service($app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&page).expect("login page sets a session cookie");
        let csrf = extract_csrf_token(&body_string(page).await);

        let form = serde_urlencoded::to_string([("email", $email), ("password", $password), ("csrf_token", csrf.as_str())])
            .expect("form encodes");
        let req = test::TestRequest::post()
            .uri("/login")
            .cookie(cookie)
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(form)
            .to_request();
        test::call_service($app, req).await
    }};
}

/// Log in and keep what later form posts need: the renewed session cookie and
/// the CSRF token, which survives the session renewal.
macro_rules! sign_in {
    ($app:expr, $email:expr) => {{
        let page = test::call_service($app, test::TestRequest::get().uri("/login").to_request()).await;
        let cookie = session_cookie(&page).expect("login page sets a session cookie");
        let csrf = extract_csrf_token(&body_string(page).await);

        let form = serde_urlencoded::to_string([("email", $email), ("password", "secret1"), ("csrf_token", csrf.as_str())])
            .expect("form encodes");
        let req = test::TestRequest::post()
            .uri("/login")
            .cookie(cookie)
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(form)
            .to_request();
        let resp = test::call_service($app, req).await;
        assert_eq!(location(&resp), "/dashboard");
        (session_cookie(&resp).expect("login renews the session cookie"), csrf)
    }};
}

/// POST a urlencoded form with the session cookie and CSRF token attached.
macro_rules! post_form {
    ($app:expr, $uri:expr, $cookie:expr, $csrf:expr, $fields:expr) => {{
        let mut pairs: Vec<(&str, &str)> = $fields.to_vec();
        pairs.push(("csrf_token", $csrf.as_str()));
        let req = test::TestRequest::post()
            .uri($uri)
            .cookie($cookie.clone())
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload(serde_urlencoded::to_string(&pairs).expect("form encodes"))
            .to_request();
        test::call_service($app, req).await
    }};
}

const OTHER_USER_ID: i64 = 99;

async fn mount_booking(server: &MockServer, id: i64, patient_id: i64, doctor_id: i64) {
    let mut body = booking_json(id, "2099-01-10", "09:00", "confirmed");
    body["patientId"] = json!(patient_id);
    body["doctorId"] = json!(doctor_id);
    Mock::given(method("GET"))
        .and(path(format!("/bookings/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_plan(server: &MockServer, id: i64, doctor_id: i64) {
    Mock::given(method("GET"))
        .and(path(format!("/treatment-plans/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "patientId": PATIENT_ID,
            "doctorId": doctor_id,
            "startDate": "2026-09-01",
            "status": "pending",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/treatment-plans/{id}/steps")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "stepOrder": 1, "stepName": "Khám ban đầu" },
        ])))
        .mount(server)
        .await;
}

/// Fails the test on drop if the backend ever sees a matching request.
async fn forbid(server: &MockServer, verb: &str, route: &str) {
    Mock::given(method(verb))
        .and(path_regex(route))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(server)
        .await;
}

async fn mount_login(server: &MockServer, role: &str, id: i64) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": TOKEN,
            "user": profile_json(id, role),
        })))
        .mount(server)
        .await;
}

#[actix_rt::test]
async fn test_anonymous_dashboard_redirects_to_login() {
    let server = mock_backend().await;
    let app = portal!(&server);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/dashboard").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[actix_rt::test]
async fn test_root_redirects_to_dashboard() {
    let server = mock_backend().await;
    let app = portal!(&server);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
}

#[actix_rt::test]
async fn test_login_page_renders_form() {
    let server = mock_backend().await;
    let app = portal!(&server);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("IVF Care Test"));
    assert_ne!(extract_csrf_token(&html), "invalid_token");
}

#[actix_rt::test]
async fn test_expired_query_shows_notice() {
    let server = mock_backend().await;
    let app = portal!(&server);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/login?expired=1").to_request()).await;
    let html = body_string(resp).await;
    assert!(html.contains("Your session has expired"));
}

#[actix_rt::test]
async fn test_login_without_csrf_is_forbidden() {
    let server = mock_backend().await;
    let app = portal!(&server);

    let req = test::TestRequest::post()
        .uri("/login")
        .insert_header(("content-type", "application/x-www-form-urlencoded"))
        .set_payload("email=lan%40example.com&password=secret1&csrf_token=forged")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_bad_credentials_rerender_login() {
    let server = mock_backend().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Sai mật khẩu" })))
        .mount(&server)
        .await;
    let app = portal!(&server);

    let resp = log_in!(&app, "lan@example.com", "wrong-pass");
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Invalid email or password"));
    assert!(html.contains("lan@example.com"));
}

#[actix_rt::test]
async fn test_patient_login_then_dashboard() {
    let server = mock_backend().await;
    mount_login(&server, "patient", PATIENT_ID).await;
    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            booking_json(1, "2099-01-10", "09:00", "confirmed"),
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/treatment-plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 4, "patientId": PATIENT_ID, "serviceName": "IVF", "startDate": "2026-09-01", "status": "Kích trứng" },
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/treatment-plans/4/steps$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "stepOrder": 1, "stepName": "Khám ban đầu" },
            { "id": 2, "stepOrder": 2, "stepName": "Kích trứng" },
            { "id": 3, "stepOrder": 3, "stepName": "Chuyển phôi" },
        ])))
        .mount(&server)
        .await;
    let app = portal!(&server);

    let resp = log_in!(&app, "lan@example.com", "secret1");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/dashboard");
    let cookie = session_cookie(&resp).expect("login renews the session cookie");

    let req = test::TestRequest::get().uri("/dashboard").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("67%"));
    assert!(html.contains("Chuyển phôi"));
    assert!(html.contains("My bookings"));
}

#[actix_rt::test]
async fn test_patient_cannot_open_admin_pages() {
    let server = mock_backend().await;
    mount_login(&server, "patient", PATIENT_ID).await;
    let app = portal!(&server);

    let resp = log_in!(&app, "lan@example.com", "secret1");
    let cookie = session_cookie(&resp).expect("session cookie");

    let req = test::TestRequest::get().uri("/admin/users").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_backend_401_sends_user_back_to_login() {
    let server = mock_backend().await;
    mount_login(&server, "doctor", DOCTOR_ID).await;
    Mock::given(method("GET"))
        .and(path("/bookings"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let app = portal!(&server);

    let resp = log_in!(&app, "minh@example.com", "secret1");
    let cookie = session_cookie(&resp).expect("session cookie");

    let req = test::TestRequest::get().uri("/doctor/appointments").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login?expired=1");
}

#[actix_rt::test]
async fn test_backend_outage_is_bad_gateway() {
    let server = mock_backend().await;
    mount_login(&server, "admin", 1).await;
    Mock::given(method("GET"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    let app = portal!(&server);

    let resp = log_in!(&app, "admin@example.com", "secret1");
    let cookie = session_cookie(&resp).expect("session cookie");

    let req = test::TestRequest::get().uri("/admin/users").cookie(cookie).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_rt::test]
async fn test_unknown_path_requires_login() {
    let server = mock_backend().await;
    let app = portal!(&server);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/no-such-page").to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
}

#[actix_rt::test]
async fn test_patient_cannot_touch_another_patients_booking() {
    let server = mock_backend().await;
    mount_login(&server, "patient", PATIENT_ID).await;
    mount_booking(&server, 9, OTHER_USER_ID, DOCTOR_ID).await;
    forbid(&server, "PUT", r"^/bookings/9/").await;
    forbid(&server, "POST", r"^/payments/9$").await;
    let app = portal!(&server);
    let (cookie, csrf) = sign_in!(&app, "lan@example.com");

    let resp = post_form!(&app, "/patient/bookings/9/cancel", cookie, csrf, [] as [(&str, &str); 0]);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/patient/bookings/9/reschedule")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_form!(
        &app,
        "/patient/bookings/9/reschedule",
        cookie,
        csrf,
        [("date", "2099-01-12"), ("slot", "10:00")]
    );
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_form!(&app, "/patient/bookings/9/pay", cookie, csrf, [] as [(&str, &str); 0]);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_doctor_cannot_change_another_doctors_appointment() {
    let server = mock_backend().await;
    mount_login(&server, "doctor", DOCTOR_ID).await;
    mount_booking(&server, 9, PATIENT_ID, OTHER_USER_ID).await;
    forbid(&server, "PUT", r"^/bookings/9/status$").await;
    let app = portal!(&server);
    let (cookie, csrf) = sign_in!(&app, "minh@example.com");

    let resp = post_form!(&app, "/doctor/appointments/9/status", cookie, csrf, [("status", "completed")]);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_doctor_cannot_open_or_edit_another_doctors_plan() {
    let server = mock_backend().await;
    mount_login(&server, "doctor", DOCTOR_ID).await;
    mount_plan(&server, 5, OTHER_USER_ID).await;
    forbid(&server, "PUT", r"^/treatment-plans/5/status$").await;
    forbid(&server, "POST", r"^/treatment-plans/5/steps$").await;
    forbid(&server, "PUT", r"^/treatment-steps/").await;
    let app = portal!(&server);
    let (cookie, csrf) = sign_in!(&app, "minh@example.com");

    let req = test::TestRequest::get().uri("/doctor/treatments/5").cookie(cookie.clone()).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_form!(&app, "/doctor/treatments/5/status", cookie, csrf, [("status", "completed")]);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let step = [("step_order", "2"), ("step_name", "Chuyển phôi"), ("description", "")];
    let resp = post_form!(&app, "/doctor/treatments/5/steps", cookie, csrf, step);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_form!(&app, "/doctor/treatments/5/steps/1", cookie, csrf, step);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_step_update_limited_to_the_plans_own_steps() {
    let server = mock_backend().await;
    mount_login(&server, "doctor", DOCTOR_ID).await;
    mount_plan(&server, 5, DOCTOR_ID).await;
    forbid(&server, "PUT", r"^/treatment-steps/999$").await;
    Mock::given(method("PUT"))
        .and(path("/treatment-steps/1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 1, "stepOrder": 1, "stepName": "Khám lần đầu",
        })))
        .expect(1)
        .mount(&server)
        .await;
    let app = portal!(&server);
    let (cookie, csrf) = sign_in!(&app, "minh@example.com");

    let step = [("step_order", "1"), ("step_name", "Khám lần đầu"), ("description", "")];
    let resp = post_form!(&app, "/doctor/treatments/5/steps/999", cookie, csrf, step);
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = post_form!(&app, "/doctor/treatments/5/steps/1", cookie, csrf, step);
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/doctor/treatments/5");
}

#[actix_rt::test]
async fn test_repeated_bad_logins_are_throttled() {
    let server = mock_backend().await;
    // The sixth attempt must not reach the backend.
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401))
        .expect(5)
        .mount(&server)
        .await;
    let app = portal!(&server);

    for _ in 0..5 {
        let resp = log_in!(&app, "lan@example.com", "wrong-pass");
        assert!(body_string(resp).await.contains("Invalid email or password"));
    }

    let resp = log_in!(&app, "lan@example.com", "wrong-pass");
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Too many failed login attempts"));
}

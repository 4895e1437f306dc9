//! Marketplace page tests against the mock site

use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use super::mock::{vars, BAD_CREDENTIALS, SETTINGS_PATH, SORT_BY_CREATED, SORT_BY_NAME};
use super::paginator::PAGINATION;
use super::*;
use crate::config::UserCredentials;
use crate::driver::MockBrowser;
use crate::page::{Page, Region};
use crate::session::{SessionContext, TransitionPolicy, WaitPolicy};
use crate::Error;

const EMAIL: &str = "dev@example.com";
const PASSWORD: &str = "secret";

fn credentials() -> UserCredentials {
    UserCredentials::new(EMAIL, PASSWORD).with_name("Dev Eloper")
}

fn context(browser: &MockBrowser, policy: TransitionPolicy) -> SessionContext {
    SessionContext::builder(Arc::new(browser.clone()), "http://marketplace.test/")
        .wait(WaitPolicy::new(Duration::from_millis(100), Duration::from_millis(5)))
        .transition_policy(policy)
        .user("default", credentials())
        .user(
            "impostor",
            UserCredentials::new(EMAIL, "wrong password"),
        )
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_header_state_views() {
    let browser = MockMarketplace::new().user(credentials()).build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();

    let state = home.header().state().await.unwrap();
    assert!(!state.is_authenticated());
    assert!(matches!(
        state.clone().into_authenticated(),
        Err(Error::UnexpectedState(_))
    ));

    // Logging out while anonymous is refused without touching the page
    let err = home.header().click_logout().await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedState(_)));
    assert_eq!(browser.location().await, "/");

    let login = state.into_anonymous().unwrap().click_login().await.unwrap();
    assert!(login.is_displayed().await.unwrap());
    assert_eq!(browser.location().await, "/login");
}

#[tokio::test]
async fn test_signed_in_header() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();

    assert!(home.header().is_user_logged_in().await.unwrap());
    let err = home.header().click_login().await.unwrap_err();
    assert!(matches!(err, Error::UnexpectedState(_)));

    let header = home.header().state().await.unwrap().into_authenticated().unwrap();
    assert_eq!(header.account_name().await.unwrap(), "Dev Eloper");

    let submissions = header.click_my_submissions().await.unwrap();
    assert!(submissions.is_displayed().await.unwrap());
}

#[tokio::test]
async fn test_login_rejected() {
    let browser = MockMarketplace::new().user(credentials()).build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();

    let err = home.login("impostor").await.unwrap_err();
    match err {
        Error::Timeout(msg) => assert!(msg.contains(BAD_CREDENTIALS), "{}", msg),
        other => panic!("expected Timeout, got {:?}", other),
    }
    assert!(!home.header().is_user_logged_in().await.unwrap());

    let login: Login = ctx.bind();
    assert_eq!(
        login.error_message().await.unwrap().as_deref(),
        Some(BAD_CREDENTIALS)
    );
}

#[tokio::test]
async fn test_unknown_user_never_touches_the_browser() {
    let browser = MockMarketplace::new().build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.bind();

    let err = home.login("nobody").await.unwrap_err();
    assert!(matches!(err, Error::UnknownUser(_)));
    assert_eq!(browser.driver_calls().await, 0);
}

#[tokio::test]
async fn test_login_returns_to_origin_page() {
    let browser = MockMarketplace::new().user(credentials()).numbered_apps(3).build();
    let ctx = context(&browser, TransitionPolicy::Verify);

    // Signed-out visitors get the login form instead of the listing
    let err = ctx.open::<MySubmissions>().await.unwrap_err();
    assert!(matches!(err, Error::NavigationFailed(_)));

    let login: Login = ctx.bind();
    login.login("default").await.unwrap();
    assert_eq!(browser.location().await, "/developers/submissions");

    let submissions: MySubmissions = ctx.transition().await.unwrap();
    assert_eq!(submissions.submitted_apps().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_logout_to_home() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();

    let header = home.header().state().await.unwrap().into_authenticated().unwrap();
    let landed: Home = header.click_logout_to().await.unwrap();
    assert!(!landed.header().is_user_logged_in().await.unwrap());
    assert!(browser.var(vars::USER).await.is_none());
}

#[tokio::test]
async fn test_logout_link_clicked_directly() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();

    home.header().click_logout().await.unwrap();

    assert!(!home.header().is_user_logged_in().await.unwrap());
    // The account controller leads elsewhere and is left alone
    let history = browser.history().await;
    assert!(!history.iter().any(|location| location == SETTINGS_PATH));
    assert_eq!(history, vec!["/", "/"]);
}

#[tokio::test]
async fn test_logout_from_account_menu() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .logout_in_menu(true)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();
    assert!(!home
        .resolver()
        .is_visible(&HeaderRegion::LOGOUT)
        .await
        .unwrap());

    home.header().click_logout().await.unwrap();

    assert!(!home.header().is_user_logged_in().await.unwrap());
    assert!(browser.var(vars::MENU).await.is_none());
    assert_eq!(browser.location().await, "/");
}

#[tokio::test]
async fn test_account_controller_leads_to_settings() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let home: Home = ctx.open().await.unwrap();

    home.resolver()
        .find(&HeaderRegion::ACCOUNT_CONTROLLER)
        .await
        .unwrap()
        .click()
        .await
        .unwrap();
    assert_eq!(browser.location().await, SETTINGS_PATH);
    assert_eq!(
        ctx.current_url().await.unwrap(),
        "http://marketplace.test/settings"
    );
}

#[tokio::test]
async fn test_rooted_paginator_pages_forward() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .numbered_apps(15)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let paginator: Paginator<MySubmissions> =
        submissions.resolver().region_at(&PAGINATION).await.unwrap();
    assert!(paginator.root().is_some());

    // The root belongs to the old document once the listing reloads
    let submissions = paginator.click_next_page().await.unwrap();
    assert_eq!(submissions.paginator().page_number().await.unwrap(), 2);
    assert!(paginator.page_number().await.unwrap_err().is_stale());
}

#[tokio::test]
async fn test_submitted_app_rows() {
    let created = NaiveDate::from_ymd_opt(2013, 3, 14).unwrap();
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .app("Hello World", created)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let apps = submissions.submitted_apps().await.unwrap();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].name().await.unwrap(), "Hello World");
    assert!(apps[0].has_date().await.unwrap());
    assert_eq!(apps[0].date().await.unwrap(), created);

    // One page only: no paginator
    let paginator = submissions.paginator();
    assert!(!paginator.is_paginator_present().await.unwrap());
    assert_eq!(paginator.total_page_number().await.unwrap(), 1);
}

#[tokio::test]
async fn test_notification() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .notification(true, "App deleted.")
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    assert!(submissions.is_notification_visible().await.unwrap());
    assert!(submissions.is_notification_successful().await.unwrap());
    assert_eq!(submissions.notification_message().await.unwrap(), "App deleted.");

    let quiet = MockMarketplace::new().user(credentials()).signed_in(EMAIL).build();
    let ctx = context(&quiet, TransitionPolicy::Verify);
    let submissions: MySubmissions = ctx.open().await.unwrap();
    assert!(!submissions.is_notification_visible().await.unwrap());
}

#[tokio::test]
async fn test_sort_by_name() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .app("Zebra", NaiveDate::from_ymd_opt(2013, 5, 1).unwrap())
        .app("Apple", NaiveDate::from_ymd_opt(2013, 1, 1).unwrap())
        .app("Mango", NaiveDate::from_ymd_opt(2013, 3, 1).unwrap())
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let submissions: MySubmissions = ctx.open().await.unwrap();
    assert_eq!(submissions.sorter().sorted_by().await.unwrap(), SORT_BY_CREATED);

    let mut names = Vec::new();
    for app in &submissions.submitted_apps().await.unwrap() {
        names.push(app.name().await.unwrap());
    }
    assert_eq!(names, vec!["Zebra", "Mango", "Apple"]);

    let submissions = submissions.sorter().sort_by(SORT_BY_NAME).await.unwrap();
    assert_eq!(submissions.sorter().sorted_by().await.unwrap(), SORT_BY_NAME);

    let mut names = Vec::new();
    for app in &submissions.submitted_apps().await.unwrap() {
        names.push(app.name().await.unwrap());
    }
    assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
}

#[tokio::test]
async fn test_unknown_sort_option() {
    let browser = MockMarketplace::new()
        .user(credentials())
        .signed_in(EMAIL)
        .build();
    let ctx = context(&browser, TransitionPolicy::Verify);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let err = submissions.sorter().sort_by("Popularity").await.unwrap_err();
    assert!(err.is_element_not_found());
}

//! Scoped session acquisition and release

mod common;

use common::MockSessionProvider;
use futures::FutureExt;
use marketplace_pages::fixture::with_session;
use marketplace_pages::marketplace::{Home, MarketplacePage};
use marketplace_pages::Error;
use std::panic::AssertUnwindSafe;

#[tokio::test]
async fn test_release_after_success() {
    let provider = MockSessionProvider::new();

    let logged_in = with_session(&provider, |ctx| async move {
        let home: Home = ctx.open().await?;
        home.login(common::USER).await?;
        home.header().is_user_logged_in().await
    })
    .await
    .expect("Session body failed");

    assert!(logged_in);
    assert_eq!(provider.acquired(), 1);
    assert_eq!(provider.released(), 1);
}

#[tokio::test]
async fn test_release_after_error() {
    let provider = MockSessionProvider::new();

    let err = with_session(&provider, |ctx| async move {
        let home: Home = ctx.open().await?;
        home.login("nobody").await
    })
    .await
    .unwrap_err();

    assert!(matches!(err, Error::UnknownUser(_)));
    assert_eq!(provider.released(), 1);
}

#[tokio::test]
async fn test_release_after_panic() {
    let provider = MockSessionProvider::new();

    let outcome = AssertUnwindSafe(with_session(&provider, |ctx| async move {
        let home: Home = ctx.bind();
        // A failing assertion inside the body
        home.login("nobody").await.unwrap();
        Ok(())
    }))
    .catch_unwind()
    .await;

    assert!(outcome.is_err());
    assert_eq!(provider.acquired(), 1);
    assert_eq!(provider.released(), 1);
}

#[tokio::test]
async fn test_each_body_gets_a_fresh_session() {
    let provider = MockSessionProvider::new();

    for _ in 0..2 {
        let logged_in = with_session(&provider, |ctx| async move {
            let home: Home = ctx.open().await?;
            home.header().is_user_logged_in().await
        })
        .await
        .unwrap();
        // A previous body's login does not leak into the next session
        assert!(!logged_in);

        with_session(&provider, |ctx| async move {
            let home: Home = ctx.open().await?;
            home.login(common::USER).await
        })
        .await
        .unwrap();
    }

    assert_eq!(provider.acquired(), 4);
    assert_eq!(provider.released(), 4);
}

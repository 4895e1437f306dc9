//! Paginated listing tests

mod common;

use common::{app_names, context, context_with, site, EMAIL};
use marketplace_pages::marketplace::MySubmissions;
use marketplace_pages::{Error, TransitionPolicy};
use std::collections::HashSet;

/// 25 apps at 10 per page: three pages
fn three_pages() -> marketplace_pages::driver::MockBrowser {
    site().signed_in(EMAIL).numbered_apps(25).page_size(10).build()
}

#[tokio::test]
async fn test_paging_to_the_last_page() {
    let browser = three_pages();
    let ctx = context(&browser);
    let submissions: MySubmissions = ctx.open().await.expect("Failed to open submissions");

    let paginator = submissions.paginator();
    assert!(paginator.is_paginator_present().await.unwrap());
    assert_eq!(paginator.total_page_number().await.unwrap(), 3);
    assert_eq!(paginator.page_number().await.unwrap(), 1);
    assert!(paginator.is_first_page_disabled().await.unwrap());

    let submissions = paginator.click_next_page().await.expect("Failed to reach page 2");
    let submissions = submissions
        .paginator()
        .click_next_page()
        .await
        .expect("Failed to reach page 3");

    let paginator = submissions.paginator();
    assert!(!paginator.is_first_page_disabled().await.unwrap());
    assert_eq!(paginator.page_number().await.unwrap(), 3);
    assert!(paginator.is_next_page_disabled().await.unwrap());
    assert_eq!(app_names(&submissions).await.len(), 5);
}

#[tokio::test]
async fn test_reading_twice_is_idempotent() {
    let browser = three_pages();
    let ctx = context(&browser);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let first = app_names(&submissions).await;
    let second = app_names(&submissions).await;
    assert_eq!(first.len(), 10);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_next_page_shows_new_items() {
    let browser = three_pages();
    let ctx = context(&browser);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let page_one: HashSet<String> = app_names(&submissions).await.into_iter().collect();
    let submissions = submissions.paginator().click_next_page().await.unwrap();
    let page_two = app_names(&submissions).await;

    assert_eq!(page_two.len(), 10);
    assert!(page_two.iter().all(|name| !page_one.contains(name)));
}

#[tokio::test]
async fn test_rows_go_stale_after_paging() {
    let browser = three_pages();
    let ctx = context(&browser);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let rows = submissions.submitted_apps().await.unwrap();
    let submissions = submissions.paginator().click_next_page().await.unwrap();

    let err = rows[0].name().await.unwrap_err();
    assert!(err.is_stale(), "{:?}", err);

    // Re-reading after the transition is valid again
    let rows = submissions.submitted_apps().await.unwrap();
    assert_eq!(rows[0].name().await.unwrap(), "App 011");
}

#[tokio::test]
async fn test_next_on_last_page_is_a_navigation_failure() {
    let browser = site().signed_in(EMAIL).numbered_apps(15).page_size(10).build();
    let ctx = context(&browser);
    let submissions: MySubmissions = ctx.open().await.unwrap();
    let submissions = submissions.paginator().click_next_page().await.unwrap();
    assert!(submissions.paginator().is_next_page_disabled().await.unwrap());

    let err = submissions.paginator().click_next_page().await.unwrap_err();
    assert!(matches!(err, Error::NavigationFailed(_)), "{:?}", err);
}

#[tokio::test]
async fn test_trusted_next_on_last_page_stays_put() {
    let browser = site().signed_in(EMAIL).numbered_apps(15).page_size(10).build();
    let ctx = context_with(&browser, TransitionPolicy::TrustCallSite);
    let submissions: MySubmissions = ctx.open().await.unwrap();
    let submissions = submissions.paginator().click_next_page().await.unwrap();

    // Returned without checking; the listing is still on page 2
    let submissions = submissions.paginator().click_next_page().await.unwrap();
    assert_eq!(submissions.paginator().page_number().await.unwrap(), 2);
}

#[tokio::test]
async fn test_sorting_keeps_paging() {
    let browser = three_pages();
    let ctx = context(&browser);
    let submissions: MySubmissions = ctx.open().await.unwrap();

    let submissions = submissions.paginator().click_next_page().await.unwrap();
    let submissions = submissions
        .sorter()
        .sort_by("Name")
        .await
        .expect("Failed to sort");

    // Sorting starts over at the first page
    assert_eq!(submissions.paginator().page_number().await.unwrap(), 1);
    let names = app_names(&submissions).await;
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

//! Scripted marketplace site served by the mock browser
//!
//! Renders the pages of this module from a fixed set of users and apps so
//! page objects can be exercised without a live site. Every node answers to
//! the same locator constants the page types declare.

use chrono::{Days, NaiveDate};
use std::sync::Arc;

use super::header::HeaderRegion;
use super::home::Home;
use super::login::Login;
use super::paginator::{CURRENT_PAGE, FIRST_PAGE, NEXT_PAGE, PAGINATION, TOTAL_PAGES};
use super::sorter::{self, SELECTED, SORTER};
use super::submissions::{MySubmissions, SubmittedApp, DATE_FORMAT};
use crate::config::UserCredentials;
use crate::driver::mock::RenderContext;
use crate::driver::{MockBrowser, MockNode, MockState};
use crate::locator::{By, Locator};
use crate::page::Page;

/// Rows per listing page unless configured
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sort option labels
pub const SORT_BY_NAME: &str = "Name";
pub const SORT_BY_CREATED: &str = "Created";

/// Session variables kept by the mock site
pub mod vars {
    /// Email of the signed-in user
    pub const USER: &str = "user";
    /// Location to return to after signing in
    pub const RETURN_TO: &str = "return_to";
    /// Error shown by the login form
    pub const LOGIN_ERROR: &str = "login_error";
    /// Account menu expanded
    pub const MENU: &str = "menu";
    /// Notification text on the submissions page
    pub const NOTIFICATION: &str = "notification";
    /// `success` or `error`
    pub const NOTIFICATION_KIND: &str = "notification_kind";
}

pub const BAD_CREDENTIALS: &str = "Please enter a correct email and password.";

const HOME_PATH: &str = "/";

/// Account settings, where the account controller leads
pub const SETTINGS_PATH: &str = "/settings";

/// Marker of the account settings page
pub const ACCOUNT_SETTINGS: Locator = Locator::css("account settings", "#account-settings");

#[derive(Debug, Clone)]
pub struct MockApp {
    pub name: String,
    pub created: NaiveDate,
}

#[derive(Debug, Default)]
struct Site {
    users: Vec<UserCredentials>,
    apps: Vec<MockApp>,
    page_size: usize,
    logout_in_menu: bool,
}

impl Site {
    fn user(&self, email: &str) -> Option<&UserCredentials> {
        self.users.iter().find(|user| user.email == email)
    }

    /// Apps in the order a sort option lists them
    fn sorted(&self, sort: &str) -> Vec<&MockApp> {
        let mut apps: Vec<&MockApp> = self.apps.iter().collect();
        if sort == SORT_BY_NAME {
            apps.sort_by(|a, b| a.name.cmp(&b.name));
        } else {
            apps.sort_by(|a, b| b.created.cmp(&a.created).then_with(|| a.name.cmp(&b.name)));
        }
        apps
    }
}

/// Builder for a mock marketplace browser
#[derive(Debug)]
pub struct MockMarketplace {
    site: Site,
    signed_in: Option<String>,
    notification: Option<(bool, String)>,
}

impl Default for MockMarketplace {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMarketplace {
    pub fn new() -> Self {
        Self {
            site: Site {
                page_size: DEFAULT_PAGE_SIZE,
                ..Site::default()
            },
            signed_in: None,
            notification: None,
        }
    }

    /// Account that can sign in
    pub fn user(mut self, credentials: UserCredentials) -> Self {
        self.site.users.push(credentials);
        self
    }

    pub fn app(mut self, name: impl Into<String>, created: NaiveDate) -> Self {
        self.site.apps.push(MockApp {
            name: name.into(),
            created,
        });
        self
    }

    /// `count` apps named `App 001`, `App 002`, ..., one day apart
    pub fn numbered_apps(mut self, count: usize) -> Self {
        let newest = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap_or_default();
        for i in 0..count {
            let created = newest
                .checked_sub_days(Days::new(i as u64))
                .unwrap_or(newest);
            self.site.apps.push(MockApp {
                name: format!("App {:03}", i + 1),
                created,
            });
        }
        self
    }

    pub fn page_size(mut self, size: usize) -> Self {
        self.site.page_size = size.max(1);
        self
    }

    /// Hide the logout link in a menu opened by the account controller.
    ///
    /// By default the link is always shown and the account controller leads
    /// to the account settings.
    pub fn logout_in_menu(mut self, in_menu: bool) -> Self {
        self.site.logout_in_menu = in_menu;
        self
    }

    /// Start with `email` already signed in
    pub fn signed_in(mut self, email: impl Into<String>) -> Self {
        self.signed_in = Some(email.into());
        self
    }

    /// Notification shown above the submissions listing
    pub fn notification(mut self, success: bool, message: impl Into<String>) -> Self {
        self.notification = Some((success, message.into()));
        self
    }

    pub fn build(self) -> MockBrowser {
        let site = Arc::new(self.site);
        let mut builder = MockBrowser::builder();

        if let Some(email) = self.signed_in {
            builder = builder.var(vars::USER, email);
        }
        if let Some((success, message)) = self.notification {
            builder = builder
                .var(vars::NOTIFICATION, message)
                .var(vars::NOTIFICATION_KIND, if success { "success" } else { "error" });
        }

        let home_site = site.clone();
        let login_site = site.clone();
        let settings_site = site.clone();
        let listing_site = site;
        builder
            .route(page_path::<Home>(), move |ctx| render_home(&home_site, ctx))
            .route(page_path::<Login>(), move |ctx| render_login(&login_site, ctx))
            .route(SETTINGS_PATH, move |ctx| render_settings(&settings_site, ctx))
            .route(page_path::<MySubmissions>(), move |ctx| {
                render_submissions(&listing_site, ctx)
            })
            .build()
    }
}

fn page_path<P: Page>() -> &'static str {
    P::PATH.unwrap_or(HOME_PATH)
}

fn node(locator: &Locator) -> MockNode {
    MockNode::new(locator.by().clone())
}

fn render_header(site: &Site, ctx: &RenderContext<'_>) -> MockNode {
    let nav = MockNode::new(By::css("#aux-nav"));

    let Some(user) = ctx.var(vars::USER).and_then(|email| site.user(email)) else {
        return nav.child(node(&HeaderRegion::LOGIN).text("Log in / Register").on_click(
            |state: &mut MockState| {
                let here = state.location().to_string();
                state.set_var(vars::RETURN_TO, here);
                state.navigate(page_path::<Login>());
            },
        ));
    };

    let mut logout = node(&HeaderRegion::LOGOUT).text("Log out").on_click(|state| {
        state.remove_var(vars::USER);
        state.remove_var(vars::MENU);
        state.navigate(HOME_PATH);
    });
    let display_name = user.name.clone().unwrap_or_else(|| user.email.clone());
    let mut account = node(&HeaderRegion::ACCOUNT_CONTROLLER).text(display_name);
    if site.logout_in_menu {
        if ctx.var(vars::MENU).is_none() {
            logout = logout.hidden();
        }
        account = account.on_click(|state| {
            state.set_var(vars::MENU, "open");
            state.reload();
        });
    } else {
        account = account.on_click(|state| state.navigate(SETTINGS_PATH));
    }

    nav.child(account).child(logout).child(
        node(&HeaderRegion::MY_SUBMISSIONS)
            .text("My Submissions")
            .on_click(|state| {
                state.remove_var(vars::MENU);
                state.navigate(page_path::<MySubmissions>());
            }),
    )
}

fn render_home(site: &Site, ctx: &RenderContext<'_>) -> Vec<MockNode> {
    vec![
        render_header(site, ctx),
        node(&Home::SITE_HOME).child(MockNode::new(By::css("h1")).text("Firefox Marketplace")),
    ]
}

fn render_settings(site: &Site, ctx: &RenderContext<'_>) -> Vec<MockNode> {
    vec![
        render_header(site, ctx),
        node(&ACCOUNT_SETTINGS).child(MockNode::new(By::css("h1")).text("Account Settings")),
    ]
}

fn render_login(site: &Arc<Site>, ctx: &RenderContext<'_>) -> Vec<MockNode> {
    vec![render_header(site, ctx), render_login_form(site, ctx)]
}

fn render_login_form(site: &Arc<Site>, ctx: &RenderContext<'_>) -> MockNode {
    let submit_site = site.clone();
    let mut form = node(&Login::FORM).children([
        node(&Login::EMAIL),
        node(&Login::PASSWORD),
        node(&Login::SUBMIT)
            .text("Sign in")
            .on_click(move |state| submit_login(&submit_site, state)),
    ]);
    if let Some(error) = ctx.var(vars::LOGIN_ERROR) {
        form = form.child(node(&Login::ERROR).text(error));
    }
    form
}

fn submit_login(site: &Site, state: &mut MockState) {
    let email = state.field_value(Login::EMAIL.by()).unwrap_or_default();
    let password = state.field_value(Login::PASSWORD.by()).unwrap_or_default();

    match site.user(&email) {
        Some(user) if user.password == password => {
            // The form is also shown in place of pages that need a sign-in
            let target = match state.var(vars::RETURN_TO) {
                Some(target) => target.to_string(),
                None if state.location().starts_with(page_path::<Login>()) => HOME_PATH.to_string(),
                None => state.location().to_string(),
            };
            state.set_var(vars::USER, email);
            state.remove_var(vars::RETURN_TO);
            state.remove_var(vars::LOGIN_ERROR);
            state.navigate(target);
        }
        _ => {
            state.set_var(vars::LOGIN_ERROR, BAD_CREDENTIALS);
            state.reload();
        }
    }
}

fn listing_location(page: usize, sort: &str) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("page", &page.to_string())
        .append_pair("sort", sort)
        .finish();
    format!("{}?{}", page_path::<MySubmissions>(), query)
}

fn render_submissions(site: &Arc<Site>, ctx: &RenderContext<'_>) -> Vec<MockNode> {
    let header = render_header(site, ctx);
    if ctx.var(vars::USER).and_then(|email| site.user(email)).is_none() {
        // Signed-out visitors get the login form in place of the listing
        return vec![header, render_login_form(site, ctx)];
    }

    let sort = match ctx.query("sort") {
        Some(SORT_BY_NAME) => SORT_BY_NAME,
        _ => SORT_BY_CREATED,
    };
    let apps = site.sorted(sort);
    let total = apps.len().div_ceil(site.page_size).max(1);
    let page = ctx
        .query("page")
        .and_then(|p| p.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, total);

    let mut listing = node(&MySubmissions::LISTING);

    if let Some(message) = ctx.var(vars::NOTIFICATION) {
        let kind = ctx.var(vars::NOTIFICATION_KIND).unwrap_or("success");
        listing = listing.child(
            node(&MySubmissions::NOTIFICATION)
                .attr("class", format!("notification-box {}", kind))
                .text(message),
        );
    }

    listing = listing.child(node(&SORTER).children([SORT_BY_NAME, SORT_BY_CREATED].map(
        |label| {
            let mut link = node(&sorter::option(label)).text(label);
            let mut item = MockNode::new(By::css("#sorter li"));
            if label == sort {
                link = link.matching(SELECTED.by().clone());
                item = item.attr("class", "selected");
            }
            let target = listing_location(1, label);
            item.child(link.on_click(move |state| state.navigate(target.clone())))
        },
    )));

    let rows = apps
        .iter()
        .skip((page - 1) * site.page_size)
        .take(site.page_size)
        .map(|app| {
            node(&MySubmissions::APP_ROWS).children([
                node(&SubmittedApp::NAME_LINK).text(app.name.clone()),
                node(&SubmittedApp::DATE_CREATED)
                    .text(format!("Created: {}", app.created.format(DATE_FORMAT))),
            ])
        });
    listing = listing.children(rows);

    if total > 1 {
        listing = listing.child(node(&PAGINATION).children([
            page_link(&FIRST_PAGE, "first-page", page == 1, listing_location(1, sort)),
            node(&CURRENT_PAGE).text(page.to_string()),
            node(&TOTAL_PAGES).text(total.to_string()),
            page_link(
                &NEXT_PAGE,
                "next-page",
                page == total,
                listing_location(page + 1, sort),
            ),
        ]));
    }

    vec![header, listing]
}

fn page_link(locator: &Locator, class: &str, disabled: bool, target: String) -> MockNode {
    if disabled {
        return node(locator)
            .attr("class", format!("{} disabled", class))
            .disabled();
    }
    node(locator)
        .attr("class", class)
        .on_click(move |state| state.navigate(target.clone()))
}

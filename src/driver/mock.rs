//! Mock browser implementation for testing
//!
//! A scripted in-memory browser. Routes render a tree of [`MockNode`]s from
//! the current location and a bag of session variables (for example the
//! signed-in user). Every navigation or re-render replaces the document and
//! bumps its generation; handles obtained from an older generation fail with
//! `Error::StaleReference`, the way a real browser invalidates element
//! references after a page load.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;
use uuid::Uuid;

use super::traits::{Driver, ElementHandle};
use crate::locator::By;
use crate::Error;

/// Default origin served by the mock
pub const DEFAULT_ORIGIN: &str = "http://marketplace.test";

/// Side effect run when a node is clicked
pub type ClickHandler = Arc<dyn Fn(&mut MockState) + Send + Sync>;

/// Renders the nodes of a route
pub type Renderer = Arc<dyn Fn(&RenderContext<'_>) -> Vec<MockNode> + Send + Sync>;

/// Declarative element of a mock document
#[derive(Clone)]
pub struct MockNode {
    matches: Vec<By>,
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    children: Vec<MockNode>,
    on_click: Option<ClickHandler>,
}

impl MockNode {
    /// Node answering to `by`
    pub fn new(by: By) -> Self {
        Self {
            matches: vec![by],
            text: String::new(),
            attributes: HashMap::new(),
            displayed: true,
            enabled: true,
            children: Vec::new(),
            on_click: None,
        }
    }

    /// Also answer to another locator
    pub fn matching(mut self, by: By) -> Self {
        self.matches.push(by);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Present in the DOM but not displayed
    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn child(mut self, node: MockNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children<I: IntoIterator<Item = MockNode>>(mut self, nodes: I) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn on_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut MockState) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(handler));
        self
    }
}

impl fmt::Debug for MockNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockNode")
            .field("matches", &self.matches)
            .field("text", &self.text)
            .field("displayed", &self.displayed)
            .field("children", &self.children.len())
            .finish()
    }
}

/// Inputs available to a route renderer
#[derive(Debug)]
pub struct RenderContext<'a> {
    pub path: &'a str,
    query: &'a HashMap<String, String>,
    vars: &'a HashMap<String, String>,
}

impl RenderContext<'_> {
    /// Query string parameter
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Session variable
    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }
}

struct ArenaNode {
    matches: Vec<By>,
    text: String,
    attributes: HashMap<String, String>,
    displayed: bool,
    enabled: bool,
    on_click: Option<ClickHandler>,
    /// Exclusive end of this node's subtree in preorder
    end: usize,
}

/// Flattened document; index order is document order
#[derive(Default)]
struct MockDocument {
    nodes: Vec<ArenaNode>,
}

impl MockDocument {
    fn build(roots: Vec<MockNode>) -> Self {
        let mut nodes = Vec::new();
        flatten(roots, true, &mut nodes);
        Self { nodes }
    }

    fn matching(&self, by: &By, range: std::ops::Range<usize>) -> Vec<usize> {
        range
            .filter(|&i| self.nodes[i].matches.contains(by))
            .collect()
    }
}

fn flatten(roots: Vec<MockNode>, parent_displayed: bool, out: &mut Vec<ArenaNode>) {
    for node in roots {
        let index = out.len();
        let displayed = parent_displayed && node.displayed;
        out.push(ArenaNode {
            matches: node.matches,
            text: node.text,
            attributes: node.attributes,
            displayed,
            enabled: node.enabled,
            on_click: node.on_click,
            end: 0,
        });
        flatten(node.children, displayed, out);
        out[index].end = out.len();
    }
}

/// Mutable browser state, handed to click handlers
pub struct MockState {
    origin: String,
    routes: HashMap<String, Renderer>,
    location: String,
    vars: HashMap<String, String>,
    generation: u64,
    document: MockDocument,
    history: Vec<String>,
    calls: u64,
}

impl MockState {
    /// Load a location (`/path?query`) and render it
    pub fn navigate(&mut self, location: impl Into<String>) {
        self.location = location.into();
        self.history.push(self.location.clone());
        self.render();
    }

    /// Re-render the current location, replacing the document
    pub fn reload(&mut self) {
        self.render();
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn var(&self, name: &str) -> Option<&str> {
        self.vars.get(name).map(String::as_str)
    }

    /// Set a session variable; takes effect at the next render
    pub fn set_var(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(name.into(), value.into());
    }

    pub fn remove_var(&mut self, name: &str) {
        self.vars.remove(name);
    }

    /// `value` attribute of the first node matching `by`
    pub fn field_value(&self, by: &By) -> Option<String> {
        self.document
            .matching(by, 0..self.document.nodes.len())
            .first()
            .and_then(|&i| self.document.nodes[i].attributes.get("value").cloned())
    }

    fn render(&mut self) {
        self.generation += 1;
        let (path, query) = split_location(&self.location);
        let roots = match self.routes.get(path) {
            Some(renderer) => {
                let ctx = RenderContext {
                    path,
                    query: &query,
                    vars: &self.vars,
                };
                renderer(&ctx)
            }
            None => Vec::new(),
        };
        self.document = MockDocument::build(roots);
    }

    fn node(&self, index: usize, generation: u64, id: &str) -> Result<&ArenaNode, Error> {
        if generation != self.generation {
            return Err(Error::stale_reference(format!(
                "element {} belongs to document {} but {} is displayed",
                id, generation, self.generation
            )));
        }
        self.document
            .nodes
            .get(index)
            .ok_or_else(|| Error::internal(format!("mock node {} out of range", index)))
    }

    fn node_mut(&mut self, index: usize, generation: u64, id: &str) -> Result<&mut ArenaNode, Error> {
        self.node(index, generation, id)?;
        Ok(&mut self.document.nodes[index])
    }
}

fn split_location(location: &str) -> (&str, HashMap<String, String>) {
    match location.split_once('?') {
        Some((path, query)) => {
            let params = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
            (path, params)
        }
        None => (location, HashMap::new()),
    }
}

impl fmt::Debug for MockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockState")
            .field("location", &self.location)
            .field("generation", &self.generation)
            .field("nodes", &self.document.nodes.len())
            .field("calls", &self.calls)
            .finish()
    }
}

/// Builder for [`MockBrowser`]
pub struct MockBrowserBuilder {
    origin: String,
    routes: HashMap<String, Renderer>,
    vars: HashMap<String, String>,
}

impl MockBrowserBuilder {
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into().trim_end_matches('/').to_string();
        self
    }

    /// Serve `path` (query string excluded) with `render`
    pub fn route<F>(mut self, path: impl Into<String>, render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> Vec<MockNode> + Send + Sync + 'static,
    {
        self.routes.insert(path.into(), Arc::new(render));
        self
    }

    /// Initial session variable
    pub fn var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn build(self) -> MockBrowser {
        MockBrowser {
            state: Arc::new(Mutex::new(MockState {
                origin: self.origin,
                routes: self.routes,
                location: "about:blank".to_string(),
                vars: self.vars,
                generation: 0,
                document: MockDocument::default(),
                history: Vec::new(),
                calls: 0,
            })),
        }
    }
}

/// Mock browser session
#[derive(Debug, Clone)]
pub struct MockBrowser {
    state: Arc<Mutex<MockState>>,
}

impl MockBrowser {
    pub fn builder() -> MockBrowserBuilder {
        MockBrowserBuilder {
            origin: DEFAULT_ORIGIN.to_string(),
            routes: HashMap::new(),
            vars: HashMap::new(),
        }
    }

    /// Number of driver and element calls served so far
    pub async fn driver_calls(&self) -> u64 {
        self.state.lock().await.calls
    }

    /// Current location (`/path?query`)
    pub async fn location(&self) -> String {
        self.state.lock().await.location.clone()
    }

    /// Every location loaded, oldest first
    pub async fn history(&self) -> Vec<String> {
        self.state.lock().await.history.clone()
    }

    pub async fn generation(&self) -> u64 {
        self.state.lock().await.generation
    }

    pub async fn var(&self, name: &str) -> Option<String> {
        self.state.lock().await.var(name).map(str::to_string)
    }

    /// Run `f` against the state, as if the page changed by itself
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut MockState),
    {
        let mut state = self.state.lock().await;
        f(&mut *state);
    }

    fn handle(&self, index: usize, generation: u64) -> Arc<dyn ElementHandle> {
        Arc::new(MockElement {
            id: Uuid::new_v4().to_string(),
            index,
            generation,
            state: self.state.clone(),
        })
    }

    fn handles(&self, indices: Vec<usize>, generation: u64) -> Vec<Arc<dyn ElementHandle>> {
        indices
            .into_iter()
            .map(|i| self.handle(i, generation))
            .collect()
    }
}

#[async_trait]
impl Driver for MockBrowser {
    async fn navigate(&self, url: &str) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let location = match Url::parse(url) {
            Ok(parsed) => match parsed.query() {
                Some(query) => format!("{}?{}", parsed.path(), query),
                None => parsed.path().to_string(),
            },
            Err(_) => url.to_string(),
        };
        state.navigate(location);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        if !state.location.starts_with('/') {
            return Ok(state.location.clone());
        }
        Ok(format!("{}{}", state.origin, state.location))
    }

    async fn find_element(&self, by: &By) -> Result<Arc<dyn ElementHandle>, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let matches = state.document.matching(by, 0..state.document.nodes.len());
        match matches.first() {
            Some(&index) => Ok(self.handle(index, state.generation)),
            None => Err(Error::element_not_found(by.to_string())),
        }
    }

    async fn find_elements(&self, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let matches = state.document.matching(by, 0..state.document.nodes.len());
        Ok(self.handles(matches, state.generation))
    }
}

/// Mock element reference
pub struct MockElement {
    id: String,
    index: usize,
    generation: u64,
    state: Arc<Mutex<MockState>>,
}

impl MockElement {
    fn browser(&self) -> MockBrowser {
        MockBrowser {
            state: self.state.clone(),
        }
    }

    async fn descendants(&self, by: &By) -> Result<(Vec<usize>, u64), Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let end = state.node(self.index, self.generation, &self.id)?.end;
        Ok((state.document.matching(by, self.index + 1..end), state.generation))
    }
}

impl fmt::Debug for MockElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockElement")
            .field("id", &self.id)
            .field("index", &self.index)
            .field("generation", &self.generation)
            .finish()
    }
}

#[async_trait]
impl ElementHandle for MockElement {
    fn id(&self) -> &str {
        &self.id
    }

    async fn find_element(&self, by: &By) -> Result<Arc<dyn ElementHandle>, Error> {
        let (matches, generation) = self.descendants(by).await?;
        match matches.first() {
            Some(&index) => Ok(self.browser().handle(index, generation)),
            None => Err(Error::element_not_found(by.to_string())),
        }
    }

    async fn find_elements(&self, by: &By) -> Result<Vec<Arc<dyn ElementHandle>>, Error> {
        let (matches, generation) = self.descendants(by).await?;
        Ok(self.browser().handles(matches, generation))
    }

    async fn click(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let node = state.node(self.index, self.generation, &self.id)?;
        if !node.displayed {
            return Err(Error::driver(format!(
                "element not interactable: {} is not displayed",
                self.id
            )));
        }
        if !node.enabled {
            return Ok(());
        }
        if let Some(handler) = node.on_click.clone() {
            handler(&mut *state);
        }
        Ok(())
    }

    async fn send_keys(&self, text: &str) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let node = state.node_mut(self.index, self.generation, &self.id)?;
        node.attributes
            .entry("value".to_string())
            .or_default()
            .push_str(text);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let node = state.node_mut(self.index, self.generation, &self.id)?;
        node.attributes.insert("value".to_string(), String::new());
        Ok(())
    }

    async fn text(&self) -> Result<String, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let node = state.node(self.index, self.generation, &self.id)?;
        // Hidden elements report empty text, as WebDriver does
        Ok(if node.displayed {
            node.text.clone()
        } else {
            String::new()
        })
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        let node = state.node(self.index, self.generation, &self.id)?;
        Ok(node.attributes.get(name).cloned())
    }

    async fn is_displayed(&self) -> Result<bool, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        Ok(state.node(self.index, self.generation, &self.id)?.displayed)
    }

    async fn is_enabled(&self) -> Result<bool, Error> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        Ok(state.node(self.index, self.generation, &self.id)?.enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser() -> MockBrowser {
        MockBrowser::builder()
            .route("/", |ctx| {
                let greeting = match ctx.var("user") {
                    Some(user) => format!("Hello {}", user),
                    None => "Hello".to_string(),
                };
                vec![
                    MockNode::new(By::css("h1")).text(greeting),
                    MockNode::new(By::css("ul")).children(vec![
                        MockNode::new(By::css("li")).text("one"),
                        MockNode::new(By::css("li")).text("two"),
                    ]),
                    MockNode::new(By::css("li")).text("outside"),
                    MockNode::new(By::css("#secret")).hidden().text("shh"),
                    MockNode::new(By::css("button"))
                        .on_click(|state| state.navigate("/next?page=2")),
                ]
            })
            .route("/next", |ctx| {
                vec![MockNode::new(By::css("h1")).text(format!(
                    "page {}",
                    ctx.query("page").unwrap_or("?")
                ))]
            })
            .build()
    }

    #[tokio::test]
    async fn test_find_in_document_order() {
        let browser = browser();
        browser.navigate("http://marketplace.test/").await.unwrap();

        let items = browser.find_elements(&By::css("li")).await.unwrap();
        let mut texts = Vec::new();
        for item in &items {
            texts.push(item.text().await.unwrap());
        }
        assert_eq!(texts, vec!["one", "two", "outside"]);
    }

    #[tokio::test]
    async fn test_scoped_find() {
        let browser = browser();
        browser.navigate("/").await.unwrap();

        let list = browser.find_element(&By::css("ul")).await.unwrap();
        let items = list.find_elements(&By::css("li")).await.unwrap();
        assert_eq!(items.len(), 2);
        assert!(list.find_element(&By::css("h1")).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_element() {
        let browser = browser();
        browser.navigate("/").await.unwrap();

        let err = browser.find_element(&By::css("#nope")).await.unwrap_err();
        assert!(err.is_element_not_found());
        assert!(!browser.is_visible(&By::css("#nope")).await.unwrap());
        assert!(!browser.is_visible(&By::css("#secret")).await.unwrap());
        assert!(browser.is_visible(&By::css("h1")).await.unwrap());
    }

    #[tokio::test]
    async fn test_click_navigates_and_stales_old_handles() {
        let browser = browser();
        browser.navigate("/").await.unwrap();

        let heading = browser.find_element(&By::css("h1")).await.unwrap();
        let button = browser.find_element(&By::css("button")).await.unwrap();
        button.click().await.unwrap();

        assert_eq!(browser.location().await, "/next?page=2");
        assert_eq!(
            browser.current_url().await.unwrap(),
            "http://marketplace.test/next?page=2"
        );
        assert!(heading.text().await.unwrap_err().is_stale());

        let heading = browser.find_element(&By::css("h1")).await.unwrap();
        assert_eq!(heading.text().await.unwrap(), "page 2");
    }

    #[tokio::test]
    async fn test_send_keys_and_clear() {
        let browser = MockBrowser::builder()
            .route("/form", |_| vec![MockNode::new(By::css("input"))])
            .build();
        browser.navigate("/form").await.unwrap();

        let input = browser.find_element(&By::css("input")).await.unwrap();
        input.send_keys("abc").await.unwrap();
        input.send_keys("def").await.unwrap();
        assert_eq!(input.attribute("value").await.unwrap().as_deref(), Some("abcdef"));

        input.clear().await.unwrap();
        assert_eq!(input.attribute("value").await.unwrap().as_deref(), Some(""));
    }

    #[tokio::test]
    async fn test_vars_apply_on_reload() {
        let browser = browser();
        browser.navigate("/").await.unwrap();

        browser
            .update(|state| {
                state.set_var("user", "dev");
                state.reload();
            })
            .await;

        let heading = browser.find_element(&By::css("h1")).await.unwrap();
        assert_eq!(heading.text().await.unwrap(), "Hello dev");
    }

    #[tokio::test]
    async fn test_hidden_click_is_rejected() {
        let browser = browser();
        browser.navigate("/").await.unwrap();

        let secret = browser.find_element(&By::css("#secret")).await.unwrap();
        assert!(matches!(secret.click().await, Err(Error::Driver(_))));
        assert_eq!(secret.text().await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unknown_route_renders_empty_document() {
        let browser = browser();
        browser.navigate("/missing").await.unwrap();
        assert!(browser.find_elements(&By::css("h1")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_current_url_before_navigation() {
        let browser = browser();
        assert_eq!(browser.current_url().await.unwrap(), "about:blank");

        browser.navigate("/form?step=2").await.unwrap();
        assert_eq!(
            browser.current_url().await.unwrap(),
            "http://marketplace.test/form?step=2"
        );
    }

    #[tokio::test]
    async fn test_call_counter() {
        let browser = browser();
        assert_eq!(browser.driver_calls().await, 0);
        browser.navigate("/").await.unwrap();
        let _ = browser.find_element(&By::css("h1")).await.unwrap();
        assert_eq!(browser.driver_calls().await, 2);
    }
}

//! Test helper module
//!
//! Provides in-memory implementations of every collaborator trait.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use swg_activities::{
    mode_for_target, ActivityError, ActivityHost, ActivityIframePort, ActivityMode,
    ActivityOpenOptions, ActivityPort, ActivityResult, Args, ElementHandle, MessageHandler,
    OpenedWindow, RedirectErrorHandler, ResizeHandler, ResultHandler, WindowHandle,
};
use tokio::sync::watch;

use crate::components::{Dialog, View, ViewId, DESKTOP_MEDIA_QUERY};
use crate::error::{CoreError, CoreResult};
use crate::traits::{
    ClickHandler, Declarations, Document, EventManager, ListenerId, LocalStorage, MediaListener,
    Storage,
};
use crate::types::ClientEvent;

// ===== MemoryDocument =====

#[derive(Default)]
struct Node {
    tag: String,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    parent: Option<ElementHandle>,
    children: Vec<ElementHandle>,
}

type SharedClick = Arc<dyn Fn() + Send + Sync>;
type SharedMedia = Arc<dyn Fn(bool) + Send + Sync>;

struct DocState {
    next_id: u64,
    nodes: HashMap<ElementHandle, Node>,
    root: ElementHandle,
    body: ElementHandle,
    /// Every style write in order: `(element, property, value)`, `None` for removals
    style_log: Vec<(ElementHandle, String, Option<String>)>,
    removals: HashMap<ElementHandle, usize>,
    frame_bodies: HashMap<ElementHandle, ElementHandle>,
    loaded_frames: Vec<ElementHandle>,
    next_listener: u64,
    media_listeners: HashMap<ListenerId, SharedMedia>,
    click_listeners: HashMap<ListenerId, (ElementHandle, SharedClick)>,
    desktop: bool,
    viewport_height: f64,
    focused: Option<ElementHandle>,
    focused_windows: Vec<WindowHandle>,
    posted: Vec<(ElementHandle, String, String)>,
}

impl DocState {
    fn create(&mut self, tag: &str) -> ElementHandle {
        self.next_id += 1;
        let handle = ElementHandle(self.next_id);
        self.nodes.insert(
            handle,
            Node {
                tag: tag.to_string(),
                ..Node::default()
            },
        );
        handle
    }

    fn append(&mut self, parent: ElementHandle, child: ElementHandle) {
        self.detach(child);
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
    }

    fn detach(&mut self, element: ElementHandle) -> bool {
        let Some(parent) = self.nodes.get_mut(&element).and_then(|node| node.parent.take()) else {
            return false;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|child| *child != element);
        }
        true
    }

    fn is_connected(&self, element: ElementHandle) -> bool {
        let mut current = Some(element);
        while let Some(handle) = current {
            if handle == self.root {
                return true;
            }
            current = self.nodes.get(&handle).and_then(|node| node.parent);
        }
        false
    }

    fn listener_id(&mut self) -> ListenerId {
        self.next_listener += 1;
        ListenerId(self.next_listener)
    }
}

/// In-memory page that records every style mutation.
pub struct MemoryDocument {
    state: Mutex<DocState>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        let mut state = DocState {
            next_id: 0,
            nodes: HashMap::new(),
            root: ElementHandle(0),
            body: ElementHandle(0),
            style_log: Vec::new(),
            removals: HashMap::new(),
            frame_bodies: HashMap::new(),
            loaded_frames: Vec::new(),
            next_listener: 0,
            media_listeners: HashMap::new(),
            click_listeners: HashMap::new(),
            desktop: false,
            viewport_height: 1000.0,
            focused: None,
            focused_windows: Vec::new(),
            posted: Vec::new(),
        };
        state.root = state.create("html");
        state.body = state.create("body");
        let (root, body) = (state.root, state.body);
        state.append(root, body);
        Self {
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, DocState> {
        self.state.lock().unwrap()
    }

    pub fn tag(&self, element: ElementHandle) -> Option<String> {
        self.state().nodes.get(&element).map(|node| node.tag.clone())
    }

    pub fn parent(&self, element: ElementHandle) -> Option<ElementHandle> {
        self.state().nodes.get(&element).and_then(|node| node.parent)
    }

    pub fn has_class(&self, element: ElementHandle, class: &str) -> bool {
        self.attribute(element, "class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Values written to `property` of `element`, oldest first.
    pub fn style_history(&self, element: ElementHandle, property: &str) -> Vec<String> {
        self.state()
            .style_log
            .iter()
            .filter(|(el, name, _)| *el == element && name == property)
            .filter_map(|(_, _, value)| value.clone())
            .collect()
    }

    /// Number of style writes and removals so far, across all elements.
    pub fn style_mutations(&self) -> usize {
        self.state().style_log.len()
    }

    /// How many times `element` was detached from a parent.
    pub fn removal_count(&self, element: ElementHandle) -> usize {
        self.state().removals.get(&element).copied().unwrap_or(0)
    }

    /// Attached elements with the given tag.
    pub fn count_attached(&self, tag: &str) -> usize {
        let state = self.state();
        state
            .nodes
            .iter()
            .filter(|(handle, node)| node.tag == tag && state.is_connected(**handle))
            .count()
    }

    /// Frames whose load was awaited.
    pub fn loaded_frames(&self) -> Vec<ElementHandle> {
        self.state().loaded_frames.clone()
    }

    /// Switches the viewport across the desktop breakpoint and notifies
    /// media listeners.
    pub fn set_desktop(&self, desktop: bool) {
        let listeners: Vec<SharedMedia> = {
            let mut state = self.state();
            state.desktop = desktop;
            state.media_listeners.values().cloned().collect()
        };
        for listener in listeners {
            listener(desktop);
        }
    }

    pub fn set_viewport_height(&self, height: f64) {
        self.state().viewport_height = height;
    }

    /// Simulates a click on `element`.
    pub fn click(&self, element: ElementHandle) {
        let handlers: Vec<SharedClick> = self
            .state()
            .click_listeners
            .values()
            .filter(|(el, _)| *el == element)
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn focused(&self) -> Option<ElementHandle> {
        self.state().focused
    }

    pub fn focused_windows(&self) -> Vec<WindowHandle> {
        self.state().focused_windows.clone()
    }

    pub fn posted_messages(&self) -> Vec<(ElementHandle, String, String)> {
        self.state().posted.clone()
    }

    pub fn media_listener_count(&self) -> usize {
        self.state().media_listeners.len()
    }

    pub fn click_listener_count(&self) -> usize {
        self.state().click_listeners.len()
    }
}

#[async_trait]
impl Document for MemoryDocument {
    fn create_element(&self, tag: &str, attributes: Declarations<'_>) -> ElementHandle {
        let mut state = self.state();
        let handle = state.create(tag);
        if let Some(node) = state.nodes.get_mut(&handle) {
            for (name, value) in attributes {
                node.attributes.insert((*name).to_string(), (*value).to_string());
            }
        }
        handle
    }

    fn body(&self) -> Option<ElementHandle> {
        Some(self.state().body)
    }

    fn root_element(&self) -> ElementHandle {
        self.state().root
    }

    fn append_child(&self, parent: ElementHandle, child: ElementHandle) {
        self.state().append(parent, child);
    }

    fn remove_element(&self, element: ElementHandle) {
        let mut state = self.state();
        if state.detach(element) {
            *state.removals.entry(element).or_default() += 1;
        }
    }

    fn remove_children(&self, element: ElementHandle) {
        let mut state = self.state();
        let children = state
            .nodes
            .get(&element)
            .map(|node| node.children.clone())
            .unwrap_or_default();
        for child in children {
            if state.detach(child) {
                *state.removals.entry(child).or_default() += 1;
            }
        }
    }

    fn is_connected(&self, element: ElementHandle) -> bool {
        self.state().is_connected(element)
    }

    fn attribute(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.state()
            .nodes
            .get(&element)
            .and_then(|node| node.attributes.get(name).cloned())
    }

    fn set_styles(&self, element: ElementHandle, styles: Declarations<'_>, _important: bool) {
        let mut state = self.state();
        for (name, value) in styles {
            if let Some(node) = state.nodes.get_mut(&element) {
                node.styles.insert((*name).to_string(), (*value).to_string());
            }
            state
                .style_log
                .push((element, (*name).to_string(), Some((*value).to_string())));
        }
    }

    fn style(&self, element: ElementHandle, name: &str) -> Option<String> {
        self.state()
            .nodes
            .get(&element)
            .and_then(|node| node.styles.get(name).cloned())
    }

    fn remove_style(&self, element: ElementHandle, name: &str) {
        let mut state = self.state();
        if let Some(node) = state.nodes.get_mut(&element) {
            node.styles.remove(name);
        }
        state.style_log.push((element, name.to_string(), None));
    }

    fn add_class(&self, element: ElementHandle, class: &str) {
        let mut state = self.state();
        if let Some(node) = state.nodes.get_mut(&element) {
            let classes = node.attributes.entry("class".to_string()).or_default();
            if !classes.split_whitespace().any(|c| c == class) {
                if !classes.is_empty() {
                    classes.push(' ');
                }
                classes.push_str(class);
            }
        }
    }

    fn remove_class(&self, element: ElementHandle, class: &str) {
        let mut state = self.state();
        if let Some(classes) = state
            .nodes
            .get_mut(&element)
            .and_then(|node| node.attributes.get_mut("class"))
        {
            *classes = classes
                .split_whitespace()
                .filter(|c| *c != class)
                .collect::<Vec<_>>()
                .join(" ");
        }
    }

    fn offset_height(&self, element: ElementHandle) -> f64 {
        self.style(element, "height")
            .and_then(|height| height.trim_end_matches("px").parse().ok())
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.state().viewport_height
    }

    fn matches_media(&self, query: &str) -> bool {
        query == DESKTOP_MEDIA_QUERY && self.state().desktop
    }

    fn add_media_listener(&self, _query: &str, listener: MediaListener) -> ListenerId {
        let mut state = self.state();
        let id = state.listener_id();
        state.media_listeners.insert(id, Arc::from(listener));
        id
    }

    fn remove_media_listener(&self, id: ListenerId) {
        self.state().media_listeners.remove(&id);
    }

    fn add_click_listener(&self, element: ElementHandle, handler: ClickHandler) -> ListenerId {
        let mut state = self.state();
        let id = state.listener_id();
        state
            .click_listeners
            .insert(id, (element, Arc::from(handler)));
        id
    }

    fn remove_click_listener(&self, id: ListenerId) {
        self.state().click_listeners.remove(&id);
    }

    fn focus(&self, element: ElementHandle) {
        self.state().focused = Some(element);
    }

    fn focus_window(&self, window: WindowHandle) -> CoreResult<()> {
        self.state().focused_windows.push(window);
        Ok(())
    }

    fn post_message(&self, frame: ElementHandle, message: &str, target_origin: &str) {
        self.state()
            .posted
            .push((frame, message.to_string(), target_origin.to_string()));
    }

    async fn when_loaded(&self, frame: ElementHandle) {
        self.state().loaded_frames.push(frame);
    }

    fn frame_body(&self, frame: ElementHandle) -> Option<ElementHandle> {
        let mut state = self.state();
        if !state.is_connected(frame) {
            return None;
        }
        if let Some(body) = state.frame_bodies.get(&frame) {
            return Some(*body);
        }
        let body = state.create("body");
        state.append(frame, body);
        state.frame_bodies.insert(frame, body);
        Some(body)
    }
}

// ===== Storage =====

pub struct MemoryStorage {
    values: Mutex<HashMap<(bool, String), String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str, use_local_storage: bool) -> CoreResult<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap()
            .get(&(use_local_storage, key.to_string()))
            .cloned())
    }

    async fn set(&self, key: &str, value: &str, use_local_storage: bool) -> CoreResult<()> {
        self.values
            .lock()
            .unwrap()
            .insert((use_local_storage, key.to_string()), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str, use_local_storage: bool) -> CoreResult<()> {
        self.values
            .lock()
            .unwrap()
            .remove(&(use_local_storage, key.to_string()));
        Ok(())
    }
}

pub struct MemoryLocalStorage {
    values: Mutex<HashMap<String, String>>,
    available: AtomicBool,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryLocalStorage {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
            available: AtomicBool::new(true),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

impl LocalStorage for MemoryLocalStorage {
    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn get_item(&self, key: &str) -> CoreResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(CoreError::StorageError("read denied".into()));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> CoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(CoreError::StorageError("quota exceeded".into()));
        }
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> CoreResult<()> {
        self.values.lock().unwrap().remove(key);
        Ok(())
    }
}

// ===== Activity transport =====

type SharedMessageHandler = Arc<dyn Fn(Value) + Send + Sync>;
type SharedResizeHandler = Arc<dyn Fn(f64) + Send + Sync>;

/// Scripted iframe port: tests push inbound messages and the result.
pub struct MockIframePort {
    connected: AtomicBool,
    connect_error: Mutex<Option<ActivityError>>,
    message_handler: Mutex<Option<SharedMessageHandler>>,
    resize_handler: Mutex<Option<SharedResizeHandler>>,
    sent: Mutex<Vec<Value>>,
    result: watch::Sender<Option<swg_activities::Result<ActivityResult>>>,
    accept_result_calls: AtomicUsize,
    resized_calls: AtomicUsize,
}

impl MockIframePort {
    pub fn new() -> Self {
        Self {
            connected: AtomicBool::new(false),
            connect_error: Mutex::new(None),
            message_handler: Mutex::new(None),
            resize_handler: Mutex::new(None),
            sent: Mutex::new(Vec::new()),
            result: watch::Sender::new(None),
            accept_result_calls: AtomicUsize::new(0),
            resized_calls: AtomicUsize::new(0),
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Delivers a raw payload as if posted by the activity.
    pub fn deliver(&self, data: Value) {
        let handler = self.message_handler.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler(data);
        }
    }

    pub fn request_resize(&self, height: f64) {
        let handler = self.resize_handler.lock().unwrap().clone();
        if let Some(handler) = handler {
            handler(height);
        }
    }

    pub fn set_result(&self, result: swg_activities::Result<ActivityResult>) {
        self.result.send_replace(Some(result));
    }

    pub fn sent_messages(&self) -> Vec<Value> {
        self.sent.lock().unwrap().clone()
    }

    pub fn accept_result_calls(&self) -> usize {
        self.accept_result_calls.load(Ordering::SeqCst)
    }

    pub fn resized_calls(&self) -> usize {
        self.resized_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivityIframePort for MockIframePort {
    async fn connect(&self) -> swg_activities::Result<()> {
        if let Some(e) = self.connect_error.lock().unwrap().take() {
            return Err(e);
        }
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        *self.message_handler.lock().unwrap() = None;
        *self.resize_handler.lock().unwrap() = None;
    }

    async fn when_ready(&self) -> swg_activities::Result<()> {
        Ok(())
    }

    fn on_message(&self, handler: MessageHandler) {
        *self.message_handler.lock().unwrap() = Some(Arc::from(handler));
    }

    fn message(&self, payload: Value) {
        self.sent.lock().unwrap().push(payload);
    }

    async fn accept_result(&self) -> swg_activities::Result<ActivityResult> {
        self.accept_result_calls.fetch_add(1, Ordering::SeqCst);
        let mut result = self.result.subscribe();
        let settled = result.wait_for(Option::is_some).await.unwrap();
        settled.clone().unwrap()
    }

    fn on_resize_request(&self, handler: ResizeHandler) {
        *self.resize_handler.lock().unwrap() = Some(Arc::from(handler));
    }

    fn resized(&self) {
        self.resized_calls.fetch_add(1, Ordering::SeqCst);
    }
}

/// Popup or redirect port with a fixed result.
pub struct MockWindowPort {
    mode: ActivityMode,
    result: swg_activities::Result<ActivityResult>,
    accept_result_calls: AtomicUsize,
}

impl MockWindowPort {
    pub fn new(mode: ActivityMode, result: swg_activities::Result<ActivityResult>) -> Self {
        Self {
            mode,
            result,
            accept_result_calls: AtomicUsize::new(0),
        }
    }

    pub fn accept_result_calls(&self) -> usize {
        self.accept_result_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ActivityPort for MockWindowPort {
    fn mode(&self) -> ActivityMode {
        self.mode
    }

    async fn accept_result(&self) -> swg_activities::Result<ActivityResult> {
        self.accept_result_calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

type SharedResultHandler = Arc<dyn Fn(Arc<dyn ActivityPort>) + Send + Sync>;
type SharedRedirectErrorHandler = Arc<dyn Fn(ActivityError) + Send + Sync>;

/// Records every activity it is asked to open.
pub struct MockActivityHost {
    iframes: Mutex<Vec<(ElementHandle, String, Args)>>,
    iframe_ports: Mutex<Vec<Arc<MockIframePort>>>,
    windows: Mutex<Vec<(String, String, String, Args)>>,
    result_handlers: Mutex<HashMap<String, SharedResultHandler>>,
    redirect_error_handlers: Mutex<Vec<SharedRedirectErrorHandler>>,
    next_connect_error: Mutex<Option<ActivityError>>,
    next_window: AtomicU64,
}

impl MockActivityHost {
    pub fn new() -> Self {
        Self {
            iframes: Mutex::new(Vec::new()),
            iframe_ports: Mutex::new(Vec::new()),
            windows: Mutex::new(Vec::new()),
            result_handlers: Mutex::new(HashMap::new()),
            redirect_error_handlers: Mutex::new(Vec::new()),
            next_connect_error: Mutex::new(None),
            next_window: AtomicU64::new(1),
        }
    }

    /// The next iframe port fails its handshake with `error`.
    pub fn fail_next_connect(&self, error: ActivityError) {
        *self.next_connect_error.lock().unwrap() = Some(error);
    }

    pub fn opened_iframes(&self) -> Vec<(ElementHandle, String, Args)> {
        self.iframes.lock().unwrap().clone()
    }

    pub fn last_iframe_port(&self) -> Option<Arc<MockIframePort>> {
        self.iframe_ports.lock().unwrap().last().cloned()
    }

    /// `(request_id, url, target, args)` of every opened window.
    pub fn opened_windows(&self) -> Vec<(String, String, String, Args)> {
        self.windows.lock().unwrap().clone()
    }

    pub fn deliver_result(&self, request_id: &str, port: Arc<MockWindowPort>) {
        let handler = self.result_handlers.lock().unwrap().get(request_id).cloned();
        if let Some(handler) = handler {
            handler(port as Arc<dyn ActivityPort>);
        }
    }

    pub fn raise_redirect_error(&self, error: ActivityError) {
        let handlers = self.redirect_error_handlers.lock().unwrap().clone();
        for handler in handlers {
            handler(error.clone());
        }
    }
}

impl ActivityHost for MockActivityHost {
    fn open_iframe_port(
        &self,
        iframe: ElementHandle,
        url: &str,
        args: &Args,
    ) -> Arc<dyn ActivityIframePort> {
        let port = Arc::new(MockIframePort::new());
        *port.connect_error.lock().unwrap() = self.next_connect_error.lock().unwrap().take();
        self.iframes
            .lock()
            .unwrap()
            .push((iframe, url.to_string(), args.clone()));
        self.iframe_ports.lock().unwrap().push(port.clone());
        port
    }

    fn open(
        &self,
        request_id: &str,
        url: &str,
        target: &str,
        args: &Args,
        _options: &ActivityOpenOptions,
    ) -> swg_activities::Result<OpenedWindow> {
        let mode = mode_for_target(target)?;
        self.windows.lock().unwrap().push((
            request_id.to_string(),
            url.to_string(),
            target.to_string(),
            args.clone(),
        ));
        let target_win = (mode == ActivityMode::Popup)
            .then(|| WindowHandle(self.next_window.fetch_add(1, Ordering::SeqCst)));
        Ok(OpenedWindow { target_win })
    }

    fn on_result(&self, request_id: &str, handler: ResultHandler) {
        self.result_handlers
            .lock()
            .unwrap()
            .insert(request_id.to_string(), Arc::from(handler));
    }

    fn on_redirect_error(&self, handler: RedirectErrorHandler) {
        self.redirect_error_handlers
            .lock()
            .unwrap()
            .push(Arc::from(handler));
    }
}

// ===== EventManager =====

#[derive(Default)]
pub struct RecordingEventManager {
    events: Mutex<Vec<ClientEvent>>,
}

impl RecordingEventManager {
    pub fn events(&self) -> Vec<ClientEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventManager for RecordingEventManager {
    fn log_event(&self, event: ClientEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ===== MockView =====

/// View whose initialization and completion are driven by the test.
pub struct MockView {
    id: ViewId,
    element: ElementHandle,
    fade_body: AtomicBool,
    loading_indicator: bool,
    init_calls: AtomicUsize,
    resized_calls: AtomicUsize,
    init_gate: watch::Sender<bool>,
    init_error: Mutex<Option<CoreError>>,
    completion: watch::Sender<Option<CoreResult<()>>>,
}

impl MockView {
    fn build(doc: &MemoryDocument, attributes: Declarations<'_>, loading_indicator: bool) -> Arc<Self> {
        Arc::new(Self {
            id: ViewId::next(),
            element: doc.create_element("iframe", attributes),
            fade_body: AtomicBool::new(true),
            loading_indicator,
            init_calls: AtomicUsize::new(0),
            resized_calls: AtomicUsize::new(0),
            init_gate: watch::Sender::new(true),
            init_error: Mutex::new(None),
            completion: watch::Sender::new(None),
        })
    }

    pub fn new(doc: &MemoryDocument) -> Arc<Self> {
        Self::build(doc, &[], false)
    }

    pub fn with_loading_indicator(doc: &MemoryDocument) -> Arc<Self> {
        Self::build(doc, &[], true)
    }

    pub fn with_src(doc: &MemoryDocument, src: &str) -> Arc<Self> {
        Self::build(doc, &[("src", src)], false)
    }

    pub fn set_fade_body(&self, fade: bool) {
        self.fade_body.store(fade, Ordering::SeqCst);
    }

    /// Blocks `init` until [`release_init`](Self::release_init).
    pub fn hold_init(&self) {
        self.init_gate.send_replace(false);
    }

    pub fn release_init(&self) {
        self.init_gate.send_replace(true);
    }

    pub fn fail_init(&self, error: CoreError) {
        *self.init_error.lock().unwrap() = Some(error);
    }

    /// Settles `when_complete`.
    pub fn complete(&self, outcome: CoreResult<()>) {
        self.completion.send_replace(Some(outcome));
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn resized_calls(&self) -> usize {
        self.resized_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl View for MockView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn element(&self) -> ElementHandle {
        self.element
    }

    async fn init(&self, _dialog: Arc<Dialog>) -> CoreResult<()> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        let mut gate = self.init_gate.subscribe();
        gate.wait_for(|open| *open).await.unwrap();
        match self.init_error.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn should_fade_body(&self) -> bool {
        self.fade_body.load(Ordering::SeqCst)
    }

    fn has_loading_indicator(&self) -> bool {
        self.loading_indicator
    }

    async fn when_complete(&self) -> CoreResult<()> {
        let mut completion = self.completion.subscribe();
        let outcome = completion.wait_for(Option::is_some).await.unwrap();
        outcome.clone().unwrap()
    }

    fn resized(&self) {
        self.resized_calls.fetch_add(1, Ordering::SeqCst);
    }
}

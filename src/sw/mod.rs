//! Host-independent model of the offline service worker: the standard
//! install/activate lifecycle as an explicit state machine, the cache-first
//! fetch strategy, push notifications, and the reserved background-sync hook.
//! Network access sits behind the [`Network`] trait so every handler can be
//! driven directly with synthetic events.

pub mod cache;

use cache::CacheStorage;
use serde::Deserialize;
use thiserror::Error;

/// Versioned bucket name; bumping the version garbage-collects every older
/// bucket on activation.
pub const CACHE_NAME: &str = "atmosvibe-v1.0.0";

pub const OFFLINE_URL: &str = "/offline.html";

/// Application shell cached during install so the app starts offline.
pub const PRECACHE_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "/offline.html",
    "/icons/icon-192x192.png",
    "/icons/icon-512x512.png",
    "/favicon.svg",
];

pub const SYNC_WEATHER_TAG: &str = "sync-weather-data";

const PLACEHOLDER_IMAGE: &str = "<svg width=\"32\" height=\"32\" xmlns=\"http://www.w3.org/2000/svg\"><rect width=\"32\" height=\"32\" fill=\"#ccc\"/><text x=\"16\" y=\"20\" text-anchor=\"middle\" fill=\"#666\">?</text></svg>";

#[derive(Error, Debug)]
#[error("network unreachable")]
pub struct NetworkError;

/// The worker's view of the network. Implemented over HTTP in production and
/// by in-memory doubles in tests.
pub trait Network: Send + Sync {
    fn fetch(
        &self,
        request: &SwRequest,
    ) -> impl std::future::Future<Output = Result<SwResponse, NetworkError>> + Send;
}

#[derive(Debug, Clone)]
pub struct SwRequest {
    pub method: String,
    pub url: String,
    pub is_navigation: bool,
    pub accept: String,
}

impl SwRequest {
    pub fn get(url: &str) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.to_string(),
            is_navigation: false,
            accept: String::new(),
        }
    }

    pub fn navigate(url: &str) -> Self {
        Self {
            is_navigation: true,
            accept: "text/html".to_string(),
            ..Self::get(url)
        }
    }

    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accept = accept.to_string();
        self
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl SwResponse {
    pub fn ok(content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: content_type.to_string(),
            body,
        }
    }
}

/// What the worker tells the host to do with an intercepted request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchDecision {
    /// Serve this response.
    Respond(SwResponse),
    /// Not our business (non-GET, extension origins); let the host proceed.
    Passthrough,
    /// No response and no fallback; the request fails.
    Unmatched,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Waiting,
    Activating,
    Activated,
}

#[derive(Debug, Deserialize, Default)]
struct PushPayload {
    title: Option<String>,
    body: Option<String>,
    url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    pub vibrate: Vec<u32>,
    pub url: String,
    pub actions: Vec<NotificationAction>,
}

/// Open application windows, as the worker sees them through the host's
/// clients API.
pub trait ClientWindows {
    fn window_count(&self) -> usize;
    fn focus_first(&mut self);
    fn open_window(&mut self, url: &str);
}

pub struct ServiceWorker<N> {
    network: N,
    cache_name: String,
    caches: CacheStorage,
    state: WorkerState,
    skip_waiting: bool,
    clients_claimed: bool,
}

impl<N: Network> ServiceWorker<N> {
    pub fn new(network: N) -> Self {
        Self::with_cache_name(network, CACHE_NAME)
    }

    pub fn with_cache_name(network: N, cache_name: &str) -> Self {
        Self {
            network,
            cache_name: cache_name.to_string(),
            caches: CacheStorage::new(),
            state: WorkerState::Installing,
            skip_waiting: false,
            clients_claimed: false,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether the worker asked to supersede a previous version immediately.
    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting
    }

    pub fn clients_claimed(&self) -> bool {
        self.clients_claimed
    }

    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    pub fn caches_mut(&mut self) -> &mut CacheStorage {
        &mut self.caches
    }

    /// Install: precache the application shell. A partially precached app is
    /// preferable to an uninstalled one, so any failure degrades to caching
    /// only the offline page and the install still succeeds.
    pub async fn handle_install(&mut self) {
        self.state = WorkerState::Installing;
        self.caches.open(&self.cache_name);

        let mut staged = Vec::new();
        let mut complete = true;
        for path in PRECACHE_ASSETS {
            match self.network.fetch(&SwRequest::get(path)).await {
                Ok(response) if response.status == 200 => staged.push((*path, response)),
                _ => {
                    complete = false;
                    break;
                }
            }
        }

        if complete {
            for (path, response) in staged {
                self.caches.put(&self.cache_name, path, response);
            }
        } else {
            tracing::error!("failed to cache assets, falling back to offline page only");
            if let Ok(response) = self.network.fetch(&SwRequest::get(OFFLINE_URL)).await {
                if response.status == 200 {
                    self.caches.put(&self.cache_name, OFFLINE_URL, response);
                }
            }
        }

        self.skip_waiting = true;
        self.state = WorkerState::Waiting;
    }

    /// Activate: delete every bucket from older deployments, then take
    /// control of open tabs without waiting for a reload.
    pub async fn handle_activate(&mut self) {
        self.state = WorkerState::Activating;

        for name in self.caches.names() {
            if name != self.cache_name {
                self.caches.delete(&name);
            }
        }

        self.clients_claimed = true;
        self.state = WorkerState::Activated;
    }

    pub async fn handle_fetch(&mut self, request: &SwRequest) -> FetchDecision {
        if request.method != "GET" {
            return FetchDecision::Passthrough;
        }
        if request.url.starts_with("chrome-extension://") {
            return FetchDecision::Passthrough;
        }

        if request.is_navigation {
            return match self.network.fetch(request).await {
                Ok(response) => FetchDecision::Respond(response),
                Err(_) => self.offline_page(),
            };
        }

        // Cache-first, no freshness check: a cached asset is served as-is.
        if let Some(cached) = self.caches.match_url(&self.cache_name, &request.url) {
            return FetchDecision::Respond(cached.clone());
        }

        match self.network.fetch(request).await {
            Ok(response) => {
                // Only plain 200s are cacheable; partial content and friends
                // pass through uncached.
                if response.status == 200 {
                    self.caches
                        .put(&self.cache_name, &request.url, response.clone());
                }
                FetchDecision::Respond(response)
            }
            Err(_) => {
                if request.accept.contains("text/html") {
                    self.offline_page()
                } else if request.accept.contains("image/") {
                    FetchDecision::Respond(SwResponse::ok(
                        "image/svg+xml",
                        PLACEHOLDER_IMAGE.as_bytes().to_vec(),
                    ))
                } else {
                    FetchDecision::Unmatched
                }
            }
        }
    }

    fn offline_page(&self) -> FetchDecision {
        match self.caches.match_url(&self.cache_name, OFFLINE_URL) {
            Some(page) => FetchDecision::Respond(page.clone()),
            None => FetchDecision::Unmatched,
        }
    }

    /// Push: build the notification the host should display. Messages with
    /// no data or an unreadable payload are dropped.
    pub fn handle_push(&self, data: Option<&[u8]>) -> Option<Notification> {
        let payload: PushPayload = serde_json::from_slice(data?).ok()?;

        Some(Notification {
            title: payload
                .title
                .unwrap_or_else(|| "AtmosVibe Weather".to_string()),
            body: payload
                .body
                .unwrap_or_else(|| "New weather update available".to_string()),
            icon: "/icons/icon-192x192.png".to_string(),
            badge: "/icons/icon-72x72.png".to_string(),
            vibrate: vec![100, 50, 100],
            url: payload.url.unwrap_or_else(|| "/".to_string()),
            actions: vec![
                NotificationAction {
                    action: "view".to_string(),
                    title: "View Details".to_string(),
                },
                NotificationAction {
                    action: "dismiss".to_string(),
                    title: "Dismiss".to_string(),
                },
            ],
        })
    }

    pub fn handle_notification_click(
        &self,
        action: &str,
        notification: &Notification,
        clients: &mut impl ClientWindows,
    ) {
        if action != "view" {
            return;
        }
        if clients.window_count() > 0 {
            clients.focus_first();
        } else {
            clients.open_window(&notification.url);
        }
    }

    pub async fn handle_sync(&mut self, tag: &str) {
        if tag == SYNC_WEATHER_TAG {
            self.sync_weather_data().await;
        }
    }

    // Reserved hook point; intentionally empty.
    async fn sync_weather_data(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeNetwork {
        responses: Mutex<HashMap<String, SwResponse>>,
        offline: AtomicBool,
        calls: Mutex<HashMap<String, usize>>,
    }

    impl FakeNetwork {
        fn serving(urls: &[&str]) -> Self {
            let network = Self::default();
            for url in urls {
                network.serve(url, SwResponse::ok("text/html", url.as_bytes().to_vec()));
            }
            network
        }

        fn serve(&self, url: &str, response: SwResponse) {
            self.responses
                .lock()
                .unwrap()
                .insert(url.to_string(), response);
        }

        fn go_offline(&self) {
            self.offline.store(true, Ordering::SeqCst);
        }

        fn calls_for(&self, url: &str) -> usize {
            *self.calls.lock().unwrap().get(url).unwrap_or(&0)
        }
    }

    impl Network for FakeNetwork {
        async fn fetch(&self, request: &SwRequest) -> Result<SwResponse, NetworkError> {
            *self
                .calls
                .lock()
                .unwrap()
                .entry(request.url.clone())
                .or_insert(0) += 1;
            if self.offline.load(Ordering::SeqCst) {
                return Err(NetworkError);
            }
            self.responses
                .lock()
                .unwrap()
                .get(&request.url)
                .cloned()
                .ok_or(NetworkError)
        }
    }

    impl Network for &FakeNetwork {
        async fn fetch(&self, request: &SwRequest) -> Result<SwResponse, NetworkError> {
            (**self).fetch(request).await
        }
    }

    struct FakeClients {
        windows: usize,
        focused: bool,
        opened: Option<String>,
    }

    impl FakeClients {
        fn with_windows(windows: usize) -> Self {
            Self {
                windows,
                focused: false,
                opened: None,
            }
        }
    }

    impl ClientWindows for FakeClients {
        fn window_count(&self) -> usize {
            self.windows
        }

        fn focus_first(&mut self) {
            self.focused = true;
        }

        fn open_window(&mut self, url: &str) {
            self.opened = Some(url.to_string());
        }
    }

    #[tokio::test]
    async fn test_install_precaches_full_shell() {
        let network = FakeNetwork::serving(PRECACHE_ASSETS);
        let mut sw = ServiceWorker::new(&network);
        sw.handle_install().await;

        assert_eq!(sw.state(), WorkerState::Waiting);
        assert!(sw.skip_waiting_requested());
        assert_eq!(sw.caches().len(CACHE_NAME), PRECACHE_ASSETS.len());
    }

    #[tokio::test]
    async fn test_install_survives_a_missing_asset() {
        let network = FakeNetwork::serving(PRECACHE_ASSETS);
        network.serve("/favicon.svg", SwResponse {
            status: 404,
            content_type: "text/plain".to_string(),
            body: Vec::new(),
        });

        let mut sw = ServiceWorker::new(&network);
        sw.handle_install().await;

        // Degraded install: only the offline page, but the worker is usable.
        assert_eq!(sw.state(), WorkerState::Waiting);
        assert!(sw.caches().match_url(CACHE_NAME, OFFLINE_URL).is_some());
        assert_eq!(sw.caches().len(CACHE_NAME), 1);
    }

    #[tokio::test]
    async fn test_activate_deletes_stale_version_buckets() {
        let network = FakeNetwork::serving(PRECACHE_ASSETS);
        let mut sw = ServiceWorker::with_cache_name(&network, "atmosvibe-v2.0.0");
        sw.caches_mut().open("atmosvibe-v1.0.0");
        sw.caches_mut()
            .put("atmosvibe-v1.0.0", "/old", SwResponse::ok("text/plain", Vec::new()));

        sw.handle_install().await;
        sw.handle_activate().await;

        assert_eq!(sw.state(), WorkerState::Activated);
        assert!(sw.clients_claimed());
        assert_eq!(sw.caches().names(), vec!["atmosvibe-v2.0.0".to_string()]);
    }

    #[tokio::test]
    async fn test_navigation_falls_back_to_offline_page() {
        let network = FakeNetwork::serving(PRECACHE_ASSETS);
        let mut sw = ServiceWorker::new(&network);
        sw.handle_install().await;
        sw.handle_activate().await;
        network.go_offline();

        let decision = sw.handle_fetch(&SwRequest::navigate("/dashboard")).await;
        match decision {
            FetchDecision::Respond(response) => {
                assert_eq!(response.body, OFFLINE_URL.as_bytes());
            }
            other => panic!("expected offline page, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_navigation_prefers_network() {
        let network = FakeNetwork::serving(PRECACHE_ASSETS);
        network.serve("/dashboard", SwResponse::ok("text/html", b"live".to_vec()));
        let mut sw = ServiceWorker::new(&network);
        sw.handle_install().await;

        let decision = sw.handle_fetch(&SwRequest::navigate("/dashboard")).await;
        assert_eq!(
            decision,
            FetchDecision::Respond(SwResponse::ok("text/html", b"live".to_vec()))
        );
    }

    #[tokio::test]
    async fn test_second_asset_fetch_is_served_from_cache() {
        let network = FakeNetwork::serving(&[]);
        network.serve("/app.js", SwResponse::ok("text/javascript", b"js".to_vec()));
        let mut sw = ServiceWorker::new(&network);

        let first = sw.handle_fetch(&SwRequest::get("/app.js")).await;
        assert!(matches!(first, FetchDecision::Respond(_)));
        assert_eq!(network.calls_for("/app.js"), 1);

        let second = sw.handle_fetch(&SwRequest::get("/app.js")).await;
        assert!(matches!(second, FetchDecision::Respond(_)));
        assert_eq!(network.calls_for("/app.js"), 1);
    }

    #[tokio::test]
    async fn test_non_200_responses_are_not_cached() {
        let network = FakeNetwork::serving(&[]);
        network.serve("/stream", SwResponse {
            status: 206,
            content_type: "video/mp4".to_string(),
            body: b"partial".to_vec(),
        });
        let mut sw = ServiceWorker::new(&network);

        sw.handle_fetch(&SwRequest::get("/stream")).await;
        sw.handle_fetch(&SwRequest::get("/stream")).await;
        assert_eq!(network.calls_for("/stream"), 2);
    }

    #[tokio::test]
    async fn test_offline_image_gets_placeholder() {
        let network = FakeNetwork::serving(&[]);
        network.go_offline();
        let mut sw = ServiceWorker::new(&network);

        let decision = sw
            .handle_fetch(&SwRequest::get("/photo.png").with_accept("image/png"))
            .await;
        match decision {
            FetchDecision::Respond(response) => {
                assert_eq!(response.content_type, "image/svg+xml");
            }
            other => panic!("expected placeholder image, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_offline_opaque_request_is_unmatched() {
        let network = FakeNetwork::serving(&[]);
        network.go_offline();
        let mut sw = ServiceWorker::new(&network);

        let decision = sw
            .handle_fetch(&SwRequest::get("/data.bin").with_accept("application/octet-stream"))
            .await;
        assert_eq!(decision, FetchDecision::Unmatched);
    }

    #[tokio::test]
    async fn test_non_get_and_extension_requests_pass_through() {
        let network = FakeNetwork::serving(&[]);
        let mut sw = ServiceWorker::new(&network);

        let post = SwRequest::get("/api").with_method("POST");
        assert_eq!(sw.handle_fetch(&post).await, FetchDecision::Passthrough);

        let extension = SwRequest::get("chrome-extension://abc/script.js");
        assert_eq!(sw.handle_fetch(&extension).await, FetchDecision::Passthrough);
        assert_eq!(network.calls_for("/api"), 0);
    }

    #[tokio::test]
    async fn test_push_defaults_and_payload() {
        let network = FakeNetwork::serving(&[]);
        let sw = ServiceWorker::new(&network);

        assert!(sw.handle_push(None).is_none());

        let note = sw.handle_push(Some(b"{}")).unwrap();
        assert_eq!(note.title, "AtmosVibe Weather");
        assert_eq!(note.body, "New weather update available");
        assert_eq!(note.url, "/");
        assert_eq!(note.vibrate, vec![100, 50, 100]);
        assert_eq!(note.actions.len(), 2);

        let note = sw
            .handle_push(Some(br#"{"title":"Storm","body":"Take cover","url":"/radar"}"#))
            .unwrap();
        assert_eq!(note.title, "Storm");
        assert_eq!(note.url, "/radar");
    }

    #[tokio::test]
    async fn test_notification_click_focuses_or_opens() {
        let network = FakeNetwork::serving(&[]);
        let sw = ServiceWorker::new(&network);
        let note = sw.handle_push(Some(br#"{"url":"/radar"}"#)).unwrap();

        let mut clients = FakeClients::with_windows(1);
        sw.handle_notification_click("view", &note, &mut clients);
        assert!(clients.focused);
        assert!(clients.opened.is_none());

        let mut clients = FakeClients::with_windows(0);
        sw.handle_notification_click("view", &note, &mut clients);
        assert_eq!(clients.opened.as_deref(), Some("/radar"));

        let mut clients = FakeClients::with_windows(0);
        sw.handle_notification_click("dismiss", &note, &mut clients);
        assert!(!clients.focused);
        assert!(clients.opened.is_none());
    }

    #[tokio::test]
    async fn test_sync_is_a_noop_hook() {
        let network = FakeNetwork::serving(&[]);
        let mut sw = ServiceWorker::new(&network);
        sw.handle_sync(SYNC_WEATHER_TAG).await;
        sw.handle_sync("unknown-tag").await;
        assert_eq!(sw.state(), WorkerState::Installing);
    }
}

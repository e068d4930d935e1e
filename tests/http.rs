use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct EntryDto {
    id: String,
    date: String,
    person: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct Snapshot {
    entries: Vec<EntryDto>,
    editing_id: Option<String>,
    error: Option<String>,
    totals: HashMap<String, u64>,
}

// ---- stub of the hosted table service ----

#[derive(Debug, Clone, Serialize)]
struct StubRow {
    id: u64,
    date: String,
    person: String,
    count: u32,
}

#[derive(Debug, Deserialize)]
struct StubMutation {
    date: String,
    person: String,
    count: u32,
}

#[derive(Clone, Default)]
struct StubState {
    tables: Arc<StdMutex<HashMap<String, Vec<StubRow>>>>,
    next_id: Arc<AtomicU64>,
}

#[derive(Default)]
struct Filters {
    id_eq: Option<u64>,
    date_from: Option<String>,
    date_to: Option<String>,
}

fn parse_filters(query: Option<&str>) -> Filters {
    let mut filters = Filters::default();
    for pair in query.unwrap_or_default().split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match key {
            "id" => {
                if let Some(rest) = value.strip_prefix("eq.") {
                    filters.id_eq = rest.parse().ok();
                }
            }
            "date" => {
                if let Some(rest) = value.strip_prefix("gte.") {
                    filters.date_from = Some(rest.to_string());
                } else if let Some(rest) = value.strip_prefix("lte.") {
                    filters.date_to = Some(rest.to_string());
                }
            }
            _ => {}
        }
    }
    filters
}

fn in_window(row: &StubRow, filters: &Filters) -> bool {
    if let Some(from) = &filters.date_from {
        if row.date.as_str() < from.as_str() {
            return false;
        }
    }
    if let Some(to) = &filters.date_to {
        if row.date.as_str() > to.as_str() {
            return false;
        }
    }
    true
}

async fn stub_select(
    State(stub): State<StubState>,
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
) -> Json<Vec<StubRow>> {
    let filters = parse_filters(query.as_deref());
    let tables = stub.tables.lock().unwrap();
    let mut rows: Vec<StubRow> = tables
        .get(&table)
        .map(|rows| {
            rows.iter()
                .filter(|row| in_window(row, &filters))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
    Json(rows)
}

async fn stub_insert(
    State(stub): State<StubState>,
    Path(table): Path<String>,
    Json(body): Json<StubMutation>,
) -> Json<Vec<StubRow>> {
    let row = StubRow {
        id: stub.next_id.fetch_add(1, Ordering::SeqCst) + 1,
        date: body.date,
        person: body.person,
        count: body.count,
    };
    stub.tables
        .lock()
        .unwrap()
        .entry(table)
        .or_default()
        .push(row.clone());
    Json(vec![row])
}

async fn stub_update(
    State(stub): State<StubState>,
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
    Json(body): Json<StubMutation>,
) -> Result<Json<Vec<StubRow>>, StatusCode> {
    let filters = parse_filters(query.as_deref());
    let id = filters.id_eq.ok_or(StatusCode::BAD_REQUEST)?;
    let mut tables = stub.tables.lock().unwrap();
    let rows = tables.get_mut(&table).ok_or(StatusCode::NOT_FOUND)?;
    let row = rows
        .iter_mut()
        .find(|row| row.id == id)
        .ok_or(StatusCode::NOT_FOUND)?;
    row.date = body.date;
    row.person = body.person;
    row.count = body.count;
    Ok(Json(vec![row.clone()]))
}

async fn stub_delete(
    State(stub): State<StubState>,
    Path(table): Path<String>,
    RawQuery(query): RawQuery,
) -> StatusCode {
    let filters = parse_filters(query.as_deref());
    let mut tables = stub.tables.lock().unwrap();
    if let Some(rows) = tables.get_mut(&table) {
        if let Some(id) = filters.id_eq {
            rows.retain(|row| row.id != id);
        } else {
            rows.retain(|row| !in_window(row, &filters));
        }
    }
    StatusCode::NO_CONTENT
}

fn stub_router() -> Router {
    Router::new()
        .route(
            "/rest/v1/:table",
            get(stub_select)
                .post(stub_insert)
                .patch(stub_update)
                .delete(stub_delete),
        )
        .with_state(StubState::default())
}

// The stub lives on its own runtime thread so it outlives every
// per-test tokio runtime.
static STUB_URL: Lazy<String> = Lazy::new(|| {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().expect("stub runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind stub");
            let port = listener.local_addr().unwrap().port();
            tx.send(port).unwrap();
            axum::serve(listener, stub_router()).await.expect("stub serve");
        });
    });
    let port = rx.recv().expect("stub port");
    format!("http://127.0.0.1:{port}")
});

// ---- app server harness ----

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_cache_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("rep_tracker_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client
            .get(format!("{base_url}/api/pushups/state"))
            .send()
            .await
        {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_rep_tracker"))
        .env("PORT", port.to_string())
        .env("REP_CACHE_DIR", unique_cache_dir())
        .env("REMOTE_BASE_URL", STUB_URL.as_str())
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

fn today_string() -> String {
    chrono::Local::now().date_naive().to_string()
}

async fn get_snapshot(client: &Client, base_url: &str, exercise: &str) -> Snapshot {
    client
        .get(format!("{base_url}/api/{exercise}/state"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_snapshot(
    client: &Client,
    base_url: &str,
    exercise: &str,
    path: &str,
    body: serde_json::Value,
) -> Snapshot {
    client
        .post(format!("{base_url}/api/{exercise}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_add_entry_updates_list_and_totals() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_snapshot(&client, &server.base_url, "pushups").await;
    let sam_before = before.totals.get("sam").copied().unwrap_or(0);

    let after = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        "/add",
        serde_json::json!({
            "person": "sam",
            "date": today_string(),
            "count": "21",
            "confirmed": false
        }),
    )
    .await;

    assert_eq!(after.entries.len(), before.entries.len() + 1);
    assert_eq!(after.totals["sam"], sam_before + 21);
    assert!(after.error.is_none());
    assert!(after
        .entries
        .iter()
        .any(|e| e.person == "sam" && e.count == 21 && e.date == today_string()));
    // the optimistic temp id is gone by the time the response lands
    assert!(after.entries.iter().all(|e| !e.id.starts_with("tmp-")));

    // a fresh load agrees with the server
    let reloaded = get_snapshot(&client, &server.base_url, "pushups").await;
    assert_eq!(reloaded.entries.len(), after.entries.len());
    assert_eq!(reloaded.totals["sam"], sam_before + 21);
}

#[tokio::test]
async fn http_rejects_invalid_counts_without_changes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_snapshot(&client, &server.base_url, "abs").await;

    for bad in ["abc", "0", "-5"] {
        let after = post_snapshot(
            &client,
            &server.base_url,
            "abs",
            "/add",
            serde_json::json!({
                "person": "alex",
                "date": today_string(),
                "count": bad,
                "confirmed": false
            }),
        )
        .await;
        assert_eq!(after.entries.len(), before.entries.len());
        assert!(after.error.is_none());
    }
}

#[tokio::test]
async fn http_rejects_out_of_window_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_snapshot(&client, &server.base_url, "abs").await;
    let after = post_snapshot(
        &client,
        &server.base_url,
        "abs",
        "/add",
        serde_json::json!({
            "person": "alex",
            "date": "2025-09-17",
            "count": "10",
            "confirmed": false
        }),
    )
    .await;
    assert_eq!(after.entries.len(), before.entries.len());
}

#[tokio::test]
async fn http_delete_respects_confirmation() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        "/add",
        serde_json::json!({
            "person": "alex",
            "date": today_string(),
            "count": "7",
            "confirmed": false
        }),
    )
    .await;
    let target = added
        .entries
        .iter()
        .find(|e| e.person == "alex" && e.count == 7)
        .expect("added entry present")
        .id
        .clone();

    let declined = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        &format!("/delete/{target}"),
        serde_json::json!({ "confirmed": false }),
    )
    .await;
    assert!(declined.entries.iter().any(|e| e.id == target));

    let deleted = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        &format!("/delete/{target}"),
        serde_json::json!({ "confirmed": true }),
    )
    .await;
    assert!(deleted.entries.iter().all(|e| e.id != target));
    assert_eq!(deleted.entries.len(), added.entries.len() - 1);
}

#[tokio::test]
async fn http_edit_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added = post_snapshot(
        &client,
        &server.base_url,
        "abs",
        "/add",
        serde_json::json!({
            "person": "sam",
            "date": today_string(),
            "count": "11",
            "confirmed": false
        }),
    )
    .await;
    let target = added
        .entries
        .iter()
        .find(|e| e.person == "sam" && e.count == 11)
        .expect("added entry present")
        .id
        .clone();

    post_snapshot(
        &client,
        &server.base_url,
        "abs",
        &format!("/edit/{target}"),
        serde_json::json!({}),
    )
    .await;

    let saved = post_snapshot(
        &client,
        &server.base_url,
        "abs",
        "/save",
        serde_json::json!({
            "person": "sam",
            "date": today_string(),
            "count": "12",
            "confirmed": false
        }),
    )
    .await;
    let updated = saved
        .entries
        .iter()
        .find(|e| e.id == target)
        .expect("edited entry present");
    assert_eq!(updated.count, 12);
    assert!(saved.error.is_none());
}

#[tokio::test]
async fn http_cancel_edit_allows_adding_again() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        "/add",
        serde_json::json!({
            "person": "sam",
            "date": today_string(),
            "count": "9",
            "confirmed": false
        }),
    )
    .await;
    let target = added
        .entries
        .iter()
        .find(|e| e.person == "sam" && e.count == 9)
        .expect("added entry present")
        .id
        .clone();

    post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        &format!("/edit/{target}"),
        serde_json::json!({}),
    )
    .await;

    let cancelled = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        "/cancel",
        serde_json::json!({}),
    )
    .await;
    assert!(cancelled.editing_id.is_none());
    assert!(cancelled.error.is_none());

    let after = post_snapshot(
        &client,
        &server.base_url,
        "pushups",
        "/add",
        serde_json::json!({
            "person": "alex",
            "date": today_string(),
            "count": "13",
            "confirmed": false
        }),
    )
    .await;
    assert_eq!(after.entries.len(), added.entries.len() + 1);
    assert!(after
        .entries
        .iter()
        .any(|e| e.person == "alex" && e.count == 13));
}

#[tokio::test]
async fn http_clear_all_empties_the_tab() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_snapshot(
        &client,
        &server.base_url,
        "abs",
        "/add",
        serde_json::json!({
            "person": "alex",
            "date": today_string(),
            "count": "5",
            "confirmed": false
        }),
    )
    .await;

    let cleared = post_snapshot(
        &client,
        &server.base_url,
        "abs",
        "/clear",
        serde_json::json!({ "confirmed": true }),
    )
    .await;
    assert!(cleared.entries.is_empty());
    assert!(cleared.error.is_none());

    let reloaded = get_snapshot(&client, &server.base_url, "abs").await;
    assert!(reloaded.entries.is_empty());
}

#[tokio::test]
async fn http_unknown_exercise_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/squats/state", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}

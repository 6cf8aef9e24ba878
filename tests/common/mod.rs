use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

static SERVER: OnceLock<TestServer> = OnceLock::new();
static COUNTER: AtomicU32 = AtomicU32::new(0);

/// Integration tests need a reachable Postgres. When DATABASE_URL is absent
/// the suites skip instead of failing, so unit tests still run anywhere.
pub fn database_configured() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

pub struct TestServer {
    pub base_url: String,
    #[allow(dead_code)]
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        let mut cmd = Command::new("target/debug/workout-social-api");
        cmd.env("WORKOUT_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit environment so the server can see DATABASE_URL and JWT_SECRET
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self { base_url, child })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(15)).await?;
    Ok(server)
}

/// Unique username per call so suites can share one database.
pub fn unique(name: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .subsec_nanos();
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}_{}_{}", name, nanos, n)
}

/// Registered user handle for driving authenticated requests.
pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

pub async fn register_user(
    client: &reqwest::Client,
    base_url: &str,
    name: &str,
) -> Result<TestUser> {
    let username = unique(name);
    let res = client
        .post(format!("{}/api/auth/register", base_url))
        .json(&json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "hunter2hunter2",
            "bio": "integration test user"
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "register failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    Ok(TestUser {
        id: body["user"]["id"].as_i64().context("user id")?,
        username,
        token: body["token"].as_str().context("token")?.to_string(),
    })
}

/// POST a workout as `user`; returns the workout id.
pub async fn create_workout(
    client: &reqwest::Client,
    base_url: &str,
    user: &TestUser,
    title: &str,
    is_public: bool,
) -> Result<i64> {
    let res = client
        .post(format!("{}/api/workouts", base_url))
        .bearer_auth(&user.token)
        .json(&json!({
            "title": title,
            "date": "2024-01-01",
            "duration": 60,
            "is_public": is_public
        }))
        .send()
        .await?;
    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "create workout failed: {}",
        res.status()
    );

    let body: Value = res.json().await?;
    body["workout"]["id"].as_i64().context("workout id")
}

/// Fetch some catalog exercise ids from the seed data.
pub async fn catalog_exercise_ids(
    client: &reqwest::Client,
    base_url: &str,
    count: usize,
) -> Result<Vec<i64>> {
    let res = client
        .get(format!("{}/api/exercises?limit=50", base_url))
        .send()
        .await?;
    let body: Value = res.json().await?;
    let ids: Vec<i64> = body["exercises"]
        .as_array()
        .context("exercises array")?
        .iter()
        .filter_map(|e| e["id"].as_i64())
        .take(count)
        .collect();
    anyhow::ensure!(ids.len() == count, "not enough seeded exercises");
    Ok(ids)
}

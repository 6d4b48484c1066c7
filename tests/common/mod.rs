#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use jobly_api::auth::create_token;
use jobly_api::config::AppConfig;
use jobly_api::database::models::{NewCompany, NewUser};
use jobly_api::database::{CompanyStore, MemoryStore};
use jobly_api::services::UserService;
use jobly_api::state::AppState;

/// A server on its own port with its own in-memory store. Dropped with the
/// test's runtime.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
    client: reqwest::Client,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let state = AppState::new(AppConfig::test(), Arc::new(MemoryStore::new()));
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .context("failed to bind test port")?;
        let app = jobly_api::app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { port, base_url, state, client: reqwest::Client::new() })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.client.patch(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    pub fn token_for(&self, username: &str, is_admin: bool) -> String {
        create_token(username, is_admin, &self.state.config.security).expect("token")
    }

    pub fn u1_token(&self) -> String {
        self.token_for("u1", false)
    }

    pub fn u2_token(&self) -> String {
        self.token_for("u2", false)
    }

    /// Token for an admin that has no stored account.
    pub fn admin_token(&self) -> String {
        self.token_for("admin", true)
    }

    async fn seed(&self) -> Result<()> {
        for n in 1..=3 {
            self.state
                .store
                .insert_company(NewCompany {
                    handle: format!("c{}", n),
                    name: format!("C{}", n),
                    description: format!("Desc{}", n),
                    num_employees: Some(n),
                    logo_url: Some(format!("http://c{}.img", n)),
                })
                .await?;
        }

        let users = UserService::new(&self.state);
        for n in 1..=3 {
            users
                .create(NewUser {
                    username: format!("u{}", n),
                    password: format!("password{}", n),
                    first_name: format!("U{}F", n),
                    last_name: format!("U{}L", n),
                    email: format!("user{}@user.com", n),
                    is_admin: false,
                })
                .await
                .map_err(|e| anyhow::anyhow!("seeding u{} failed: {}", n, e))?;
        }
        Ok(())
    }
}

/// Starts a server seeded with companies c1..c3 and users u1..u3.
pub async fn seeded_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    server.seed().await?;
    Ok(server)
}

/// Reads the body and returns it with the status.
pub async fn json_response(res: reqwest::Response) -> Result<(StatusCode, Value)> {
    let status = res.status();
    let body = res.json::<Value>().await.context("response body was not JSON")?;
    Ok((status, body))
}

pub fn handles(body: &Value) -> Vec<String> {
    body["companies"]
        .as_array()
        .map(|companies| {
            companies
                .iter()
                .filter_map(|c| c["handle"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

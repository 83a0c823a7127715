use std::collections::HashMap;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::Value;
use syllabus::{
    Config,
    auth::{InstructorClaims, generate_token},
    build_server_with_pool,
    model::DbConnection,
    web::middlewares::AUTH_TOKEN,
};
use tower_cookies::Cookie;
use uuid::Uuid;

/// Builds the app over a lazy pool. Nothing talks to postgres unless a draft is saved.
pub async fn setup_server() -> TestServer {
    let _ = dotenvy::dotenv();
    let config = Config::get_or_init(true).await;
    let db = DbConnection::connect(config.app().database_uri()).unwrap();
    let server = build_server_with_pool(db).await.unwrap().1;
    TestServer::new(server).unwrap()
}

#[derive(Debug, Clone)]
pub struct TestUser {
    #[allow(unused)]
    pub id: Uuid,
    pub token: String,
}

async fn issue(role: &str) -> TestUser {
    let id = Uuid::new_v4();
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp();
    let key = Config::get_or_init(true).await.app().jwt();
    let token = generate_token(InstructorClaims::new(id, role, exp), key).unwrap();
    TestUser { id, token }
}

pub async fn instructor() -> TestUser {
    issue("instructor").await
}

pub async fn admin() -> TestUser {
    issue("admin").await
}

#[derive(Debug)]
pub struct FlowContext {
    pub store: HashMap<&'static str, Value>, // a way to pass data between steps
}

impl FlowContext {
    pub fn new() -> Self {
        Self {
            store: HashMap::new(),
        }
    }

    pub fn store(&mut self, key: &'static str, val: Value) {
        self.store.insert(key, val);
    }

    pub fn get(&self, key: &str) -> &Value {
        self.store.get(key).expect("missing store key")
    }

    /// Id of the draft opened by the step saved under `key`.
    pub fn draft_id(&self, key: &str) -> String {
        let value = self.get(key);
        let id = value.get("draft").map(|d| &d["id"]).unwrap_or(&value["id"]);
        id.as_str().expect("no draft id").to_string()
    }

    /// Id of the section or lecture created by the step saved under `key`.
    pub fn created_id(&self, key: &str) -> String {
        self.get(key)["created_id"]
            .as_str()
            .expect("no created id")
            .to_string()
    }
}

type BodyCheck = Box<dyn Fn(&Value, &FlowContext) + Send + Sync>;

pub struct Action {
    pub name: &'static str,
    pub method: &'static str,
    pub path: String,
    pub dyn_path: Option<Box<dyn Fn(&FlowContext) -> String + Send + Sync>>,
    pub body: Option<Value>,
    pub dyn_body: Option<Box<dyn Fn(&FlowContext) -> Value + Send + Sync>>,
    pub expect: StatusCode,
    pub token: Option<String>,
    pub query_params: Vec<(String, String)>,
    pub body_asserts: Vec<BodyCheck>,
    pub save_as: Option<&'static str>,
}

impl Action {
    pub fn new(name: &'static str, method: &'static str, path: &'static str) -> Self {
        Self {
            name,
            method,
            path: path.to_string(),
            dyn_path: None,
            body: None,
            dyn_body: None,
            expect: StatusCode::OK,
            token: None,
            query_params: vec![],
            body_asserts: vec![],
            save_as: None,
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_expect(mut self, expect: StatusCode) -> Self {
        self.expect = expect;
        self
    }

    pub fn as_user(mut self, user: &TestUser) -> Self {
        self.token = Some(user.token.clone());
        self
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    #[allow(unused)]
    pub fn with_param(mut self, key: &str, val: &str) -> Self {
        self.query_params
            .push((String::from(key), String::from(val)));
        self
    }

    pub fn with_dyn_path<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> String + Send + Sync + 'static,
    {
        self.dyn_path = Some(Box::new(f));
        self
    }

    pub fn with_dyn_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&FlowContext) -> Value + Send + Sync + 'static,
    {
        self.dyn_body = Some(Box::new(f));
        self
    }

    pub fn with_save_as(mut self, key: &'static str) -> Self {
        self.save_as = Some(key);
        self
    }

    pub fn assert_body<F>(mut self, check: F) -> Self
    where
        F: Fn(&Value, &FlowContext) + Send + Sync + 'static,
    {
        self.body_asserts.push(Box::new(check));
        self
    }
}

pub struct Flow {
    actions: Vec<Action>,
}

impl Flow {
    pub fn new() -> Self {
        Self { actions: vec![] }
    }

    pub fn step(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    pub async fn run(self, server: &TestServer) -> FlowContext {
        let mut ctx = FlowContext::new(); // create new context for this flow
        for action in self.actions {
            println!("==> Running test action `{}`", action.name);

            let path = if let Some(dyn_path_fn) = action.dyn_path {
                dyn_path_fn(&ctx)
            } else {
                action.path.clone()
            };

            let mut req = match action.method {
                "GET" => server.get(&path),
                "POST" => server.post(&path),
                "PUT" => server.put(&path),
                "DELETE" => server.delete(&path),
                _ => panic!("unsupported method {}", action.method),
            };

            if let Some(token) = action.token {
                req = req.add_cookie(Cookie::new(AUTH_TOKEN, token));
            }

            match (action.dyn_body, action.body) {
                (Some(f), _) => {
                    req = req.json(&f(&ctx));
                }
                (_, Some(json)) => req = req.json(&json),
                _ => {}
            }

            for (k, v) in action.query_params {
                req = req.add_query_param(&k, v);
            }

            let resp = req.await;
            resp.assert_status(action.expect);

            if !action.body_asserts.is_empty() || action.save_as.is_some() {
                let body = resp.json::<Value>();
                for check in action.body_asserts {
                    check(&body, &ctx);
                }

                if let Some(save_key) = action.save_as {
                    ctx.store(save_key, body);
                }
            }
        }
        ctx
    }
}

// Common actions builders

pub fn create_draft_action(user: &TestUser) -> Action {
    Action::new("create_draft", "POST", "/api/v1/drafts/")
        .as_user(user)
        .with_expect(StatusCode::CREATED)
        .with_save_as("draft")
}

pub fn add_section_action(user: &TestUser, key: &'static str, title: &'static str) -> Action {
    Action::new("add_section", "POST", "")
        .as_user(user)
        .with_dyn_path(|ctx| format!("/api/v1/drafts/{}/sections", ctx.draft_id("draft")))
        .with_body(serde_json::json!({ "title": title }))
        .with_expect(StatusCode::CREATED)
        .with_save_as(key)
}

pub fn add_lecture_action(
    user: &TestUser,
    key: &'static str,
    section: &'static str,
    title: &'static str,
) -> Action {
    Action::new("add_lecture", "POST", "")
        .as_user(user)
        .with_dyn_path(move |ctx| {
            format!(
                "/api/v1/drafts/{}/sections/{}/lectures",
                ctx.draft_id("draft"),
                ctx.created_id(section)
            )
        })
        .with_body(serde_json::json!({ "title": title, "type": "text", "duration": 10 }))
        .with_expect(StatusCode::CREATED)
        .with_save_as(key)
}

/// Lecture titles of the section at `index`, top to bottom.
pub fn lecture_titles(draft: &Value, index: usize) -> Vec<String> {
    draft["curriculum"]["sections"][index]["lectures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap().to_string())
        .collect()
}

pub fn section_titles(draft: &Value) -> Vec<String> {
    draft["curriculum"]["sections"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["title"].as_str().unwrap().to_string())
        .collect()
}

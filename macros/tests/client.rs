//! Generated clients driven against the live mock server.

use std::collections::BTreeMap;
use std::sync::Mutex;

use mock_server::{Echo, User};
use retrofit_core::{ApiError, HttpMethod, HttpRequest, HttpResponse, Transport};
use retrofit_macros::rest_client;
use serde::Serialize;
use ureq::typestate::WithBody;
use uuid::Uuid;

#[derive(Serialize)]
pub struct NewUser {
    name: String,
    role: String,
}

#[rest_client]
#[headers("X-Client: retrofit")]
pub trait UserApi {
    #[get("/users")]
    #[query("role")]
    #[query("limit")]
    fn list_users(&self, role: Option<&str>, limit: Option<usize>) -> Result<Vec<User>, ApiError>;

    #[get("/users/{id}")]
    #[headers("Accept: application/json")]
    fn get_user(&self, id: Uuid) -> Result<User, ApiError>;

    #[get("/users/{id}")]
    #[returns(raw)]
    fn get_user_raw(&self, id: Uuid) -> Result<HttpResponse, ApiError>;

    #[post("/users")]
    #[json_body(user)]
    fn create_user(&self, user: &NewUser) -> Result<User, ApiError>;

    #[put("/users/{id}/bio")]
    #[body(bio)]
    #[returns(text)]
    fn set_bio(&self, id: Uuid, bio: &str) -> Result<String, ApiError>;

    #[delete("/users/{id}")]
    fn delete_user(&self, id: Uuid) -> Result<(), ApiError>;

    /// Not an HTTP call; kept as written.
    fn describe(&self) -> &'static str {
        "users"
    }
}

#[rest_client(client = "EchoClient")]
pub trait EchoApi {
    #[post("/echo/{kind}")]
    #[headers("X-Api-Version: 2")]
    #[header("X-Token", var = token)]
    #[query("tag")]
    #[query_map(extra)]
    #[part("name", var = display_name)]
    #[part("file")]
    fn upload(
        &self,
        kind: &str,
        token: &str,
        tag: &str,
        extra: &BTreeMap<String, String>,
        display_name: &str,
        file: &str,
    ) -> Result<Echo, ApiError>;

    #[get("/echo/{type}")]
    #[headers("X-Api-Version: 1", "X-Api-Version: 3")]
    fn by_type(&self, r#type: &str) -> Result<Echo, ApiError>;

    #[post("/echo/relay")]
    #[header("X-Reply-To", var = response)]
    #[body(request)]
    #[returns(raw)]
    fn relay(&self, request: &str, response: &str) -> Result<HttpResponse, ApiError>;
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send(
    builder: ureq::RequestBuilder<WithBody>,
    body: Option<String>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = req.url();
        let body = req.body.as_ref().map(|b| b.encode());
        let headers = &req.headers;
        let agent = &self.agent;

        let mut response = match req.method {
            HttpMethod::Get => with_headers(agent.get(&url), headers).call(),
            HttpMethod::Delete => with_headers(agent.delete(&url), headers).call(),
            HttpMethod::Head => with_headers(agent.head(&url), headers).call(),
            HttpMethod::Options => with_headers(agent.options(&url), headers).call(),
            HttpMethod::Post => send(with_headers(agent.post(&url), headers), body),
            HttpMethod::Put => send(with_headers(agent.put(&url), headers), body),
            HttpMethod::Patch => send(with_headers(agent.patch(&url), headers), body),
        }
        .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string().unwrap_or_default();
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

// ---------------------------------------------------------------------------
// Against the mock server
// ---------------------------------------------------------------------------

#[test]
fn user_lifecycle_through_generated_client() {
    let client = UserApiClient::new(&start_server(), UreqTransport::new());
    assert_eq!(client.describe(), "users");

    assert!(client.list_users(None, None).unwrap().is_empty());

    let ada = client
        .create_user(&NewUser {
            name: "Ada".to_string(),
            role: "admin".to_string(),
        })
        .unwrap();
    client
        .create_user(&NewUser {
            name: "Grace".to_string(),
            role: "member".to_string(),
        })
        .unwrap();

    assert_eq!(client.get_user(ada.id).unwrap(), ada);
    assert_eq!(client.set_bio(ada.id, "Analytical engines").unwrap(), "Analytical engines");
    assert_eq!(client.get_user(ada.id).unwrap().bio, "Analytical engines");

    let admins = client.list_users(Some("admin"), None).unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].name, "Ada");
    let first = client.list_users(None, Some(1)).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "Ada");

    client.delete_user(ada.id).unwrap();
    assert!(matches!(client.get_user(ada.id), Err(ApiError::NotFound)));
    assert_eq!(client.get_user_raw(ada.id).unwrap().status, 404);
    assert!(matches!(client.delete_user(ada.id), Err(ApiError::NotFound)));
}

#[test]
fn echo_sees_every_binding() {
    let client = EchoClient::new(&start_server(), UreqTransport::new());
    let mut extra = BTreeMap::new();
    extra.insert("page".to_string(), "2".to_string());

    let echo = client
        .upload("avatars", "secret", "a b", &extra, "me.png", "bytes")
        .unwrap();

    assert_eq!(echo.method, "POST");
    assert_eq!(echo.path, "/echo/avatars");
    assert_eq!(
        echo.query,
        vec![
            ("tag".to_string(), "a b".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
    assert!(echo.headers.contains(&("x-token".to_string(), "secret".to_string())));
    assert!(echo.headers.contains(&("x-api-version".to_string(), "2".to_string())));
    assert!(echo.body.contains("name=\"name\"\r\n\r\nme.png"));
    assert!(echo.body.contains("name=\"file\"\r\n\r\nbytes"));
}

// ---------------------------------------------------------------------------
// Against a recording transport
// ---------------------------------------------------------------------------

fn recording<'a>(
    seen: &'a Mutex<Vec<HttpRequest>>,
    body: &'static str,
) -> impl Fn(HttpRequest) -> Result<HttpResponse, ApiError> + 'a {
    move |req: HttpRequest| -> Result<HttpResponse, ApiError> {
        seen.lock().unwrap().push(req);
        Ok(HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }
}

#[test]
fn class_headers_come_before_method_headers() {
    let seen = Mutex::new(Vec::new());
    let client = UserApiClient::new("http://api.test/", recording(&seen, "[]"));
    assert_eq!(client.base_url(), "http://api.test");

    client.list_users(Some("admin"), None).unwrap();

    let requests = seen.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url(), "http://api.test/users?role=admin");
    assert_eq!(request.headers, vec![("X-Client".to_string(), "retrofit".to_string())]);
    assert_eq!(request.body, None);
}

#[test]
fn later_header_with_same_name_wins() {
    let seen = Mutex::new(Vec::new());
    let client = EchoClient::new("http://api.test", recording(&seen, "{\"method\":\"GET\",\"path\":\"/\",\"query\":[],\"headers\":[],\"body\":\"\"}"));

    client.by_type("kinds").unwrap();

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].path, "http://api.test/echo/kinds");
    assert_eq!(requests[0].header("x-api-version"), Some("3"));
    assert_eq!(requests[0].headers.len(), 1);
}

#[test]
fn json_body_sets_content_type() {
    let seen = Mutex::new(Vec::new());
    let body = "{\"id\":\"00000000-0000-0000-0000-000000000000\",\"name\":\"Ada\",\"role\":\"admin\"}";
    let client = UserApiClient::new("http://api.test", recording(&seen, body));

    let user = client
        .create_user(&NewUser {
            name: "Ada".to_string(),
            role: "admin".to_string(),
        })
        .unwrap();
    assert_eq!(user.id, Uuid::nil());

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].header("content-type"), Some("application/json"));
    assert_eq!(
        requests[0].body,
        Some(retrofit_core::Body::Json("{\"name\":\"Ada\",\"role\":\"admin\"}".to_string()))
    );
}

#[test]
fn parameters_named_like_generated_locals() {
    let seen = Mutex::new(Vec::new());
    let client = EchoClient::new("http://api.test", recording(&seen, "relayed"));

    let response = client.relay("ping", "inbox").unwrap();
    assert_eq!(response.status, 200);
    assert_eq!(response.body, "relayed");

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].path, "http://api.test/echo/relay");
    assert_eq!(requests[0].header("x-reply-to"), Some("inbox"));
    assert_eq!(requests[0].body, Some(retrofit_core::Body::Text("ping".to_string())));
}

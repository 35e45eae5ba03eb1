use std::net::SocketAddr;

use hogwarts_school::{create_routes, AppState};
use migration::{Migrator, MigratorTrait};
use reqwest::{multipart, Client};
use sea_orm::{Database, DatabaseConnection};
use serde_json::Value;
use tempfile::TempDir;

pub mod routes {
    pub const STUDENTS: &str = "/student";
    pub const STUDENT_COUNT: &str = "/student/count";
    pub const STUDENT_AGE_AVG: &str = "/student/age-avg";
    pub const STUDENT_AGE_AVG_PARALLEL: &str = "/student/age-avg-parallel";
    pub const STUDENT_DESC_FIVE: &str = "/student/desc-five";
    pub const STUDENT_NAMES_A: &str = "/student/names-starting-with-a";
    pub const FACULTIES: &str = "/faculty";
    pub const AVATARS: &str = "/avatar";

    pub fn student(id: i64) -> String {
        format!("/student/{id}")
    }

    pub fn student_faculty(id: i64) -> String {
        format!("/student/{id}/faculty")
    }

    pub fn student_avatar(id: i64) -> String {
        format!("/student/{id}/avatar")
    }

    pub fn avatar_from_db(id: i64) -> String {
        format!("/student/{id}/avatar-from-db")
    }

    pub fn avatar_from_fs(id: i64) -> String {
        format!("/student/{id}/avatar-from-fs")
    }

    pub fn faculty(id: i64) -> String {
        format!("/faculty/{id}")
    }

    pub fn faculty_students(id: i64) -> String {
        format!("/faculty/{id}/students")
    }
}

/// A running test server backed by in-memory SQLite and a temporary avatar directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub db: DatabaseConnection,
    pub avatars_dir: TempDir,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

impl TestResponse {
    async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.expect("Failed to read response body");
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }
}

/// Raw bytes response, used for avatar downloads.
pub struct BytesResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    pub bytes: Vec<u8>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        let avatars_dir = TempDir::new().expect("Failed to create avatar directory");
        let state = AppState::new(db.clone(), avatars_dir.path().to_path_buf());
        let app = create_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            db,
            avatars_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_bytes(&self, path: &str) -> BytesResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        let status = res.status().as_u16();
        let content_type = res
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let content_length = res
            .headers()
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let bytes = res
            .bytes()
            .await
            .expect("Failed to read response body")
            .to_vec();

        BytesResponse {
            status,
            content_type,
            content_length,
            bytes,
        }
    }

    pub async fn post(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn put(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    pub async fn upload(
        &self,
        path: &str,
        field: &str,
        filename: &str,
        media_type: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(filename.to_string())
            .mime_str(media_type)
            .expect("Invalid media type");
        let form = multipart::Form::new().part(field.to_string(), part);

        let res = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("Failed to send multipart request");

        TestResponse::from_response(res).await
    }

    pub async fn create_faculty(&self, name: &str, color: &str) -> i64 {
        let res = self
            .post(
                routes::FACULTIES,
                &serde_json::json!({"name": name, "color": color}),
            )
            .await;
        assert_eq!(res.status, 201, "Faculty creation failed: {}", res.text);
        res.body["id"].as_i64().unwrap()
    }

    pub async fn create_student(&self, name: &str, age: i32, faculty_id: Option<i64>) -> i64 {
        let res = self
            .post(
                routes::STUDENTS,
                &serde_json::json!({"name": name, "age": age, "faculty_id": faculty_id}),
            )
            .await;
        assert_eq!(res.status, 201, "Student creation failed: {}", res.text);
        res.body["id"].as_i64().unwrap()
    }
}

use serde_json::json;

use crate::common::{routes, TestApp};

fn names(body: &serde_json::Value) -> Vec<String> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap().to_string())
        .collect()
}

mod crud {
    use super::*;

    #[tokio::test]
    async fn created_faculty_can_be_fetched_and_updated() {
        let app = TestApp::spawn().await;
        let id = app.create_faculty("Hufflepuff", "yellow").await;

        let fetched = app.get(&routes::faculty(id)).await;
        assert_eq!(fetched.status, 200);
        assert_eq!(fetched.body["name"], "Hufflepuff");
        assert_eq!(fetched.body["color"], "yellow");

        let updated = app
            .put(
                &routes::faculty(id),
                &json!({"name": "Hufflepuff House", "color": "black"}),
            )
            .await;
        assert_eq!(updated.status, 200);
        assert_eq!(updated.body["id"], id);
        assert_eq!(updated.body["color"], "black");
    }

    #[tokio::test]
    async fn missing_faculty_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::faculty(31)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "Faculty with id = 31 not found");
    }

    #[tokio::test]
    async fn empty_faculty_can_be_deleted() {
        let app = TestApp::spawn().await;
        let id = app.create_faculty("Slytherin", "green").await;

        assert_eq!(app.delete(&routes::faculty(id)).await.status, 200);
        assert_eq!(app.get(&routes::faculty(id)).await.status, 404);
    }

    #[tokio::test]
    async fn faculty_with_students_cannot_be_deleted() {
        let app = TestApp::spawn().await;
        let id = app.create_faculty("Gryffindor", "red").await;
        app.create_student("Harry", 17, Some(id)).await;

        let res = app.delete(&routes::faculty(id)).await;

        assert_eq!(res.status, 409);
        assert_eq!(app.get(&routes::faculty(id)).await.status, 200);
    }
}

mod filtering {
    use super::*;

    #[tokio::test]
    async fn filters_by_exact_color() {
        let app = TestApp::spawn().await;
        app.create_faculty("Gryffindor", "red").await;
        app.create_faculty("Phoenix", "red").await;
        app.create_faculty("Crimson", "RED").await;
        app.create_faculty("Slytherin", "green").await;

        let res = app.get("/faculty?color=red").await;

        assert_eq!(res.status, 200);
        assert_eq!(names(&res.body), vec!["Gryffindor", "Phoenix"]);
    }

    #[tokio::test]
    async fn filters_by_color_or_name_ignoring_case() {
        let app = TestApp::spawn().await;
        app.create_faculty("Gryffindor", "Black").await;
        app.create_faculty("BLACK", "white").await;
        app.create_faculty("Slytherin", "green").await;

        let res = app.get("/faculty?colorOrName=black").await;

        assert_eq!(res.status, 200);
        assert_eq!(names(&res.body), vec!["Gryffindor", "BLACK"]);
    }

    #[tokio::test]
    async fn lists_students_of_faculty() {
        let app = TestApp::spawn().await;
        let id = app.create_faculty("Gryffindor", "red").await;
        app.create_student("Harry", 17, Some(id)).await;
        app.create_student("Hermione", 17, Some(id)).await;
        app.create_student("Draco", 17, None).await;

        let res = app.get(&routes::faculty_students(id)).await;
        assert_eq!(res.status, 200);
        assert_eq!(names(&res.body), vec!["Harry", "Hermione"]);

        let res = app.get(&routes::faculty_students(404)).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }
}

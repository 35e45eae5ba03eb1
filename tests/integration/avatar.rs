use hogwarts_school::entities::avatar;
use sea_orm::{EntityTrait, PaginatorTrait};

use crate::common::{routes, TestApp};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

mod upload {
    use super::*;

    #[tokio::test]
    async fn uploaded_avatar_is_served_from_both_backends() {
        let app = TestApp::spawn().await;
        let id = app.create_student("Hermione", 17, None).await;

        let res = app
            .upload(&routes::student_avatar(id), "avatar", "me.png", "image/png", PNG_BYTES)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["student_id"], id);
        assert_eq!(res.body["file_size"], PNG_BYTES.len());
        assert_eq!(res.body["media_type"], "image/png");
        assert!(res.body.get("data").is_none());

        for path in [routes::avatar_from_db(id), routes::avatar_from_fs(id)] {
            let bytes = app.get_bytes(&path).await;
            assert_eq!(bytes.status, 200, "{path}");
            assert_eq!(bytes.content_type.as_deref(), Some("image/png"));
            assert_eq!(bytes.content_length, Some(PNG_BYTES.len() as u64));
            assert_eq!(bytes.bytes, PNG_BYTES);
        }
    }

    #[tokio::test]
    async fn reupload_keeps_a_single_avatar() {
        let app = TestApp::spawn().await;
        let id = app.create_student("Harry", 17, None).await;

        for (name, media_type, bytes) in [
            ("a.png", "image/png", b"first".as_slice()),
            ("b.jpg", "image/jpeg", b"second".as_slice()),
            ("c.gif", "image/gif", b"third".as_slice()),
        ] {
            let res = app
                .upload(&routes::student_avatar(id), "avatar", name, media_type, bytes)
                .await;
            assert_eq!(res.status, 200, "{}", res.text);
        }

        assert_eq!(avatar::Entity::find().count(&app.db).await.unwrap(), 1);
        let latest = app.get_bytes(&routes::avatar_from_fs(id)).await;
        assert_eq!(latest.bytes, b"third");
        assert_eq!(latest.content_type.as_deref(), Some("image/gif"));
    }

    #[tokio::test]
    async fn upload_for_missing_student_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(&routes::student_avatar(77), "avatar", "me.png", "image/png", PNG_BYTES)
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["error"], "Student with id = 77 not found");
        assert_eq!(
            std::fs::read_dir(app.avatars_dir.path()).unwrap().count(),
            0
        );
    }

    #[tokio::test]
    async fn upload_without_avatar_field_is_rejected() {
        let app = TestApp::spawn().await;
        let id = app.create_student("Ron", 17, None).await;

        let res = app
            .upload(&routes::student_avatar(id), "picture", "me.png", "image/png", PNG_BYTES)
            .await;

        assert_eq!(res.status, 400);
    }
}

mod retrieval {
    use super::*;

    #[tokio::test]
    async fn missing_avatar_is_not_found() {
        let app = TestApp::spawn().await;
        let id = app.create_student("Luna", 16, None).await;

        assert_eq!(app.get_bytes(&routes::avatar_from_db(id)).await.status, 404);
        assert_eq!(app.get_bytes(&routes::avatar_from_fs(id)).await.status, 404);
    }

    #[tokio::test]
    async fn deleted_file_is_a_server_error_from_fs_only() {
        let app = TestApp::spawn().await;
        let id = app.create_student("Fred", 19, None).await;
        let res = app
            .upload(&routes::student_avatar(id), "avatar", "me.png", "image/png", PNG_BYTES)
            .await;
        let file_path = res.body["file_path"].as_str().unwrap().to_string();

        std::fs::remove_file(file_path).unwrap();

        let from_fs = app.get(&routes::avatar_from_fs(id)).await;
        assert_eq!(from_fs.status, 500);
        assert_eq!(from_fs.body["error"], "Failed to process avatar");
        assert_eq!(app.get_bytes(&routes::avatar_from_db(id)).await.status, 200);
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn pages_are_one_based() {
        let app = TestApp::spawn().await;
        for i in 0..7 {
            let id = app.create_student(&format!("S{i}"), 18, None).await;
            app.upload(&routes::student_avatar(id), "avatar", "a.png", "image/png", b"x")
                .await;
        }

        let first = app.get(&format!("{}?page=1&limit=5", routes::AVATARS)).await;
        assert_eq!(first.status, 200);
        assert_eq!(first.body.as_array().unwrap().len(), 5);

        let second = app.get(&format!("{}?page=2&limit=5", routes::AVATARS)).await;
        assert_eq!(second.body.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn page_zero_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.get(&format!("{}?page=0&limit=5", routes::AVATARS)).await;

        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn huge_page_or_limit_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .get(&format!("{}?page={}&limit=10", routes::AVATARS, u64::MAX))
            .await;
        assert_eq!(res.status, 400);

        let res = app.get(&format!("{}?page=1&limit=101", routes::AVATARS)).await;
        assert_eq!(res.status, 400);
    }
}

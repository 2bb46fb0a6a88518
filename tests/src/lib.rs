
#[cfg(test)]
mod tests {
    use crate::recording_server::RecordingServer;
    use futures::future::join_all;
    use serde_json::json;
    use std::{io::Write, sync::Arc, time::Duration};
    use testbench_client::{
        ApiClient, ApiSettings, Error, ExcelFile, FileTokenStore, RecordingNotifier,
        RequestConfig, StaticTokenStore, TestCase, TokenStore,
    };

    fn client_for(
        server: &RecordingServer,
        token_store: Arc<dyn TokenStore + Send + Sync>,
        notifier: Arc<RecordingNotifier>,
    ) -> ApiClient {
        let settings = ApiSettings {
            origin: server.origin(),
            ..ApiSettings::default()
        };
        ApiClient::from_settings(settings, token_store, notifier).unwrap()
    }

    fn test_case() -> TestCase {
        TestCase::new(
            "/srv/project_backend",
            "models.models.Disease",
            "clone",
            ExcelFile::new("cases.xlsx", b"PK\x03\x04".to_vec()),
        )
    }

    #[tokio::test]
    async fn token_is_sent_as_bearer_header() {
        let server = RecordingServer::start(200, "{}");
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::new("abc123")),
            Arc::new(RecordingNotifier::new()),
        );

        client.get("/scan_classes").await.unwrap();

        let requests = server.requests();
        assert_eq!(requests[0].uri, "/api/scan_classes");
        assert_eq!(requests[0].header("authorization"), Some("Bearer abc123"));
    }

    #[tokio::test]
    async fn no_token_means_no_authorization_header() {
        let server = RecordingServer::start(200, "{}");
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::empty()),
            Arc::new(RecordingNotifier::new()),
        );

        client.get("/scan_classes").await.unwrap();

        assert_eq!(server.requests()[0].header("authorization"), None);
    }

    #[tokio::test]
    async fn token_file_is_read_per_request() {
        let server = RecordingServer::start(200, "{}");
        let mut token_file = tempfile::NamedTempFile::new().unwrap();
        write!(token_file, "from-file\n").unwrap();
        let client = client_for(
            &server,
            Arc::new(FileTokenStore::new(token_file.path())),
            Arc::new(RecordingNotifier::new()),
        );

        client.get("/scan_classes").await.unwrap();

        assert_eq!(
            server.requests()[0].header("authorization"),
            Some("Bearer from-file")
        );
    }

    #[tokio::test]
    async fn success_resolves_to_the_body() {
        let server = RecordingServer::start(200, r#"{"a":1}"#);
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::empty()),
            Arc::new(RecordingNotifier::new()),
        );

        let body = client.get("/anything").await.unwrap();

        assert_eq!(body, json!({"a": 1}));
    }

    #[tokio::test]
    async fn server_message_is_notified_and_the_call_rejects() {
        let server = RecordingServer::start(400, r#"{"success":false,"message":"bad input"}"#);
        let notifier = Arc::new(RecordingNotifier::new());
        let client = client_for(&server, Arc::new(StaticTokenStore::empty()), notifier.clone());

        let error = client.run_unit_test(&test_case()).await.unwrap_err();

        assert_eq!(error.status(), Some(400));
        assert_eq!(error.server_message(), Some("bad input"));
        assert_eq!(notifier.messages(), vec!["bad input"]);
    }

    #[tokio::test]
    async fn error_without_message_uses_the_fallback() {
        let server = RecordingServer::start(500, "Internal Server Error");
        let notifier = Arc::new(RecordingNotifier::new());
        let client = client_for(&server, Arc::new(StaticTokenStore::empty()), notifier.clone());

        let result = client.get("/scan_functions").await;

        assert!(matches!(result, Err(Error::Status { status: 500, .. })));
        assert_eq!(notifier.messages(), vec!["An error occurred"]);
    }

    #[tokio::test]
    async fn unreachable_server_is_notified_with_the_fallback() {
        let notifier = Arc::new(RecordingNotifier::new());
        let origin = {
            let server = RecordingServer::start(200, "{}");
            server.origin()
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        let settings = ApiSettings {
            origin,
            ..ApiSettings::default()
        };
        let client = ApiClient::from_settings(
            settings,
            Arc::new(StaticTokenStore::empty()),
            notifier.clone(),
        )
        .unwrap();

        let result = client.get("/scan_classes").await;

        assert!(matches!(result, Err(Error::Transport(_))));
        assert_eq!(notifier.messages(), vec!["An error occurred"]);
    }

    #[tokio::test]
    async fn slow_responses_hit_the_client_timeout() {
        let server =
            RecordingServer::start_with_delay(200, "{}", Some(Duration::from_millis(500)));
        let notifier = Arc::new(RecordingNotifier::new());
        let settings = ApiSettings {
            origin: server.origin(),
            timeout_ms: 100,
            ..ApiSettings::default()
        };
        let client = ApiClient::from_settings(
            settings,
            Arc::new(StaticTokenStore::empty()),
            notifier.clone(),
        )
        .unwrap();

        let result = client.get("/scan_classes").await;

        match result {
            Err(Error::Transport(e)) => assert!(e.is_timeout()),
            other => panic!("expected a timeout, got {:?}", other),
        }
        assert_eq!(notifier.messages(), vec!["An error occurred"]);
    }

    #[tokio::test]
    async fn per_request_timeout_overrides_the_default() {
        let server =
            RecordingServer::start_with_delay(200, "{}", Some(Duration::from_millis(300)));
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::empty()),
            Arc::new(RecordingNotifier::new()),
        );

        let result = client
            .send(RequestConfig::get("/scan_classes").with_timeout(Duration::from_millis(50)))
            .await;

        assert!(matches!(result, Err(Error::Transport(e)) if e.is_timeout()));
    }

    #[tokio::test]
    async fn raw_string_plot_details_arrive_unchanged() {
        let server = RecordingServer::start(200, r#"{"success":true}"#);
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::new("tok")),
            Arc::new(RecordingNotifier::new()),
        );

        client
            .run_unit_test(&test_case().with_plot_details("raw string"))
            .await
            .unwrap();

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(request.uri, "/api/run_unit_test");
        assert!(request
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data"));
        assert_eq!(request.form_field("plot_details").as_deref(), Some("raw string"));
    }

    #[tokio::test]
    async fn structured_plot_details_arrive_as_json_text() {
        let server = RecordingServer::start(200, r#"{"success":true}"#);
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::empty()),
            Arc::new(RecordingNotifier::new()),
        );

        client
            .run_unit_test(&test_case().with_plot_details(json!({"x": 1})))
            .await
            .unwrap();

        assert_eq!(
            server.requests()[0].form_field("plot_details").as_deref(),
            Some(r#"{"x":1}"#)
        );
    }

    #[tokio::test]
    async fn absent_plot_details_are_not_submitted() {
        let server = RecordingServer::start(200, r#"{"success":true}"#);
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::empty()),
            Arc::new(RecordingNotifier::new()),
        );

        client.run_unit_test(&test_case()).await.unwrap();

        let request = &server.requests()[0];
        assert_eq!(request.form_field("plot_details"), None);
        assert_eq!(request.form_field("class_name").as_deref(), Some("models.models.Disease"));
        let excel = request.form_part("excel_file").unwrap();
        assert!(excel.headers.contains("filename=\"cases.xlsx\""));
        assert!(excel
            .headers
            .contains("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"));
    }

    #[tokio::test]
    async fn concurrent_calls_are_independent() {
        let server = RecordingServer::start(200, r#"{"success":true,"data":{}}"#);
        let client = client_for(
            &server,
            Arc::new(StaticTokenStore::new("tok")),
            Arc::new(RecordingNotifier::new()),
        );

        let directories: Vec<String> = (0..5).map(|i| format!("/srv/project_{}", i)).collect();
        let results = join_all(directories.iter().map(|dir| client.scan_classes(dir))).await;

        assert!(results.iter().all(Result::is_ok));
        let mut seen: Vec<String> = server
            .requests()
            .iter()
            .map(|request| {
                let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
                body["directory"].as_str().unwrap().to_string()
            })
            .collect();
        seen.sort();
        assert_eq!(seen, directories);
    }
}

//! Tests for the testing utilities module.
//!
//! These tests require the `testing` feature to be enabled.

#[cfg(feature = "testing")]
mod tests {
    use std::sync::Arc;

    use serde_json::json;
    use whisk::testing::MockTransport;
    use whisk::{Dictionary, WhiskClient, WhiskError};

    fn client(mock: &MockTransport) -> WhiskClient {
        WhiskClient::builder()
            .transport(Arc::new(mock.clone()))
            .build()
            .unwrap()
    }

    #[test]
    fn test_mock_records_path_and_body() {
        let mock = MockTransport::new();
        mock.respond_json(json!({"activationId": "a1"}));

        let mut params = Dictionary::new();
        params.insert("x".into(), json!(1));
        let reply = client(&mock).invoke("/ns/pkg/act", &params).unwrap();

        assert_eq!(reply["activationId"], "a1");
        mock.assert_request_count(1);
        mock.assert_posted("/api/v1/namespaces/ns/actions/pkg/act?blocking=true");
        assert_eq!(mock.requests()[0].json(), json!({"x": 1}));
    }

    #[test]
    fn test_mock_defaults_to_empty_dictionary() {
        let mock = MockTransport::new();
        let reply = client(&mock).trigger("tick", &Dictionary::new()).unwrap();
        assert!(reply.is_empty());
    }

    #[test]
    fn test_mock_replies_in_order() {
        let mock = MockTransport::new();
        mock.respond_json(json!({"n": 1}));
        mock.respond_json(json!({"n": 2}));

        let c = client(&mock);
        assert_eq!(c.invoke("a", &Dictionary::new()).unwrap()["n"], 1);
        assert_eq!(c.invoke("a", &Dictionary::new()).unwrap()["n"], 2);
        mock.assert_request_count(2);
    }

    #[test]
    fn test_mock_failure_is_no_response() {
        let mock = MockTransport::new();
        mock.fail_with("connection reset");

        let err = client(&mock).invoke("a", &Dictionary::new()).unwrap_err();
        assert!(matches!(err, WhiskError::NoResponse(ref d) if d == "connection reset"));
    }

    #[test]
    fn test_mock_raw_array_reply() {
        let mock = MockTransport::new();
        mock.respond_with("[]");

        let err = client(&mock).invoke("a", &Dictionary::new()).unwrap_err();
        assert!(matches!(err, WhiskError::ArrayResponse));
    }

    #[test]
    fn test_mock_clear() {
        let mock = MockTransport::new();
        mock.respond_json(json!({"n": 1}));
        client(&mock).invoke("a", &Dictionary::new()).unwrap();

        mock.clear();
        mock.assert_request_count(0);
        assert!(client(&mock).invoke("a", &Dictionary::new()).unwrap().is_empty());
    }

    #[test]
    #[should_panic(expected = "Expected a request to")]
    fn test_assert_posted_fails_without_request() {
        MockTransport::new().assert_posted("/nowhere");
    }
}

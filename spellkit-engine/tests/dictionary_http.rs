//! Dictionary loading over HTTP.

use spellkit_engine::{Dictionary, HttpCorpusSource};
use spellkit_test_utils::fixtures;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dictionary_for(server: &MockServer) -> Dictionary {
    let source = HttpCorpusSource::new(
        format!("{}/words.txt", server.uri()),
        Duration::from_secs(5),
    )
    .unwrap();
    Dictionary::new(Arc::new(source))
}

#[tokio::test]
async fn test_corpus_is_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(fixtures::dictionary_text()))
        .expect(1)
        .mount(&server)
        .await;

    let dict = dictionary_for(&server);
    tokio::join!(dict.ensure_loaded(), dict.ensure_loaded());
    dict.ensure_loaded().await;

    assert_eq!(dict.len(), fixtures::dictionary_words().len());
    assert!(dict.is_known("Koning"));
    assert!(dict.is_known("lucht."));
    assert!(!dict.is_known("cadeau"));
}

#[tokio::test]
async fn test_server_error_degrades_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/words.txt"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let dict = dictionary_for(&server);
    dict.ensure_loaded().await;

    assert!(dict.is_loaded());
    assert!(dict.is_empty());
    assert!(!dict.is_known("koning"));
}

//! Integration tests for the stream resolver

use pmostream::{Error, StreamResolver, NOTE_FROM_PLAYLIST};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> StreamResolver {
    StreamResolver::builder()
        .head_timeout(Duration::from_secs(2))
        .request_timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_head_audio_short_circuits() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/mpeg"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/direct"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/direct", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.input_url, url);
    assert_eq!(result.resolved_url, url);
    assert_eq!(result.content_type, "audio/mpeg");
    assert!(result.notes.is_empty());
}

#[tokio::test]
async fn test_head_redirect_returns_final_url() {
    let server = MockServer::start().await;
    let live = format!("{}/live", server.uri());

    Mock::given(method("HEAD"))
        .and(path("/st"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", live.as_str()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/live"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/mpeg"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/st", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.input_url, url);
    assert_eq!(result.resolved_url, live);
    assert_eq!(result.content_type, "audio/mpeg");
    assert!(result.notes.is_empty());
}

#[tokio::test]
async fn test_input_url_is_normalized() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "audio/mpeg"))
        .mount(&server)
        .await;

    let result = resolver()
        .resolve(&format!("  {}  ", server.uri()))
        .await
        .unwrap();

    let normalized = format!("{}/", server.uri());
    assert_eq!(result.input_url, normalized);
    assert_eq!(result.resolved_url, result.input_url);
}

#[tokio::test]
async fn test_get_follows_redirect_to_audio() {
    let server = MockServer::start().await;
    let live = format!("{}/live.aac", server.uri());

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/station"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", live.as_str()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/live.aac"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 32], "audio/aac"))
        .mount(&server)
        .await;

    let url = format!("{}/station", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.input_url, url);
    assert_eq!(result.resolved_url, live);
    assert_eq!(result.content_type, "audio/aac");
    assert!(result.notes.is_empty());
    assert!(result.is_audio());
}

#[tokio::test]
async fn test_pls_playlist_is_unwrapped() {
    let server = MockServer::start().await;
    let stream = format!("{}/stream.mp3", server.uri());
    let decoy = format!("{}/decoy.mp3", server.uri());
    let body = format!(
        "{decoy}\n[playlist]\nNumberOfEntries=1\nFile1={stream}\nTitle1=Test\n",
        decoy = decoy,
        stream = stream
    );

    Mock::given(method("GET"))
        .and(path("/listen.pls"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/stream.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "audio/mpeg"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/decoy.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 16], "audio/mpeg"))
        .expect(0)
        .mount(&server)
        .await;

    let url = format!("{}/listen.pls", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.resolved_url, stream);
    assert_eq!(result.content_type, "audio/mpeg");
    assert_eq!(result.notes, vec![NOTE_FROM_PLAYLIST.to_string()]);
    assert!(result.from_playlist());
}

#[tokio::test]
async fn test_m3u_playlist_is_unwrapped() {
    let server = MockServer::start().await;
    let stream = format!("{}/hls/live", server.uri());
    let body = format!("#EXTM3U\n#EXTINF:-1,Radio\n{}\n", stream);

    Mock::given(method("GET"))
        .and(path("/listen.m3u"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "application/vnd.apple.mpegurl"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hls/live"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 8], "application/ogg"))
        .mount(&server)
        .await;

    let result = resolver()
        .resolve(&format!("{}/listen.m3u", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.resolved_url, stream);
    assert_eq!(result.content_type, "application/ogg");
    assert!(result.from_playlist());
}

#[tokio::test]
async fn test_text_without_candidate_falls_back_with_note() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body>hello</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/page", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.resolved_url, url);
    assert_eq!(result.content_type, "text/html");
    assert_eq!(
        result.notes,
        vec!["Unrecognized content-type: text/html; returning final URL anyway.".to_string()]
    );
}

#[tokio::test]
async fn test_non_audio_candidate_falls_back_to_playlist_url() {
    let server = MockServer::start().await;
    let body = format!("{}/not-audio\n", server.uri());

    Mock::given(method("GET"))
        .and(path("/list.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/not-audio"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&server)
        .await;

    let url = format!("{}/list.m3u", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.resolved_url, url);
    assert_eq!(result.content_type, "text/plain");
    assert!(!result.from_playlist());
    assert_eq!(result.notes.len(), 1);
}

#[tokio::test]
async fn test_audio_pls_content_type_is_returned_as_is() {
    let server = MockServer::start().await;
    let body = format!("File1={}/elsewhere\n", server.uri());

    Mock::given(method("GET"))
        .and(path("/list.pls"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "audio/x-scpls-text"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/elsewhere"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "audio/mpeg"))
        .expect(0)
        .mount(&server)
        .await;

    // audio/* wins over the playlist scan
    let url = format!("{}/list.pls", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.resolved_url, url);
    assert_eq!(result.content_type, "audio/x-scpls-text");
    assert!(result.notes.is_empty());
}

#[tokio::test]
async fn test_failing_candidate_falls_back() {
    let server = MockServer::start().await;
    let body = format!("File1={}/gone\n", server.uri());

    Mock::given(method("GET"))
        .and(path("/list.pls"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/pls"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&server)
        .await;

    let url = format!("{}/list.pls", server.uri());
    let result = resolver().resolve(&url).await.unwrap();

    assert_eq!(result.resolved_url, url);
    assert_eq!(result.content_type, "application/pls");
    assert!(!result.from_playlist());
    assert_eq!(result.notes.len(), 1);
}

#[tokio::test]
async fn test_missing_content_type_reports_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bare"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let result = resolver()
        .resolve(&format!("{}/bare", server.uri()))
        .await
        .unwrap();

    assert_eq!(result.content_type, "unknown");
    assert_eq!(
        result.notes,
        vec!["Unrecognized content-type: unknown; returning final URL anyway.".to_string()]
    );
}

#[tokio::test]
async fn test_error_status_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = resolver()
        .resolve(&format!("{}/missing", server.uri()))
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, ref url } => {
            assert_eq!(status, 404);
            assert!(url.ends_with("/missing"));
        }
        other => panic!("Expected HttpStatus, got {:?}", other),
    }
}

#[tokio::test]
async fn test_playlist_body_is_capped() {
    let server = MockServer::start().await;
    let mut body = "#".repeat(200);
    body.push('\n');
    body.push_str(&format!("{}/late\n", server.uri()));

    Mock::given(method("GET"))
        .and(path("/long.m3u"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/plain"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/late"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(vec![0u8; 4], "audio/mpeg"))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = StreamResolver::builder()
        .max_playlist_bytes(100)
        .build()
        .unwrap();
    let result = resolver
        .resolve(&format!("{}/long.m3u", server.uri()))
        .await
        .unwrap();

    assert!(!result.from_playlist());
    assert_eq!(result.content_type, "text/plain");
}

//! End-to-end crawl tests against a local mock server.

use std::time::Duration;

use rtve_core::{ClientConfig, RtveClient, RtveError, RtveScraper};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_HTML: &str = r#"
<html><body><ul>
  <li class="elem_" data-setup="{'idAsset': '1001', 'autoplay': False}">
    <a class="goto_media" href="/audios/discopolis/1001/"><span class="maintitle"> Discópolis 1 </span></a>
    <span class="datemi">12 mar 2024</span>
    <span class="duration">58:12</span>
  </li>
  <li class="elem_" data-setup="{'idAsset': '1002'}">
    <a class="goto_media" href="/audios/discopolis/1002/"><span class="maintitle">Discópolis 2</span></a>
    <span class="datemi">13 mar 2024</span>
    <span class="duration">57:00</span>
  </li>
  <li class="elem_">
    <span class="maintitle">Discópolis 3</span>
  </li>
  <li class="elem_">
    <span class="datemi">sin título</span>
  </li>
</ul></body></html>
"#;

const DETAIL_HTML: &str = r#"
<html><head>
  <meta name="description" content="Especial David Bowie">
  <meta name="keywords" content="bowie, glam">
  <script type="application/ld+json">
    {"@type": "AudioObject", "datePublished": "2024-03-12", "duration": "PT58M12S",
     "embedUrl": "https://www.rtve.es/drmn/embed/audio/1001",
     "thumbnailUrl": "https://img2.rtve.es/1001.jpg",
     "description": "David Bowie: Heroes\nhttps://www.rtve.es\nDavid Bowie: Ashes to Ashes",
     "director": "José Miguel López"}
  </script>
</head></html>
"#;

fn fast_scraper() -> RtveScraper {
    let config = ClientConfig {
        download_delay: Duration::ZERO,
        timeout_secs: 5,
        ..ClientConfig::default()
    };
    RtveScraper::with_client(RtveClient::with_config(config).expect("client builds"))
}

#[tokio::test]
async fn test_crawl_episodes_merges_and_degrades() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emisiones"))
        .respond_with(ResponseTemplate::new(200).set_body_string(LISTING_HTML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audios/discopolis/1001/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_HTML))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/audios/discopolis/1002/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let scraper = fast_scraper();
    let records = scraper
        .crawl_episodes(&format!("{}/emisiones", server.uri()))
        .await
        .unwrap();

    assert_eq!(records.len(), 3);

    let first = &records[0];
    assert_eq!(first.title, "Discópolis 1");
    assert_eq!(first.asset_id.as_deref(), Some("1001"));
    assert_eq!(
        first.detail_url.as_deref(),
        Some(format!("{}/audios/discopolis/1001/", server.uri()).as_str())
    );
    assert_eq!(first.description.as_deref(), Some("Especial David Bowie"));
    assert_eq!(first.publish_date.as_deref(), Some("2024-03-12"));
    assert_eq!(first.iso_duration.as_deref(), Some("PT58M12S"));
    assert_eq!(first.thumbnail_url.as_deref(), Some("https://img2.rtve.es/1001.jpg"));
    assert_eq!(
        first.song_mentions,
        Some(vec![
            "David Bowie: Heroes".to_string(),
            "David Bowie: Ashes to Ashes".to_string()
        ])
    );
    assert_eq!(first.keywords.as_deref(), Some("bowie, glam"));
    assert_eq!(first.director.as_deref(), Some("José Miguel López"));

    let second = &records[1];
    assert_eq!(second.title, "Discópolis 2");
    assert_eq!(second.asset_id.as_deref(), Some("1002"));
    assert!(second.detail_url.is_some());
    assert!(!second.has_detail());

    let third = &records[2];
    assert_eq!(third.title, "Discópolis 3");
    assert_eq!(third.detail_url, None);
    assert!(!third.has_detail());
}

#[tokio::test]
async fn test_crawl_episodes_listing_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/emisiones"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = fast_scraper()
        .crawl_episodes(&format!("{}/emisiones", server.uri()))
        .await;

    assert!(matches!(result, Err(RtveError::NotFound(_))));
}

#[tokio::test]
async fn test_crawl_episodes_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let result = fast_scraper()
        .crawl_episodes(&format!("{}/emisiones", server.uri()))
        .await;

    assert!(matches!(result, Err(RtveError::RateLimited)));
}

#[tokio::test]
async fn test_fetch_programs_sends_api_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/programas/radio/rne/todos"))
        .and(header("accept", "application/json"))
        .and(header("referer", "https://www.rtve.es/play/radio/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"page": {"items": [
                {"name": "Discópolis", "uri": "discopolis/", "image": {"url": "https://img2.rtve.es/d.jpg"}},
                {"name": "Siglo 21", "uri": "siglo-21/"}
            ]}}"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let programs = fast_scraper()
        .fetch_programs(&format!("{}/api/programas/radio/rne/todos", server.uri()))
        .await
        .unwrap();

    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0].url, "https://www.rtve.es/play/radio/discopolis/");
    assert_eq!(programs[0].image_url.as_deref(), Some("https://img2.rtve.es/d.jpg"));
    assert_eq!(programs[1].image_url, None);
}

#[tokio::test]
async fn test_fetch_programs_malformed_body_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>mantenimiento</html>"))
        .mount(&server)
        .await;

    let programs = fast_scraper()
        .fetch_programs(&format!("{}/api/programas/radio/rne/todos", server.uri()))
        .await
        .unwrap();

    assert!(programs.is_empty());
}

#[tokio::test]
async fn test_client_sends_configured_user_agent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("user-agent", "TestBot/0.1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let client = RtveClient::with_config(ClientConfig {
        user_agent: "TestBot/0.1".to_string(),
        download_delay: Duration::ZERO,
        ..ClientConfig::default()
    })
    .unwrap();

    let body = client.fetch(&format!("{}/", server.uri())).await.unwrap();
    assert_eq!(body, "ok");
}

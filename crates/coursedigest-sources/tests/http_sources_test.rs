use coursedigest_sources::{RedditClient, RedditCredentials, SearchProvider, SerpApiProvider, ThreadSource};

const LISTING: &str = r#"[
  {"kind": "Listing", "data": {"children": [
    {"kind": "t3", "data": {"title": "CS577 workload", "selftext": "How bad is it?"}}
  ]}},
  {"kind": "Listing", "data": {"children": [
    {"kind": "t1", "data": {"body": "Weekly problem sets, plan for 10h."}}
  ]}}
]"#;

#[tokio::test]
async fn test_serpapi_filters_and_dedupes() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/search")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("engine".into(), "google".into()),
            mockito::Matcher::UrlEncoded("api_key".into(), "serp-key".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"{"organic_results": [
                {"link": "https://www.reddit.com/r/UWMadison/comments/a/cs577?share=1"},
                {"link": "https://example.com/cs577"},
                {"link": "https://www.reddit.com/r/UWMadison/comments/a/cs577"},
                {"title": "no link"},
                {"link": "https://www.reddit.com/r/UWMadison/comments/b/cs577_exam"}
            ]}"#,
        )
        .create_async()
        .await;

    let provider = SerpApiProvider::new("serp-key", "UWMadison")
        .unwrap()
        .with_endpoint(format!("{}/search", server.url()));

    let links = provider.search("site:reddit.com/r/UWMadison CS577", 25).await.unwrap();

    assert_eq!(
        links,
        vec![
            "https://www.reddit.com/r/UWMadison/comments/a/cs577".to_string(),
            "https://www.reddit.com/r/UWMadison/comments/b/cs577_exam".to_string(),
        ]
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_serpapi_error_status() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/search")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .create_async()
        .await;

    let provider = SerpApiProvider::new("serp-key", "UWMadison")
        .unwrap()
        .with_endpoint(format!("{}/search", server.url()));

    assert!(provider.search("CS577", 5).await.is_err());
}

#[tokio::test]
async fn test_anonymous_thread_fetch() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/UWMadison/comments/abc/cs577_workload.json")
        .match_query(mockito::Matcher::UrlEncoded("raw_json".into(), "1".into()))
        .with_status(200)
        .with_body(LISTING)
        .create_async()
        .await;

    let url = format!("{}/r/UWMadison/comments/abc/cs577_workload/", server.url());
    let thread = RedditClient::new(None).unwrap().fetch_thread(&url).await;

    assert_eq!(thread.url, url);
    assert_eq!(thread.title, "CS577 workload");
    assert_eq!(thread.comments, vec!["Weekly problem sets, plan for 10h."]);
}

#[tokio::test]
async fn test_failed_fetch_is_empty_thread() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/UWMadison/comments/gone.json")
        .match_query(mockito::Matcher::Any)
        .with_status(404)
        .create_async()
        .await;

    let url = format!("{}/r/UWMadison/comments/gone", server.url());
    let thread = RedditClient::new(None).unwrap().fetch_thread(&url).await;

    assert!(thread.is_empty());
    assert_eq!(thread.url, url);
}

#[tokio::test]
async fn test_oauth_fetch_reuses_token() {
    let mut server = mockito::Server::new_async().await;
    let token = server
        .mock("POST", "/api/v1/access_token")
        .with_status(200)
        .with_body(r#"{"access_token": "tok-123", "token_type": "bearer", "expires_in": 3600}"#)
        .expect(1)
        .create_async()
        .await;
    let listing = server
        .mock("GET", "/r/UWMadison/comments/abc.json")
        .match_query(mockito::Matcher::Any)
        .match_header("authorization", "Bearer tok-123")
        .with_status(200)
        .with_body(LISTING)
        .expect(2)
        .create_async()
        .await;

    let creds = RedditCredentials {
        client_id: "id".into(),
        client_secret: "secret".into(),
        user_agent: "coursedigest-test/1.0".into(),
    };
    let client = RedditClient::new(Some(creds))
        .unwrap()
        .with_endpoints(format!("{}/api/v1/access_token", server.url()), server.url());

    let url = "https://www.reddit.com/r/UWMadison/comments/abc";
    assert_eq!(client.fetch_thread(url).await.title, "CS577 workload");
    assert_eq!(client.fetch_thread(url).await.title, "CS577 workload");

    token.assert_async().await;
    listing.assert_async().await;
}

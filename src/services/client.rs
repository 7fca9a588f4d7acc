use once_cell::sync::Lazy;
use reqwest::blocking::Client;

/// Shared blocking HTTP client with a custom User-Agent. Building the client
/// once avoids the cost of TLS and connection pool setup for every request.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("mapview/0.1 (+https://github.com/example/mapview)")
        .build()
        .expect("failed to build reqwest blocking client")
});

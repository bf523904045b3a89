//! Per-request environment construction.
//!
//! # Responsibilities
//! - Map standardized headers into the fixed handler-facing key set
//! - Attach the body as a readable stream plus the error-output channel
//!
//! # Design Decisions
//! - String variables live in an insertion-ordered map so the environment
//!   enumerates in a stable, documented order
//! - Built freshly per request and handed to the handler by shared
//!   reference; nothing here is cached or mutated afterwards
//! - `SERVER_NAME` and `REMOTE_HOST` both carry the configured host; no
//!   DNS lookup happens on the request path

use std::io::{self, Cursor, Write};

use indexmap::IndexMap;

use crate::http::headers::{standardize, Headers};

/// The fixed environment key set.
pub mod keys {
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const GATEWAY_INTERFACE: &str = "GATEWAY_INTERFACE";
    pub const REMOTE_HOST: &str = "REMOTE_HOST";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
    pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
    pub const SERVER_SOFTWARE: &str = "SERVER_SOFTWARE";
    pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
    pub const PATH_INFO: &str = "PATH_INFO";
    pub const QUERY_STRING: &str = "QUERY_STRING";
    pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
    pub const HTTP_HOST: &str = "HTTP_HOST";
    pub const HTTP_CONNECTION: &str = "HTTP_CONNECTION";
    pub const HTTP_CACHE_CONTROL: &str = "HTTP_CACHE_CONTROL";
    pub const HTTP_SEC_CH_UA: &str = "HTTP_SEC_CH_UA";
    pub const HTTP_SEC_CH_UA_MOBILE: &str = "HTTP_SEC_CH_UA_MOBILE";
    pub const HTTP_SEC_CH_UA_PLATFORM: &str = "HTTP_SEC_CH_UA_PLATFORM";
    pub const HTTP_UPGRADE_INSECURE_REQUESTS: &str = "HTTP_UPGRADE_INSECURE_REQUESTS";
    pub const HTTP_USER_AGENT: &str = "HTTP_USER_AGENT";
    pub const HTTP_ACCEPT: &str = "HTTP_ACCEPT";
    pub const HTTP_SEC_FETCH_SITE: &str = "HTTP_SEC_FETCH_SITE";
    pub const HTTP_SEC_FETCH_MODE: &str = "HTTP_SEC_FETCH_MODE";
    pub const HTTP_SEC_FETCH_USER: &str = "HTTP_SEC_FETCH_USER";
    pub const HTTP_SEC_FETCH_DEST: &str = "HTTP_SEC_FETCH_DEST";
    pub const HTTP_ACCEPT_ENCODING: &str = "HTTP_ACCEPT_ENCODING";
    pub const HTTP_ACCEPT_LANGUAGE: &str = "HTTP_ACCEPT_LANGUAGE";
    pub const COOKIE: &str = "COOKIE";
    pub const REFERER: &str = "REFERER";
}

/// Software tag reported as `SERVER_SOFTWARE`.
pub const SERVER_SOFTWARE: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// The fixed-shape request representation handed to the handler.
///
/// String variables are reachable through [`Environ::get`]; the body, the
/// error channel, and the server characteristics have typed accessors.
#[derive(Debug)]
pub struct Environ {
    vars: IndexMap<&'static str, String>,
    body: Vec<u8>,
}

impl Environ {
    /// Look up a string variable, defaulting to the empty string.
    pub fn get(&self, key: &str) -> &str {
        self.vars.get(key).map(String::as_str).unwrap_or("")
    }

    /// Iterate the string variables in their documented order.
    pub fn vars(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.vars.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Readable stream over the request body bytes.
    pub fn input(&self) -> Cursor<&[u8]> {
        Cursor::new(&self.body)
    }

    /// Channel for handler-side error output.
    pub fn errors(&self) -> ErrorStream {
        ErrorStream
    }

    /// Gateway protocol version marker.
    pub fn version(&self) -> (u16, u16) {
        (1, 0)
    }

    /// URL scheme this server speaks.
    pub fn url_scheme(&self) -> &'static str {
        "http"
    }

    /// Whether handlers may be invoked from concurrent workers.
    pub fn multithread(&self) -> bool {
        true
    }

    /// Whether requests may be spread across processes.
    pub fn multiprocess(&self) -> bool {
        false
    }

    /// Whether the server exits after one request.
    pub fn run_once(&self) -> bool {
        false
    }
}

/// Error-output channel handed to handlers; writes go to process stderr.
#[derive(Debug)]
pub struct ErrorStream;

impl Write for ErrorStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()
    }
}

/// Build the environment for one request.
///
/// `headers` is the parser output; standardization happens here, so every
/// read below is a lookup-with-default over the guaranteed name set. `host`
/// and `port` describe the serving endpoint, `body` is the raw body text.
pub fn build_environ(headers: &Headers, host: &str, port: u16, body: String) -> Environ {
    let headers = standardize(headers);

    let path_info = headers.get_or_default("PATH_INFO");
    let (path, query) = match path_info.split_once('?') {
        Some((path, query)) => (path, query),
        None => (path_info, ""),
    };

    let mut vars = IndexMap::new();
    vars.insert(keys::SERVER_NAME, host.to_string());
    vars.insert(keys::GATEWAY_INTERFACE, "CGI/1.1".to_string());
    vars.insert(keys::REMOTE_HOST, host.to_string());
    vars.insert(keys::SERVER_PORT, port.to_string());
    vars.insert(
        keys::REQUEST_METHOD,
        headers.get_or_default("REQUEST_METHOD").to_string(),
    );
    vars.insert(
        keys::CONTENT_LENGTH,
        headers.get_or_default("Content-Length").to_string(),
    );
    vars.insert(keys::SCRIPT_NAME, String::new());
    vars.insert(keys::SERVER_SOFTWARE, SERVER_SOFTWARE.to_string());
    vars.insert(
        keys::SERVER_PROTOCOL,
        headers.get_or_default("SERVER_PROTOCOL").to_string(),
    );
    vars.insert(keys::PATH_INFO, path.to_string());
    vars.insert(keys::QUERY_STRING, query.to_string());
    vars.insert(
        keys::CONTENT_TYPE,
        headers.get_or_default("Content-Type").to_string(),
    );
    vars.insert(keys::HTTP_HOST, headers.get_or_default("Host").to_string());
    vars.insert(
        keys::HTTP_CONNECTION,
        headers.get_or_default("Connection").to_string(),
    );
    vars.insert(
        keys::HTTP_CACHE_CONTROL,
        headers.get_or_default("Cache-Control").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_CH_UA,
        headers.get_or_default("sec-ch-ua").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_CH_UA_MOBILE,
        headers.get_or_default("sec-ch-ua-mobile").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_CH_UA_PLATFORM,
        headers.get_or_default("sec-ch-ua-platform").to_string(),
    );
    vars.insert(
        keys::HTTP_UPGRADE_INSECURE_REQUESTS,
        headers.get_or_default("Upgrade-Insecure-Requests").to_string(),
    );
    vars.insert(
        keys::HTTP_USER_AGENT,
        headers.get_or_default("User-Agent").to_string(),
    );
    vars.insert(
        keys::HTTP_ACCEPT,
        headers.get_or_default("Accept").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_FETCH_SITE,
        headers.get_or_default("Sec-Fetch-Site").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_FETCH_MODE,
        headers.get_or_default("Sec-Fetch-Mode").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_FETCH_USER,
        headers.get_or_default("Sec-Fetch-User").to_string(),
    );
    vars.insert(
        keys::HTTP_SEC_FETCH_DEST,
        headers.get_or_default("Sec-Fetch-Dest").to_string(),
    );
    vars.insert(
        keys::HTTP_ACCEPT_ENCODING,
        headers.get_or_default("Accept-Encoding").to_string(),
    );
    vars.insert(
        keys::HTTP_ACCEPT_LANGUAGE,
        headers.get_or_default("Accept-Language").to_string(),
    );
    vars.insert(keys::COOKIE, headers.get_or_default("Cookie").to_string());
    vars.insert(keys::REFERER, headers.get_or_default("Referer").to_string());

    Environ {
        vars,
        body: body.into_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::parse_request;
    use std::io::Read;

    fn environ_for(raw: &[u8]) -> Environ {
        let (headers, body) = parse_request(raw).unwrap();
        build_environ(&headers, "localhost", 8000, body)
    }

    #[test]
    fn key_order_is_stable() {
        let environ = environ_for(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n");
        let names: Vec<&str> = environ.vars().map(|(key, _)| key).collect();
        assert_eq!(
            names,
            [
                "SERVER_NAME",
                "GATEWAY_INTERFACE",
                "REMOTE_HOST",
                "SERVER_PORT",
                "REQUEST_METHOD",
                "CONTENT_LENGTH",
                "SCRIPT_NAME",
                "SERVER_SOFTWARE",
                "SERVER_PROTOCOL",
                "PATH_INFO",
                "QUERY_STRING",
                "CONTENT_TYPE",
                "HTTP_HOST",
                "HTTP_CONNECTION",
                "HTTP_CACHE_CONTROL",
                "HTTP_SEC_CH_UA",
                "HTTP_SEC_CH_UA_MOBILE",
                "HTTP_SEC_CH_UA_PLATFORM",
                "HTTP_UPGRADE_INSECURE_REQUESTS",
                "HTTP_USER_AGENT",
                "HTTP_ACCEPT",
                "HTTP_SEC_FETCH_SITE",
                "HTTP_SEC_FETCH_MODE",
                "HTTP_SEC_FETCH_USER",
                "HTTP_SEC_FETCH_DEST",
                "HTTP_ACCEPT_ENCODING",
                "HTTP_ACCEPT_LANGUAGE",
                "COOKIE",
                "REFERER",
            ]
        );
    }

    #[test]
    fn server_identity_comes_from_arguments() {
        let environ = environ_for(b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(environ.get(keys::SERVER_NAME), "localhost");
        assert_eq!(environ.get(keys::REMOTE_HOST), "localhost");
        assert_eq!(environ.get(keys::SERVER_PORT), "8000");
        assert_eq!(environ.get(keys::GATEWAY_INTERFACE), "CGI/1.1");
        assert_eq!(environ.get(keys::SERVER_SOFTWARE), SERVER_SOFTWARE);
        assert_eq!(environ.get(keys::SCRIPT_NAME), "");
    }

    #[test]
    fn query_string_is_split_from_path() {
        let environ = environ_for(b"GET /search?q=rust&page=2 HTTP/1.1\r\n\r\n");
        assert_eq!(environ.get(keys::PATH_INFO), "/search");
        assert_eq!(environ.get(keys::QUERY_STRING), "q=rust&page=2");
    }

    #[test]
    fn path_without_query_yields_empty_query_string() {
        let environ = environ_for(b"GET /about HTTP/1.1\r\n\r\n");
        assert_eq!(environ.get(keys::PATH_INFO), "/about");
        assert_eq!(environ.get(keys::QUERY_STRING), "");
    }

    #[test]
    fn absent_standard_headers_default_to_empty() {
        let environ = environ_for(b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(environ.get(keys::HTTP_USER_AGENT), "");
        assert_eq!(environ.get(keys::HTTP_ACCEPT), "");
        assert_eq!(environ.get(keys::COOKIE), "");
        assert_eq!(environ.get(keys::CONTENT_LENGTH), "");
    }

    #[test]
    fn unlisted_headers_never_reach_the_environment() {
        let environ = environ_for(b"GET / HTTP/1.1\r\nX-Custom: 1\r\n\r\n");
        assert_eq!(environ.get("X-Custom"), "");
        assert_eq!(environ.get("HTTP_X_CUSTOM"), "");
        assert_eq!(environ.vars().count(), 29);
    }

    #[test]
    fn content_length_lookup_is_exact_case() {
        let environ = environ_for(b"POST / HTTP/1.1\r\ncontent-length: 10\r\n\r\nHello Worl");
        assert_eq!(environ.get(keys::CONTENT_LENGTH), "");
    }

    #[test]
    fn body_is_readable_through_input() {
        let environ = environ_for(
            b"POST /submit HTTP/1.1\r\nContent-Length: 11\r\n\r\nHello World",
        );
        assert_eq!(environ.get(keys::CONTENT_LENGTH), "11");

        let mut body = String::new();
        environ.input().read_to_string(&mut body).unwrap();
        assert_eq!(body, "Hello World");
    }

    #[test]
    fn server_characteristics_are_fixed() {
        let environ = environ_for(b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(environ.version(), (1, 0));
        assert_eq!(environ.url_scheme(), "http");
        assert!(environ.multithread());
        assert!(!environ.multiprocess());
        assert!(!environ.run_once());
    }

    #[test]
    fn unknown_keys_read_as_empty() {
        let environ = environ_for(b"GET / HTTP/1.1\r\n\r\n");
        assert_eq!(environ.get("NO_SUCH_KEY"), "");
    }
}

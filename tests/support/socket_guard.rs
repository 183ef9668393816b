//! Skips wiremock-based tests when localhost sockets cannot be bound.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

/// `KATUNOG_REQUIRE_SOCKET_TESTS` turns a skip into a failure, for CI.
#[must_use]
pub fn socket_tests_required() -> bool {
    std::env::var("KATUNOG_REQUIRE_SOCKET_TESTS")
        .ok()
        .is_some_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

#[track_caller]
#[must_use]
pub fn should_skip_socket_bound_test() -> bool {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return false;
    }

    let location = Location::caller();
    let message = format!(
        "[mock-server] {}:{} needs a localhost socket and none can be bound here",
        location.file(),
        location.line()
    );
    if socket_tests_required() {
        panic!("{message}; unset KATUNOG_REQUIRE_SOCKET_TESTS to skip instead");
    }

    eprintln!("{message}; skipping (set KATUNOG_REQUIRE_SOCKET_TESTS=1 to fail)");
    true
}

/// Starts a mock catalog server, or returns `None` when sockets are unavailable.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if should_skip_socket_bound_test() {
        None
    } else {
        Some(MockServer::start().await)
    }
}

/// Value returned by a skipped test.
pub trait SocketSkipReturn {
    fn socket_skip_return() -> Self;
}

impl SocketSkipReturn for () {
    fn socket_skip_return() -> Self {}
}

#[allow(dead_code)]
pub fn socket_skip_return<T: SocketSkipReturn>() -> T {
    T::socket_skip_return()
}

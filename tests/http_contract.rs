use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use fit_terminal::fit_api::{FitService, HttpFitService, TransportError};
use fit_terminal::http_client::build_client;
use reqwest::StatusCode;

/// Answers exactly one request with `status` and `body`, returning the request line.
fn one_shot_server(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().expect("accept connection");
        let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
        let mut request_line = String::new();
        reader.read_line(&mut request_line).expect("read request line");
        loop {
            let mut header = String::new();
            let n = reader.read_line(&mut header).expect("read header");
            if n == 0 || header == "\r\n" {
                break;
            }
        }
        let mut stream = stream;
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream
            .write_all(response.as_bytes())
            .expect("write response");
        request_line.trim_end().to_string()
    });
    (format!("http://{addr}/api/v1/"), handle)
}

fn service(base: &str) -> HttpFitService {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .build()
        .expect("client builds");
    HttpFitService::with_client(client, base)
}

#[test]
fn search_sends_name_param() {
    let (base, server) = one_shot_server(
        "200 OK",
        r#"[{"id":1,"full_name":"LeBron James","is_active":true}]"#,
    );

    let players = service(&base).search_players("lebron").expect("search succeeds");

    assert_eq!(players.len(), 1);
    assert_eq!(players[0].full_name, "LeBron James");
    let request = server.join().expect("server thread");
    assert_eq!(request, "GET /api/v1/players/search?name=lebron HTTP/1.1");
}

#[test]
fn teams_has_no_query_string() {
    let (base, server) = one_shot_server(
        "200 OK",
        r#"[{"id":1,"full_name":"Los Angeles Lakers","abbreviation":"LAL","city":"Los Angeles"}]"#,
    );

    let teams = service(&base).list_teams().expect("teams succeed");

    assert_eq!(teams[0].abbreviation, "LAL");
    let request = server.join().expect("server thread");
    assert_eq!(request, "GET /api/v1/teams HTTP/1.1");
}

#[test]
fn simulate_sends_both_ids() {
    let (base, server) = one_shot_server(
        "200 OK",
        r#"{"player_id":123,"player_name":"P","team_id":456,"team_name":"T","fit_score":95,"fit_label":"Perfect Fit","estimated_minutes":34}"#,
    );

    let result = service(&base).evaluate_fit(123, 456).expect("simulation succeeds");

    assert!(result.fit_score >= 90.0);
    assert_eq!(result.fit_label.as_str(), "Perfect Fit");
    let request = server.join().expect("server thread");
    assert_eq!(
        request,
        "GET /api/v1/simulate-fit?player_id=123&team_id=456 HTTP/1.1"
    );
}

#[test]
fn non_success_status_is_transport_error() {
    let (base, server) = one_shot_server(
        "500 Internal Server Error",
        r#"{"detail":"Erro ao processar simulação"}"#,
    );

    let err = service(&base)
        .evaluate_fit(1, 2)
        .expect_err("500 must fail");

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("detail"));
        }
        other => panic!("unexpected error: {other}"),
    }
    server.join().expect("server thread");
}

#[test]
fn unreachable_backend_is_request_error() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind local port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let err = service(&format!("http://{addr}"))
        .list_teams()
        .expect_err("nothing is listening");
    assert!(matches!(err, TransportError::Request(_)));
}

#[test]
fn default_client_builds_without_timeout() {
    assert!(build_client(None).is_ok());
}

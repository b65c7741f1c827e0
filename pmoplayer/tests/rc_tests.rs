//! VLC RC client against scripted TCP endpoints

use pmoplayer::{send_rc_commands, RcClient, RcEndpoint};
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_millis(300);

/// Endpoint that never writes and returns everything it received
fn silent_endpoint() -> (u16, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = String::new();
        stream.read_to_string(&mut received).unwrap();
        received
    });
    (port, handle)
}

/// Endpoint with a banner that answers every line
fn chatty_endpoint() -> (u16, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        stream
            .write_all(b"VLC media player 3.0.20 Vetinari\nCommand Line Interface initialized.\n> ")
            .unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut lines = Vec::new();
        let mut line = String::new();
        while reader.read_line(&mut line).unwrap() > 0 {
            let command = line.trim().to_string();
            let answer = match command.as_str() {
                "status" => "( audio volume: 256 )\n( state playing )\n> ".to_string(),
                other => format!("{} ok\n> ", other),
            };
            stream.write_all(answer.as_bytes()).unwrap();
            lines.push(command);
            line.clear();
        }
        lines
    });
    (port, handle)
}

fn commands(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_silent_endpoint_gets_forced_status() {
    let (port, server) = silent_endpoint();

    let result = send_rc_commands("127.0.0.1", port, &commands(&["pause"]), TIMEOUT);

    assert!(result.ok, "{:?}", result);
    assert_eq!(result.response.as_deref(), Some(""));
    assert_eq!(server.join().unwrap(), "pause\nstatus\n");
}

#[test]
fn test_chatty_endpoint_collects_responses() {
    let (port, server) = chatty_endpoint();

    let client = RcClient::new(RcEndpoint::new("127.0.0.1", port)).with_timeout(TIMEOUT);
    let result = client.volume_set(150);

    assert!(result.ok, "{:?}", result);
    let response = result.response.unwrap();
    assert!(response.starts_with("VLC media player"));
    assert!(response.contains("volume 512 ok"));
    assert_eq!(server.join().unwrap(), vec!["volume 512", "status"]);
}

#[test]
fn test_volume_change_sends_steps_then_status() {
    let (port, server) = chatty_endpoint();

    let client = RcClient::new(RcEndpoint::new("localhost", port)).with_timeout(TIMEOUT);
    let result = client.volume_change(-10);

    assert!(result.ok, "{:?}", result);
    assert_eq!(server.join().unwrap(), vec!["voldown 6", "status"]);
}

#[test]
fn test_commands_are_trimmed() {
    let (port, server) = silent_endpoint();

    let result = send_rc_commands("127.0.0.1", port, &commands(&["  stop  "]), TIMEOUT);

    assert!(result.ok);
    assert!(server.join().unwrap().starts_with("stop\n"));
}

#[test]
fn test_closed_port_is_reported() {
    // grab a free port, then release it
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let result = send_rc_commands("127.0.0.1", port, &commands(&["status"]), TIMEOUT);

    assert!(!result.ok);
    assert_eq!(result.response, None);
    assert!(result.error.unwrap().contains(&format!("127.0.0.1:{}", port)));
}

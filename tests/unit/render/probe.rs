use super::*;
use std::net::TcpListener;

#[test]
fn listening_port_is_alive() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    probe_tcp(&addr, Duration::from_secs(2)).unwrap();
}

#[test]
fn closed_port_is_a_transient_failure() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().to_string()
    };
    let err = probe_tcp(&addr, Duration::from_secs(2)).unwrap_err();
    assert!(err.is_transient());
    assert!(err.to_string().contains(&addr));
}

#[test]
fn unparseable_target_is_a_transient_failure() {
    let err = probe_tcp("no-port-here", Duration::from_millis(100)).unwrap_err();
    assert!(err.is_transient());
}

//! Import-and-submit flow against a live mock host.
//!
//! # Design
//! Starts the mock host on a random port, imports a pasted command into a
//! `RequestStore`, submits it through an HTTP-backed `HostTransport`, and
//! reads back what the host received. This catches schema drift between
//! the core's `HostMessage` and the host's own copy of it.

use reqpad_core::{submit, HostMessage, HostTransport, RequestStatus, RequestStore};

/// Posts messages to the mock host with ureq, ignoring the answer.
struct HttpHost {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpHost {
    fn new(base_url: String) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent, base_url }
    }

    fn received(&self) -> Vec<mock_host::Received> {
        let mut response = self
            .agent
            .get(&format!("{}/messages", self.base_url))
            .call()
            .expect("HTTP transport error");
        let body = response.body_mut().read_to_string().unwrap();
        serde_json::from_str(&body).unwrap()
    }
}

impl HostTransport for HttpHost {
    fn post(&self, message: &HostMessage) {
        let body = serde_json::to_string(message).expect("host message serializes");
        let _ = self
            .agent
            .post(&format!("{}/messages", self.base_url))
            .content_type("application/json")
            .send(body.as_bytes());
    }
}

fn start_host() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_host::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

#[test]
fn import_then_submit() {
    let host = HttpHost::new(start_host());

    // Step 1: nothing received yet.
    assert!(host.received().is_empty(), "expected empty inbox");

    // Step 2: import a pasted command.
    let mut store = RequestStore::new();
    store
        .import_command(
            r#"curl -X PUT 'https://api.example.test/items?id=7' \
                 -H 'Content-Type: application/json' \
                 -H 'Authorization: Bearer abc' \
                 --data-raw '{"name":"lamp","tags":["a","b"]}'"#,
        )
        .unwrap();

    // Step 3: submit.
    submit(&mut store, &host);
    assert_eq!(store.status(), RequestStatus::Loading);

    // Step 4: the host saw exactly what the store holds.
    let received = host.received();
    assert_eq!(received.len(), 1);
    let message = &received[0].message;
    assert_eq!(message.request_method, "POST");
    assert_eq!(message.request_url, "https://api.example.test/items?id=7");
    assert_eq!(message.body_option, "Raw");
    assert_eq!(message.body_raw_option, "JSON");
    assert_eq!(
        message.body_raw_data["json"],
        "{\n  \"name\": \"lamp\",\n  \"tags\": [\n    \"a\",\n    \"b\"\n  ]\n}"
    );
    let headers: Vec<_> = message
        .key_value_table_data
        .iter()
        .map(|h| (h.key.as_str(), h.value.as_str()))
        .collect();
    assert_eq!(
        headers,
        vec![
            ("Content-Type", "application/json"),
            ("Authorization", "Bearer abc"),
        ]
    );

    // Step 5: a rejected import changes nothing, so a resubmit is identical.
    assert!(store.import_command("curl --silent").is_err());
    submit(&mut store, &host);
    let received = host.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].message, received[1].message);
}

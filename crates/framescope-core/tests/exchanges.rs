mod common;

use framescope_core::{
    AnalysisConfig, CorrelationConfig, Exchange, ExchangeProtocol, ExchangeStatus, FlowProtocol,
    SideSummary, analyze_capture, build_exchanges, build_rows, group_exchanges_by_flow,
    parse_capture,
};

use common::{Flags, arp, dhcp, dns_query, dns_response, icmp_echo, pcap, tcp, tcp_data, udp};

const CLIENT: [u8; 4] = [10, 0, 0, 26];
const SERVER: [u8; 4] = [10, 0, 0, 80];
const RESOLVER: [u8; 4] = [8, 8, 8, 8];

fn correlate(frames: Vec<(f64, Vec<u8>)>, config: &CorrelationConfig) -> Vec<Exchange> {
    let buffer = pcap(&frames);
    let capture = parse_capture(&buffer).unwrap();
    let rows = build_rows(&capture.frames);
    build_exchanges(&rows, &capture.frames, config)
}

fn correlate_default(frames: Vec<(f64, Vec<u8>)>) -> Vec<Exchange> {
    correlate(frames, &CorrelationConfig::default())
}

fn only(exchanges: &[Exchange], protocol: ExchangeProtocol) -> Vec<&Exchange> {
    exchanges
        .iter()
        .filter(|e| e.protocol == protocol)
        .collect()
}

#[test]
fn arp_request_then_reply_is_complete() {
    let exchanges = correlate_default(vec![
        (1.0, arp(1, common::MAC_A, [10, 0, 0, 1], [10, 0, 0, 2])),
        (1.002, arp(2, common::MAC_B, [10, 0, 0, 1], [10, 0, 0, 2])),
    ]);
    assert_eq!(exchanges.len(), 1);
    let exchange = &exchanges[0];
    assert_eq!(exchange.protocol, ExchangeProtocol::Arp);
    assert_eq!(exchange.status, ExchangeStatus::Complete);
    assert_eq!(exchange.id, "arp:ARP|10.0.0.1|10.0.0.2#1");
    assert_eq!(exchange.request.as_ref().unwrap().frame_indices, vec![1]);
    assert_eq!(exchange.response.as_ref().unwrap().frame_indices, vec![2]);
    let rtt = exchange.rtt_ms.unwrap();
    assert!((rtt - 2.0).abs() < 1e-3);
}

#[test]
fn arp_orphans_are_partial() {
    let exchanges = correlate_default(vec![
        (1.0, arp(2, common::MAC_B, [10, 0, 0, 9], [10, 0, 0, 1])),
        (2.0, arp(1, common::MAC_A, [10, 0, 0, 1], [10, 0, 0, 3])),
    ]);
    assert_eq!(exchanges.len(), 2);
    assert!(
        exchanges
            .iter()
            .all(|e| e.status == ExchangeStatus::Partial)
    );
    let orphan_reply = exchanges.iter().find(|e| e.request.is_none()).unwrap();
    assert_eq!(
        orphan_reply.response.as_ref().unwrap().frame_indices,
        vec![1]
    );
    let orphan_request = exchanges.iter().find(|e| e.response.is_none()).unwrap();
    assert_eq!(
        orphan_request.request.as_ref().unwrap().frame_indices,
        vec![2]
    );
}

#[test]
fn arp_pairs_oldest_request_first() {
    let exchanges = correlate_default(vec![
        (1.0, arp(1, common::MAC_A, [10, 0, 0, 1], [10, 0, 0, 2])),
        (2.0, arp(1, common::MAC_A, [10, 0, 0, 1], [10, 0, 0, 2])),
        (3.0, arp(2, common::MAC_B, [10, 0, 0, 1], [10, 0, 0, 2])),
    ]);
    let complete: Vec<_> = exchanges
        .iter()
        .filter(|e| e.status == ExchangeStatus::Complete)
        .collect();
    assert_eq!(complete.len(), 1);
    assert_eq!(complete[0].request.as_ref().unwrap().frame_indices, vec![1]);
    assert_eq!(exchanges.len(), 2);
}

#[test]
fn dns_query_and_response_pair() {
    let exchanges = correlate_default(vec![
        (
            10.0,
            udp(
                CLIENT,
                RESOLVER,
                40000,
                53,
                &dns_query(0x0001, "example.com", 1),
            ),
        ),
        (
            10.03,
            udp(
                RESOLVER,
                CLIENT,
                53,
                40000,
                &dns_response(0x0001, "example.com", [93, 184, 216, 34]),
            ),
        ),
    ]);
    let dns = only(&exchanges, ExchangeProtocol::Dns);
    assert_eq!(dns.len(), 1);
    let exchange = dns[0];
    assert_eq!(exchange.status, ExchangeStatus::Complete);
    assert!(exchange.rtt_ms.unwrap() >= 0.0);
    assert_eq!(exchange.id, "dns:DNS|1|10.0.0.26:40000|8.8.8.8:53#1");
    let key = exchange.flow_key.as_ref().unwrap();
    assert_eq!(key.protocol, FlowProtocol::Dns);
    assert_eq!(
        exchange.request.as_ref().unwrap().summary,
        SideSummary::Dns {
            id: 1,
            name: Some("example.com".to_string())
        }
    );
}

#[test]
fn dns_mismatched_ids_stay_partial() {
    let exchanges = correlate_default(vec![
        (
            1.0,
            udp(CLIENT, RESOLVER, 40000, 53, &dns_query(7, "a.example", 1)),
        ),
        (
            1.1,
            udp(
                RESOLVER,
                CLIENT,
                53,
                40000,
                &dns_response(8, "a.example", [1, 2, 3, 4]),
            ),
        ),
    ]);
    let dns = only(&exchanges, ExchangeProtocol::Dns);
    assert_eq!(dns.len(), 2);
    assert!(dns.iter().all(|e| e.status == ExchangeStatus::Partial));
    assert!(dns.iter().all(|e| e.rtt_ms.is_none()));
}

#[test]
fn icmp_echo_pairs_on_id_and_seq() {
    let exchanges = correlate_default(vec![
        (5.0, icmp_echo(CLIENT, SERVER, 8, 0x1234, 1)),
        (5.0005, icmp_echo(SERVER, CLIENT, 0, 0x1234, 1)),
        (6.0, icmp_echo(CLIENT, SERVER, 8, 0x1234, 2)),
    ]);
    let echo = only(&exchanges, ExchangeProtocol::IcmpEcho);
    assert_eq!(echo.len(), 2);
    assert_eq!(echo[0].status, ExchangeStatus::Complete);
    assert_eq!(
        echo[0].response.as_ref().unwrap().summary,
        SideSummary::IcmpEcho { id: 0x1234, seq: 1 }
    );
    assert_eq!(echo[1].status, ExchangeStatus::Partial);
    let flow = echo[0].flow.as_ref().unwrap();
    assert_eq!(
        (flow.a.as_str(), flow.b.as_str()),
        ("10.0.0.26", "10.0.0.80")
    );
}

#[test]
fn dhcp_messages_pair_two_at_a_time() {
    let client = [192, 168, 1, 50];
    let server = [192, 168, 1, 1];
    let exchanges = correlate_default(vec![
        (1.0, udp(client, server, 68, 67, &dhcp(1, 0xdead_beef, 3))),
        (1.1, udp(server, client, 67, 68, &dhcp(2, 0xdead_beef, 5))),
        (2.0, udp(client, server, 68, 67, &dhcp(1, 0xdead_beef, 3))),
    ]);
    let dhcp = only(&exchanges, ExchangeProtocol::Dhcp);
    assert_eq!(dhcp.len(), 2);
    assert_eq!(dhcp[0].status, ExchangeStatus::Complete);
    assert_eq!(
        dhcp[0].id,
        "dhcp:192.168.1.1:67|192.168.1.50:68|0xdeadbeef#1"
    );
    assert_eq!(
        dhcp[0].response.as_ref().unwrap().summary,
        SideSummary::Dhcp {
            xid: 0xdead_beef,
            op: 2,
            message_type: Some(5)
        }
    );
    assert_eq!(dhcp[1].status, ExchangeStatus::Partial);
    assert_eq!(
        dhcp[1].id,
        "dhcp:192.168.1.1:67|192.168.1.50:68|0xdeadbeef#2"
    );
}

fn syn() -> Flags {
    Flags {
        syn: true,
        ..Flags::default()
    }
}

#[test]
fn http_lines_pair_positionally_and_suppress_bursts() {
    let exchanges = correlate_default(vec![
        (1.0, tcp(CLIENT, SERVER, 40000, 80, syn(), &[])),
        (
            1.1,
            tcp_data(
                CLIENT,
                SERVER,
                40000,
                80,
                b"GET / HTTP/1.1\r\nHost: a\r\n\r\n",
            ),
        ),
        (
            1.2,
            tcp_data(SERVER, CLIENT, 80, 40000, b"HTTP/1.1 200 OK\r\n\r\n"),
        ),
        (
            1.3,
            tcp_data(CLIENT, SERVER, 40000, 80, b"GET /two HTTP/1.1\r\n\r\n"),
        ),
    ]);
    let http = only(&exchanges, ExchangeProtocol::Http);
    assert_eq!(http.len(), 2);
    assert_eq!(http[0].id, "http:TCP|10.0.0.26:40000|10.0.0.80:80#1");
    assert_eq!(http[0].status, ExchangeStatus::Complete);
    assert_eq!(
        http[0].request.as_ref().unwrap().summary,
        SideSummary::HttpRequest {
            method: "GET".to_string(),
            path: "/".to_string(),
            line: "GET / HTTP/1.1".to_string(),
        }
    );
    assert_eq!(
        http[0].response.as_ref().unwrap().summary,
        SideSummary::HttpResponse {
            status: 200,
            line: "HTTP/1.1 200 OK".to_string(),
        }
    );
    assert!((http[0].rtt_ms.unwrap() - 100.0).abs() < 1e-3);
    assert_eq!(http[1].status, ExchangeStatus::Partial);
    assert!(http[1].response.is_none());

    assert!(only(&exchanges, ExchangeProtocol::TcpUnknown).is_empty());
}

#[test]
fn opaque_tcp_falls_back_to_bursts() {
    let exchanges = correlate_default(vec![
        (1.0, tcp_data(CLIENT, SERVER, 40000, 9000, &[1u8; 100])),
        (1.1, tcp_data(CLIENT, SERVER, 40000, 9000, &[2u8; 50])),
        (
            1.2,
            tcp(
                SERVER,
                CLIENT,
                9000,
                40000,
                Flags {
                    ack: true,
                    ..Flags::default()
                },
                &[],
            ),
        ),
        (1.3, tcp_data(SERVER, CLIENT, 9000, 40000, &[3u8; 10])),
        (1.4, tcp_data(CLIENT, SERVER, 40000, 9000, &[4u8; 5])),
    ]);
    let bursts = only(&exchanges, ExchangeProtocol::TcpUnknown);
    assert_eq!(bursts.len(), 1);
    let exchange = bursts[0];
    assert_eq!(exchange.status, ExchangeStatus::LowConfidence);
    assert_eq!(exchange.id, "tcp:TCP|10.0.0.26:40000|10.0.0.80:9000#1");

    let request = exchange.request.as_ref().unwrap();
    assert_eq!(request.frame_indices, vec![1, 2]);
    assert_eq!(request.summary, SideSummary::Bytes { bytes: 150 });
    assert!((request.end_time.unwrap() - 1.1).abs() < 1e-6);
    let response = exchange.response.as_ref().unwrap();
    assert_eq!(response.frame_indices, vec![4]);
    assert!((exchange.rtt_ms.unwrap() - 300.0).abs() < 1e-3);
}

#[test]
fn burst_bytes_are_capped_per_frame() {
    let config = CorrelationConfig {
        tcp_burst_cap: 16,
        ..CorrelationConfig::default()
    };
    let exchanges = correlate(
        vec![
            (1.0, tcp_data(CLIENT, SERVER, 40000, 9000, &[1u8; 100])),
            (1.1, tcp_data(CLIENT, SERVER, 40000, 9000, &[1u8; 8])),
            (1.2, tcp_data(SERVER, CLIENT, 9000, 40000, &[1u8; 40])),
        ],
        &config,
    );
    let exchange = only(&exchanges, ExchangeProtocol::TcpUnknown)[0];
    assert_eq!(
        exchange.request.as_ref().unwrap().summary,
        SideSummary::Bytes { bytes: 24 }
    );
    assert_eq!(
        exchange.response.as_ref().unwrap().summary,
        SideSummary::Bytes { bytes: 16 }
    );
}

#[test]
fn exchanges_are_sorted_by_request_start() {
    let exchanges = correlate_default(vec![
        (
            3.0,
            udp(
                CLIENT,
                RESOLVER,
                40000,
                53,
                &dns_query(1, "late.example", 1),
            ),
        ),
        (1.0, arp(1, common::MAC_A, [10, 0, 0, 1], [10, 0, 0, 2])),
        (2.0, icmp_echo(CLIENT, SERVER, 8, 1, 1)),
    ]);
    let starts: Vec<f64> = exchanges.iter().map(Exchange::start_time).collect();
    let mut sorted = starts.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(starts, sorted);
    assert_eq!(exchanges[0].protocol, ExchangeProtocol::Arp);
}

#[test]
fn groups_follow_flows() {
    let exchanges = correlate_default(vec![
        (
            1.0,
            udp(CLIENT, RESOLVER, 40000, 53, &dns_query(1, "a.example", 1)),
        ),
        (
            1.1,
            udp(
                RESOLVER,
                CLIENT,
                53,
                40000,
                &dns_response(1, "a.example", [1, 1, 1, 1]),
            ),
        ),
        (
            2.0,
            udp(CLIENT, RESOLVER, 40000, 53, &dns_query(2, "b.example", 1)),
        ),
        (
            2.1,
            udp(
                RESOLVER,
                CLIENT,
                53,
                40000,
                &dns_response(2, "b.example", [2, 2, 2, 2]),
            ),
        ),
    ]);
    let groups = group_exchanges_by_flow(&exchanges);
    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.group_key, "10.0.0.26:40000|8.8.8.8:53");
    assert_eq!(group.count, 2);
    assert_eq!(group.first, Some(1.0));
    assert!((group.last.unwrap() - 2.1).abs() < 1e-6);
}

#[test]
fn empty_capture_has_no_exchanges() {
    assert!(correlate_default(Vec::new()).is_empty());
}

#[test]
fn report_carries_flows_and_histogram() {
    let buffer = pcap(&[
        (
            1.0,
            udp(CLIENT, RESOLVER, 40000, 53, &dns_query(1, "a.example", 1)),
        ),
        (
            2.0,
            udp(
                RESOLVER,
                CLIENT,
                53,
                40000,
                &dns_response(1, "a.example", [1, 1, 1, 1]),
            ),
        ),
        (3.0, arp(1, common::MAC_A, [10, 0, 0, 1], [10, 0, 0, 2])),
    ]);
    let capture = parse_capture(&buffer).unwrap();
    let config = AnalysisConfig {
        include_frames: true,
        ..AnalysisConfig::default()
    };
    let report = analyze_capture("capture.pcap", buffer.len() as u64, &capture, &config);

    let summary = report.capture_summary.as_ref().unwrap();
    assert_eq!(summary.frames_total, 3);
    assert_eq!(summary.protocols[0].protocol, "DNS");
    assert_eq!(summary.protocols[0].frames, 2);
    assert_eq!(summary.time_start.as_deref(), Some("1970-01-01T00:00:01Z"));
    assert_eq!(report.generated_at, "1970-01-01T00:00:03Z");

    assert_eq!(report.flows.len(), 1);
    let flow = &report.flows[0];
    assert_eq!(flow.protocol, "DNS");
    assert_eq!(flow.packets, 2);
    assert_eq!(flow.pps, Some(1.0));

    assert_eq!(report.frames.len(), 3);
    assert_eq!(report.frames[0].index, 1);
    assert_eq!(report.exchanges.len(), 2);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["exchanges"][0]["status"], "complete");
    assert_eq!(value["frames"][2]["transaction"]["role"], "request");
}

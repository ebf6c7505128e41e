//! Property-based tests using proptest
//!
//! These tests verify envelope decoding, error translation and the wire
//! shape of resource payloads using randomized inputs.

use fortios_cmdb::envelope::{decode_list, decode_lookup, decode_write, ErrorCodes, Lookup};
use fortios_cmdb::resource::registry::get_resource;
use fortios_cmdb::resource::router_ospf::{OspfAreaRange, OspfFilterList, OspfVirtualLink};
use fortios_cmdb::{
    ClientConfig, DhcpReservedAddress, DhcpServer, FortiClient, IpRange, OspfArea, OspfNetwork,
    RouterOspf, Toggle,
};
use proptest::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

fn dhcp_codes() -> &'static ErrorCodes {
    &get_resource("dhcp-server")
        .expect("dhcp-server is registered")
        .error_codes
}

/// Send `value` as the appliance would return it from a lookup, and decode it
fn through_lookup<T: Serialize + DeserializeOwned>(value: &T) -> Lookup<T> {
    let body = json!({
        "status": "success",
        "http_status": 200,
        "results": [serde_json::to_value(value).unwrap()]
    })
    .to_string();
    decode_lookup(&body, &ErrorCodes::new()).unwrap()
}

fn arb_toggle() -> impl Strategy<Value = Option<Toggle>> {
    proptest::option::of(prop_oneof![Just(Toggle::Enable), Just(Toggle::Disable)])
}

fn arb_ipv4() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>(), 1u8..255)
        .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
}

fn arb_mac() -> impl Strategy<Value = String> {
    prop::array::uniform6(any::<u8>()).prop_map(|bytes| {
        bytes
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<Vec<_>>()
            .join(":")
    })
}

fn arb_reservation() -> impl Strategy<Value = DhcpReservedAddress> {
    (
        proptest::option::of(1u32..10_000),
        arb_ipv4(),
        arb_mac(),
        proptest::option::of(prop_oneof!["assign", "block", "reserved"]),
        proptest::option::of("[a-zA-Z0-9 ]{0,40}"),
    )
        .prop_map(|(id, ip, mac, action, description)| DhcpReservedAddress {
            id,
            ip,
            mac,
            action: action.map(String::from),
            description,
            ..Default::default()
        })
}

fn arb_server() -> impl Strategy<Value = DhcpServer> {
    (
        proptest::option::of(1u32..10_000),
        proptest::option::of("port[0-9]{1,2}"),
        proptest::option::of(0u32..8_640_000),
        arb_toggle(),
        prop::collection::vec((arb_ipv4(), arb_ipv4()), 0..4),
        prop::collection::vec(arb_reservation(), 0..4),
    )
        .prop_map(
            |(id, interface, lease_time, status, ranges, reserved_address)| DhcpServer {
                id,
                interface,
                lease_time,
                status,
                ip_range: ranges
                    .into_iter()
                    .map(|(start_ip, end_ip)| IpRange {
                        start_ip,
                        end_ip,
                        ..Default::default()
                    })
                    .collect(),
                reserved_address,
                ..Default::default()
            },
        )
}

fn arb_area() -> impl Strategy<Value = OspfArea> {
    let range = (proptest::option::of(1u32..100), arb_ipv4(), arb_toggle()).prop_map(
        |(id, prefix, advertise)| OspfAreaRange {
            id,
            prefix: format!("{prefix} 255.255.255.0"),
            advertise,
            ..Default::default()
        },
    );
    let virtual_link = ("[a-z]{1,8}", arb_ipv4(), proptest::option::of(1u32..65535)).prop_map(
        |(name, peer, dead_interval)| OspfVirtualLink {
            name,
            peer,
            dead_interval,
            ..Default::default()
        },
    );
    let filter_list = (
        proptest::option::of(1u32..100),
        "[a-z]{1,8}",
        proptest::option::of(prop_oneof!["in", "out"]),
    )
        .prop_map(|(id, list, direction)| OspfFilterList {
            id,
            list,
            direction: direction.map(String::from),
        });

    (
        arb_ipv4(),
        proptest::option::of(prop_oneof!["regular", "nssa", "stub"]),
        proptest::option::of(0u32..65535),
        arb_toggle(),
        prop::collection::vec(range, 0..3),
        prop::collection::vec(virtual_link, 0..3),
        prop::collection::vec(filter_list, 0..3),
    )
        .prop_map(
            |(id, kind, default_cost, nssa_redistribution, range, virtual_link, filter_list)| {
                OspfArea {
                    q_origin_key: Some(id.clone()),
                    id,
                    kind: kind.map(String::from),
                    default_cost,
                    nssa_redistribution,
                    range,
                    virtual_link,
                    filter_list,
                    ..Default::default()
                }
            },
        )
}

fn arb_ospf() -> impl Strategy<Value = RouterOspf> {
    let network = (proptest::option::of(1u32..100), arb_ipv4(), arb_ipv4()).prop_map(
        |(id, prefix, area)| OspfNetwork {
            id,
            q_origin_key: id,
            prefix: format!("{prefix} 255.255.255.0"),
            area,
        },
    );
    (
        proptest::option::of(arb_ipv4()),
        proptest::option::of(prop_oneof!["enable", "always", "disable"]),
        prop::collection::vec(arb_area(), 0..3),
        prop::collection::vec(network, 0..4),
    )
        .prop_map(|(router_id, originate, area, network)| RouterOspf {
            router_id,
            default_information_originate: originate.map(String::from),
            area,
            network,
        })
}

proptest! {
    /// A numeric mkey decodes to the same key as its string form
    #[test]
    fn numeric_and_string_mkey_agree(key in 0i64..i64::MAX) {
        let numeric = json!({"status": "success", "mkey": key}).to_string();
        let textual = json!({"status": "success", "mkey": key.to_string()}).to_string();

        let a = decode_write(&numeric, dhcp_codes()).unwrap();
        let b = decode_write(&textual, dhcp_codes()).unwrap();
        let key_str = key.to_string();
        prop_assert_eq!(a.mkey.as_deref(), Some(key_str.as_str()));
        prop_assert_eq!(a.mkey, b.mkey);
    }

    /// Codes missing from the table are reported verbatim
    #[test]
    fn unknown_codes_are_reported(code in -10_000i64..0, http_status in 400u16..600) {
        prop_assume!(!dhcp_codes().contains_key(&code));

        let body = json!({"status": "error", "error": code, "http_status": http_status}).to_string();
        let err = decode_write(&body, dhcp_codes()).unwrap_err();
        let expected = format!("status is error and error no is {code}, details: ");
        prop_assert!(err.to_string().starts_with(&expected));
        prop_assert_eq!(err.code(), Some(code));
    }

    /// Known codes always translate to their table message
    #[test]
    fn known_codes_translate(index in 0usize..2) {
        let (code, message) = dhcp_codes().iter().nth(index).unwrap();
        let body = json!({"status": "error", "error": code, "http_status": 500}).to_string();
        let err = decode_write(&body, dhcp_codes()).unwrap_err();
        prop_assert!(err.to_string().starts_with(message.as_str()));
    }

    /// Any status other than success is a failure
    #[test]
    fn non_success_status_fails(status in "[a-z]{1,10}") {
        prop_assume!(status != "success");
        let body = json!({"status": status, "http_status": 200}).to_string();
        prop_assert!(decode_write(&body, dhcp_codes()).is_err());
    }

    /// Listing keeps the appliance's order
    #[test]
    fn list_preserves_order(ids in prop::collection::vec(1u32..100_000, 0..50)) {
        let results: Vec<Value> = ids.iter().map(|id| json!({"id": id})).collect();
        let body = json!({"status": "success", "http_status": 200, "results": results}).to_string();

        let servers: Vec<DhcpServer> = decode_list(&body, dhcp_codes()).unwrap();
        let decoded: Vec<u32> = servers.iter().filter_map(|s| s.id).collect();
        prop_assert_eq!(decoded, ids);
    }

    /// A 404 lookup is never an error, whatever else the body says
    #[test]
    fn lookup_404_is_not_found(status in proptest::option::of("[a-z]{1,10}")) {
        let body = json!({"status": status, "http_status": 404}).to_string();
        let lookup: Lookup<DhcpServer> = decode_lookup(&body, dhcp_codes()).unwrap();
        prop_assert_eq!(lookup, Lookup::NotFound);
    }

    /// A key always resolves to exactly one segment below its table, or is refused
    #[test]
    fn keys_stay_in_their_table(key in prop_oneof![
        Just(String::new()),
        Just(".".to_string()),
        Just("..".to_string()),
        "[./?#%]{1,4}",
        "\\PC{1,30}",
    ]) {
        let client = FortiClient::new(&ClientConfig::new("https://192.0.2.1").unwrap()).unwrap();
        match client.cmdb_entry_path("system.dhcp/server", &key) {
            Ok(path) => {
                let url = client.http.url(&path).unwrap();
                let segment = url.path().strip_prefix("/api/v2/cmdb/system.dhcp/server/");
                prop_assert!(segment.is_some(), "{:?} resolved to {}", key, url);
                let segment = segment.unwrap();
                prop_assert!(!segment.is_empty() && !segment.contains('/'), "{:?} resolved to {}", key, url);
                prop_assert!(url.query().is_none() && url.fragment().is_none());
            }
            Err(_) => prop_assert!(matches!(key.as_str(), "" | "." | "..")),
        }
    }
}

mod payload_tests {
    use super::*;

    proptest! {
        /// A server read back from the appliance equals what was sent
        #[test]
        fn server_survives_lookup(server in arb_server()) {
            prop_assert_eq!(through_lookup(&server), Lookup::Found(server));
        }

        #[test]
        fn reservation_survives_lookup(reservation in arb_reservation()) {
            prop_assert_eq!(through_lookup(&reservation), Lookup::Found(reservation));
        }

        #[test]
        fn ospf_survives_lookup(ospf in arb_ospf()) {
            prop_assert_eq!(through_lookup(&ospf), Lookup::Found(ospf));
        }

        /// Reservations always carry ip and mac
        #[test]
        fn reservation_always_has_ip_and_mac(reservation in arb_reservation()) {
            let wire = serde_json::to_value(&reservation).unwrap();
            prop_assert_eq!(wire["ip"].as_str(), Some(reservation.ip.as_str()));
            prop_assert_eq!(wire["mac"].as_str(), Some(reservation.mac.as_str()));
        }

        /// Wire names are kebab-case apart from the appliance's own `q_origin_key`
        #[test]
        fn server_keys_are_kebab_case(server in arb_server()) {
            let wire = serde_json::to_value(&server).unwrap();
            for key in wire.as_object().unwrap().keys() {
                prop_assert!(!key.contains('_'), "unexpected key {}", key);
            }
        }
    }
}

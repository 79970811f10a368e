//! End-to-end BDAT decoding over crafted multi-DIMM tables.

use byteorder::{LittleEndian, WriteBytesExt};
use hwinspect::bdat::{
    parse_bdat, Issue, BDAT_HEADER_SIZE, MEM_SPD_DATA_ID_GUID, SPD_ENTRY_HEADER_SIZE,
    SPD_SCHEMA_HEADER_SIZE, UEFI_SPD_SCHEMA_GUID,
};
use std::io::Write;
use uuid::Uuid;

struct Entry {
    socket: u8,
    channel: u8,
    dimm: u8,
    payload: Vec<u8>,
}

fn ddr4_payload(density_byte: u8, organization_byte: u8) -> Vec<u8> {
    let mut payload = vec![0u8; 512];
    payload[2] = 12; // DDR4
    payload[4] = density_byte;
    payload[12] = organization_byte;
    payload[13] = 0x03; // 64-bit bus
    payload
}

fn build_table(data_id_guid: Uuid, entries: &[Entry]) -> Vec<u8> {
    let schema_offset = BDAT_HEADER_SIZE + 4;
    let entries_size: usize = entries
        .iter()
        .map(|e| SPD_ENTRY_HEADER_SIZE + e.payload.len())
        .sum();
    let schema_size = SPD_SCHEMA_HEADER_SIZE + entries_size;
    let total = schema_offset + schema_size;

    let mut buf = Vec::with_capacity(total);
    buf.write_all(b"BDATHEAD").unwrap();
    buf.write_u32::<LittleEndian>(total as u32).unwrap();
    buf.write_u16::<LittleEndian>(0xBEEF).unwrap();
    buf.resize(32, 0);
    buf.write_u16::<LittleEndian>(1).unwrap();
    buf.resize(BDAT_HEADER_SIZE, 0);
    buf.write_u32::<LittleEndian>(schema_offset as u32).unwrap();

    buf.write_all(UEFI_SPD_SCHEMA_GUID.as_bytes()).unwrap();
    buf.write_u32::<LittleEndian>(schema_size as u32).unwrap();
    buf.write_u16::<LittleEndian>(0xCAFE).unwrap();
    buf.write_all(data_id_guid.as_bytes()).unwrap();
    buf.resize(schema_offset + SPD_SCHEMA_HEADER_SIZE, 0);

    for entry in entries {
        buf.write_u32::<LittleEndian>(0).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_all(&[entry.socket, entry.channel, entry.dimm]).unwrap();
        buf.write_u16::<LittleEndian>(entry.payload.len() as u16).unwrap();
        buf.write_all(&entry.payload).unwrap();
    }
    assert_eq!(buf.len(), total);
    buf
}

#[test]
fn two_socket_table_decodes_every_dimm() {
    let table = build_table(
        MEM_SPD_DATA_ID_GUID,
        &[
            Entry { socket: 0, channel: 0, dimm: 0, payload: ddr4_payload(0x05, 0x09) },
            Entry { socket: 1, channel: 1, dimm: 0, payload: ddr4_payload(0x04, 0x00) },
        ],
    );
    let parse = parse_bdat(&table).expect("parse");

    assert!(parse.issues.is_empty(), "unexpected issues: {:?}", parse.issues);
    assert_eq!(parse.dimms.len(), 2);

    // 8 Gb density, dual rank, x8 on a 64-bit bus.
    assert_eq!(parse.dimms[0].size_mb, 16384);
    assert_eq!((parse.dimms[0].socket, parse.dimms[0].channel), (0, 0));
    // 4 Gb density, single rank, x4 on a 64-bit bus.
    assert_eq!(parse.dimms[1].size_mb, 8192);
    assert_eq!((parse.dimms[1].socket, parse.dimms[1].channel), (1, 1));
}

#[test]
fn unsupported_generation_does_not_stop_the_walk() {
    let mut ddr3 = ddr4_payload(0x05, 0x09);
    ddr3[2] = 11;
    let table = build_table(
        MEM_SPD_DATA_ID_GUID,
        &[
            Entry { socket: 0, channel: 0, dimm: 0, payload: ddr3 },
            Entry { socket: 0, channel: 1, dimm: 0, payload: ddr4_payload(0x05, 0x09) },
        ],
    );
    let parse = parse_bdat(&table).expect("parse");

    assert_eq!(parse.dimms.len(), 2);
    assert_eq!(parse.dimms[0].size_mb, 0);
    assert_eq!(parse.dimms[1].size_mb, 16384);
    assert_eq!(
        parse.issues,
        vec![Issue::UnsupportedSpdType(11)],
        "exactly the DDR3 entry is reported"
    );
}

#[test]
fn data_id_guid_mismatch_is_reported_but_dimms_still_decode() {
    let table = build_table(
        Uuid::nil(),
        &[Entry { socket: 0, channel: 0, dimm: 0, payload: ddr4_payload(0x05, 0x09) }],
    );
    let parse = parse_bdat(&table).expect("parse");

    assert_eq!(parse.dimms.len(), 1);
    assert_eq!(parse.dimms[0].size_mb, 16384);
    assert!(parse.issues.iter().any(|i| matches!(
        i,
        Issue::StructuralMismatch(m) if m.contains("data identification GUID")
    )));
}

#[test]
fn short_spd_payload_is_flagged_and_still_decoded() {
    let mut payload = ddr4_payload(0x05, 0x09);
    payload.truncate(256);
    let table =
        build_table(MEM_SPD_DATA_ID_GUID, &[Entry { socket: 0, channel: 0, dimm: 0, payload }]);
    let parse = parse_bdat(&table).expect("parse");

    // The declared size is off-spec but the decode bytes are all within
    // the first 14, so the size still comes out.
    assert_eq!(parse.dimms.len(), 1);
    assert_eq!(parse.dimms[0].no_of_bytes, 256);
    assert_eq!(parse.dimms[0].size_mb, 16384);
    assert!(parse.issues.iter().any(|i| matches!(
        i,
        Issue::StructuralMismatch(m) if m.contains("payload size")
    )));
}

#[test]
fn out_of_spec_field_is_reported_per_dimm() {
    // Organization byte 0x21 declares 5 package ranks, outside 1..=4.
    let table = build_table(
        MEM_SPD_DATA_ID_GUID,
        &[Entry { socket: 0, channel: 0, dimm: 0, payload: ddr4_payload(0x05, 0x21) }],
    );
    let parse = parse_bdat(&table).expect("parse");

    assert_eq!(parse.dimms.len(), 1);
    assert!(parse
        .issues
        .iter()
        .any(|i| matches!(i, Issue::FieldOutOfSpec { field: "package ranks", value: 5 })));
    // The raw value still flows into the size computation.
    assert_eq!(parse.dimms[0].size_mb, 1024 * 5 * 64 / 8);
}

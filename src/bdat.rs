//! Parser for ACPI BDAT (BIOS Data) table dumps.
//!
//! A BDAT blob is a fixed 44-byte header followed by a list of absolute byte
//! offsets to schema headers. Exactly one schema is of interest here: the UEFI
//! SPD schema, whose dynamic region holds one variable-length SPD entry per
//! physical DIMM slot. Each entry's payload is handed to the
//! [SPD decoder](crate::spd) to obtain a `(type, size_in_MB)` pair.
//!
//! ## Error model
//!
//! Only an empty buffer or an unreadable file is fatal ([`BdatError`]). Every
//! other disagreement with the expected layout (signature mismatch, declared
//! size vs. buffer length, missing SPD schema, truncated entries, unsupported
//! SPD types, out-of-spec DDR4 fields) is accumulated as an [`Issue`] in
//! [`BdatParse::issues`] and parsing continues with best-effort data. Callers
//! always get the full list of findings, never just the first one.
//!
//! ## Layout contract
//!
//! All offsets and field widths below are byte-exact compatibility contracts
//! (little-endian throughout):
//!
//! | region | offset | width |
//! |--------|--------|-------|
//! | signature `"BDATHEAD"` | 0 | 8 |
//! | declared total size | 8 | u32 |
//! | CRC-16 | 12 | u16 |
//! | schema count | 32 | u16 |
//! | schema offsets | 44 + 4i | u32 each |
//!
//! Within a schema: GUID at +0, data size u32 at +16, CRC u16 at +20, SPD
//! data-identification GUID at +22. The dynamic SPD region starts at +50;
//! each entry is an 11-byte header (datatype u32 at +0, socket/channel/dimm
//! bytes at +6/+7/+8, payload length u16 at +9) followed by the payload.

use crate::spd;
use byteorder::{ByteOrder, LittleEndian};
use std::path::Path;
use tracing::{debug, warn};
use uuid::{uuid, Uuid};

/// Expected value of the 8-byte ASCII signature.
pub const BDAT_SIGNATURE: &str = "BDATHEAD";

/// Size of the fixed BDAT header, not counting the schema offset list.
pub const BDAT_HEADER_SIZE: usize = 44;

/// Size of the SPD schema header plus raw-data header, up to the dynamic region.
pub const SPD_SCHEMA_HEADER_SIZE: usize = 50;

/// Size of the per-entry header preceding each SPD payload.
pub const SPD_ENTRY_HEADER_SIZE: usize = 11;

/// Payload size a DDR4 SPD entry is expected to declare.
pub const SPD_DDR4_SIZE: u16 = 512;

/// Well-known GUID of the UEFI SPD schema, in the byte-verbatim canonical form
/// the table stores it in (EFI_GUID 1B19F809-1D91-4F00-A3F3-7A676606D3B1).
pub const UEFI_SPD_SCHEMA_GUID: Uuid = uuid!("09f8191b-911d-004f-a3f3-7a676606d3b1");

/// Well-known memory SPD data-identification GUID nested inside the schema
/// (EFI_GUID 46F60B90-9C94-43CA-A77C-09B848999348).
pub const MEM_SPD_DATA_ID_GUID: Uuid = uuid!("900bf646-949c-ca43-a77c-09b848999348");

/// Fatal parse failures. Everything non-fatal is an [`Issue`] instead.
#[derive(Debug, thiserror::Error)]
pub enum BdatError {
    #[error("BDAT input is empty")]
    EmptyInput,
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),
}

/// A non-fatal finding reported while parsing. Parsing always continues past
/// these; they are collected in [`BdatParse::issues`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Issue {
    /// Signature/size/CRC/bounds disagreement; best-effort data is still produced.
    #[error("structural mismatch: {0}")]
    StructuralMismatch(String),
    /// No schema in the list carries the UEFI SPD schema GUID.
    #[error("UEFI SPD schema not found in BDAT schema list")]
    SchemaNotFound,
    /// SPD payload declares a generation other than DDR4; its size stays 0.
    #[error("unsupported SPD type {0}")]
    UnsupportedSpdType(u8),
    /// A decoded DDR4 sub-field is outside its documented valid range. The
    /// computation proceeds with the raw value.
    #[error("SPD {field} out of spec: {value}")]
    FieldOutOfSpec { field: &'static str, value: u32 },
}

/// Fixed BDAT header plus the schema offset list. Immutable after parse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BdatMetadata {
    /// ASCII signature, expected [`BDAT_SIGNATURE`].
    pub signature: String,
    /// Declared total byte size of the table.
    pub data_size: u32,
    /// 16-bit CRC as stored; not independently recomputed.
    pub crc: u16,
    /// Absolute byte offsets of the schema headers.
    pub schema_list: Vec<u32>,
}

/// Header of the UEFI SPD schema. Stays at its default (empty) value when no
/// schema in the list matches [`UEFI_SPD_SCHEMA_GUID`]; that condition is
/// surfaced as [`Issue::SchemaNotFound`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaData {
    pub schema_guid: Option<Uuid>,
    pub data_size: u32,
    pub crc: u16,
    /// Nested memory SPD data-identification GUID.
    pub spd_data_id_guid: Option<Uuid>,
}

impl SchemaData {
    /// True when no UEFI SPD schema was located.
    pub fn is_empty(&self) -> bool {
        self.schema_guid.is_none()
    }
}

/// One SPD entry from the schema's dynamic region, one per physical DIMM slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpdRecord {
    pub datatype: u32,
    pub socket: u8,
    pub channel: u8,
    pub dimm: u8,
    /// Self-declared payload length; also drives the walk to the next entry.
    pub no_of_bytes: u16,
    /// Raw SPD payload bytes.
    pub data: Vec<u8>,
    /// SPD generation tag (byte 2 of the payload); 12 is DDR4.
    pub spd_type: u8,
    /// Decoded module capacity in MB; 0 for unsupported generations.
    pub size_mb: u32,
}

/// Everything produced by one parse: structured data plus the accumulated
/// non-fatal findings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BdatParse {
    pub metadata: BdatMetadata,
    pub schema: SchemaData,
    pub dimms: Vec<SpdRecord>,
    pub issues: Vec<Issue>,
}

/// Reads a little-endian u16 at `offset`, or `None` past the end.
pub fn read_u16_le(data: &[u8], offset: usize) -> Option<u16> {
    data.get(offset..offset + 2).map(LittleEndian::read_u16)
}

/// Reads a little-endian u32 at `offset`, or `None` past the end.
pub fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    data.get(offset..offset + 4).map(LittleEndian::read_u32)
}

/// Reads a 16-byte GUID at `offset`, bytes taken verbatim.
///
/// The comparison constants above are already expressed in the same
/// byte-verbatim canonical form, so no mixed-endian swizzling happens here;
/// this matches how the table is checked in practice.
pub fn read_guid(data: &[u8], offset: usize) -> Option<Uuid> {
    let bytes: [u8; 16] = data.get(offset..offset + 16)?.try_into().ok()?;
    Some(Uuid::from_bytes(bytes))
}

/// Parse a BDAT table from a byte buffer.
///
/// Fails only for an empty buffer; every structural problem is reported in
/// [`BdatParse::issues`] and parsing continues with whatever can be decoded.
pub fn parse_bdat(data: &[u8]) -> Result<BdatParse, BdatError> {
    if data.is_empty() {
        return Err(BdatError::EmptyInput);
    }
    let mut issues = Vec::new();
    let metadata = parse_metadata(data, &mut issues);
    let (schema, dimms) = parse_schema_data(&metadata, data, &mut issues);
    for issue in &issues {
        warn!(%issue, "BDAT finding");
    }
    Ok(BdatParse { metadata, schema, dimms, issues })
}

/// Read `path` once and parse it. IO failures are the only fatal path besides
/// an empty file.
pub fn parse_bdat_file<P: AsRef<Path>>(path: P) -> Result<BdatParse, BdatError> {
    let data = std::fs::read(path)?;
    parse_bdat(&data)
}

fn parse_metadata(data: &[u8], issues: &mut Vec<Issue>) -> BdatMetadata {
    if data.len() < BDAT_HEADER_SIZE {
        issues.push(Issue::StructuralMismatch(format!(
            "buffer is {} bytes, shorter than the {}-byte BDAT header",
            data.len(),
            BDAT_HEADER_SIZE
        )));
    }

    let mut metadata = BdatMetadata {
        signature: String::from_utf8_lossy(data.get(..8).unwrap_or_default()).into_owned(),
        data_size: read_u32_le(data, 8).unwrap_or_default(),
        crc: read_u16_le(data, 12).unwrap_or_default(),
        schema_list: Vec::new(),
    };

    if metadata.signature != BDAT_SIGNATURE {
        issues.push(Issue::StructuralMismatch(format!(
            "signature {:?} does not match {:?}",
            metadata.signature, BDAT_SIGNATURE
        )));
    }
    if metadata.data_size as usize != data.len() {
        issues.push(Issue::StructuralMismatch(format!(
            "declared table size {} B does not match buffer size {} B",
            metadata.data_size,
            data.len()
        )));
    }

    let schema_count = read_u16_le(data, 32).unwrap_or_default();
    debug!(schema_count, "parsed BDAT header");
    for i in 0..schema_count as usize {
        match read_u32_le(data, BDAT_HEADER_SIZE + 4 * i) {
            Some(offset) => metadata.schema_list.push(offset),
            None => {
                issues.push(Issue::StructuralMismatch(format!(
                    "schema offset list truncated at entry {} of {}",
                    i, schema_count
                )));
                break;
            }
        }
    }
    metadata
}

fn parse_schema_data(
    metadata: &BdatMetadata,
    data: &[u8],
    issues: &mut Vec<Issue>,
) -> (SchemaData, Vec<SpdRecord>) {
    let mut schema = SchemaData::default();
    let mut dimms = Vec::new();

    for &offset in &metadata.schema_list {
        let offset = offset as usize;
        let Some(guid) = read_guid(data, offset) else {
            issues.push(Issue::StructuralMismatch(format!(
                "schema offset {:#x} is out of range for a {}-byte buffer",
                offset,
                data.len()
            )));
            continue;
        };
        debug!(%guid, offset, "schema header");
        if guid != UEFI_SPD_SCHEMA_GUID {
            continue;
        }

        schema.schema_guid = Some(guid);
        schema.data_size = read_u32_le(data, offset + 16).unwrap_or_default();
        schema.crc = read_u16_le(data, offset + 20).unwrap_or_default();
        schema.spd_data_id_guid = read_guid(data, offset + 22);

        match schema.spd_data_id_guid {
            Some(id) if id == MEM_SPD_DATA_ID_GUID => {}
            _ => issues.push(Issue::StructuralMismatch(format!(
                "memory SPD data identification GUID mismatch: expected {}, found {}",
                MEM_SPD_DATA_ID_GUID,
                schema
                    .spd_data_id_guid
                    .map(|g| g.to_string())
                    .unwrap_or_else(|| "none".to_string())
            ))),
        }

        walk_spd_entries(data, offset, schema.data_size, &mut dimms, issues);
    }

    if schema.is_empty() {
        issues.push(Issue::SchemaNotFound);
    }
    (schema, dimms)
}

/// Walks the dynamic SPD region. Each entry's self-declared `no_of_bytes`
/// drives the advance to the next entry, so a corrupt length desynchronizes
/// every entry after it; the walk stops with a reported issue when an entry
/// would run past the end of the buffer.
fn walk_spd_entries(
    data: &[u8],
    schema_offset: usize,
    schema_data_size: u32,
    dimms: &mut Vec<SpdRecord>,
    issues: &mut Vec<Issue>,
) {
    let end = schema_offset + schema_data_size as usize;
    let mut cursor = schema_offset + SPD_SCHEMA_HEADER_SIZE;

    while cursor < end {
        let header = (
            read_u32_le(data, cursor),
            data.get(cursor + 6).copied(),
            data.get(cursor + 7).copied(),
            data.get(cursor + 8).copied(),
            read_u16_le(data, cursor + 9),
        );
        let (Some(datatype), Some(socket), Some(channel), Some(dimm), Some(no_of_bytes)) = header
        else {
            issues.push(Issue::StructuralMismatch(format!(
                "SPD entry header at {:#x} is truncated",
                cursor
            )));
            break;
        };

        let payload_start = cursor + SPD_ENTRY_HEADER_SIZE;
        let payload_end = payload_start + no_of_bytes as usize;
        let Some(payload) = data.get(payload_start..payload_end) else {
            issues.push(Issue::StructuralMismatch(format!(
                "SPD payload of {} B at {:#x} runs past the end of the buffer",
                no_of_bytes, payload_start
            )));
            break;
        };

        if no_of_bytes != SPD_DDR4_SIZE {
            issues.push(Issue::StructuralMismatch(format!(
                "unexpected SPD payload size {} B (socket {} channel {} dimm {})",
                no_of_bytes, socket, channel, dimm
            )));
        }

        let (spd_type, size_mb) = spd::decode_spd(payload, issues);
        debug!(socket, channel, dimm, spd_type, size_mb, "decoded SPD entry");
        dimms.push(SpdRecord {
            datatype,
            socket,
            channel,
            dimm,
            no_of_bytes,
            data: payload.to_vec(),
            spd_type,
            size_mb,
        });

        cursor = payload_end;
    }
}

//! SPD payload dispatch and DDR4 field decoding.
//!
//! Byte 2 of an SPD payload discriminates the DRAM generation. Only DDR4 is
//! decoded to a module capacity; every other generation is reported as
//! unsupported and the size stays 0. The DDR4 decode reads four bit-packed
//! bytes (4, 6, 12, 13) and is best-effort throughout: a sub-field outside
//! its documented valid range is reported as [`Issue::FieldOutOfSpec`] but
//! the computation always completes with the raw value.

use crate::bdat::Issue;
use tracing::warn;

/// SPD generation discriminators (payload byte 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SpdType {
    Unknown = 0,
    Ddr1 = 7,
    Ddr2 = 8,
    Fbdimm = 9,
    Ddr3 = 11,
    Ddr4 = 12,
    Nvm = 13,
    Ddr5 = 18,
}

impl SpdType {
    pub fn from_byte(byte: u8) -> Option<SpdType> {
        match byte {
            0 => Some(SpdType::Unknown),
            7 => Some(SpdType::Ddr1),
            8 => Some(SpdType::Ddr2),
            9 => Some(SpdType::Fbdimm),
            11 => Some(SpdType::Ddr3),
            12 => Some(SpdType::Ddr4),
            13 => Some(SpdType::Nvm),
            18 => Some(SpdType::Ddr5),
            _ => None,
        }
    }
}

/// SDRAM package type (byte 6, bits 1:0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PackageType {
    Unspecified = 0,
    DdpQdp = 1,
    /// 3DS stacks: logical ranks multiply by the die count.
    ThreeDs = 2,
}

/// Decode one SPD payload into `(spd_type, size_in_MB)`.
///
/// The type tag is returned as the raw byte so callers can report generations
/// this crate has no [`SpdType`] name for.
pub fn decode_spd(payload: &[u8], issues: &mut Vec<Issue>) -> (u8, u32) {
    let spd_type = payload.get(2).copied().unwrap_or_default();
    if spd_type == SpdType::Ddr4 as u8 {
        (spd_type, ddr4_size_mb(payload, issues))
    } else {
        warn!(spd_type, "SPD type not supported");
        issues.push(Issue::UnsupportedSpdType(spd_type));
        (spd_type, 0)
    }
}

/// Compute a DDR4 module capacity in MB from the payload's density, rank,
/// and width bytes: `density * logical_ranks * bus_width / device_width`.
pub fn ddr4_size_mb(payload: &[u8], issues: &mut Vec<Issue>) -> u32 {
    if payload.len() < 14 {
        issues.push(Issue::StructuralMismatch(format!(
            "DDR4 SPD payload is {} bytes, too short for the density/rank/width fields",
            payload.len()
        )));
        return 0;
    }
    let density = density_mb(payload[4], issues);
    let ranks = logical_ranks(payload[6], payload[12], issues);
    let device_width = device_width_bits(payload[12], issues);
    let bus_width = bus_width_bits(payload[13], issues);
    density * ranks * bus_width / device_width
}

/// Density is stored in bits 3:0 as 256 megabits * 2^(stored value);
/// converted to megabytes on return.
fn density_mb(sdram_density_and_banks: u8, issues: &mut Vec<Issue>) -> u32 {
    let density = 256u32 << (sdram_density_and_banks & 0x0f);
    if !(256..=32768).contains(&density) {
        issues.push(Issue::FieldOutOfSpec { field: "density", value: density });
    }
    density >> 3
}

/// Logical ranks: package ranks (byte 12, bits 5:3, offset 1), multiplied by
/// the die count (byte 6, bits 6:4, offset 1) for 3DS packages.
fn logical_ranks(sdram_package_type: u8, ranks_width: u8, issues: &mut Vec<Issue>) -> u32 {
    let package_type = (sdram_package_type & 0x03) as u32;
    if package_type > PackageType::ThreeDs as u32 {
        issues.push(Issue::FieldOutOfSpec { field: "package type", value: package_type });
    }
    let package_ranks = 1 + ((ranks_width >> 3) & 0x07) as u32;
    if !(1..=4).contains(&package_ranks) {
        issues.push(Issue::FieldOutOfSpec { field: "package ranks", value: package_ranks });
    }
    let logical_ranks = if package_type == PackageType::ThreeDs as u32 {
        let die_count = 1 + ((sdram_package_type >> 4) & 0x07) as u32;
        if !(1..=8).contains(&die_count) {
            issues.push(Issue::FieldOutOfSpec { field: "die count", value: die_count });
        }
        package_ranks * die_count
    } else {
        package_ranks
    };
    if !(1..=32).contains(&logical_ranks) {
        issues.push(Issue::FieldOutOfSpec { field: "logical ranks", value: logical_ranks });
    }
    logical_ranks
}

/// Device width is stored in byte 12, bits 2:0 as 4 bits * 2^(stored value).
fn device_width_bits(ranks_width: u8, issues: &mut Vec<Issue>) -> u32 {
    let device_width = 4u32 << (ranks_width & 0x07);
    if !(4..=32).contains(&device_width) {
        issues.push(Issue::FieldOutOfSpec { field: "device width", value: device_width });
    }
    device_width
}

/// Primary bus width is stored in byte 13, bits 2:0 as 8 bits * 2^(stored value).
fn bus_width_bits(memory_bus_width: u8, issues: &mut Vec<Issue>) -> u32 {
    let bus_width = 8u32 << (memory_bus_width & 0x07);
    if !(8..=64).contains(&bus_width) {
        issues.push(Issue::FieldOutOfSpec { field: "bus width", value: bus_width });
    }
    bus_width
}

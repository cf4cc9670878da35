//! PE header reading
//!
//! Recovers the machine type of a Windows executable from its DOS/PE
//! headers. Only the fields needed to tell 32-bit from 64-bit builds are read.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::Result;

const DOS_MAGIC: &[u8; 2] = b"MZ";
const PE_SIGNATURE: &[u8; 4] = b"PE\0\0";
const E_LFANEW_OFFSET: u64 = 0x3C;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineType(pub u16);

impl MachineType {
    pub const I386: MachineType = MachineType(0x014c);
    pub const AMD64: MachineType = MachineType(0x8664);
    pub const ARM64: MachineType = MachineType(0xAA64);

    pub fn architecture(self) -> Architecture {
        match self {
            MachineType::AMD64 | MachineType::ARM64 => Architecture::X64,
            _ => Architecture::X86,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Architecture {
    X86,
    X64,
}

impl Architecture {
    /// Tag used in archive file names.
    pub fn archive_tag(self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Architecture::X86 => write!(f, "32-bit"),
            Architecture::X64 => write!(f, "64-bit"),
        }
    }
}

/// Read the COFF machine field of a PE image.
///
/// Returns `Ok(None)` when the file is not a PE image or is truncated; only
/// failing to open the file is reported as an error.
pub fn read_machine_type(path: &Path) -> Result<Option<MachineType>> {
    let mut file = File::open(path)?;
    match read_machine_from(&mut file) {
        Ok(machine) => Ok(machine),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn detect_architecture(path: &Path) -> Result<Option<Architecture>> {
    let machine = read_machine_type(path)?;
    tracing::debug!("{}: machine type {:?}", path.display(), machine);
    Ok(machine.map(MachineType::architecture))
}

fn read_machine_from<R: Read + Seek>(reader: &mut R) -> io::Result<Option<MachineType>> {
    let mut dos_magic = [0u8; 2];
    reader.read_exact(&mut dos_magic)?;
    if &dos_magic != DOS_MAGIC {
        return Ok(None);
    }

    reader.seek(SeekFrom::Start(E_LFANEW_OFFSET))?;
    let mut lfanew = [0u8; 4];
    reader.read_exact(&mut lfanew)?;
    let pe_offset = u32::from_le_bytes(lfanew);

    reader.seek(SeekFrom::Start(pe_offset as u64))?;
    let mut header = [0u8; 6];
    reader.read_exact(&mut header)?;
    if &header[0..4] != PE_SIGNATURE {
        return Ok(None);
    }

    Ok(Some(MachineType(u16::from_le_bytes([header[4], header[5]]))))
}

/// Minimal PE image with the given machine field, for tests.
#[cfg(test)]
pub(crate) fn fake_pe_image(machine: u16) -> Vec<u8> {
    let mut image = vec![0u8; 0x80];
    image[0..2].copy_from_slice(DOS_MAGIC);
    image[0x3C..0x40].copy_from_slice(&0x40u32.to_le_bytes());
    image[0x40..0x44].copy_from_slice(PE_SIGNATURE);
    image[0x44..0x46].copy_from_slice(&machine.to_le_bytes());
    image
}

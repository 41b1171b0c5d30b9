//! Minimal reader and writer for NumPy `.npy` files holding `<f8` arrays.
//!
//! Layout: the magic `\x93NUMPY`, a two-byte version, the header length
//! (`u16` for version 1, `u32` for versions 2 and 3), an ASCII Python dict
//! header padded with spaces so the data starts on a 64-byte boundary, then
//! the array in C order as little-endian `f64`.

use std::io::{self, Read, Write};
use thiserror::Error;

const MAGIC: &[u8; 6] = b"\x93NUMPY";
const ALIGNMENT: usize = 64;
const DESCR: &str = "<f8";

#[derive(Error, Debug)]
pub enum NpyError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("missing .npy magic string")]
    BadMagic,
    #[error("unsupported .npy format version {0}.{1}")]
    UnsupportedVersion(u8, u8),
    #[error("unsupported dtype {0:?}, expected '<f8'")]
    UnsupportedDtype(String),
    #[error("fortran-ordered arrays are not supported")]
    FortranOrder,
    #[error("malformed .npy header: {0}")]
    MalformedHeader(&'static str),
    #[error("array data is truncated, expected {expected} bytes")]
    Truncated { expected: usize },
    #[error("unexpected bytes after array data")]
    TrailingData,
}

/// Writes a C-ordered `f64` array.
///
/// # Errors
///
/// Fails on I/O errors, or with [`io::ErrorKind::InvalidInput`] when `data`
/// does not hold exactly `shape.iter().product()` values.
pub fn write_f64<W: Write>(writer: &mut W, shape: &[usize], data: &[f64]) -> io::Result<()> {
    if shape.iter().product::<usize>() != data.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "array length does not match its shape",
        ));
    }

    let dims: Vec<String> = shape.iter().map(ToString::to_string).collect();
    let shape_repr = match dims.as_slice() {
        [single] => format!("({single},)"),
        _ => format!("({})", dims.join(", ")),
    };
    let mut header =
        format!("{{'descr': '{DESCR}', 'fortran_order': False, 'shape': {shape_repr}, }}");
    let unpadded = MAGIC.len() + 2 + 2 + header.len() + 1;
    header.push_str(&" ".repeat((ALIGNMENT - unpadded % ALIGNMENT) % ALIGNMENT));
    header.push('\n');
    let header_len = u16::try_from(header.len())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "npy header too long"))?;

    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&header_len.to_le_bytes())?;
    writer.write_all(header.as_bytes())?;

    let little_endian: Vec<f64> = data
        .iter()
        .map(|v| f64::from_bits(v.to_bits().to_le()))
        .collect();
    writer.write_all(bytemuck::cast_slice::<f64, u8>(&little_endian))?;
    Ok(())
}

/// Reads a C-ordered `<f8` array, returning its shape and values.
///
/// # Errors
///
/// See [`NpyError`].
pub fn read_f64<R: Read>(reader: &mut R) -> Result<(Vec<usize>, Vec<f64>), NpyError> {
    let shape = read_header(reader)?;
    let values = read_values(reader, element_count(&shape)?)?;
    Ok((shape, values))
}

/// Reads the preamble and header, leaving `reader` at the first data byte.
///
/// Nothing is allocated for the array itself, so callers can check the
/// shape before committing to [`read_values`].
///
/// # Errors
///
/// See [`NpyError`].
pub fn read_header<R: Read>(reader: &mut R) -> Result<Vec<usize>, NpyError> {
    let mut magic = [0u8; 6];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(NpyError::BadMagic);
    }
    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let header_len = match version {
        [1, 0] => {
            let mut len = [0u8; 2];
            reader.read_exact(&mut len)?;
            usize::from(u16::from_le_bytes(len))
        }
        [2 | 3, 0] => {
            let mut len = [0u8; 4];
            reader.read_exact(&mut len)?;
            usize::try_from(u32::from_le_bytes(len))
                .map_err(|_| NpyError::MalformedHeader("header length overflows usize"))?
        }
        [major, minor] => return Err(NpyError::UnsupportedVersion(major, minor)),
    };
    let mut header = vec![0u8; header_len];
    reader.read_exact(&mut header)?;
    let header = std::str::from_utf8(&header)
        .map_err(|_| NpyError::MalformedHeader("header is not valid text"))?;
    parse_header(header)
}

/// Reads exactly `count` little-endian `f64` values and expects the stream
/// to end right after them.
///
/// # Errors
///
/// [`NpyError::Truncated`] or [`NpyError::TrailingData`] when the body does
/// not hold exactly `count` values.
pub fn read_values<R: Read>(reader: &mut R, count: usize) -> Result<Vec<f64>, NpyError> {
    let expected = count
        .checked_mul(std::mem::size_of::<f64>())
        .ok_or(NpyError::MalformedHeader("array size overflows usize"))?;
    let mut values = vec![0.0f64; count];
    reader
        .read_exact(bytemuck::cast_slice_mut::<f64, u8>(values.as_mut_slice()))
        .map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => NpyError::Truncated { expected },
            _ => NpyError::Io(e),
        })?;
    if reader.read(&mut [0u8; 1])? != 0 {
        return Err(NpyError::TrailingData);
    }
    for v in &mut values {
        *v = f64::from_bits(u64::from_le(v.to_bits()));
    }
    Ok(values)
}

/// Number of elements in `shape`.
///
/// # Errors
///
/// [`NpyError::MalformedHeader`] when the product overflows `usize`.
pub fn element_count(shape: &[usize]) -> Result<usize, NpyError> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or(NpyError::MalformedHeader("shape overflows usize"))
}

/// Validates dtype and ordering and returns the shape.
fn parse_header(header: &str) -> Result<Vec<usize>, NpyError> {
    let descr = dict_value(header, "descr")?
        .strip_prefix('\'')
        .and_then(|rest| rest.split('\'').next())
        .ok_or(NpyError::MalformedHeader("descr is not a string"))?;
    if descr != DESCR {
        return Err(NpyError::UnsupportedDtype(descr.to_string()));
    }

    let fortran = dict_value(header, "fortran_order")?;
    if fortran.starts_with("True") {
        return Err(NpyError::FortranOrder);
    }
    if !fortran.starts_with("False") {
        return Err(NpyError::MalformedHeader("fortran_order is not a bool"));
    }

    let shape = dict_value(header, "shape")?
        .strip_prefix('(')
        .and_then(|rest| rest.split(')').next())
        .ok_or(NpyError::MalformedHeader("shape is not a tuple"))?;
    shape
        .split(',')
        .map(str::trim)
        .filter(|dim| !dim.is_empty())
        .map(|dim| {
            dim.parse::<usize>()
                .map_err(|_| NpyError::MalformedHeader("shape holds a non-integer dimension"))
        })
        .collect()
}

/// Text following `'key':` in the header dict, leading whitespace removed.
fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str, NpyError> {
    let quoted = format!("'{key}'");
    let start = header
        .find(&quoted)
        .ok_or(NpyError::MalformedHeader("missing header key"))?;
    header[start + quoted.len()..]
        .trim_start()
        .strip_prefix(':')
        .map(str::trim_start)
        .ok_or(NpyError::MalformedHeader("header key without value"))
}

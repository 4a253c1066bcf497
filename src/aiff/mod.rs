//! AIFF encoder — wraps a mono 16-bit sample buffer in a `FORM`/`AIFF`
//! container with exactly one `COMM` and one `SSND` chunk.
//!
//! All fields are big-endian. Chunks are written back to back with no pad
//! byte; every payload produced here has even length anyway.

pub mod extended;

use std::io::Write;
use std::path::Path;

use log::debug;

use crate::error::{Result, SynthError};
use extended::{decode_extended, encode_extended};

const CHANNELS: i16 = 1;
const BITS_PER_SAMPLE: i16 = 16;
/// channels + numFrames + bitsPerSample + 80-bit sample rate.
const COMM_PAYLOAD_LEN: usize = 2 + 4 + 2 + 10;
/// offset + blockSize ahead of the sample bytes.
const SSND_HEADER_LEN: usize = 8;
const CHUNK_HEADER_LEN: usize = 8;
/// Bytes in a file holding zero frames.
const EMPTY_FILE_LEN: usize = 3 * CHUNK_HEADER_LEN + 4 + COMM_PAYLOAD_LEN + SSND_HEADER_LEN;

/// Most frames whose file still fits the 32-bit `FORM` length.
pub const MAX_FRAMES: usize = (u32::MAX as usize - EMPTY_FILE_LEN) / 2;

/// Decoded contents of a `COMM` chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonChunk {
    pub channels: i16,
    pub num_frames: u32,
    pub bits_per_sample: i16,
    pub sample_rate: f64,
}

/// Encode mono 16-bit PCM samples to an AIFF byte buffer.
pub fn encode_aiff(samples: &[i16], sample_rate: u32) -> Result<Vec<u8>> {
    if samples.len() > MAX_FRAMES {
        return Err(SynthError::BufferTooLarge(samples.len()));
    }
    let num_frames = samples.len() as u32;
    let ssnd_len = SSND_HEADER_LEN + samples.len() * 2;
    let form_len = 4 + CHUNK_HEADER_LEN + COMM_PAYLOAD_LEN + CHUNK_HEADER_LEN + ssnd_len;
    let form_len_field = form_len as u32;

    let mut buf = Vec::with_capacity(CHUNK_HEADER_LEN + form_len);

    // FORM header
    buf.extend_from_slice(b"FORM");
    buf.extend_from_slice(&form_len_field.to_be_bytes());
    buf.extend_from_slice(b"AIFF");

    // COMM chunk
    buf.extend_from_slice(b"COMM");
    buf.extend_from_slice(&(COMM_PAYLOAD_LEN as u32).to_be_bytes());
    buf.extend_from_slice(&CHANNELS.to_be_bytes());
    buf.extend_from_slice(&num_frames.to_be_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_be_bytes());
    buf.extend_from_slice(&encode_extended(f64::from(sample_rate))?);

    // SSND chunk
    buf.extend_from_slice(b"SSND");
    buf.extend_from_slice(&(ssnd_len as u32).to_be_bytes());
    buf.extend_from_slice(&0u32.to_be_bytes()); // offset
    buf.extend_from_slice(&0u32.to_be_bytes()); // block size
    for &sample in samples {
        buf.extend_from_slice(&sample.to_be_bytes());
    }

    Ok(buf)
}

/// Encode `samples` and write them to `path`.
///
/// Missing parent directories are created. The bytes go to a temporary
/// file in the destination directory which is then renamed over `path`,
/// so an existing file is replaced whole or not at all. The result keeps
/// the permissions of the file it replaces; a new file gets the same mode
/// a plain create would (0o666 less the umask).
pub fn write_aiff<P: AsRef<Path>>(path: P, samples: &[i16], sample_rate: u32) -> Result<()> {
    let path = path.as_ref();
    let bytes = encode_aiff(samples, sample_rate)?;

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;

    let existing = std::fs::metadata(path).ok().map(|m| m.permissions());
    let mut builder = tempfile::Builder::new();
    #[cfg(unix)]
    if existing.is_none() {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }
    let mut tmp = builder.tempfile_in(parent)?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.write_all(&bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| SynthError::Io(e.error))?;

    debug!(
        "wrote {} frames ({} bytes) to {}",
        samples.len(),
        bytes.len(),
        path.display()
    );
    Ok(())
}

/// Parse the `COMM` chunk of an AIFF file.
pub fn read_comm(bytes: &[u8]) -> Result<CommonChunk> {
    let payload = find_chunk(bytes, b"COMM")?;
    if payload.len() < COMM_PAYLOAD_LEN {
        return Err(SynthError::Container(format!(
            "COMM chunk is {} bytes, expected {COMM_PAYLOAD_LEN}",
            payload.len()
        )));
    }

    let mut rate = [0u8; 10];
    rate.copy_from_slice(&payload[8..18]);
    Ok(CommonChunk {
        channels: i16::from_be_bytes([payload[0], payload[1]]),
        num_frames: u32::from_be_bytes([payload[2], payload[3], payload[4], payload[5]]),
        bits_per_sample: i16::from_be_bytes([payload[6], payload[7]]),
        sample_rate: decode_extended(&rate),
    })
}

/// Return the full `SSND` payload (offset, block size, then sample bytes).
pub fn sound_data(bytes: &[u8]) -> Result<&[u8]> {
    find_chunk(bytes, b"SSND")
}

/// Decode the big-endian 16-bit samples stored in the `SSND` chunk.
pub fn read_samples(bytes: &[u8]) -> Result<Vec<i16>> {
    let payload = sound_data(bytes)?;
    if payload.len() < SSND_HEADER_LEN {
        return Err(SynthError::Container("SSND chunk shorter than its header".into()));
    }
    let offset = u32::from_be_bytes([payload[0], payload[1], payload[2], payload[3]]) as usize;
    let data = payload
        .get(SSND_HEADER_LEN + offset..)
        .ok_or_else(|| SynthError::Container("SSND offset past end of chunk".into()))?;
    Ok(data
        .chunks_exact(2)
        .map(|pair| i16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// Walk the chunks inside `FORM`/`AIFF` and return the payload tagged `id`.
fn find_chunk<'a>(bytes: &'a [u8], id: &[u8; 4]) -> Result<&'a [u8]> {
    if bytes.len() < 12 || &bytes[0..4] != b"FORM" || &bytes[8..12] != b"AIFF" {
        return Err(SynthError::Container("missing FORM/AIFF header".into()));
    }
    let form_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;
    let end = (CHUNK_HEADER_LEN + form_len).min(bytes.len());

    let mut pos = 12;
    while pos + CHUNK_HEADER_LEN <= end {
        let tag = &bytes[pos..pos + 4];
        let len = u32::from_be_bytes([
            bytes[pos + 4],
            bytes[pos + 5],
            bytes[pos + 6],
            bytes[pos + 7],
        ]) as usize;
        let start = pos + CHUNK_HEADER_LEN;
        let stop = start
            .checked_add(len)
            .filter(|&stop| stop <= end)
            .ok_or_else(|| {
                SynthError::Container(format!(
                    "{} chunk overruns the container",
                    String::from_utf8_lossy(tag)
                ))
            })?;
        if tag == id {
            return Ok(&bytes[start..stop]);
        }
        pos = stop;
    }

    Err(SynthError::Container(format!(
        "no {} chunk",
        String::from_utf8_lossy(id)
    )))
}

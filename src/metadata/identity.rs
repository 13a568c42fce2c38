// Document identity encoder.
//
// Ids must stay bit-compatible with stores written by the legacy encoder,
// so the arithmetic is spelled out with fixed-width wrapping operations:
//
//   name       = Σ bytes(path) × max(1, chunk_count) × epoch_time   (u64, wraps)
//   start      = (starting_id or epoch_time mod 3600) × ((chunk_count + 1) << 1)   (u32)
//   redundancy = (name XOR start) truncated to u32
//
// rendered as lowercase hex: name unpadded, then start and redundancy padded
// to eight digits each. This is a checksum, not a hash: distinct inputs can
// collide, and the store resolves that with replace-on-conflict.

/// Width of the two fixed-size trailing segments, in hex digits.
const SEGMENT_WIDTH: usize = 8;

/// Create the id for a source file.
///
/// `epoch_time` is the file's modification time in seconds. A
/// `starting_id` of 0 (no chunks recorded) is replaced by the epoch's
/// offset within its hour.
pub fn create_id(path: &str, epoch_time: i64, chunk_count: i64, starting_id: i64) -> String {
    let (name, start, redundancy) = encode(path, epoch_time, chunk_count, starting_id);
    format!("{name:x}{start:08x}{redundancy:08x}")
}

fn encode(path: &str, epoch_time: i64, chunk_count: i64, starting_id: i64) -> (u64, u32, u32) {
    let byte_sum = path
        .bytes()
        .fold(0u64, |acc, b| acc.wrapping_add(u64::from(b)));
    let name = byte_sum
        .wrapping_mul(chunk_count.max(1) as u64)
        .wrapping_mul(epoch_time as u64);

    let effective_start = if starting_id == 0 {
        epoch_time % 3600
    } else {
        starting_id
    };
    let start = effective_start.wrapping_mul(chunk_count.wrapping_add(1) << 1) as u32;

    let redundancy = (name ^ u64::from(start)) as u32;
    (name, start, redundancy)
}

/// Split an id back into its name, start and redundancy segments.
///
/// Returns `None` if the id is too short or not hex.
pub fn decode_id(id: &str) -> Option<(u64, u32, u32)> {
    if id.len() <= 2 * SEGMENT_WIDTH || !id.is_ascii() {
        return None;
    }
    let (name, rest) = id.split_at(id.len() - 2 * SEGMENT_WIDTH);
    let (start, redundancy) = rest.split_at(SEGMENT_WIDTH);
    Some((
        u64::from_str_radix(name, 16).ok()?,
        u32::from_str_radix(start, 16).ok()?,
        u32::from_str_radix(redundancy, 16).ok()?,
    ))
}

/// Whether an id's redundancy segment matches its other two segments.
pub fn is_consistent(id: &str) -> bool {
    decode_id(id).is_some_and(|(name, start, redundancy)| {
        (name ^ u64::from(start)) as u32 == redundancy
    })
}

//! 固定布局的二进制载荷
//!
//! The wire format is (N/2) records of 16 bytes, each record holding four
//! little-endian f32 values: [frequency, x, y, z]. Record 0 is never written
//! and stays zero; real data occupies records 1..N/2, so each logical region
//! starts 4 bytes apart (frequency at byte 16, x at 20, y at 24, z at 28)
//! and advances 16 bytes per value. The existing downstream consumer parses
//! exactly this layout (it unpacks the whole buffer as N/2 × 4 interleaved
//! floats and requires the exact byte length), so the layout, including the
//! zero first record, is preserved byte for byte.

use std::fmt::Write as _;
use std::mem;

const FLOAT_SIZE: usize = mem::size_of::<f32>();
const RECORD_SIZE: usize = 4 * FLOAT_SIZE;

// Base offsets of the four regions; each region then strides by RECORD_SIZE.
const FREQUENCY_BASE: usize = 4 * FLOAT_SIZE;
const X_BASE: usize = 5 * FLOAT_SIZE;
const Y_BASE: usize = 6 * FLOAT_SIZE;
const Z_BASE: usize = 7 * FLOAT_SIZE;

/// Fixed-size payload buffer, sized once from the window size and reused
/// across cycles. Every value slot is rewritten each cycle before the buffer
/// is handed to the publisher, so stale data can never leak between cycles.
#[derive(Debug)]
pub struct PayloadBuffer {
    bytes: Vec<u8>,
    bin_count: usize,
}

impl PayloadBuffer {
    pub fn new(window_size: usize) -> Self {
        Self {
            bytes: vec![0; window_size / 2 * RECORD_SIZE],
            bin_count: window_size / 2 - 1,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Serialize the frequency axis and the three magnitude spectra into the
    /// wire layout. All four slices must hold exactly N/2 − 1 values.
    pub fn pack(&mut self, frequency: &[f32], x: &[f32], y: &[f32], z: &[f32]) {
        debug_assert_eq!(frequency.len(), self.bin_count);
        debug_assert_eq!(x.len(), self.bin_count);
        debug_assert_eq!(y.len(), self.bin_count);
        debug_assert_eq!(z.len(), self.bin_count);

        for i in 0..self.bin_count {
            let record = i * RECORD_SIZE;
            self.put(FREQUENCY_BASE + record, frequency[i]);
            self.put(X_BASE + record, x[i]);
            self.put(Y_BASE + record, y[i]);
            self.put(Z_BASE + record, z[i]);
        }
    }

    fn put(&mut self, offset: usize, value: f32) {
        self.bytes[offset..offset + FLOAT_SIZE].copy_from_slice(&value.to_le_bytes());
    }

    /// Render the buffer as 16-byte hex rows for diagnostics.
    pub fn hex_dump(&self) -> String {
        let mut out = String::new();
        for row in self.bytes.chunks(RECORD_SIZE) {
            for (i, byte) in row.iter().enumerate() {
                let _ = write!(out, "{:02x}", byte);
                out.push_str(if i % 4 == 3 { "  " } else { " " });
            }
            out.push('\n');
        }
        out
    }
}

/// Deserialized payload, one vector per region. Mirrors how the downstream
/// consumer walks the buffer; mostly useful for tests and tooling.
#[derive(Debug, PartialEq)]
pub struct UnpackedPayload {
    pub frequency: Vec<f32>,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub z: Vec<f32>,
}

/// Parse a wire payload back into its four float sequences, skipping the
/// reserved first record. Returns `None` when the byte length is not a whole
/// number of records.
pub fn unpack(bytes: &[u8]) -> Option<UnpackedPayload> {
    if bytes.is_empty() || bytes.len() % RECORD_SIZE != 0 {
        return None;
    }

    let bin_count = bytes.len() / RECORD_SIZE - 1;
    let mut payload = UnpackedPayload {
        frequency: Vec::with_capacity(bin_count),
        x: Vec::with_capacity(bin_count),
        y: Vec::with_capacity(bin_count),
        z: Vec::with_capacity(bin_count),
    };

    for record in bytes.chunks_exact(RECORD_SIZE).skip(1) {
        let read = |i: usize| {
            let at = i * FLOAT_SIZE;
            f32::from_le_bytes([record[at], record[at + 1], record[at + 2], record[at + 3]])
        };
        payload.frequency.push(read(0));
        payload.x.push(read(1));
        payload.y.push(read(2));
        payload.z.push(read(3));
    }

    Some(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_size_is_fixed_by_window_size() {
        assert_eq!(PayloadBuffer::new(128).len(), 1024);
        assert_eq!(PayloadBuffer::new(8).len(), 64);
    }

    #[test]
    fn first_record_stays_reserved_and_zero() {
        let mut buffer = PayloadBuffer::new(8);
        let values = [1.0f32, 2.0, 3.0];
        buffer.pack(&values, &values, &values, &values);

        assert_eq!(&buffer.as_bytes()[..16], &[0u8; 16]);
    }

    #[test]
    fn regions_land_at_their_wire_offsets() {
        let mut buffer = PayloadBuffer::new(8);
        buffer.pack(&[10.0, 20.0, 30.0], &[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0], &[7.0, 8.0, 9.0]);
        let bytes = buffer.as_bytes();

        let f32_at = |offset: usize| {
            f32::from_le_bytes([
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ])
        };

        // First value of each region, then one full 16-byte stride later
        assert_eq!(f32_at(16), 10.0);
        assert_eq!(f32_at(20), 1.0);
        assert_eq!(f32_at(24), 4.0);
        assert_eq!(f32_at(28), 7.0);
        assert_eq!(f32_at(32), 20.0);
        assert_eq!(f32_at(36), 2.0);
    }

    #[test]
    fn pack_then_unpack_is_bit_exact() {
        let n = 128;
        let bins = n / 2 - 1;
        let frequency: Vec<f32> = (1..=bins).map(|i| i as f32 * 7.8125).collect();
        let x: Vec<f32> = (0..bins).map(|i| (i as f32).sqrt()).collect();
        let y: Vec<f32> = (0..bins).map(|i| 1.0 / (i as f32 + 0.3)).collect();
        let z: Vec<f32> = (0..bins).map(|i| i as f32 * -0.125).collect();

        let mut buffer = PayloadBuffer::new(n);
        buffer.pack(&frequency, &x, &y, &z);
        let unpacked = unpack(buffer.as_bytes()).unwrap();

        assert_eq!(unpacked.frequency, frequency);
        assert_eq!(unpacked.x, x);
        assert_eq!(unpacked.y, y);
        assert_eq!(unpacked.z, z);
    }

    #[test]
    fn unpack_rejects_ragged_buffers() {
        assert!(unpack(&[]).is_none());
        assert!(unpack(&[0u8; 100]).is_none());
    }

    #[test]
    fn hex_dump_renders_sixteen_byte_rows() {
        let buffer = PayloadBuffer::new(8);
        let dump = buffer.hex_dump();
        assert_eq!(dump.lines().count(), 4);
        assert!(dump.lines().all(|line| line.contains("00 00 00 00")));
    }
}

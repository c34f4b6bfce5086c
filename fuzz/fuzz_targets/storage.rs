#![no_main]
use libfuzzer_sys::fuzz_target;
use linepos::{Cache, CompressedLinePositionStorage, LineNumber, LineOffset};

/// Turns arbitrary fuzzer bytes into a sequence of non-decreasing `u64` offsets (by
/// saturating-summing 2-byte little-endian deltas), then drives `append`/`at`/`pop_back` to
/// completion. The encoder's own output is trusted, but this target exercises the decoder
/// against every buffer it produces as a cross-check that the codec never panics or reads out
/// of bounds, even on pathological delta sequences.
fuzz_target!(|data: &[u8]| {
    let mut storage = CompressedLinePositionStorage::new();
    let mut cache = Cache::default();
    let mut offset = 0u64;
    let mut can_pop = false;

    for chunk in data.chunks(3) {
        match chunk {
            [lo, hi, op] => {
                let delta = u16::from_le_bytes([*lo, *hi]) as u64;
                offset = offset.saturating_add(delta);
                storage.append(LineOffset::from(offset));
                can_pop = true;

                match op % 3 {
                    0 if can_pop && storage.size() > 0 => {
                        storage.pop_back();
                        can_pop = false;
                        offset = if storage.size() > 0 {
                            storage.at(LineNumber::from(storage.size() - 1), None).unwrap().0
                        } else {
                            0
                        };
                    }
                    1 => {
                        let index = (*op as usize) % storage.size().max(1);
                        let _ = storage.at(LineNumber::from(index), Some(&mut cache));
                    }
                    _ => {
                        let index = (*op as usize) % storage.size().max(1);
                        let _ = storage.at(LineNumber::from(index), None);
                    }
                }
            }
            _ => break,
        }
    }

    // A final full sequential scan, with and without a cache, must never panic.
    let mut cache = Cache::default();
    for i in 0..storage.size() {
        let _ = storage.at(LineNumber::from(i), Some(&mut cache));
        let _ = storage.at(LineNumber::from(i), None);
    }
});

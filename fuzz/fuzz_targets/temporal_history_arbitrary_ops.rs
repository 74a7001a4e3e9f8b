#![no_main]

use libfuzzer_sys::fuzz_target;
use temporalkit::ds::SliceSpec;
use temporalkit::history::TemporalHistory;
use temporalkit::id::SequentialIds;

// Fuzz arbitrary operation sequences on TemporalHistory
//
// Drives update, recency, identifier, slice, set, delete, and clear with
// byte-derived arguments and checks both structures stay in agreement.
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks capacity; 0 means unbounded
    let capacity = match data[0] % 17 {
        0 => None,
        n => Some(usize::from(n) - 1),
    };
    let mut history = TemporalHistory::with_generator(capacity, SequentialIds::new());
    let mut issued = 0u64;

    for chunk in data[1..].chunks_exact(2) {
        let op = chunk[0] % 8;
        let arg = chunk[1];

        match op {
            0 => {
                history.update(u64::from(arg));
                issued += 1;
            }
            1 => {
                // Reuse an id that may already be mapped
                let id = (u64::from(arg) % (issued + 1)).to_string();
                history.update_with_id(u64::from(arg), id);
            }
            2 => {
                let index = isize::from(arg as i8);
                let result = history.by_recency(index);
                if (index.unsigned_abs()) < history.len() {
                    assert!(result.is_ok());
                } else {
                    assert!(result.is_err());
                }
            }
            3 => {
                let id = (u64::from(arg) % (issued + 1)).to_string();
                let hit = history.by_identifier(&id).is_some();
                assert_eq!(hit, history.contains(&id));
            }
            4 => {
                let step = isize::from((arg % 7) as i8) - 3;
                let spec = SliceSpec::new(Some(isize::from(arg as i8) / 4), None, Some(step));
                let result = history.by_slice(spec);
                if step == 0 {
                    assert!(result.is_err());
                } else if let Ok(selected) = result {
                    assert!(selected.len() <= history.len());
                }
            }
            5 => {
                let id = format!("direct-{}", arg % 8);
                history.set(id, u64::from(arg));
            }
            6 => {
                let id = (u64::from(arg) % (issued + 1)).to_string();
                let was_mapped = history.contains(&id);
                assert_eq!(history.delete(&id).is_ok(), was_mapped);
                assert!(!history.contains(&id));
            }
            7 => {
                if arg == 0 {
                    history.clear();
                    assert!(history.is_empty());
                }
            }
            _ => unreachable!(),
        }

        if let Some(cap) = history.capacity() {
            assert!(history.len() <= cap);
        }
        assert_eq!(history.iter().count(), history.len());
        assert_eq!(history.current().is_ok(), !history.is_empty());
    }

    assert!(history.check_invariants().is_ok());
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use temporalkit::ds::BoundedIdMap;

// Fuzz arbitrary set/get/delete/clear sequences on BoundedIdMap
//
// Small key space forces overwrites, stale queue entries, and compaction.
fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let capacity = match data[0] % 10 {
        0 => None,
        n => Some(usize::from(n) - 1),
    };
    let mut map = BoundedIdMap::new(capacity);

    for chunk in data[1..].chunks_exact(2) {
        let key = format!("k{}", chunk[1] % 16);
        match chunk[0] % 4 {
            0 => {
                map.set(key.clone(), chunk[1]);
                if capacity != Some(0) {
                    assert_eq!(map.get(&key), Some(&chunk[1]));
                }
            }
            1 => {
                assert_eq!(map.get(&key).is_some(), map.contains(&key));
            }
            2 => {
                let present = map.contains(&key);
                assert_eq!(map.delete(&key).is_ok(), present);
            }
            3 => {
                if chunk[1] == 0 {
                    map.clear();
                    assert!(map.is_empty());
                }
            }
            _ => unreachable!(),
        }

        if let Some(cap) = map.capacity() {
            assert!(map.len() <= cap);
        }
        assert_eq!(map.iter().count(), map.len());
    }

    assert!(map.check_invariants().is_ok());
});

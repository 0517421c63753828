#![no_main]
use libfuzzer_sys::fuzz_target;
use treebench::codec::ZstdPatchCodec;
use treebench::{BlockCodec, CodecKind, CodecSet, DeltaCodec};

fuzz_target!(|data: &[u8]| {
    // Every decoder must reject garbage with an error, never panic.
    let set = CodecSet::default();
    for kind in CodecKind::ALL {
        let _ = set.block(kind).decode_bytes(data);
    }

    let codec = ZstdPatchCodec::default();
    let _ = codec.apply_bytes(&[], data);
    if data.len() >= 2 {
        let (base, delta) = data.split_at(data.len() / 2);
        let _ = codec.apply_bytes(base, delta);
    }
});

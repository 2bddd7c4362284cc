#![no_main]
use libfuzzer_sys::fuzz_target;
use smcrypt_utils::asn1::{decode_signature, der_to_raw, raw_to_der};

fuzz_target!(|data: &[u8]| {
    if let Ok((r, s)) = decode_signature(data) {
        assert!(r.len() + s.len() <= data.len());
    }
    // Anything accepted must survive a round trip through the raw form.
    if let Ok(raw) = der_to_raw(data) {
        let der = raw_to_der(&raw).unwrap();
        assert_eq!(der_to_raw(&der).unwrap(), raw);
    }
});

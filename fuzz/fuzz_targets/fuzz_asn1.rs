#![no_main]
use libfuzzer_sys::fuzz_target;
use smcrypt_utils::asn1::Decoder;

fuzz_target!(|data: &[u8]| {
    let mut decoder = Decoder::new(data);
    while !decoder.is_empty() {
        let Ok(tlv) = decoder.read_tlv() else {
            break;
        };
        // Constructed values get one level of recursion.
        if tlv.tag & 0x20 != 0 {
            let mut inner = Decoder::new(tlv.value);
            while !inner.is_empty() && inner.read_tlv().is_ok() {}
        }
    }
});

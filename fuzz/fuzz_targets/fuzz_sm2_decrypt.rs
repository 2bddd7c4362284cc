#![no_main]
use libfuzzer_sys::fuzz_target;
use smcrypt_crypto::sm2::{Sm2KeyPair, Sm2Options};
use smcrypt_types::CipherOrder;

const PRIVATE_KEY: [u8; 32] = [
    0x39, 0x45, 0x20, 0x8f, 0x7b, 0x21, 0x44, 0xb1, 0x3f, 0x36, 0xe3, 0x8a, 0xc6, 0xd3, 0x9f, 0x95,
    0x88, 0x93, 0x93, 0x69, 0x28, 0x60, 0xb5, 0x1a, 0x42, 0xfb, 0x81, 0xef, 0x4d, 0xf7, 0xc5, 0xb8,
];

fuzz_target!(|data: &[u8]| {
    let Ok(key) = Sm2KeyPair::from_private_key(&PRIVATE_KEY) else {
        return;
    };
    for order in [CipherOrder::C1C3C2, CipherOrder::C1C2C3] {
        let opts = Sm2Options::default().with_order(order);
        let _ = key.decrypt(data, &opts);
        let _ = key.verify(b"fuzz", data, &opts);
    }
});

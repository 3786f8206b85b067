#![no_main]

use libfuzzer_sys::fuzz_target;
use refaktura::core::FragmentStream;
use refaktura::reissue::Reissuer;

fuzz_target!(|data: &[u8]| {
    if let Ok(stream) = serde_json::from_slice::<FragmentStream>(data) {
        let _ = Reissuer::default().reissue(&stream);
    }
});

#![no_main]

use libfuzzer_sys::fuzz_target;
use refaktura::core::NumberFormat;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let fmt = NumberFormat::default();
        if let Ok(value) = fmt.parse_amount("total", s) {
            let _ = fmt.format_money(value);
        }
    }
});

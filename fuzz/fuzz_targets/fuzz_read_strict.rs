#![no_main]
use libfuzzer_sys::fuzz_target;
use sharecart_engine::CartReader;

fuzz_target!(|data: &[u8]| {
    let _ = CartReader::new(data).strict(true).read();
});

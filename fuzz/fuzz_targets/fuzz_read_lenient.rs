#![no_main]
use libfuzzer_sys::fuzz_target;
use sharecart_core::{constraints, ReadError};
use sharecart_engine::{encode, CartReader};

fuzz_target!(|data: &[u8]| {
    match CartReader::new(data).read() {
        Ok(record) => {
            assert!(constraints::valid_x(record.x.into()));
            assert!(constraints::valid_y(record.y.into()));
            assert!(record.misc.iter().all(|&m| constraints::valid_misc(m.into())));
            assert!(constraints::valid_name(Some(record.name.as_str())));
            // Rewritten output must satisfy the strict reader. Names with line
            // breaks or edge quotes do not survive the text format unchanged.
            let name = record.name.as_str();
            if !name.contains(['\n', '\r']) && !name.starts_with('"') && !name.ends_with('"') {
                let text = encode(&record);
                let again = CartReader::new(text.as_bytes()).strict(true).read();
                assert_eq!(again.ok().as_ref(), Some(&record));
            }
        }
        Err(ReadError::Io(_)) => {}
        Err(ReadError::Format(e)) => panic!("lenient reader raised {e}"),
    }
});

#![no_main]

use csv_eda_analyzer::{io::read_csv_from_bytes, Analyzer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(dataset) = read_csv_from_bytes(data, "fuzz") {
        let analyzer = Analyzer::new(&dataset);
        let _ = analyzer.summary_report();
        let _ = analyzer.histograms(30);
        let _ = analyzer.correlation();
        let _ = analyzer.box_stats();
    }
});

#![no_main]

use deltri::{PointSet, Triangulation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Vec<[f64; 2]>| {
    let mut points = PointSet::new(None);
    for v in data {
        if v[0].is_finite() && v[1].is_finite() {
            points.push(v);
        }
    }

    if let Ok(triangulation) = Triangulation::build(&points, None) {
        let _ = triangulation.extract();
        assert!(triangulation.is_sound());
    }
});

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use criterion::*;

use ephemeris::bodies::Body;
use ephemeris::earth_rotation::Observer;
use ephemeris::time::Time;
use ephemeris::{aggregator, observer_frame};

fn ephemeris(c: &mut Criterion) {
    let t = Time::from_calendar(2024, 6, 1, 12, 0, 0.0).unwrap();

    c.bench_function("aggregator::geo_vector(Mars)", |b| {
        b.iter(|| aggregator::geo_vector(black_box(Body::Mars), black_box(t), true).unwrap())
    });

    c.bench_function("aggregator::helio_vector(Pluto)", |b| {
        b.iter(|| aggregator::helio_vector(black_box(Body::Pluto), black_box(t)).unwrap())
    });

    let observer = Observer::new(40.0, -105.0, 1.6);
    c.bench_function("observer_frame::equator(Moon)", |b| {
        b.iter(|| observer_frame::equator(black_box(Body::Moon), black_box(t), Some(observer), true, true).unwrap())
    });
}

criterion_group!(benches, ephemeris);
criterion_main!(benches);

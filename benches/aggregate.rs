use chrono::{Days, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use irish_climate::{aggregate, BucketPattern, Reduction, Statistic};
use polars::prelude::*;

const COUNTIES: [&str; 4] = ["Cork", "Dublin", "Galway", "Kerry"];
const DAYS: u64 = 365 * 10;

/// Ten years of daily observations for a handful of counties.
fn daily_observations() -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
    let mut counties = Vec::new();
    let mut dates = Vec::new();
    let mut maxtp = Vec::new();
    let mut rain = Vec::new();
    for (i, county) in COUNTIES.iter().enumerate() {
        for day in 0..DAYS {
            counties.push(*county);
            dates.push(start.checked_add_days(Days::new(day)).unwrap());
            maxtp.push(10.0 + (day % 30) as f64 / 3.0 + i as f64);
            rain.push(if day % 7 == 0 { None } else { Some((day % 11) as f64) });
        }
    }
    df!(
        "county" => counties,
        "date" => dates,
        "maxtp" => maxtp,
        "rain" => rain,
    )
    .unwrap()
}

fn bench_aggregate(c: &mut Criterion) {
    let data = daily_observations();
    let reductions = [
        Reduction::new("maxtp", Statistic::Mean),
        Reduction::new("rain", Statistic::Sum),
        Reduction::new("rain", Statistic::Median).alias("median_rain"),
    ];

    for format in ["%Y", "%Y-%m", "%m"] {
        let pattern: BucketPattern = format.parse().unwrap();
        c.bench_function(&format!("aggregate {}", format), |b| {
            b.iter(|| {
                aggregate()
                    .data(black_box(&data))
                    .reductions(&reductions)
                    .pattern(&pattern)
                    .call()
                    .unwrap()
            })
        });
    }
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
